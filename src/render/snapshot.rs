//! Snapshot helpers for the headless backend.
//!
//! Turns a headless node tree into a compact one-line string suitable for
//! assertions and inline snapshots:
//!
//! ```text
//! app#w0 (window#w1 "Main" (cell (label#w2 "Hi")))
//! ```
//!
//! Each node prints its role, `#id` for widget roots, the quoted label, a
//! bracketed flag list (`hidden`, `disabled`, `selected`, `asc`/`desc`) and
//! its children in parentheses.

use super::backend::NodeHandle;
use super::headless::Headless;
use crate::data::SortOrder;
use crate::error::UiError;
use crate::ui::Ui;
use crate::widget::WidgetKey;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Dump the subtree rooted at `node`. Unknown handles dump as `<gone>`.
pub fn dump(backend: &Headless, node: NodeHandle) -> String {
    let mut out = String::new();
    write_node(backend, node, &mut out);
    out
}

/// Dump the mounted root, or an empty string if nothing is mounted.
pub fn dump_root(backend: &Headless) -> String {
    backend.root().map(|root| dump(backend, root)).unwrap_or_default()
}

/// Materialize `key` (reusing cached nodes) and dump it.
///
/// Returns an empty string if the `Ui` is not backed by [`Headless`].
pub fn dump_widget(ui: &mut Ui, key: WidgetKey) -> Result<String, UiError> {
    let node = ui.materialized(key)?;
    Ok(ui
        .backend_as::<Headless>()
        .map(|backend| dump(backend, node))
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn write_node(backend: &Headless, node: NodeHandle, out: &mut String) {
    let Some(el) = backend.get(node) else {
        out.push_str("<gone>");
        return;
    };

    out.push_str(el.role);
    if let Some(id) = el.widget() {
        out.push('#');
        out.push_str(&id.to_string());
    }
    if let Some(label) = &el.label {
        out.push_str(" \"");
        out.push_str(label);
        out.push('"');
    }

    let mut flags: Vec<&str> = Vec::new();
    if !el.visible {
        flags.push("hidden");
    }
    if !el.active {
        flags.push("disabled");
    }
    if el.selected {
        flags.push("selected");
    }
    match el.sort {
        Some(SortOrder::Asc) => flags.push("asc"),
        Some(SortOrder::Desc) => flags.push("desc"),
        None => {}
    }
    if !flags.is_empty() {
        out.push_str(" [");
        out.push_str(&flags.join(","));
        out.push(']');
    }

    let children = backend.children(node);
    if !children.is_empty() {
        out.push_str(" (");
        for (i, &child) in children.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            write_node(backend, child, out);
        }
        out.push(')');
    }
}
