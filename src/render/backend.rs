//! The rendering boundary: `Backend`, `NodeHandle`, `NodeSpec`.
//!
//! The engine never touches a platform directly. Materialization describes
//! each node as a [`NodeSpec`] and hands it to the injected [`Backend`], which
//! returns an opaque [`NodeHandle`]. Everything else the engine does to the
//! platform (swap a rebuilt node in, toggle visibility, mark a tab selected)
//! goes through the handful of methods on this trait.

use std::any::Any;

use slotmap::new_key_type;

use crate::container::{CellAlignment, CellSizing, ContainerSizing};
use crate::data::SortOrder;
use crate::identity::WidgetId;

new_key_type! {
    /// Handle to a materialized platform node.
    pub struct NodeHandle;
}

// ---------------------------------------------------------------------------
// NodeSpec
// ---------------------------------------------------------------------------

/// Who owns a platform node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOwner {
    /// The root node of a widget's materialized representation.
    ///
    /// Widget roots are only destroyed through [`Backend::release`], when the
    /// widget is disposed; a replaced parent merely orphans them.
    Widget(WidgetId),
    /// An auxiliary node (cell wrapper, tab, table header) owned by its parent.
    Part,
}

/// Layout metadata carried by a cell wrapper node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    pub sizing: CellSizing,
    pub alignment: CellAlignment,
}

/// Description of one platform node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    /// What the node is (e.g. `"window"`, `"cell"`, `"table-header"`).
    pub role: &'static str,
    pub owner: NodeOwner,
    pub label: Option<String>,
    /// Interactive (`true`) or disabled.
    pub active: bool,
    /// Cell layout, for cell wrappers.
    pub cell: Option<CellLayout>,
    /// Container-level alignment of cells, for containers.
    pub alignment: Option<CellAlignment>,
    /// Container sizing, for containers.
    pub sizing: Option<ContainerSizing>,
    /// Children, in order. The backend moves them under the new node.
    pub children: Vec<NodeHandle>,
}

impl NodeSpec {
    /// The root node of a widget.
    pub fn widget(role: &'static str, id: WidgetId) -> Self {
        Self::new(role, NodeOwner::Widget(id))
    }

    /// An auxiliary node.
    pub fn part(role: &'static str) -> Self {
        Self::new(role, NodeOwner::Part)
    }

    fn new(role: &'static str, owner: NodeOwner) -> Self {
        Self {
            role,
            owner,
            label: None,
            active: true,
            cell: None,
            alignment: None,
            sizing: None,
            children: Vec::new(),
        }
    }

    /// Set the label (builder).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the label from an optional value (builder).
    pub fn with_optional_label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_owned);
        self
    }

    /// Set the interactive flag (builder).
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Set the cell layout (builder).
    pub fn with_cell(mut self, cell: CellLayout) -> Self {
        self.cell = Some(cell);
        self
    }

    /// Set container layout metadata (builder).
    pub fn with_container(mut self, alignment: CellAlignment, sizing: ContainerSizing) -> Self {
        self.alignment = Some(alignment);
        self.sizing = Some(sizing);
        self
    }

    /// Append a child (builder).
    pub fn with_child(mut self, child: NodeHandle) -> Self {
        self.children.push(child);
        self
    }

    /// Append children (builder).
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeHandle>) -> Self {
        self.children.extend(children);
        self
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Platform rendering backend injected into the [`Ui`](crate::ui::Ui).
///
/// Implementations must tolerate stale handles in the `set_*` methods (a tab
/// handle may outlive the notebook node it belonged to); those calls are then
/// no-ops.
pub trait Backend {
    /// Build a node. Children listed in the spec are moved under it.
    fn create(&mut self, spec: NodeSpec) -> NodeHandle;

    /// Put `new` where `old` is attached, then drop `old`.
    ///
    /// `new` must be fully built before this call so the swap is atomic.
    /// Auxiliary parts below `old` are destroyed; widget roots below it are
    /// merely detached, since their widgets still own them.
    fn replace(&mut self, old: NodeHandle, new: NodeHandle);

    /// Detach and destroy a widget's node and everything below it.
    fn release(&mut self, node: NodeHandle);

    /// Attach a node to the platform surface.
    fn mount(&mut self, node: NodeHandle);

    /// Show or hide a node.
    fn set_visible(&mut self, node: NodeHandle, visible: bool);

    /// Enable or disable a node.
    fn set_active(&mut self, node: NodeHandle, active: bool);

    /// Mark a node as the selected one among its siblings (e.g. a tab).
    fn set_selected(&mut self, node: NodeHandle, selected: bool);

    /// Show a sort indicator on a column header.
    fn set_sort_indicator(&mut self, node: NodeHandle, order: Option<SortOrder>);

    /// Downcast to `&dyn Any` for runtime type inspection.
    fn as_any(&self) -> &dyn Any;

    /// Downcast to `&mut dyn Any` for mutable runtime type inspection.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
