//! Signals: the fixed set of widget events and per-widget handler tables.
//!
//! Handlers are reference-counted closures. Connecting the same `Rc` twice for
//! the same signal is a no-op; dispatch runs handlers synchronously in the
//! order they were connected.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::ui::Ui;
use crate::widget::WidgetKey;

// ---------------------------------------------------------------------------
// Signal
// ---------------------------------------------------------------------------

/// Events a widget can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Clickable widget was clicked.
    Clicked,
    /// Entry value changed.
    EntryChanged,
    /// Checkbox entry was checked.
    EntryChecked,
    /// Checkbox entry was unchecked.
    EntryUnchecked,
    /// Widget was shown.
    Shown,
    /// Widget was hidden.
    Hidden,
    /// Widget was repainted.
    Repainted,
    /// Widget was disposed.
    Disposed,
    /// A stack displayed one of its children (emitted by the stack).
    StackDisplayed,
    /// A table column sort was toggled, before the refresh is issued.
    TableSorted,
    /// A table applied a provider response and repainted.
    TableDataRefreshed,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// A signal handler. Receives the `Ui` and the key of the emitting widget.
pub type Handler = Rc<dyn Fn(&mut Ui, WidgetKey)>;

/// Wrap a closure as a [`Handler`].
pub fn handler(f: impl Fn(&mut Ui, WidgetKey) + 'static) -> Handler {
    Rc::new(f)
}

// ---------------------------------------------------------------------------
// SignalTable
// ---------------------------------------------------------------------------

/// Handlers connected on one widget, grouped by signal.
#[derive(Default)]
pub struct SignalTable {
    handlers: HashMap<Signal, Vec<Handler>>,
}

impl SignalTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Returns `false` if it was already registered.
    pub fn connect(&mut self, signal: Signal, handler: Handler) -> bool {
        let registered = self.handlers.entry(signal).or_default();
        if registered.iter().any(|h| Rc::ptr_eq(h, &handler)) {
            return false;
        }
        registered.push(handler);
        true
    }

    /// Remove a handler. Returns `true` if it was registered.
    pub fn disconnect(&mut self, signal: Signal, handler: &Handler) -> bool {
        match self.handlers.get_mut(&signal) {
            Some(registered) => {
                let before = registered.len();
                registered.retain(|h| !Rc::ptr_eq(h, handler));
                registered.len() != before
            }
            None => false,
        }
    }

    /// Snapshot of the handlers for `signal`, in registration order.
    ///
    /// Dispatch works on the snapshot so handlers may freely mutate the `Ui`,
    /// including this very table.
    pub fn handlers(&self, signal: Signal) -> Vec<Handler> {
        self.handlers.get(&signal).cloned().unwrap_or_default()
    }

    /// Number of handlers connected for `signal`.
    pub fn count(&self, signal: Signal) -> usize {
        self.handlers.get(&signal).map_or(0, Vec::len)
    }

    /// Drop every handler.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl fmt::Debug for SignalTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (signal, handlers) in &self.handlers {
            map.entry(signal, &handlers.len());
        }
        map.finish()
    }
}
