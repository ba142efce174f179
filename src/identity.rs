//! Widget identity: `WidgetId` and the injected `IdAllocator`.
//!
//! Every widget receives a [`WidgetId`] the first time its identity is asked
//! for. Identities come from an [`IdAllocator`], a shared monotonic counter
//! owned by the [`Ui`](crate::ui::Ui) rather than a process global, so tests can
//! run with their own hermetic sequence.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// WidgetId
// ---------------------------------------------------------------------------

/// Public, stable identity of a widget.
///
/// Unlike [`WidgetKey`](crate::widget::WidgetKey), which is the arena handle,
/// a `WidgetId` is the value collaborators store and compare (history entries,
/// lookups by identity, node ids handed to the backend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(u64);

impl WidgetId {
    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// IdAllocator
// ---------------------------------------------------------------------------

/// Monotonic identity allocator.
///
/// Cloning an allocator shares the underlying counter, so two `Ui` instances
/// built from clones of the same allocator never hand out equal identities.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: Arc<AtomicU64>,
}

impl IdAllocator {
    /// Create an allocator whose first identity is `w0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an allocator starting at the given counter value.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: Arc::new(AtomicU64::new(first)),
        }
    }

    /// Hand out the next identity.
    pub fn allocate(&self) -> WidgetId {
        WidgetId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of identities handed out so far (for a fresh allocator).
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
