//! Repaint queue: pending redisplay intents.
//!
//! Mutating a materialized, displayed widget does not repaint it on the spot.
//! Instead its key is pushed here and [`Ui::flush`](crate::ui::Ui::flush)
//! drains the queue, running at most one repaint per queued widget.

use std::collections::VecDeque;

use crate::widget::WidgetKey;

// ---------------------------------------------------------------------------
// RepaintQueue
// ---------------------------------------------------------------------------

/// FIFO of widgets waiting for a repaint. A key is queued at most once.
#[derive(Debug, Default)]
pub struct RepaintQueue {
    queue: VecDeque<WidgetKey>,
}

impl RepaintQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a redisplay intent. Returns `false` if already pending.
    pub fn push(&mut self, key: WidgetKey) -> bool {
        if self.queue.contains(&key) {
            return false;
        }
        self.queue.push_back(key);
        true
    }

    /// Drain all pending intents. The queue is empty after this call.
    pub fn drain(&mut self) -> Vec<WidgetKey> {
        self.queue.drain(..).collect()
    }

    /// Forget a widget (it was disposed or already rebuilt).
    pub fn forget(&mut self, key: WidgetKey) {
        self.queue.retain(|&k| k != key);
    }

    /// Number of pending intents.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
