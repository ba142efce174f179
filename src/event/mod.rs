//! Event system: signals and the repaint queue.

pub mod queue;
pub mod signal;

pub use queue::RepaintQueue;
pub use signal::{handler, Handler, Signal, SignalTable};
