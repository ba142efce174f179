//! Widget system: arena nodes, kinds, lifecycle.

pub mod kind;
pub mod lifecycle;
pub mod node;

pub use kind::{Flavor, WidgetKind};
pub use node::{WidgetKey, WidgetNode};
