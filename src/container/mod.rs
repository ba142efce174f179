//! Containers: cells, child hosting, exclusive-display stacks.

pub mod cell;
pub mod host;
pub mod stack;

pub use cell::{Cell, CellAlignment, CellSizing, ChildHost, ChildRef, ContainerSizing};
pub use stack::{StackFlavor, StackState};
