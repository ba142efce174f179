//! Rendering: the backend boundary, per-kind materialization, the headless
//! backend and its snapshot dump.

pub mod backend;
pub mod headless;
pub mod materialize;
pub mod snapshot;

pub use backend::{Backend, CellLayout, NodeHandle, NodeOwner, NodeSpec};
pub use headless::{Element, Headless};
pub use snapshot::{dump, dump_root, dump_widget};
