//! Built-in widgets: labels, buttons and container builders.

pub mod display;
pub mod layout;
