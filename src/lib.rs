//! # trellis
//!
//! A retained-mode widget engine. Widgets form a tree of stateful components
//! that lazily materialize into platform nodes through an injected
//! [`Backend`](render::Backend), track their own dirtiness and repaint
//! incrementally.
//!
//! ## Core Systems
//!
//! - **[`ui`]** — The [`Ui`] engine: widget arena, repaint queue, configuration
//! - **[`widget`]** — Widget nodes, kinds and the shared lifecycle
//! - **[`container`]** — Cells, child hosting, exclusive-display stacks with history
//! - **[`data`]** — Query/response protocol, providers, async table refresh
//! - **[`event`]** — Signals and the repaint queue
//! - **[`render`]** — Backend boundary, materialization, headless backend, snapshots
//! - **[`widgets`]** — Labels, buttons and container builders
//!
//! ```ignore
//! use trellis::render::Headless;
//! use trellis::Ui;
//!
//! let mut ui = Ui::new(Headless::new());
//! let app = ui.new_app(Some("demo"));
//! let main = ui.stack(app, Some("Main"))?;
//! let hello = ui.new_label("Hello");
//! ui.add_child(main, hello, None, None, None)?;
//! ui.mount(app)?;
//! ```

// Foundation
pub mod error;
pub mod identity;

// Widget system
pub mod container;
pub mod widget;
pub mod widgets;

// Data tables
pub mod data;

// Events
pub mod event;

// Rendering
pub mod render;

// Engine
pub mod ui;

pub use container::{CellAlignment, CellSizing, ChildRef, ContainerSizing, StackFlavor};
pub use data::{DataColumnSpec, DataQuery, DataResponse, RefreshOutcome, RefreshPolicy, SortOrder, TableDataProvider};
pub use error::{ProviderError, UiError};
pub use event::{handler, Signal};
pub use identity::{IdAllocator, WidgetId};
pub use ui::{Ui, UiConfig};
pub use widget::{Flavor, WidgetKey};
