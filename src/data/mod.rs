//! Data-backed widgets: the query protocol, providers and the table view.

pub mod provider;
pub mod query;
pub mod table;

pub use provider::TableDataProvider;
pub use query::{DataColumnSpec, DataQuery, DataResponse, FilterQuery, FilterValue, ResponseMeta, SortOrder};
pub use table::{PendingRefresh, RefreshOutcome, RefreshPolicy, ResolvedRefresh, TableState};
