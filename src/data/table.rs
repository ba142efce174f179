//! Data-backed table view.
//!
//! A table is a container of [`Flavor::TableRow`] rows filled from a
//! [`TableDataProvider`]. [`Ui::refresh`] merges a partial query over the
//! stored one and returns a [`PendingRefresh`] future; once it resolves,
//! [`Ui::apply_refresh`] builds the rows and repaints once.
//!
//! Refreshes are numbered. When several overlap, [`RefreshPolicy`] decides
//! whether a late answer to an older query is still applied. Applying always
//! replaces the rows present, so rows of two responses never mix.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use tracing::{debug, warn};

use super::provider::{Erased, ErasedProvider, FetchedPage, LocalBoxFuture, TableDataProvider};
use super::query::{DataColumnSpec, DataQuery, ResponseMeta, SortOrder};
use crate::container::{CellAlignment, CellSizing};
use crate::error::{ProviderError, UiError};
use crate::event::Signal;
use crate::render::backend::NodeHandle;
use crate::ui::Ui;
use crate::widget::{Flavor, WidgetKey, WidgetKind};

/// What to do with a refresh that resolves after a newer one was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Drop it; only the latest refresh may fill the table.
    #[default]
    DiscardStale,
    /// Apply every resolution in arrival order.
    LatestResolved,
}

// ---------------------------------------------------------------------------
// TableState
// ---------------------------------------------------------------------------

/// Per-table state, held in the widget's [`WidgetKind::Table`].
pub struct TableState {
    provider: Rc<dyn ErasedProvider>,
    columns: Vec<DataColumnSpec>,
    query: DataQuery,
    response: Option<ResponseMeta>,
    sort_orders: HashMap<String, SortOrder>,
    /// Header nodes of the last materialization, by column field.
    pub(crate) headers: Vec<(String, NodeHandle)>,
    issued: u64,
    applied: u64,
}

impl TableState {
    pub fn columns(&self) -> &[DataColumnSpec] {
        &self.columns
    }

    /// The query the next refresh merges over.
    pub fn query(&self) -> &DataQuery {
        &self.query
    }

    /// Metadata of the last applied response.
    pub fn response(&self) -> Option<&ResponseMeta> {
        self.response.as_ref()
    }

    /// Last order chosen for `field`, whether or not it is the active sort.
    pub fn sort_order(&self, field: &str) -> Option<SortOrder> {
        self.sort_orders.get(field).copied()
    }

    /// Sequence number of the latest refresh issued.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    /// Sequence number of the latest refresh applied.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Sort indicator of a header: set on the active sort column only.
    pub(crate) fn indicator(&self, field: &str) -> Option<SortOrder> {
        if self.query.sort_column.as_deref() == Some(field) {
            self.query.sort_order
        } else {
            None
        }
    }
}

impl fmt::Debug for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableState")
            .field("columns", &self.columns)
            .field("query", &self.query)
            .field("response", &self.response)
            .field("issued", &self.issued)
            .field("applied", &self.applied)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Refresh futures
// ---------------------------------------------------------------------------

/// An issued refresh, waiting on the provider.
pub struct PendingRefresh {
    table: WidgetKey,
    seq: u64,
    query: DataQuery,
    fetch: LocalBoxFuture<Result<FetchedPage, ProviderError>>,
}

impl PendingRefresh {
    pub fn table(&self) -> WidgetKey {
        self.table
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The merged query sent to the provider.
    pub fn query(&self) -> &DataQuery {
        &self.query
    }
}

impl Future for PendingRefresh {
    type Output = ResolvedRefresh;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<ResolvedRefresh> {
        let this = &mut *self;
        this.fetch.as_mut().poll(cx).map(|result| ResolvedRefresh {
            table: this.table,
            seq: this.seq,
            result,
        })
    }
}

impl fmt::Debug for PendingRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingRefresh")
            .field("table", &self.table)
            .field("seq", &self.seq)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

/// A provider answer, ready for [`Ui::apply_refresh`].
pub struct ResolvedRefresh {
    table: WidgetKey,
    seq: u64,
    result: Result<FetchedPage, ProviderError>,
}

impl ResolvedRefresh {
    pub fn table(&self) -> WidgetKey {
        self.table
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Debug for ResolvedRefresh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRefresh")
            .field("table", &self.table)
            .field("seq", &self.seq)
            .field("ok", &self.result.is_ok())
            .finish()
    }
}

/// What [`Ui::apply_refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The rows were replaced.
    Applied { rows: usize },
    /// The answer belonged to an older refresh and was dropped.
    Discarded { seq: u64, latest: u64 },
}

// ---------------------------------------------------------------------------
// Ui operations
// ---------------------------------------------------------------------------

impl Ui {
    /// Create a table fed by `provider`.
    ///
    /// The initial query's limit falls back to
    /// [`UiConfig::default_page_limit`](crate::ui::UiConfig::default_page_limit).
    /// Nothing is fetched until the first [`refresh`](Ui::refresh).
    pub fn new_table<P: TableDataProvider>(&mut self, provider: Rc<P>, query: DataQuery) -> WidgetKey {
        let mut query = query;
        if query.limit.is_none() {
            query.limit = self.config.default_page_limit;
        }
        let mut sort_orders = HashMap::new();
        if let (Some(column), Some(order)) = (&query.sort_column, query.sort_order) {
            sort_orders.insert(column.clone(), order);
        }
        let provider: Rc<dyn ErasedProvider> = Rc::new(Erased(provider));
        let columns = provider.column_spec();
        let state = TableState {
            provider,
            columns,
            query,
            response: None,
            sort_orders,
            headers: Vec::new(),
            issued: 0,
            applied: 0,
        };
        self.create(WidgetKind::Table(state), None)
    }

    pub(crate) fn table_state(&self, table: WidgetKey) -> Result<&TableState, UiError> {
        match &self.node(table)?.kind {
            WidgetKind::Table(state) => Ok(state),
            _ => Err(UiError::NotATable(table)),
        }
    }

    pub(crate) fn table_state_mut(&mut self, table: WidgetKey) -> Result<&mut TableState, UiError> {
        match &mut self.node_mut(table)?.kind {
            WidgetKind::Table(state) => Ok(state),
            _ => Err(UiError::NotATable(table)),
        }
    }

    /// Issue a refresh.
    ///
    /// Every field set in `query` replaces the stored one; the merged query
    /// becomes current. The current rows are disposed right away.
    pub fn refresh(&mut self, table: WidgetKey, query: DataQuery) -> Result<PendingRefresh, UiError> {
        let state = self.table_state_mut(table)?;
        let merged = query.merge_over(&state.query);
        state.query = merged.clone();
        state.issued += 1;
        let seq = state.issued;
        let provider = Rc::clone(&state.provider);

        self.remove_all_children_quiet(table)?;
        debug!(?table, seq, query = ?merged, "table refresh issued");
        Ok(PendingRefresh {
            table,
            seq,
            fetch: provider.fetch(merged.clone()),
            query: merged,
        })
    }

    /// Fill the table from a resolved refresh.
    ///
    /// Rows are built first and attached together, then the table repaints
    /// once and dispatches [`Signal::TableDataRefreshed`]. A provider failure
    /// is returned as [`UiError::Fetch`]; it leaves the table empty unless a
    /// newer response was already applied.
    pub fn apply_refresh(&mut self, resolved: ResolvedRefresh) -> Result<RefreshOutcome, UiError> {
        let ResolvedRefresh { table, seq, result } = resolved;
        let state = self.table_state(table)?;
        let (latest, applied) = (state.issued, state.applied);
        if self.config.refresh_policy == RefreshPolicy::DiscardStale && seq < latest {
            debug!(?table, seq, latest, "stale table refresh discarded");
            return Ok(RefreshOutcome::Discarded { seq, latest });
        }

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!(?table, seq, error = %err, "table refresh failed");
                // Rows from a newer applied response stay.
                if seq > applied {
                    self.remove_all_children_quiet(table)?;
                }
                return Err(UiError::Fetch(err));
            }
        };

        let FetchedPage { meta, rows: builders } = page;
        let mut rows = Vec::with_capacity(builders.len());
        for build in builders {
            let row = self.create(WidgetKind::Container(Flavor::TableRow), None);
            if let Err(err) = build(self, row) {
                self.dispose_subtree(row)?;
                for built in rows {
                    self.dispose_subtree(built)?;
                }
                return Err(err);
            }
            rows.push(row);
        }

        self.remove_all_children_quiet(table)?;
        let count = rows.len();
        for row in rows {
            self.add_child_quiet(table, row, CellSizing::default(), CellAlignment::default(), None)?;
        }

        let state = self.table_state_mut(table)?;
        // Only the answer to the last issued query may shape it.
        if seq == latest {
            if let (Some(column), Some(order)) = (&meta.sort_column, meta.sort_order) {
                state.query.sort_column = Some(column.clone());
                state.query.sort_order = Some(order);
                state.sort_orders.insert(column.clone(), order);
            }
        }
        state.response = Some(meta);
        state.applied = seq;

        self.mark_changed(table)?;
        self.repaint(table)?;
        debug!(?table, seq, rows = count, "table refresh applied");
        self.dispatch(table, Signal::TableDataRefreshed)?;
        Ok(RefreshOutcome::Applied { rows: count })
    }

    /// Refresh and apply in one go, honoring
    /// [`UiConfig::refresh_timeout`](crate::ui::UiConfig::refresh_timeout).
    pub async fn refresh_now(&mut self, table: WidgetKey, query: DataQuery) -> Result<RefreshOutcome, UiError> {
        let pending = self.refresh(table, query)?;
        let resolved = match self.config.refresh_timeout {
            Some(limit) => match tokio::time::timeout(limit, pending).await {
                Ok(resolved) => resolved,
                Err(_) => {
                    warn!(?table, ?limit, "table refresh timed out");
                    return Err(UiError::Fetch(ProviderError::TimedOut(limit)));
                }
            },
            None => pending.await,
        };
        self.apply_refresh(resolved)
    }

    /// Flip the sort order of `column` and refresh sorted by it.
    ///
    /// Header indicators are updated on the backend before the refresh is
    /// issued. A column never sorted before starts ascending.
    pub fn toggle_sort(&mut self, table: WidgetKey, column: &str) -> Result<PendingRefresh, UiError> {
        let state = self.table_state(table)?;
        let spec = state
            .columns
            .iter()
            .find(|spec| spec.field == column)
            .ok_or_else(|| UiError::UnknownColumn(column.to_owned()))?;
        if !spec.sortable {
            return Err(UiError::ColumnNotSortable(column.to_owned()));
        }
        let order = SortOrder::toggle(state.sort_order(column));

        let state = self.table_state_mut(table)?;
        state.sort_orders.insert(column.to_owned(), order);
        let headers = state.headers.clone();
        for (field, handle) in headers {
            let indicator = (field == column).then_some(order);
            self.backend.set_sort_indicator(handle, indicator);
        }
        debug!(?table, column, ?order, "table sort toggled");
        self.dispatch(table, Signal::TableSorted)?;

        let query = DataQuery {
            sort_column: Some(column.to_owned()),
            sort_order: Some(order),
            ..DataQuery::default()
        };
        self.refresh(table, query)
    }

    /// Metadata of the last applied response.
    pub fn current_response(&self, table: WidgetKey) -> Result<Option<&ResponseMeta>, UiError> {
        Ok(self.table_state(table)?.response())
    }

    pub fn current_query(&self, table: WidgetKey) -> Result<&DataQuery, UiError> {
        Ok(self.table_state(table)?.query())
    }

    pub fn column_spec(&self, table: WidgetKey) -> Result<&[DataColumnSpec], UiError> {
        Ok(self.table_state(table)?.columns())
    }
}
