//! The data query/response protocol between tables and their providers.
//!
//! Both sides serialize with camelCase field names so a provider can forward
//! a [`DataQuery`] to a remote service unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    /// Next order of a column: unsorted columns start ascending.
    pub fn toggle(current: Option<SortOrder>) -> SortOrder {
        current.map_or(SortOrder::Asc, SortOrder::toggled)
    }
}

/// A filter value: one string or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::One(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::One(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }
}

/// Arbitrary filters, keyed by name.
pub type FilterQuery = BTreeMap<String, FilterValue>;

// ---------------------------------------------------------------------------
// DataQuery
// ---------------------------------------------------------------------------

/// What a table asks its provider for. Every field is optional; absent
/// fields are inherited from the previous query on refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    /// 1-based page; absent means the first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page; absent or 0 lets the provider decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<FilterQuery>,
}

impl DataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_column = Some(column.into());
        self.sort_order = Some(order);
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.query
            .get_or_insert_with(FilterQuery::new)
            .insert(name.into(), value.into());
        self
    }

    /// Overlay `self` on `prior`: each field present here wins, each absent
    /// one is inherited. Filters are replaced as a whole, never merged. A page
    /// below 1 is raised to 1.
    pub fn merge_over(self, prior: &DataQuery) -> DataQuery {
        DataQuery {
            page: self.page.or(prior.page).map(|page| page.max(1)),
            limit: self.limit.or(prior.limit),
            sort_column: self.sort_column.or_else(|| prior.sort_column.clone()),
            sort_order: self.sort_order.or(prior.sort_order),
            query: self.query.or_else(|| prior.query.clone()),
        }
    }

    /// The page to fetch, at least 1.
    pub fn effective_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

// ---------------------------------------------------------------------------
// DataResponse
// ---------------------------------------------------------------------------

/// What a provider answers: one page of items plus paging metadata and the
/// sort it actually applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Total number of items across all pages, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Number of items in this page.
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    pub items: Vec<T>,
}

impl<T> DataResponse<T> {
    /// A response carrying `items`, with `count` set to match.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            page: None,
            limit: None,
            total: None,
            count: items.len(),
            sort_column: None,
            sort_order: None,
            items,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Echo the sort the provider applied.
    pub fn with_sort(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.sort_column = Some(column.into());
        self.sort_order = Some(order);
        self
    }

    /// Check `count == items.len()` and `total >= count`.
    pub fn validate(&self) -> Result<(), ProviderError> {
        let items = self.items.len();
        let total_ok = self.total.is_none_or(|total| total >= self.count as u64);
        if self.count != items || !total_ok {
            return Err(ProviderError::InvalidResponse {
                count: self.count,
                items,
                total: self.total,
            });
        }
        Ok(())
    }

    /// Split into metadata and items.
    pub fn into_parts(self) -> (ResponseMeta, Vec<T>) {
        let meta = ResponseMeta {
            page: self.page,
            limit: self.limit,
            total: self.total,
            count: self.count,
            sort_column: self.sort_column,
            sort_order: self.sort_order,
        };
        (meta, self.items)
    }
}

/// A response without its items, as kept by the table after a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
    pub count: usize,
    pub sort_column: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ResponseMeta {
    /// 1-based page number.
    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Number of pages, when both total and a non-zero limit are known.
    pub fn page_count(&self) -> Option<u64> {
        match (self.total, self.limit) {
            (Some(total), Some(limit)) if limit > 0 => Some(total.div_ceil(u64::from(limit)).max(1)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// DataColumnSpec
// ---------------------------------------------------------------------------

/// One column of a table, as declared by its provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataColumnSpec {
    /// Technical name, used as the sort column.
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub sortable: bool,
}

impl DataColumnSpec {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: None,
            sortable: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Header text: the label, falling back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }
}
