//! The provider contract, and its type-erased form stored by tables.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use super::query::{DataColumnSpec, DataQuery, DataResponse, ResponseMeta};
use crate::error::{ProviderError, UiError};
use crate::ui::Ui;
use crate::widget::WidgetKey;

/// Supplies a table with pages of items and turns each item into a row.
///
/// ```ignore
/// impl TableDataProvider for Colors {
///     type Item = Color;
///
///     async fn query(&self, query: DataQuery) -> Result<DataResponse<Color>, ProviderError> {
///         Ok(DataResponse::new(self.page(&query)))
///     }
///
///     fn column_spec(&self) -> Vec<DataColumnSpec> {
///         vec![DataColumnSpec::new("name").sortable()]
///     }
///
///     fn create_row(&self, ui: &mut Ui, row: WidgetKey, item: &Color) -> Result<(), UiError> {
///         let label = ui.new_label(&item.name);
///         ui.add_child(row, label, None, None, None).map(drop)
///     }
/// }
/// ```
pub trait TableDataProvider: 'static {
    type Item: 'static;

    /// Fetch one page. The response must satisfy [`DataResponse::validate`].
    fn query(&self, query: DataQuery) -> impl Future<Output = Result<DataResponse<Self::Item>, ProviderError>>;

    /// Columns, in display order.
    fn column_spec(&self) -> Vec<DataColumnSpec>;

    /// Populate a freshly created row with the widgets for `item`.
    fn create_row(&self, ui: &mut Ui, row: WidgetKey, item: &Self::Item) -> Result<(), UiError>;
}

pub(crate) type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Populates one row; bound to its item and provider.
pub(crate) type RowBuilder = Box<dyn FnOnce(&mut Ui, WidgetKey) -> Result<(), UiError>>;

/// A validated response whose items are already bound to row builders.
pub(crate) struct FetchedPage {
    pub(crate) meta: ResponseMeta,
    pub(crate) rows: Vec<RowBuilder>,
}

pub(crate) trait ErasedProvider {
    fn fetch(&self, query: DataQuery) -> LocalBoxFuture<Result<FetchedPage, ProviderError>>;
    fn column_spec(&self) -> Vec<DataColumnSpec>;
}

pub(crate) struct Erased<P>(pub(crate) Rc<P>);

impl<P: TableDataProvider> ErasedProvider for Erased<P> {
    fn fetch(&self, query: DataQuery) -> LocalBoxFuture<Result<FetchedPage, ProviderError>> {
        let provider = Rc::clone(&self.0);
        Box::pin(async move {
            let response = provider.query(query).await?;
            response.validate()?;
            let (meta, items) = response.into_parts();
            let rows = items
                .into_iter()
                .map(|item| {
                    let provider = Rc::clone(&provider);
                    Box::new(move |ui: &mut Ui, row: WidgetKey| provider.create_row(ui, row, &item)) as RowBuilder
                })
                .collect();
            Ok(FetchedPage { meta, rows })
        })
    }

    fn column_spec(&self) -> Vec<DataColumnSpec> {
        self.0.column_spec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::Headless;

    struct Numbers {
        lie_about_count: bool,
    }

    impl TableDataProvider for Numbers {
        type Item = u32;

        async fn query(&self, _query: DataQuery) -> Result<DataResponse<u32>, ProviderError> {
            let mut response = DataResponse::new(vec![1, 2, 3]);
            if self.lie_about_count {
                response.count = 10;
            }
            Ok(response)
        }

        fn column_spec(&self) -> Vec<DataColumnSpec> {
            vec![DataColumnSpec::new("n")]
        }

        fn create_row(&self, ui: &mut Ui, row: WidgetKey, item: &u32) -> Result<(), UiError> {
            ui.set_label(row, item.to_string())
        }
    }

    #[test]
    fn fetch_binds_rows_to_items() {
        let erased = Erased(Rc::new(Numbers { lie_about_count: false }));
        let page = tokio_test::block_on(erased.fetch(DataQuery::new())).unwrap();
        assert_eq!(page.meta.count, 3);
        assert_eq!(page.rows.len(), 3);

        let mut ui = Ui::new(Headless::new());
        let row = ui.new_label("");
        let first = page.rows.into_iter().next().unwrap();
        first(&mut ui, row).unwrap();
        assert_eq!(ui.label(row).unwrap(), Some("1"));
    }

    #[test]
    fn fetch_rejects_invalid_responses() {
        let erased = Erased(Rc::new(Numbers { lie_about_count: true }));
        let result = tokio_test::block_on(erased.fetch(DataQuery::new()));
        assert!(matches!(result, Err(ProviderError::InvalidResponse { count: 10, items: 3, .. })));
    }

    #[test]
    fn column_spec_passes_through() {
        let erased = Erased(Rc::new(Numbers { lie_about_count: false }));
        assert_eq!(erased.column_spec(), vec![DataColumnSpec::new("n")]);
    }
}
