//! Error types for widget, container and data-table operations.

use crate::container::ChildRef;
use crate::widget::WidgetKey;

/// Errors reported by [`Ui`](crate::ui::Ui) operations.
///
/// Every variant is a local, caller-recoverable condition.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// The widget was disposed (or its key never belonged to this `Ui`).
    #[error("widget {0:?} has been disposed")]
    Disposed(WidgetKey),

    /// A container operation was invoked on a leaf widget.
    #[error("widget {0:?} cannot host children")]
    NotAContainer(WidgetKey),

    /// A stack operation was invoked on a widget that is not a stack.
    #[error("widget {0:?} is not a container stack")]
    NotAStack(WidgetKey),

    /// A table operation was invoked on a widget that is not a table.
    #[error("widget {0:?} is not a table view")]
    NotATable(WidgetKey),

    /// No live child matches the given reference.
    #[error("no child matching {child:?} in container {container:?}")]
    ChildNotFound {
        container: WidgetKey,
        child: ChildRef,
    },

    /// The widget is already owned by another container.
    #[error("widget {child:?} already belongs to container {parent:?}")]
    AlreadyParented { child: WidgetKey, parent: WidgetKey },

    /// Adding the child would make a container own itself.
    #[error("widget {0:?} cannot be added beneath itself")]
    CyclicChild(WidgetKey),

    /// Children can only be appended; explicit out-of-order insertion is unsupported.
    #[error("explicit child position {requested} is unsupported (next position is {next})")]
    ExplicitPosition { requested: usize, next: usize },

    /// Closing or disposing the only remaining history entry.
    #[error("cannot close the last entry of stack {0:?}")]
    LastHistoryEntry(WidgetKey),

    /// `display` was called while a repaint pass is running.
    #[error("cannot change the displayed child of {0:?} during a repaint")]
    DisplayDuringRepaint(WidgetKey),

    /// The table has no column with this field name.
    #[error("table has no column named {0:?}")]
    UnknownColumn(String),

    /// The column exists but is not sortable.
    #[error("column {0:?} is not sortable")]
    ColumnNotSortable(String),

    /// The data provider failed to answer a refresh.
    #[error("data provider query failed")]
    Fetch(#[from] ProviderError),
}

/// Errors produced by a [`TableDataProvider`](crate::data::TableDataProvider).
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The data source could not be reached or refused the query.
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    /// The response breaks the protocol invariants.
    #[error("invalid response: count {count}, {items} items, total {total:?}")]
    InvalidResponse {
        count: usize,
        items: usize,
        total: Option<u64>,
    },

    /// The provider did not answer within the configured refresh timeout.
    #[error("data source did not answer within {0:?}")]
    TimedOut(std::time::Duration),

    /// Any other provider-specific failure.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + 'static>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_converts_into_fetch() {
        let err: UiError = ProviderError::Unavailable("offline".into()).into();
        assert!(matches!(err, UiError::Fetch(ProviderError::Unavailable(_))));
        assert_eq!(err.to_string(), "data provider query failed");
    }

    #[test]
    fn explicit_position_message() {
        let err = UiError::ExplicitPosition {
            requested: 0,
            next: 3,
        };
        assert_eq!(
            err.to_string(),
            "explicit child position 0 is unsupported (next position is 3)"
        );
    }

    #[test]
    fn invalid_response_message() {
        let err = ProviderError::InvalidResponse {
            count: 2,
            items: 3,
            total: None,
        };
        assert_eq!(err.to_string(), "invalid response: count 2, 3 items, total None");
    }
}
