//! Widget node: the per-widget record stored in the `Ui` arena.

use std::cell::OnceCell;

use slotmap::new_key_type;

use super::kind::WidgetKind;
use crate::container::ChildHost;
use crate::event::SignalTable;
use crate::identity::WidgetId;
use crate::render::backend::NodeHandle;

new_key_type! {
    /// Arena handle of a widget. Copy, lightweight; never reused after disposal.
    pub struct WidgetKey;
}

/// State of one widget.
#[derive(Debug)]
pub struct WidgetNode {
    /// Assigned on first access.
    pub(crate) identity: OnceCell<WidgetId>,
    pub(crate) label: Option<String>,
    pub(crate) active: bool,
    pub(crate) displayed: bool,
    /// Dirty flag: the cached node is stale.
    pub(crate) changed: bool,
    pub(crate) materialized: Option<NodeHandle>,
    pub(crate) signals: SignalTable,
    pub(crate) parent: Option<WidgetKey>,
    /// Present for every kind that hosts children.
    pub(crate) host: Option<ChildHost>,
    pub(crate) kind: WidgetKind,
}

impl WidgetNode {
    /// Create a fresh, active, displayed, never-materialized node.
    pub fn new(kind: WidgetKind, label: Option<String>) -> Self {
        let host = kind
            .hosts_children()
            .then(|| ChildHost::new(kind.default_alignment()));
        Self {
            identity: OnceCell::new(),
            label,
            active: true,
            displayed: true,
            changed: false,
            materialized: None,
            signals: SignalTable::new(),
            parent: None,
            host,
            kind,
        }
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_materialized(&self) -> bool {
        self.materialized.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::CellAlignment;
    use crate::widget::kind::Flavor;

    #[test]
    fn new_defaults() {
        let node = WidgetNode::new(WidgetKind::Label, Some("hi".into()));
        assert_eq!(node.label(), Some("hi"));
        assert!(node.active);
        assert!(node.displayed);
        assert!(!node.changed);
        assert!(!node.is_materialized());
        assert!(node.host.is_none());
        assert!(node.identity.get().is_none());
    }

    #[test]
    fn containers_get_a_host_with_flavor_alignment() {
        let node = WidgetNode::new(WidgetKind::Container(Flavor::ActionBar), None);
        let host = node.host.as_ref().unwrap();
        assert!(host.is_empty());
        assert_eq!(host.alignment, CellAlignment::End);
    }

    #[test]
    fn widget_key_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<WidgetKey>();
    }
}
