//! The `Ui` engine object and its configuration.
//!
//! [`Ui`] owns the widget arena, the injected rendering backend, the identity
//! allocator and the repaint queue. Every widget, container, stack and table
//! operation is a method on `Ui` taking the [`WidgetKey`] it acts upon; the
//! methods are spread over the modules that define each concern.
//!
//! A `Ui` is single-threaded (`!Send`): handlers and data providers are
//! reference-counted, so no two logical flows can mutate the same container
//! concurrently.

use std::time::Duration;

use slotmap::SlotMap;
use tracing::trace;

use crate::data::table::RefreshPolicy;
use crate::error::UiError;
use crate::event::RepaintQueue;
use crate::identity::IdAllocator;
use crate::render::backend::Backend;
use crate::widget::{WidgetKey, WidgetKind, WidgetNode};

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Ui`].
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// What to do with a table refresh that resolves after a newer one was issued.
    pub refresh_policy: RefreshPolicy,
    /// Page size applied to new tables whose initial query has no limit.
    pub default_page_limit: Option<u32>,
    /// Tab label for notebook pages without a label.
    pub tab_fallback_label: String,
    /// Upper bound on a provider answer awaited by [`Ui::refresh_now`].
    pub refresh_timeout: Option<Duration>,
    /// Identity allocator to share; a fresh one is created when `None`.
    pub ids: Option<IdAllocator>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_policy: RefreshPolicy::default(),
            default_page_limit: None,
            tab_fallback_label: "Page".to_owned(),
            refresh_timeout: None,
            ids: None,
        }
    }
}

impl UiConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the refresh policy (builder).
    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    /// Set the default page limit (builder).
    pub fn with_default_page_limit(mut self, limit: u32) -> Self {
        self.default_page_limit = Some(limit);
        self
    }

    /// Set the fallback tab label (builder).
    pub fn with_tab_fallback_label(mut self, label: impl Into<String>) -> Self {
        self.tab_fallback_label = label.into();
        self
    }

    /// Bound the wait in [`Ui::refresh_now`] (builder).
    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = Some(timeout);
        self
    }

    /// Share an identity allocator (builder).
    pub fn with_ids(mut self, ids: IdAllocator) -> Self {
        self.ids = Some(ids);
        self
    }
}

// ---------------------------------------------------------------------------
// Ui
// ---------------------------------------------------------------------------

/// The widget engine.
pub struct Ui {
    pub(crate) widgets: SlotMap<WidgetKey, WidgetNode>,
    pub(crate) backend: Box<dyn Backend>,
    pub(crate) ids: IdAllocator,
    pub(crate) config: UiConfig,
    pub(crate) queue: RepaintQueue,
    /// Set while a repaint pass runs.
    pub(crate) repainting: bool,
}

impl Ui {
    /// Create an engine rendering through `backend`, with default config.
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self::with_config(backend, UiConfig::default())
    }

    /// Create an engine with an explicit config.
    pub fn with_config(backend: impl Backend + 'static, config: UiConfig) -> Self {
        let ids = config.ids.clone().unwrap_or_default();
        Self {
            widgets: SlotMap::with_key(),
            backend: Box::new(backend),
            ids,
            config,
            queue: RepaintQueue::new(),
            repainting: false,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// The rendering backend.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// The rendering backend, downcast to its concrete type.
    pub fn backend_as<T: 'static>(&self) -> Option<&T> {
        self.backend.as_any().downcast_ref::<T>()
    }

    /// Mutable access to the concrete backend.
    pub fn backend_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.backend.as_any_mut().downcast_mut::<T>()
    }

    /// Whether `key` is a live widget.
    pub fn contains(&self, key: WidgetKey) -> bool {
        self.widgets.contains_key(key)
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether no widget is alive.
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Read access to a widget's node.
    pub fn node(&self, key: WidgetKey) -> Result<&WidgetNode, UiError> {
        self.widgets.get(key).ok_or(UiError::Disposed(key))
    }

    pub(crate) fn node_mut(&mut self, key: WidgetKey) -> Result<&mut WidgetNode, UiError> {
        self.widgets.get_mut(key).ok_or(UiError::Disposed(key))
    }

    /// Create a widget of the given kind.
    pub fn create(&mut self, kind: WidgetKind, label: Option<&str>) -> WidgetKey {
        let key = self
            .widgets
            .insert(WidgetNode::new(kind, label.map(str::to_owned)));
        trace!(?key, "widget created");
        key
    }

    /// Whether a repaint pass is currently running.
    pub fn is_repainting(&self) -> bool {
        self.repainting
    }

    /// Number of widgets waiting for a repaint.
    pub fn pending_repaints(&self) -> usize {
        self.queue.pending_count()
    }

    /// Drain the repaint queue, repainting every queued widget that is still
    /// dirty. Returns how many repaints ran.
    pub fn flush(&mut self) -> Result<usize, UiError> {
        let mut repainted = 0;
        loop {
            let pending = self.queue.drain();
            if pending.is_empty() {
                break;
            }
            for key in pending {
                let dirty = self.widgets.get(key).is_some_and(|node| node.changed);
                if dirty {
                    self.repaint(key)?;
                    repainted += 1;
                }
            }
        }
        Ok(repainted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::headless::Headless;

    #[test]
    fn config_builders() {
        let ids = IdAllocator::starting_at(5);
        let config = UiConfig::new()
            .with_refresh_policy(RefreshPolicy::LatestResolved)
            .with_default_page_limit(25)
            .with_tab_fallback_label("Tab")
            .with_refresh_timeout(Duration::from_millis(250))
            .with_ids(ids);
        assert_eq!(config.refresh_policy, RefreshPolicy::LatestResolved);
        assert_eq!(config.default_page_limit, Some(25));
        assert_eq!(config.tab_fallback_label, "Tab");
        assert_eq!(config.refresh_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.ids.unwrap().peek(), 5);
    }

    #[test]
    fn config_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.refresh_policy, RefreshPolicy::DiscardStale);
        assert!(config.default_page_limit.is_none());
        assert_eq!(config.tab_fallback_label, "Page");
    }

    #[test]
    fn create_and_lookup() {
        let mut ui = Ui::new(Headless::new());
        assert!(ui.is_empty());
        let key = ui.create(WidgetKind::Label, Some("hi"));
        assert!(ui.contains(key));
        assert_eq!(ui.len(), 1);
        assert_eq!(ui.node(key).unwrap().label(), Some("hi"));
    }

    #[test]
    fn backend_downcast() {
        let ui = Ui::new(Headless::new());
        assert!(ui.backend_as::<Headless>().is_some());
        assert!(ui.backend_as::<String>().is_none());
    }

    #[test]
    fn flush_with_nothing_pending() {
        let mut ui = Ui::new(Headless::new());
        assert_eq!(ui.flush().unwrap(), 0);
        assert!(!ui.is_repainting());
    }
}
