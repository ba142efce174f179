//! Widget lifecycle: identity, state mutation, materialization, repaint, dispose.
//!
//! Mutations mark the widget dirty. A dirty widget that is already
//! materialized and displayed is queued for repaint; [`Ui::flush`] drains the
//! queue. Repaint recurses into children first so unchanged subtrees keep
//! their cached node, then rebuilds the dirty widget and swaps the new node in
//! where the old one was attached.

use tracing::{debug, trace};

use super::kind::WidgetKind;
use super::node::WidgetKey;
use crate::container::{ChildHost, ChildRef};
use crate::error::UiError;
use crate::event::{Handler, Signal};
use crate::identity::WidgetId;
use crate::render::backend::NodeHandle;
use crate::ui::Ui;

impl Ui {
    // -----------------------------------------------------------------------
    // Identity and state
    // -----------------------------------------------------------------------

    /// Stable identity of a widget, allocated on first call.
    pub fn identity(&self, key: WidgetKey) -> Result<WidgetId, UiError> {
        let node = self.node(key)?;
        Ok(*node.identity.get_or_init(|| self.ids.allocate()))
    }

    /// The widget's label.
    pub fn label(&self, key: WidgetKey) -> Result<Option<&str>, UiError> {
        Ok(self.node(key)?.label())
    }

    /// Change the label and mark the widget dirty.
    pub fn set_label(&mut self, key: WidgetKey, label: impl Into<String>) -> Result<(), UiError> {
        self.node_mut(key)?.label = Some(label.into());
        self.mark_changed(key)
    }

    pub fn is_displayed(&self, key: WidgetKey) -> Result<bool, UiError> {
        Ok(self.node(key)?.displayed)
    }

    pub fn is_hidden(&self, key: WidgetKey) -> Result<bool, UiError> {
        Ok(!self.node(key)?.displayed)
    }

    /// Display the widget.
    ///
    /// A stack child is displayed through its stack, which hides the others.
    pub fn show(&mut self, key: WidgetKey) -> Result<(), UiError> {
        match self.stack_of(key)? {
            Some(stack) => {
                self.display(stack, key)?;
            }
            None => self.set_displayed(key, true)?,
        }
        self.dispatch(key, Signal::Shown)?;
        Ok(())
    }

    /// Hide the widget. It still materializes on demand, flagged invisible.
    ///
    /// The current child of a stack stays displayed; switch the stack instead.
    pub fn hide(&mut self, key: WidgetKey) -> Result<(), UiError> {
        if let Some(stack) = self.stack_of(key)? {
            if self.current(stack)? == Some(key) {
                trace!(?key, ?stack, "hide ignored for current stack child");
                return Ok(());
            }
        }
        self.set_displayed(key, false)?;
        self.dispatch(key, Signal::Hidden)?;
        Ok(())
    }

    pub(crate) fn set_displayed(&mut self, key: WidgetKey, displayed: bool) -> Result<(), UiError> {
        let node = self.node_mut(key)?;
        node.displayed = displayed;
        let cached = node.materialized;
        if let Some(handle) = cached {
            self.backend.set_visible(handle, displayed);
        }
        self.mark_changed(key)
    }

    pub fn is_active(&self, key: WidgetKey) -> Result<bool, UiError> {
        Ok(self.node(key)?.active)
    }

    pub fn is_disabled(&self, key: WidgetKey) -> Result<bool, UiError> {
        Ok(!self.node(key)?.active)
    }

    /// Enable user interaction.
    pub fn activate(&mut self, key: WidgetKey) -> Result<(), UiError> {
        self.set_active(key, true)
    }

    /// Disable user interaction.
    pub fn deactivate(&mut self, key: WidgetKey) -> Result<(), UiError> {
        self.set_active(key, false)
    }

    fn set_active(&mut self, key: WidgetKey, active: bool) -> Result<(), UiError> {
        let node = self.node_mut(key)?;
        node.active = active;
        let is_control = matches!(node.kind, WidgetKind::Button);
        let cached = node.materialized;
        // Form controls reflect the change right away, before any repaint.
        if let (true, Some(handle)) = (is_control, cached) {
            self.backend.set_active(handle, active);
        }
        self.mark_changed(key)
    }

    /// Whether the widget changed since its last materialization.
    pub fn has_changed(&self, key: WidgetKey) -> Result<bool, UiError> {
        Ok(self.node(key)?.changed)
    }

    /// Mark the widget dirty and queue a repaint if it is on screen.
    pub(crate) fn mark_changed(&mut self, key: WidgetKey) -> Result<(), UiError> {
        let node = self.node_mut(key)?;
        node.changed = true;
        if node.materialized.is_some() && node.displayed {
            self.queue.push(key);
        }
        Ok(())
    }

    /// The container owning this widget, if any.
    pub fn parent(&self, key: WidgetKey) -> Result<Option<WidgetKey>, UiError> {
        Ok(self.node(key)?.parent)
    }

    // -----------------------------------------------------------------------
    // Materialization
    // -----------------------------------------------------------------------

    /// The widget's platform node, built lazily.
    ///
    /// A clean cached node is reused verbatim. A missing or stale node is
    /// rebuilt; a stale one is then swapped out for the new one. Visibility is
    /// applied on every call.
    pub fn materialized(&mut self, key: WidgetKey) -> Result<NodeHandle, UiError> {
        let node = self.node(key)?;
        let (cached, changed) = (node.materialized, node.changed);
        let handle = match cached {
            Some(handle) if !changed => handle,
            previous => {
                let fresh = self.materialize(key)?;
                let node = self.node_mut(key)?;
                node.materialized = Some(fresh);
                node.changed = false;
                if let Some(old) = previous {
                    self.backend.replace(old, fresh);
                }
                self.queue.forget(key);
                trace!(?key, "materialized");
                fresh
            }
        };
        let displayed = self.node(key)?.displayed;
        self.backend.set_visible(handle, displayed);
        Ok(handle)
    }

    /// Rebuild the widget if it is dirty, children first.
    ///
    /// Clean widgets and widgets that were never materialized are left alone.
    pub fn repaint(&mut self, key: WidgetKey) -> Result<(), UiError> {
        self.node(key)?;
        let outer = std::mem::replace(&mut self.repainting, true);
        let result = self.repaint_subtree(key);
        self.repainting = outer;
        result
    }

    fn repaint_subtree(&mut self, key: WidgetKey) -> Result<(), UiError> {
        let children = self
            .node(key)?
            .host
            .as_ref()
            .map(ChildHost::keys)
            .unwrap_or_default();
        for child in children {
            if self.contains(child) {
                self.repaint_subtree(child)?;
            }
        }

        let node = self.node(key)?;
        if !node.changed || node.materialized.is_none() {
            return Ok(());
        }
        debug!(?key, "repaint");
        self.materialized(key)?;
        self.dispatch(key, Signal::Repainted)?;
        Ok(())
    }

    /// Materialize a top-level widget and attach it to the platform surface.
    pub fn mount(&mut self, key: WidgetKey) -> Result<NodeHandle, UiError> {
        let handle = self.materialized(key)?;
        self.backend.mount(handle);
        debug!(?key, "mounted");
        Ok(handle)
    }

    // -----------------------------------------------------------------------
    // Disposal
    // -----------------------------------------------------------------------

    /// Dispose the widget, its children and its platform node.
    ///
    /// A widget owned by a container is removed from it first. The key is
    /// dead afterwards.
    pub fn dispose(&mut self, key: WidgetKey) -> Result<(), UiError> {
        let parent = self.node(key)?.parent;
        match parent {
            Some(parent) => self.remove_child(parent, ChildRef::Key(key)),
            None => self.dispose_subtree(key),
        }
    }

    pub(crate) fn dispose_subtree(&mut self, key: WidgetKey) -> Result<(), UiError> {
        let cells = self
            .node_mut(key)?
            .host
            .as_mut()
            .map(ChildHost::take_all)
            .unwrap_or_default();
        for cell in cells {
            if self.contains(cell.child) {
                self.dispose_subtree(cell.child)?;
            }
        }

        self.dispatch(key, Signal::Disposed)?;
        if let Some(node) = self.widgets.remove(key) {
            if let Some(handle) = node.materialized {
                self.backend.release(handle);
            }
        }
        self.queue.forget(key);
        trace!(?key, "disposed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Signals
    // -----------------------------------------------------------------------

    /// Register a handler. Returns `false` if it was already connected.
    pub fn connect(&mut self, key: WidgetKey, signal: Signal, handler: Handler) -> Result<bool, UiError> {
        Ok(self.node_mut(key)?.signals.connect(signal, handler))
    }

    /// Remove a handler. Returns `false` if it was not connected.
    pub fn disconnect(&mut self, key: WidgetKey, signal: Signal, handler: &Handler) -> Result<bool, UiError> {
        Ok(self.node_mut(key)?.signals.disconnect(signal, handler))
    }

    /// Run the handlers of `signal` on `key`, in registration order.
    ///
    /// Returns the number of handlers run.
    pub fn dispatch(&mut self, key: WidgetKey, signal: Signal) -> Result<usize, UiError> {
        let handlers = self.node(key)?.signals.handlers(signal);
        for handler in &handlers {
            handler(self, key);
        }
        Ok(handlers.len())
    }

    /// Deliver a user click. Disabled widgets ignore it.
    pub fn click(&mut self, key: WidgetKey) -> Result<bool, UiError> {
        if !self.node(key)?.active {
            return Ok(false);
        }
        self.dispatch(key, Signal::Clicked)?;
        Ok(true)
    }
}
