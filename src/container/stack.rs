//! Container stacks: containers that display exactly one child at a time.
//!
//! Two flavors exist. An app stack holds windows, shows only the current one
//! and keeps a navigation history of window identities. A notebook holds
//! pages, renders a tab per page and keeps no history.

use tracing::debug;

use super::cell::ChildRef;
use crate::error::UiError;
use crate::event::Signal;
use crate::identity::WidgetId;
use crate::ui::Ui;
use crate::widget::{Flavor, WidgetKey, WidgetKind};

/// Which kind of stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackFlavor {
    /// Application: a stack of windows with navigation history.
    App,
    /// Notebook: a stack of tabbed pages.
    NoteBook,
}

impl StackFlavor {
    pub fn role(self) -> &'static str {
        match self {
            StackFlavor::App => "app",
            StackFlavor::NoteBook => "notebook",
        }
    }

    /// Flavor of the children created by [`Ui::stack`].
    pub fn child_flavor(self) -> Flavor {
        match self {
            StackFlavor::App => Flavor::Window,
            StackFlavor::NoteBook => Flavor::NoteBookPage,
        }
    }

    pub fn keeps_history(self) -> bool {
        matches!(self, StackFlavor::App)
    }
}

/// Selection state of a stack.
#[derive(Debug, Clone)]
pub struct StackState {
    flavor: StackFlavor,
    pub(crate) current: Option<WidgetKey>,
    pub(crate) history: Vec<WidgetId>,
}

impl StackState {
    pub fn new(flavor: StackFlavor) -> Self {
        Self {
            flavor,
            current: None,
            history: Vec::new(),
        }
    }

    pub fn flavor(&self) -> StackFlavor {
        self.flavor
    }

    pub fn current(&self) -> Option<WidgetKey> {
        self.current
    }

    /// Displayed identities, oldest first.
    pub fn history(&self) -> &[WidgetId] {
        &self.history
    }

    /// Push `id` unless it is already on top. No-op for history-less stacks.
    fn record(&mut self, id: WidgetId) {
        if self.flavor.keeps_history() && self.history.last() != Some(&id) {
            self.history.push(id);
        }
    }

    /// Drop every entry of `id`, collapsing the duplicates that leaves behind.
    fn forget(&mut self, id: WidgetId) {
        self.history.retain(|&entry| entry != id);
        self.history.dedup();
    }
}

impl Ui {
    /// Create an application stack.
    pub fn new_app(&mut self, title: Option<&str>) -> WidgetKey {
        self.create(WidgetKind::Stack(StackState::new(StackFlavor::App)), title)
    }

    /// Create a notebook.
    pub fn new_notebook(&mut self) -> WidgetKey {
        self.create(WidgetKind::Stack(StackState::new(StackFlavor::NoteBook)), None)
    }

    pub(crate) fn stack_state(&self, stack: WidgetKey) -> Result<&StackState, UiError> {
        match &self.node(stack)?.kind {
            WidgetKind::Stack(state) => Ok(state),
            _ => Err(UiError::NotAStack(stack)),
        }
    }

    fn stack_state_mut(&mut self, stack: WidgetKey) -> Result<&mut StackState, UiError> {
        match &mut self.node_mut(stack)?.kind {
            WidgetKind::Stack(state) => Ok(state),
            _ => Err(UiError::NotAStack(stack)),
        }
    }

    /// Create a window (app) or page (notebook) and append it to `stack`.
    ///
    /// The first child becomes the displayed one; later children start hidden.
    pub fn stack(&mut self, stack: WidgetKey, label: Option<&str>) -> Result<WidgetKey, UiError> {
        let flavor = self.stack_state(stack)?.flavor();
        let child = self.create(WidgetKind::Container(flavor.child_flavor()), label);
        self.add_child(stack, child, None, None, None)?;
        Ok(child)
    }

    /// The stack `child` belongs to, if its parent is one.
    pub(crate) fn stack_of(&self, child: WidgetKey) -> Result<Option<WidgetKey>, UiError> {
        Ok(self
            .node(child)?
            .parent
            .filter(|&parent| self.stack_state(parent).is_ok()))
    }

    /// The currently displayed child.
    pub fn current(&self, stack: WidgetKey) -> Result<Option<WidgetKey>, UiError> {
        Ok(self.stack_state(stack)?.current)
    }

    /// Navigation history, oldest first. Always empty for notebooks.
    pub fn history(&self, stack: WidgetKey) -> Result<&[WidgetId], UiError> {
        Ok(self.stack_state(stack)?.history())
    }

    /// Make the designated child the displayed one.
    ///
    /// Returns `false` when it already was. Switching is rejected while a
    /// repaint pass runs.
    pub fn display(&mut self, stack: WidgetKey, child: impl Into<ChildRef>) -> Result<bool, UiError> {
        if self.repainting {
            return Err(UiError::DisplayDuringRepaint(stack));
        }
        let child = child.into();
        let current = self.stack_state(stack)?.current;
        let target = self
            .find_child(stack, child)?
            .ok_or(UiError::ChildNotFound { container: stack, child })?
            .child;
        if current == Some(target) {
            return Ok(false);
        }
        self.switch_to(stack, target)?;
        Ok(true)
    }

    /// Go back to the previously displayed window, keeping the current one.
    pub fn close_current(&mut self, stack: WidgetKey) -> Result<(), UiError> {
        let previous = self.pop_history(stack)?;
        self.display(stack, previous)?;
        Ok(())
    }

    /// Go back to the previously displayed window and dispose the current one.
    ///
    /// A notebook disposes its current page and falls back to the first page
    /// left. Its only page is never disposed this way.
    pub fn dispose_current(&mut self, stack: WidgetKey) -> Result<(), UiError> {
        let state = self.stack_state(stack)?;
        let (current, flavor) = (state.current, state.flavor());
        if !flavor.keeps_history() {
            if self.repainting {
                return Err(UiError::DisplayDuringRepaint(stack));
            }
            return match current {
                Some(page) if self.child_keys(stack)?.len() > 1 => self.remove_child(stack, page),
                _ => Err(UiError::LastHistoryEntry(stack)),
            };
        }
        let previous = self.pop_history(stack)?;
        match current {
            Some(current) => self.remove_child(stack, current)?,
            None => {
                self.display(stack, previous)?;
            }
        }
        Ok(())
    }

    /// Pop the top history entry and return the one beneath, leaving the
    /// state untouched when that is impossible.
    fn pop_history(&mut self, stack: WidgetKey) -> Result<WidgetId, UiError> {
        if self.repainting {
            return Err(UiError::DisplayDuringRepaint(stack));
        }
        let state = self.stack_state_mut(stack)?;
        if state.history.len() < 2 {
            return Err(UiError::LastHistoryEntry(stack));
        }
        state.history.pop();
        state
            .history
            .last()
            .copied()
            .ok_or(UiError::LastHistoryEntry(stack))
    }

    fn switch_to(&mut self, stack: WidgetKey, target: WidgetKey) -> Result<(), UiError> {
        let id = self.identity(target)?;
        {
            let state = self.stack_state_mut(stack)?;
            state.current = Some(target);
            state.record(id);
        }
        for other in self.child_keys(stack)? {
            if other != target && self.is_displayed(other)? {
                self.set_displayed(other, false)?;
            }
        }
        self.set_displayed(target, true)?;
        self.sync_tabs(stack)?;
        self.mark_changed(stack)?;
        debug!(?stack, ?target, "stack displayed");
        self.dispatch(stack, Signal::StackDisplayed)?;
        Ok(())
    }

    /// Reflect the current page on already materialized notebook tabs.
    pub(crate) fn sync_tabs(&mut self, stack: WidgetKey) -> Result<(), UiError> {
        let current = self.stack_state(stack)?.current;
        let tabs: Vec<_> = self
            .children(stack)?
            .into_iter()
            .filter_map(|cell| cell.handle.map(|handle| (handle, Some(cell.child) == current)))
            .collect();
        for (handle, selected) in tabs {
            self.backend.set_selected(handle, selected);
        }
        Ok(())
    }

    /// Exclusive display for a freshly added stack child.
    pub(crate) fn on_stack_child_added(&mut self, container: WidgetKey, child: WidgetKey) -> Result<(), UiError> {
        if self.stack_state(container).is_err() {
            return Ok(());
        }
        let current = self.stack_state(container)?.current;
        match current {
            Some(_) => self.set_displayed(child, false),
            None => {
                let id = self.identity(child)?;
                let state = self.stack_state_mut(container)?;
                state.current = Some(child);
                state.record(id);
                self.set_displayed(child, true)
            }
        }
    }

    /// Keep a stack consistent after `removed` left it: purge it from the
    /// history and, if it was displayed, fall back to the previous entry or
    /// the first child.
    pub(crate) fn on_stack_child_removed(
        &mut self,
        container: WidgetKey,
        removed: WidgetKey,
        removed_id: WidgetId,
    ) -> Result<(), UiError> {
        if self.stack_state(container).is_err() {
            return Ok(());
        }
        let state = self.stack_state_mut(container)?;
        state.forget(removed_id);
        if state.current != Some(removed) {
            return Ok(());
        }
        state.current = None;
        let previous = state.history.last().copied();

        let fallback = match previous {
            Some(id) => self.find_child(container, id)?.map(|cell| cell.child),
            None => None,
        };
        let fallback = match fallback {
            Some(key) => Some(key),
            None => self.child_keys(container)?.first().copied(),
        };
        if let Some(next) = fallback {
            self.switch_to(container, next)?;
        }
        Ok(())
    }

    pub(crate) fn on_stack_cleared(&mut self, container: WidgetKey) -> Result<(), UiError> {
        if let Ok(state) = self.stack_state_mut(container) {
            state.current = None;
            state.history.clear();
        }
        Ok(())
    }

    /// Settle the selection before materializing a stack: keep a live current
    /// child, else the history top, else the first child.
    ///
    /// Display flags are updated in place without dirtying the children.
    pub(crate) fn resolve_selection(&mut self, stack: WidgetKey) -> Result<Option<WidgetKey>, UiError> {
        let keys = self.child_keys(stack)?;
        let state = self.stack_state(stack)?;
        let mut selected = state.current.filter(|current| keys.contains(current));
        if selected.is_none() {
            if let Some(&id) = state.history.last() {
                selected = self.find_child(stack, id)?.map(|cell| cell.child);
            }
        }
        let selected = selected.or_else(|| keys.first().copied());

        if let Some(key) = selected {
            let id = self.identity(key)?;
            let state = self.stack_state_mut(stack)?;
            state.current = Some(key);
            if state.history.is_empty() {
                state.record(id);
            }
        }
        for key in keys {
            self.node_mut(key)?.displayed = Some(key) == selected;
        }
        Ok(selected)
    }
}
