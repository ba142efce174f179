//! Container operations: add, remove, find, enumerate children.
//!
//! A container exclusively owns its children. Removing a child disposes it
//! and renumbers the remaining cells so positions stay `0..n`.

use tracing::trace;

use super::cell::{Cell, CellAlignment, CellSizing, ChildHost, ChildRef, ContainerSizing};
use crate::error::UiError;
use crate::ui::Ui;
use crate::widget::WidgetKey;

impl Ui {
    pub(crate) fn host(&self, container: WidgetKey) -> Result<&ChildHost, UiError> {
        self.node(container)?
            .host
            .as_ref()
            .ok_or(UiError::NotAContainer(container))
    }

    pub(crate) fn host_mut(&mut self, container: WidgetKey) -> Result<&mut ChildHost, UiError> {
        self.node_mut(container)?
            .host
            .as_mut()
            .ok_or(UiError::NotAContainer(container))
    }

    /// Append `child` to `container` and mark the container dirty.
    ///
    /// `sizing` defaults to [`CellSizing::Shrink`], `alignment` to
    /// [`CellAlignment::Start`]. Children can only be appended: an explicit
    /// `position` other than the next one is rejected. Returns the position.
    pub fn add_child(
        &mut self,
        container: WidgetKey,
        child: WidgetKey,
        sizing: Option<CellSizing>,
        alignment: Option<CellAlignment>,
        position: Option<usize>,
    ) -> Result<usize, UiError> {
        let position = self.add_child_quiet(
            container,
            child,
            sizing.unwrap_or_default(),
            alignment.unwrap_or_default(),
            position,
        )?;
        self.mark_changed(container)?;
        Ok(position)
    }

    /// Append without marking the container dirty, for batch builders that
    /// repaint once at the end.
    pub(crate) fn add_child_quiet(
        &mut self,
        container: WidgetKey,
        child: WidgetKey,
        sizing: CellSizing,
        alignment: CellAlignment,
        position: Option<usize>,
    ) -> Result<usize, UiError> {
        if let Some(parent) = self.node(child)?.parent {
            return Err(UiError::AlreadyParented { child, parent });
        }
        let mut ancestor = Some(container);
        while let Some(current) = ancestor {
            if current == child {
                return Err(UiError::CyclicChild(child));
            }
            ancestor = self.node(current)?.parent;
        }
        let next = self.host(container)?.len();
        if let Some(requested) = position {
            if requested != next {
                return Err(UiError::ExplicitPosition { requested, next });
            }
        }

        let position = self.host_mut(container)?.push(child, sizing, alignment);
        self.node_mut(child)?.parent = Some(container);
        self.on_stack_child_added(container, child)?;
        trace!(?container, ?child, position, "child added");
        Ok(position)
    }

    /// Dispose the matching child and renumber the others.
    pub fn remove_child(&mut self, container: WidgetKey, child: impl Into<ChildRef>) -> Result<(), UiError> {
        let child = child.into();
        let cell = self
            .find_child(container, child)?
            .ok_or(UiError::ChildNotFound { container, child })?;
        let removed_id = self.identity(cell.child)?;

        self.host_mut(container)?.remove(cell.child);
        self.node_mut(cell.child)?.parent = None;
        self.dispose_subtree(cell.child)?;
        self.on_stack_child_removed(container, cell.child, removed_id)?;
        trace!(?container, child = ?cell.child, "child removed");
        self.mark_changed(container)
    }

    /// Dispose every child and mark the container dirty.
    pub fn remove_all_children(&mut self, container: WidgetKey) -> Result<(), UiError> {
        self.remove_all_children_quiet(container)?;
        self.mark_changed(container)
    }

    pub(crate) fn remove_all_children_quiet(&mut self, container: WidgetKey) -> Result<(), UiError> {
        let cells = self.host_mut(container)?.take_all();
        for cell in cells {
            if let Ok(node) = self.node_mut(cell.child) {
                node.parent = None;
                self.dispose_subtree(cell.child)?;
            }
        }
        self.on_stack_cleared(container)
    }

    /// Find a child by identity, position or reference.
    pub fn find_child(&self, container: WidgetKey, child: impl Into<ChildRef>) -> Result<Option<Cell>, UiError> {
        let host = self.host(container)?;
        let found = match child.into() {
            ChildRef::Id(id) => {
                let mut found = None;
                for cell in host.cells() {
                    if self.identity(cell.child)? == id {
                        found = Some(cell);
                        break;
                    }
                }
                found
            }
            ChildRef::Position(position) => host.at(position),
            ChildRef::Key(key) => host.of(key),
        };
        Ok(found.cloned())
    }

    /// Snapshot of the cells, in position order.
    pub fn children(&self, container: WidgetKey) -> Result<Vec<Cell>, UiError> {
        Ok(self.host(container)?.cells().to_vec())
    }

    /// Child keys, in position order.
    pub fn child_keys(&self, container: WidgetKey) -> Result<Vec<WidgetKey>, UiError> {
        Ok(self.host(container)?.keys())
    }

    pub fn container_sizing(&self, container: WidgetKey) -> Result<ContainerSizing, UiError> {
        Ok(self.host(container)?.sizing)
    }

    pub fn set_container_sizing(&mut self, container: WidgetKey, sizing: ContainerSizing) -> Result<(), UiError> {
        self.host_mut(container)?.sizing = sizing;
        self.mark_changed(container)
    }

    pub fn cell_alignment(&self, container: WidgetKey) -> Result<CellAlignment, UiError> {
        Ok(self.host(container)?.alignment)
    }

    pub fn set_cell_alignment(&mut self, container: WidgetKey, alignment: CellAlignment) -> Result<(), UiError> {
        self.host_mut(container)?.alignment = alignment;
        self.mark_changed(container)
    }
}
