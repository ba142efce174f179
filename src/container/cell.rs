//! Cell records and the child-host capability.
//!
//! A container owns its children through [`Cell`]s: the child key plus
//! layout metadata. [`ChildHost`] keeps the cells contiguous: positions are
//! renumbered after every structural change so a position always identifies
//! exactly one live child.

use crate::identity::WidgetId;
use crate::render::backend::{CellLayout, NodeHandle};
use crate::widget::WidgetKey;

// ---------------------------------------------------------------------------
// Layout enums
// ---------------------------------------------------------------------------

/// How a cell is sized inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellSizing {
    /// Expand to fill the free space.
    Expand,
    /// Shrink to the content.
    #[default]
    Shrink,
}

/// Where a cell sits inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellAlignment {
    #[default]
    Start,
    Center,
    End,
}

/// Vertical sizing of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerSizing {
    /// Grow beyond the viewport.
    Expand,
    /// Fit the viewport and scroll inside.
    #[default]
    Scroll,
}

// ---------------------------------------------------------------------------
// ChildRef
// ---------------------------------------------------------------------------

/// The three ways to designate a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRef {
    /// By public identity.
    Id(WidgetId),
    /// By current position.
    Position(usize),
    /// By arena reference.
    Key(WidgetKey),
}

impl From<WidgetId> for ChildRef {
    fn from(id: WidgetId) -> Self {
        ChildRef::Id(id)
    }
}

impl From<usize> for ChildRef {
    fn from(position: usize) -> Self {
        ChildRef::Position(position)
    }
}

impl From<WidgetKey> for ChildRef {
    fn from(key: WidgetKey) -> Self {
        ChildRef::Key(key)
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A child record.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// The owned child.
    pub child: WidgetKey,
    /// 0-based position, contiguous across the container.
    pub position: usize,
    pub sizing: CellSizing,
    pub alignment: CellAlignment,
    /// Auxiliary node attached to this cell (e.g. a notebook tab).
    pub handle: Option<NodeHandle>,
}

impl Cell {
    /// Layout metadata for the backend.
    pub fn layout(&self) -> CellLayout {
        CellLayout {
            sizing: self.sizing,
            alignment: self.alignment,
        }
    }
}

// ---------------------------------------------------------------------------
// ChildHost
// ---------------------------------------------------------------------------

/// The child-hosting capability of a widget.
#[derive(Debug, Clone, Default)]
pub struct ChildHost {
    cells: Vec<Cell>,
    /// Container-level cell alignment.
    pub alignment: CellAlignment,
    pub sizing: ContainerSizing,
}

impl ChildHost {
    /// Create an empty host with the given container-level alignment.
    pub fn new(alignment: CellAlignment) -> Self {
        Self {
            cells: Vec::new(),
            alignment,
            sizing: ContainerSizing::default(),
        }
    }

    /// Append a cell at the next position and return that position.
    pub fn push(&mut self, child: WidgetKey, sizing: CellSizing, alignment: CellAlignment) -> usize {
        let position = self.cells.len();
        self.cells.push(Cell {
            child,
            position,
            sizing,
            alignment,
            handle: None,
        });
        position
    }

    /// Remove the cell of `child` and renumber the rest.
    pub fn remove(&mut self, child: WidgetKey) -> Option<Cell> {
        let index = self.cells.iter().position(|c| c.child == child)?;
        let cell = self.cells.remove(index);
        self.recompute_positions();
        Some(cell)
    }

    /// Take every cell, leaving the host empty.
    pub fn take_all(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.cells)
    }

    /// Cell at `position`, bounds-checked.
    pub fn at(&self, position: usize) -> Option<&Cell> {
        if position >= self.cells.len() {
            return None;
        }
        self.cells.iter().find(|c| c.position == position)
    }

    /// Cell holding `child`.
    pub fn of(&self, child: WidgetKey) -> Option<&Cell> {
        self.cells.iter().find(|c| c.child == child)
    }

    /// Mutable cell holding `child`.
    pub fn of_mut(&mut self, child: WidgetKey) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|c| c.child == child)
    }

    /// All cells in position order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Child keys in position order.
    pub fn keys(&self) -> Vec<WidgetKey> {
        self.cells.iter().map(|c| c.child).collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn recompute_positions(&mut self) {
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.position = i;
        }
    }
}
