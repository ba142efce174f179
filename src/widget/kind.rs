//! Widget kinds: the closed set of widget variants.
//!
//! Instead of a class hierarchy, every widget is a [`WidgetKind`] variant. A
//! kind decides how the widget materializes and whether it hosts children;
//! the lifecycle around it is shared.

use std::fmt;

use crate::container::stack::StackState;
use crate::container::CellAlignment;
use crate::data::table::TableState;

// ---------------------------------------------------------------------------
// Flavor
// ---------------------------------------------------------------------------

/// Plain container flavors. They share the container contract and differ
/// only in how their cells are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    /// Generic box of cells.
    Box,
    /// Boxes laid out in columns.
    HorizontalBox,
    /// Boxes laid out in rows.
    VerticalBox,
    /// Wrapping flow of centered cells.
    FlowBox,
    /// Wide bar with end-aligned actions.
    ActionBar,
    /// Small start-aligned status bar.
    StatusBar,
    /// Vertically stacked rows, rendered without cell wrappers.
    ListBox,
    /// One row of a list box.
    ListBoxRow,
    /// Top-level window of an app stack.
    Window,
    /// Side panel placed beside the window content.
    SideBar,
    /// One page of a notebook.
    NoteBookPage,
    /// One row of a table view.
    TableRow,
}

impl Flavor {
    /// Backend role name.
    pub fn role(self) -> &'static str {
        match self {
            Flavor::Box => "box",
            Flavor::HorizontalBox => "hbox",
            Flavor::VerticalBox => "vbox",
            Flavor::FlowBox => "flowbox",
            Flavor::ActionBar => "actionbar",
            Flavor::StatusBar => "statusbar",
            Flavor::ListBox => "listbox",
            Flavor::ListBoxRow => "listbox-row",
            Flavor::Window => "window",
            Flavor::SideBar => "sidebar",
            Flavor::NoteBookPage => "page",
            Flavor::TableRow => "row",
        }
    }

    /// Container-level cell alignment a fresh container starts with.
    pub fn default_alignment(self) -> CellAlignment {
        match self {
            Flavor::ActionBar => CellAlignment::End,
            Flavor::FlowBox => CellAlignment::Center,
            _ => CellAlignment::Start,
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetKind
// ---------------------------------------------------------------------------

/// What a widget is.
pub enum WidgetKind {
    /// Static text.
    Label,
    /// Clickable button.
    Button,
    /// Plain container.
    Container(Flavor),
    /// Exclusive-display container.
    Stack(StackState),
    /// Data-backed table.
    Table(TableState),
}

impl WidgetKind {
    /// Backend role name.
    pub fn role(&self) -> &'static str {
        match self {
            WidgetKind::Label => "label",
            WidgetKind::Button => "button",
            WidgetKind::Container(flavor) => flavor.role(),
            WidgetKind::Stack(state) => state.flavor().role(),
            WidgetKind::Table(_) => "table",
        }
    }

    /// Whether widgets of this kind own children.
    pub fn hosts_children(&self) -> bool {
        !matches!(self, WidgetKind::Label | WidgetKind::Button)
    }

    /// Container-level alignment for a fresh child host.
    pub fn default_alignment(&self) -> CellAlignment {
        match self {
            WidgetKind::Container(flavor) => flavor.default_alignment(),
            _ => CellAlignment::Start,
        }
    }

    /// The plain-container flavor, if this is one.
    pub fn flavor(&self) -> Option<Flavor> {
        match self {
            WidgetKind::Container(flavor) => Some(*flavor),
            _ => None,
        }
    }
}

impl fmt::Debug for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetKind::Label => f.write_str("Label"),
            WidgetKind::Button => f.write_str("Button"),
            WidgetKind::Container(flavor) => f.debug_tuple("Container").field(flavor).finish(),
            WidgetKind::Stack(state) => f.debug_tuple("Stack").field(state).finish(),
            WidgetKind::Table(state) => f.debug_tuple("Table").field(state).finish(),
        }
    }
}
