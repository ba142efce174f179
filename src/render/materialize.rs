//! Materialization strategies, one per widget kind.
//!
//! Builds the platform node of a single widget. Children go through
//! [`Ui::materialized`], so clean children hand back their cached node and
//! only dirty ones are rebuilt.

use super::backend::{NodeHandle, NodeSpec};
use crate::container::stack::StackFlavor;
use crate::container::Cell;
use crate::error::UiError;
use crate::ui::Ui;
use crate::widget::{Flavor, WidgetKey, WidgetKind};

enum Strategy {
    Leaf,
    /// Every child wrapped in a cell node.
    Cells,
    /// Children attached directly.
    Rows,
    Window,
    App,
    NoteBook,
    Table,
}

impl Ui {
    /// Build a fresh node for `key`. Does not touch the cache.
    pub(crate) fn materialize(&mut self, key: WidgetKey) -> Result<NodeHandle, UiError> {
        let id = self.identity(key)?;
        let node = self.node(key)?;
        let mut spec = NodeSpec::widget(node.kind.role(), id)
            .with_optional_label(node.label())
            .with_active(node.active);
        if let Some(host) = &node.host {
            spec = spec.with_container(host.alignment, host.sizing);
        }
        let strategy = match &node.kind {
            WidgetKind::Label | WidgetKind::Button => Strategy::Leaf,
            WidgetKind::Container(Flavor::ListBox) => Strategy::Rows,
            WidgetKind::Container(Flavor::Window) => Strategy::Window,
            WidgetKind::Container(_) => Strategy::Cells,
            WidgetKind::Stack(state) => match state.flavor() {
                StackFlavor::App => Strategy::App,
                StackFlavor::NoteBook => Strategy::NoteBook,
            },
            WidgetKind::Table(_) => Strategy::Table,
        };

        let children = match strategy {
            Strategy::Leaf => Vec::new(),
            Strategy::Cells => {
                let mut wrapped = Vec::new();
                for cell in self.children(key)? {
                    wrapped.push(self.cell_node(&cell)?);
                }
                wrapped
            }
            Strategy::Rows => self.child_nodes(key)?,
            Strategy::Window => self.window_parts(key)?,
            Strategy::App => match self.resolve_selection(key)? {
                Some(current) => vec![self.materialized(current)?],
                None => Vec::new(),
            },
            Strategy::NoteBook => self.notebook_parts(key)?,
            Strategy::Table => self.table_parts(key)?,
        };
        Ok(self.backend.create(spec.with_children(children)))
    }

    fn cell_node(&mut self, cell: &Cell) -> Result<NodeHandle, UiError> {
        let child = self.materialized(cell.child)?;
        Ok(self
            .backend
            .create(NodeSpec::part("cell").with_cell(cell.layout()).with_child(child)))
    }

    fn child_nodes(&mut self, key: WidgetKey) -> Result<Vec<NodeHandle>, UiError> {
        self.child_keys(key)?
            .into_iter()
            .map(|child| self.materialized(child))
            .collect()
    }

    /// Sidebars go into a body wrapper beside the content.
    fn window_parts(&mut self, key: WidgetKey) -> Result<Vec<NodeHandle>, UiError> {
        let mut sidebars = Vec::new();
        let mut content = Vec::new();
        for cell in self.children(key)? {
            let is_sidebar = self.node(cell.child)?.kind.flavor() == Some(Flavor::SideBar);
            let wrapped = self.cell_node(&cell)?;
            if is_sidebar {
                sidebars.push(wrapped);
            } else {
                content.push(wrapped);
            }
        }
        if sidebars.is_empty() {
            return Ok(content);
        }
        let content = self
            .backend
            .create(NodeSpec::part("window-content").with_children(content));
        let body = self
            .backend
            .create(NodeSpec::part("window-body").with_children(sidebars).with_child(content));
        Ok(vec![body])
    }

    fn notebook_parts(&mut self, key: WidgetKey) -> Result<Vec<NodeHandle>, UiError> {
        let selected = self.resolve_selection(key)?;
        let mut tabs = Vec::new();
        let mut pages = Vec::new();
        for cell in self.children(key)? {
            let title = match self.node(cell.child)?.label() {
                Some(label) => label.to_owned(),
                None => self.config.tab_fallback_label.clone(),
            };
            let tab = self.backend.create(NodeSpec::part("tab").with_label(title));
            self.backend.set_selected(tab, Some(cell.child) == selected);
            if let Some(stored) = self.host_mut(key)?.of_mut(cell.child) {
                stored.handle = Some(tab);
            }
            tabs.push(tab);
            pages.push(self.cell_node(&cell)?);
        }
        let tabs = self.backend.create(NodeSpec::part("tabs").with_children(tabs));
        let pages = self.backend.create(NodeSpec::part("pages").with_children(pages));
        Ok(vec![tabs, pages])
    }

    fn table_parts(&mut self, key: WidgetKey) -> Result<Vec<NodeHandle>, UiError> {
        let columns: Vec<_> = {
            let state = self.table_state(key)?;
            state
                .columns()
                .iter()
                .map(|column| {
                    (
                        column.field.clone(),
                        column.display_label().to_owned(),
                        state.indicator(&column.field),
                    )
                })
                .collect()
        };

        let mut headers = Vec::with_capacity(columns.len());
        let mut header_nodes = Vec::with_capacity(columns.len());
        for (field, title, indicator) in columns {
            let column = self.backend.create(NodeSpec::part("column").with_label(title));
            self.backend.set_sort_indicator(column, indicator);
            header_nodes.push(column);
            headers.push((field, column));
        }
        self.table_state_mut(key)?.headers = headers;

        let header = self
            .backend
            .create(NodeSpec::part("table-header").with_children(header_nodes));
        let rows = self.child_nodes(key)?;
        let body = self.backend.create(NodeSpec::part("table-body").with_children(rows));
        Ok(vec![header, body])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::container::{CellAlignment, CellSizing};
    use crate::render::headless::Headless;
    use crate::render::snapshot::{dump_root, dump_widget};
    use crate::ui::{Ui, UiConfig};
    use crate::widget::Flavor;

    #[test]
    fn leaf_nodes() {
        let mut ui = Ui::new(Headless::new());
        let button = ui.new_button("OK");
        ui.deactivate(button).unwrap();
        assert_eq!(dump_widget(&mut ui, button).unwrap(), r#"button#w0 "OK" [disabled]"#);
    }

    #[test]
    fn cells_carry_layout() {
        let mut ui = Ui::new(Headless::new());
        let bar = ui.new_container(Flavor::ActionBar, None);
        let ok = ui.new_button("OK");
        ui.add_child(bar, ok, Some(CellSizing::Expand), Some(CellAlignment::End), None)
            .unwrap();
        let node = ui.materialized(bar).unwrap();

        let backend = ui.backend_as::<Headless>().unwrap();
        let root = backend.get(node).unwrap();
        assert_eq!(root.alignment, Some(CellAlignment::End));
        let cell = backend.children(node)[0];
        let layout = backend.get(cell).unwrap().cell.unwrap();
        assert_eq!(layout.sizing, CellSizing::Expand);
        assert_eq!(layout.alignment, CellAlignment::End);
    }

    #[test]
    fn listbox_rows_are_not_wrapped() {
        let mut ui = Ui::new(Headless::new());
        let list = ui.new_container(Flavor::ListBox, None);
        ui.add_row(list, |ui, row| {
            let label = ui.new_label("a");
            ui.add_child(row, label, None, None, None).map(|_| ())
        })
        .unwrap();
        insta::assert_snapshot!(
            dump_widget(&mut ui, list).unwrap(),
            @r#"listbox#w0 (listbox-row#w1 (cell (label#w2 "a")))"#
        );
    }

    #[test]
    fn app_renders_only_the_current_window() {
        let mut ui = Ui::new(Headless::new());
        let app = ui.new_app(Some("demo"));
        let main = ui.stack(app, Some("Main")).unwrap();
        ui.create_sidebar(main, Some("Nav")).unwrap();
        let text = ui.new_label("Hi");
        ui.add_child(main, text, None, None, None).unwrap();
        ui.stack(app, Some("Other")).unwrap();
        ui.mount(app).unwrap();

        let backend = ui.backend_as::<Headless>().unwrap();
        insta::assert_snapshot!(
            dump_root(backend),
            @r#"app#w1 "demo" (window#w0 "Main" (window-body (cell (sidebar#w2 "Nav") window-content (cell (label#w3 "Hi")))))"#
        );
    }

    #[test]
    fn app_switch_swaps_windows() {
        let mut ui = Ui::new(Headless::new());
        let app = ui.new_app(None);
        let first = ui.stack(app, Some("A")).unwrap();
        let second = ui.stack(app, Some("B")).unwrap();
        ui.mount(app).unwrap();

        ui.display(app, second).unwrap();
        ui.flush().unwrap();
        let id_app = ui.identity(app).unwrap();
        let id_second = ui.identity(second).unwrap();
        let backend = ui.backend_as::<Headless>().unwrap();
        assert_eq!(dump_root(backend), format!(r#"app#{id_app} (window#{id_second} "B")"#));

        ui.close_current(app).unwrap();
        ui.flush().unwrap();
        let id_first = ui.identity(first).unwrap();
        let backend = ui.backend_as::<Headless>().unwrap();
        assert_eq!(dump_root(backend), format!(r#"app#{id_app} (window#{id_first} "A")"#));
    }

    #[test]
    fn notebook_tabs_follow_display() {
        let mut ui = Ui::new(Headless::new());
        let notebook = ui.new_notebook();
        ui.stack(notebook, Some("One")).unwrap();
        let second = ui.stack(notebook, None).unwrap();
        let node = ui.materialized(notebook).unwrap();
        insta::assert_snapshot!(
            dump_widget(&mut ui, notebook).unwrap(),
            @r#"notebook#w1 (tabs (tab "One" [selected] tab "Page") pages (cell (page#w0 "One") cell (page#w2 [hidden])))"#
        );

        // Tabs and page visibility change before any repaint.
        ui.display(notebook, second).unwrap();
        let backend = ui.backend_as::<Headless>().unwrap();
        let expected = r#"notebook#w1 (tabs (tab "One" tab "Page" [selected]) pages (cell (page#w0 "One" [hidden]) cell (page#w2)))"#;
        assert_eq!(crate::render::snapshot::dump(backend, node), expected);

        ui.flush().unwrap();
        assert_eq!(dump_widget(&mut ui, notebook).unwrap(), expected);
    }

    #[test]
    fn notebook_fallback_tab_label_is_configurable() {
        let mut ui = Ui::with_config(Headless::new(), UiConfig::new().with_tab_fallback_label("Untitled"));
        let notebook = ui.new_notebook();
        ui.stack(notebook, None).unwrap();
        let dump = dump_widget(&mut ui, notebook).unwrap();
        assert!(dump.contains(r#"tab "Untitled" [selected]"#), "{dump}");
    }

    #[test]
    fn notebook_cells_hold_tab_handles() {
        let mut ui = Ui::new(Headless::new());
        let notebook = ui.new_notebook();
        ui.stack(notebook, Some("a")).unwrap();
        assert!(ui.children(notebook).unwrap()[0].handle.is_none());
        ui.materialized(notebook).unwrap();
        let handle = ui.children(notebook).unwrap()[0].handle.unwrap();
        let backend = ui.backend_as::<Headless>().unwrap();
        assert_eq!(backend.get(handle).unwrap().role, "tab");
    }
}
