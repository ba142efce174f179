//! Container builders.

use crate::error::UiError;
use crate::ui::Ui;
use crate::widget::{Flavor, WidgetKey, WidgetKind};

impl Ui {
    /// An empty container of the given flavor.
    pub fn new_container(&mut self, flavor: Flavor, label: Option<&str>) -> WidgetKey {
        self.create(WidgetKind::Container(flavor), label)
    }

    /// Attach a sidebar to a window. It renders beside the window content.
    pub fn create_sidebar(&mut self, window: WidgetKey, label: Option<&str>) -> Result<WidgetKey, UiError> {
        let sidebar = self.new_container(Flavor::SideBar, label);
        self.attach_new(window, sidebar)
    }

    /// Append an empty box to `parent`, typically a horizontal or vertical box.
    pub fn create_box(&mut self, parent: WidgetKey) -> Result<WidgetKey, UiError> {
        let boxed = self.new_container(Flavor::Box, None);
        self.attach_new(parent, boxed)
    }

    /// Append a row to a list box, letting `init` fill it first.
    pub fn add_row<F>(&mut self, listbox: WidgetKey, init: F) -> Result<WidgetKey, UiError>
    where
        F: FnOnce(&mut Ui, WidgetKey) -> Result<(), UiError>,
    {
        self.host(listbox)?;
        let row = self.new_container(Flavor::ListBoxRow, None);
        if let Err(err) = init(self, row) {
            self.dispose(row)?;
            return Err(err);
        }
        self.attach_new(listbox, row)
    }

    /// Add a freshly created widget, disposing it if the parent refuses it.
    fn attach_new(&mut self, parent: WidgetKey, child: WidgetKey) -> Result<WidgetKey, UiError> {
        match self.add_child(parent, child, None, None, None) {
            Ok(_) => Ok(child),
            Err(err) => {
                self.dispose(child)?;
                Err(err)
            }
        }
    }
}
