//! Leaf widgets.

use crate::ui::Ui;
use crate::widget::{WidgetKey, WidgetKind};

impl Ui {
    /// A static text label.
    pub fn new_label(&mut self, text: impl Into<String>) -> WidgetKey {
        let text = text.into();
        self.create(WidgetKind::Label, Some(&text))
    }

    /// A clickable button. Connect [`Signal::Clicked`](crate::event::Signal::Clicked)
    /// to react; [`Ui::click`] delivers clicks.
    pub fn new_button(&mut self, text: impl Into<String>) -> WidgetKey {
        let text = text.into();
        self.create(WidgetKind::Button, Some(&text))
    }
}
