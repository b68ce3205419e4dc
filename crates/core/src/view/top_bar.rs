//! The top bar widget: background, title, visibility, back button and actions.
//!
//! `TopBar` only holds visible state. Deciding what that state should be for a
//! given screen is the job of the [`ChromeController`](super::chrome::ChromeController).

use super::menu::Menu;
use super::{Id, ID_FEEDER};
use crate::color::{Color, PRIMARY_TEXT_LIGHT};
use crate::settings::ChromeSettings;

/// Whether the bar takes part in layout.
///
/// A `Gone` bar stays attached to its host and keeps its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Gone,
}

/// Up-navigation indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackButton {
    /// `None` draws the indicator with the theme's own color.
    pub tint: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopBar {
    id: Id,
    height: u32,
    background: Color,
    title: String,
    title_color: Color,
    visibility: Visibility,
    back_button: Option<BackButton>,
    overflow_tint: Option<Color>,
    menu: Menu,
}

impl TopBar {
    pub fn new(height: u32, background: Color) -> TopBar {
        TopBar {
            id: ID_FEEDER.next(),
            height,
            background,
            title: String::new(),
            title_color: PRIMARY_TEXT_LIGHT,
            visibility: Visibility::Visible,
            back_button: None,
            overflow_tint: None,
            menu: Menu::new(),
        }
    }

    pub fn from_settings(settings: &ChromeSettings) -> TopBar {
        TopBar::new(settings.height, settings.default_background)
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Current pixel height, as laid out by the host.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title_text_color(&self) -> Color {
        self.title_color
    }

    pub fn set_title_text_color(&mut self, color: Color) {
        self.title_color = color;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn show(&mut self) {
        self.visibility = Visibility::Visible;
    }

    pub fn hide(&mut self) {
        self.visibility = Visibility::Gone;
    }

    pub fn back_button(&self) -> Option<BackButton> {
        self.back_button
    }

    pub fn set_back_button(&mut self, back_button: Option<BackButton>) {
        self.back_button = back_button;
    }

    /// Tint of the overflow ("more") indicator, `None` for the theme default.
    pub fn overflow_tint(&self) -> Option<Color> {
        self.overflow_tint
    }

    pub fn set_overflow_tint(&mut self, tint: Color) {
        self.overflow_tint = Some(tint);
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut Menu {
        &mut self.menu
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::MATERIAL_GREY;

    #[test]
    fn test_new_bar_is_visible_with_default_title_color() {
        let bar = TopBar::new(56, MATERIAL_GREY);

        assert!(bar.is_visible());
        assert_eq!(bar.title_text_color(), PRIMARY_TEXT_LIGHT);
        assert_eq!(bar.background(), MATERIAL_GREY);
        assert!(bar.menu().is_empty());
        assert_eq!(bar.back_button(), None);
    }

    #[test]
    fn test_hide_keeps_state() {
        let mut bar = TopBar::new(56, MATERIAL_GREY);
        bar.set_title("Inbox");
        bar.hide();

        assert_eq!(bar.visibility(), Visibility::Gone);
        assert_eq!(bar.title(), "Inbox");

        bar.show();
        assert!(bar.is_visible());
    }
}
