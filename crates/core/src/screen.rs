//! Screen and button descriptors.
//!
//! A [`ScreenDescriptor`] is the chrome configuration of one navigable screen:
//! its title, optional colors, the visibility of the top bar and the ordered
//! action buttons. Descriptors are validated once, when built, and are
//! immutable afterwards; changing a screen means pushing a new descriptor.
//!
//! ```
//! use navstack_core::color::Color;
//! use navstack_core::screen::{ButtonDescriptor, ScreenDescriptor};
//!
//! let screen = ScreenDescriptor::builder("inbox", "main", "Inbox")
//!     .tool_bar_color(Color::from_rgb(0x21, 0x96, 0xF3))
//!     .button(ButtonDescriptor::new("compose", "Compose").icon("icons/compose.png"))
//!     .button(ButtonDescriptor::new("search", "Search").disabled(true))
//!     .build()?;
//!
//! assert_eq!(screen.buttons().len(), 2);
//! # Ok::<(), navstack_core::screen::ScreenError>(())
//! ```

use crate::color::Color;
use crate::icon::IconRef;
use crate::view::menu::ItemId;
use std::collections::HashSet;

/// Errors raised while building a [`ScreenDescriptor`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScreenError {
    #[error("screen id must not be empty")]
    EmptyId,

    #[error("navigator id of screen '{0}' must not be empty")]
    EmptyNavigatorId(String),

    #[error("button id must not be empty on screen '{0}'")]
    EmptyButtonId(String),

    /// Button ids are the join key between old and new chrome state.
    #[error("duplicate button id '{button}' on screen '{screen}'")]
    DuplicateButtonId { screen: String, button: String },
}

/// One chrome action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonDescriptor {
    pub id: String,
    pub title: String,
    pub icon: Option<IconRef>,
    pub disabled: bool,
}

impl ButtonDescriptor {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        ButtonDescriptor {
            id: id.into(),
            title: title.into(),
            icon: None,
            disabled: false,
        }
    }

    pub fn icon(mut self, icon: impl Into<IconRef>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn has_icon(&self) -> bool {
        self.icon.is_some()
    }

    /// Stable key used by the menu widget for this button.
    pub fn item_id(&self) -> ItemId {
        ItemId::for_button(&self.id)
    }
}

/// Chrome configuration of one navigable screen.
///
/// Optional styling fields are tri-state: `None` means "inherit", which the
/// top bar resolves to its construction-time defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenDescriptor {
    id: String,
    navigator_id: String,
    title: String,
    tool_bar_color: Option<Color>,
    title_color: Option<Color>,
    tool_bar_hidden: Option<bool>,
    buttons_tint_color: Option<Color>,
    buttons: Vec<ButtonDescriptor>,
}

impl ScreenDescriptor {
    pub fn builder(
        id: impl Into<String>,
        navigator_id: impl Into<String>,
        title: impl Into<String>,
    ) -> ScreenBuilder {
        ScreenBuilder {
            screen: ScreenDescriptor {
                id: id.into(),
                navigator_id: navigator_id.into(),
                title: title.into(),
                tool_bar_color: None,
                title_color: None,
                tool_bar_hidden: None,
                buttons_tint_color: None,
                buttons: Vec::new(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn navigator_id(&self) -> &str {
        &self.navigator_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tool_bar_color(&self) -> Option<Color> {
        self.tool_bar_color
    }

    pub fn title_color(&self) -> Option<Color> {
        self.title_color
    }

    pub fn tool_bar_hidden(&self) -> Option<bool> {
        self.tool_bar_hidden
    }

    pub fn buttons_tint_color(&self) -> Option<Color> {
        self.buttons_tint_color
    }

    pub fn buttons(&self) -> &[ButtonDescriptor] {
        &self.buttons
    }
}

/// Builder for [`ScreenDescriptor`]; validation happens in [`ScreenBuilder::build`].
#[derive(Debug, Clone)]
pub struct ScreenBuilder {
    screen: ScreenDescriptor,
}

impl ScreenBuilder {
    pub fn tool_bar_color(mut self, color: Color) -> Self {
        self.screen.tool_bar_color = Some(color);
        self
    }

    pub fn title_color(mut self, color: Color) -> Self {
        self.screen.title_color = Some(color);
        self
    }

    pub fn tool_bar_hidden(mut self, hidden: bool) -> Self {
        self.screen.tool_bar_hidden = Some(hidden);
        self
    }

    pub fn buttons_tint_color(mut self, color: Color) -> Self {
        self.screen.buttons_tint_color = Some(color);
        self
    }

    pub fn button(mut self, button: ButtonDescriptor) -> Self {
        self.screen.buttons.push(button);
        self
    }

    pub fn buttons<I>(mut self, buttons: I) -> Self
    where
        I: IntoIterator<Item = ButtonDescriptor>,
    {
        self.screen.buttons.extend(buttons);
        self
    }

    pub fn build(self) -> Result<ScreenDescriptor, ScreenError> {
        let screen = self.screen;

        if screen.id.trim().is_empty() {
            return Err(ScreenError::EmptyId);
        }

        if screen.navigator_id.trim().is_empty() {
            return Err(ScreenError::EmptyNavigatorId(screen.id));
        }

        let mut seen = HashSet::with_capacity(screen.buttons.len());
        for button in &screen.buttons {
            if button.id.is_empty() {
                return Err(ScreenError::EmptyButtonId(screen.id.clone()));
            }

            if !seen.insert(button.id.as_str()) {
                return Err(ScreenError::DuplicateButtonId {
                    screen: screen.id.clone(),
                    button: button.id.clone(),
                });
            }
        }

        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_keeps_unset_styles_as_none() -> Result<(), ScreenError> {
        let screen = ScreenDescriptor::builder("home", "nav", "Home").build()?;

        assert_eq!(screen.title(), "Home");
        assert_eq!(screen.tool_bar_color(), None);
        assert_eq!(screen.title_color(), None);
        assert_eq!(screen.tool_bar_hidden(), None);
        assert_eq!(screen.buttons_tint_color(), None);
        assert!(screen.buttons().is_empty());

        Ok(())
    }

    #[test]
    fn test_build_preserves_button_order() -> Result<(), ScreenError> {
        let screen = ScreenDescriptor::builder("home", "nav", "Home")
            .buttons([
                ButtonDescriptor::new("b", "B"),
                ButtonDescriptor::new("a", "A").icon("a.png"),
            ])
            .build()?;

        let ids: Vec<_> = screen.buttons().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(screen.buttons()[1].has_icon());

        Ok(())
    }

    #[test]
    fn test_build_rejects_duplicate_button_ids() {
        let result = ScreenDescriptor::builder("home", "nav", "Home")
            .button(ButtonDescriptor::new("a", "A"))
            .button(ButtonDescriptor::new("a", "Again"))
            .build();

        assert_eq!(
            result,
            Err(ScreenError::DuplicateButtonId {
                screen: "home".to_string(),
                button: "a".to_string(),
            })
        );
    }

    #[test]
    fn test_build_rejects_missing_ids() {
        assert_eq!(
            ScreenDescriptor::builder(" ", "nav", "Home").build(),
            Err(ScreenError::EmptyId)
        );
        assert_eq!(
            ScreenDescriptor::builder("home", "", "Home").build(),
            Err(ScreenError::EmptyNavigatorId("home".to_string()))
        );
        assert_eq!(
            ScreenDescriptor::builder("home", "nav", "Home")
                .button(ButtonDescriptor::new("", "Nameless"))
                .build(),
            Err(ScreenError::EmptyButtonId("home".to_string()))
        );
    }

    #[test]
    fn test_item_id_follows_button_id() {
        let first = ButtonDescriptor::new("share", "Share");
        let second = ButtonDescriptor::new("share", "Share again").disabled(true);
        let other = ButtonDescriptor::new("delete", "Delete");

        assert_eq!(first.item_id(), second.item_id());
        assert_ne!(first.item_id(), other.item_id());
    }
}
