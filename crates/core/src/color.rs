use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-bit ARGB color, as handed over by the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

/// Platform default for title text on a light chrome.
pub const PRIMARY_TEXT_LIGHT: Color = Color::from_argb(0xDE, 0x00, 0x00, 0x00);
pub const WHITE: Color = Color::from_argb(0xFF, 0xFF, 0xFF, 0xFF);
pub const BLACK: Color = Color::from_argb(0xFF, 0x00, 0x00, 0x00);
pub const MATERIAL_GREY: Color = Color::from_argb(0xFF, 0xF5, 0xF5, 0xF5);

impl Color {
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Color {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Color {
        Color::from_argb(0xFF, r, g, b)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Returns the color as `[r, g, b, a]`.
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}
