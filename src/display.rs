//! Display sink abstraction.

use palette::Srgb;

/// Fonts the game draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    /// Fixed-width 6x8 font for labels and prompts.
    Fixed,
    /// Small proportional italic font for help text.
    Italic,
    /// Large bold font for the current word.
    Bold,
}

/// Foreground and background colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Text color.
    pub foreground: Srgb<u8>,
    /// Fill color for clears and opaque text.
    pub background: Srgb<u8>,
}

impl Theme {
    /// Red text on white.
    pub const DEFAULT: Self = Self {
        foreground: Srgb::new(0xFF, 0x00, 0x00),
        background: Srgb::new(0xFF, 0xFF, 0xFF),
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Trait for abstracting the text display.
///
/// The controller only ever writes to the display. Text is drawn opaque, so
/// drawing over a previous string of equal or greater width replaces it.
/// Coordinates are in pixels from the top-left corner.
pub trait Display {
    /// Fills the screen with the background color.
    fn clear(&mut self);

    /// Draws `text` centered on `(x, y)`.
    fn draw_centered_text(&mut self, text: &str, x: i16, y: i16);

    /// Draws `text` with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i16, y: i16);

    /// Selects the font for subsequent text.
    fn set_font(&mut self, font: Font);

    /// Selects the colors for subsequent clears and text.
    fn set_colors(&mut self, foreground: Srgb<u8>, background: Srgb<u8>);
}
