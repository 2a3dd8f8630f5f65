//! Color palette.

use ratatui::style::Color;

/// Color palette for the chat UI.
///
/// The config file's `theme` field selects a palette by name; unknown
/// names fall back to the built-in dark one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Bubble background for sent messages.
    pub sent: Color,
    /// Bubble background for received chunks.
    pub received: Color,
    /// Accent for the input line background.
    pub light: Color,
    /// Transcript background.
    pub background: Color,
}

impl Theme {
    /// The built-in dark palette.
    pub const DARK: Self = Self {
        sent: Color::Rgb(0x66, 0x5b, 0x49),
        received: Color::Rgb(0x28, 0x2e, 0x3a),
        light: Color::Rgb(0x4b, 0x56, 0x6b),
        background: Color::Rgb(0x1e, 0x21, 0x26),
    };

    /// Look up a palette by config name.
    #[must_use]
    pub fn named(name: &str) -> Self {
        match name {
            "default" | "dark" => Self::DARK,
            other => {
                tracing::warn!(theme = other, "unknown theme name; using the default palette");
                Self::DARK
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DARK
    }
}
