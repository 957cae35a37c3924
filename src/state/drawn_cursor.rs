//! Drawn Cursor - the glyph printed after the typed text.
//!
//! The cursor is drawn into the tagline line, not the terminal's native
//! cursor. When the blink phase is off the glyph is replaced by a space so
//! the line keeps its width.
//!
//! # Example
//!
//! ```ignore
//! use spark_typewriter::state::drawn_cursor::{CursorStyle, DrawnCursorConfig};
//!
//! let cursor = DrawnCursorConfig { style: CursorStyle::Block, ..Default::default() };
//! assert_eq!(cursor.glyph(true), '█');
//! assert_eq!(cursor.glyph(false), ' ');
//! ```

// =============================================================================
// CURSOR CHARACTERS
// =============================================================================

/// Bar cursor - vertical line (|)
pub const CURSOR_CHAR_BAR: char = '|';
/// Block cursor - full block
pub const CURSOR_CHAR_BLOCK: char = '█';
/// Underline cursor - underscore (_)
pub const CURSOR_CHAR_UNDERLINE: char = '_';
/// Drawn in place of the cursor during the blink "off" phase
pub const CURSOR_CHAR_HIDDEN: char = ' ';

/// Cursor style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Bar,
    Block,
    Underline,
}

impl CursorStyle {
    pub fn glyph(self) -> char {
        match self {
            CursorStyle::Bar => CURSOR_CHAR_BAR,
            CursorStyle::Block => CURSOR_CHAR_BLOCK,
            CursorStyle::Underline => CURSOR_CHAR_UNDERLINE,
        }
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Configuration for the drawn cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawnCursorConfig {
    /// Cursor style preset (default: Bar)
    pub style: CursorStyle,
    /// Custom cursor character (overrides style if Some)
    pub char: Option<char>,
}

impl DrawnCursorConfig {
    pub fn with_style(style: CursorStyle) -> Self {
        Self { style, char: None }
    }

    pub fn with_char(ch: char) -> Self {
        Self {
            char: Some(ch),
            ..Default::default()
        }
    }

    /// Character to draw for the given blink phase.
    pub fn glyph(&self, visible: bool) -> char {
        if !visible {
            return CURSOR_CHAR_HIDDEN;
        }
        self.char.unwrap_or_else(|| self.style.glyph())
    }
}
