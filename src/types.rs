//! Core types for spark-typewriter.
//!
//! - [`Mode`] - phase of a single phrase's animation cycle
//! - [`Frame`] - what a display surface draws: visible text + cursor flag
//! - [`TypewriterConfig`] - phrases and timings an engine is started with

use std::time::Duration;

use crate::error::{Error, Result};

// =============================================================================
// TIMING CONSTANTS
// =============================================================================

/// Cursor blink half-period. The cursor toggles every 500ms regardless of mode.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Default delay between character reveals.
pub const DEFAULT_TYPE_SPEED_MS: u64 = 100;

/// Default hold time on a fully typed phrase before deletion starts.
pub const DEFAULT_PAUSE_MS: u64 = 1200;

// =============================================================================
// MODE
// =============================================================================

/// Current phase of the typewriter cycle.
///
/// Transitions are cyclic: Typing -> Pausing -> Deleting -> Typing (next phrase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Revealing one character every `type_speed`.
    #[default]
    Typing,
    /// Holding the full phrase for `pause`.
    Pausing,
    /// Retracting one character every `type_speed / 2`.
    Deleting,
}

impl Mode {
    /// Short lowercase name, used in log output.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Typing => "typing",
            Mode::Pausing => "pausing",
            Mode::Deleting => "deleting",
        }
    }
}

// =============================================================================
// FRAME
// =============================================================================

/// Snapshot of the engine output consumed by a display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Currently revealed prefix of the active phrase.
    pub text: String,
    /// Whether the cursor glyph is drawn this frame.
    pub cursor_on: bool,
}

impl Frame {
    pub fn new(text: impl Into<String>, cursor_on: bool) -> Self {
        Self {
            text: text.into(),
            cursor_on,
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            text: String::new(),
            cursor_on: true,
        }
    }
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Configuration for starting a typewriter engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypewriterConfig {
    /// Phrases to cycle through, in order (default: none = idle engine)
    pub phrases: Vec<String>,
    /// Delay between character reveals in ms, must be > 0 (default: 100)
    pub type_speed_ms: u64,
    /// Hold time once a phrase is fully typed in ms (default: 1200)
    pub pause_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            phrases: Vec::new(),
            type_speed_ms: DEFAULT_TYPE_SPEED_MS,
            pause_ms: DEFAULT_PAUSE_MS,
        }
    }
}

impl TypewriterConfig {
    /// Build a config from any list of string-like phrases.
    pub fn new<I, S>(phrases: I, type_speed_ms: u64, pause_ms: u64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            type_speed_ms,
            pause_ms,
        }
    }

    /// Reject configurations that would degenerate into a busy loop.
    pub fn validate(&self) -> Result<()> {
        if self.type_speed_ms == 0 {
            return Err(Error::InvalidConfiguration(
                "type_speed_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Delay between character reveals.
    pub fn type_delay(&self) -> Duration {
        Duration::from_millis(self.type_speed_ms)
    }

    /// Delay between character deletions (twice as fast as typing).
    pub fn delete_delay(&self) -> Duration {
        self.type_delay() / 2
    }

    /// Hold time before deletion starts.
    pub fn pause_delay(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}
