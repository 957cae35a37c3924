//! # spark-typewriter
//!
//! Typewriter text-cycling effect for reactive terminal UIs.
//!
//! Given a list of phrases, an engine reveals the active phrase one character
//! at a time, holds it, deletes it twice as fast, and moves on to the next
//! phrase, forever. A cursor flag blinks every 500ms alongside. Output is
//! published through [spark-signals](https://github.com/RLabs-Inc/spark-signals)
//! so any effect can render it.
//!
//! ## Architecture
//!
//! ```text
//! timer loop → TypewriterState::tick → text / cursor signals → render effect → LineRenderer
//! ```
//!
//! Everything runs on one thread. Timers live on a virtual clock that the
//! host advances (the mount loop from real time, tests by hand).
//!
//! ## Modules
//!
//! - [`types`] - Mode, Frame, TypewriterConfig, timing constants
//! - [`engine`] - Timer loop, engine registry (`start` / `stop`)
//! - [`state`] - State machine, blink clock, cursor glyphs
//! - [`renderer`] - Single-line terminal renderer
//! - [`pipeline`] - Mount and run loop
//! - [`presets`] - Landing page hero tagline

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod presets;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{Error, Result};

pub use engine::{
    active_engine_count, is_running, reset_engines, start, start_with_config, stop,
    EngineHandle, TimerGuard, TimerId,
};

pub use state::{BlinkClock, CursorStyle, DrawnCursorConfig, Transition, TypewriterState};

pub use renderer::LineRenderer;

pub use pipeline::{mount, run, tick, unmount, MountHandle};
