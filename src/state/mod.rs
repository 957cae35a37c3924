//! State Module - state machine and animation pieces
//!
//! - **Typewriter** - phrase-cycling state machine, pure text derivation
//! - **Animate** - blink clock for the cursor phase
//! - **Drawn cursor** - cursor glyph styles

pub mod animate;
pub mod drawn_cursor;
pub mod typewriter;

pub use animate::BlinkClock;
pub use drawn_cursor::{CursorStyle, DrawnCursorConfig};
pub use typewriter::{Transition, TypewriterState};
