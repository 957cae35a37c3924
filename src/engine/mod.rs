//! Typewriter Engine - timers and the engine registry.
//!
//! - Timers: cooperative single-threaded timer loop on a virtual clock
//! - Registry: running engines, their state machines and output signals
//!
//! # Architecture
//!
//! Nothing here blocks or spawns threads. Engines arm timers, the host
//! advances the clock, due callbacks tick the state machines:
//!
//! ```text
//! host advance() -> timer callback -> TypewriterState::tick -> re-arm -> text signal
//! host advance() -> blink interval  -> cursor signal
//! ```

pub mod timers;
mod registry;

pub use registry::*;
pub use timers::{TimerGuard, TimerId};
