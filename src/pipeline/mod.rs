//! Pipeline - hosting an engine on a terminal.
//!
//! ```text
//! engine signals (text, cursor_on) -> render effect -> LineRenderer
//! ```
//!
//! The run loop feeds real elapsed time into the timer clock, so the
//! engine itself never knows about wall time.

pub mod mount;

pub use mount::{mount, run, tick, unmount, MountHandle, FRAME_BUDGET};
