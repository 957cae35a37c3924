//! Blink Animation - cursor phase toggling on the timer loop.
//!
//! Each engine owns one [`BlinkClock`]. The clock flips a `Signal<bool>`
//! every period (500ms for the typewriter cursor) on the same cooperative
//! timer loop as the typing timer, but as a separate timer with its own
//! lifetime: it never reads or changes typing progress.
//!
//! # Example
//!
//! ```ignore
//! use spark_signals::signal;
//! use spark_typewriter::state::animate::BlinkClock;
//! use spark_typewriter::BLINK_INTERVAL;
//!
//! let phase = signal(true);
//! let clock = BlinkClock::start(phase.clone(), BLINK_INTERVAL);
//!
//! // ... phase flips every 500ms as the timer loop advances ...
//!
//! clock.stop();
//! ```

use std::time::Duration;

use spark_signals::Signal;

use crate::engine::timers::TimerGuard;

/// A running blink timer. Dropping it stops the blink.
pub struct BlinkClock {
    phase: Signal<bool>,
    period: Duration,
    timer: TimerGuard,
}

impl BlinkClock {
    /// Start toggling `phase` every `period`.
    ///
    /// The current value of `phase` is left as is; the first toggle happens
    /// one full period from now.
    pub fn start(phase: Signal<bool>, period: Duration) -> Self {
        let toggled = phase.clone();
        let timer = TimerGuard::interval(period, move || {
            let current = toggled.get();
            toggled.set(!current);
        });

        Self {
            phase,
            period,
            timer,
        }
    }

    /// Current blink phase: true = cursor visible.
    pub fn phase(&self) -> bool {
        self.phase.get()
    }

    /// The phase signal, for reactive tracking.
    pub fn phase_signal(&self) -> Signal<bool> {
        self.phase.clone()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Check if the blink timer is armed.
    pub fn is_running(&self) -> bool {
        self.timer.is_pending()
    }

    /// Stop blinking (alias for drop).
    pub fn stop(self) {}
}

// =============================================================================
// TESTS
// =============================================================================
