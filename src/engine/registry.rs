//! Engine Registry - running typewriter engines and their timers.
//!
//! Each engine is an entry in a thread-local registry holding its state
//! machine, its output signals and two independent timers:
//!
//! - the advancement timer, a one-shot re-armed after every tick with the
//!   delay of the new mode (`type_speed`, `pause` or `type_speed / 2`)
//! - the blink clock, a fixed 500ms interval that only flips `cursor_on`
//!
//! Both timers are [`TimerGuard`]s owned by the entry. Removing the entry
//! (stop, handle drop) or replacing its configuration drops them, which
//! cancels them before anything new is armed.
//!
//! No registry borrow is held while signals are written, so effects
//! observing an engine may call back into it (or stop it).
//!
//! # Example
//!
//! ```ignore
//! use spark_typewriter::engine::{start, timers};
//! use std::time::Duration;
//!
//! let engine = start(["hello", "world"], 100, 1200)?;
//!
//! timers::advance(Duration::from_millis(300));
//! assert_eq!(engine.text(), "hel");
//!
//! engine.stop();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Duration;

use log::{debug, trace, warn};
use spark_signals::{signal, Signal};

use super::timers::TimerGuard;
use crate::error::Result;
use crate::state::animate::BlinkClock;
use crate::state::typewriter::{Transition, TypewriterState};
use crate::types::{Frame, Mode, TypewriterConfig, BLINK_INTERVAL};

// =============================================================================
// Registry State
// =============================================================================

struct EngineEntry {
    state: TypewriterState,
    config: TypewriterConfig,
    /// Visible text as of the latest completed tick
    text: Signal<String>,
    /// Blink phase, flipped by the blink clock
    cursor: Signal<bool>,
    advance: Option<TimerGuard>,
    blink: Option<BlinkClock>,
}

thread_local! {
    static ENGINES: RefCell<HashMap<usize, EngineEntry>> = RefCell::new(HashMap::new());

    static NEXT_ENGINE_ID: Cell<usize> = const { Cell::new(0) };
}

// =============================================================================
// Start / Stop
// =============================================================================

/// Start a typewriter engine cycling `phrases`.
///
/// Fails with `InvalidConfiguration` when `type_speed_ms` is 0; no engine is
/// created in that case. An empty phrase list gives an idle engine that
/// shows `""` and arms no timers.
pub fn start<I, S>(phrases: I, type_speed_ms: u64, pause_ms: u64) -> Result<EngineHandle>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    start_with_config(TypewriterConfig::new(phrases, type_speed_ms, pause_ms))
}

/// Start a typewriter engine from a full configuration.
pub fn start_with_config(config: TypewriterConfig) -> Result<EngineHandle> {
    if let Err(err) = config.validate() {
        warn!("typewriter rejected: {}", err);
        return Err(err);
    }

    let id = NEXT_ENGINE_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });

    debug!(
        "typewriter {} started: {} phrases, type={}ms pause={}ms",
        id,
        config.phrases.len(),
        config.type_speed_ms,
        config.pause_ms
    );

    let entry = EngineEntry {
        state: TypewriterState::new(config.phrases.clone()),
        config,
        text: signal(String::new()),
        cursor: signal(true),
        advance: None,
        blink: None,
    };
    ENGINES.with(|engines| {
        engines.borrow_mut().insert(id, entry);
    });

    arm(id);

    Ok(EngineHandle {
        id,
        _not_send: PhantomData,
    })
}

/// Stop an engine, cancelling all of its timers.
pub fn stop(handle: EngineHandle) {
    drop(handle);
}

/// Remove an engine from the registry. Idempotent.
fn dispose(id: usize) {
    let removed = ENGINES
        .try_with(|engines| engines.borrow_mut().remove(&id))
        .ok()
        .flatten();

    // Timer guards cancel when the entry drops, outside the registry borrow
    if let Some(entry) = removed {
        debug!(
            "typewriter {} stopped at phrase {} ({})",
            id,
            entry.state.phrase_index(),
            entry.state.mode().as_str()
        );
    }
}

/// Check if an engine id is still live.
pub fn is_running(id: usize) -> bool {
    ENGINES.with(|engines| engines.borrow().contains_key(&id))
}

/// Number of live engines on this thread.
pub fn active_engine_count() -> usize {
    ENGINES.with(|engines| engines.borrow().len())
}

/// Stop every engine (for testing).
pub fn reset_engines() {
    let removed: Vec<EngineEntry> = ENGINES.with(|engines| {
        engines.borrow_mut().drain().map(|(_, entry)| entry).collect()
    });
    drop(removed);
}

// =============================================================================
// Timers
// =============================================================================

/// Arm both timers for an engine in its initial state.
fn arm(id: usize) {
    let plan = ENGINES.with(|engines| {
        let engines = engines.borrow();
        let entry = engines.get(&id)?;
        if entry.state.is_idle() {
            return None;
        }
        Some((entry.config.type_delay(), entry.cursor.clone()))
    });

    let Some((first_delay, cursor)) = plan else {
        trace!("typewriter {} idle, no timers armed", id);
        return;
    };

    let advance = schedule_advance(id, first_delay);
    let blink = BlinkClock::start(cursor, BLINK_INTERVAL);

    ENGINES.with(|engines| {
        if let Some(entry) = engines.borrow_mut().get_mut(&id) {
            entry.advance = Some(advance);
            entry.blink = Some(blink);
        }
    });
}

fn schedule_advance(id: usize, delay: Duration) -> TimerGuard {
    TimerGuard::timeout(delay, move || on_advance(id))
}

/// Delay before the next tick, given the mode the state is now in.
fn next_delay(state: &TypewriterState, config: &TypewriterConfig) -> Option<Duration> {
    if state.is_idle() {
        return None;
    }
    Some(match state.mode() {
        Mode::Typing => config.type_delay(),
        Mode::Pausing => config.pause_delay(),
        Mode::Deleting => config.delete_delay(),
    })
}

/// Advancement timer callback: tick, re-arm, publish.
fn on_advance(id: usize) {
    let update = ENGINES.with(|engines| {
        let mut engines = engines.borrow_mut();
        let entry = engines.get_mut(&id)?;

        let transition = entry.state.tick();
        trace!(
            "typewriter {}: {:?} -> {} (phrase {}, {} chars)",
            id,
            transition,
            entry.state.mode().as_str(),
            entry.state.phrase_index(),
            entry.state.char_count()
        );

        // The timer that just fired is already gone, replacing it cancels nothing
        entry.advance = next_delay(&entry.state, &entry.config).map(|d| schedule_advance(id, d));

        Some((entry.text.clone(), entry.state.visible_text().to_string()))
    });

    if let Some((text, value)) = update {
        publish(&text, value);
    }
}

/// Write a signal only when the value changes.
fn publish<T: Clone + PartialEq + 'static>(sig: &Signal<T>, value: T) {
    if sig.get() != value {
        sig.set(value);
    }
}

// =============================================================================
// Engine Handle
// =============================================================================

/// Control object for a running engine.
///
/// Returned by [`start`]. Dropping the handle stops the engine.
///
/// The engine lives in a thread-local registry, so the handle cannot leave
/// the thread that started it:
///
/// ```compile_fail
/// fn assert_send<T: Send>() {}
/// assert_send::<spark_typewriter::EngineHandle>();
/// ```
#[derive(Debug)]
pub struct EngineHandle {
    id: usize,
    _not_send: PhantomData<Rc<()>>,
}

impl EngineHandle {
    pub fn id(&self) -> usize {
        self.id
    }

    fn with_entry<R>(&self, f: impl FnOnce(&EngineEntry) -> R) -> Option<R> {
        ENGINES.with(|engines| engines.borrow().get(&self.id).map(f))
    }

    /// Visible text, derived from the current state.
    pub fn text(&self) -> String {
        self.with_entry(|entry| entry.state.visible_text().to_string())
            .unwrap_or_default()
    }

    /// Whether the cursor is drawn right now.
    pub fn cursor_on(&self) -> bool {
        self.with_entry(|entry| entry.cursor.clone())
            .map(|cursor| cursor.get())
            .unwrap_or(true)
    }

    /// Both outputs at once.
    pub fn frame(&self) -> Frame {
        Frame::new(self.text(), self.cursor_on())
    }

    /// Visible text signal, for observation through `effect`.
    ///
    /// Stays the same signal across `reconfigure`.
    pub fn text_signal(&self) -> Signal<String> {
        self.with_entry(|entry| entry.text.clone())
            .unwrap_or_else(|| signal(String::new()))
    }

    /// Cursor phase signal, for observation through `effect`.
    pub fn cursor_signal(&self) -> Signal<bool> {
        self.with_entry(|entry| entry.cursor.clone())
            .unwrap_or_else(|| signal(true))
    }

    pub fn mode(&self) -> Mode {
        self.with_entry(|entry| entry.state.mode()).unwrap_or_default()
    }

    pub fn phrase_index(&self) -> usize {
        self.with_entry(|entry| entry.state.phrase_index()).unwrap_or(0)
    }

    pub fn char_count(&self) -> usize {
        self.with_entry(|entry| entry.state.char_count()).unwrap_or(0)
    }

    pub fn config(&self) -> Option<TypewriterConfig> {
        self.with_entry(|entry| entry.config.clone())
    }

    pub fn is_running(&self) -> bool {
        is_running(self.id)
    }

    /// Replace phrases and timings.
    ///
    /// The new configuration is validated first; on error the engine keeps
    /// running unchanged. Otherwise every pending timer of the old
    /// configuration is cancelled, the cycle restarts from the first phrase
    /// and fresh timers are armed.
    pub fn reconfigure(&self, config: TypewriterConfig) -> Result<()> {
        config.validate()?;

        let superseded = ENGINES.with(|engines| {
            let mut engines = engines.borrow_mut();
            let entry = engines.get_mut(&self.id)?;
            let timers = (entry.advance.take(), entry.blink.take());
            entry.state = TypewriterState::new(config.phrases.clone());
            entry.config = config;
            Some((timers, entry.text.clone(), entry.cursor.clone()))
        });

        let Some((timers, text, cursor)) = superseded else {
            warn!("typewriter {} reconfigured after stop, ignoring", self.id);
            return Ok(());
        };
        drop(timers);

        debug!("typewriter {} reconfigured", self.id);

        publish(&text, String::new());
        publish(&cursor, true);
        arm(self.id);

        Ok(())
    }

    /// Stop the engine (alias for drop).
    pub fn stop(self) {}
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        dispose(self.id);
    }
}

// =============================================================================
// Tests
// =============================================================================
