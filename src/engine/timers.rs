//! Timer Loop - Cooperative single-threaded timers on a virtual clock.
//!
//! Engines never sleep or spawn threads. They arm timers here and the host
//! (the mount loop, or a test) moves the clock forward with [`advance`].
//! Every timer that comes due fires synchronously, in deadline order, on the
//! calling thread.
//!
//! # Pattern
//!
//! - One-shot timers via [`set_timeout`], periodic timers via [`set_interval`]
//! - [`TimerGuard`] owns a timer and cancels it when dropped
//! - Callbacks may arm or cancel timers, including themselves
//!
//! # Example
//!
//! ```ignore
//! use spark_typewriter::engine::timers::{advance, TimerGuard};
//! use std::time::Duration;
//!
//! let guard = TimerGuard::timeout(Duration::from_millis(100), || println!("fired"));
//!
//! advance(Duration::from_millis(100)); // prints "fired"
//! drop(guard); // no-op, already fired
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::time::Duration;

// =============================================================================
// TIMER IDS
// =============================================================================

/// Identifier of an armed timer. Never reused within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

// =============================================================================
// TIMER REGISTRY
// =============================================================================

enum Callback {
    Once(Box<dyn FnOnce()>),
    Repeat(Box<dyn FnMut()>),
}

struct TimerEntry {
    deadline: Duration,
    period: Option<Duration>,
    /// Taken out while a periodic callback is running
    callback: Option<Callback>,
}

struct TimerLoop {
    now: Duration,
    next_id: u64,
    timers: HashMap<TimerId, TimerEntry>,
}

impl TimerLoop {
    fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            timers: HashMap::new(),
        }
    }

    fn insert(&mut self, delay: Duration, period: Option<Duration>, callback: Callback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            TimerEntry {
                deadline: self.now + delay,
                period,
                callback: Some(callback),
            },
        );
        id
    }

    /// Earliest armed timer, ties broken by creation order.
    fn earliest(&self) -> Option<(TimerId, Duration)> {
        self.timers
            .iter()
            .filter(|(_, entry)| entry.callback.is_some())
            .map(|(id, entry)| (*id, entry.deadline))
            .min_by_key(|(id, deadline)| (*deadline, *id))
    }
}

thread_local! {
    static TIMER_LOOP: RefCell<TimerLoop> = RefCell::new(TimerLoop::new());
}

// =============================================================================
// ARMING & CANCELLING
// =============================================================================

/// Arm a one-shot timer that fires `delay` after the current clock.
pub fn set_timeout(delay: Duration, callback: impl FnOnce() + 'static) -> TimerId {
    TIMER_LOOP.with(|tl| {
        tl.borrow_mut()
            .insert(delay, None, Callback::Once(Box::new(callback)))
    })
}

/// Arm a periodic timer firing every `period`, first after one full period.
///
/// A zero period would never let the clock move past the timer, so it is
/// not armed: the returned id is inert (`is_pending` is false).
pub fn set_interval(period: Duration, callback: impl FnMut() + 'static) -> TimerId {
    TIMER_LOOP.with(|tl| {
        let mut tl = tl.borrow_mut();
        if period.is_zero() {
            let id = TimerId(tl.next_id);
            tl.next_id += 1;
            return id;
        }
        tl.insert(period, Some(period), Callback::Repeat(Box::new(callback)))
    })
}

/// Cancel a timer. Returns true if it was still pending.
///
/// Safe to call with fired or already-cancelled ids, and during thread
/// teardown.
pub fn clear_timer(id: TimerId) -> bool {
    let removed = TIMER_LOOP
        .try_with(|tl| tl.borrow_mut().timers.remove(&id))
        .ok()
        .flatten();
    // Callback captures are dropped outside the registry borrow
    removed.is_some()
}

/// Check if a timer is still armed.
pub fn is_pending(id: TimerId) -> bool {
    TIMER_LOOP.with(|tl| tl.borrow().timers.contains_key(&id))
}

/// Number of armed timers on this thread.
pub fn pending_timer_count() -> usize {
    TIMER_LOOP.with(|tl| tl.borrow().timers.len())
}

// =============================================================================
// CLOCK
// =============================================================================

/// Current virtual time.
pub fn now() -> Duration {
    TIMER_LOOP.with(|tl| tl.borrow().now)
}

/// Deadline of the next timer to fire, if any.
pub fn next_deadline() -> Option<Duration> {
    TIMER_LOOP.with(|tl| tl.borrow().earliest().map(|(_, deadline)| deadline))
}

/// Time left until the next timer fires (zero if already due).
pub fn time_until_next() -> Option<Duration> {
    TIMER_LOOP.with(|tl| {
        let tl = tl.borrow();
        tl.earliest()
            .map(|(_, deadline)| deadline.saturating_sub(tl.now))
    })
}

/// Move the clock forward by `elapsed`, firing every timer that comes due.
///
/// Returns the number of callbacks run.
pub fn advance(elapsed: Duration) -> usize {
    advance_to(now() + elapsed)
}

/// Move the clock to `target`, firing every timer due at or before it.
///
/// The clock is set to each timer's deadline before its callback runs, so
/// timers armed from a callback are measured from the exact fire time.
/// Targets in the past fire whatever is already due and leave the clock alone.
pub fn advance_to(target: Duration) -> usize {
    let mut fired = 0;

    loop {
        let due = TIMER_LOOP.with(|tl| {
            let mut tl = tl.borrow_mut();
            let (id, deadline) = tl.earliest()?;
            if deadline > target {
                return None;
            }
            if deadline > tl.now {
                tl.now = deadline;
            }

            match tl.timers.get(&id)?.period {
                None => {
                    let entry = tl.timers.remove(&id)?;
                    entry.callback.map(|cb| (id, cb))
                }
                Some(period) => {
                    let entry = tl.timers.get_mut(&id)?;
                    entry.deadline += period;
                    entry.callback.take().map(|cb| (id, cb))
                }
            }
        });

        let Some((id, callback)) = due else { break };
        fired += 1;

        match callback {
            Callback::Once(f) => f(),
            Callback::Repeat(mut f) => {
                f();
                // Re-arm unless the callback cancelled its own timer
                TIMER_LOOP.with(|tl| {
                    if let Some(entry) = tl.borrow_mut().timers.get_mut(&id) {
                        entry.callback = Some(Callback::Repeat(f));
                    }
                });
            }
        }
    }

    TIMER_LOOP.with(|tl| {
        let mut tl = tl.borrow_mut();
        if target > tl.now {
            tl.now = target;
        }
    });

    fired
}

/// Cancel every timer and rewind the clock (for testing).
///
/// Ids keep increasing so stale guards can never cancel new timers.
pub fn reset_timers() {
    let removed = TIMER_LOOP.with(|tl| {
        let mut tl = tl.borrow_mut();
        tl.now = Duration::ZERO;
        std::mem::take(&mut tl.timers)
    });
    drop(removed);
}

// =============================================================================
// SCOPED TIMERS
// =============================================================================

/// Owns an armed timer and cancels it on drop.
///
/// Bound to the thread whose loop armed the timer:
///
/// ```compile_fail
/// fn assert_send<T: Send>() {}
/// assert_send::<spark_typewriter::TimerGuard>();
/// ```
#[must_use = "dropping a TimerGuard cancels its timer"]
#[derive(Debug)]
pub struct TimerGuard {
    id: TimerId,
    /// Timers belong to the arming thread's loop
    _not_send: PhantomData<Rc<()>>,
}

impl TimerGuard {
    /// Arm a one-shot timer owned by the guard.
    pub fn timeout(delay: Duration, callback: impl FnOnce() + 'static) -> Self {
        Self {
            id: set_timeout(delay, callback),
            _not_send: PhantomData,
        }
    }

    /// Arm a periodic timer owned by the guard.
    pub fn interval(period: Duration, callback: impl FnMut() + 'static) -> Self {
        Self {
            id: set_interval(period, callback),
            _not_send: PhantomData,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// True until the timer fires (one-shot) or is cancelled.
    pub fn is_pending(&self) -> bool {
        is_pending(self.id)
    }

    /// Cancel now (alias for drop).
    pub fn cancel(self) {}
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        clear_timer(self.id);
    }
}

// =============================================================================
// TESTS
// =============================================================================
