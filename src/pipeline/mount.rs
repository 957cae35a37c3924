//! Mount API - hosting a typewriter in the terminal.
//!
//! Starts an engine, wires its output signals to a [`LineRenderer`] through
//! one render effect, and drives the timer loop from real time.
//!
//! # Example
//!
//! ```ignore
//! use spark_typewriter::pipeline::mount;
//! use spark_typewriter::{presets, DrawnCursorConfig};
//!
//! let handle = mount::mount(presets::hero_tagline(), std::io::stdout(), DrawnCursorConfig::default())?;
//!
//! // Option 1: Run blocking event loop (raw mode, Esc / q / Ctrl+C to quit)
//! mount::run(&handle)?;
//!
//! // Option 2: Tick manually in your own loop
//! while mount::tick(&handle, std::time::Duration::from_millis(16))? {
//!     // Your logic here
//! }
//!
//! handle.unmount();
//! ```

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use log::{debug, warn};
use spark_signals::effect;

use crate::engine::{start_with_config, EngineHandle};
use crate::engine::timers;
use crate::error::Result;
use crate::renderer::LineRenderer;
use crate::state::drawn_cursor::DrawnCursorConfig;
use crate::types::{Frame, TypewriterConfig};

/// Longest the run loop waits between input polls.
pub const FRAME_BUDGET: Duration = Duration::from_millis(16);

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle returned by mount() that allows unmounting.
///
/// Holds the engine, the render effect stop function and the running flag.
pub struct MountHandle {
    engine: Option<EngineHandle>,
    stop_effect: Option<Box<dyn FnOnce()>>,
    running: Rc<Cell<bool>>,
    /// Wall time the timer clock was last advanced to
    last_advance: Cell<Instant>,
}

impl MountHandle {
    /// The engine being displayed.
    pub fn engine(&self) -> Option<&EngineHandle> {
        self.engine.as_ref()
    }

    /// Stop the render effect and the engine.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        self.running.set(false);

        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
        if let Some(engine) = self.engine.take() {
            engine.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Ask the run loop to exit. The engine keeps its state until unmount.
    pub fn stop(&self) {
        self.running.set(false);
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Start a typewriter and render it to `out` on every change.
///
/// The first frame is rendered immediately. Configuration errors are
/// returned before anything is written.
pub fn mount<W: Write + 'static>(
    config: TypewriterConfig,
    out: W,
    cursor: DrawnCursorConfig,
) -> Result<MountHandle> {
    let engine = start_with_config(config)?;

    let text = engine.text_signal();
    let cursor_on = engine.cursor_signal();
    let running = Rc::new(Cell::new(true));
    let running_clone = running.clone();

    let mut renderer = LineRenderer::new(out, cursor);

    // The ONE render effect
    let stop_fn = effect(move || {
        if !running_clone.get() {
            return;
        }

        let frame = Frame::new(text.get(), cursor_on.get());
        if let Err(err) = renderer.render(&frame) {
            warn!("tagline render failed: {}", err);
        }
    });

    debug!("typewriter {} mounted", engine.id());

    Ok(MountHandle {
        engine: Some(engine),
        stop_effect: Some(Box::new(stop_fn)),
        running,
        last_advance: Cell::new(Instant::now()),
    })
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Event Loop
// =============================================================================

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Advance the timer clock to wall time `now`.
///
/// Moves by everything since the previous advance, so time spent outside
/// [`tick`] (rendering, the caller's own work) is not lost. Returns the
/// number of timers fired.
fn advance_clock(handle: &MountHandle, now: Instant) -> usize {
    let last = handle.last_advance.get();
    let elapsed = now.saturating_duration_since(last);
    handle.last_advance.set(last.max(now));
    timers::advance(elapsed)
}

/// Run the loop once.
///
/// Waits for terminal input until the next timer deadline (at most
/// `max_wait`), then advances the timer clock by the real time that passed
/// since the previous tick.
///
/// # Returns
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (quit key or `handle.stop()`)
/// * `Err(e)` - I/O error while polling
pub fn tick(handle: &MountHandle, max_wait: Duration) -> Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    let wait = timers::time_until_next().map_or(max_wait, |due| due.min(max_wait));

    if event::poll(wait)? {
        if let Event::Key(key) = event::read()? {
            if is_quit_key(&key) {
                debug!("quit key pressed");
                handle.stop();
            }
        }
    }

    advance_clock(handle, Instant::now());

    Ok(handle.is_running())
}

/// Restores the terminal even if the loop bails out with an error.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), Hide)?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, Print("\r\n"));
        let _ = disable_raw_mode();
    }
}

/// Run the event loop (blocking until stopped).
///
/// Puts the terminal in raw mode and hides the native cursor for the
/// duration; both are restored on exit.
pub fn run(handle: &MountHandle) -> Result<()> {
    let _guard = RawModeGuard::enter()?;
    // Setup time before the loop does not count as elapsed
    handle.last_advance.set(Instant::now());
    while tick(handle, FRAME_BUDGET)? {
        // Continue processing events
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{active_engine_count, reset_engines};
    use crate::engine::timers::{advance, pending_timer_count, reset_timers};
    use std::cell::RefCell;

    /// Writer whose buffer stays readable after being moved into the effect.
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    fn setup() {
        reset_engines();
        reset_timers();
    }

    #[test]
    fn test_mount_renders_first_frame() {
        setup();

        let buf = SharedBuffer::default();
        let handle = mount(
            TypewriterConfig::new(["hi"], 100, 100),
            buf.clone(),
            DrawnCursorConfig::default(),
        )
        .unwrap();

        assert!(handle.is_running());
        assert!(buf.contents().contains('|'));
    }

    #[test]
    fn test_mount_renders_typing() {
        setup();

        let buf = SharedBuffer::default();
        let _handle = mount(
            TypewriterConfig::new(["hi"], 100, 100),
            buf.clone(),
            DrawnCursorConfig::default(),
        )
        .unwrap();

        advance(Duration::from_millis(200));
        assert!(buf.contents().contains("h|"));
        assert!(buf.contents().contains("hi|"));
    }

    #[test]
    fn test_mount_rejects_invalid_config() {
        setup();

        let buf = SharedBuffer::default();
        let result = mount(
            TypewriterConfig::new(["hi"], 0, 100),
            buf.clone(),
            DrawnCursorConfig::default(),
        );

        assert!(result.is_err());
        assert!(buf.contents().is_empty());
        assert_eq!(active_engine_count(), 0);
    }

    #[test]
    fn test_unmount_stops_rendering() {
        setup();

        let buf = SharedBuffer::default();
        let handle = mount(
            TypewriterConfig::new(["hello"], 10, 10),
            buf.clone(),
            DrawnCursorConfig::default(),
        )
        .unwrap();

        advance(Duration::from_millis(20));
        handle.unmount();
        let written = buf.contents();

        assert_eq!(active_engine_count(), 0);
        assert_eq!(pending_timer_count(), 0);

        advance(Duration::from_millis(1000));
        assert_eq!(buf.contents(), written);
    }

    #[test]
    fn test_stop_flag_ends_tick() {
        setup();

        let handle = mount(
            TypewriterConfig::new(["x"], 10, 10),
            SharedBuffer::default(),
            DrawnCursorConfig::default(),
        )
        .unwrap();

        handle.stop();
        assert!(!tick(&handle, Duration::ZERO).unwrap());
        // Engine survives until unmount
        assert_eq!(active_engine_count(), 1);
    }

    #[test]
    fn test_clock_follows_wall_time_between_ticks() {
        setup();

        let buf = SharedBuffer::default();
        let handle = mount(
            TypewriterConfig::new(["hello"], 100, 100),
            buf.clone(),
            DrawnCursorConfig::default(),
        )
        .unwrap();
        let t0 = handle.last_advance.get();

        // Work done between polls still moves the clock
        assert_eq!(advance_clock(&handle, t0 + Duration::from_millis(250)), 2);
        assert_eq!(timers::now(), Duration::from_millis(250));
        assert_eq!(handle.engine().unwrap().text(), "he");

        assert_eq!(advance_clock(&handle, t0 + Duration::from_millis(350)), 1);
        assert_eq!(timers::now(), Duration::from_millis(350));
        assert_eq!(handle.engine().unwrap().text(), "hel");
        assert!(buf.contents().contains("hel|"));
    }

    #[test]
    fn test_clock_ignores_instants_in_the_past() {
        setup();

        let handle = mount(
            TypewriterConfig::new(["hello"], 100, 100),
            SharedBuffer::default(),
            DrawnCursorConfig::default(),
        )
        .unwrap();
        let t0 = handle.last_advance.get();

        advance_clock(&handle, t0 + Duration::from_millis(150));
        assert_eq!(advance_clock(&handle, t0), 0);
        assert_eq!(timers::now(), Duration::from_millis(150));

        // Time is measured from the latest instant seen, never counted twice
        advance_clock(&handle, t0 + Duration::from_millis(200));
        assert_eq!(timers::now(), Duration::from_millis(200));
    }

    #[test]
    fn test_quit_keys() {
        let press = |code, modifiers| KeyEvent::new(code, modifiers);

        assert!(is_quit_key(&press(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_quit_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_quit_key(&press(KeyCode::Enter, KeyModifiers::NONE)));
    }
}
