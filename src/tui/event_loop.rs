//! # Event Loop
//!
//! Owns the screen, the alarm queue and the exit state. One thread pumps
//! input, redraws and timers; every callback runs on that thread with
//! `&mut EventLoop` and `&mut PegasusGui`, so nothing needs a lock.
//!
//! ## Headless
//!
//! With `headless = true` there is no screen: `run` returns at once, alarm
//! operations are no-ops, and `exit(code)` terminates the process with
//! `code` instead of stopping the loop.
//!
//! ## Redraw Strategy
//!
//! The loop only draws after something happened (input, an alarm, a posted
//! task, a resize). When idle it sleeps until the next alarm is due, capped
//! at 500ms.

use log::{debug, error, info, warn};
use std::io::{self, stdout};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::alarm::{AlarmHandle, AlarmQueue};
use crate::core::config::Config;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::gui::PegasusGui;

/// One-shot work run on the UI thread (alarms).
pub type UiCallback = Box<dyn FnOnce(&mut EventLoop, &mut PegasusGui)>;

/// Work posted from another thread through a [`UiSender`].
pub type UiTask = Box<dyn FnOnce(&mut EventLoop, &mut PegasusGui) + Send>;

/// Receives keys that no view consumed (controller hotkeys).
pub type InputHandler = Box<dyn FnMut(&mut EventLoop, &mut PegasusGui, &TuiEvent)>;

const IDLE_POLL: Duration = Duration::from_millis(500);

/// Message shown when the user backs out of setup.
pub const CANCEL_MESSAGE: &str = "Installation cancelled.";

/// Cloneable handle for background threads to hand work to the UI thread.
#[derive(Clone)]
pub struct UiSender {
    tx: mpsc::Sender<UiTask>,
}

impl UiSender {
    /// Returns `false` if the loop is gone.
    pub fn post(&self, task: impl FnOnce(&mut EventLoop, &mut PegasusGui) + Send + 'static) -> bool {
        self.tx.send(Box::new(task)).is_ok()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Something the loop can draw the GUI onto.
trait Surface {
    fn draw(&mut self, gui: &mut PegasusGui) -> io::Result<()>;
}

/// The live terminal. Dropping it puts the terminal back the way it was.
struct Screen {
    terminal: DefaultTerminal,
    _modes: TerminalModeGuard,
}

impl Screen {
    fn acquire() -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        let modes = match TerminalModeGuard::new() {
            Ok(modes) => modes,
            Err(e) => {
                ratatui::restore();
                return Err(e);
            }
        };
        Ok(Self {
            terminal,
            _modes: modes,
        })
    }
}

impl Surface for Screen {
    fn draw(&mut self, gui: &mut PegasusGui) -> io::Result<()> {
        self.terminal.draw(|frame| gui.render(frame)).map(|_| ())
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

pub struct EventLoop {
    config: Config,
    alarms: AlarmQueue<UiCallback>,
    error_code: i32,
    exit_requested: bool,
    needs_redraw: bool,
    screen: Option<Box<dyn Surface>>,
    unhandled_input: Option<InputHandler>,
    tasks_tx: mpsc::Sender<UiTask>,
    tasks_rx: mpsc::Receiver<UiTask>,
    terminate: fn(i32) -> !,
}

impl EventLoop {
    /// Build a loop bound to `config`. The terminal is only taken over once
    /// [`run`](EventLoop::run) is called.
    pub fn build(config: Config) -> Self {
        let (tasks_tx, tasks_rx) = mpsc::channel();
        info!("Building event loop (headless={})", config.headless);
        Self {
            config,
            alarms: AlarmQueue::new(),
            error_code: 0,
            exit_requested: false,
            needs_redraw: true,
            screen: None,
            unhandled_input: None,
            tasks_tx,
            tasks_rx,
            terminate: std::process::exit,
        }
    }

    /// Replace the function used to terminate the process.
    pub fn with_terminator(mut self, terminate: fn(i32) -> !) -> Self {
        self.terminate = terminate;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn is_headless(&self) -> bool {
        self.config.headless
    }

    /// Exit code recorded by the last [`exit`](EventLoop::exit).
    pub fn error_code(&self) -> i32 {
        self.error_code
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn sender(&self) -> UiSender {
        UiSender {
            tx: self.tasks_tx.clone(),
        }
    }

    pub fn set_unhandled_input(
        &mut self,
        handler: impl FnMut(&mut EventLoop, &mut PegasusGui, &TuiEvent) + 'static,
    ) {
        self.unhandled_input = Some(Box::new(handler));
    }

    /// Stop the loop with `code`. Headless runs have no loop to stop, so the
    /// process exits immediately instead.
    pub fn exit(&mut self, code: i32) {
        self.error_code = code;
        info!("Stopping eventloop");
        self.remove_all_alarms();
        if self.config.headless {
            (self.terminate)(code);
        }
        self.exit_requested = true;
    }

    /// Give up on setup entirely: restore the terminal, print `message` and
    /// terminate with status 1.
    pub fn abort(&mut self, message: &str) -> ! {
        warn!("Aborting: {message}");
        self.alarms.cancel_all();
        self.error_code = 1;
        // Dropping the screen restores the terminal before we print.
        self.screen = None;
        eprintln!("{message}");
        (self.terminate)(1)
    }

    /// Draw the GUI now. A draw failure is logged and returned; it is never
    /// swallowed. Without a live screen this just marks a redraw as due.
    pub fn redraw_screen(&mut self, gui: &mut PegasusGui) -> io::Result<()> {
        if self.config.headless {
            return Ok(());
        }
        let Some(screen) = self.screen.as_mut() else {
            self.needs_redraw = true;
            return Ok(());
        };
        match screen.draw(gui) {
            Ok(_) => {
                self.needs_redraw = false;
                Ok(())
            }
            Err(e) => {
                error!("exception failure in redraw_screen: {e}");
                Err(e)
            }
        }
    }

    /// Run `cb` once after `interval`. Returns `None` when headless.
    pub fn set_alarm_in(
        &mut self,
        interval: Duration,
        cb: impl FnOnce(&mut EventLoop, &mut PegasusGui) + 'static,
    ) -> Option<AlarmHandle> {
        if self.config.headless {
            return None;
        }
        let handle = self.alarms.schedule(Instant::now(), interval, Box::new(cb));
        debug!("Alarm {handle:?} set in {interval:?}");
        Some(handle)
    }

    /// Cancel one alarm. Returns `false` when headless or when the alarm
    /// already fired or was removed.
    pub fn remove_alarm(&mut self, handle: AlarmHandle) -> bool {
        if self.config.headless {
            return false;
        }
        let removed = self.alarms.cancel(handle);
        debug!("Alarm {handle:?} removed: {removed}");
        removed
    }

    /// Cancel every pending alarm. Returns how many were dropped.
    pub fn remove_all_alarms(&mut self) -> usize {
        let count = self.alarms.cancel_all();
        if count > 0 {
            info!("Removed {count} pending alarms");
        }
        count
    }

    pub fn pending_alarms(&self) -> usize {
        self.alarms.len()
    }

    /// Block pumping input, timers and posted tasks until
    /// [`exit`](EventLoop::exit) is called. Returns immediately when headless.
    /// Pending alarms never outlive the run, whether it ends cleanly or not.
    pub fn run(&mut self, gui: &mut PegasusGui) -> io::Result<()> {
        if self.config.headless {
            return Ok(());
        }
        let result = self.pump(gui);
        self.screen = None;
        self.remove_all_alarms();
        if let Err(e) = &result {
            error!("Exception in event loop run: {e}");
        }
        info!("Event loop finished (error_code={})", self.error_code);
        result
    }

    fn pump(&mut self, gui: &mut PegasusGui) -> io::Result<()> {
        if self.screen.is_none() {
            self.screen = Some(Box::new(Screen::acquire()?));
        }
        self.needs_redraw = true;

        while !self.exit_requested {
            if self.needs_redraw {
                self.redraw_screen(gui)?;
            }

            let timeout = self
                .alarms
                .time_until_next(Instant::now())
                .map_or(IDLE_POLL, |until| until.min(IDLE_POLL));

            // Process first event + drain ALL pending events before next draw
            let first_event = poll_event_timeout(timeout)?;
            let mut next = first_event;
            while let Some(event) = next {
                self.dispatch(gui, event);
                if self.exit_requested {
                    break;
                }
                next = poll_event_immediate()?;
            }

            self.run_expired_alarms(gui, Instant::now());
            self.run_pending_tasks(gui);
        }
        Ok(())
    }

    /// Route one event: Ctrl+C stops the loop, resizes redraw, everything
    /// else goes to the GUI and then to the unhandled-input hook.
    pub fn dispatch(&mut self, gui: &mut PegasusGui, event: TuiEvent) {
        self.needs_redraw = true;
        match event {
            TuiEvent::ForceQuit => self.exit(0),
            TuiEvent::Resize => {}
            event => {
                let Some(unhandled) = gui.keypress(self, &event) else {
                    return;
                };
                if let Some(mut handler) = self.unhandled_input.take() {
                    handler(self, gui, &unhandled);
                    // The handler may have installed a replacement
                    if self.unhandled_input.is_none() {
                        self.unhandled_input = Some(handler);
                    }
                } else {
                    debug!("Unhandled input: {unhandled:?}");
                }
            }
        }
    }

    /// Fire alarms due at `now`. Alarms scheduled by these callbacks wait for
    /// the next pass. Returns how many fired.
    pub fn run_expired_alarms(&mut self, gui: &mut PegasusGui, now: Instant) -> usize {
        let watermark = self.alarms.watermark();
        let mut fired = 0;
        while let Some((handle, callback)) = self.alarms.pop_expired(now, watermark) {
            debug!("Alarm {handle:?} fired");
            callback(self, gui);
            fired += 1;
        }
        if fired > 0 {
            self.needs_redraw = true;
        }
        fired
    }

    /// Run everything posted through [`UiSender`]s so far.
    pub fn run_pending_tasks(&mut self, gui: &mut PegasusGui) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.tasks_rx.try_recv() {
            task(self, gui);
            ran += 1;
        }
        if ran > 0 {
            self.needs_redraw = true;
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{exit_code_of, panicking_exit, test_gui};
    use std::cell::Cell;
    use std::rc::Rc;

    fn interactive() -> EventLoop {
        EventLoop::build(Config::default()).with_terminator(panicking_exit)
    }

    fn headless() -> EventLoop {
        EventLoop::build(Config::headless()).with_terminator(panicking_exit)
    }

    #[test]
    fn test_headless_run_returns_immediately() {
        let mut ev = headless();
        let mut gui = test_gui();
        ev.run(&mut gui).unwrap();
        assert!(!ev.exit_requested());
    }

    #[test]
    fn test_headless_exit_terminates_with_code() {
        let mut ev = headless();
        let code = exit_code_of(|| ev.exit(3));
        assert_eq!(code, Some(3));
        assert_eq!(ev.error_code(), 3);
        assert!(!ev.exit_requested(), "no loop-exit signal when headless");
    }

    #[test]
    fn test_interactive_exit_stops_loop() {
        let mut ev = interactive();
        ev.exit(1);
        assert!(ev.exit_requested());
        assert_eq!(ev.error_code(), 1);
    }

    #[test]
    fn test_headless_alarms_are_noops() {
        let mut ev = headless();
        assert!(ev.set_alarm_in(Duration::ZERO, |_, _| {}).is_none());
        assert_eq!(ev.pending_alarms(), 0);

        let mut other = interactive();
        let handle = other.set_alarm_in(Duration::ZERO, |_, _| {}).unwrap();
        assert!(!ev.remove_alarm(handle));
    }

    #[test]
    fn test_alarm_fires_once() {
        let mut ev = interactive();
        let mut gui = test_gui();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        ev.set_alarm_in(Duration::ZERO, move |_, _| counter.set(counter.get() + 1));

        assert_eq!(ev.run_expired_alarms(&mut gui, Instant::now()), 1);
        assert_eq!(ev.run_expired_alarms(&mut gui, Instant::now()), 0);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_removed_alarm_does_not_fire() {
        let mut ev = interactive();
        let mut gui = test_gui();
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let handle = ev
            .set_alarm_in(Duration::ZERO, move |_, _| counter.set(1))
            .unwrap();

        assert!(ev.remove_alarm(handle));
        assert_eq!(ev.run_expired_alarms(&mut gui, Instant::now()), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_alarm_rescheduling_waits_for_next_pass() {
        let mut ev = interactive();
        let mut gui = test_gui();
        fn tick(ev: &mut EventLoop, _: &mut PegasusGui) {
            ev.set_alarm_in(Duration::ZERO, tick);
        }
        ev.set_alarm_in(Duration::ZERO, tick);

        assert_eq!(ev.run_expired_alarms(&mut gui, Instant::now()), 1);
        assert_eq!(ev.pending_alarms(), 1);
    }

    #[test]
    fn test_redraw_without_screen_is_ok() {
        let mut ev = interactive();
        let mut gui = test_gui();
        ev.redraw_screen(&mut gui).unwrap();
    }

    #[test]
    fn test_posted_tasks_run_on_loop() {
        let mut ev = interactive();
        let mut gui = test_gui();
        let sender = ev.sender();
        let worker = std::thread::spawn(move || {
            sender.post(|_, gui| gui.status_message("deployed from worker"));
        });
        worker.join().unwrap();

        assert_eq!(ev.run_pending_tasks(&mut gui), 1);
        assert_eq!(
            gui.footer().map(|f| f.message().to_string()),
            Some("deployed from worker".to_string())
        );
    }

    #[test]
    fn test_force_quit_exits_with_zero() {
        let mut ev = interactive();
        let mut gui = test_gui();
        ev.dispatch(&mut gui, TuiEvent::ForceQuit);
        assert!(ev.exit_requested());
        assert_eq!(ev.error_code(), 0);
    }

    #[test]
    fn test_unhandled_input_reaches_hook() {
        let mut ev = interactive();
        let mut gui = test_gui();
        ev.set_unhandled_input(|ev, _, event| {
            if *event == TuiEvent::InputChar('q') {
                ev.exit(0);
            }
        });

        ev.dispatch(&mut gui, TuiEvent::InputChar('x'));
        assert!(!ev.exit_requested());
        ev.dispatch(&mut gui, TuiEvent::InputChar('q'));
        assert!(ev.exit_requested());
    }

    #[test]
    fn test_exit_cancels_pending_alarms() {
        let mut ev = interactive();
        for secs in [1, 5, 60] {
            ev.set_alarm_in(Duration::from_secs(secs), |_, _| {});
        }
        ev.exit(0);
        assert_eq!(ev.pending_alarms(), 0);
    }

    #[test]
    fn test_huge_alarm_interval_never_fires() {
        let mut ev = interactive();
        let mut gui = test_gui();
        assert!(ev.set_alarm_in(Duration::MAX, |_, _| {}).is_some());

        let in_an_hour = Instant::now() + Duration::from_secs(3600);
        assert_eq!(ev.run_expired_alarms(&mut gui, in_an_hour), 0);
        assert_eq!(ev.pending_alarms(), 1);
    }

    struct BrokenTerminal;

    impl Surface for BrokenTerminal {
        fn draw(&mut self, _gui: &mut PegasusGui) -> io::Result<()> {
            Err(io::Error::other("terminal went away"))
        }
    }

    #[test]
    fn test_redraw_failure_is_returned() {
        let mut ev = interactive();
        let mut gui = test_gui();
        ev.screen = Some(Box::new(BrokenTerminal));

        let err = ev.redraw_screen(&mut gui).unwrap_err();
        assert_eq!(err.to_string(), "terminal went away");
        assert!(ev.needs_redraw, "a failed draw is still owed");
    }

    #[test]
    fn test_run_returns_draw_error_and_clears_alarms() {
        let mut ev = interactive();
        let mut gui = test_gui();
        ev.set_alarm_in(Duration::from_secs(30), |_, _| {});
        ev.screen = Some(Box::new(BrokenTerminal));

        let err = ev.run(&mut gui).unwrap_err();
        assert_eq!(err.to_string(), "terminal went away");
        assert_eq!(ev.pending_alarms(), 0);
        assert!(ev.screen.is_none());
    }

    #[test]
    fn test_abort_terminates_with_one() {
        let mut ev = interactive();
        ev.set_alarm_in(Duration::from_secs(10), |_, _| {});
        let code = exit_code_of(|| ev.abort(CANCEL_MESSAGE));
        assert_eq!(code, Some(1));
        assert_eq!(ev.pending_alarms(), 0);
    }
}
