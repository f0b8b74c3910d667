use std::{io, time::Duration};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use ratatui::DefaultTerminal;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// TUI application runtime.
///
/// Manages the event loop and executes applications that implement the
/// [`App`] trait. Where the terminal supports the kitty keyboard protocol,
/// key release reporting is switched on for the duration of the run so
/// applications can observe held keys.
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
    key_release_supported: bool,
}

impl Tui {
    /// Creates a new `Tui`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tick rate (Hz, ticks per second).
    pub fn set_tick_rate(&mut self, rate: f64) {
        self.events
            .set_tick_interval(Some(Duration::from_secs_f64(1.0 / rate)));
    }

    /// Sets the render rate (Hz, frames per second).
    pub fn set_render_rate(&mut self, rate: f64) {
        self.events
            .set_render_interval(Duration::from_secs_f64(1.0 / rate));
    }

    /// Whether the terminal reports key release events.
    ///
    /// Only meaningful once [`run`](Self::run) has entered the terminal;
    /// query it from [`App::init`].
    #[must_use]
    pub fn supports_key_release(&self) -> bool {
        self.key_release_supported
    }

    /// Runs the application.
    ///
    /// 1. Enters the terminal and probes keyboard enhancement support
    /// 2. Calls `app.init()` for initialization
    /// 3. Runs the event loop until `app.should_exit()` returns true
    ///    - `Tick`: calls `app.update()` with the elapsed time
    ///    - `Render`: calls `app.draw()`
    ///    - `Crossterm`: calls `app.handle_event()`
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|terminal| {
            self.key_release_supported =
                terminal::supports_keyboard_enhancement().unwrap_or(false);
            if self.key_release_supported {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }
            let result = self.event_loop(terminal, app);
            if self.key_release_supported {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn event_loop<A>(&mut self, terminal: &mut DefaultTerminal, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        app.init(self);

        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick(elapsed) => app.update(elapsed),
                TuiEvent::Render => {
                    terminal.draw(|frame| app.draw(frame))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(event),
            }
        }
        Ok(())
    }
}
