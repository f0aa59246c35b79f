#![forbid(unsafe_code)]

//! The event loop tying the controller to a terminal.
//!
//! [`App`] holds everything that does not touch the terminal so the input
//! and timing rules can be tested headless; [`run`] wraps it in a
//! [`TerminalSession`] and drives it with the wall clock.

use std::io::{self, IsTerminal, Write};
use std::time::{Duration, Instant};

use boxbreath_core::event::{Command, Event};
use boxbreath_core::{BreathingController, SquareGeometry};
use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::terminal::{BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate};

use crate::canvas::Canvas;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::sink::TerminalSink;
use crate::terminal_session::{SessionOptions, TerminalSession};
use crate::viewport::Viewport;

pub const INTERACTIVE_HINT: &str = "space/click start·pause   r reset   q quit";
pub const DISPLAY_ONLY_HINT: &str = "input unavailable, display only   q quit";

/// Whether the loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Widget state plus the layout it is drawn into.
#[derive(Debug)]
pub struct App {
    controller: BreathingController<TerminalSink>,
    viewport: Viewport,
    interactive: bool,
    needs_clear: bool,
}

impl App {
    /// `interactive == false` leaves a display-only widget that ignores
    /// everything but quit.
    #[must_use]
    pub fn new(cols: u16, rows: u16, interactive: bool) -> Self {
        let geometry = SquareGeometry::STANDARD;
        Self {
            controller: BreathingController::with_geometry(TerminalSink::new(geometry), geometry),
            viewport: Viewport::new(cols, rows),
            interactive,
            needs_clear: true,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &BreathingController<TerminalSink> {
        &self.controller
    }

    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[must_use]
    pub const fn is_interactive(&self) -> bool {
        self.interactive
    }

    #[must_use]
    pub fn hint(&self) -> &'static str {
        if self.interactive {
            INTERACTIVE_HINT
        } else {
            DISPLAY_ONLY_HINT
        }
    }

    pub fn handle_event(&mut self, event: &Event) -> Flow {
        if let Event::Resize { width, height } = *event {
            self.resize(width, height);
            return Flow::Continue;
        }

        let Some(command) = Command::from_event(event) else {
            return Flow::Continue;
        };
        if command == Command::Quit {
            tracing::info!("quit requested");
            return Flow::Quit;
        }
        if !self.interactive {
            tracing::trace!(?command, "input ignored in display-only mode");
            return Flow::Continue;
        }

        match command {
            Command::Toggle => {
                if let Event::Mouse(mouse) = event {
                    if !self.viewport.hit(mouse.x, mouse.y) {
                        return Flow::Continue;
                    }
                }
                self.controller.toggle();
            }
            Command::Reset => self.controller.reset(),
            Command::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.viewport.size() != (cols, rows) {
            tracing::debug!(cols, rows, "terminal resized");
            self.viewport = Viewport::new(cols, rows);
            self.needs_clear = true;
            self.controller.sink_mut().mark_dirty();
        }
    }

    /// Move the widget's clock forward by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.controller.advance(dt);
    }

    /// How long to wait for input before the next frame or timer is due.
    #[must_use]
    pub fn poll_timeout(&self, frame_interval: Duration) -> Duration {
        match self.controller.time_until_next() {
            Some(due) => due.min(frame_interval),
            None => frame_interval,
        }
    }

    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_clear || self.controller.sink().is_dirty()
    }

    /// Render the current frame and clear the dirty state.
    ///
    /// The flag is `true` when the whole screen should be wiped first.
    pub fn frame(&mut self) -> (Canvas, bool) {
        self.controller.sink_mut().take_dirty();
        let clear = std::mem::take(&mut self.needs_clear);
        let canvas = self.controller.sink().render(&self.viewport, self.hint());
        (canvas, clear)
    }
}

/// How the terminal is set up given the config and whether stdin is a
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPlan {
    /// Keys and clicks drive the controller.
    pub interactive: bool,
    /// Input is read at all. Quit keys still work when not interactive.
    pub read_input: bool,
    /// Why there is no trigger input, reported once at startup.
    pub missing_reason: Option<&'static str>,
}

impl InputPlan {
    #[must_use]
    pub fn new(config: &AppConfig, stdin_is_tty: bool) -> Self {
        let missing_reason = if !config.input_enabled {
            Some("input disabled by configuration")
        } else if !stdin_is_tty {
            Some("stdin is not a terminal")
        } else {
            None
        };
        Self {
            interactive: missing_reason.is_none(),
            read_input: stdin_is_tty,
            missing_reason,
        }
    }

    /// Raw mode only when input is read, so Ctrl+C raises SIGINT otherwise.
    #[must_use]
    pub fn session_options(&self, config: &AppConfig) -> SessionOptions {
        SessionOptions {
            raw_mode: self.read_input,
            alternate_screen: config.alternate_screen,
            mouse_capture: self.interactive && config.mouse_capture,
        }
    }
}

fn report_missing_input(out: &mut impl Write, reason: &str) -> io::Result<()> {
    writeln!(out, "boxbreath: {reason}; showing a display-only widget")
}

/// Run the widget until quit or the configured exit deadline.
///
/// # Errors
///
/// Returns [`AppError::Io`] if the terminal cannot be set up or written.
pub fn run(config: &AppConfig) -> Result<(), AppError> {
    let stdin_is_tty = io::stdin().is_terminal();
    let plan = InputPlan::new(config, stdin_is_tty);
    if let Some(reason) = plan.missing_reason {
        tracing::warn!(reason, "no trigger input, showing a display-only widget");
        report_missing_input(&mut io::stderr(), reason)?;
    }

    let session = TerminalSession::new(plan.session_options(config))?;
    let (cols, rows) = session.size()?;
    let mut app = App::new(cols, rows, plan.interactive);
    tracing::info!(cols, rows, interactive = plan.interactive, "widget ready");

    let started = Instant::now();
    let mut last = started;
    loop {
        if app.needs_redraw() {
            let (canvas, clear) = app.frame();
            draw(&mut io::stdout(), &canvas, clear)?;
        }

        let mut wait = app.poll_timeout(config.frame_interval);
        if let Some(limit) = config.exit_after {
            wait = wait.min(limit.saturating_sub(last.duration_since(started)));
        }

        if plan.read_input {
            if session.poll_event(wait)? {
                if let Some(event) = session.read_event()? {
                    if app.handle_event(&event) == Flow::Quit {
                        break;
                    }
                }
            }
        } else {
            std::thread::sleep(wait);
        }

        let now = Instant::now();
        app.advance(now.duration_since(last));
        last = now;

        if config
            .exit_after
            .is_some_and(|limit| now.duration_since(started) >= limit)
        {
            tracing::info!("exit deadline reached");
            break;
        }
    }
    Ok(())
}

fn draw(out: &mut impl Write, canvas: &Canvas, clear: bool) -> io::Result<()> {
    crossterm::queue!(out, BeginSynchronizedUpdate)?;
    if clear {
        crossterm::queue!(out, Clear(ClearType::All))?;
    }
    for y in 0..canvas.height() {
        crossterm::queue!(out, MoveTo(0, y), Print(canvas.row(y)))?;
    }
    crossterm::queue!(out, EndSynchronizedUpdate)?;
    out.flush()
}
