#![forbid(unsafe_code)]

//! RAII guard for terminal state.
//!
//! [`TerminalSession`] enters raw mode, optionally switches to the alternate
//! screen and captures the mouse, and hides the cursor. Everything it turns
//! on is turned off again in reverse order when it is dropped.
//!
//! Cleanup also runs when:
//! - a panic unwinds (through a panic hook installed once per process);
//! - SIGINT or SIGTERM arrives on Unix, after which the process exits with
//!   `128 + signal`.
//!
//! Cleanup is best-effort: errors while restoring the terminal are ignored.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use boxbreath_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Which terminal modes a session turns on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Disable line buffering and echo. Requires a terminal on stdin; leave
    /// it off for a display-only session so Ctrl+C still raises SIGINT.
    pub raw_mode: bool,

    /// Draw on the alternate screen buffer, restoring scrollback on exit.
    pub alternate_screen: bool,

    /// Report mouse clicks.
    pub mouse_capture: bool,
}

/// Owns the terminal configuration and restores it on drop.
#[derive(Debug)]
pub struct TerminalSession {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enable the requested modes and hide the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if any mode cannot be enabled. Modes enabled before
    /// the failure are restored when the partial session drops.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        let mut session = Self {
            raw_mode_enabled: false,
            alternate_screen_enabled: false,
            mouse_enabled: false,
            #[cfg(unix)]
            signal_guard: Some(SignalGuard::new()?),
        };

        if options.raw_mode {
            crossterm::terminal::enable_raw_mode()?;
            session.raw_mode_enabled = true;
            tracing::info!("terminal raw mode enabled");
        }

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            tracing::info!("alternate screen enabled");
        }

        if options.mouse_capture {
            crossterm::execute!(stdout, crossterm::event::EnableMouseCapture)?;
            session.mouse_enabled = true;
            tracing::info!("mouse capture enabled");
        }

        crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        Ok(session)
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for input.
    ///
    /// Returns `Ok(true)` if an event is ready to read.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event, blocking until one arrives.
    ///
    /// Returns `Ok(None)` for input the widget has no representation for.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        let event = crossterm::event::read()?;
        Ok(map_crossterm_event(event))
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();

        if self.mouse_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
            self.mouse_enabled = false;
            tracing::info!("mouse capture disabled");
        }

        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            tracing::info!("alternate screen disabled");
        }

        if self.raw_mode_enabled {
            let _ = crossterm::terminal::disable_raw_mode();
            self.raw_mode_enabled = false;
            tracing::info!("terminal raw mode disabled");
        }

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

// Undo every mode a session may have enabled, whether or not it did.
fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::event::DisableMouseCapture);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Background thread that restores the terminal and exits on SIGINT/SIGTERM.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::warn!(signal, "termination signal received, cleaning up");
                best_effort_cleanup();
                std::process::exit(128 + signal);
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

pub(crate) fn map_crossterm_event(event: crossterm::event::Event) -> Option<Event> {
    match event {
        crossterm::event::Event::Key(key) => Some(Event::Key(map_key_event(key))),
        crossterm::event::Event::Mouse(mouse) => Some(Event::Mouse(map_mouse_event(mouse))),
        crossterm::event::Event::Resize(width, height) => Some(Event::Resize { width, height }),
        crossterm::event::Event::FocusGained => Some(Event::Focus(true)),
        crossterm::event::Event::FocusLost => Some(Event::Focus(false)),
        crossterm::event::Event::Paste(_) => None,
    }
}

fn map_key_event(event: crossterm::event::KeyEvent) -> KeyEvent {
    KeyEvent::new(map_key_code(event.code))
        .with_modifiers(map_modifiers(event.modifiers))
        .with_kind(map_key_kind(event.kind))
}

fn map_key_kind(kind: crossterm::event::KeyEventKind) -> KeyEventKind {
    match kind {
        crossterm::event::KeyEventKind::Press => KeyEventKind::Press,
        crossterm::event::KeyEventKind::Repeat => KeyEventKind::Repeat,
        crossterm::event::KeyEventKind::Release => KeyEventKind::Release,
    }
}

fn map_key_code(code: crossterm::event::KeyCode) -> KeyCode {
    use crossterm::event::{KeyCode as Ct, MediaKeyCode};

    match code {
        Ct::Char(c) => KeyCode::Char(c),
        Ct::Enter => KeyCode::Enter,
        Ct::Esc => KeyCode::Escape,
        Ct::Backspace => KeyCode::Backspace,
        Ct::Tab => KeyCode::Tab,
        Ct::Up => KeyCode::Up,
        Ct::Down => KeyCode::Down,
        Ct::Left => KeyCode::Left,
        Ct::Right => KeyCode::Right,
        Ct::Media(MediaKeyCode::Play | MediaKeyCode::Pause | MediaKeyCode::PlayPause) => {
            KeyCode::MediaPlayPause
        }
        _ => KeyCode::Other,
    }
}

fn map_modifiers(modifiers: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers as Km;

    let mut mapped = Modifiers::NONE;
    if modifiers.contains(Km::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(Km::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(Km::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.intersects(Km::SUPER | Km::HYPER | Km::META) {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

fn map_mouse_event(event: crossterm::event::MouseEvent) -> MouseEvent {
    use crossterm::event::MouseEventKind as Ct;

    let kind = match event.kind {
        Ct::Down(button) => MouseEventKind::Down(map_mouse_button(button)),
        Ct::Up(button) => MouseEventKind::Up(map_mouse_button(button)),
        Ct::Drag(button) => MouseEventKind::Drag(map_mouse_button(button)),
        Ct::Moved => MouseEventKind::Moved,
        Ct::ScrollUp | Ct::ScrollDown | Ct::ScrollLeft | Ct::ScrollRight => MouseEventKind::Scroll,
    };

    MouseEvent::new(kind, event.column, event.row).with_modifiers(map_modifiers(event.modifiers))
}

fn map_mouse_button(button: crossterm::event::MouseButton) -> MouseButton {
    match button {
        crossterm::event::MouseButton::Left => MouseButton::Left,
        crossterm::event::MouseButton::Right => MouseButton::Right,
        crossterm::event::MouseButton::Middle => MouseButton::Middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event as ct;

    #[test]
    fn session_options_default_enables_nothing() {
        let opts = SessionOptions::default();
        assert!(!opts.raw_mode);
        assert!(!opts.alternate_screen);
        assert!(!opts.mouse_capture);
    }

    #[test]
    fn maps_key_press_with_modifiers() {
        let ev = ct::Event::Key(ct::KeyEvent::new(
            ct::KeyCode::Char('c'),
            ct::KeyModifiers::CONTROL | ct::KeyModifiers::SHIFT,
        ));
        let Some(Event::Key(key)) = map_crossterm_event(ev) else {
            panic!("expected key event");
        };
        assert!(key.is_char('c'));
        assert!(key.ctrl());
        assert!(key.modifiers.contains(Modifiers::SHIFT));
        assert_eq!(key.kind, KeyEventKind::Press);
    }

    #[test]
    fn maps_key_codes() {
        assert_eq!(map_key_code(ct::KeyCode::Esc), KeyCode::Escape);
        assert_eq!(map_key_code(ct::KeyCode::Enter), KeyCode::Enter);
        assert_eq!(
            map_key_code(ct::KeyCode::Media(ct::MediaKeyCode::PlayPause)),
            KeyCode::MediaPlayPause
        );
        assert_eq!(map_key_code(ct::KeyCode::F(5)), KeyCode::Other);
    }

    #[test]
    fn maps_release_kind() {
        let ev = ct::KeyEvent::new_with_kind(
            ct::KeyCode::Char(' '),
            ct::KeyModifiers::NONE,
            ct::KeyEventKind::Release,
        );
        assert_eq!(map_key_event(ev).kind, KeyEventKind::Release);
    }

    #[test]
    fn maps_mouse_click() {
        let ev = ct::Event::Mouse(ct::MouseEvent {
            kind: ct::MouseEventKind::Down(ct::MouseButton::Left),
            column: 12,
            row: 7,
            modifiers: ct::KeyModifiers::NONE,
        });
        assert_eq!(
            map_crossterm_event(ev),
            Some(Event::Mouse(MouseEvent::new(
                MouseEventKind::Down(MouseButton::Left),
                12,
                7
            )))
        );
    }

    #[test]
    fn maps_scroll_and_focus_and_resize() {
        let scroll = ct::MouseEvent {
            kind: ct::MouseEventKind::ScrollLeft,
            column: 0,
            row: 0,
            modifiers: ct::KeyModifiers::NONE,
        };
        assert_eq!(map_mouse_event(scroll).kind, MouseEventKind::Scroll);
        assert_eq!(
            map_crossterm_event(ct::Event::FocusLost),
            Some(Event::Focus(false))
        );
        assert_eq!(
            map_crossterm_event(ct::Event::Resize(100, 30)),
            Some(Event::Resize {
                width: 100,
                height: 30
            })
        );
    }

    #[test]
    fn paste_is_dropped() {
        assert_eq!(map_crossterm_event(ct::Event::Paste("hi".into())), None);
    }

    #[test]
    fn meta_and_hyper_fold_into_super() {
        assert_eq!(map_modifiers(ct::KeyModifiers::META), Modifiers::SUPER);
        assert_eq!(map_modifiers(ct::KeyModifiers::HYPER), Modifiers::SUPER);
        assert_eq!(map_modifiers(ct::KeyModifiers::NONE), Modifiers::NONE);
    }
}
