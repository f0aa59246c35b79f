//! Headless runs of the terminal app: events in, frames out.

use std::time::Duration;

use boxbreath_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use boxbreath_core::{ControllerStatus, IDLE_GLYPH, PAUSE_GLYPH};
use boxbreath_tty::sink::POINT_GLYPH;
use boxbreath_tty::{App, Flow};

fn space() -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(' ')))
}

fn frame_text(app: &mut App) -> String {
    app.frame().0.to_text()
}

#[test]
fn full_cycle_renders_each_label() {
    let mut app = App::new(80, 24, true);
    app.handle_event(&space());
    let mut labels = Vec::new();
    for _ in 0..4 {
        let text = frame_text(&mut app);
        let label = ["INHALE", "HOLD", "EXHALE"]
            .into_iter()
            .find(|l| text.contains(l))
            .unwrap_or("?");
        labels.push(label);
        app.advance(Duration::from_secs(4));
    }
    assert_eq!(labels, ["INHALE", "HOLD", "EXHALE", "HOLD"]);
}

#[test]
fn pause_shows_glyphs_in_order() {
    let mut app = App::new(80, 24, true);
    app.handle_event(&space());
    app.advance(Duration::from_secs(1));
    app.handle_event(&space());
    assert!(frame_text(&mut app).contains(PAUSE_GLYPH));

    app.advance(Duration::from_secs(3));
    assert_eq!(app.controller().status(), ControllerStatus::PausedPending(1));
    assert!(frame_text(&mut app).contains(PAUSE_GLYPH));

    app.advance(Duration::from_secs(1));
    assert_eq!(app.controller().status(), ControllerStatus::PausedIdle(1));
    assert!(frame_text(&mut app).contains(IDLE_GLYPH));
}

#[test]
fn point_reaches_top_left_after_inhale() {
    let mut app = App::new(80, 24, true);
    let square = app.viewport().square().unwrap();
    app.handle_event(&space());
    app.advance(Duration::from_secs(4));
    let canvas = app.frame().0;
    assert_eq!(canvas.get(square.x, square.y), Some(POINT_GLYPH));
}

#[test]
fn click_on_square_toggles() {
    let mut app = App::new(80, 24, true);
    let square = app.viewport().square().unwrap();
    let click = Event::Mouse(MouseEvent::new(
        MouseEventKind::Down(MouseButton::Left),
        square.x + 1,
        square.y + 1,
    ));
    assert_eq!(app.handle_event(&click), Flow::Continue);
    assert!(app.controller().is_running());
    app.handle_event(&click);
    assert!(app.controller().is_pause_requested());
}

#[test]
fn idle_app_needs_no_redraw() {
    let mut app = App::new(80, 24, true);
    let _ = app.frame();
    app.advance(Duration::from_secs(30));
    assert!(!app.needs_redraw());
}
