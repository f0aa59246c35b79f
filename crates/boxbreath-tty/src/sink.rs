#![forbid(unsafe_code)]

//! [`DisplaySink`] that draws the widget into a [`Canvas`].

use std::time::Duration;

use boxbreath_core::animation::PointMotion;
use boxbreath_core::{DisplaySink, PhaseAction, Point, SquareGeometry, Transition};

use crate::canvas::Canvas;
use crate::viewport::Viewport;

/// Glyph for the moving point.
pub const POINT_GLYPH: char = '●';

const TOO_SMALL: &str = "terminal too small";

/// Box-drawing characters for the square border.
struct Border;

impl Border {
    const TOP_LEFT: char = '┌';
    const TOP_RIGHT: char = '┐';
    const BOTTOM_LEFT: char = '└';
    const BOTTOM_RIGHT: char = '┘';
    const HORIZONTAL: char = '─';
    const VERTICAL: char = '│';
}

/// Keeps the label and point state and renders it on demand.
///
/// Any change that affects the picture marks the sink dirty; the host
/// redraws only when [`take_dirty`](Self::take_dirty) says so.
#[derive(Debug, Clone)]
pub struct TerminalSink {
    geometry: SquareGeometry,
    motion: PointMotion,
    label: String,
    dirty: bool,
    flushes: u64,
}

impl TerminalSink {
    #[must_use]
    pub fn new(geometry: SquareGeometry) -> Self {
        Self {
            geometry,
            motion: PointMotion::new(geometry.target(PhaseAction::HoldBottom)),
            label: String::new(),
            dirty: true,
            flushes: 0,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag, returning its previous value.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    #[must_use]
    pub const fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// Draw the square, the point, the label and `hint` for `viewport`.
    #[must_use]
    pub fn render(&self, viewport: &Viewport, hint: &str) -> Canvas {
        let (cols, rows) = viewport.size();
        let mut canvas = Canvas::new(cols, rows);

        let Some(sq) = viewport.square() else {
            canvas.put_centered(0, cols, 0, TOO_SMALL);
            return canvas;
        };

        let right = sq.right() - 1;
        let bottom = sq.bottom() - 1;
        for x in sq.x + 1..right {
            canvas.put(x, sq.y, Border::HORIZONTAL);
            canvas.put(x, bottom, Border::HORIZONTAL);
        }
        for y in sq.y + 1..bottom {
            canvas.put(sq.x, y, Border::VERTICAL);
            canvas.put(right, y, Border::VERTICAL);
        }
        canvas.put(sq.x, sq.y, Border::TOP_LEFT);
        canvas.put(right, sq.y, Border::TOP_RIGHT);
        canvas.put(sq.x, bottom, Border::BOTTOM_LEFT);
        canvas.put(right, bottom, Border::BOTTOM_RIGHT);

        if let Some(row) = viewport.label_row() {
            canvas.put_centered(sq.x + 1, right, row, &self.label);
        }

        let (u, v) = self.geometry.normalized(self.motion.rendered());
        if let Some((x, y)) = viewport.cell_for(u, v) {
            canvas.put(x, y, POINT_GLYPH);
        }

        if viewport.hint_row() >= sq.bottom() {
            canvas.put_centered(0, cols, viewport.hint_row(), hint);
        }
        canvas
    }
}

impl DisplaySink for TerminalSink {
    fn set_label(&mut self, label: &str) {
        if self.label != label {
            label.clone_into(&mut self.label);
            self.dirty = true;
        }
    }

    fn set_transition(&mut self, transition: Transition) {
        self.motion.set_transition(transition);
    }

    fn move_point(&mut self, position: Point) {
        self.motion.set_position(position);
        self.dirty = true;
    }

    fn rendered_position(&self) -> Point {
        self.motion.rendered()
    }

    fn flush_styles(&mut self) {
        self.flushes += 1;
        self.dirty = true;
    }

    fn elapse(&mut self, dt: Duration) {
        if self.motion.is_moving() {
            self.motion.elapse(dt);
            self.dirty = true;
        }
    }
}
