#![forbid(unsafe_code)]

//! Maps the square's normalized space onto terminal cells.
//!
//! Terminal cells are roughly twice as tall as they are wide, so the square
//! spans two columns for every row. Layout, top to bottom: one margin row,
//! the square (vertically centred in the free space), a gap, and the hint
//! line on the last row.

use boxbreath_core::geometry::Rect;

/// Smallest square side, in rows, worth drawing.
pub const MIN_SIDE_ROWS: u16 = 2;

/// Largest square side, in rows.
pub const MAX_SIDE_ROWS: u16 = 12;

/// Rows reserved outside the square: margin, gap, hint.
const RESERVED_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    cols: u16,
    rows: u16,
    /// Border cells of the square, inclusive of both edges.
    square: Option<Rect>,
}

impl Viewport {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            square: layout_square(cols, rows),
        }
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// The square's border rectangle, or `None` when the terminal is too
    /// small to draw it.
    #[must_use]
    pub const fn square(&self) -> Option<Rect> {
        self.square
    }

    /// Cell for normalized coordinates, where `(0, 0)` is the top-left border
    /// corner and `(1, 1)` the bottom-right one. Values are clamped.
    #[must_use]
    pub fn cell_for(&self, u: f32, v: f32) -> Option<(u16, u16)> {
        let sq = self.square?;
        let span_x = f32::from(sq.width - 1);
        let span_y = f32::from(sq.height - 1);
        let dx = (u.clamp(0.0, 1.0) * span_x).round() as u16;
        let dy = (v.clamp(0.0, 1.0) * span_y).round() as u16;
        Some((sq.x + dx, sq.y + dy))
    }

    /// Whether a click at `(x, y)` lands on the square.
    #[must_use]
    pub fn hit(&self, x: u16, y: u16) -> bool {
        self.square.is_some_and(|sq| sq.contains(x, y))
    }

    /// Row on which the label is centred.
    #[must_use]
    pub fn label_row(&self) -> Option<u16> {
        self.square.map(|sq| sq.y + sq.height / 2)
    }

    /// Last row, used for the key hint.
    #[must_use]
    pub const fn hint_row(&self) -> u16 {
        self.rows.saturating_sub(1)
    }
}

fn layout_square(cols: u16, rows: u16) -> Option<Rect> {
    let avail_rows = rows.saturating_sub(RESERVED_ROWS);
    let mut side_rows = avail_rows.saturating_sub(1).min(MAX_SIDE_ROWS);
    let mut side_cols = side_rows * 2;

    // One column of margin each side plus the closing border column.
    let max_side_cols = cols.saturating_sub(3);
    if side_cols > max_side_cols {
        side_cols = max_side_cols & !1;
        side_rows = side_cols / 2;
    }
    if side_rows < MIN_SIDE_ROWS {
        return None;
    }

    let width = side_cols + 1;
    let height = side_rows + 1;
    let x = (cols - width) / 2;
    let y = 1 + (avail_rows - height) / 2;
    Some(Rect::new(x, y, width, height))
}
