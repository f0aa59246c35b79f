#![forbid(unsafe_code)]

//! A character grid the size of the terminal.
//!
//! Wide glyphs occupy two cells; the second is stored as a continuation and
//! skipped when the row is turned back into text.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    /// `None` marks the trailing half of a wide glyph.
    cells: Vec<Option<char>>,
}

impl Canvas {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Some(' '); usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Character drawn at `(x, y)`, or `None` for a continuation cell or a
    /// position off the grid.
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<char> {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Draw one glyph and return the number of columns it took.
    ///
    /// Zero-width characters and glyphs that would overflow the row are
    /// dropped.
    pub fn put(&mut self, x: u16, y: u16, ch: char) -> u16 {
        let w = ch.width().unwrap_or(0) as u16;
        if w == 0 || x.saturating_add(w) > self.width {
            return 0;
        }
        let Some(i) = self.index(x, y) else {
            return 0;
        };
        self.clear_wide_at(x, y);
        self.cells[i] = Some(ch);
        if w == 2 {
            self.clear_wide_at(x + 1, y);
            self.cells[i + 1] = None;
        }
        w
    }

    /// Draw `text` left to right starting at `(x, y)`, clipped to the row.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str) -> u16 {
        self.put_str_until(x, y, text, self.width)
    }

    /// Draw `text` centred on the half-open column span `[left, right)`,
    /// clipped to that span.
    pub fn put_centered(&mut self, left: u16, right: u16, y: u16, text: &str) -> u16 {
        let span = right.saturating_sub(left);
        let w = text_width(text).min(span);
        self.put_str_until(left + (span - w) / 2, y, text, right.min(self.width))
    }

    fn put_str_until(&mut self, x: u16, y: u16, text: &str, limit: u16) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w > 0 && col.saturating_add(w) > limit {
                break;
            }
            col += self.put(col, y, ch);
        }
        col.saturating_sub(x)
    }

    /// Row `y` as text, full width.
    #[must_use]
    pub fn row(&self, y: u16) -> String {
        let Some(start) = self.index(0, y) else {
            return String::new();
        };
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .flatten()
            .collect()
    }

    /// The whole grid, rows separated by newlines, trailing spaces trimmed.
    #[must_use]
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row(y).trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    // Overwriting half of a wide glyph blanks its other half.
    fn clear_wide_at(&mut self, x: u16, y: u16) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        match self.cells[i] {
            None => {
                if i > 0 {
                    self.cells[i - 1] = Some(' ');
                }
            }
            Some(ch) if ch.width() == Some(2) => {
                if let Some(next) = self.cells.get_mut(i + 1) {
                    *next = Some(' ');
                }
            }
            Some(_) => {}
        }
    }
}

/// Display width of `text` in terminal columns, clamped to `u16`.
#[must_use]
pub fn text_width(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_blank() {
        let c = Canvas::new(3, 2);
        assert_eq!(c.row(0), "   ");
        assert_eq!(c.to_text(), "\n");
    }

    #[test]
    fn put_str_clips_to_row() {
        let mut c = Canvas::new(5, 1);
        assert_eq!(c.put_str(2, 0, "HOLD"), 3);
        assert_eq!(c.row(0), "  HOL");
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut c = Canvas::new(2, 2);
        assert_eq!(c.put(5, 0, 'x'), 0);
        assert_eq!(c.put(0, 9, 'x'), 0);
        assert_eq!(c.get(5, 0), None);
        assert_eq!(c.row(9), "");
    }

    #[test]
    fn centred_text() {
        let mut c = Canvas::new(10, 1);
        c.put_centered(0, 10, 0, "HOLD");
        assert_eq!(c.row(0), "   HOLD   ");
        let mut c = Canvas::new(10, 1);
        c.put_centered(2, 5, 0, "INHALE");
        assert_eq!(c.row(0), "  INH     ");
    }

    #[test]
    fn wide_glyph_takes_two_cells() {
        let mut c = Canvas::new(4, 1);
        assert_eq!(c.put(1, 0, '呼'), 2);
        assert_eq!(c.get(1, 0), Some('呼'));
        assert_eq!(c.get(2, 0), None);
        assert_eq!(c.row(0), " 呼 ");
        // Overwriting the trailing half blanks the leading half.
        c.put(2, 0, 'x');
        assert_eq!(c.row(0), "  x ");
    }

    #[test]
    fn wide_glyph_does_not_overflow() {
        let mut c = Canvas::new(2, 1);
        assert_eq!(c.put(1, 0, '呼'), 0);
        assert_eq!(c.row(0), "  ");
    }

    #[test]
    fn text_width_counts_columns() {
        assert_eq!(text_width("INHALE"), 6);
        assert_eq!(text_width("呼吸"), 4);
    }
}
