#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Two coordinate spaces meet here:
//!
//! - **Square space** (`f32`, [`Point`]): the pixel space of the point
//!   container, in which the square's border and the point's travel are
//!   defined by [`SquareGeometry`].
//! - **Cell space** (`u16`, [`Rect`]): terminal coordinates used by hosts for
//!   layout and hit testing.

use crate::phase::PhaseAction;

/// A position in square space.
///
/// Like a CSS `left`/`top` pair, it names the top-left of the point's
/// bounding box, not its centre.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `to`; `t` is clamped to [0, 1].
    #[must_use]
    pub fn lerp(self, to: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Fixed dimensions of the square the point travels around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareGeometry {
    /// Outer size of the drawn square.
    pub square_size: f32,
    /// Thickness of the square's border line.
    pub border: f32,
    /// Diameter of the moving point.
    pub point_size: f32,
}

impl Default for SquareGeometry {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl SquareGeometry {
    /// 300px square, 2px border, 20px point.
    pub const STANDARD: Self = Self {
        square_size: 300.0,
        border: 2.0,
        point_size: 20.0,
    };

    #[inline]
    #[must_use]
    pub fn point_radius(&self) -> f32 {
        self.point_size / 2.0
    }

    /// Side length of the point container, which extends past the square by
    /// one border thickness on each side.
    #[inline]
    #[must_use]
    pub fn expanded_container_size(&self) -> f32 {
        self.square_size + self.border * 2.0
    }

    /// Offset of the point container relative to the square (negative:
    /// the container starts outside the square).
    #[inline]
    #[must_use]
    pub fn container_offset(&self) -> f32 {
        -self.border
    }

    /// Where the point's bounding box sits when `action` completes.
    ///
    /// Each corner is inset by `border - radius` so the point's centre lands
    /// on the border line.
    #[must_use]
    pub fn target(&self, action: PhaseAction) -> Point {
        let near = self.border - self.point_radius();
        let far = self.square_size + self.border - self.point_radius();
        match action {
            PhaseAction::Inhale => Point::new(near, near),
            PhaseAction::HoldTop => Point::new(far, near),
            PhaseAction::Exhale => Point::new(far, far),
            PhaseAction::HoldBottom => Point::new(near, far),
        }
    }

    /// Centre of the point whose bounding box starts at `position`.
    #[inline]
    #[must_use]
    pub fn point_center(&self, position: Point) -> Point {
        let r = self.point_radius();
        Point::new(position.x + r, position.y + r)
    }

    /// Normalized coordinates (0.0 at the top/left border line, 1.0 at the
    /// bottom/right one) of the point whose bounding box starts at `position`.
    #[must_use]
    pub fn normalized(&self, position: Point) -> (f32, f32) {
        let c = self.point_center(position);
        let span = if self.square_size > 0.0 {
            self.square_size
        } else {
            1.0
        };
        ((c.x - self.border) / span, (c.y - self.border) / span)
    }
}

/// A rectangle for layout bounds and hit testing.
///
/// Uses terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if a cell is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
