#![forbid(unsafe_code)]

//! Time-based motion for the breathing point.
//!
//! [`Glide`] moves a [`Point`] between two positions over a fixed duration.
//! [`PointMotion`] layers CSS-like transition semantics on top: assigning a
//! new position either glides there (transition enabled) or jumps (disabled),
//! and the *rendered* position can be read back at any moment, including
//! mid-glide.
//!
//! Time is never sampled here; callers advance it with `tick`/`elapse`.

use std::time::Duration;

use crate::geometry::Point;

/// Constant-velocity progress, clamped to [0, 1].
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);

    /// Time elapsed past completion.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

/// Interpolates a [`Point`] from `from` to `to` over a duration.
#[derive(Debug, Clone, Copy)]
pub struct Glide {
    from: Point,
    to: Point,
    elapsed: Duration,
    duration: Duration,
}

impl Glide {
    /// Create a linear glide. A zero duration completes on the first tick.
    pub fn new(from: Point, to: Point, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
        }
    }

    fn progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Current interpolated position.
    pub fn position(&self) -> Point {
        self.from.lerp(self.to, linear(self.progress()))
    }

    pub fn target(&self) -> Point {
        self.to
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Glide {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        linear(self.progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

/// How position assignments are animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    /// Position changes apply instantly.
    #[default]
    Disabled,
    /// Position changes glide linearly over the given duration.
    Linear(Duration),
}

/// A point whose position changes may be animated.
///
/// # Invariants
///
/// 1. `rendered()` equals the last assigned position once any glide towards
///    it has completed.
/// 2. Changing the transition never moves the point; it only affects later
///    assignments (an in-flight glide keeps its own duration).
/// 3. Assigning a position while gliding starts the new glide from the
///    current rendered position.
#[derive(Debug, Clone)]
pub struct PointMotion {
    resting: Point,
    transition: Transition,
    glide: Option<Glide>,
}

impl PointMotion {
    pub fn new(position: Point) -> Self {
        Self {
            resting: position,
            transition: Transition::Disabled,
            glide: None,
        }
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }

    pub fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
    }

    /// Assign a new position, animated according to the current transition.
    pub fn set_position(&mut self, to: Point) {
        match self.transition {
            Transition::Linear(duration) if !duration.is_zero() => {
                let from = self.rendered();
                self.glide = Some(Glide::new(from, to, duration));
            }
            _ => self.glide = None,
        }
        self.resting = to;
    }

    /// The position the point is heading to (or sitting at).
    pub fn target(&self) -> Point {
        self.resting
    }

    /// Where the point is drawn right now.
    pub fn rendered(&self) -> Point {
        match &self.glide {
            Some(glide) => glide.position(),
            None => self.resting,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.glide.is_some()
    }

    /// Advance any in-flight glide by `dt`.
    pub fn elapse(&mut self, dt: Duration) {
        if let Some(glide) = self.glide.as_mut() {
            glide.tick(dt);
            if glide.is_complete() {
                self.glide = None;
            }
        }
    }
}
