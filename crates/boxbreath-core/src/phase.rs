#![forbid(unsafe_code)]

//! The fixed four-phase breathing cycle.
//!
//! The cycle is ordered and wraps after the last phase:
//!
//! | # | Label    | Duration | Point travels          |
//! |---|----------|----------|------------------------|
//! | 0 | `INHALE` | 4 s      | bottom-left → top-left |
//! | 1 | `HOLD`   | 4 s      | top-left → top-right   |
//! | 2 | `EXHALE` | 4 s      | top-right → bottom-right |
//! | 3 | `HOLD`   | 4 s      | bottom-right → bottom-left |

use std::time::Duration;

/// Label shown while stopped and ready to start.
pub const IDLE_GLYPH: &str = "▶";

/// Label shown once a pause has been requested.
pub const PAUSE_GLYPH: &str = "⏸";

/// How long the pause glyph stays up after motion stops before the idle
/// glyph replaces it.
pub const PAUSE_CONFIRM_DELAY: Duration = Duration::from_secs(1);

/// Number of phases in one cycle.
pub const PHASE_COUNT: usize = 4;

const PHASE_DURATION: Duration = Duration::from_secs(4);

/// The corner a phase drives the point towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseAction {
    /// Up the left edge, ending top-left.
    Inhale,
    /// Along the top edge, ending top-right.
    HoldTop,
    /// Down the right edge, ending bottom-right.
    Exhale,
    /// Along the bottom edge, ending bottom-left.
    HoldBottom,
}

impl PhaseAction {
    /// All actions in cycle order.
    pub const ALL: [Self; 4] = [Self::Inhale, Self::HoldTop, Self::Exhale, Self::HoldBottom];
}

/// One named stage of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    /// Text shown while the phase runs.
    pub label: &'static str,
    /// How long the point takes to reach the phase's corner.
    pub duration: Duration,
    /// Which corner the point travels to.
    pub action: PhaseAction,
}

impl Phase {
    const fn new(label: &'static str, action: PhaseAction) -> Self {
        Self {
            label,
            duration: PHASE_DURATION,
            action,
        }
    }

    /// Index of the phase that follows `index`, wrapping after the last.
    #[inline]
    #[must_use]
    pub const fn next_index(index: usize) -> usize {
        (index + 1) % PHASE_COUNT
    }

    /// Index of the phase that precedes `index`, wrapping before the first.
    #[inline]
    #[must_use]
    pub const fn previous_index(index: usize) -> usize {
        (index + PHASE_COUNT - 1) % PHASE_COUNT
    }
}

/// The breathing cycle, in order.
pub static PHASES: [Phase; PHASE_COUNT] = [
    Phase::new("INHALE", PhaseAction::Inhale),
    Phase::new("HOLD", PhaseAction::HoldTop),
    Phase::new("EXHALE", PhaseAction::Exhale),
    Phase::new("HOLD", PhaseAction::HoldBottom),
];
