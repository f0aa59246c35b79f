#![forbid(unsafe_code)]

//! Core: breathing phases, square geometry, point motion, timers, and the
//! phase controller that ties them together.
//!
//! Nothing in this crate touches a terminal or a clock. Hosts advance time
//! explicitly through [`controller::BreathingController::advance`] and
//! render through a [`display::DisplaySink`].

pub mod animation;
pub mod controller;
pub mod display;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod phase;
pub mod scheduler;

pub use controller::{BreathingController, ControllerState, ControllerStatus};
pub use display::{DisplaySink, RecordingSink, SinkOp, Transition};
pub use geometry::{Point, SquareGeometry};
pub use phase::{
    IDLE_GLYPH, PAUSE_CONFIRM_DELAY, PAUSE_GLYPH, PHASE_COUNT, PHASES, Phase, PhaseAction,
};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
