#![forbid(unsafe_code)]

//! The breathing phase controller.
//!
//! [`BreathingController`] cycles through [`PHASES`], sending the point to
//! each phase's corner over that phase's duration, and honours pause
//! requests only at phase boundaries.
//!
//! # State machine
//!
//! ```text
//!            start()/resume()
//!   Idle ─────────────────────► Animating(0)
//!                                   │  phase timer, no pause requested
//!                                   ▼
//!                               Animating(i+1) ─┐
//!                                   ▲           │ phase timer after request_pause()
//!                      resume()     │           ▼
//!   PausedIdle(i+1) ◄── 1 s ── PausedPending(i+1)
//!        └──────────────────────────┘ resume()
//! ```
//!
//! `request_pause()` during `Animating(i)` only raises a flag (and shows the
//! pause glyph); the phase still runs to completion.
//!
//! # Timers
//!
//! Two timer kinds exist and at most one of each is ever pending:
//! [`ControllerTimer::PhaseComplete`] and [`ControllerTimer::ShowIdle`].
//! `reset()` cancels both; `request_pause()` and `resume()` cancel only the
//! idle-glyph timer. Each fire is checked against the handle the controller
//! last stored for that kind, so a superseded timer is ignored even if a
//! host replays it.
//!
//! # Time
//!
//! Time only moves through [`BreathingController::advance`]. Timers due
//! inside the advanced window fire at their own deadlines, and the sink's
//! [`DisplaySink::elapse`] is stepped in the same segments, so the position
//! read back when a pause lands is exact.

use std::time::Duration;

use crate::display::{DisplaySink, Transition};
use crate::geometry::{Point, SquareGeometry};
use crate::phase::{IDLE_GLYPH, PAUSE_CONFIRM_DELAY, PAUSE_GLYPH, PHASES, Phase};
use crate::scheduler::{TimerHandle, TimerQueue};

/// The timers a controller may have pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerTimer {
    /// Fires when the running phase's motion has finished.
    PhaseComplete,
    /// Fires one second after a pause lands, to swap the pause glyph for the
    /// idle glyph.
    ShowIdle,
}

/// Phase index and the two flags that drive the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerState {
    /// Index into [`PHASES`] of the phase running or about to run.
    pub phase_index: usize,
    /// A phase is animating and the chain of phase timers is live.
    pub running: bool,
    /// The user asked to stop at the next phase boundary. Stays set for the
    /// one-second confirmation after the pause lands.
    pub pause_requested: bool,
}

/// Coarse lifecycle view derived from [`ControllerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    /// Reset and never started since.
    Idle,
    /// Running phase `i` (a pause may have been requested).
    Animating(usize),
    /// Stopped; waiting for the idle glyph. Resuming starts phase `i`.
    PausedPending(usize),
    /// Stopped with the idle glyph shown. Resuming starts phase `i`.
    PausedIdle(usize),
}

/// Drives the four-phase breathing cycle on a [`DisplaySink`].
#[derive(Debug)]
pub struct BreathingController<S> {
    sink: S,
    geometry: SquareGeometry,
    state: ControllerState,
    /// A pause has landed since the last reset or resume.
    paused: bool,
    timers: TimerQueue<ControllerTimer>,
    phase_task: Option<TimerHandle>,
    idle_task: Option<TimerHandle>,
}

impl<S: DisplaySink> BreathingController<S> {
    /// Create a controller with the standard geometry and reset it.
    pub fn new(sink: S) -> Self {
        Self::with_geometry(sink, SquareGeometry::STANDARD)
    }

    /// Create a controller with custom geometry and reset it.
    pub fn with_geometry(sink: S, geometry: SquareGeometry) -> Self {
        let mut controller = Self {
            sink,
            geometry,
            state: ControllerState::default(),
            paused: false,
            timers: TimerQueue::new(),
            phase_task: None,
            idle_task: None,
        };
        controller.reset();
        controller
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn status(&self) -> ControllerStatus {
        let i = self.state.phase_index;
        match (self.state.running, self.paused, self.state.pause_requested) {
            (true, _, _) => ControllerStatus::Animating(i),
            (false, true, true) => ControllerStatus::PausedPending(i),
            (false, true, false) => ControllerStatus::PausedIdle(i),
            (false, false, _) => ControllerStatus::Idle,
        }
    }

    pub fn phase_index(&self) -> usize {
        self.state.phase_index
    }

    pub fn current_phase(&self) -> &'static Phase {
        &PHASES[self.state.phase_index]
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_pause_requested(&self) -> bool {
        self.state.pause_requested
    }

    pub fn geometry(&self) -> &SquareGeometry {
        &self.geometry
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the controller, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Virtual time since construction.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Deadline of the earliest pending timer, on the controller's clock.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Time left until the earliest pending timer fires.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.timers.now()))
    }

    pub fn is_timer_pending(&self, timer: ControllerTimer) -> bool {
        self.timers.is_pending(timer)
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.pending_count()
    }

    /// Position the point starts from after a reset: the corner the last
    /// phase ends on.
    pub fn start_position(&self) -> Point {
        let before_first = Phase::previous_index(0);
        self.geometry.target(PHASES[before_first].action)
    }

    // ── Operations ───────────────────────────────────────────────────────

    /// Return to the idle state with the point on its starting corner.
    ///
    /// The jump is never animated: the transition is disabled, the styles
    /// flushed, and only then is the phase transition re-enabled.
    pub fn reset(&mut self) {
        crate::debug!("controller reset");
        self.timers.cancel_all();
        self.phase_task = None;
        self.idle_task = None;

        self.state = ControllerState::default();
        self.paused = false;
        self.sink.set_label(IDLE_GLYPH);

        let start = self.start_position();
        self.sink.set_transition(Transition::Disabled);
        self.sink.move_point(start);
        self.sink.flush_styles();
        self.sink
            .set_transition(Transition::Linear(self.current_phase().duration));
    }

    /// Start the cycle. No-op while running.
    ///
    /// From phase 0 (and not mid-pause) this resets first so the cycle
    /// always begins from the starting corner. From any other phase it
    /// continues where the controller stands, without a reset.
    pub fn start(&mut self) {
        if self.state.running {
            crate::debug!("start ignored: already running");
            return;
        }
        let mid_pause = self.state.pause_requested;
        self.state.running = true;
        self.state.pause_requested = false;

        if self.state.phase_index == 0 && !mid_pause {
            self.reset();
            self.state.running = true;
        } else {
            self.cancel_idle_glyph();
            self.sink.flush_styles();
            self.sink
                .set_transition(Transition::Linear(self.current_phase().duration));
        }
        self.paused = false;
        self.run_phase(None);
    }

    /// Show the current phase and send the point to its corner over
    /// `duration_override` (default: the phase's own duration).
    ///
    /// No-op unless running; a timer that outlived a stop must not restart
    /// the cycle.
    pub fn run_phase(&mut self, duration_override: Option<Duration>) {
        if !self.state.running {
            crate::trace!("run_phase ignored: not running");
            return;
        }
        let phase = self.current_phase();
        let duration = duration_override.unwrap_or(phase.duration);

        self.sink.set_label(phase.label);
        self.sink.set_transition(Transition::Linear(duration));
        self.sink.move_point(self.geometry.target(phase.action));
        self.phase_task = Some(
            self.timers
                .schedule(ControllerTimer::PhaseComplete, duration),
        );
        crate::info!(
            phase = phase.label,
            index = self.state.phase_index,
            duration_ms = whole_millis(duration),
            "phase started"
        );
    }

    /// Ask the cycle to stop once the current phase completes. No-op unless
    /// running.
    pub fn request_pause(&mut self) {
        if !self.state.running {
            crate::debug!("pause ignored: not running");
            return;
        }
        self.state.pause_requested = true;
        self.sink.set_label(PAUSE_GLYPH);
        self.cancel_idle_glyph();
        crate::debug!(
            index = self.state.phase_index,
            "pause requested; stopping after current phase"
        );
    }

    /// Continue the cycle from the stored phase with its full duration.
    /// No-op while running.
    pub fn resume(&mut self) {
        if self.state.running {
            crate::debug!("resume ignored: already running");
            return;
        }
        self.state.running = true;
        self.state.pause_requested = false;
        self.paused = false;
        self.cancel_idle_glyph();
        crate::debug!(index = self.state.phase_index, "resuming");
        self.run_phase(None);
    }

    /// The single user trigger: pause when running, resume otherwise.
    pub fn toggle(&mut self) {
        if self.state.running {
            self.request_pause();
        } else {
            self.resume();
        }
    }

    /// Advance the controller's clock by `dt`, firing every timer that falls
    /// due in that window.
    pub fn advance(&mut self, dt: Duration) {
        let target = self.timers.now().saturating_add(dt);
        while let Some(deadline) = self.timers.next_deadline().filter(|d| *d <= target) {
            self.sink
                .elapse(deadline.saturating_sub(self.timers.now()));
            let Some((handle, timer)) = self.timers.pop_due(deadline) else {
                break;
            };
            match timer {
                ControllerTimer::PhaseComplete => self.complete_phase(handle),
                ControllerTimer::ShowIdle => self.show_idle_glyph(handle),
            }
        }
        self.sink.elapse(target.saturating_sub(self.timers.now()));
        self.timers.advance_to(target);
    }

    // ── Timer handlers ───────────────────────────────────────────────────

    fn complete_phase(&mut self, handle: TimerHandle) {
        if self.phase_task != Some(handle) {
            crate::trace!(timer = handle.id(), "stale phase timer ignored");
            return;
        }
        self.phase_task = None;
        if !self.state.running {
            return;
        }

        if self.state.pause_requested {
            self.state.running = false;
            self.paused = true;
            self.pin_point();
            self.state.phase_index = Phase::next_index(self.state.phase_index);
            self.idle_task = Some(
                self.timers
                    .schedule(ControllerTimer::ShowIdle, PAUSE_CONFIRM_DELAY),
            );
            crate::info!(
                next = self.current_phase().label,
                "phase completed; paused"
            );
        } else {
            self.state.phase_index = Phase::next_index(self.state.phase_index);
            self.run_phase(None);
        }
    }

    fn show_idle_glyph(&mut self, handle: TimerHandle) {
        if self.idle_task != Some(handle) {
            crate::trace!(timer = handle.id(), "stale idle-glyph timer ignored");
            return;
        }
        self.idle_task = None;
        self.sink.set_label(IDLE_GLYPH);
        self.state.pause_requested = false;
        crate::debug!("idle glyph shown");
    }

    /// Freeze the point where it is drawn, without animation.
    fn pin_point(&mut self) {
        let here = self.sink.rendered_position();
        self.sink.set_transition(Transition::Disabled);
        self.sink.move_point(here);
        self.sink.flush_styles();
    }

    fn cancel_idle_glyph(&mut self) {
        if let Some(handle) = self.idle_task.take() {
            self.timers.cancel_handle(handle);
        }
    }
}

/// Milliseconds in `d`, saturating at `u64::MAX`.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
