//! Integration tests for the breathing controller.
//!
//! All time is virtual: the controller is stepped with `advance`, never by
//! sleeping.

use std::time::Duration;

use boxbreath_core::controller::ControllerTimer;
use boxbreath_core::{
    BreathingController, ControllerState, ControllerStatus, DisplaySink, IDLE_GLYPH, PAUSE_GLYPH,
    PHASE_COUNT, PHASES, PhaseAction, RecordingSink, SinkOp, SquareGeometry, Transition,
};
use proptest::prelude::*;

const MS_1: Duration = Duration::from_millis(1);
const SEC_1: Duration = Duration::from_secs(1);
const SEC_4: Duration = Duration::from_secs(4);

fn controller() -> BreathingController<RecordingSink> {
    BreathingController::new(RecordingSink::new())
}

/// Start and run until phase `index` is the one animating.
fn running_at(index: usize) -> BreathingController<RecordingSink> {
    let mut c = controller();
    c.start();
    c.advance(SEC_4 * index as u32);
    assert_eq!(c.status(), ControllerStatus::Animating(index));
    c
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Toggle,
    Pause,
    Resume,
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        Just(Op::Toggle),
        Just(Op::Pause),
        Just(Op::Resume),
        (0u64..6_000).prop_map(Op::Advance),
    ]
}

fn apply(c: &mut BreathingController<RecordingSink>, op: Op) {
    match op {
        Op::Start => c.start(),
        Op::Toggle => c.toggle(),
        Op::Pause => c.request_pause(),
        Op::Resume => c.resume(),
        Op::Advance(ms) => c.advance(Duration::from_millis(ms)),
    }
}

fn check_invariants(c: &BreathingController<RecordingSink>) {
    let state = c.state();
    assert!(state.phase_index < PHASE_COUNT);
    assert!(c.is_timer_pending(ControllerTimer::PhaseComplete) == state.running);
    // The idle-glyph timer only exists while a landed pause awaits it.
    if c.is_timer_pending(ControllerTimer::ShowIdle) {
        assert!(!state.running);
        assert!(state.pause_requested);
    }
    assert!(c.pending_timer_count() <= 2);
    match c.status() {
        ControllerStatus::Animating(i) => assert!(state.running && i == state.phase_index),
        ControllerStatus::PausedPending(_) => assert_eq!(c.sink().label(), PAUSE_GLYPH),
        ControllerStatus::PausedIdle(_) | ControllerStatus::Idle => {
            assert_eq!(c.sink().label(), IDLE_GLYPH);
        }
    }
}

#[test]
fn uninterrupted_run_cycles_in_order() {
    let mut c = controller();
    c.start();
    let mut seen = vec![c.sink().label().to_owned()];
    for _ in 0..8 {
        c.advance(SEC_4);
        seen.push(c.sink().label().to_owned());
    }
    assert_eq!(
        seen,
        [
            "INHALE", "HOLD", "EXHALE", "HOLD", "INHALE", "HOLD", "EXHALE", "HOLD", "INHALE"
        ]
    );
    assert_eq!(c.phase_index(), 0);
}

#[test]
fn each_phase_targets_its_corner() {
    let g = SquareGeometry::STANDARD;
    let mut c = controller();
    c.start();
    for phase in PHASES.iter().cycle().take(8) {
        assert_eq!(c.sink().target(), g.target(phase.action));
        c.advance(SEC_4);
        assert_eq!(c.sink().rendered_position(), g.target(phase.action));
    }
}

#[test]
fn point_moves_linearly_within_phase() {
    let g = SquareGeometry::STANDARD;
    let mut c = controller();
    c.start();
    c.advance(SEC_1 * 2);
    let start = g.target(PhaseAction::HoldBottom);
    let end = g.target(PhaseAction::Inhale);
    assert_eq!(c.sink().rendered_position(), start.lerp(end, 0.5));
}

#[test]
fn pause_lands_at_every_phase_boundary() {
    for i in 0..PHASE_COUNT {
        let mut c = running_at(i);
        c.advance(Duration::from_millis(1_500));
        c.request_pause();
        assert_eq!(c.sink().label(), PAUSE_GLYPH, "phase {i}");

        c.advance(Duration::from_millis(2_499));
        assert!(c.is_running(), "phase {i} stopped early");
        c.advance(MS_1);
        assert!(!c.is_running());
        assert_eq!(c.phase_index(), (i + 1) % PHASE_COUNT);
        assert_eq!(
            c.sink().rendered_position(),
            SquareGeometry::STANDARD.target(PHASES[i].action)
        );

        c.advance(SEC_1 - MS_1);
        assert_eq!(c.sink().label(), PAUSE_GLYPH);
        c.advance(MS_1);
        assert_eq!(c.sink().label(), IDLE_GLYPH);
        assert!(!c.is_pause_requested());
    }
}

#[test]
fn point_stays_put_while_paused() {
    let mut c = running_at(2);
    c.request_pause();
    c.advance(SEC_4);
    let pinned = c.sink().rendered_position();
    c.advance(Duration::from_secs(60));
    assert_eq!(c.sink().rendered_position(), pinned);
    assert!(!c.sink().is_moving());
}

#[test]
fn resume_uses_full_default_duration() {
    let mut c = running_at(1);
    c.advance(Duration::from_millis(3_900));
    c.request_pause();
    c.advance(Duration::from_secs(3));
    c.resume();
    assert_eq!(c.status(), ControllerStatus::Animating(2));
    assert_eq!(c.time_until_next(), Some(SEC_4));
    c.advance(SEC_4 - MS_1);
    assert_eq!(c.phase_index(), 2);
    c.advance(MS_1);
    assert_eq!(c.phase_index(), 3);
}

#[test]
fn repeated_pause_requests_do_not_stack() {
    let mut c = running_at(0);
    c.request_pause();
    c.request_pause();
    c.advance(SEC_4);
    assert_eq!(c.pending_timer_count(), 1);
    c.advance(SEC_1);
    assert_eq!(c.pending_timer_count(), 0);
}

#[test]
fn stale_idle_glyph_cannot_flip_a_new_pause() {
    let mut c = running_at(0);
    c.request_pause();
    c.advance(SEC_4);
    // Resume inside the confirmation window, then pause again.
    c.advance(Duration::from_millis(500));
    c.resume();
    c.request_pause();
    // The first pause's idle glyph would have fired here.
    c.advance(Duration::from_millis(600));
    assert_eq!(c.sink().label(), PAUSE_GLYPH);
    assert!(c.is_running());
}

#[test]
fn start_resets_only_from_phase_zero() {
    let mut c = running_at(3);
    c.request_pause();
    c.advance(Duration::from_secs(10));
    assert_eq!(c.status(), ControllerStatus::PausedIdle(0));
    c.sink_mut().take_ops();
    c.start();
    let ops = c.sink_mut().take_ops();
    assert_eq!(ops.first(), Some(&SinkOp::Label(IDLE_GLYPH.into())));
    assert!(ops.contains(&SinkOp::Transition(Transition::Disabled)));
    assert_eq!(c.status(), ControllerStatus::Animating(0));
    assert_eq!(c.sink().label(), "INHALE");

    let mut c = running_at(1);
    c.request_pause();
    c.advance(Duration::from_secs(10));
    assert_eq!(c.status(), ControllerStatus::PausedIdle(2));
    c.sink_mut().take_ops();
    c.start();
    let ops = c.sink_mut().take_ops();
    assert_eq!(ops.first(), Some(&SinkOp::Flush));
    assert!(!ops.contains(&SinkOp::Transition(Transition::Disabled)));
    assert_eq!(c.sink().label(), "EXHALE");
}

proptest! {
    #[test]
    fn reset_always_returns_to_start(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut c = controller();
        for op in ops {
            apply(&mut c, op);
        }
        c.reset();
        prop_assert_eq!(c.state(), ControllerState::default());
        prop_assert_eq!(c.status(), ControllerStatus::Idle);
        prop_assert_eq!(c.sink().label(), IDLE_GLYPH);
        prop_assert_eq!(
            c.sink().rendered_position(),
            SquareGeometry::STANDARD.target(PhaseAction::HoldBottom)
        );
        prop_assert_eq!(c.pending_timer_count(), 0);
    }

    #[test]
    fn invariants_hold_under_any_sequence(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut c = controller();
        check_invariants(&c);
        for op in ops {
            apply(&mut c, op);
            check_invariants(&c);
        }
    }

    #[test]
    fn toggle_matches_pause_or_resume(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let mut a = controller();
        for op in &ops {
            apply(&mut a, *op);
        }
        let mut b = controller();
        for op in &ops {
            apply(&mut b, *op);
        }
        let was_running = a.is_running();
        a.toggle();
        if was_running {
            b.request_pause();
        } else {
            b.resume();
        }
        prop_assert_eq!(a.state(), b.state());
        prop_assert_eq!(a.status(), b.status());
        prop_assert_eq!(a.sink().ops(), b.sink().ops());
        prop_assert_eq!(a.next_deadline(), b.next_deadline());
    }

    #[test]
    fn full_cycles_are_periodic(cycles in 1u32..6, offset in 0u64..16_000) {
        let mut c = controller();
        c.start();
        c.advance(Duration::from_millis(offset));
        let index = c.phase_index();
        let label = c.sink().label().to_owned();
        c.advance(SEC_4 * PHASE_COUNT as u32 * cycles);
        prop_assert_eq!(c.phase_index(), index);
        prop_assert_eq!(c.sink().label(), label.as_str());
    }

    #[test]
    fn repeated_start_is_idempotent(repeats in 1usize..5, ms in 0u64..10_000) {
        let mut once = controller();
        once.start();
        let mut many = controller();
        for _ in 0..repeats {
            many.start();
        }
        once.advance(Duration::from_millis(ms));
        many.advance(Duration::from_millis(ms));
        prop_assert_eq!(once.state(), many.state());
        prop_assert_eq!(once.sink().ops(), many.sink().ops());
        prop_assert_eq!(many.pending_timer_count(), 1);
    }
}
