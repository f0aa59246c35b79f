#![forbid(unsafe_code)]

//! The display collaborator driven by the controller.
//!
//! A sink owns a text label and a movable point. The controller never
//! renders; it only tells the sink what to show and, when a pause lands
//! mid-motion, asks where the point is actually drawn.

use std::time::Duration;

use crate::animation::PointMotion;
use crate::geometry::Point;

pub use crate::animation::Transition;

/// Where the controller sends label and point updates.
pub trait DisplaySink {
    /// Replace the label text.
    fn set_label(&mut self, label: &str);

    /// Set how subsequent [`move_point`](Self::move_point) calls animate.
    fn set_transition(&mut self, transition: Transition);

    /// Send the point to `position`, animated per the current transition.
    fn move_point(&mut self, position: Point);

    /// Where the point is drawn right now, possibly mid-transition.
    fn rendered_position(&self) -> Point;

    /// Apply pending style changes synchronously, so a disabled transition
    /// takes effect before it is re-enabled.
    fn flush_styles(&mut self);

    /// Advance the sink's own notion of time. The controller calls this as
    /// its clock moves so in-flight transitions stay in step with timers.
    fn elapse(&mut self, _dt: Duration) {}
}

/// One call received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkOp {
    Label(String),
    Transition(Transition),
    Move(Point),
    Flush,
}

/// A headless sink that simulates transitions and records every call.
#[derive(Debug, Clone)]
pub struct RecordingSink {
    label: String,
    motion: PointMotion,
    ops: Vec<SinkOp>,
    flushes: usize,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            label: String::new(),
            motion: PointMotion::new(Point::default()),
            ops: Vec::new(),
            flushes: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Current transition setting.
    pub fn transition(&self) -> Transition {
        self.motion.transition()
    }

    /// Position most recently assigned via `move_point`.
    pub fn target(&self) -> Point {
        self.motion.target()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    /// Drain the recorded calls.
    pub fn take_ops(&mut self) -> Vec<SinkOp> {
        std::mem::take(&mut self.ops)
    }

    /// Labels in the order they were set.
    pub fn labels(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::Label(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingSink {
    fn set_label(&mut self, label: &str) {
        label.clone_into(&mut self.label);
        self.ops.push(SinkOp::Label(label.to_owned()));
    }

    fn set_transition(&mut self, transition: Transition) {
        self.motion.set_transition(transition);
        self.ops.push(SinkOp::Transition(transition));
    }

    fn move_point(&mut self, position: Point) {
        self.motion.set_position(position);
        self.ops.push(SinkOp::Move(position));
    }

    fn rendered_position(&self) -> Point {
        self.motion.rendered()
    }

    fn flush_styles(&mut self) {
        self.flushes += 1;
        self.ops.push(SinkOp::Flush);
    }

    fn elapse(&mut self, dt: Duration) {
        self.motion.elapse(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut sink = RecordingSink::new();
        sink.set_label("INHALE");
        sink.set_transition(Transition::Disabled);
        sink.move_point(Point::new(1.0, 2.0));
        sink.flush_styles();
        assert_eq!(
            sink.ops(),
            &[
                SinkOp::Label("INHALE".into()),
                SinkOp::Transition(Transition::Disabled),
                SinkOp::Move(Point::new(1.0, 2.0)),
                SinkOp::Flush,
            ]
        );
        assert_eq!(sink.label(), "INHALE");
        assert_eq!(sink.flush_count(), 1);
    }

    #[test]
    fn simulates_transition() {
        let mut sink = RecordingSink::new();
        sink.set_transition(Transition::Linear(Duration::from_secs(2)));
        sink.move_point(Point::new(0.0, 20.0));
        sink.elapse(Duration::from_secs(1));
        assert_eq!(sink.rendered_position(), Point::new(0.0, 10.0));
        assert_eq!(sink.target(), Point::new(0.0, 20.0));
    }

    #[test]
    fn take_ops_drains() {
        let mut sink = RecordingSink::new();
        sink.set_label("x");
        assert_eq!(sink.take_ops().len(), 1);
        assert!(sink.ops().is_empty());
        assert_eq!(sink.label(), "x");
    }
}
