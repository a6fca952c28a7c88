//! Pan interpreter
//!
//! State machine over the raw pointer stream. Every sample produces a trail
//! point; motion is only forwarded once it escapes the dead zone, and
//! sub-threshold drift accumulates against the last forwarded position so a
//! run of sub-pixel deltas is not lost.

use crate::gesture::types::{PointerPhase, PointerSample, TouchPosition};

/// Pan gesture phase.
///
/// `Ended` is transient: it is entered when the touch lifts and collapses
/// back to `Idle` within the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Began,
    Active,
    Ended,
}

/// Touch-indicator side effect requested by a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorChange {
    Show,
    Hide,
}

/// What a single pointer sample asked the pipeline to do.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleOutcome {
    pub indicator: Option<IndicatorChange>,
    /// Position to append to the trail.
    pub trail_point: Option<(f64, f64)>,
    /// Raw delta that escaped the dead zone, ready for throttling.
    pub motion: Option<(f64, f64)>,
}

/// Interprets raw pointer events into pan semantics.
#[derive(Debug)]
pub struct GestureInterpreter {
    phase: GesturePhase,
    last_position: TouchPosition,
    current_touch: Option<TouchPosition>,
    dead_zone: f64,
}

impl GestureInterpreter {
    pub fn new(dead_zone: f64) -> Self {
        Self {
            phase: GesturePhase::Idle,
            last_position: TouchPosition { x: 0.0, y: 0.0 },
            current_touch: None,
            dead_zone,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// Position of the active touch, if any. Cleared when the gesture ends.
    pub fn current_touch(&self) -> Option<TouchPosition> {
        self.current_touch
    }

    /// Feed one pointer sample through the state machine.
    pub fn on_sample(&mut self, sample: &PointerSample) -> SampleOutcome {
        let mut outcome = SampleOutcome::default();
        let position = sample.position();

        match sample.phase {
            PointerPhase::Began => {
                self.phase = GesturePhase::Began;
                self.last_position = position;
                self.current_touch = Some(position);
                outcome.indicator = Some(IndicatorChange::Show);
                outcome.trail_point = Some((position.x, position.y));
            }
            PointerPhase::Moved => {
                self.phase = GesturePhase::Active;
                self.current_touch = Some(position);
                // Trail point on every move, even sub-threshold ones, so the
                // visual trail stays smooth.
                outcome.trail_point = Some((position.x, position.y));

                let dx = position.x - self.last_position.x;
                let dy = position.y - self.last_position.y;
                if dx.abs() > self.dead_zone || dy.abs() > self.dead_zone {
                    outcome.motion = Some((dx, dy));
                    self.last_position = position;
                }
            }
            PointerPhase::Ended | PointerPhase::Cancelled => {
                self.phase = GesturePhase::Ended;
                self.current_touch = None;
                outcome.indicator = Some(IndicatorChange::Hide);
            }
        }

        // Ended never persists across samples.
        if self.phase == GesturePhase::Ended {
            self.phase = GesturePhase::Idle;
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, y: f64, phase: PointerPhase) -> PointerSample {
        PointerSample::new(x, y, phase)
    }

    #[test]
    fn test_began_shows_indicator_and_seeds_trail() {
        let mut pan = GestureInterpreter::new(1.0);
        let outcome = pan.on_sample(&sample(10.0, 10.0, PointerPhase::Began));

        assert_eq!(outcome.indicator, Some(IndicatorChange::Show));
        assert_eq!(outcome.trail_point, Some((10.0, 10.0)));
        assert_eq!(outcome.motion, None);
        assert_eq!(pan.phase(), GesturePhase::Began);
        assert_eq!(
            pan.current_touch(),
            Some(TouchPosition { x: 10.0, y: 10.0 })
        );
    }

    #[test]
    fn test_sub_threshold_motion_accumulates() {
        let mut pan = GestureInterpreter::new(1.0);
        pan.on_sample(&sample(10.0, 10.0, PointerPhase::Began));

        // Below the dead zone on both axes: trail point, no motion, and the
        // reference position stays put.
        let outcome = pan.on_sample(&sample(10.5, 10.3, PointerPhase::Moved));
        assert_eq!(outcome.trail_point, Some((10.5, 10.3)));
        assert_eq!(outcome.motion, None);

        // Delta is measured against the original (10, 10), not the previous
        // sample, so the accumulated drift crosses the threshold.
        let outcome = pan.on_sample(&sample(13.0, 14.0, PointerPhase::Moved));
        assert_eq!(outcome.motion, Some((3.0, 4.0)));
    }

    #[test]
    fn test_single_axis_threshold_is_enough() {
        let mut pan = GestureInterpreter::new(1.0);
        pan.on_sample(&sample(0.0, 0.0, PointerPhase::Began));
        let outcome = pan.on_sample(&sample(5.0, 0.2, PointerPhase::Moved));
        assert_eq!(outcome.motion, Some((5.0, 0.2)));
    }

    #[test]
    fn test_exact_threshold_does_not_forward() {
        let mut pan = GestureInterpreter::new(1.0);
        pan.on_sample(&sample(0.0, 0.0, PointerPhase::Began));
        // Strictly-greater comparison: a 1px delta stays in the dead zone.
        let outcome = pan.on_sample(&sample(1.0, 1.0, PointerPhase::Moved));
        assert_eq!(outcome.motion, None);
    }

    #[test]
    fn test_ended_hides_indicator_and_collapses_to_idle() {
        let mut pan = GestureInterpreter::new(1.0);
        pan.on_sample(&sample(10.0, 10.0, PointerPhase::Began));
        pan.on_sample(&sample(20.0, 20.0, PointerPhase::Moved));

        let outcome = pan.on_sample(&sample(20.0, 20.0, PointerPhase::Ended));
        assert_eq!(outcome.indicator, Some(IndicatorChange::Hide));
        assert_eq!(outcome.trail_point, None);
        assert_eq!(pan.phase(), GesturePhase::Idle);
        assert_eq!(pan.current_touch(), None);
    }

    #[test]
    fn test_cancelled_behaves_like_ended() {
        let mut pan = GestureInterpreter::new(1.0);
        pan.on_sample(&sample(10.0, 10.0, PointerPhase::Began));
        let outcome = pan.on_sample(&sample(12.0, 12.0, PointerPhase::Cancelled));
        assert_eq!(outcome.indicator, Some(IndicatorChange::Hide));
        assert_eq!(pan.phase(), GesturePhase::Idle);
        assert_eq!(pan.current_touch(), None);
    }

    #[test]
    fn test_reinitialized_between_gestures() {
        let mut pan = GestureInterpreter::new(1.0);
        pan.on_sample(&sample(100.0, 100.0, PointerPhase::Began));
        pan.on_sample(&sample(100.0, 100.0, PointerPhase::Ended));

        // A fresh gesture measures against its own start, not the old one.
        pan.on_sample(&sample(0.0, 0.0, PointerPhase::Began));
        let outcome = pan.on_sample(&sample(3.0, 0.0, PointerPhase::Moved));
        assert_eq!(outcome.motion, Some((3.0, 0.0)));
    }
}
