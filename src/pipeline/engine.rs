//! Synchronous pipeline core
//!
//! All gesture, trail, and throttling state behind one owner. Time enters as
//! an explicit `Instant` so every decision is reproducible in tests.

use crate::config::Config;
use crate::gesture::{GestureInterpreter, PointerSample, TapArbiter, TapEvent, TouchPosition};
use crate::protocol::{MouseButton, OutboundMessage};
use crate::throttle::MotionThrottler;
use crate::trail::TrailBuffer;
use std::time::Instant;

pub struct TrackpadPipeline {
    pan: GestureInterpreter,
    taps: TapArbiter,
    trail: TrailBuffer,
    throttle: MotionThrottler,
    scroll_sensitivity: f64,
}

impl TrackpadPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            pan: GestureInterpreter::new(config.dead_zone_px),
            taps: TapArbiter::new(
                config.tap_slop_px,
                config.tap_max_duration(),
                config.double_tap_window(),
            ),
            trail: TrailBuffer::new(config.max_trail_points, config.trail_fade()),
            throttle: MotionThrottler::new(config.throttle(), config.movement_sensitivity),
            scroll_sensitivity: config.scroll_sensitivity,
        }
    }

    /// Feed one pointer sample through pan and tap interpretation.
    ///
    /// Trail insertion and throttled-motion evaluation happen here, in the
    /// same step, so a snapshot taken between steps always reflects one
    /// consistent input sample. Returns the messages to put on the wire, in
    /// order.
    pub fn handle_sample(&mut self, sample: &PointerSample, now: Instant) -> Vec<OutboundMessage> {
        let mut messages = Vec::new();

        // An overdue suppressed single-tap fires before this sample is
        // interpreted, keeping click order consistent with wall clock.
        if let Some(tap) = self.taps.poll(now) {
            messages.push(Self::click_for(tap));
        }

        let outcome = self.pan.on_sample(sample);
        if let Some((x, y)) = outcome.trail_point {
            self.trail.insert(x, y, now);
        }
        if let Some((dx, dy)) = outcome.motion {
            if let Some(message) = self.throttle.maybe_emit(dx, dy, now) {
                messages.push(message);
            }
        }

        if let Some(tap) = self.taps.on_sample(sample, now) {
            messages.push(Self::click_for(tap));
        }

        messages
    }

    /// Purge faded trail points. Runs on a fixed timer, gesture or not.
    pub fn sweep(&mut self, now: Instant) {
        self.trail.sweep(now);
    }

    /// Fire the suppressed single-tap once its window has elapsed.
    pub fn poll_taps(&mut self, now: Instant) -> Option<OutboundMessage> {
        self.taps.poll(now).map(Self::click_for)
    }

    /// When the tap arbiter next needs a timer, if at all.
    pub fn tap_deadline(&self) -> Option<Instant> {
        self.taps.deadline()
    }

    /// Build a scroll message. Not driven by any gesture; exposed so the
    /// embedding app can wire its own scroll source into the same stream.
    pub fn scroll(&self, dx: f64, dy: f64) -> OutboundMessage {
        OutboundMessage::Scroll {
            scroll_x: (dx * self.scroll_sensitivity).round() as i32,
            scroll_y: (dy * self.scroll_sensitivity).round() as i32,
        }
    }

    /// Position of the active touch, for display.
    pub fn current_touch(&self) -> Option<TouchPosition> {
        self.pan.current_touch()
    }

    pub fn trail(&self) -> &TrailBuffer {
        &self.trail
    }

    fn click_for(tap: TapEvent) -> OutboundMessage {
        match tap {
            TapEvent::Single => OutboundMessage::Click {
                button: MouseButton::Left,
            },
            TapEvent::Double => OutboundMessage::Click {
                button: MouseButton::Right,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::PointerPhase;
    use std::time::Duration;

    const MS: Duration = Duration::from_millis(1);

    fn pipeline() -> TrackpadPipeline {
        TrackpadPipeline::new(&Config::default())
    }

    fn sample(x: f64, y: f64, phase: PointerPhase) -> PointerSample {
        PointerSample::new(x, y, phase)
    }

    #[test]
    fn test_dead_zone_then_accumulated_motion() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();

        let msgs = pipeline.handle_sample(&sample(10.0, 10.0, PointerPhase::Began), t0);
        assert!(msgs.is_empty());

        // Sub-threshold move: trail grows, nothing on the wire.
        let msgs = pipeline.handle_sample(&sample(10.5, 10.3, PointerPhase::Moved), t0 + 20 * MS);
        assert!(msgs.is_empty());
        assert_eq!(pipeline.trail().len(), 2);

        // Accumulated drift crosses the threshold: delta measured from the
        // original (10, 10), scaled by sensitivity 2 and rounded.
        let msgs = pipeline.handle_sample(&sample(13.0, 14.0, PointerPhase::Moved), t0 + 40 * MS);
        assert_eq!(msgs, vec![OutboundMessage::Move { dx: 6, dy: 8 }]);
        assert_eq!(pipeline.trail().len(), 3);
    }

    #[test]
    fn test_trail_and_motion_updated_in_one_step() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();
        pipeline.handle_sample(&sample(0.0, 0.0, PointerPhase::Began), t0);

        let before = pipeline.trail().len();
        let msgs = pipeline.handle_sample(&sample(10.0, 0.0, PointerPhase::Moved), t0 + 20 * MS);
        assert_eq!(pipeline.trail().len(), before + 1);
        assert_eq!(msgs.len(), 1, "motion decision lands in the same step");
    }

    #[test]
    fn test_throttle_gates_move_messages() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();
        pipeline.handle_sample(&sample(0.0, 0.0, PointerPhase::Began), t0);

        let first = pipeline.handle_sample(&sample(10.0, 0.0, PointerPhase::Moved), t0 + MS);
        assert_eq!(first.len(), 1);

        // 5ms later: inside the 16ms stream throttle, delta dropped.
        let second = pipeline.handle_sample(&sample(20.0, 0.0, PointerPhase::Moved), t0 + 6 * MS);
        assert!(second.is_empty());
        assert_eq!(pipeline.trail().len(), 3, "trail still grows while throttled");
    }

    #[test]
    fn test_single_tap_clicks_left_after_window() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();

        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Began), t0);
        let msgs = pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Ended), t0 + 50 * MS);
        assert!(msgs.is_empty(), "single tap is suppressed inside the window");
        assert_eq!(pipeline.tap_deadline(), Some(t0 + 350 * MS));

        assert_eq!(pipeline.poll_taps(t0 + 200 * MS), None);
        assert_eq!(
            pipeline.poll_taps(t0 + 350 * MS),
            Some(OutboundMessage::Click {
                button: MouseButton::Left
            })
        );
        assert_eq!(pipeline.poll_taps(t0 + 400 * MS), None, "fires exactly once");
    }

    #[test]
    fn test_double_tap_clicks_right_and_suppresses_left() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();

        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Began), t0);
        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Ended), t0 + 40 * MS);
        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Began), t0 + 150 * MS);
        let msgs = pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Ended), t0 + 190 * MS);

        assert_eq!(
            msgs,
            vec![OutboundMessage::Click {
                button: MouseButton::Right
            }]
        );
        assert_eq!(pipeline.poll_taps(t0 + 1000 * MS), None, "no trailing left click");
    }

    #[test]
    fn test_overdue_single_fires_before_next_gesture() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();

        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Began), t0);
        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Ended), t0 + 40 * MS);

        // The next touch arrives after the window without a timer poll in
        // between; the pending left click must still come out, and first.
        let msgs = pipeline.handle_sample(&sample(50.0, 50.0, PointerPhase::Began), t0 + 500 * MS);
        assert_eq!(
            msgs,
            vec![OutboundMessage::Click {
                button: MouseButton::Left
            }]
        );
    }

    #[test]
    fn test_scroll_scales_and_rounds() {
        let pipeline = pipeline();
        assert_eq!(
            pipeline.scroll(1.2, -2.0),
            OutboundMessage::Scroll {
                scroll_x: 4,
                scroll_y: -6
            }
        );
    }

    #[test]
    fn test_touch_visible_only_during_gesture() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();
        assert_eq!(pipeline.current_touch(), None);

        pipeline.handle_sample(&sample(10.0, 20.0, PointerPhase::Began), t0);
        assert_eq!(
            pipeline.current_touch(),
            Some(TouchPosition { x: 10.0, y: 20.0 })
        );

        pipeline.handle_sample(&sample(10.0, 20.0, PointerPhase::Ended), t0 + 20 * MS);
        assert_eq!(pipeline.current_touch(), None);
    }

    #[test]
    fn test_sweep_clears_trail_after_gesture_ends() {
        let mut pipeline = pipeline();
        let t0 = Instant::now();

        pipeline.handle_sample(&sample(0.0, 0.0, PointerPhase::Began), t0);
        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Moved), t0 + 10 * MS);
        pipeline.handle_sample(&sample(5.0, 5.0, PointerPhase::Ended), t0 + 20 * MS);
        assert_eq!(pipeline.trail().len(), 2);

        // The sweep runs with no active touch and still drains the trail.
        pipeline.sweep(t0 + 3000 * MS);
        assert!(pipeline.trail().is_empty());
    }
}
