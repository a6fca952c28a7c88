//! Movement throttle
//!
//! Rate-limits outbound movement regardless of how fast the touchscreen
//! delivers events. Skipped deltas are dropped, not queued: stale motion is
//! worthless in a real-time control stream, and only threshold-crossing
//! deltas reach this point so drops are rare. Sensitivity scaling and integer
//! rounding happen here, at the emission boundary, so fractional deltas are
//! not rounded per-event and summed.

use crate::protocol::OutboundMessage;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct MotionThrottler {
    interval: Duration,
    sensitivity: f64,
    last_sent: Option<Instant>,
}

impl MotionThrottler {
    pub fn new(interval: Duration, sensitivity: f64) -> Self {
        Self {
            interval,
            sensitivity,
            last_sent: None,
        }
    }

    /// Emit a movement message unless one was emitted within the throttle
    /// interval.
    pub fn maybe_emit(&mut self, dx: f64, dy: f64, now: Instant) -> Option<OutboundMessage> {
        if let Some(last) = self.last_sent {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_sent = Some(now);
        Some(OutboundMessage::Move {
            dx: (dx * self.sensitivity).round() as i32,
            dy: (dy * self.sensitivity).round() as i32,
        })
    }
}
