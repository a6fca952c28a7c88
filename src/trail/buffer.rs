//! Trail point buffer
//!
//! Ordered, capacity-bounded and age-bounded store of recent touch
//! positions. Points are immutable once inserted; fading is a pure function
//! of the point's age, computed at read time, so there is no per-point
//! animation state to leak or cancel.

use crate::trail::path::TrailPath;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A single recorded touch position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPoint {
    pub x: f64,
    pub y: f64,
    pub created_at: Instant,
}

impl TrailPoint {
    /// Opacity of this point at `now`, fading linearly from 1 to 0 over
    /// `fade`.
    pub fn opacity(&self, now: Instant, fade: Duration) -> f64 {
        let age = now.saturating_duration_since(self.created_at);
        (1.0 - age.as_secs_f64() / fade.as_secs_f64()).clamp(0.0, 1.0)
    }
}

/// Bounded, time-decaying sequence of trail points.
///
/// Length never exceeds the capacity; a periodic [`sweep`](Self::sweep)
/// purges points older than the fade duration so trails disappear after the
/// gesture ends, independent of further touch activity.
#[derive(Debug)]
pub struct TrailBuffer {
    points: VecDeque<TrailPoint>,
    capacity: usize,
    fade: Duration,
}

impl TrailBuffer {
    pub fn new(capacity: usize, fade: Duration) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
            fade,
        }
    }

    /// Append a point, evicting from the front while over capacity.
    pub fn insert(&mut self, x: f64, y: f64, now: Instant) {
        self.points.push_back(TrailPoint {
            x,
            y,
            created_at: now,
        });
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Remove every point whose age has reached the fade duration.
    pub fn sweep(&mut self, now: Instant) {
        let fade = self.fade;
        self.points
            .retain(|p| now.saturating_duration_since(p.created_at) < fade);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fade duration the buffer was configured with.
    pub fn fade(&self) -> Duration {
        self.fade
    }

    /// Points in insertion order, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &TrailPoint> {
        self.points.iter()
    }

    /// Smoothed curve through the current points. Pure read-side projection.
    pub fn path(&self) -> TrailPath {
        TrailPath::from_points(self.points.iter().map(|p| (p.x, p.y)))
    }
}
