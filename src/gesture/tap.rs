//! Tap arbitration
//!
//! Single- and double-tap recognition over the same pointer stream as the
//! pan interpreter, with mutual exclusion: a completed tap is held back until
//! the double-tap window has elapsed, and a second tap completing inside that
//! window upgrades the sequence to a double-tap instead. One arbiter, one
//! ordered decision per sample; there are no racing recognizers.

use crate::gesture::types::{PointerPhase, PointerSample, TouchPosition};
use std::time::{Duration, Instant};

/// A classified tap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapEvent {
    Single,
    Double,
}

#[derive(Debug)]
struct Press {
    start: TouchPosition,
    at: Instant,
    beyond_slop: bool,
}

/// Classifies tap sequences with single/double mutual exclusion.
#[derive(Debug)]
pub struct TapArbiter {
    slop: f64,
    max_duration: Duration,
    double_window: Duration,
    press: Option<Press>,
    /// Completion time of a tap whose single-fire is still suppressed.
    pending_single: Option<Instant>,
}

impl TapArbiter {
    pub fn new(slop: f64, max_duration: Duration, double_window: Duration) -> Self {
        Self {
            slop,
            max_duration,
            double_window,
            press: None,
            pending_single: None,
        }
    }

    /// When the currently suppressed single-tap is due to fire, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending_single.map(|at| at + self.double_window)
    }

    /// Fire the suppressed single-tap once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<TapEvent> {
        match self.pending_single {
            Some(at) if now.saturating_duration_since(at) >= self.double_window => {
                self.pending_single = None;
                Some(TapEvent::Single)
            }
            _ => None,
        }
    }

    /// Feed one pointer sample. Returns a classification the moment one is
    /// certain; suppressed singles surface later through [`poll`](Self::poll).
    pub fn on_sample(&mut self, sample: &PointerSample, now: Instant) -> Option<TapEvent> {
        match sample.phase {
            PointerPhase::Began => {
                self.press = Some(Press {
                    start: sample.position(),
                    at: now,
                    beyond_slop: false,
                });
                None
            }
            PointerPhase::Moved => {
                if let Some(press) = self.press.as_mut() {
                    let dx = sample.x - press.start.x;
                    let dy = sample.y - press.start.y;
                    if (dx * dx + dy * dy).sqrt() > self.slop {
                        press.beyond_slop = true;
                    }
                }
                None
            }
            PointerPhase::Ended => {
                let press = self.press.take()?;
                let quick = now.saturating_duration_since(press.at) <= self.max_duration;
                if press.beyond_slop || !quick {
                    return None;
                }
                match self.pending_single.take() {
                    Some(first)
                        if now.saturating_duration_since(first) <= self.double_window =>
                    {
                        Some(TapEvent::Double)
                    }
                    _ => {
                        self.pending_single = Some(now);
                        None
                    }
                }
            }
            PointerPhase::Cancelled => {
                self.press = None;
                None
            }
        }
    }
}
