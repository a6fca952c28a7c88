use serde::{Deserialize, Serialize};

/// Absolute screen position of an active touch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchPosition {
    pub x: f64,
    pub y: f64,
}

/// Phase tag on an incoming pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// One raw pointer event as delivered by the touchscreen layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub phase: PointerPhase,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, phase: PointerPhase) -> Self {
        Self { x, y, phase }
    }

    pub fn position(&self) -> TouchPosition {
        TouchPosition {
            x: self.x,
            y: self.y,
        }
    }
}
