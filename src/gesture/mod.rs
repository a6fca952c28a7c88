//! Gesture interpretation
//!
//! Turns raw pointer-phase events into semantic motion and clicks. The pan
//! interpreter derives per-move deltas behind a dead-zone threshold; the tap
//! arbiter classifies tap sequences into left/right clicks with single/double
//! mutual exclusion. Both consume the same stream, one sample at a time, so
//! their decisions stay ordered with respect to each input.

pub mod interpreter;
pub mod tap;
pub mod types;

pub use interpreter::{GestureInterpreter, GesturePhase, IndicatorChange, SampleOutcome};
pub use tap::{TapArbiter, TapEvent};
pub use types::{PointerPhase, PointerSample, TouchPosition};
