//! Touch trail
//!
//! A bounded, time-decaying store of recent touch positions plus the
//! read-side projections the rendering layer draws from: per-point opacity
//! and a smoothed path through the points.

pub mod buffer;
pub mod path;

pub use buffer::{TrailBuffer, TrailPoint};
pub use path::{QuadSegment, TrailPath};
