//! Gesture-to-protocol pipeline
//!
//! Wires the pieces together: raw pointer samples go through the pan
//! interpreter and the tap arbiter in one synchronous step, trail insertion
//! and throttled-motion evaluation happen in that same step, and the
//! resulting messages are handed to the transport. The async driver owns the
//! two periodic concerns (trail sweep, tap-window deadline) and publishes
//! render snapshots.

pub mod driver;
pub mod engine;

pub use engine::TrackpadPipeline;
pub use driver::{
    spawn, spawn_with_transport, PipelineEvent, PipelineHandle, PipelineSnapshot,
    TrailSnapshotPoint,
};
