//! AirTrack core - turn a phone touchscreen into a wireless trackpad.
//!
//! This crate is the gesture-to-protocol pipeline: it interprets raw touch
//! events into semantic motion and clicks, keeps a bounded fading trail of
//! recent touches for the overlay renderer, throttles and frames outbound
//! control messages, and maintains a resilient connection to the receiver on
//! the host computer. Screen layout and drawing live in the embedding app;
//! it consumes the snapshots and connection state this crate publishes.

pub mod config;
pub mod gesture;
pub mod pipeline;
pub mod protocol;
pub mod throttle;
pub mod trail;
pub mod transport;

pub use config::{Config, TransportBinding};
pub use gesture::{PointerPhase, PointerSample, TouchPosition};
pub use pipeline::{spawn, PipelineHandle, PipelineSnapshot};
pub use protocol::{MouseButton, OutboundMessage};
pub use transport::{ConnectionState, TransportChannel};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging for an embedding app.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "airtrack_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
