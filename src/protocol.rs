//! Wire protocol shared with the AirTrack receiver
//!
//! One JSON object per frame or datagram. The receiver injects the decoded
//! events into the host's pointer; both transport bindings carry the exact
//! same payloads.

use serde::{Deserialize, Serialize};

/// Mouse button carried by a click message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
}

/// A single outbound control message.
///
/// Constructed once per send attempt and never mutated. `Scroll` is part of
/// the protocol but not produced by any gesture; the pipeline exposes it as
/// an extension point for the embedding app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    /// Relative cursor displacement, sensitivity-scaled and rounded.
    Move { dx: i32, dy: i32 },
    /// Single click.
    Click { button: MouseButton },
    /// Relative scroll displacement.
    Scroll { scroll_x: i32, scroll_y: i32 },
}

impl OutboundMessage {
    /// Encode to the canonical wire representation.
    ///
    /// Total over the variant set: every message encodes. The error arm only
    /// exists to satisfy the serializer's signature.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
