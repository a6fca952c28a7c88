//! Pipeline configuration
//!
//! Load-time configuration for the gesture-to-protocol pipeline. There is no
//! CLI; the embedding app either uses the defaults or deserializes a config
//! from JSON with every field optional.

use serde::Deserialize;
use std::time::Duration;

/// Which transport binding carries the control stream.
///
/// Both bindings present the same channel contract; the choice is made here,
/// at configuration time, not branched on inside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportBinding {
    /// Persistent WebSocket connection to the host.
    Stream,
    /// Connectionless UDP datagrams with a tighter movement throttle.
    Datagram,
}

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Host computer running the AirTrack receiver.
    pub host: String,
    /// WebSocket port on the host.
    pub stream_port: u16,
    /// UDP port on the host.
    pub datagram_port: u16,
    /// Transport binding carrying the control stream.
    pub binding: TransportBinding,

    /// Multiplier applied to raw pixel deltas before transmission.
    pub movement_sensitivity: f64,
    /// Multiplier applied to scroll deltas before transmission.
    pub scroll_sensitivity: f64,
    /// Minimum spacing between movement messages on the stream binding.
    pub stream_throttle_ms: u64,
    /// Minimum spacing between movement messages on the datagram binding.
    pub datagram_throttle_ms: u64,
    /// Per-axis pixel delta required before motion is forwarded.
    pub dead_zone_px: f64,

    /// Number of trail points kept for rendering.
    pub max_trail_points: usize,
    /// How long a trail point takes to fade out completely.
    pub trail_fade_ms: u64,
    /// Period of the sweep that purges faded trail points.
    pub trail_sweep_ms: u64,

    /// Delay before a dropped connection is retried.
    pub reconnect_delay_ms: u64,

    /// Window in which a second tap turns the sequence into a double-tap.
    pub double_tap_window_ms: u64,
    /// Maximum displacement for a touch to still count as a tap.
    pub tap_slop_px: f64,
    /// Maximum duration for a touch to still count as a tap.
    pub tap_max_duration_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "192.168.0.101".to_string(),
            stream_port: 9002,
            datagram_port: 9003,
            binding: TransportBinding::Stream,
            movement_sensitivity: 2.0,
            scroll_sensitivity: 3.0,
            stream_throttle_ms: 16,
            datagram_throttle_ms: 8,
            dead_zone_px: 1.0,
            max_trail_points: 20,
            trail_fade_ms: 2000,
            trail_sweep_ms: 100,
            reconnect_delay_ms: 3000,
            double_tap_window_ms: 300,
            tap_slop_px: 10.0,
            tap_max_duration_ms: 300,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// WebSocket URL of the stream binding.
    pub fn stream_url(&self) -> String {
        format!("ws://{}:{}", self.host, self.stream_port)
    }

    /// Movement throttle interval for the selected binding.
    pub fn throttle(&self) -> Duration {
        match self.binding {
            TransportBinding::Stream => Duration::from_millis(self.stream_throttle_ms),
            TransportBinding::Datagram => Duration::from_millis(self.datagram_throttle_ms),
        }
    }

    pub fn trail_fade(&self) -> Duration {
        Duration::from_millis(self.trail_fade_ms)
    }

    pub fn trail_sweep(&self) -> Duration {
        Duration::from_millis(self.trail_sweep_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    pub fn tap_max_duration(&self) -> Duration {
        Duration::from_millis(self.tap_max_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_receiver_expectations() {
        let config = Config::default();
        assert_eq!(config.stream_port, 9002);
        assert_eq!(config.datagram_port, 9003);
        assert_eq!(config.movement_sensitivity, 2.0);
        assert_eq!(config.stream_throttle_ms, 16);
        assert_eq!(config.datagram_throttle_ms, 8);
        assert_eq!(config.max_trail_points, 20);
        assert_eq!(config.trail_fade_ms, 2000);
        assert_eq!(config.binding, TransportBinding::Stream);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{"host": "10.0.0.5", "binding": "datagram"}"#)
            .expect("partial config should parse");
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.binding, TransportBinding::Datagram);
        assert_eq!(config.stream_port, 9002, "unset fields keep their defaults");
    }

    #[test]
    fn test_throttle_follows_binding() {
        let mut config = Config::default();
        assert_eq!(config.throttle(), Duration::from_millis(16));

        config.binding = TransportBinding::Datagram;
        assert_eq!(config.throttle(), Duration::from_millis(8));
    }

    #[test]
    fn test_stream_url() {
        let config = Config::default();
        assert_eq!(config.stream_url(), "ws://192.168.0.101:9002");
    }
}
