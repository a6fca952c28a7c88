//! Async pipeline driver
//!
//! One task owns all pipeline state and multiplexes three event sources: the
//! pointer-event channel, the periodic trail sweep, and the tap-window
//! deadline. Nothing in the loop blocks on the network; delivery is handed
//! to the transport's fire-and-forget send. The rendering layer reads from a
//! published snapshot and the transport's connection-state watch instead of
//! reaching into pipeline internals.

use crate::config::{Config, TransportBinding};
use crate::gesture::{PointerSample, TouchPosition};
use crate::pipeline::engine::TrackpadPipeline;
use crate::protocol::OutboundMessage;
use crate::transport::{
    ConnectionState, TransportChannel, TransportResult, UdpTransport, WebSocketTransport,
};
use parking_lot::Mutex as ParkingMutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Input accepted by the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipelineEvent {
    Pointer(PointerSample),
    /// Scroll from whatever source the embedding app wires up.
    Scroll { dx: f64, dy: f64 },
}

/// One trail point prepared for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailSnapshotPoint {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
}

/// Everything the rendering layer needs, captured after a pipeline step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub touch: Option<TouchPosition>,
    pub trail: Vec<TrailSnapshotPoint>,
    /// SVG path data for the smoothed trail curve.
    pub trail_path: String,
}

/// Handle held by the embedding app.
pub struct PipelineHandle {
    events: mpsc::UnboundedSender<PipelineEvent>,
    snapshot: Arc<ParkingMutex<PipelineSnapshot>>,
    state_rx: watch::Receiver<ConnectionState>,
    task: Option<JoinHandle<()>>,
}

impl PipelineHandle {
    /// Feed one raw pointer event.
    pub fn pointer(&self, sample: PointerSample) {
        let _ = self.events.send(PipelineEvent::Pointer(sample));
    }

    /// Feed a scroll delta (extension point; no gesture produces these).
    pub fn scroll(&self, dx: f64, dy: f64) {
        let _ = self.events.send(PipelineEvent::Scroll { dx, dy });
    }

    /// Latest render snapshot.
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.snapshot.lock().clone()
    }

    /// Current connection state, for display.
    pub fn connection(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Subscribe to connection state transitions.
    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Stop the driver and tear the transport down.
    pub async fn shutdown(mut self) {
        let task = self.task.take();
        // Dropping the sender ends the driver loop, which closes the
        // transport before exiting.
        drop(self.events);
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

/// Build the configured transport binding and start the pipeline.
pub async fn spawn(config: Config) -> TransportResult<PipelineHandle> {
    let transport: Box<dyn TransportChannel> = match config.binding {
        TransportBinding::Stream => Box::new(WebSocketTransport::new(
            config.stream_url(),
            config.reconnect_delay(),
        )),
        TransportBinding::Datagram => Box::new(UdpTransport::new(
            &config.host,
            config.datagram_port,
            config.reconnect_delay(),
        )),
    };
    spawn_with_transport(config, transport).await
}

/// Start the pipeline on an already-built transport channel.
pub async fn spawn_with_transport(
    config: Config,
    mut transport: Box<dyn TransportChannel>,
) -> TransportResult<PipelineHandle> {
    transport.connect().await?;

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let snapshot = Arc::new(ParkingMutex::new(PipelineSnapshot::default()));
    let state_rx = transport.watch_state();

    let pipeline = TrackpadPipeline::new(&config);
    let task = tokio::spawn(run(
        pipeline,
        transport,
        events_rx,
        Arc::clone(&snapshot),
        config,
    ));

    Ok(PipelineHandle {
        events: events_tx,
        snapshot,
        state_rx,
        task: Some(task),
    })
}

async fn run(
    mut pipeline: TrackpadPipeline,
    mut transport: Box<dyn TransportChannel>,
    mut events: mpsc::UnboundedReceiver<PipelineEvent>,
    snapshot: Arc<ParkingMutex<PipelineSnapshot>>,
    config: Config,
) {
    let mut sweep = tokio::time::interval(config.trail_sweep());
    sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        // The tap deadline only exists while a single-tap is suppressed.
        let tap_deadline = pipeline.tap_deadline();
        let tap_due = async move {
            match tap_deadline {
                Some(at) => tokio::time::sleep_until(at.into()).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            event = events.recv() => match event {
                Some(PipelineEvent::Pointer(sample)) => {
                    let now = Instant::now();
                    for message in pipeline.handle_sample(&sample, now) {
                        deliver(transport.as_ref(), &message);
                    }
                    publish(&snapshot, &pipeline, now);
                }
                Some(PipelineEvent::Scroll { dx, dy }) => {
                    deliver(transport.as_ref(), &pipeline.scroll(dx, dy));
                }
                None => break,
            },
            _ = sweep.tick() => {
                let now = Instant::now();
                pipeline.sweep(now);
                publish(&snapshot, &pipeline, now);
            }
            _ = tap_due => {
                if let Some(message) = pipeline.poll_taps(Instant::now()) {
                    deliver(transport.as_ref(), &message);
                }
            }
        }
    }

    transport.close().await;
}

fn deliver(transport: &dyn TransportChannel, message: &OutboundMessage) {
    // Best effort; the transport logs drops and failures.
    let _ = transport.send(message);
}

fn publish(
    snapshot: &ParkingMutex<PipelineSnapshot>,
    pipeline: &TrackpadPipeline,
    now: Instant,
) {
    let fade = pipeline.trail().fade();
    let trail = pipeline
        .trail()
        .points()
        .map(|p| TrailSnapshotPoint {
            x: p.x,
            y: p.y,
            opacity: p.opacity(now, fade),
        })
        .collect();
    *snapshot.lock() = PipelineSnapshot {
        touch: pipeline.current_touch(),
        trail,
        trail_path: pipeline.trail().path().to_string(),
    };
}
