//! WebSocket stream binding
//!
//! Persistent connection to the receiver. A background task owns the socket:
//! it connects, pumps queued outbound frames into the sink, drains inbound
//! frames, and on close or error sleeps the reconnect delay and starts over.
//! Retries are unbounded with no backoff growth; an unreachable host simply
//! cycles Connecting -> Disconnected until closed.

use crate::protocol::OutboundMessage;
use crate::transport::{ConnectionState, TransportChannel, TransportError, TransportResult};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

enum PumpEnd {
    /// Socket closed or errored; the run loop schedules a reconnect.
    Closed,
    /// The transport handle is gone; the run loop exits.
    SenderGone,
}

pub struct WebSocketTransport {
    url: String,
    reconnect_delay: Duration,
    state_tx: watch::Sender<ConnectionState>,
    out_tx: Arc<ParkingMutex<Option<mpsc::UnboundedSender<String>>>>,
    task: Option<JoinHandle<()>>,
}

impl WebSocketTransport {
    pub fn new(url: String, reconnect_delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            url,
            reconnect_delay,
            state_tx,
            out_tx: Arc::new(ParkingMutex::new(None)),
            task: None,
        }
    }

    async fn run_loop(
        url: String,
        reconnect_delay: Duration,
        state_tx: watch::Sender<ConnectionState>,
        mut out_rx: mpsc::UnboundedReceiver<String>,
    ) {
        loop {
            let _ = state_tx.send(ConnectionState::Connecting);
            match connect_async(&url).await {
                Ok((stream, _)) => {
                    // Anything queued while the link was down is stale motion.
                    while out_rx.try_recv().is_ok() {}
                    let _ = state_tx.send(ConnectionState::Connected);
                    tracing::info!(url = %url, "connected to receiver");

                    match Self::pump(stream, &mut out_rx).await {
                        PumpEnd::Closed => {
                            tracing::warn!(url = %url, "connection closed");
                        }
                        PumpEnd::SenderGone => {
                            let _ = state_tx.send(ConnectionState::Disconnected);
                            return;
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "connect failed");
                }
            }
            let _ = state_tx.send(ConnectionState::Disconnected);
            tokio::time::sleep(reconnect_delay).await;
        }
    }

    async fn pump(
        stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
        out_rx: &mut mpsc::UnboundedReceiver<String>,
    ) -> PumpEnd {
        let (mut sink, mut source) = stream.split();
        loop {
            tokio::select! {
                outbound = out_rx.recv() => match outbound {
                    Some(payload) => {
                        if let Err(err) = sink.send(Message::Text(payload)).await {
                            tracing::warn!(error = %err, "send failed; dropping message");
                            return PumpEnd::Closed;
                        }
                    }
                    None => return PumpEnd::SenderGone,
                },
                inbound = source.next() => match inbound {
                    Some(Ok(Message::Text(text))) => {
                        // The receiver can talk back; nothing in the protocol
                        // depends on it yet.
                        tracing::debug!(data = %text, "data received");
                    }
                    Some(Ok(Message::Close(_))) | None => return PumpEnd::Closed,
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "socket error");
                        return PumpEnd::Closed;
                    }
                    Some(Ok(_)) => {}
                },
            }
        }
    }
}

#[async_trait]
impl TransportChannel for WebSocketTransport {
    fn id(&self) -> &str {
        "websocket"
    }

    fn state(&self) -> ConnectionState {
        *self.state_tx.borrow()
    }

    fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    async fn connect(&mut self) -> TransportResult<()> {
        if self.task.is_some() {
            return Ok(());
        }
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        *self.out_tx.lock() = Some(out_tx);
        self.task = Some(tokio::spawn(Self::run_loop(
            self.url.clone(),
            self.reconnect_delay,
            self.state_tx.clone(),
            out_rx,
        )));
        Ok(())
    }

    fn send(&self, message: &OutboundMessage) -> TransportResult<()> {
        if !self.state().is_connected() {
            tracing::warn!(id = self.id(), "not connected; dropping message");
            return Err(TransportError::NotConnected);
        }
        let payload = message.to_json()?;
        match self.out_tx.lock().as_ref() {
            Some(out_tx) if out_tx.send(payload).is_ok() => Ok(()),
            _ => {
                tracing::warn!(id = self.id(), "not connected; dropping message");
                Err(TransportError::NotConnected)
            }
        }
    }

    async fn close(&mut self) {
        *self.out_tx.lock() = None;
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        let _ = self.state_tx.send(ConnectionState::Disconnected);
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
