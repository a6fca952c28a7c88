//! UDP datagram binding
//!
//! Connectionless alternative for high-frequency motion updates: one JSON
//! payload per datagram, no per-message connection overhead. "Connected"
//! here means the local socket is bound and aimed at the receiver; a bind
//! failure is retried on the same fixed delay as the stream binding. Send
//! errors are logged and the datagram is lost, which is the intended
//! behavior for a real-time control stream.

use crate::protocol::OutboundMessage;
use crate::transport::{ConnectionState, TransportChannel, TransportError, TransportResult};
use async_trait::async_trait;
use parking_lot::Mutex as ParkingMutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct UdpTransport {
    addr: String,
    reconnect_delay: Duration,
    state_tx: watch::Sender<ConnectionState>,
    socket: Arc<ParkingMutex<Option<Arc<UdpSocket>>>>,
    task: Option<JoinHandle<()>>,
}

impl UdpTransport {
    pub fn new(host: &str, port: u16, reconnect_delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            addr: format!("{host}:{port}"),
            reconnect_delay,
            state_tx,
            socket: Arc::new(ParkingMutex::new(None)),
            task: None,
        }
    }

    async fn open(addr: &str) -> std::io::Result<UdpSocket> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(addr).await?;
        Ok(socket)
    }

    async fn run_loop(
        addr: String,
        reconnect_delay: Duration,
        state_tx: watch::Sender<ConnectionState>,
        slot: Arc<ParkingMutex<Option<Arc<UdpSocket>>>>,
    ) {
        loop {
            let _ = state_tx.send(ConnectionState::Connecting);
            match Self::open(&addr).await {
                Ok(socket) => {
                    *slot.lock() = Some(Arc::new(socket));
                    let _ = state_tx.send(ConnectionState::Connected);
                    tracing::info!(addr = %addr, "datagram socket ready");
                    // No peer can close a connectionless socket; the task is
                    // done once the socket is in place.
                    return;
                }
                Err(err) => {
                    tracing::warn!(addr = %addr, error = %err, "socket setup failed");
                    let _ = state_tx.send(ConnectionState::Disconnected);
                    tokio::time::sleep(reconnect_delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl TransportChannel for UdpTransport {
    fn id(&self) -> &str {
        "udp"
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
        self.task = Some(tokio::spawn(Self::run_loop(
            self.addr.clone(),
            self.reconnect_delay,
            self.state_tx.clone(),
            self.socket.clone(),
        )));
        Ok(())
    }

    fn send(&self, message: &OutboundMessage) -> TransportResult<()> {
        if !self.state().is_connected() {
            tracing::warn!(id = self.id(), "not connected; dropping message");
            return Err(TransportError::NotConnected);
        }
        let socket = match self.socket.lock().as_ref() {
            Some(socket) => Arc::clone(socket),
            None => {
                tracing::warn!(id = self.id(), "not connected; dropping message");
                return Err(TransportError::NotConnected);
            }
        };
        let payload = message.to_json()?;
        if let Err(err) = socket.try_send(payload.as_bytes()) {
            // Includes a full send buffer; the datagram is simply lost.
            tracing::warn!(id = self.id(), error = %err, "send failed; dropping message");
        }
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        *self.socket.lock() = None;
        let _ = self.state_tx.send(ConnectionState::Disconnected);
    }
}

impl Drop for UdpTransport {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
