//! Broker connection manager
//!
//! Owns the subscription lifecycle: dial the broker over WebSocket, declare
//! the durable queue-group subscription, pump frames until the connection
//! drops, then reconnect with backoff. Connect failures are never fatal —
//! the loop retries for as long as the process lives.
//!
//! Deliveries are dispatched on detached tasks: a job that started before a
//! disconnect finishes (or fails) on its own.

use futures::{SinkExt, StreamExt};
use shared::{QueueFrame, REPORT_FILE_CREATE_SUBJECT, REPORT_QUEUE_GROUP};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, connect_async};
use tokio_util::sync::CancellationToken;

use crate::core::ServerState;

use super::Backoff;
use super::dispatcher;

type WsStream = tokio_tungstenite::WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Outgoing publish buffer
const OUTGOING_CAPACITY: usize = 256;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("Broker not connected")]
    NotConnected,

    #[error("Broker connection closed")]
    Closed,
}

/// How one subscribed session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Unexpected disconnect; the manager will reconnect with backoff.
    ConnectionLost,
    /// Process shutdown; the manager unsubscribes and stops.
    ExplicitClose,
}

/// Publish handle shared with the RPC entry point.
///
/// Cheap to clone; publishing while fully disconnected fails fast instead of
/// buffering into a dead session.
#[derive(Clone)]
pub struct BrokerPublisher {
    tx: mpsc::Sender<QueueFrame>,
    connected: Arc<AtomicBool>,
}

impl BrokerPublisher {
    pub async fn publish(
        &self,
        subject: &str,
        payload: serde_json::Value,
    ) -> Result<(), BrokerError> {
        if !self.is_connected() {
            return Err(BrokerError::NotConnected);
        }
        self.tx
            .send(QueueFrame::Pub {
                subject: subject.to_string(),
                payload,
            })
            .await
            .map_err(|_| BrokerError::Closed)
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

/// Manager-side half of the publish channel.
pub struct BrokerLink {
    outgoing: mpsc::Receiver<QueueFrame>,
    connected: Arc<AtomicBool>,
    // Held so `outgoing.recv()` can only yield `None` once the manager drops.
    _keepalive: mpsc::Sender<QueueFrame>,
}

impl BrokerLink {
    /// Flip the publisher-visible connection flag; the manager calls this on
    /// subscribe and on loss.
    pub fn mark_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
    }

    /// Next outgoing publish frame.
    pub async fn recv(&mut self) -> Option<QueueFrame> {
        self.outgoing.recv().await
    }
}

/// Create the publisher/manager channel pair.
pub fn broker_channel() -> (BrokerPublisher, BrokerLink) {
    let (tx, rx) = mpsc::channel(OUTGOING_CAPACITY);
    let connected = Arc::new(AtomicBool::new(false));
    let publisher = BrokerPublisher {
        tx: tx.clone(),
        connected: connected.clone(),
    };
    let link = BrokerLink {
        outgoing: rx,
        connected,
        _keepalive: tx,
    };
    (publisher, link)
}

/// 连接管理器 - 状态机
///
/// `Disconnected -> Connecting -> Subscribed -> (ConnectionLost | ExplicitClose)`
pub struct ConnectionManager {
    state: ServerState,
    link: BrokerLink,
    shutdown: CancellationToken,
}

impl ConnectionManager {
    pub fn new(state: ServerState, link: BrokerLink, shutdown: CancellationToken) -> Self {
        Self {
            state,
            link,
            shutdown,
        }
    }

    /// Main run loop — connect, subscribe, pump frames, reconnect on failure.
    pub async fn run(mut self) {
        tracing::info!(url = %self.state.config.broker_url, "Broker worker started");
        let mut backoff = Backoff::reconnect();

        loop {
            // Check shutdown before attempting connection
            if self.shutdown.is_cancelled() {
                break;
            }

            match connect_async(self.state.config.broker_url.as_str()).await {
                Ok((ws, _)) => {
                    backoff.reset();
                    match self.run_session(ws).await {
                        SessionEnd::ExplicitClose => break,
                        SessionEnd::ConnectionLost => {
                            tracing::warn!("Broker connection lost");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Broker connect failed: {e}");
                }
            }

            let delay = backoff.next_delay();
            tracing::info!(
                delay_ms = delay.as_millis() as u64,
                "Reconnecting to broker after backoff"
            );
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        self.link.mark_connected(false);
        tracing::info!("Broker worker stopped");
    }

    /// Run a single subscribed session until disconnect or shutdown.
    async fn run_session(&mut self, ws: WsStream) -> SessionEnd {
        let (mut sink, mut stream) = ws.split();

        // Declare the durable queue-group subscription.
        let sub = QueueFrame::Sub {
            subject: REPORT_FILE_CREATE_SUBJECT.to_string(),
            group: REPORT_QUEUE_GROUP.to_string(),
        };
        let json = match serde_json::to_string(&sub) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Serialize subscribe frame: {e}");
                return SessionEnd::ConnectionLost;
            }
        };
        if let Err(e) = sink.send(Message::Text(json.into())).await {
            tracing::warn!("Broker subscribe failed: {e}");
            return SessionEnd::ConnectionLost;
        }

        self.link.mark_connected(true);
        tracing::info!(
            subject = REPORT_FILE_CREATE_SUBJECT,
            group = REPORT_QUEUE_GROUP,
            "Broker subscription established"
        );

        let end = loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    let _ = sink.send(Message::Close(None)).await;
                    break SessionEnd::ExplicitClose;
                }

                // Outgoing publishes from the RPC entry point
                maybe_frame = self.link.recv() => {
                    let Some(frame) = maybe_frame else {
                        break SessionEnd::ConnectionLost;
                    };
                    let json = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Serialize outgoing frame: {e}");
                            continue;
                        }
                    };
                    if let Err(e) = sink.send(Message::Text(json.into())).await {
                        tracing::warn!("Broker publish failed: {e}");
                        break SessionEnd::ConnectionLost;
                    }
                }

                // Incoming broker frames
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => Self::handle_frame(&self.state, &text),
                        Some(Ok(Message::Ping(data))) => {
                            let _ = sink.send(Message::Pong(data)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            tracing::info!("Broker closed the connection");
                            break SessionEnd::ConnectionLost;
                        }
                        Some(Err(e)) => {
                            tracing::warn!("Broker socket error: {e}");
                            break SessionEnd::ConnectionLost;
                        }
                        None => {
                            tracing::info!("Broker stream ended");
                            break SessionEnd::ConnectionLost;
                        }
                        _ => {} // Binary, Pong — ignore
                    }
                }
            }
        };

        self.link.mark_connected(false);
        end
    }

    /// Handle one incoming frame; deliveries fan out to detached job tasks.
    fn handle_frame(state: &ServerState, text: &str) {
        match serde_json::from_str::<QueueFrame>(text) {
            Ok(QueueFrame::Msg { subject, payload }) => {
                tracing::debug!(subject = %subject, "Delivery received");
                tokio::spawn(dispatcher::dispatch(state.clone(), payload));
            }
            Ok(other) => {
                tracing::debug!("Ignoring unexpected frame from broker: {other:?}");
            }
            Err(e) => {
                tracing::warn!("Invalid frame from broker: {e}");
            }
        }
    }
}
