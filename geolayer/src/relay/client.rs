//! Relay client handle.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::tile::TilePayload;

use super::protocol::{MapReply, Message};
use super::RelayError;

/// Outstanding `request-map` waiters, keyed by coordinate.
type PendingReplies = Mutex<HashMap<(i32, i32), Vec<oneshot::Sender<MapReply>>>>;

/// Client-side handle to the relay connection.
///
/// Implementations multiplex many outstanding tile requests over one
/// connection; a request only ever sees the reply for its own coordinate.
pub trait RelayClient: Send + Sync {
    /// Whether the underlying connection is currently open.
    fn is_open(&self) -> bool;

    /// Request the cached tile at a coordinate and await the matching reply.
    fn request_tile(
        &self,
        x: i32,
        y: i32,
    ) -> impl Future<Output = Result<MapReply, RelayError>> + Send;

    /// Push a freshly downloaded tile to the relay for server-side caching.
    fn push_tile(
        &self,
        x: i32,
        y: i32,
        payload: TilePayload,
    ) -> impl Future<Output = Result<(), RelayError>> + Send;
}

/// Relay client over a websocket connection.
///
/// Owns a write pump draining an outgoing queue and a read pump that routes
/// `map` replies to per-coordinate waiters and re-broadcasts feed messages
/// (`location`, `speed`) to subscribers, dropping stale packets by their
/// per-type timestamp.
pub struct WebSocketRelay {
    outgoing: mpsc::Sender<Message>,
    pending: Arc<PendingReplies>,
    open: watch::Receiver<bool>,
    feed: broadcast::Sender<Message>,
}

impl WebSocketRelay {
    /// Connect to the relay at a `ws://` URL and start the pumps.
    pub async fn connect(url: &str) -> Result<Self, RelayError> {
        let (stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| RelayError::Connect(e.to_string()))?;
        let (mut sink, mut source) = stream.split();

        let (outgoing, mut outgoing_rx) = mpsc::channel::<Message>(64);
        let (open_tx, open) = watch::channel(true);
        let open_tx = Arc::new(open_tx);
        let (feed, _) = broadcast::channel(64);
        let pending: Arc<PendingReplies> = Arc::new(Mutex::new(HashMap::new()));

        tracing::info!(url, "relay connected");

        // Write pump
        let write_open = Arc::clone(&open_tx);
        tokio::spawn(async move {
            while let Some(message) = outgoing_rx.recv().await {
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to encode relay message");
                        continue;
                    }
                };
                if let Err(e) = sink.send(WsMessage::Text(text)).await {
                    tracing::warn!(error = %e, "relay send failed");
                    break;
                }
            }
            let _ = write_open.send(false);
        });

        // Read pump
        let read_open = Arc::clone(&open_tx);
        let read_pending = Arc::clone(&pending);
        let read_feed = feed.clone();
        tokio::spawn(async move {
            let mut last_seen: HashMap<&'static str, i64> = HashMap::new();
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(WsMessage::Text(text)) => match serde_json::from_str::<Message>(&text) {
                        Ok(message) => {
                            dispatch(message, &read_pending, &read_feed, &mut last_seen)
                        }
                        Err(e) => tracing::warn!(error = %e, "unparseable relay message"),
                    },
                    Ok(WsMessage::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "relay read failed");
                        break;
                    }
                }
            }
            let _ = read_open.send(false);
            // Wake outstanding requests; their channels error with Closed
            read_pending.lock().clear();
            tracing::info!("relay connection closed");
        });

        Ok(Self {
            outgoing,
            pending,
            open,
            feed,
        })
    }

    /// Subscribe to the feed messages (`location`, `speed`) the relay
    /// re-broadcasts from the transmitter.
    pub fn feed(&self) -> broadcast::Receiver<Message> {
        self.feed.subscribe()
    }
}

impl RelayClient for WebSocketRelay {
    fn is_open(&self) -> bool {
        *self.open.borrow()
    }

    async fn request_tile(&self, x: i32, y: i32) -> Result<MapReply, RelayError> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().entry((x, y)).or_default().push(tx);

        self.outgoing
            .send(Message::RequestMap { x, y })
            .await
            .map_err(|_| RelayError::Closed)?;

        rx.await.map_err(|_| RelayError::Closed)
    }

    async fn push_tile(&self, x: i32, y: i32, payload: TilePayload) -> Result<(), RelayError> {
        self.outgoing
            .send(Message::Map {
                x,
                y,
                tile: Some(payload),
                error: None,
            })
            .await
            .map_err(|_| RelayError::Closed)
    }
}

/// Route one incoming message: `map` replies go to the waiters registered
/// for that exact coordinate (other coordinates' waiters are untouched),
/// everything else passes the per-type stale filter and joins the feed.
fn dispatch(
    message: Message,
    pending: &PendingReplies,
    feed: &broadcast::Sender<Message>,
    last_seen: &mut HashMap<&'static str, i64>,
) {
    match message {
        Message::Map { x, y, tile, error } => {
            let waiters = pending.lock().remove(&(x, y)).unwrap_or_default();
            if waiters.is_empty() {
                tracing::debug!(x, y, "map reply with no waiting request");
                return;
            }
            let reply = MapReply { x, y, tile, error };
            for waiter in waiters {
                let _ = waiter.send(reply.clone());
            }
        }
        other => {
            if let Some(time) = other.time() {
                let kind = other.kind();
                if last_seen.get(kind).is_some_and(|&seen| seen > time) {
                    tracing::debug!(kind, time, "stale packet dropped");
                    return;
                }
                last_seen.insert(kind, time);
            }
            let _ = feed.send(other);
        }
    }
}
