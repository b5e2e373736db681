//! Relay connection: protocol types and the client handle.
//!
//! The relay brokers tile requests between display clients and its
//! server-side file cache, and forwards the live location feed. Messages
//! are JSON objects framed one per websocket text frame, each carrying a
//! `type` field.
//!
//! The connection handle is an explicit object injected into the grid and
//! request machinery rather than ambient process state; many outstanding
//! tile requests share the one connection, each listening only for the
//! reply matching its own coordinate.

mod client;
mod protocol;

pub use client::{RelayClient, WebSocketRelay};
pub use protocol::{now_millis, MapReply, Message};

#[cfg(test)]
pub use client::tests::MockRelay;

use thiserror::Error;

/// Errors from the relay connection.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The websocket connection could not be established.
    #[error("relay connection failed: {0}")]
    Connect(String),

    /// The connection closed before the operation completed.
    #[error("relay connection closed")]
    Closed,
}
