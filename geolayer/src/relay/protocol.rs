//! Relay wire protocol.

use serde::{Deserialize, Serialize};

use crate::tile::TilePayload;

/// A relay protocol message.
///
/// JSON framing with an internal `type` tag: `{"type": "request-map", ...}`.
/// The `map` message travels both ways: as a reply carrying either a tile
/// payload or an error code (404 = not cached), and client → relay as a
/// push of a freshly downloaded tile for server-side caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Message {
    /// Ask the relay for the cached tile at a coordinate.
    RequestMap { x: i32, y: i32 },

    /// Tile reply or push; exactly one of `tile` and `error` is set.
    Map {
        x: i32,
        y: i32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tile: Option<TilePayload>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<u16>,
    },

    /// Live position from the transmitter feed.
    Location {
        time: i64,
        latitude: f64,
        longitude: f64,
    },

    /// Derived speed broadcast, consumed by the speedometer display.
    Speed { time: i64, speed: f64 },

    /// A transmitter announcing itself on the connection.
    ConnectTransmitter { time: i64 },
}

impl Message {
    /// Wire name of the message type, used for per-type stale filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::RequestMap { .. } => "request-map",
            Message::Map { .. } => "map",
            Message::Location { .. } => "location",
            Message::Speed { .. } => "speed",
            Message::ConnectTransmitter { .. } => "connect-transmitter",
        }
    }

    /// Timestamp carried by feed messages, if any.
    pub fn time(&self) -> Option<i64> {
        match self {
            Message::Location { time, .. }
            | Message::Speed { time, .. }
            | Message::ConnectTransmitter { time } => Some(*time),
            Message::RequestMap { .. } | Message::Map { .. } => None,
        }
    }
}

/// A routed `map` reply for one coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct MapReply {
    pub x: i32,
    pub y: i32,
    pub tile: Option<TilePayload>,
    pub error: Option<u16>,
}

/// Current epoch time in milliseconds, the protocol's timestamp unit.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
