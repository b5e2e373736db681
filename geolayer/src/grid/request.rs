//! Single-tile fetch state machine.
//!
//! One `TileRequest` exists per (coordinate, grid slot) per grid refresh.
//! It resolves exactly once: from the in-memory cache, else through the
//! relay's server-side cache, else by downloading and rasterising straight
//! from the data source (pushing the result back to the relay for others).

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::cache::TileCache;
use crate::coord::TileCoord;
use crate::relay::{RelayClient, RelayError};
use crate::source::VectorSource;
use crate::tile::{Tile, TileConfig, TileError};

/// Maximum number of waits for the relay connection to open.
const MAX_ATTEMPTS: u32 = 20;

/// Backoff unit; attempt `n` waits `n` of these (1s, 2s, … 20s ≈ 210 s).
const BACKOFF_STEP: Duration = Duration::from_secs(1);

/// Failure modes of a tile request.
///
/// Failures are local to one grid slot; the visiting loop logs and moves
/// on. No automatic retry happens within a grid cycle; the next time the
/// viewport enters the coordinate a fresh request re-checks the cache.
#[derive(Debug, Error)]
pub enum TileRequestError {
    /// The relay stayed closed for the whole backoff budget.
    #[error("relay unavailable after {attempts} attempts")]
    RelayUnavailable { attempts: u32 },

    /// The relay round trip itself failed.
    #[error("relay request failed: {0}")]
    Relay(#[from] RelayError),

    /// Direct download from the data source failed; the tile was discarded.
    #[error(transparent)]
    Download(#[from] TileError),

    /// The relay reported an error code other than not-found.
    #[error("relay reported error {code}")]
    Protocol { code: u16 },

    /// The relay reply carried neither a tile nor an error.
    #[error("relay reply carried neither tile nor error")]
    EmptyReply,

    /// The request already rejected; a terminal state never re-fires.
    #[error("tile request already completed")]
    Completed,
}

/// Terminal-state tracking for exactly-once resolution.
#[derive(Debug, Clone)]
pub enum RequestState {
    Pending,
    Resolved(Arc<Tile>),
    Rejected,
}

/// The fetch state machine for one tile of one grid refresh.
#[derive(Debug)]
pub struct TileRequest {
    coord: TileCoord,
    slot: usize,
    state: RequestState,
}

impl TileRequest {
    /// Create a pending request for a coordinate and grid slot.
    pub fn new(coord: TileCoord, slot: usize) -> Self {
        Self {
            coord,
            slot,
            state: RequestState::Pending,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Resolve this request.
    ///
    /// Checks the cache, then the relay, then falls back to a direct data
    /// source download on a 404 reply. Every successfully resolved tile is
    /// inserted into the cache before being returned.
    ///
    /// Resolution is exactly-once: calling again after success returns the
    /// same tile without touching the network; calling again after a
    /// rejection is a programming error reported as `Completed`.
    pub async fn fetch<R: RelayClient, S: VectorSource>(
        &mut self,
        cache: &TileCache,
        relay: &R,
        source: &S,
        config: &TileConfig,
    ) -> Result<Arc<Tile>, TileRequestError> {
        match &self.state {
            RequestState::Resolved(tile) => return Ok(Arc::clone(tile)),
            RequestState::Rejected => return Err(TileRequestError::Completed),
            RequestState::Pending => {}
        }

        let key = self.coord.key();

        if let Some(tile) = cache.get(&key) {
            tracing::debug!(tile = %self.coord, "tile served from memory");
            self.state = RequestState::Resolved(Arc::clone(&tile));
            return Ok(tile);
        }

        if let Err(e) = self.wait_for_relay(relay).await {
            self.state = RequestState::Rejected;
            return Err(e);
        }

        let reply = match relay.request_tile(self.coord.x, self.coord.y).await {
            Ok(reply) => reply,
            Err(e) => {
                self.state = RequestState::Rejected;
                return Err(e.into());
            }
        };

        let tile = if let Some(payload) = reply.tile {
            tracing::debug!(tile = %self.coord, "tile served from relay cache");
            Tile::from_cache(self.coord, payload)
        } else {
            match reply.error {
                Some(404) => match self.download_direct(relay, source, config).await {
                    Ok(tile) => tile,
                    Err(e) => {
                        self.state = RequestState::Rejected;
                        return Err(e);
                    }
                },
                Some(code) => {
                    tracing::error!(tile = %self.coord, code, "unexpected relay error");
                    self.state = RequestState::Rejected;
                    return Err(TileRequestError::Protocol { code });
                }
                None => {
                    self.state = RequestState::Rejected;
                    return Err(TileRequestError::EmptyReply);
                }
            }
        };

        let tile = Arc::new(tile);
        cache.put(key, Arc::clone(&tile));
        self.state = RequestState::Resolved(Arc::clone(&tile));
        Ok(tile)
    }

    /// Wait for the relay connection to open, with linear backoff.
    async fn wait_for_relay<R: RelayClient>(&self, relay: &R) -> Result<(), TileRequestError> {
        let mut attempt = 0u32;
        while !relay.is_open() {
            attempt += 1;
            if attempt > MAX_ATTEMPTS {
                tracing::error!(
                    tile = %self.coord,
                    "relay stayed closed for the whole backoff budget"
                );
                return Err(TileRequestError::RelayUnavailable {
                    attempts: MAX_ATTEMPTS,
                });
            }
            tokio::time::sleep(BACKOFF_STEP * attempt).await;
        }
        Ok(())
    }

    /// Not-found fallback: download from the data source and push the built
    /// tile back to the relay for server-side caching.
    async fn download_direct<R: RelayClient, S: VectorSource>(
        &self,
        relay: &R,
        source: &S,
        config: &TileConfig,
    ) -> Result<Tile, TileRequestError> {
        let mut tile = Tile::new(self.coord);
        tile.download(source, config).await?;

        if let Err(e) = relay
            .push_tile(self.coord.x, self.coord.y, tile.to_cache())
            .await
        {
            // Server-side caching is best-effort; the tile itself is good
            tracing::warn!(tile = %self.coord, error = %e, "failed to push tile to relay");
        }

        Ok(tile)
    }
}
