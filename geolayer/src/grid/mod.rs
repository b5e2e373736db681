//! 3×3 neighbourhood orchestration.
//!
//! The grid fetches the nine tiles around the viewport's tile coordinate,
//! visiting slots strictly sequentially in a heading-dependent order so the
//! tiles ahead of the direction of travel render first (and so the relay
//! and data source see at most one in-flight tile per client). Starting a
//! new refresh cancels the one in flight; cancellation is cooperative,
//! checked between slot visits, and a superseded cycle's results are
//! discarded.

mod heading;
mod request;

pub use heading::{normalize_heading, visiting_order};
pub use request::{RequestState, TileRequest, TileRequestError};

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::cache::TileCache;
use crate::coord::TileCoord;
use crate::relay::RelayClient;
use crate::source::VectorSource;
use crate::tile::{Tile, TileConfig};

/// Lifecycle of one grid refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

type LoadHook = Box<dyn Fn(usize, &Arc<Tile>, i32, i32) + Send + Sync>;
type CompleteHook = Box<dyn Fn() + Send + Sync>;

struct GridState {
    center: TileCoord,
    cycle: CycleState,
    /// Monotonic id of the current cycle; guards state writes from
    /// superseded cycles.
    cycle_id: u64,
    cancel: CancellationToken,
    tiles: [Option<Arc<Tile>>; 9],
}

/// Orchestrates fetching and rendering the 3×3 tile neighbourhood.
///
/// Configuration and collaborators are injected: the grid owns the tile
/// pipeline config and the shared tile cache, and borrows the relay and
/// data source per refresh.
pub struct TileGrid {
    config: Arc<TileConfig>,
    cache: Arc<TileCache>,
    state: Mutex<GridState>,
    load_hooks: Mutex<Vec<LoadHook>>,
    complete_hooks: Mutex<Vec<CompleteHook>>,
}

impl TileGrid {
    pub fn new(config: Arc<TileConfig>, cache: Arc<TileCache>) -> Self {
        Self {
            config,
            cache,
            state: Mutex::new(GridState {
                center: TileCoord::new(0, 0),
                cycle: CycleState::Idle,
                cycle_id: 0,
                cancel: CancellationToken::new(),
                tiles: Default::default(),
            }),
            load_hooks: Mutex::new(Vec::new()),
            complete_hooks: Mutex::new(Vec::new()),
        }
    }

    /// Register a hook invoked as `(slot, tile, center_x, center_y)` each
    /// time a slot resolves.
    pub fn on_load<F>(&self, hook: F)
    where
        F: Fn(usize, &Arc<Tile>, i32, i32) + Send + Sync + 'static,
    {
        self.load_hooks.lock().push(Box::new(hook));
    }

    /// Register a hook invoked once all nine slots of a cycle resolved.
    pub fn on_complete<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.complete_hooks.lock().push(Box::new(hook));
    }

    /// Current center tile coordinate.
    pub fn center(&self) -> TileCoord {
        self.state.lock().center
    }

    /// State of the current refresh cycle.
    pub fn cycle_state(&self) -> CycleState {
        self.state.lock().cycle
    }

    /// Resolved tile of a slot; `None` until that slot's load hook fired
    /// in the current cycle.
    pub fn tile(&self, slot: usize) -> Option<Arc<Tile>> {
        self.state.lock().tiles.get(slot)?.clone()
    }

    /// Cancel the in-flight refresh cycle, if any.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        state.cancel.cancel();
        if state.cycle == CycleState::Running {
            state.cycle = CycleState::Cancelled;
        }
    }

    /// Refresh the grid around a new center coordinate.
    ///
    /// Cancels any cycle still running (its in-flight tile fetch finishes
    /// but the result is discarded), then visits the nine neighbourhood
    /// slots sequentially in the heading's visiting order. Slot failures
    /// are logged and never abort sibling slots. The completion hooks fire
    /// only if all nine slots were visited without cancellation.
    pub async fn set_center<R, S>(&self, relay: &R, source: &S, x: i32, y: i32, heading: f64)
    where
        R: RelayClient,
        S: VectorSource,
    {
        let (token, cycle_id) = {
            let mut state = self.state.lock();
            state.cancel.cancel();
            state.cycle_id += 1;
            let token = CancellationToken::new();
            state.cancel = token.clone();
            state.center = TileCoord::new(x, y);
            state.cycle = CycleState::Running;
            state.tiles = Default::default();
            (token, state.cycle_id)
        };

        tracing::debug!(x, y, heading, "grid refresh started");

        // Row-major slots 0..8 around the center, top-left first
        let mut requests: [TileRequest; 9] = std::array::from_fn(|slot| {
            let dx = (slot % 3) as i32 - 1;
            let dy = (slot / 3) as i32 - 1;
            TileRequest::new(TileCoord::new(x + dx, y + dy), slot)
        });

        for slot in visiting_order(heading) {
            if token.is_cancelled() {
                tracing::debug!(x, y, "grid refresh superseded");
                return;
            }

            match requests[slot]
                .fetch(&self.cache, relay, source, &self.config)
                .await
            {
                Ok(tile) => {
                    if token.is_cancelled() {
                        // Result of the in-flight fetch is discarded
                        tracing::debug!(x, y, slot, "grid refresh superseded mid-fetch");
                        return;
                    }
                    {
                        let mut state = self.state.lock();
                        if state.cycle_id == cycle_id {
                            state.tiles[slot] = Some(Arc::clone(&tile));
                        }
                    }
                    for hook in self.load_hooks.lock().iter() {
                        hook(slot, &tile, x, y);
                    }
                }
                Err(e) => {
                    tracing::warn!(slot, error = %e, "grid slot failed, continuing");
                }
            }
        }

        if token.is_cancelled() {
            return;
        }
        {
            let mut state = self.state.lock();
            if state.cycle_id != cycle_id {
                return;
            }
            state.cycle = CycleState::Completed;
        }
        tracing::debug!(x, y, "grid refresh completed");
        for hook in self.complete_hooks.lock().iter() {
            hook();
        }
    }
}
