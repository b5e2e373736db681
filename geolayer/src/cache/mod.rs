//! In-memory tile cache.
//!
//! A fixed-capacity, least-recently-used store for constructed tiles,
//! independent of the transport. Both lookups and insertions refresh an
//! entry's recency; exceeding capacity silently evicts from the
//! least-recent end.

mod memory;

pub use memory::{CacheStats, TileCache};
