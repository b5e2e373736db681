//! GeoLayer - Live geolocation minimap tiles, streamed on demand
//!
//! This library turns a moving latitude/longitude into a rendered map
//! neighbourhood: projection onto the Web Mercator tile grid, per-tile
//! vector data download and rasterisation into styled paths, a bounded
//! in-memory LRU of built tiles, and a heading-aware, cancellable prefetch
//! of the 3×3 tiles around the viewport, brokered through a relay
//! connection with a server-side tile cache.
//!
//! # Pipeline
//!
//! ```text
//! location feed ─► Viewport ─► TileGrid ─► TileRequest ─► TileCache
//!                                │             │
//!                                │             ├─► RelayClient (cached tiles)
//!                                │             └─► VectorSource (live download)
//!                                └─► RenderTarget (styled paths, draw order)
//! ```

pub mod cache;
pub mod config;
pub mod coord;
pub mod grid;
pub mod relay;
pub mod render;
pub mod source;
pub mod style;
pub mod telemetry;
pub mod tile;
pub mod viewport;
