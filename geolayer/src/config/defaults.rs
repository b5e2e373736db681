//! Default configuration values.

/// Web Mercator zoom level of the minimap tiles.
pub const DEFAULT_ZOOM: u8 = 15;

/// Rendered tile size in pixels.
pub const DEFAULT_TILE_SIZE_PX: f64 = 200.0;

/// Number of tiles kept in the in-memory cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Relay websocket URL.
pub const DEFAULT_RELAY_URL: &str = "ws://localhost:3000";

/// Vector data source endpoint.
pub const DEFAULT_SOURCE_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Data source round-trip timeout in seconds.
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";
