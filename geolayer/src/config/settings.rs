//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file. These are
//! pure data types; parsing lives in the file loader.

use super::defaults;

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Map projection and tile geometry.
    pub map: MapSettings,
    /// In-memory tile cache.
    pub cache: CacheSettings,
    /// Relay connection.
    pub relay: RelaySettings,
    /// External vector data source.
    pub source: SourceSettings,
    /// Logging.
    pub logging: LoggingSettings,
}

/// `[map]` section: projection and tile geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Web Mercator zoom level.
    pub zoom: u8,
    /// Rendered tile size in pixels.
    pub tile_size_px: f64,
}

/// `[cache]` section: in-memory tile cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Maximum number of cached tiles.
    pub capacity: usize,
}

/// `[relay]` section: relay connection.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaySettings {
    /// Websocket URL of the relay.
    pub url: String,
}

/// `[source]` section: external vector data source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// HTTP endpoint of the Overpass-compatible API.
    pub endpoint: String,
    /// Round-trip timeout in seconds.
    pub timeout_secs: u64,
}

/// `[logging]` section: log output.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Tracing filter directive, e.g. `info` or `geolayer=debug`.
    pub filter: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: defaults::DEFAULT_ZOOM,
            tile_size_px: defaults::DEFAULT_TILE_SIZE_PX,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: defaults::DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_RELAY_URL.to_string(),
        }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_SOURCE_ENDPOINT.to_string(),
            timeout_secs: defaults::DEFAULT_SOURCE_TIMEOUT_SECS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: defaults::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            map: MapSettings::default(),
            cache: CacheSettings::default(),
            relay: RelaySettings::default(),
            source: SourceSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
