//! Application configuration.
//!
//! INI-backed settings with built-in defaults: `[map]` for projection and
//! tile geometry, `[cache]` for the in-memory tile cache, `[relay]` and
//! `[source]` for the two network collaborators, `[logging]` for the
//! tracing filter.

mod defaults;
mod file;
mod settings;

pub use defaults::*;
pub use file::{default_config_path, load, load_or_default};
pub use settings::{
    CacheSettings, ConfigFile, LoggingSettings, MapSettings, RelaySettings, SourceSettings,
};

use thiserror::Error;

use crate::source::default_filter_spec;
use crate::tile::TileConfig;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid INI.
    #[error("failed to parse config file: {0}")]
    Parse(String),

    /// A key holds a value of the wrong type.
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl ConfigFile {
    /// Build the tile pipeline configuration from the map settings and the
    /// built-in filter allow-list.
    pub fn tile_config(&self) -> TileConfig {
        TileConfig::new(
            self.map.zoom,
            self.map.tile_size_px,
            default_filter_spec().compose(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_config_from_defaults() {
        let config = ConfigFile::default();
        let tile_config = config.tile_config();

        assert_eq!(tile_config.zoom, 15);
        assert_eq!(tile_config.tile_px, 200.0);
        assert!(tile_config
            .filter
            .as_str()
            .contains("way[\"highway\"=\"motorway\"];"));
    }
}
