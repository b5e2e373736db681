//! INI config file loading.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::Ini;

use super::settings::ConfigFile;
use super::ConfigError;

/// Default config file location under the user's config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("geolayer").join("config.ini"))
}

/// Load configuration from an INI file.
///
/// Missing sections and keys fall back to their defaults; present keys
/// must parse.
pub fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
    let ini = Ini::load_from_file(path).map_err(|e| match e {
        ini::Error::Io(io) => ConfigError::Io(io),
        ini::Error::Parse(parse) => ConfigError::Parse(parse.to_string()),
    })?;

    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("map")) {
        read(section, "zoom", &mut config.map.zoom)?;
        read(section, "tile_size_px", &mut config.map.tile_size_px)?;
    }
    if let Some(section) = ini.section(Some("cache")) {
        read(section, "capacity", &mut config.cache.capacity)?;
    }
    if let Some(section) = ini.section(Some("relay")) {
        read_string(section, "url", &mut config.relay.url);
    }
    if let Some(section) = ini.section(Some("source")) {
        read_string(section, "endpoint", &mut config.source.endpoint);
        read(section, "timeout", &mut config.source.timeout_secs)?;
    }
    if let Some(section) = ini.section(Some("logging")) {
        read_string(section, "filter", &mut config.logging.filter);
    }

    Ok(config)
}

/// Load from an explicit path, or from the default location, or fall back
/// to the built-in defaults when no file exists.
pub fn load_or_default(path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    match path {
        Some(path) => load(path),
        None => match default_config_path() {
            Some(path) if path.exists() => load(&path),
            _ => Ok(ConfigFile::default()),
        },
    }
}

fn read<T: FromStr>(
    section: &ini::Properties,
    key: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(raw) = section.get(key) {
        *target = raw.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        })?;
    }
    Ok(())
}

fn read_string(section: &ini::Properties, key: &str, target: &mut String) {
    if let Some(raw) = section.get(key) {
        *target = raw.to_string();
    }
}
