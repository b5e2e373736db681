//! `geolayer config`: print the effective configuration.

use geolayer::config::{default_config_path, ConfigFile};

pub fn run(config: &ConfigFile) {
    if let Some(path) = default_config_path() {
        println!("# default config path: {}", path.display());
    }
    println!("[map]");
    println!("zoom = {}", config.map.zoom);
    println!("tile_size_px = {}", config.map.tile_size_px);
    println!();
    println!("[cache]");
    println!("capacity = {}", config.cache.capacity);
    println!();
    println!("[relay]");
    println!("url = {}", config.relay.url);
    println!();
    println!("[source]");
    println!("endpoint = {}", config.source.endpoint);
    println!("timeout = {}", config.source.timeout_secs);
    println!();
    println!("[logging]");
    println!("filter = {}", config.logging.filter);
}
