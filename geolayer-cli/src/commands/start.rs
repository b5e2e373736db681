//! `geolayer start`: connect to the relay and stream the minimap.
//!
//! Headless counterpart of the browser display: consumes the location
//! feed, drives the viewport and the 3×3 tile grid, and writes each
//! completed neighbourhood as an SVG frame.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;

use geolayer::cache::TileCache;
use geolayer::config::ConfigFile;
use geolayer::grid::{CycleState, TileGrid};
use geolayer::relay::{Message, WebSocketRelay};
use geolayer::render::SvgDocument;
use geolayer::source::OverpassSource;
use geolayer::viewport::Viewport;

use crate::error::CliError;

/// Display refresh period; tile-change detection runs at this cadence.
const FRAME_PERIOD: Duration = Duration::from_millis(100);

/// Starting position shown until the first location packet arrives.
const INITIAL_POSITION: (f64, f64) = (46.056946, 14.505751);

pub async fn run(config: ConfigFile, out: Option<PathBuf>) -> Result<(), CliError> {
    let relay = Arc::new(WebSocketRelay::connect(&config.relay.url).await?);
    let source = Arc::new(OverpassSource::with_timeout(
        config.source.endpoint.clone(),
        Duration::from_secs(config.source.timeout_secs),
    )?);

    let cache = Arc::new(TileCache::new(config.cache.capacity));
    let grid = Arc::new(TileGrid::new(Arc::new(config.tile_config()), cache));

    grid.on_load(|slot, tile, x, y| {
        tracing::debug!(slot, tile = %tile.coord(), center_x = x, center_y = y, "tile loaded");
    });
    grid.on_complete(|| tracing::debug!("grid refresh complete"));

    let mut viewport = Viewport::new(
        config.map.zoom,
        INITIAL_POSITION.0,
        INITIAL_POSITION.1,
    );

    let mut feed = relay.feed();
    let mut frames = tokio::time::interval(FRAME_PERIOD);
    let mut last_frame = Instant::now();

    tracing::info!(relay = %config.relay.url, "minimap streaming started");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
            message = feed.recv() => match message {
                Ok(Message::Location { latitude, longitude, .. }) => {
                    viewport.set_location(latitude, longitude);
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "location feed lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::error!("relay connection lost");
                    break;
                }
            },
            _ = frames.tick() => {
                let dt = last_frame.elapsed().as_secs_f64();
                last_frame = Instant::now();

                if let Some(change) = viewport.update(dt) {
                    tracing::info!(tile = %change.tile, heading = change.heading, "viewport entered new tile");
                    spawn_refresh(
                        Arc::clone(&grid),
                        Arc::clone(&relay),
                        Arc::clone(&source),
                        change.tile.x,
                        change.tile.y,
                        change.heading,
                        config.map.tile_size_px,
                        out.clone(),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Run one grid refresh in the background; a newer refresh supersedes it.
#[allow(clippy::too_many_arguments)]
fn spawn_refresh(
    grid: Arc<TileGrid>,
    relay: Arc<WebSocketRelay>,
    source: Arc<OverpassSource>,
    x: i32,
    y: i32,
    heading: f64,
    tile_px: f64,
    out: Option<PathBuf>,
) {
    tokio::spawn(async move {
        grid.set_center(&*relay, &*source, x, y, heading).await;

        // A superseded or cancelled cycle renders nothing
        if grid.cycle_state() != CycleState::Completed {
            return;
        }

        let mut document = SvgDocument::new(tile_px);
        for slot in 0..9 {
            if let Some(tile) = grid.tile(slot) {
                tile.render(&mut document, slot, tile_px);
            }
        }
        let svg = document.finish();

        match out {
            Some(path) => match std::fs::write(&path, &svg) {
                Ok(()) => tracing::info!(path = %path.display(), bytes = svg.len(), "frame written"),
                Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to write frame"),
            },
            None => tracing::info!(bytes = svg.len(), "frame rendered"),
        }
    });
}
