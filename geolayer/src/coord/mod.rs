//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and the Web Mercator tile grid the minimap is built on, plus the
//! per-tile geographic bounding box used to query the vector data source.
//!
//! All functions are pure in the configured zoom level. Inputs are not
//! wrapped automatically; callers normalise longitude and heading into
//! valid ranges before converting.

mod types;

pub use types::{
    CoordError, GeoBounds, TileCoord, EARTH_CIRCUMFERENCE, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT,
    MIN_LON, TILE_PIXELS,
};

use std::f64::consts::PI;

/// Continuous tile-space position of a longitude.
///
/// The integer part is the tile column, the fraction the position within it.
#[inline]
pub fn longitude_on_tile(lon: f64, zoom: u8) -> f64 {
    (lon + 180.0) / 360.0 * 2.0_f64.powi(zoom as i32)
}

/// Continuous tile-space position of a latitude.
///
/// Uses the forward Mercator transform; row 0 is the northern edge of the
/// projection.
#[inline]
pub fn latitude_on_tile(lat: f64, zoom: u8) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * 2.0_f64.powi(zoom as i32)
}

/// Tile column containing a longitude (floor of the continuous position).
#[inline]
pub fn longitude_to_tile_x(lon: f64, zoom: u8) -> i32 {
    longitude_on_tile(lon, zoom).floor() as i32
}

/// Tile row containing a latitude (floor of the continuous position).
#[inline]
pub fn latitude_to_tile_y(lat: f64, zoom: u8) -> i32 {
    latitude_on_tile(lat, zoom).floor() as i32
}

/// Longitude of a continuous tile-space column position.
///
/// For an integer column this is the tile's western edge.
#[inline]
pub fn tile_x_to_longitude(x: f64, zoom: u8) -> f64 {
    x / 2.0_f64.powi(zoom as i32) * 360.0 - 180.0
}

/// Latitude of a continuous tile-space row position.
///
/// For an integer row this is the tile's northern edge. Inverse Mercator:
/// `atan(sinh(π − 2πy / 2^zoom))` in degrees.
#[inline]
pub fn tile_y_to_latitude(y: f64, zoom: u8) -> f64 {
    let n = PI - 2.0 * PI * y / 2.0_f64.powi(zoom as i32);
    (0.5 * (n.exp() - (-n).exp())).atan().to_degrees()
}

/// Converts a geographic position to the tile containing it.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, within the Web Mercator range
/// * `lon` - Longitude in degrees (-180.0 to 180.0)
/// * `zoom` - Zoom level (0 to 18)
///
/// # Errors
///
/// Returns a `CoordError` if any input is outside its valid range.
pub fn tile_of(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    Ok(TileCoord::new(
        longitude_to_tile_x(lon, zoom),
        latitude_to_tile_y(lat, zoom),
    ))
}

/// Geographic bounding box of one tile cell.
///
/// The longitude half-width is derived from the Earth circumference and the
/// 256-pixel Mercator tile: `meters_per_pixel = C / 2^(zoom+8)`, so half a
/// tile spans `128 · meters_per_pixel · 360 / C` degrees either side of the
/// cell centre. The latitude span is the cell's northern and southern edges,
/// clamped to the projection's valid range.
pub fn bounds_of(tile: TileCoord, zoom: u8) -> GeoBounds {
    let meters_per_pixel = EARTH_CIRCUMFERENCE / 2.0_f64.powi(zoom as i32 + 8);
    let half_width_deg = TILE_PIXELS / 2.0 * meters_per_pixel * 360.0 / EARTH_CIRCUMFERENCE;

    let center_lon = tile_x_to_longitude(tile.x as f64 + 0.5, zoom);

    GeoBounds {
        min_lat: tile_y_to_latitude(tile.y as f64 + 1.0, zoom).max(MIN_LAT),
        min_lon: center_lon - half_width_deg,
        max_lat: tile_y_to_latitude(tile.y as f64, zoom).min(MAX_LAT),
        max_lon: center_lon + half_width_deg,
    }
}
