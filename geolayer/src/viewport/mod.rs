//! Viewport tracking for the display loop.
//!
//! The transmitter feed updates a target location; every display frame the
//! viewport eases the shown position toward it, derives the heading from
//! the movement delta, and reports when the position crossed into a new
//! tile, which is the trigger for a grid refresh.

use crate::coord::{tile_of, TileCoord};
use crate::grid::normalize_heading;

/// Smallest per-frame movement (degrees, scaled by the smoothing step)
/// that updates the heading; jitter below this keeps the last heading.
const HEADING_EPSILON: f64 = 0.000_001;

/// A tile-coordinate change detected by [`Viewport::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportChange {
    /// The tile the viewport moved into.
    pub tile: TileCoord,
    /// Current heading in degrees, `[0, 360)`.
    pub heading: f64,
}

/// Smoothed viewport position and heading.
pub struct Viewport {
    zoom: u8,
    latitude: f64,
    longitude: f64,
    target_latitude: f64,
    target_longitude: f64,
    last_latitude: f64,
    last_longitude: f64,
    heading: f64,
    tile: Option<TileCoord>,
}

impl Viewport {
    /// Create a viewport at an initial position.
    pub fn new(zoom: u8, latitude: f64, longitude: f64) -> Self {
        Self {
            zoom,
            latitude,
            longitude,
            target_latitude: latitude,
            target_longitude: longitude,
            last_latitude: latitude,
            last_longitude: longitude,
            heading: 0.0,
            tile: None,
        }
    }

    /// Feed a new transmitted location; the shown position eases toward it.
    pub fn set_location(&mut self, latitude: f64, longitude: f64) {
        self.target_latitude = latitude;
        self.target_longitude = longitude;
    }

    /// Current smoothed position `(latitude, longitude)`.
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Current heading in degrees, `[0, 360)`.
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// Tile the viewport currently occupies, if it is inside the
    /// projection's valid range.
    pub fn tile(&self) -> Option<TileCoord> {
        self.tile
    }

    /// Advance one display frame.
    ///
    /// `dt` is the time since the previous frame in seconds; the smoothing
    /// step is clamped so a stalled frame cannot teleport the position.
    /// Returns the new tile when the position crossed a tile boundary.
    pub fn update(&mut self, dt: f64) -> Option<ViewportChange> {
        let t = dt.clamp(0.001, 0.2);

        self.latitude = self.latitude * (1.0 - t) + self.target_latitude * t;
        self.longitude = self.longitude * (1.0 - t) + self.target_longitude * t;

        let d_lat = self.latitude - self.last_latitude;
        let d_lon = self.longitude - self.last_longitude;
        if d_lat.abs() > HEADING_EPSILON * t || d_lon.abs() > HEADING_EPSILON * t {
            let len = (d_lat * d_lat + d_lon * d_lon).sqrt();
            self.heading = normalize_heading((d_lon / len).atan2(d_lat / len).to_degrees());
        }

        self.last_latitude = self.latitude;
        self.last_longitude = self.longitude;

        let tile = tile_of(self.latitude, self.longitude, self.zoom).ok()?;
        if self.tile != Some(tile) {
            self.tile = Some(tile);
            return Some(ViewportChange {
                tile,
                heading: self.heading,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{bounds_of, tile_of};

    const ZOOM: u8 = 15;
    const LAT: f64 = 46.056946;
    const LON: f64 = 14.505751;

    /// Run updates until the easing has effectively converged.
    fn settle(viewport: &mut Viewport) -> Option<ViewportChange> {
        let mut last = None;
        for _ in 0..200 {
            if let Some(change) = viewport.update(0.1) {
                last = Some(change);
            }
        }
        last
    }

    #[test]
    fn test_first_update_reports_initial_tile() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        let change = viewport.update(0.016).expect("initial tile change");
        assert_eq!(change.tile, tile_of(LAT, LON, ZOOM).unwrap());
    }

    #[test]
    fn test_no_change_while_stationary() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        viewport.update(0.016);
        for _ in 0..10 {
            assert!(viewport.update(0.016).is_none());
        }
    }

    #[test]
    fn test_eases_toward_target() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        viewport.update(0.016);
        viewport.set_location(LAT + 0.01, LON);

        viewport.update(0.1);
        let (lat, _) = viewport.position();
        assert!(lat > LAT && lat < LAT + 0.01, "position moves partway");

        settle(&mut viewport);
        let (lat, _) = viewport.position();
        assert!((lat - (LAT + 0.01)).abs() < 1e-4, "position converges");
    }

    #[test]
    fn test_crossing_tile_boundary_reports_change() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        let initial = viewport.update(0.016).unwrap().tile;

        // Jump two tile-widths east
        let bounds = bounds_of(initial, ZOOM);
        let width = bounds.max_lon - bounds.min_lon;
        viewport.set_location(LAT, LON + 2.0 * width);

        let change = settle(&mut viewport).expect("tile change");
        assert!(change.tile.x > initial.x);
        assert_eq!(viewport.tile(), Some(change.tile));
    }

    #[test]
    fn test_heading_east_when_moving_east() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        viewport.update(0.016);
        viewport.set_location(LAT, LON + 0.01);
        settle(&mut viewport);

        assert!(
            (viewport.heading() - 90.0).abs() < 1.0,
            "heading {} should be east",
            viewport.heading()
        );
    }

    #[test]
    fn test_heading_north_when_moving_north() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        viewport.update(0.016);
        viewport.set_location(LAT + 0.01, LON);
        settle(&mut viewport);

        let heading = viewport.heading();
        assert!(
            heading < 1.0 || heading > 359.0,
            "heading {heading} should be north"
        );
    }

    #[test]
    fn test_heading_kept_when_stationary() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        viewport.update(0.016);
        viewport.set_location(LAT, LON + 0.01);
        settle(&mut viewport);
        let heading = viewport.heading();

        // Movement stopped; tiny residual easing must not reset heading
        for _ in 0..50 {
            viewport.update(0.016);
        }
        assert!((viewport.heading() - heading).abs() < 5.0);
    }

    #[test]
    fn test_dt_clamped() {
        let mut viewport = Viewport::new(ZOOM, LAT, LON);
        viewport.update(0.016);
        viewport.set_location(LAT + 1.0, LON);

        // A huge frame gap still only moves 20% of the way
        viewport.update(10.0);
        let (lat, _) = viewport.position();
        assert!(lat < LAT + 0.21);
    }
}
