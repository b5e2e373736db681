//! The unit of map data: one tile of styled path geometry.
//!
//! A tile owns its paths grouped by draw order and merged by semantic kind,
//! and knows how to (a) deserialise from a cache payload, (b) download and
//! rasterise raw feature data for its bounding box, (c) serialise back to a
//! payload, and (d) render itself into a drawing target at a grid slot
//! offset. Once downloaded or deserialised a tile is immutable.

mod geometry;
mod payload;

pub use geometry::PathData;
pub use payload::{PathEntry, TilePayload};

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

use crate::coord::{bounds_of, TileCoord};
use crate::render::RenderTarget;
use crate::source::{Element, FilterExpression, SourceError, VectorSource};
use crate::style::{classify, PathStyle};

/// Errors from building a tile.
#[derive(Debug, Error)]
pub enum TileError {
    /// The data source download or parse failed; the tile stays empty and
    /// must not be cached or rendered.
    #[error("map data download failed: {0}")]
    Download(#[from] SourceError),
}

/// Static parameters of the tile pipeline, injected instead of ambient
/// globals: zoom level, rendered tile size in pixels, and the data source
/// filter expression.
#[derive(Debug, Clone)]
pub struct TileConfig {
    pub zoom: u8,
    pub tile_px: f64,
    pub filter: FilterExpression,
}

impl TileConfig {
    pub fn new(zoom: u8, tile_px: f64, filter: FilterExpression) -> Self {
        Self {
            zoom,
            tile_px,
            filter,
        }
    }
}

/// One styled path within a tile.
///
/// `kind` groups same-styled features during construction; it is not part
/// of the cache payload (styles and path data are).
#[derive(Debug, Clone, PartialEq)]
pub struct StyledPath {
    pub kind: String,
    pub style: PathStyle,
    pub path: PathData,
}

/// A tile of the minimap: styled paths grouped by draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    coord: TileCoord,
    layers: BTreeMap<u32, Vec<StyledPath>>,
}

impl Tile {
    /// Create an empty tile for a coordinate.
    pub fn new(coord: TileCoord) -> Self {
        Self {
            coord,
            layers: BTreeMap::new(),
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Cache key of this tile, `"{x}/{y}"`.
    pub fn key(&self) -> String {
        self.coord.key()
    }

    /// Whether the tile holds no paths. An empty tile is still valid; a
    /// successfully downloaded region can simply contain nothing drawable.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Number of styled paths across all draw orders.
    pub fn path_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Reconstruct a tile from a cache payload.
    ///
    /// Payload keys that are not valid draw orders are skipped.
    pub fn from_cache(coord: TileCoord, payload: TilePayload) -> Self {
        let mut tile = Self::new(coord);
        for (order, entries) in payload {
            let Ok(order) = order.parse::<u32>() else {
                tracing::warn!(tile = %coord, order = %order, "payload with non-numeric draw order");
                continue;
            };
            let paths = tile.layers.entry(order).or_default();
            for entry in entries {
                paths.push(StyledPath {
                    kind: String::new(),
                    style: entry.s,
                    path: PathData::from_raw(entry.d),
                });
            }
        }
        tile
    }

    /// Serialise this tile to its cache payload.
    pub fn to_cache(&self) -> TilePayload {
        self.layers
            .iter()
            .map(|(order, paths)| {
                let entries = paths
                    .iter()
                    .map(|p| PathEntry {
                        s: p.style.clone(),
                        d: p.path.as_str().to_string(),
                    })
                    .collect();
                (order.to_string(), entries)
            })
            .collect()
    }

    /// Download and rasterise this tile's features from the data source.
    ///
    /// Issues one query for the tile's bounding box, classifies each way
    /// feature, and projects matched geometry linearly into `[0, tile_px]`
    /// pixel space. Paths of the same draw order and kind are merged into a
    /// single multi-path geometry.
    ///
    /// # Errors
    ///
    /// Returns `TileError::Download` on transport or parse failure, leaving
    /// the tile empty. A failed tile must be discarded, never cached.
    pub async fn download<S: VectorSource>(
        &mut self,
        source: &S,
        config: &TileConfig,
    ) -> Result<(), TileError> {
        let bounds = bounds_of(self.coord, config.zoom);
        let elements = source.fetch(&bounds, &config.filter).await?;

        // Node id → coordinate lookup
        let mut nodes: HashMap<u64, (f64, f64)> = HashMap::new();
        for element in &elements {
            if let Element::Node { id, lat, lon } = element {
                nodes.insert(*id, (*lat, *lon));
            }
        }

        for element in &elements {
            let Element::Way {
                id,
                nodes: node_ids,
                tags,
            } = element
            else {
                continue;
            };

            let Some(class) = classify(tags) else {
                continue;
            };

            let mut path = PathData::new();
            for node_id in node_ids {
                let Some((lat, lon)) = nodes.get(node_id) else {
                    // The recursion clause guarantees referenced nodes; a
                    // truncated response is survivable per-way
                    tracing::debug!(way = id, node = node_id, "way references missing node");
                    continue;
                };
                path.push_point(
                    map_range(*lat, bounds.min_lat, bounds.max_lat, 0.0, config.tile_px),
                    map_range(*lon, bounds.min_lon, bounds.max_lon, 0.0, config.tile_px),
                );
            }
            if path.is_empty() {
                continue;
            }
            if class.closed {
                path.close();
            }

            self.append(class.order, class.kind, class.style, path);
        }

        tracing::debug!(tile = %self.coord, paths = self.path_count(), "tile built");
        Ok(())
    }

    /// Append a path, merging into an existing same-order same-kind bucket
    /// so many same-styled ways become one draw call.
    fn append(&mut self, order: u32, kind: &str, style: PathStyle, path: PathData) {
        let paths = self.layers.entry(order).or_default();
        if let Some(existing) = paths.iter_mut().find(|p| p.kind == kind) {
            existing.path.append(&path);
        } else {
            paths.push(StyledPath {
                kind: kind.to_string(),
                style,
                path,
            });
        }
    }

    /// Render this tile into a drawing target at a 3×3 grid slot.
    ///
    /// Slot indices are row-major from the top-left; the resulting pixel
    /// offset is `((col−1)·px, −(row−1)·px)`. Paths are emitted in
    /// ascending draw order.
    pub fn render(&self, target: &mut dyn RenderTarget, slot: usize, tile_px: f64) {
        let row = (slot / 3) as f64;
        let col = (slot % 3) as f64;
        let offset = ((col - 1.0) * tile_px, -(row - 1.0) * tile_px);

        for (order, paths) in &self.layers {
            for styled in paths {
                target.draw_path(*order, &styled.style, &styled.path, offset);
            }
        }
    }
}

/// Linear projection of `value` from one range onto another.
fn map_range(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    (value - from_min) / (from_max - from_min) * (to_max - to_min) + to_min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::RecordingTarget;
    use crate::source::tests::MockVectorSource;
    use crate::source::default_filter_spec;

    fn test_config() -> TileConfig {
        TileConfig::new(15, 200.0, default_filter_spec().compose())
    }

    fn way(id: u64, node_ids: &[u64], tags: &[(&str, &str)]) -> Element {
        let json = serde_json::json!({
            "type": "way",
            "id": id,
            "nodes": node_ids,
            "tags": tags.iter().cloned().collect::<HashMap<_, _>>(),
        });
        serde_json::from_value(json).unwrap()
    }

    fn node(id: u64, lat: f64, lon: f64) -> Element {
        serde_json::from_value(serde_json::json!({
            "type": "node", "id": id, "lat": lat, "lon": lon,
        }))
        .unwrap()
    }

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 200.0), 100.0);
        assert_eq!(map_range(0.0, 0.0, 10.0, 0.0, 200.0), 0.0);
        assert_eq!(map_range(10.0, 0.0, 10.0, 0.0, 200.0), 200.0);
        // Ranges can invert
        assert_eq!(map_range(2.0, 0.0, 10.0, 10.0, 0.0), 8.0);
    }

    #[test]
    fn test_new_tile_is_empty() {
        let tile = Tile::new(TileCoord::new(1, 2));
        assert!(tile.is_empty());
        assert_eq!(tile.key(), "1/2");
        assert_eq!(tile.path_count(), 0);
    }

    #[test]
    fn test_cache_roundtrip_identical_payload() {
        let mut payload = TilePayload::new();
        payload.insert(
            "0".to_string(),
            vec![
                PathEntry {
                    s: PathStyle {
                        fill: Some("#37672d".to_string()),
                        ..PathStyle::default()
                    },
                    d: "M0 0 L5 5 ZM7 7 L9 9 Z".to_string(),
                },
                PathEntry {
                    s: PathStyle {
                        fill: Some("#738aaf".to_string()),
                        ..PathStyle::default()
                    },
                    d: "M1 1 L2 2 Z".to_string(),
                },
            ],
        );
        payload.insert(
            "300".to_string(),
            vec![PathEntry {
                s: PathStyle {
                    stroke: Some("#010101".to_string()),
                    stroke_width: Some("12".to_string()),
                    ..PathStyle::default()
                },
                d: "M10 20 L30 40 ".to_string(),
            }],
        );

        let tile = Tile::from_cache(TileCoord::new(3, 4), payload.clone());
        assert_eq!(tile.to_cache(), payload);

        // And the JSON text round-trips too
        let json = serde_json::to_string(&payload).unwrap();
        let reparsed: TilePayload = serde_json::from_str(&json).unwrap();
        let tile2 = Tile::from_cache(TileCoord::new(3, 4), reparsed);
        assert_eq!(serde_json::to_string(&tile2.to_cache()).unwrap(), json);
    }

    #[test]
    fn test_from_cache_preserves_draw_orders() {
        let mut payload = TilePayload::new();
        for order in ["400", "0", "100"] {
            payload.insert(
                order.to_string(),
                vec![PathEntry {
                    s: PathStyle::default(),
                    d: "M0 0 ".to_string(),
                }],
            );
        }
        let tile = Tile::from_cache(TileCoord::new(0, 0), payload);
        assert_eq!(tile.path_count(), 3);

        let orders: Vec<String> = tile.to_cache().keys().cloned().collect();
        assert_eq!(orders, vec!["0", "100", "400"]);
    }

    #[test]
    fn test_from_cache_skips_invalid_order_key() {
        let mut payload = TilePayload::new();
        payload.insert(
            "garbage".to_string(),
            vec![PathEntry {
                s: PathStyle::default(),
                d: "M0 0 ".to_string(),
            }],
        );
        payload.insert(
            "100".to_string(),
            vec![PathEntry {
                s: PathStyle::default(),
                d: "M1 1 ".to_string(),
            }],
        );

        let tile = Tile::from_cache(TileCoord::new(0, 0), payload);
        assert_eq!(tile.path_count(), 1);
    }

    #[tokio::test]
    async fn test_download_single_motorway() {
        let coord = TileCoord::new(17704, 11650);
        let config = test_config();
        let bounds = bounds_of(coord, config.zoom);

        // Two nodes at opposite bounds corners project to 0 and tile_px
        let source = MockVectorSource::with_elements(vec![
            node(1, bounds.min_lat, bounds.min_lon),
            node(2, bounds.max_lat, bounds.max_lon),
            way(10, &[1, 2], &[("highway", "motorway")]),
        ]);

        let mut tile = Tile::new(coord);
        tile.download(&source, &config).await.unwrap();

        assert_eq!(tile.path_count(), 1);
        let payload = tile.to_cache();
        let entries = payload.get("300").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].s.stroke_width.as_deref(), Some("12"));
        assert_eq!(entries[0].d, "M0 0 L200 200 ");
    }

    #[tokio::test]
    async fn test_download_merges_same_kind_paths() {
        let coord = TileCoord::new(100, 100);
        let config = test_config();
        let bounds = bounds_of(coord, config.zoom);

        let source = MockVectorSource::with_elements(vec![
            node(1, bounds.min_lat, bounds.min_lon),
            node(2, bounds.max_lat, bounds.max_lon),
            way(10, &[1, 2], &[("highway", "motorway")]),
            way(11, &[2, 1], &[("highway", "motorway_link")]),
            way(12, &[1, 2], &[("highway", "residential")]),
        ]);

        let mut tile = Tile::new(coord);
        tile.download(&source, &config).await.unwrap();

        // motorway and motorway_link merge into one path, residential stays
        let payload = tile.to_cache();
        let entries = payload.get("300").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].d, "M0 0 L200 200 M200 200 L0 0 ");
        assert_eq!(entries[1].s.stroke_width.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_download_closed_ring_gets_z() {
        let coord = TileCoord::new(100, 100);
        let config = test_config();
        let bounds = bounds_of(coord, config.zoom);

        let source = MockVectorSource::with_elements(vec![
            node(1, bounds.min_lat, bounds.min_lon),
            node(2, bounds.max_lat, bounds.min_lon),
            node(3, bounds.max_lat, bounds.max_lon),
            way(10, &[1, 2, 3, 1], &[("building", "yes")]),
        ]);

        let mut tile = Tile::new(coord);
        tile.download(&source, &config).await.unwrap();

        let payload = tile.to_cache();
        let entries = payload.get("100").unwrap();
        assert!(entries[0].d.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_download_drops_unclassified_ways() {
        let coord = TileCoord::new(100, 100);
        let config = test_config();
        let bounds = bounds_of(coord, config.zoom);

        let source = MockVectorSource::with_elements(vec![
            node(1, bounds.min_lat, bounds.min_lon),
            node(2, bounds.max_lat, bounds.max_lon),
            way(10, &[1, 2], &[("highway", "footway")]),
            way(11, &[1, 2], &[("leisure", "park")]),
        ]);

        let mut tile = Tile::new(coord);
        tile.download(&source, &config).await.unwrap();
        assert!(tile.is_empty());
    }

    #[tokio::test]
    async fn test_download_failure_leaves_tile_empty() {
        let source = MockVectorSource::failing();
        let mut tile = Tile::new(TileCoord::new(1, 1));

        let result = tile.download(&source, &test_config()).await;
        assert!(matches!(result, Err(TileError::Download(_))));
        assert!(tile.is_empty());
    }

    #[tokio::test]
    async fn test_download_skips_missing_node_reference() {
        let coord = TileCoord::new(100, 100);
        let config = test_config();
        let bounds = bounds_of(coord, config.zoom);

        let source = MockVectorSource::with_elements(vec![
            node(1, bounds.min_lat, bounds.min_lon),
            node(2, bounds.max_lat, bounds.max_lon),
            way(10, &[1, 999, 2], &[("highway", "motorway")]),
        ]);

        let mut tile = Tile::new(coord);
        tile.download(&source, &config).await.unwrap();

        let payload = tile.to_cache();
        assert_eq!(payload.get("300").unwrap()[0].d, "M0 0 L200 200 ");
    }

    #[test]
    fn test_render_offsets_by_slot() {
        let mut payload = TilePayload::new();
        payload.insert(
            "300".to_string(),
            vec![PathEntry {
                s: PathStyle::default(),
                d: "M0 0 L1 1 ".to_string(),
            }],
        );
        let tile = Tile::from_cache(TileCoord::new(0, 0), payload);

        let cases = [
            (0, (-200.0, 200.0)),
            (1, (0.0, 200.0)),
            (2, (200.0, 200.0)),
            (3, (-200.0, 0.0)),
            (4, (0.0, 0.0)),
            (5, (200.0, 0.0)),
            (6, (-200.0, -200.0)),
            (7, (0.0, -200.0)),
            (8, (200.0, -200.0)),
        ];
        for (slot, expected) in cases {
            let mut target = RecordingTarget::default();
            tile.render(&mut target, slot, 200.0);
            assert_eq!(target.calls.len(), 1);
            assert_eq!(target.calls[0].offset, expected, "slot {slot}");
        }
    }

    #[test]
    fn test_render_ascending_draw_order() {
        let mut payload = TilePayload::new();
        for order in ["400", "0", "300", "100"] {
            payload.insert(
                order.to_string(),
                vec![PathEntry {
                    s: PathStyle::default(),
                    d: "M0 0 ".to_string(),
                }],
            );
        }
        let tile = Tile::from_cache(TileCoord::new(0, 0), payload);

        let mut target = RecordingTarget::default();
        tile.render(&mut target, 4, 200.0);

        let orders: Vec<u32> = target.calls.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 100, 300, 400]);
    }
}
