//! Feature classification rules for the minimap.
//!
//! Maps the tag set of a vector feature to a draw order, a semantic kind,
//! a closed/open flag and a stroke/fill style. Evaluation is a strict
//! priority chain: the first tag key present wins and later rules are never
//! consulted, even if they would also match. A recognised key with an
//! unrecognised sub-value drops the feature entirely.
//!
//! The sub-value tables are data; changing the map's look means editing the
//! tables, not the chain.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Stroke/fill style of a classified feature.
///
/// Field names follow the wire payload (`fill`, `stroke`, `stroke-width`),
/// which in turn matches the relay's persisted tile files.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PathStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,

    #[serde(
        rename = "stroke-width",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stroke_width: Option<String>,
}

impl PathStyle {
    /// Fill-only style for closed polygons.
    fn fill(color: &str) -> Self {
        Self {
            fill: Some(color.to_string()),
            ..Self::default()
        }
    }

    /// Stroke-only style for open polylines.
    fn stroke(color: &str, width: u32) -> Self {
        Self {
            stroke: Some(color.to_string()),
            stroke_width: Some(width.to_string()),
            ..Self::default()
        }
    }
}

/// Result of classifying a feature's tags.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Paint order; lower paints first (underneath).
    pub order: u32,
    /// Semantic kind, used to merge same-styled paths within a tile.
    pub kind: &'static str,
    /// Whether the geometry is a closed polygon.
    pub closed: bool,
    /// Stroke/fill style.
    pub style: PathStyle,
}

/// landuse sub-value → (kind, fill color, draw order).
const LANDUSE: &[(&str, &str, &str, u32)] = &[
    ("forest", "forest", "#37672d", 0),
    ("farmland", "farmland", "#e7da8e", 0),
    ("residential", "residential", "#98989a", 1),
    ("industrial", "industrial", "#404040", 1),
    ("grass", "grass", "#788b3c", 2),
];

/// waterway sub-value → (kind, stroke width).
const WATERWAY: &[(&str, &str, u32)] = &[
    ("stream", "stream", 1),
    ("tidal_channel", "stream", 1),
    ("ditch", "stream", 1),
    ("river", "river", 2),
    ("canal", "river", 2),
];

/// railway sub-value → (kind, stroke width).
const RAILWAY: &[(&str, &str, u32)] = &[
    ("light_rail", "monorail", 1),
    ("monorail", "monorail", 1),
    ("narrow_gauge", "monorail", 1),
    ("rail", "rail", 2),
    ("tram", "rail", 2),
    ("subway", "subway", 2),
];

/// highway sub-value → (kind, stroke width).
const HIGHWAY: &[(&str, &str, u32)] = &[
    ("living_street", "living_street", 1),
    ("service", "living_street", 1),
    ("residential", "residential_street", 2),
    ("tertiary", "tertiary_street", 4),
    ("tertiary_link", "tertiary_street", 4),
    ("secondary", "secondary_street", 6),
    ("secondary_link", "secondary_street", 6),
    ("primary", "primary_street", 8),
    ("primary_link", "primary_street", 8),
    ("trunk", "trunk", 10),
    ("trunk_link", "trunk", 10),
    ("motorway", "motorway", 12),
    ("motorway_link", "motorway", 12),
];

const WATER_FILL: &str = "#738aaf";
const WATERWAY_STROKE: &str = "#738aaf";
const BUILDING_FILL: &str = "#ffffff";
const RAILWAY_STROKE: &str = "#4a0c00";
const HIGHWAY_STROKE: &str = "#010101";
const BOUNDARY_STROKE: &str = "rgba(189, 0, 0, 0.45)";

/// Classify a feature by its tags.
///
/// Returns `None` when the feature should be dropped: either no rule key is
/// present, or the matched key carries an unrecognised sub-value.
pub fn classify(tags: &HashMap<String, String>) -> Option<Classification> {
    if let Some(value) = tags.get("landuse") {
        return LANDUSE
            .iter()
            .find(|(sub, _, _, _)| sub == value)
            .map(|&(_, kind, color, order)| Classification {
                order,
                kind,
                closed: true,
                style: PathStyle::fill(color),
            });
    }

    if tags.contains_key("water") {
        return Some(Classification {
            order: 0,
            kind: "water",
            closed: true,
            style: PathStyle::fill(WATER_FILL),
        });
    }

    if let Some(value) = tags.get("waterway") {
        return WATERWAY
            .iter()
            .find(|(sub, _, _)| sub == value)
            .map(|&(_, kind, width)| Classification {
                order: 0,
                kind,
                closed: false,
                style: PathStyle::stroke(WATERWAY_STROKE, width),
            });
    }

    if tags.contains_key("building") {
        return Some(Classification {
            order: 100,
            kind: "building",
            closed: true,
            style: PathStyle::fill(BUILDING_FILL),
        });
    }

    if let Some(value) = tags.get("railway") {
        return RAILWAY
            .iter()
            .find(|(sub, _, _)| sub == value)
            .map(|&(_, kind, width)| Classification {
                order: 200,
                kind,
                closed: false,
                style: PathStyle::stroke(RAILWAY_STROKE, width),
            });
    }

    if let Some(value) = tags.get("highway") {
        return HIGHWAY
            .iter()
            .find(|(sub, _, _)| sub == value)
            .map(|&(_, kind, width)| Classification {
                order: 300,
                kind,
                closed: false,
                style: PathStyle::stroke(HIGHWAY_STROKE, width),
            });
    }

    if tags.contains_key("boundary") {
        // Only national borders are drawn
        if tags.get("admin_level").map(String::as_str) == Some("2") {
            return Some(Classification {
                order: 400,
                kind: "boundary",
                closed: false,
                style: PathStyle::stroke(BOUNDARY_STROKE, 2),
            });
        }
        return None;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_landuse_forest() {
        let c = classify(&tags(&[("landuse", "forest")])).unwrap();
        assert_eq!(c.order, 0);
        assert_eq!(c.kind, "forest");
        assert!(c.closed);
        assert_eq!(c.style.fill.as_deref(), Some("#37672d"));
        assert!(c.style.stroke.is_none());
    }

    #[test]
    fn test_landuse_orders() {
        assert_eq!(classify(&tags(&[("landuse", "farmland")])).unwrap().order, 0);
        assert_eq!(
            classify(&tags(&[("landuse", "residential")])).unwrap().order,
            1
        );
        assert_eq!(
            classify(&tags(&[("landuse", "industrial")])).unwrap().order,
            1
        );
        assert_eq!(classify(&tags(&[("landuse", "grass")])).unwrap().order, 2);
    }

    #[test]
    fn test_landuse_unknown_subvalue_dropped() {
        assert!(classify(&tags(&[("landuse", "quarry")])).is_none());
    }

    #[test]
    fn test_priority_landuse_beats_highway() {
        // First match wins: a feature tagged both ways classifies as landuse
        let c = classify(&tags(&[("landuse", "forest"), ("highway", "primary")])).unwrap();
        assert_eq!(c.order, 0);
        assert_eq!(c.kind, "forest");
        assert_eq!(c.style.fill.as_deref(), Some("#37672d"));
        assert!(c.style.stroke.is_none());
    }

    #[test]
    fn test_water_any_value() {
        let c = classify(&tags(&[("water", "lake")])).unwrap();
        assert_eq!(c.order, 0);
        assert_eq!(c.kind, "water");
        assert!(c.closed);
        assert_eq!(c.style.fill.as_deref(), Some("#738aaf"));
    }

    #[test]
    fn test_waterway_widths() {
        for sub in ["stream", "tidal_channel", "ditch"] {
            let c = classify(&tags(&[("waterway", sub)])).unwrap();
            assert_eq!(c.kind, "stream");
            assert_eq!(c.style.stroke_width.as_deref(), Some("1"));
            assert!(!c.closed);
        }
        for sub in ["river", "canal"] {
            let c = classify(&tags(&[("waterway", sub)])).unwrap();
            assert_eq!(c.kind, "river");
            assert_eq!(c.style.stroke_width.as_deref(), Some("2"));
        }
        assert!(classify(&tags(&[("waterway", "drain")])).is_none());
    }

    #[test]
    fn test_building() {
        let c = classify(&tags(&[("building", "yes")])).unwrap();
        assert_eq!(c.order, 100);
        assert!(c.closed);
        assert_eq!(c.style.fill.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_railway_widths() {
        for sub in ["light_rail", "monorail", "narrow_gauge"] {
            let c = classify(&tags(&[("railway", sub)])).unwrap();
            assert_eq!(c.order, 200);
            assert_eq!(c.style.stroke_width.as_deref(), Some("1"));
        }
        for sub in ["rail", "tram", "subway"] {
            let c = classify(&tags(&[("railway", sub)])).unwrap();
            assert_eq!(c.style.stroke_width.as_deref(), Some("2"));
        }
        assert!(classify(&tags(&[("railway", "abandoned")])).is_none());
    }

    #[test]
    fn test_highway_width_table() {
        let widths = [
            ("living_street", "1"),
            ("service", "1"),
            ("residential", "2"),
            ("tertiary", "4"),
            ("secondary", "6"),
            ("primary", "8"),
            ("trunk", "10"),
            ("motorway", "12"),
        ];
        for (sub, width) in widths {
            let c = classify(&tags(&[("highway", sub)])).unwrap();
            assert_eq!(c.order, 300, "{sub}");
            assert_eq!(c.style.stroke_width.as_deref(), Some(width), "{sub}");
            assert_eq!(c.style.stroke.as_deref(), Some("#010101"));
            assert!(!c.closed);
        }
        assert!(classify(&tags(&[("highway", "footway")])).is_none());
    }

    #[test]
    fn test_highway_links_share_width() {
        for (link, base) in [
            ("tertiary_link", "tertiary"),
            ("secondary_link", "secondary"),
            ("primary_link", "primary"),
            ("trunk_link", "trunk"),
            ("motorway_link", "motorway"),
        ] {
            let l = classify(&tags(&[("highway", link)])).unwrap();
            let b = classify(&tags(&[("highway", base)])).unwrap();
            assert_eq!(l.style.stroke_width, b.style.stroke_width);
            assert_eq!(l.kind, b.kind);
        }
    }

    #[test]
    fn test_boundary_national_only() {
        let c = classify(&tags(&[("boundary", "administrative"), ("admin_level", "2")])).unwrap();
        assert_eq!(c.order, 400);
        assert_eq!(c.kind, "boundary");
        assert!(!c.closed);
        assert_eq!(c.style.stroke.as_deref(), Some("rgba(189, 0, 0, 0.45)"));
        assert_eq!(c.style.stroke_width.as_deref(), Some("2"));

        assert!(classify(&tags(&[("boundary", "administrative"), ("admin_level", "4")])).is_none());
        assert!(classify(&tags(&[("boundary", "administrative")])).is_none());
    }

    #[test]
    fn test_untagged_dropped() {
        assert!(classify(&tags(&[])).is_none());
        assert!(classify(&tags(&[("name", "Main Street")])).is_none());
    }

    #[test]
    fn test_style_wire_keys() {
        let style = PathStyle::stroke("#010101", 12);
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r##"{"stroke":"#010101","stroke-width":"12"}"##);

        let back: PathStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }

    #[test]
    fn test_style_fill_roundtrip() {
        let style = PathStyle::fill("#37672d");
        let json = serde_json::to_string(&style).unwrap();
        assert_eq!(json, r##"{"fill":"#37672d"}"##);
        let back: PathStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }
}
