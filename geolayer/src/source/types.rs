//! Wire types for the vector data source response.

use std::collections::HashMap;

use serde::Deserialize;

/// One feature element from the data source.
///
/// The response mixes node and way elements; ways reference nodes by id.
/// Unknown element types (e.g. relations) are tolerated and skipped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// A point with geographic coordinates.
    Node { id: u64, lat: f64, lon: f64 },

    /// An ordered sequence of node references with tags.
    Way {
        id: u64,
        #[serde(default)]
        nodes: Vec<u64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },

    /// Any element type this pipeline does not consume.
    #[serde(other)]
    Other,
}

/// Top-level response envelope.
#[derive(Debug, Deserialize)]
pub struct SourceResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_node() {
        let json = r#"{"type": "node", "id": 42, "lat": 46.05, "lon": 14.5}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        match element {
            Element::Node { id, lat, lon } => {
                assert_eq!(id, 42);
                assert!((lat - 46.05).abs() < 1e-9);
                assert!((lon - 14.5).abs() < 1e-9);
            }
            other => panic!("expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_way_with_tags() {
        let json = r#"{
            "type": "way",
            "id": 7,
            "nodes": [1, 2, 3],
            "tags": {"highway": "motorway"}
        }"#;
        let element: Element = serde_json::from_str(json).unwrap();
        match element {
            Element::Way { id, nodes, tags } => {
                assert_eq!(id, 7);
                assert_eq!(nodes, vec![1, 2, 3]);
                assert_eq!(tags.get("highway").map(String::as_str), Some("motorway"));
            }
            other => panic!("expected way, got {:?}", other),
        }
    }

    #[test]
    fn test_deserialize_way_without_tags() {
        let json = r#"{"type": "way", "id": 7, "nodes": [1]}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(matches!(element, Element::Way { ref tags, .. } if tags.is_empty()));
    }

    #[test]
    fn test_deserialize_unknown_element() {
        let json = r#"{"type": "relation", "id": 9}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert!(matches!(element, Element::Other));
    }

    #[test]
    fn test_deserialize_response_envelope() {
        // The real API carries extra metadata fields we ignore
        let json = r#"{
            "version": 0.6,
            "generator": "Overpass API",
            "elements": [
                {"type": "node", "id": 1, "lat": 0.0, "lon": 0.0},
                {"type": "way", "id": 2, "nodes": [1], "tags": {"building": "yes"}}
            ]
        }"#;
        let response: SourceResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.elements.len(), 2);
    }

    #[test]
    fn test_deserialize_empty_response() {
        let response: SourceResponse = serde_json::from_str("{}").unwrap();
        assert!(response.elements.is_empty());
    }
}
