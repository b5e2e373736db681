//! Filter expression composition for data source queries.
//!
//! The minimap only draws an allow-list of tag/value combinations; the
//! filter spec encodes that list and compiles it once into the query
//! fragment the data source understands (`way["key"="value"];` clauses).

use std::fmt;

/// What values of a tag key (or of a nested tag) are selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Any value of the key.
    Any,
    /// An explicit list of values.
    Values(Vec<String>),
    /// Nested tag constraints: the key must be present and each listed
    /// (tag, selector) pair must match as well.
    Tags(Vec<(String, Selector)>),
}

impl Selector {
    /// Convenience constructor for a value list.
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Values(values.into_iter().map(Into::into).collect())
    }
}

/// One allow-list rule: a tag key and its selected values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRule {
    pub key: String,
    pub selector: Selector,
}

/// Ordered allow-list of features to request from the data source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec(pub Vec<FilterRule>);

impl FilterSpec {
    /// Add a rule; builder-style, preserving insertion order.
    pub fn rule<K: Into<String>>(mut self, key: K, selector: Selector) -> Self {
        self.0.push(FilterRule {
            key: key.into(),
            selector,
        });
        self
    }

    /// Compile the allow-list into the query fragment.
    pub fn compose(&self) -> FilterExpression {
        let mut selection = String::new();
        for rule in &self.0 {
            match &rule.selector {
                Selector::Any => {
                    selection.push_str(&format!("way[\"{}\"];", rule.key));
                }
                Selector::Values(values) => {
                    for value in values {
                        selection.push_str(&format!("way[\"{}\"=\"{}\"];", rule.key, value));
                    }
                }
                Selector::Tags(tags) => {
                    for (tag, inner) in tags {
                        match inner {
                            Selector::Any => {
                                selection
                                    .push_str(&format!("way[\"{}\"][\"{}\"];", rule.key, tag));
                            }
                            Selector::Values(values) => {
                                for value in values {
                                    selection.push_str(&format!(
                                        "way[\"{}\"][\"{}\"=\"{}\"];",
                                        rule.key, tag, value
                                    ));
                                }
                            }
                            // One level of nesting is all the query language offers
                            Selector::Tags(_) => {}
                        }
                    }
                }
            }
        }
        FilterExpression(selection)
    }
}

/// A precompiled query fragment restricting the data source response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterExpression(String);

impl FilterExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The minimap's default allow-list: the road network, railways, waterways,
/// water and building footprints, the drawable landuse classes, and national
/// borders.
pub fn default_filter_spec() -> FilterSpec {
    FilterSpec::default()
        .rule(
            "highway",
            Selector::values([
                "motorway",
                "motorway_link",
                "trunk",
                "trunk_link",
                "primary",
                "primary_link",
                "secondary",
                "secondary_link",
                "tertiary",
                "tertiary_link",
                "residential",
                "service",
                "living_street",
            ]),
        )
        .rule(
            "railway",
            Selector::values([
                "light_rail",
                "monorail",
                "narrow_gauge",
                "rail",
                "subway",
                "tram",
            ]),
        )
        .rule(
            "waterway",
            Selector::values(["stream", "tidal_channel", "ditch", "river", "canal"]),
        )
        .rule("water", Selector::Any)
        .rule("building", Selector::Any)
        .rule(
            "landuse",
            Selector::values(["forest", "farmland", "residential", "industrial", "grass"]),
        )
        .rule(
            "boundary",
            Selector::Tags(vec![("admin_level".to_string(), Selector::values(["2"]))]),
        )
}
