//! External vector data source.
//!
//! One tile download is one query against an Overpass-like API: a bounding
//! box plus a precompiled filter expression restricting the response to the
//! tag/value combinations the minimap knows how to draw. The response is a
//! flat list of tagged node/way features.
//!
//! The [`VectorSource`] trait abstracts the transport so the tile pipeline
//! can be exercised against canned data in tests.

mod filter;
mod overpass;
mod types;

pub use filter::{default_filter_spec, FilterExpression, FilterRule, FilterSpec, Selector};
pub use overpass::OverpassSource;
pub use types::Element;

use std::future::Future;

use thiserror::Error;

use crate::coord::GeoBounds;

/// Errors from the external data source.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// Transport-level failure (connection, timeout, HTTP status).
    #[error("data source request failed: {0}")]
    Http(String),

    /// The response body could not be parsed.
    #[error("data source response invalid: {0}")]
    Parse(String),
}

/// Trait for fetching vector features intersecting a bounding box.
pub trait VectorSource: Send + Sync {
    /// Fetch all features matching the filter within the bounds.
    fn fetch(
        &self,
        bounds: &GeoBounds,
        filter: &FilterExpression,
    ) -> impl Future<Output = Result<Vec<Element>, SourceError>> + Send;
}
