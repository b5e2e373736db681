//! Overpass API client.

use std::time::Duration;

use crate::coord::GeoBounds;

use super::types::SourceResponse;
use super::{Element, FilterExpression, SourceError, VectorSource};

/// Default HTTP timeout for data source queries.
///
/// The query itself carries a server-side timeout; this caps the whole
/// round trip so a hung download cannot stall a grid slot indefinitely.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Server-side evaluation timeout requested in the query header.
const QUERY_TIMEOUT_SECS: u32 = 10;

/// Vector data source backed by an Overpass-compatible HTTP endpoint.
///
/// Issues one POST per tile download with the query passed as the `data`
/// form field, and deserialises the flat element list from the JSON reply.
pub struct OverpassSource {
    http: reqwest::Client,
    endpoint: String,
}

impl OverpassSource {
    /// Create a client for the given endpoint with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SourceError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom round-trip timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Build the query text for a bounding box and filter.
    fn query(bounds: &GeoBounds, filter: &FilterExpression) -> String {
        format!(
            "[out:json][timeout:{}][bbox:{},{},{},{}];({});(._;>;);out qt;",
            QUERY_TIMEOUT_SECS,
            bounds.min_lat,
            bounds.min_lon,
            bounds.max_lat,
            bounds.max_lon,
            filter.as_str()
        )
    }
}

impl VectorSource for OverpassSource {
    async fn fetch(
        &self,
        bounds: &GeoBounds,
        filter: &FilterExpression,
    ) -> Result<Vec<Element>, SourceError> {
        let query = Self::query(bounds, filter);

        let response = self
            .http
            .post(&self.endpoint)
            .form(&[("data", query.as_str())])
            .send()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http(format!(
                "HTTP {status} from {}",
                self.endpoint
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Http(e.to_string()))?;

        let data: SourceResponse =
            serde_json::from_slice(&bytes).map_err(|e| SourceError::Parse(e.to_string()))?;

        tracing::debug!(
            elements = data.elements.len(),
            bytes = bytes.len(),
            "map data fetched"
        );

        Ok(data.elements)
    }
}
