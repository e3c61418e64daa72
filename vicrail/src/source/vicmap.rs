//! Vicmap Transport feature service client.
//!
//! The Victorian government publishes railway infrastructure through an
//! ArcGIS feature service with one layer per geometry kind:
//!
//! - layer 3: railway alignments (line geometry)
//! - layer 2: stations and other infrastructure points
//!
//! # Pagination
//!
//! The service caps each response at a configurable record count, so a layer
//! is drained with repeated queries at increasing `resultOffset`. A page
//! holding fewer records than requested (or none at all) signals exhaustion
//! and is the loop's only exit: a server that kept returning exactly full
//! pages forever would never terminate it, and that is a server bug this
//! client does not second-guess.

use crate::feature::{FeatureCollection, LayerKind};
use crate::source::http::AsyncHttpClient;
use crate::source::types::{AsyncFeatureSource, SourceError};
use tracing::{debug, trace};

/// Query endpoint for the railway alignment layer (line geometry).
pub const LINES_QUERY_URL: &str = "https://services6.arcgis.com/GB33F62SbDxJjwEL/ArcGIS/rest/services/Vicmap_Transport/FeatureServer/3/query";

/// Query endpoint for the infrastructure point layer.
pub const POINTS_QUERY_URL: &str = "https://services6.arcgis.com/GB33F62SbDxJjwEL/ArcGIS/rest/services/Vicmap_Transport/FeatureServer/2/query";

/// Records requested per page.
///
/// Matches the service's maximum transfer limit; larger values are silently
/// truncated by the server, which would break the exhaustion check.
pub const DEFAULT_PAGE_SIZE: usize = 2000;

/// Client for the Vicmap Transport feature service.
///
/// Generic over the HTTP client so pagination behavior can be exercised
/// against scripted responses in tests.
///
/// # Example
///
/// ```no_run
/// use vicrail::source::{AsyncFeatureSource, AsyncReqwestClient, VicmapFeatureService};
/// use vicrail::feature::LayerKind;
///
/// # async fn run() -> Result<(), vicrail::source::SourceError> {
/// let client = AsyncReqwestClient::new()?;
/// let service = VicmapFeatureService::new(client);
/// let lines = service.fetch_layer(LayerKind::Lines).await?;
/// println!("{} line features", lines.len());
/// # Ok(())
/// # }
/// ```
pub struct VicmapFeatureService<C: AsyncHttpClient> {
    http_client: C,
    lines_url: String,
    points_url: String,
    page_size: usize,
}

impl<C: AsyncHttpClient> VicmapFeatureService<C> {
    /// Creates a service client against the production Vicmap endpoints.
    pub fn new(http_client: C) -> Self {
        Self {
            http_client,
            lines_url: LINES_QUERY_URL.to_string(),
            points_url: POINTS_QUERY_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Overrides the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Overrides both layer endpoints (tests, alternate regions).
    pub fn with_endpoints(
        mut self,
        lines_url: impl Into<String>,
        points_url: impl Into<String>,
    ) -> Self {
        self.lines_url = lines_url.into();
        self.points_url = points_url.into();
        self
    }

    fn endpoint(&self, kind: LayerKind) -> &str {
        match kind {
            LayerKind::Lines => &self.lines_url,
            LayerKind::Points => &self.points_url,
        }
    }

    /// Builds the query URL for one page of a layer.
    ///
    /// The query always requests every feature (`where=1=1`), every field,
    /// and full geometry, in GeoJSON output format.
    fn build_query_url(&self, kind: LayerKind, offset: usize) -> String {
        format!(
            "{}?where=1%3D1&outFields=*&f=geojson&resultRecordCount={}&resultOffset={}&returnGeometry=true",
            self.endpoint(kind),
            self.page_size,
            offset
        )
    }

    fn parse_page(body: &[u8]) -> Result<FeatureCollection, SourceError> {
        serde_json::from_slice(body)
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to parse page: {}", e)))
    }

    /// Drains one layer completely, page by page.
    ///
    /// Any page failing aborts the whole layer fetch; accumulated pages are
    /// discarded with the returned error.
    async fn fetch_all(&self, kind: LayerKind) -> Result<FeatureCollection, SourceError> {
        let mut features = Vec::new();
        let mut offset = 0;
        let mut pages = 0u32;

        loop {
            let url = self.build_query_url(kind, offset);
            let body = self.http_client.get(&url).await?;
            let page = Self::parse_page(&body)?;

            let count = page.features.len();
            trace!(layer = %kind, offset, count, "page received");

            features.extend(page.features);
            pages += 1;

            // Fewer records than requested, or none at all, means the layer
            // is exhausted.
            if count == 0 || count < self.page_size {
                break;
            }
            offset += self.page_size;
        }

        debug!(
            layer = %kind,
            features = features.len(),
            pages,
            "layer fetch complete"
        );

        Ok(FeatureCollection::from_features(features))
    }
}

impl<C: AsyncHttpClient> AsyncFeatureSource for VicmapFeatureService<C> {
    async fn fetch_layer(&self, kind: LayerKind) -> Result<FeatureCollection, SourceError> {
        self.fetch_all(kind).await
    }

    fn name(&self) -> &str {
        "Vicmap Transport"
    }
}
