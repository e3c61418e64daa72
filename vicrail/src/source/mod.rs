//! Feature source abstraction
//!
//! This module provides traits and implementations for retrieving complete
//! feature collections from remote feature services. The concrete source is
//! the Vicmap Transport ArcGIS feature service, which serves paginated
//! GeoJSON and must be drained page by page.

mod http;
mod types;
mod vicmap;

pub use http::{AsyncHttpClient, AsyncReqwestClient};
pub use types::{AsyncFeatureSource, SourceError};
pub use vicmap::{VicmapFeatureService, DEFAULT_PAGE_SIZE, LINES_QUERY_URL, POINTS_QUERY_URL};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
