//! Source types and traits

use crate::feature::{FeatureCollection, LayerKind};
use std::fmt;
use std::future::Future;

/// Errors that can occur while retrieving features from a remote source.
///
/// Any of these is fatal to the layer fetch it occurred in: partially
/// accumulated pages are discarded, never returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// HTTP request failed (transport error or non-success status)
    HttpError(String),
    /// Response body could not be parsed as a feature collection
    InvalidResponse(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            SourceError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// Trait for asynchronous feature sources.
///
/// Implementors return the *complete* collection for a layer kind, having
/// already drained any upstream pagination. This abstraction allows the
/// fetcher to be tested against stub sources without network access.
pub trait AsyncFeatureSource: Send + Sync {
    /// Retrieves every feature of the given layer kind.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which of the two collections to retrieve
    ///
    /// # Returns
    ///
    /// The fully assembled collection, or the first error encountered.
    fn fetch_layer(
        &self,
        kind: LayerKind,
    ) -> impl Future<Output = Result<FeatureCollection, SourceError>> + Send;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;
}
