//! HTTP client abstraction for testability

use super::types::SourceError;
use std::future::Future;
use tracing::{debug, trace, warn};

/// Trait for asynchronous HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests. All request handling in this
/// crate is non-blocking.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an async HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes, or an error for transport failures and
    /// non-success HTTP statuses.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, SourceError>> + Send;
}

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("vicrail/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout in seconds.
///
/// The feature service can take several seconds to assemble a 2000-record
/// page, so this is deliberately generous. No retry is attempted on timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Real HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    pub fn new() -> Result<Self, SourceError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|e| SourceError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        trace!(url = url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(SourceError::HttpError(format!("Request failed: {}", e)));
            }
        };

        // Check HTTP status
        if !response.status().is_success() {
            warn!(
                url = url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(SourceError::HttpError(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        // Read response body
        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "Failed to read response body");
                Err(SourceError::HttpError(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Mock async HTTP client that plays back a scripted sequence of
    /// responses and records every requested URL.
    #[derive(Clone, Default)]
    pub struct MockAsyncHttpClient {
        responses: Arc<Mutex<VecDeque<Result<Vec<u8>, SourceError>>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockAsyncHttpClient {
        /// Creates a mock that returns the given responses in order.
        pub fn new(responses: Vec<Result<Vec<u8>, SourceError>>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Every URL requested so far, in order.
        pub fn requested_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        /// Number of requests made so far.
        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, SourceError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(SourceError::HttpError("no scripted response".into())))
        }
    }

    #[tokio::test]
    async fn test_mock_client_plays_back_in_order() {
        let mock = MockAsyncHttpClient::new(vec![Ok(vec![1]), Ok(vec![2])]);

        assert_eq!(mock.get("http://example.com/a").await.unwrap(), vec![1]);
        assert_eq!(mock.get("http://example.com/b").await.unwrap(), vec![2]);
        assert_eq!(
            mock.requested_urls(),
            vec!["http://example.com/a", "http://example.com/b"]
        );
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock =
            MockAsyncHttpClient::new(vec![Err(SourceError::HttpError("Test error".into()))]);

        let result = mock.get("http://example.com").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_mock_client_exhausted_script_errors() {
        let mock = MockAsyncHttpClient::new(vec![]);

        let result = mock.get("http://example.com").await;
        assert_eq!(
            result,
            Err(SourceError::HttpError("no scripted response".into()))
        );
    }
}
