//! Concurrent, cache-aware loading of the two transport layers.
//!
//! `FeatureFetcher` composes a feature source with a collection store. Each
//! layer independently checks the cache first; a fresh entry skips the
//! network entirely. The two layers load concurrently and the overall load
//! resolves only once both complete; if either fails, the whole load fails
//! and no partial data is returned.

use crate::cache::CollectionStore;
use crate::feature::{FeatureCollection, LayerKind};
use crate::source::{AsyncFeatureSource, SourceError};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can fail a load.
///
/// Cache failures never appear here: a failed cache read is a miss and a
/// failed cache write is logged and swallowed. No retries are performed at
/// this layer; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A page request failed while fetching a layer
    #[error("network error: {0}")]
    Network(#[from] SourceError),
}

/// Both collections, fully loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MapData {
    /// Railway alignment features (line geometry)
    pub lines: FeatureCollection,
    /// Infrastructure point features
    pub points: FeatureCollection,
}

impl MapData {
    /// The collection for a layer kind.
    pub fn collection(&self, kind: LayerKind) -> &FeatureCollection {
        match kind {
            LayerKind::Lines => &self.lines,
            LayerKind::Points => &self.points,
        }
    }
}

/// Cache-aware fetcher over a feature source.
pub struct FeatureFetcher<S, C>
where
    S: AsyncFeatureSource,
    C: CollectionStore,
{
    source: S,
    store: C,
}

impl<S, C> FeatureFetcher<S, C>
where
    S: AsyncFeatureSource,
    C: CollectionStore,
{
    /// Creates a fetcher from a source and a store.
    pub fn new(source: S, store: C) -> Self {
        Self { source, store }
    }

    /// Loads both collections, from cache where fresh, otherwise from the
    /// source.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if either layer's fetch fails. The
    /// other layer's result, if any, is discarded; there is no partial
    /// success.
    pub async fn load(&self) -> Result<MapData, FetchError> {
        let (lines, points) = tokio::try_join!(
            self.load_layer(LayerKind::Lines),
            self.load_layer(LayerKind::Points),
        )?;

        Ok(MapData { lines, points })
    }

    async fn load_layer(&self, kind: LayerKind) -> Result<FeatureCollection, FetchError> {
        if let Some(cached) = self.store.get(kind) {
            debug!(layer = %kind, features = cached.len(), "serving layer from cache");
            return Ok(cached);
        }

        debug!(layer = %kind, source = self.source.name(), "fetching layer");
        let collection = self.source.fetch_layer(kind).await?;

        // Best effort: a full or unavailable store must not fail the load.
        if let Err(e) = self.store.put(kind, &collection) {
            warn!(layer = %kind, error = %e, "cache write failed, continuing uncached");
        }

        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CacheError, DiskStore, NoOpStore};
    use crate::feature::{Feature, FeatureProperties, Geometry};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn collection(code: &str, count: usize) -> FeatureCollection {
        let features = (0..count)
            .map(|i| Feature {
                id: Some(i as i64),
                geometry: Geometry::Point(vec![144.9, -37.8]),
                properties: FeatureProperties::new(code),
            })
            .collect();
        FeatureCollection::from_features(features)
    }

    /// Source stub returning canned results and recording layer requests.
    struct StubSource {
        lines: Result<FeatureCollection, SourceError>,
        points: Result<FeatureCollection, SourceError>,
        calls: Arc<Mutex<Vec<LayerKind>>>,
    }

    impl StubSource {
        fn new(
            lines: Result<FeatureCollection, SourceError>,
            points: Result<FeatureCollection, SourceError>,
        ) -> Self {
            Self {
                lines,
                points,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl AsyncFeatureSource for StubSource {
        async fn fetch_layer(&self, kind: LayerKind) -> Result<FeatureCollection, SourceError> {
            self.calls.lock().unwrap().push(kind);
            match kind {
                LayerKind::Lines => self.lines.clone(),
                LayerKind::Points => self.points.clone(),
            }
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    /// Store whose writes always fail, for the best-effort path.
    struct FailingWriteStore;

    impl CollectionStore for FailingWriteStore {
        fn get(&self, _kind: LayerKind) -> Option<FeatureCollection> {
            None
        }

        fn put(
            &self,
            _kind: LayerKind,
            _collection: &FeatureCollection,
        ) -> Result<(), CacheError> {
            Err(CacheError::Io(std::io::Error::other("disk full")))
        }

        fn clear(&self) -> Result<(), CacheError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_fetches_both_layers() {
        let source = StubSource::new(
            Ok(collection("railway", 4)),
            Ok(collection("rail_station", 2)),
        );
        let calls = source.calls.clone();
        let fetcher = FeatureFetcher::new(source, NoOpStore);

        let data = fetcher.load().await.unwrap();

        assert_eq!(data.lines.len(), 4);
        assert_eq!(data.points.len(), 2);
        assert_eq!(data.collection(LayerKind::Lines).len(), 4);

        let mut fetched = calls.lock().unwrap().clone();
        fetched.sort_by_key(|k| k.key());
        assert_eq!(fetched, vec![LayerKind::Lines, LayerKind::Points]);
    }

    #[tokio::test]
    async fn test_one_layer_failing_fails_the_load() {
        let source = StubSource::new(
            Ok(collection("railway", 4)),
            Err(SourceError::HttpError("HTTP 500".into())),
        );
        let fetcher = FeatureFetcher::new(source, NoOpStore);

        let result = fetcher.load().await;

        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_network() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(CacheConfig::default().with_cache_dir(dir.path().into()));
        store.put(LayerKind::Lines, &collection("railway", 3)).unwrap();
        store
            .put(LayerKind::Points, &collection("rail_station", 1))
            .unwrap();

        let source = StubSource::new(
            Err(SourceError::HttpError("must not be called".into())),
            Err(SourceError::HttpError("must not be called".into())),
        );
        let calls = source.calls.clone();
        let fetcher = FeatureFetcher::new(
            source,
            DiskStore::new(CacheConfig::default().with_cache_dir(dir.path().into())),
        );

        let data = fetcher.load().await.unwrap();

        assert_eq!(data.lines.len(), 3);
        assert_eq!(data.points.len(), 1);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_only_stale_layer_refetched() {
        let dir = TempDir::new().unwrap();
        let store = DiskStore::new(CacheConfig::default().with_cache_dir(dir.path().into()));
        // Lines cached fresh; points never cached.
        store.put(LayerKind::Lines, &collection("railway", 3)).unwrap();

        let source = StubSource::new(
            Err(SourceError::HttpError("lines must come from cache".into())),
            Ok(collection("rail_station", 7)),
        );
        let calls = source.calls.clone();
        let fetcher = FeatureFetcher::new(source, store);

        let data = fetcher.load().await.unwrap();

        assert_eq!(data.lines.len(), 3);
        assert_eq!(data.points.len(), 7);
        assert_eq!(calls.lock().unwrap().as_slice(), &[LayerKind::Points]);
    }

    #[tokio::test]
    async fn test_successful_fetch_populates_cache() {
        let dir = TempDir::new().unwrap();
        let source = StubSource::new(
            Ok(collection("railway", 2)),
            Ok(collection("rail_station", 2)),
        );
        let fetcher = FeatureFetcher::new(
            source,
            DiskStore::new(CacheConfig::default().with_cache_dir(dir.path().into())),
        );

        fetcher.load().await.unwrap();

        let store = DiskStore::new(CacheConfig::default().with_cache_dir(dir.path().into()));
        assert!(store.get(LayerKind::Lines).is_some());
        assert!(store.get(LayerKind::Points).is_some());
    }

    #[tokio::test]
    async fn test_cache_write_failure_does_not_fail_load() {
        let source = StubSource::new(
            Ok(collection("railway", 2)),
            Ok(collection("rail_station", 2)),
        );
        let fetcher = FeatureFetcher::new(source, FailingWriteStore);

        let data = fetcher.load().await.unwrap();

        assert_eq!(data.lines.len(), 2);
        assert_eq!(data.points.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_empty() {
        let dir = TempDir::new().unwrap();
        let source = StubSource::new(
            Err(SourceError::HttpError("HTTP 503".into())),
            Ok(collection("rail_station", 2)),
        );
        let fetcher = FeatureFetcher::new(
            source,
            DiskStore::new(CacheConfig::default().with_cache_dir(dir.path().into())),
        );

        assert!(fetcher.load().await.is_err());

        let store = DiskStore::new(CacheConfig::default().with_cache_dir(dir.path().into()));
        assert!(store.get(LayerKind::Lines).is_none());
    }
}
