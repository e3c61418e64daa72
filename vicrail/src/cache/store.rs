//! Collection store implementations.

use crate::cache::types::{CacheConfig, CacheEntry, CacheError};
use crate::feature::{FeatureCollection, LayerKind};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// Store abstraction for cached feature collections.
///
/// Enables caching strategies (disk, no-op) to be swapped at the fetcher
/// seam. A `get` returning `None` means miss for any reason (absent, stale,
/// or unreadable), so callers never need to distinguish failure modes.
pub trait CollectionStore: Send + Sync {
    /// Returns the cached collection for a layer kind if a fresh entry exists.
    fn get(&self, kind: LayerKind) -> Option<FeatureCollection>;

    /// Stores a freshly fetched collection, stamped with the current time.
    fn put(&self, kind: LayerKind, collection: &FeatureCollection) -> Result<(), CacheError>;

    /// Removes all cached entries.
    fn clear(&self) -> Result<(), CacheError>;
}

// Serialization mirror of CacheEntry that borrows the collection instead of
// cloning it for every write.
#[derive(Serialize)]
struct CacheEntryRef<'a> {
    fetched_at: i64,
    collection: &'a FeatureCollection,
}

/// Disk-backed collection store: one JSON file per layer kind.
///
/// Expired and corrupt files are deleted on read and reported as misses.
/// The cache directory is created lazily on the first write, so a store
/// pointed at an unusable location still serves (empty) reads.
pub struct DiskStore {
    cache_dir: PathBuf,
    ttl: Duration,
}

impl DiskStore {
    /// Creates a store from the given configuration.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            cache_dir: config.cache_dir,
            ttl: config.ttl,
        }
    }

    /// Path of the cache file for a layer kind.
    pub fn entry_path(&self, kind: LayerKind) -> PathBuf {
        self.cache_dir.join(format!("{}.json", kind.key()))
    }

    fn read_entry(&self, kind: LayerKind) -> Option<CacheEntry> {
        let path = self.entry_path(kind);
        let bytes = fs::read(&path).ok()?;

        match serde_json::from_slice(&bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                // Unreadable entry: drop the file so the next run starts clean.
                warn!(layer = %kind, error = %e, "corrupt cache entry, discarding");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }
}

impl CollectionStore for DiskStore {
    fn get(&self, kind: LayerKind) -> Option<FeatureCollection> {
        let entry = self.read_entry(kind)?;

        if !entry.is_fresh(Utc::now(), self.ttl) {
            debug!(layer = %kind, "cache entry expired, discarding");
            let _ = fs::remove_file(self.entry_path(kind));
            return None;
        }

        debug!(
            layer = %kind,
            features = entry.collection.len(),
            "cache hit"
        );
        Some(entry.collection)
    }

    fn put(&self, kind: LayerKind, collection: &FeatureCollection) -> Result<(), CacheError> {
        fs::create_dir_all(&self.cache_dir)?;

        let entry = CacheEntryRef {
            fetched_at: Utc::now().timestamp(),
            collection,
        };
        let bytes = serde_json::to_vec(&entry)?;
        fs::write(self.entry_path(kind), bytes)?;

        debug!(
            layer = %kind,
            features = collection.len(),
            "cache entry written"
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        for kind in LayerKind::ALL {
            let path = self.entry_path(kind);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

/// No-op store that never caches.
///
/// Always returns misses and accepts writes without storing them. Used for
/// cache-disabled runs and as the degenerate case when persistent storage is
/// unavailable.
#[derive(Debug, Clone, Default)]
pub struct NoOpStore;

impl CollectionStore for NoOpStore {
    fn get(&self, _kind: LayerKind) -> Option<FeatureCollection> {
        None // Always miss
    }

    fn put(&self, _kind: LayerKind, _collection: &FeatureCollection) -> Result<(), CacheError> {
        Ok(()) // Accept but don't store
    }

    fn clear(&self) -> Result<(), CacheError> {
        Ok(()) // Nothing to clear
    }
}
