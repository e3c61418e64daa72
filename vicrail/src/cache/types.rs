//! Core types for the collection cache.

use crate::feature::FeatureCollection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Expiry window after which a cached collection is refetched.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Cache-related errors.
///
/// These never propagate past the fetcher: a failed read is a miss, a failed
/// write is logged and swallowed.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache entry could not be serialized or deserialized
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One cached collection plus the time it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Fetch time as unix seconds
    pub fetched_at: i64,
    /// The cached collection payload
    pub collection: FeatureCollection,
}

impl CacheEntry {
    /// Creates an entry stamped with the given fetch time.
    pub fn new(collection: FeatureCollection, fetched_at: DateTime<Utc>) -> Self {
        Self {
            fetched_at: fetched_at.timestamp(),
            collection,
        }
    }

    /// Whether the entry is still inside the expiry window at `now`.
    ///
    /// An entry is fresh while its age is at most `ttl`; anything older is a
    /// miss. Entries stamped in the future (clock rollback) count as fresh,
    /// matching an age of zero.
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age_secs = now.timestamp() - self.fetched_at;
        age_secs <= ttl.as_secs() as i64
    }
}

/// Disk cache configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding the per-layer cache files
    pub cache_dir: PathBuf,
    /// Expiry window (default: 1 hour)
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vicrail");

        Self {
            cache_dir,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

impl CacheConfig {
    /// Set the cache directory.
    pub fn with_cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = dir;
        self
    }

    /// Set the expiry window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}
