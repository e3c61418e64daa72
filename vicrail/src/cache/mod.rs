//! Time-boxed collection cache.
//!
//! Fetched collections are cached on disk, one file per layer kind, and
//! honored until a fixed expiry window elapses. Every cache failure mode
//! (unavailable directory, full disk, corrupt file) degrades to a miss or a
//! no-op write; the cache never fails a load.

mod store;
mod types;

pub use store::{CollectionStore, DiskStore, NoOpStore};
pub use types::{CacheConfig, CacheEntry, CacheError, DEFAULT_CACHE_TTL};
