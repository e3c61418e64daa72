//! VicRail - Victorian railway infrastructure data pipeline
//!
//! This library fetches the two Vicmap Transport feature collections
//! (railway alignments and infrastructure points) from the public ArcGIS
//! feature service, caches them on disk with a fixed expiry window, and
//! exposes client-side filtering over the feature-type codes observed in
//! the data.
//!
//! # High-Level API
//!
//! ```ignore
//! use vicrail::cache::{CacheConfig, DiskStore};
//! use vicrail::feature::LayerKind;
//! use vicrail::fetcher::FeatureFetcher;
//! use vicrail::filter::FilterStore;
//! use vicrail::source::{AsyncReqwestClient, VicmapFeatureService};
//!
//! let client = AsyncReqwestClient::new()?;
//! let source = VicmapFeatureService::new(client);
//! let store = DiskStore::new(CacheConfig::default());
//!
//! let data = FeatureFetcher::new(source, store).load().await?;
//!
//! let mut filters = FilterStore::from_data(data);
//! filters.toggle(LayerKind::Lines, "rail_disused");
//! let visible = filters.filtered(LayerKind::Lines);
//! ```

pub mod cache;
pub mod feature;
pub mod fetcher;
pub mod filter;
pub mod logging;
pub mod source;

/// Version of the VicRail library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
