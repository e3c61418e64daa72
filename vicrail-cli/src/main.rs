//! VicRail CLI - Command-line interface
//!
//! Loads the two Vicmap Transport feature collections (cache-aware), applies
//! feature-type filters, and prints a per-type summary or exports the
//! filtered features as GeoJSON.

mod error;

use clap::{Parser, ValueEnum};
use error::CliError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use vicrail::cache::{CacheConfig, CollectionStore, DiskStore, NoOpStore};
use vicrail::feature::{FeatureCollection, LayerKind};
use vicrail::fetcher::FeatureFetcher;
use vicrail::filter::FilterStore;
use vicrail::logging::{default_log_dir, default_log_file, init_logging};
use vicrail::source::{AsyncReqwestClient, VicmapFeatureService, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, ValueEnum)]
enum LayerArg {
    /// Railway alignment layer only
    Lines,
    /// Infrastructure point layer only
    Points,
    /// Both layers
    Both,
}

#[derive(Parser)]
#[command(name = "vicrail")]
#[command(about = "Fetch and filter Victorian railway infrastructure features", long_about = None)]
#[command(version = vicrail::VERSION)]
struct Args {
    /// Layer(s) to summarize or export
    #[arg(long, value_enum, default_value = "both")]
    layer: LayerArg,

    /// Feature-type code to hide (repeatable)
    #[arg(long, value_name = "CODE")]
    disable: Vec<String>,

    /// Skip the disk cache entirely
    #[arg(long)]
    no_cache: bool,

    /// Clear cached collections before loading
    #[arg(long)]
    refresh: bool,

    /// Cache directory (defaults to the platform cache dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Cache expiry window in seconds
    #[arg(long, default_value = "3600")]
    ttl_secs: u64,

    /// Records requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Write the filtered features as GeoJSON to this path
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let _guard = match init_logging(default_log_dir(), default_log_file(), default_level) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e).exit(),
    };

    info!(version = vicrail::VERSION, "vicrail starting");

    let http_client = match AsyncReqwestClient::new() {
        Ok(client) => client,
        Err(e) => CliError::HttpClient(e).exit(),
    };
    let source = VicmapFeatureService::new(http_client).with_page_size(args.page_size);

    println!("Loading Vicmap Transport layers...");
    let start = std::time::Instant::now();

    let result = if args.no_cache {
        FeatureFetcher::new(source, NoOpStore).load().await
    } else {
        let mut config = CacheConfig::default().with_ttl(Duration::from_secs(args.ttl_secs));
        if let Some(dir) = args.cache_dir.clone() {
            config = config.with_cache_dir(dir);
        }
        let store = DiskStore::new(config);

        if args.refresh {
            if let Err(e) = store.clear() {
                warn!(error = %e, "failed to clear cache, loading anyway");
            }
        }

        FeatureFetcher::new(source, store).load().await
    };

    let data = match result {
        Ok(data) => data,
        Err(e) => CliError::Load(e).exit(),
    };

    let elapsed = start.elapsed();
    println!(
        "Loaded {} line features and {} point features in {:.2}s",
        data.lines.len(),
        data.points.len(),
        elapsed.as_secs_f64()
    );

    let mut filters = FilterStore::from_data(data);
    let kinds = selected_kinds(&args.layer);
    apply_disabled(&mut filters, &kinds, &args.disable);

    for kind in &kinds {
        print_summary(&filters, *kind);
    }

    if let Some(path) = &args.export {
        match export_filtered(&filters, &kinds, path) {
            Ok(count) => println!("\n✓ Exported {} features to {}", count, path.display()),
            Err(e) => e.exit(),
        }
    }
}

/// Layer kinds selected by the `--layer` flag, in fetch order.
fn selected_kinds(layer: &LayerArg) -> Vec<LayerKind> {
    match layer {
        LayerArg::Lines => vec![LayerKind::Lines],
        LayerArg::Points => vec![LayerKind::Points],
        LayerArg::Both => LayerKind::ALL.to_vec(),
    }
}

/// Disables the given codes on every selected layer that knows them.
///
/// Codes a layer has never observed are skipped: toggling an absent code
/// would *enable* it, which is not what `--disable` means.
fn apply_disabled(filters: &mut FilterStore, kinds: &[LayerKind], codes: &[String]) {
    for code in codes {
        for kind in kinds {
            if filters.state(*kind).is_enabled(code) {
                filters.toggle(*kind, code);
            }
        }
    }
}

/// Feature counts per type code, in sorted code order.
fn count_by_code(collection: &FeatureCollection) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for feature in collection.iter() {
        *counts.entry(feature.type_code()).or_insert(0) += 1;
    }
    counts
}

fn print_summary(filters: &FilterStore, kind: LayerKind) {
    let collection = filters.collection(kind);
    let state = filters.state(kind);
    let visible = filters.filtered(kind).len();

    println!();
    println!(
        "{}: {} features, {} types ({} visible)",
        kind,
        collection.len(),
        state.len(),
        visible
    );

    let counts = count_by_code(collection);
    for (code, enabled) in state.iter() {
        let mark = if enabled { "x" } else { " " };
        let count = counts.get(code).copied().unwrap_or(0);
        println!("  [{}] {:<24} {:>6}", mark, code, count);
    }
}

/// Writes the filtered features of the selected layers as one GeoJSON
/// FeatureCollection.
fn export_filtered(
    filters: &FilterStore,
    kinds: &[LayerKind],
    path: &PathBuf,
) -> Result<usize, CliError> {
    let mut features = Vec::new();
    for kind in kinds {
        features.extend(filters.filtered_collection(*kind).features);
    }
    let collection = FeatureCollection::from_features(features);

    let json = serde_json::to_string_pretty(&collection.to_geojson()).map_err(|e| {
        CliError::Export {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    })?;

    std::fs::write(path, json).map_err(|e| CliError::Export {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(collection.len())
}
