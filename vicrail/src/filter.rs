//! Filter state over feature-type codes.
//!
//! `FilterStore` owns the two loaded collections and one boolean enablement
//! map per kind, keyed by the type codes actually observed in the data.
//! Toggle and bulk-toggle are the only mutators; `initialize` is the only
//! entry point that changes the key sets. Filtered views are recomputed on
//! demand with a plain O(n) scan, which is cheap at the dataset sizes the
//! service returns (low tens of thousands of features).

use crate::feature::{Feature, FeatureCollection, LayerKind};
use crate::fetcher::MapData;
use std::collections::BTreeMap;

/// Enablement map for one collection kind.
///
/// Lookup is total: a code with no entry is disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    flags: BTreeMap<String, bool>,
}

impl FilterState {
    /// Derives a state from a collection: one entry per distinct observed
    /// type code, all enabled.
    pub fn from_collection(collection: &FeatureCollection) -> Self {
        let flags = collection
            .distinct_type_codes()
            .into_iter()
            .map(|code| (code, true))
            .collect();
        Self { flags }
    }

    /// Whether the given code is enabled. Absent codes are disabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.flags.get(code).copied().unwrap_or(false)
    }

    /// Flips the flag for a code.
    ///
    /// An absent code counts as disabled, so toggling it inserts an enabled
    /// entry.
    pub fn toggle(&mut self, code: &str) {
        let next = !self.is_enabled(code);
        self.flags.insert(code.to_string(), next);
    }

    /// Sets every existing key to `enabled`. Never adds or removes keys.
    pub fn set_all(&mut self, enabled: bool) {
        for flag in self.flags.values_mut() {
            *flag = enabled;
        }
    }

    /// Iterates `(code, enabled)` pairs in sorted code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(code, enabled)| (code.as_str(), *enabled))
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Returns true if no codes are known.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// Filter store over the two loaded collections.
///
/// Constructed per session; [`initialize`](Self::initialize) replaces its
/// contents wholesale when a refetch delivers new data.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    lines: FeatureCollection,
    points: FeatureCollection,
    lines_state: FilterState,
    points_state: FilterState,
}

impl FilterStore {
    /// Creates an empty store; call [`initialize`](Self::initialize) once
    /// data is loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an initialized store directly from loaded map data.
    pub fn from_data(data: MapData) -> Self {
        let mut store = Self::new();
        store.initialize(data.lines, data.points);
        store
    }

    /// Adopts freshly loaded collections and derives both filter states,
    /// every observed code enabled.
    ///
    /// Calling this again replaces collections and states entirely, so a
    /// disable-then-refetch sequence resets to all-enabled for the new type
    /// set.
    pub fn initialize(&mut self, lines: FeatureCollection, points: FeatureCollection) {
        self.lines_state = FilterState::from_collection(&lines);
        self.points_state = FilterState::from_collection(&points);
        self.lines = lines;
        self.points = points;
    }

    /// The full (unfiltered) collection for a kind.
    pub fn collection(&self, kind: LayerKind) -> &FeatureCollection {
        match kind {
            LayerKind::Lines => &self.lines,
            LayerKind::Points => &self.points,
        }
    }

    /// The filter state for a kind.
    pub fn state(&self, kind: LayerKind) -> &FilterState {
        match kind {
            LayerKind::Lines => &self.lines_state,
            LayerKind::Points => &self.points_state,
        }
    }

    fn state_mut(&mut self, kind: LayerKind) -> &mut FilterState {
        match kind {
            LayerKind::Lines => &mut self.lines_state,
            LayerKind::Points => &mut self.points_state,
        }
    }

    /// Flips one code's flag in the given kind's state.
    pub fn toggle(&mut self, kind: LayerKind, code: &str) {
        self.state_mut(kind).toggle(code);
    }

    /// Sets every known code of the given kind to `enabled`.
    pub fn set_all(&mut self, kind: LayerKind, enabled: bool) {
        self.state_mut(kind).set_all(enabled);
    }

    /// The features of a kind whose type code is currently enabled.
    ///
    /// Exactly the features whose code maps to `true`; a feature whose code
    /// has no entry is excluded.
    pub fn filtered(&self, kind: LayerKind) -> Vec<&Feature> {
        let state = self.state(kind);
        self.collection(kind)
            .iter()
            .filter(|f| state.is_enabled(f.type_code()))
            .collect()
    }

    /// Owned copy of the filtered view, for export or rendering.
    pub fn filtered_collection(&self, kind: LayerKind) -> FeatureCollection {
        FeatureCollection::from_features(
            self.filtered(kind).into_iter().cloned().collect(),
        )
    }
}
