//! GeoJSON feature model for the two Vicmap Transport layers.
//!
//! The feature service returns GeoJSON-like FeatureCollections. The core
//! pipeline only inspects `feature_type_code` and the geometry kind; every
//! other property is carried as an opaque pass-through payload so the
//! presentation layer can still display it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The two feature collection kinds served by the transport feature service.
///
/// `Lines` covers railway alignments (tracks, tunnels, bridges);
/// `Points` covers infrastructure points (stations, stops).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Line geometry layer (railway alignments)
    Lines,
    /// Point geometry layer (stations and other infrastructure points)
    Points,
}

impl LayerKind {
    /// All layer kinds, in fetch order.
    pub const ALL: [LayerKind; 2] = [LayerKind::Lines, LayerKind::Points];

    /// Stable string key for this kind.
    ///
    /// Used for cache file names and log fields.
    pub fn key(&self) -> &'static str {
        match self {
            LayerKind::Lines => "lines",
            LayerKind::Points => "points",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Geometry of a single feature.
///
/// Only the geometry types the Vicmap Transport layers actually emit are
/// modeled; anything else is rejected at parse time as an invalid response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Single position (stations, stops)
    Point(Vec<f64>),
    /// Single line string (most railway segments)
    LineString(Vec<Vec<f64>>),
    /// Multiple line strings under one feature
    MultiLineString(Vec<Vec<Vec<f64>>>),
}

impl Geometry {
    /// Returns true for point geometry.
    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point(_))
    }

    /// Returns true for line or multi-line geometry.
    pub fn is_line(&self) -> bool {
        matches!(self, Geometry::LineString(_) | Geometry::MultiLineString(_))
    }
}

/// Property bag of a feature.
///
/// `feature_type_code` is the only field the filtering core reads. `name` is
/// kept as a typed field for display in summaries. Everything else the service
/// returns (gauge, condition, shape length, ...) lands in `extra` and survives
/// re-serialization untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    /// Classification code, e.g. `railway`, `rail_station`, `tunnel_rail_o`
    pub feature_type_code: String,
    /// Human-readable name; frequently null in the source data
    #[serde(default)]
    pub name: Option<String>,
    /// Remaining source properties, passed through for display only
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl FeatureProperties {
    /// Creates a property bag with just a type code.
    pub fn new(feature_type_code: impl Into<String>) -> Self {
        Self {
            feature_type_code: feature_type_code.into(),
            name: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// One geographic feature: geometry plus properties.
///
/// The `id` is assigned by the source service and is not unique across the
/// two layers, so it must never be used as a cross-layer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Source-assigned integer id (unique within a layer only)
    #[serde(default)]
    pub id: Option<i64>,
    /// Feature geometry
    pub geometry: Geometry,
    /// Feature properties
    pub properties: FeatureProperties,
}

impl Feature {
    /// Shorthand for the feature's type code.
    pub fn type_code(&self) -> &str {
        &self.properties.feature_type_code
    }
}

/// An ordered sequence of features of one geometry kind.
///
/// Collections are immutable once fetched and replaced wholesale on refetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Features in source order
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Creates a collection from a feature vector.
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Number of features in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the collection holds no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterates the features in source order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// The set of distinct `feature_type_code` values observed in this
    /// collection, in sorted order.
    pub fn distinct_type_codes(&self) -> BTreeSet<String> {
        self.features
            .iter()
            .map(|f| f.properties.feature_type_code.clone())
            .collect()
    }

    /// Renders the collection as a GeoJSON `FeatureCollection` value,
    /// restoring the `"type"` tags the internal model drops.
    pub fn to_geojson(&self) -> serde_json::Value {
        let features: Vec<serde_json::Value> = self
            .features
            .iter()
            .map(|f| {
                let mut obj = serde_json::Map::new();
                obj.insert("type".into(), "Feature".into());
                if let Some(id) = f.id {
                    obj.insert("id".into(), id.into());
                }
                // Geometry and properties serialize infallibly: all field
                // types are plain JSON values.
                obj.insert(
                    "geometry".into(),
                    serde_json::to_value(&f.geometry).unwrap_or(serde_json::Value::Null),
                );
                obj.insert(
                    "properties".into(),
                    serde_json::to_value(&f.properties).unwrap_or(serde_json::Value::Null),
                );
                serde_json::Value::Object(obj)
            })
            .collect();

        serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_feature(code: &str, id: i64) -> Feature {
        Feature {
            id: Some(id),
            geometry: Geometry::LineString(vec![vec![144.95, -37.81], vec![144.96, -37.82]]),
            properties: FeatureProperties::new(code),
        }
    }

    #[test]
    fn test_layer_kind_keys() {
        assert_eq!(LayerKind::Lines.key(), "lines");
        assert_eq!(LayerKind::Points.key(), "points");
        assert_eq!(format!("{}", LayerKind::Points), "points");
    }

    #[test]
    fn test_parse_line_feature_collection() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": 42,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[144.9, -37.8], [145.0, -37.9]]
                    },
                    "properties": {
                        "feature_type_code": "railway",
                        "name": "Lilydale",
                        "rail_gauge": "broad",
                        "Shape__Length": 1234.5
                    }
                }
            ]
        }"#;

        let collection: FeatureCollection = serde_json::from_str(json).unwrap();
        assert_eq!(collection.len(), 1);

        let feature = &collection.features[0];
        assert_eq!(feature.id, Some(42));
        assert_eq!(feature.type_code(), "railway");
        assert_eq!(feature.properties.name.as_deref(), Some("Lilydale"));
        assert!(feature.geometry.is_line());
        // Unmodeled properties land in the pass-through map
        assert_eq!(
            feature.properties.extra.get("rail_gauge"),
            Some(&serde_json::Value::String("broad".into()))
        );
    }

    #[test]
    fn test_parse_point_feature_null_name() {
        let json = r#"{
            "type": "Feature",
            "id": 7,
            "geometry": { "type": "Point", "coordinates": [144.97, -37.82] },
            "properties": { "feature_type_code": "rail_station", "name": null }
        }"#;

        let feature: Feature = serde_json::from_str(json).unwrap();
        assert!(feature.geometry.is_point());
        assert!(feature.properties.name.is_none());
    }

    #[test]
    fn test_unknown_geometry_type_rejected() {
        let json = r#"{
            "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0]]] },
            "properties": { "feature_type_code": "railway" }
        }"#;

        let result: Result<Feature, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_distinct_type_codes_sorted_and_deduplicated() {
        let collection = FeatureCollection::from_features(vec![
            line_feature("railway", 1),
            line_feature("tunnel_rail_o", 2),
            line_feature("railway", 3),
        ]);

        let codes: Vec<String> = collection.distinct_type_codes().into_iter().collect();
        assert_eq!(codes, vec!["railway".to_string(), "tunnel_rail_o".to_string()]);
    }

    #[test]
    fn test_properties_pass_through_round_trip() {
        let json = r#"{
            "id": 3,
            "geometry": { "type": "Point", "coordinates": [145.0, -37.8] },
            "properties": {
                "feature_type_code": "tram_station",
                "name": "Domain",
                "physical_condition": "operational"
            }
        }"#;

        let feature: Feature = serde_json::from_str(json).unwrap();
        let reserialized = serde_json::to_value(&feature).unwrap();

        assert_eq!(
            reserialized["properties"]["physical_condition"],
            serde_json::Value::String("operational".into())
        );
        let round_tripped: Feature = serde_json::from_value(reserialized).unwrap();
        assert_eq!(round_tripped, feature);
    }

    #[test]
    fn test_to_geojson_restores_type_tags() {
        let collection = FeatureCollection::from_features(vec![line_feature("railway", 9)]);
        let geojson = collection.to_geojson();

        assert_eq!(geojson["type"], "FeatureCollection");
        assert_eq!(geojson["features"][0]["type"], "Feature");
        assert_eq!(geojson["features"][0]["id"], 9);
        assert_eq!(geojson["features"][0]["geometry"]["type"], "LineString");
    }
}
