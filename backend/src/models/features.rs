//! Named numeric feature vectors and labelled training samples.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::zoning::ZoneType;
use crate::error::{AnalysisError, AnalysisResult};

pub const AREA: &str = "area";
pub const PERIMETER: &str = "perimeter";
pub const COMPACTNESS: &str = "compactness";
pub const CENTROID_LNG: &str = "centroid_lng";
pub const CENTROID_LAT: &str = "centroid_lat";
pub const AVG_NEARBY_VALUE: &str = "avg_nearby_value";
pub const NEARBY_RESIDENTIAL_COUNT: &str = "nearby_residential_count";
pub const NEARBY_COMMERCIAL_COUNT: &str = "nearby_commercial_count";
pub const NEARBY_INDUSTRIAL_COUNT: &str = "nearby_industrial_count";
pub const NEARBY_MIXED_COUNT: &str = "nearby_mixed_count";
pub const AVG_NEARBY_FAR: &str = "avg_nearby_far";
pub const DIST_TO_COMMERCIAL: &str = "dist_to_commercial";

/// Canonical feature order produced by the feature extractor.
pub const FEATURE_NAMES: [&str; 12] = [
    AREA,
    PERIMETER,
    COMPACTNESS,
    CENTROID_LNG,
    CENTROID_LAT,
    AVG_NEARBY_VALUE,
    NEARBY_RESIDENTIAL_COUNT,
    NEARBY_COMMERCIAL_COUNT,
    NEARBY_INDUSTRIAL_COUNT,
    NEARBY_MIXED_COUNT,
    AVG_NEARBY_FAR,
    DIST_TO_COMMERCIAL,
];

/// Count feature name for a zone type.
pub fn nearby_count_name(zone: ZoneType) -> &'static str {
    match zone {
        ZoneType::Residential => NEARBY_RESIDENTIAL_COUNT,
        ZoneType::Commercial => NEARBY_COMMERCIAL_COUNT,
        ZoneType::Industrial => NEARBY_INDUSTRIAL_COUNT,
        ZoneType::Mixed => NEARBY_MIXED_COUNT,
    }
}

/// Insertion-ordered mapping from feature name to value.
///
/// Order is part of the contract: a trained predictor records the names at
/// fit time and replays them through [`FeatureVector::ordered_values`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature, keeping its original position if it already exists.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values in exactly the given name order.
    ///
    /// A missing name is an [`AnalysisError::InsufficientData`]; values are
    /// never zero-filled.
    pub fn ordered_values(&self, names: &[String]) -> AnalysisResult<Vec<f64>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| AnalysisError::insufficient_data(name.as_str()))
            })
            .collect()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct FeatureVectorVisitor;

impl<'de> Visitor<'de> for FeatureVectorVisitor {
    type Value = FeatureVector;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of feature names to numbers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut features = FeatureVector::new();
        while let Some((name, value)) = access.next_entry::<String, f64>()? {
            features.insert(name, value);
        }
        Ok(features)
    }
}

impl<'de> Deserialize<'de> for FeatureVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FeatureVectorVisitor)
    }
}

/// One labelled row for the zone classifier and FAR regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub city: String,
    pub features: FeatureVector,
    pub zone_type: ZoneType,
    pub far: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut fv = FeatureVector::new().with("b", 1.0).with("a", 2.0);
        fv.insert("b", 3.0);
        assert_eq!(fv.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(fv.get("b"), Some(3.0));
    }

    #[test]
    fn test_ordered_values_replays_given_order() {
        let fv = FeatureVector::new().with("x", 1.0).with("y", 2.0);
        let names = vec!["y".to_string(), "x".to_string()];
        assert_eq!(fv.ordered_values(&names).unwrap(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_missing_feature_is_fatal() {
        let fv = FeatureVector::new().with("x", 1.0);
        let names = vec!["x".to_string(), "area".to_string()];
        match fv.ordered_values(&names) {
            Err(AnalysisError::InsufficientData { feature }) => assert_eq!(feature, "area"),
            other => panic!("expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_json_preserves_insertion_order() {
        let fv = FeatureVector::new()
            .with("zeta", 1.0)
            .with("alpha", 2.0)
            .with("mid", 3.0);
        let json = serde_json::to_string(&fv).unwrap();
        assert_eq!(json, r#"{"zeta":1.0,"alpha":2.0,"mid":3.0}"#);

        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }
}
