//! Nearby amenities grouped by category.

use qtty::Kilometers;
use serde::{Deserialize, Serialize};

/// A named point of interest near the parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    pub name: String,
    /// Distance from the parcel centroid. Entries without a distance are
    /// ignored by proximity scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<Kilometers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub walking_time_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driving_time_min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl Amenity {
    pub fn new(name: impl Into<String>, distance_km: f64) -> Self {
        Self {
            name: name.into(),
            distance_km: Some(Kilometers::new(distance_km)),
            walking_time_min: None,
            driving_time_min: None,
            lat: None,
            lng: None,
        }
    }

    pub fn with_travel_times(mut self, walking_min: u32, driving_min: u32) -> Self {
        self.walking_time_min = Some(walking_min);
        self.driving_time_min = Some(driving_min);
        self
    }

    /// Distance in km when present and non-negative.
    pub fn distance(&self) -> Option<f64> {
        self.distance_km
            .map(|d| d.value())
            .filter(|d| d.is_finite() && *d >= 0.0)
    }
}

/// Amenity category keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmenityCategory {
    Schools,
    Hospitals,
    Transport,
    Parks,
}

impl AmenityCategory {
    pub const ALL: [AmenityCategory; 4] = [
        AmenityCategory::Schools,
        AmenityCategory::Hospitals,
        AmenityCategory::Transport,
        AmenityCategory::Parks,
    ];
}

/// Amenities by category, each list sorted ascending by distance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Amenities {
    #[serde(default)]
    pub schools: Vec<Amenity>,
    #[serde(default)]
    pub hospitals: Vec<Amenity>,
    #[serde(default)]
    pub transport: Vec<Amenity>,
    #[serde(default)]
    pub parks: Vec<Amenity>,
}

impl Amenities {
    pub fn category(&self, category: AmenityCategory) -> &[Amenity] {
        match category {
            AmenityCategory::Schools => &self.schools,
            AmenityCategory::Hospitals => &self.hospitals,
            AmenityCategory::Transport => &self.transport,
            AmenityCategory::Parks => &self.parks,
        }
    }

    /// Closest entry of a category that carries a distance.
    pub fn nearest(&self, category: AmenityCategory) -> Option<f64> {
        self.category(category)
            .iter()
            .filter_map(Amenity::distance)
            .min_by(|a, b| a.total_cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amenity_serializes_camel_case() {
        let amenity = Amenity::new("Metro Stop", 1.5).with_travel_times(18, 3);
        let json = serde_json::to_value(&amenity).unwrap();
        assert_eq!(json["distanceKm"], 1.5);
        assert_eq!(json["walkingTimeMin"], 18);
        assert_eq!(json["drivingTimeMin"], 3);
        assert!(json.get("lat").is_none());
    }

    #[test]
    fn test_missing_distance_is_tolerated() {
        let amenities: Amenities =
            serde_json::from_str(r#"{"schools": [{"name": "No Distance School"}]}"#).unwrap();
        assert_eq!(amenities.schools.len(), 1);
        assert!(amenities.schools[0].distance().is_none());
        assert!(amenities.transport.is_empty());
    }

    #[test]
    fn test_nearest_skips_entries_without_distance() {
        let mut amenities = Amenities::default();
        amenities.transport = vec![
            Amenity::new("Central Station", 3.0),
            Amenity {
                distance_km: None,
                ..Amenity::new("Unknown Stop", 0.0)
            },
            Amenity::new("Bus Terminal", 0.8),
        ];
        assert_eq!(amenities.nearest(AmenityCategory::Transport), Some(0.8));
        assert_eq!(amenities.nearest(AmenityCategory::Parks), None);
    }
}
