//! Neighbouring parcel records used as predictive context.

use serde::{Deserialize, Serialize};

use super::zoning::ZoneType;

/// A neighbouring parcel observed around the subject parcel.
///
/// Every field is optional at the boundary; the feature extractor documents
/// the default applied to each missing field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Observed land value per square meter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Raw zone label as supplied by the caller.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// How a nearby record's zone label resolves against the known zone types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NearbyZone {
    Known(ZoneType),
    /// A label was given but matches none of the known zone types.
    Unknown,
}

impl NearbyArea {
    /// Convenience constructor used by tests and fixtures.
    pub fn new(zone_type: ZoneType, value: f64, far: f64, lng: f64, lat: f64) -> Self {
        Self {
            name: None,
            value: Some(value),
            zone_type: Some(zone_type.as_str().to_string()),
            far: Some(far),
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// Resolve the zone label. A missing label counts as residential.
    pub fn zone(&self) -> NearbyZone {
        match &self.zone_type {
            None => NearbyZone::Known(ZoneType::Residential),
            Some(label) => label
                .parse::<ZoneType>()
                .map(NearbyZone::Known)
                .unwrap_or(NearbyZone::Unknown),
        }
    }

    /// Coordinates as `(lng, lat)` when both are present.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lng, self.lat) {
            (Some(lng), Some(lat)) => Some((lng, lat)),
            _ => None,
        }
    }
}
