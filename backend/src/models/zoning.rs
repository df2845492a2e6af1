//! Zoning classification types.
//!
//! [`ZoningAttributes`] are always derived from a [`ZoneType`] through the
//! static table in [`ZoningAttributes::for_zone`]; a predicted continuous FAR
//! travels alongside them in [`ZonePrediction`] and never rewrites the ranges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Land-use classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Residential,
    Commercial,
    Industrial,
    Mixed,
}

impl ZoneType {
    /// All zone types in their canonical order.
    pub const ALL: [ZoneType; 4] = [
        ZoneType::Residential,
        ZoneType::Commercial,
        ZoneType::Industrial,
        ZoneType::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Residential => "residential",
            ZoneType::Commercial => "commercial",
            ZoneType::Industrial => "industrial",
            ZoneType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "residential" => Ok(Self::Residential),
            "commercial" => Ok(Self::Commercial),
            "industrial" => Ok(Self::Industrial),
            "mixed" | "mixed-use" | "mixed_use" => Ok(Self::Mixed),
            _ => Err(format!("Unknown zone type: {}", s)),
        }
    }
}

/// Regulatory envelope for a zone type, expressed as display ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoningAttributes {
    pub zone_type: ZoneType,
    pub far: String,
    pub max_height: String,
    pub ground_coverage: String,
    pub setback: String,
    pub parking: String,
    pub land_use: Vec<String>,
    pub restrictions: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ZoningAttributes {
    /// Static attribute lookup for a zone type.
    pub fn for_zone(zone_type: ZoneType) -> Self {
        let (far, max_height, ground_coverage, setback, parking, land_use, restrictions) =
            match zone_type {
                ZoneType::Residential => (
                    "1.5 - 2.5",
                    "15m - 45m",
                    "40% - 60%",
                    "3m - 6m",
                    "1 per 100 sqm",
                    strings(&["Apartments", "Villas", "Gated Communities", "Row Houses"]),
                    strings(&[
                        "No commercial activities",
                        "Noise compliance",
                        "Green space requirements",
                    ]),
                ),
                ZoneType::Commercial => (
                    "2.5 - 3.5",
                    "45m - 60m",
                    "50% - 70%",
                    "6m - 9m",
                    "1 per 50 sqm",
                    strings(&["Office Buildings", "Shopping Malls", "Retail Stores", "Business Parks"]),
                    strings(&[
                        "Fire safety compliance",
                        "Parking requirements",
                        "Signage regulations",
                    ]),
                ),
                ZoneType::Industrial => (
                    "1.5 - 2.0",
                    "15m - 30m",
                    "60% - 75%",
                    "9m - 12m",
                    "1 per 75 sqm",
                    strings(&["Factories", "Warehouses", "Manufacturing Units", "Storage Facilities"]),
                    strings(&[
                        "Environmental clearance",
                        "No hazardous materials",
                        "Pollution control",
                    ]),
                ),
                ZoneType::Mixed => (
                    "2.0 - 3.0",
                    "30m - 50m",
                    "50% - 65%",
                    "4.5m - 7.5m",
                    "1 per 65 sqm",
                    strings(&[
                        "Mixed-use Towers",
                        "Live-Work Spaces",
                        "Retail + Apartments",
                        "Office + Residential",
                    ]),
                    strings(&["Mixed-use compliance", "Separate entrances", "Noise mitigation"]),
                ),
            };

        Self {
            zone_type,
            far: far.to_string(),
            max_height: max_height.to_string(),
            ground_coverage: ground_coverage.to_string(),
            setback: setback.to_string(),
            parking: parking.to_string(),
            land_use,
            restrictions,
        }
    }

    /// Upper bound of the FAR range, if it parses.
    pub fn max_far(&self) -> Option<f64> {
        range_upper_bound(&self.far)
    }

    /// Upper bound of the ground coverage range as a fraction in `[0, 1]`.
    pub fn max_coverage_fraction(&self) -> Option<f64> {
        range_upper_bound(&self.ground_coverage).map(|pct| pct / 100.0)
    }
}

/// Parse the upper bound out of a display range such as `"50% - 70%"`.
///
/// The text is split on `-`, the last segment is stripped of any unit suffix
/// and parsed as a number. A bare value without a dash parses as itself.
pub fn range_upper_bound(range: &str) -> Option<f64> {
    let upper = range.rsplit('-').next()?.trim();
    let numeric = upper.trim_end_matches(|c: char| !c.is_ascii_digit() && c != '.');
    if numeric.is_empty() {
        return None;
    }
    numeric.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A partial zoning record extracted from one sentence of regulatory text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoningRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<ZoneType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub far: Option<f64>,
    /// Meters (or the unit the sentence used; the unit token is not kept).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    /// Percent of the plot footprint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_coverage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setback: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parking: Option<String>,
    pub source_sentence: String,
}

impl ZoningRule {
    /// Number of extracted fields, not counting the source sentence.
    pub fn field_count(&self) -> usize {
        [
            self.zone_type.is_some(),
            self.far.is_some(),
            self.max_height.is_some(),
            self.ground_coverage.is_some(),
            self.setback.is_some(),
            self.parking.is_some(),
        ]
        .into_iter()
        .filter(|found| *found)
        .count()
    }
}

/// Output of a zoning prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePrediction {
    pub attributes: ZoningAttributes,
    pub confidence: f64,
    pub model_version: String,
    /// Continuous FAR estimate; advisory context only.
    pub predicted_far: f64,
}
