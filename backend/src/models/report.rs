//! The parcel development report and its sections.
//!
//! Every area in this module is in square meters and every distance in
//! kilometers; presentation units are applied by the HTTP layer only.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amenity::Amenities;
use super::geometry::{LngLat, Polygon};
use super::risk::{FloodAssessment, LightningRisk};
use super::zoning::ZoningAttributes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelInfo {
    pub area_sqm: f64,
    pub perimeter_m: f64,
    pub centroid: LngLat,
    pub coordinates: Polygon,
}

/// Price per square meter, in the city's currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    Stable,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outlook {
    Positive,
    Stable,
    Cautious,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrend {
    pub trend: TrendDirection,
    /// Annual growth, formatted like `"8.5%"`.
    pub growth_rate: String,
    pub outlook: Outlook,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub price_per_sqm: PriceBand,
    pub estimated_value: ValueRange,
    pub market_trend: MarketTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorStatus {
    Excellent,
    Good,
    Fair,
    Limited,
}

/// Letter grade derived from a buildability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Self::APlus
        } else if score >= 80 {
            Self::A
        } else if score >= 70 {
            Self::BPlus
        } else if score >= 60 {
            Self::B
        } else if score >= 50 {
            Self::CPlus
        } else {
            Self::C
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildabilityFactor {
    pub name: String,
    pub score: u32,
    pub status: FactorStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildabilityResult {
    pub score: u32,
    pub grade: Grade,
    pub factors: Vec<BuildabilityFactor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub name: String,
    pub description: String,
    pub far: f64,
    pub floors: u32,
    #[serde(rename = "builtArea")]
    pub built_area_sqm: f64,
    #[serde(rename = "openSpace")]
    pub open_space_sqm: f64,
    pub estimated_cost: f64,
    pub roi: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Positive,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Congestion {
    pub level: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficImpact {
    pub daily_trips: u32,
    pub peak_hour_trips: u32,
    pub unit_count: u32,
    pub unit_type: String,
    pub congestion: Congestion,
}

/// Full development-potential report for one parcel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub city: String,
    pub parcel_info: ParcelInfo,
    pub pricing: Pricing,
    pub zoning_details: ZoningAttributes,
    pub predicted_far: f64,
    pub amenities: Amenities,
    pub buildability: BuildabilityResult,
    pub scenarios: Vec<Scenario>,
    pub ml_confidence: f64,
    pub model_version: String,
    pub recommendations: Vec<Recommendation>,
    pub aqi_forecast: Vec<u32>,
    pub lightning_risk: LightningRisk,
    pub road_condition: String,
    pub flood_risk: FloodAssessment,
    pub traffic: TrafficImpact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_score(100), Grade::APlus);
        assert_eq!(Grade::from_score(90), Grade::APlus);
        assert_eq!(Grade::from_score(89), Grade::A);
        assert_eq!(Grade::from_score(70), Grade::BPlus);
        assert_eq!(Grade::from_score(60), Grade::B);
        assert_eq!(Grade::from_score(50), Grade::CPlus);
        assert_eq!(Grade::from_score(49), Grade::C);
        assert_eq!(Grade::from_score(0), Grade::C);
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::BPlus).unwrap(), "\"B+\"");
        assert_eq!(Grade::APlus.to_string(), "A+");
    }

    #[test]
    fn test_scenario_wire_names() {
        let scenario = Scenario {
            name: "Maximum".into(),
            description: "Full FAR utilization for maximum returns".into(),
            far: 2.5,
            floors: 3,
            built_area_sqm: 2500.0,
            open_space_sqm: 250.0,
            estimated_cost: 87_500_000.0,
            roi: "18-22%".into(),
        };
        let json = serde_json::to_value(&scenario).unwrap();
        assert_eq!(json["builtArea"], 2500.0);
        assert_eq!(json["openSpace"], 250.0);
        assert_eq!(json["estimatedCost"], 87_500_000.0);
    }

    #[test]
    fn test_recommendation_uses_type_key() {
        let rec = Recommendation {
            kind: RecommendationKind::Warning,
            title: "Flood Mitigation Required".into(),
            description: String::new(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "warning");
    }
}
