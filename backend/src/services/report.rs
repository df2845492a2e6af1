//! Report assembly.
//!
//! [`assemble_report`] runs the whole pipeline for one parcel: features,
//! zone prediction, buildability, scenarios, pricing and traffic, merged
//! with the externally supplied overlays. Absent overlays are replaced by
//! the fixed fallback blocks from [`super::risk`], so a report is always
//! complete.

use chrono::Utc;

use crate::algorithms::geometry::{area_sqm, centroid, perimeter_m};
use crate::catalog::CityCatalog;
use crate::error::AnalysisResult;
use crate::models::{
    Amenities, AmenityCategory, BuildabilityResult, FeatureVector, FloodAssessment,
    FloodRiskLevel, LightningRisk, LightningRiskLevel, NearbyArea, ParcelInfo, Polygon,
    Recommendation, RecommendationKind, Report, ZonePrediction, ZoneType, ZoningAttributes,
};
use crate::services::buildability::score_buildability;
use crate::services::features::{average_nearby_value, extract_features};
use crate::services::predictor::ZonePredictor;
use crate::services::pricing::{pricing, traffic_impact};
use crate::services::risk::{
    fallback_amenities, fallback_aqi_forecast, fallback_flood_assessment,
    fallback_lightning_risk, UNKNOWN_ROAD_CONDITION,
};
use crate::services::scenarios::generate_scenarios;

/// Length of the fallback AQI forecast.
pub const DEFAULT_FORECAST_DAYS: usize = 30;

/// Buildability score above which development potential is called out.
const STRONG_BUILDABILITY: u32 = 75;
/// Nearest-transport distance (km) that counts as premium connectivity.
const PREMIUM_TRANSPORT_KM: f64 = 1.5;

/// Externally supplied report inputs. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ReportOverlays {
    pub amenities: Option<Amenities>,
    pub aqi_forecast: Option<Vec<u32>>,
    pub lightning_risk: Option<LightningRisk>,
    pub road_condition: Option<String>,
    pub flood_risk: Option<FloodAssessment>,
    /// Overrides the polygon area (square meters) when positive.
    pub area_sqm: Option<f64>,
}

fn recommendation(kind: RecommendationKind, title: &str, description: &str) -> Recommendation {
    Recommendation {
        kind,
        title: title.to_string(),
        description: description.to_string(),
    }
}

/// Advice derived from the assembled report sections, in a fixed order.
/// "Market Timing" is always present and always last.
pub fn recommendations(
    attributes: &ZoningAttributes,
    buildability: &BuildabilityResult,
    amenities: &Amenities,
    lightning: &LightningRisk,
    flood: &FloodAssessment,
) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if buildability.score > STRONG_BUILDABILITY {
        out.push(recommendation(
            RecommendationKind::Positive,
            "Excellent Development Potential",
            "This site shows strong indicators for development with good zoning compliance and amenity access.",
        ));
    }

    if amenities
        .nearest(AmenityCategory::Transport)
        .is_some_and(|km| km < PREMIUM_TRANSPORT_KM)
    {
        out.push(recommendation(
            RecommendationKind::Positive,
            "Premium Metro Connectivity",
            "Proximity to metro station significantly enhances property value and marketability.",
        ));
    }

    if attributes.zone_type == ZoneType::Commercial {
        out.push(recommendation(
            RecommendationKind::Info,
            "Commercial Zoning Advantage",
            "Commercial zoning allows for higher FAR and diverse use cases, maximizing returns.",
        ));
    }

    if lightning.risk_level == LightningRiskLevel::High {
        out.push(recommendation(
            RecommendationKind::Warning,
            "Lightning Protection Required",
            "Budget for a lightning protection system designed to IS/IEC 62305 before occupancy.",
        ));
    }

    if matches!(
        flood.current.risk_level,
        FloodRiskLevel::High | FloodRiskLevel::Critical
    ) {
        out.push(recommendation(
            RecommendationKind::Warning,
            "Flood Mitigation Required",
            "Raise plinth levels and provide stormwater drainage sized for the projected flood depth.",
        ));
    }

    out.push(recommendation(
        RecommendationKind::Info,
        "Market Timing",
        "Current market conditions favor phased development with focus on quality amenities.",
    ));

    out
}

/// Build the report from an already computed prediction.
///
/// `features` must come from the same `polygon` and `nearby`; the price
/// band uses only observed neighbour values, never feature defaults.
pub fn build_report(
    polygon: &Polygon,
    nearby: &[NearbyArea],
    prediction: ZonePrediction,
    overlays: ReportOverlays,
    city: &str,
) -> AnalysisResult<Report> {
    let city = CityCatalog::canonical_key(city);
    let area = overlays
        .area_sqm
        .filter(|a| a.is_finite() && *a > 0.0)
        .unwrap_or_else(|| area_sqm(polygon));
    let attributes = prediction.attributes;
    let zone = attributes.zone_type;

    let amenities = overlays.amenities.unwrap_or_else(fallback_amenities);
    let lightning_risk = overlays.lightning_risk.unwrap_or_else(fallback_lightning_risk);
    let flood_risk = overlays.flood_risk.unwrap_or_else(fallback_flood_assessment);

    let buildability = score_buildability(&attributes, area, &amenities, &city);
    let scenarios = generate_scenarios(area, &attributes)?;
    let recommendations =
        recommendations(&attributes, &buildability, &amenities, &lightning_risk, &flood_risk);

    Ok(Report {
        generated_at: Utc::now(),
        parcel_info: ParcelInfo {
            area_sqm: area,
            perimeter_m: perimeter_m(polygon),
            centroid: centroid(polygon),
            coordinates: polygon.clone(),
        },
        pricing: pricing(&city, zone, area, average_nearby_value(nearby)),
        traffic: traffic_impact(area, zone),
        zoning_details: attributes,
        predicted_far: prediction.predicted_far,
        amenities,
        buildability,
        scenarios,
        ml_confidence: prediction.confidence,
        model_version: prediction.model_version,
        recommendations,
        aqi_forecast: overlays
            .aqi_forecast
            .unwrap_or_else(|| fallback_aqi_forecast(DEFAULT_FORECAST_DAYS)),
        lightning_risk,
        road_condition: overlays
            .road_condition
            .unwrap_or_else(|| UNKNOWN_ROAD_CONDITION.to_string()),
        flood_risk,
        city,
    })
}

/// Full pipeline: extract features, predict, then [`build_report`].
pub fn assemble_report(
    predictor: &ZonePredictor,
    polygon: &Polygon,
    nearby: &[NearbyArea],
    overlays: ReportOverlays,
    city: &str,
) -> AnalysisResult<Report> {
    let features: FeatureVector = extract_features(polygon, nearby);
    let prediction = predictor.predict(&features)?;
    build_report(polygon, nearby, prediction, overlays, city)
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;
