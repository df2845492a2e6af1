//! Data Transfer Objects for the HTTP API.
//!
//! Domain types already derive Serialize/Deserialize and are returned as-is
//! where possible. This is also the only place where presentation units
//! (square feet) are applied.

use serde::{Deserialize, Serialize};

use crate::models::units::{per_sqm_to_per_sqft, sqm_to_sqft};
use crate::models::{
    Amenities, CityStatistics, DocumentSummary, FloodAssessment, LightningRisk, NearbyArea,
    Polygon, PriceBand, Report, ZoningRule,
};
use crate::services::{LabelledParcel, ReportOverlays, ReportRequest};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    pub model_version: String,
    pub model_trained: bool,
}

/// Query parameters for document listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentListQuery {
    #[serde(default)]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub total: usize,
}

/// Response for a processed upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentUploadResponse {
    pub message: String,
    pub document: DocumentSummary,
    pub rules: Vec<ZoningRule>,
    pub text_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentDeleteResponse {
    pub message: String,
    pub document: DocumentSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitiesResponse {
    pub cities: Vec<CityStatistics>,
}

/// Labelled parcels contributed as training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSamplesRequest {
    pub parcels: Vec<LabelledParcel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSamplesResponse {
    pub added: usize,
    pub total_samples: usize,
}

/// Request body for `POST /v1/zoning/predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub polygon: Polygon,
    #[serde(default)]
    pub nearby_areas: Vec<NearbyArea>,
    #[serde(default)]
    pub city: Option<String>,
}

/// Request body for `POST /v1/reports`.
///
/// Overlay fields are optional; any that are omitted are filled by the
/// server's data providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub polygon: Polygon,
    #[serde(default)]
    pub nearby_areas: Vec<NearbyArea>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub current_aqi: Option<f64>,
    /// Overrides the polygon area when positive.
    #[serde(default)]
    pub area_sqm: Option<f64>,
    #[serde(default)]
    pub amenities: Option<Amenities>,
    #[serde(default)]
    pub aqi_forecast: Option<Vec<u32>>,
    #[serde(default)]
    pub lightning_risk: Option<LightningRisk>,
    #[serde(default)]
    pub road_condition: Option<String>,
    #[serde(default)]
    pub flood_risk: Option<FloodAssessment>,
}

impl From<CreateReportRequest> for ReportRequest {
    fn from(req: CreateReportRequest) -> Self {
        ReportRequest {
            polygon: req.polygon,
            nearby_areas: req.nearby_areas,
            city: req.city,
            current_aqi: req.current_aqi,
            overlays: ReportOverlays {
                amenities: req.amenities,
                aqi_forecast: req.aqi_forecast,
                lightning_risk: req.lightning_risk,
                road_condition: req.road_condition,
                flood_risk: req.flood_risk,
                area_sqm: req.area_sqm,
            },
        }
    }
}

/// A report plus its square-foot presentation figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: Report,
    pub area_sqft: f64,
    pub price_per_sqft: PriceBand,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        let band = &report.pricing.price_per_sqm;
        let price_per_sqft = PriceBand {
            min: round2(per_sqm_to_per_sqft(band.min)),
            max: round2(per_sqm_to_per_sqft(band.max)),
            average: round2(per_sqm_to_per_sqft(band.average)),
            currency: band.currency.clone(),
        };
        Self {
            area_sqft: round2(sqm_to_sqft(report.parcel_info.area_sqm)),
            price_per_sqft,
            report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_request_defaults() {
        let req: CreateReportRequest = serde_json::from_value(serde_json::json!({
            "polygon": [[77.59, 12.97], [77.60, 12.97], [77.60, 12.98]],
            "city": "Bangalore",
            "areaSqm": 1200.0,
            "roadCondition": "Surface: Asphalt"
        }))
        .unwrap();

        let request: ReportRequest = req.into();
        assert_eq!(request.polygon.len(), 3);
        assert!(request.nearby_areas.is_empty());
        assert_eq!(request.overlays.area_sqm, Some(1200.0));
        assert_eq!(request.overlays.road_condition.as_deref(), Some("Surface: Asphalt"));
        assert!(request.overlays.amenities.is_none());
    }

    #[test]
    fn test_predict_request_reads_nearby_type_field() {
        let req: PredictRequest = serde_json::from_value(serde_json::json!({
            "polygon": [[0.0, 0.0], [0.001, 0.0], [0.001, 0.001]],
            "nearbyAreas": [{"type": "commercial", "value": 12000.0}]
        }))
        .unwrap();
        assert_eq!(req.nearby_areas[0].zone_type.as_deref(), Some("commercial"));
        assert!(req.city.is_none());
    }
}
