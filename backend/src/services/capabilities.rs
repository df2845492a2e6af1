//! Capability interfaces the analysis core consumes.
//!
//! Statistical learners are synchronous and owned by the
//! [`ZonePredictor`](super::predictor::ZonePredictor). Data providers (amenities,
//! road condition, air quality, flood, lightning) are async because real
//! implementations call out to external services; the built-in defaults in
//! [`super::risk`] answer immediately.

use async_trait::async_trait;

use crate::error::AnalysisResult;
use crate::models::{
    Amenities, FloodRisk, FutureFloodRisk, LightningRisk, WeatherSnapshot, ZoneType,
};

/// Zone-type classifier over scaled feature rows.
pub trait Classifier: Send + Sync {
    /// Fit on rows `x` with labels `y` (same length).
    fn fit(&mut self, x: &[Vec<f64>], y: &[ZoneType]) -> AnalysisResult<()>;

    /// Most likely label for one row.
    fn predict(&self, row: &[f64]) -> AnalysisResult<ZoneType>;

    /// Per-class probabilities for one row, summing to 1.
    fn predict_proba(&self, row: &[f64]) -> AnalysisResult<Vec<(ZoneType, f64)>>;
}

/// Continuous FAR regressor over scaled feature rows.
pub trait Regressor: Send + Sync {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> AnalysisResult<()>;

    fn predict(&self, row: &[f64]) -> AnalysisResult<f64>;
}

/// Nearby points of interest for a location.
///
/// Each category holds at most three entries sorted by ascending distance.
#[async_trait]
pub trait AmenityFinder: Send + Sync {
    async fn find_amenities(&self, lat: f64, lng: f64) -> AnalysisResult<Amenities>;
}

/// Free-text road condition, or the sentinel `"unknown"`.
#[async_trait]
pub trait RoadConditionProvider: Send + Sync {
    async fn road_condition(&self, lat: f64, lng: f64) -> AnalysisResult<String>;
}

/// Daily air-quality forecast.
#[async_trait]
pub trait AqiForecaster: Send + Sync {
    /// Exactly `days` predicted AQI values starting tomorrow.
    async fn forecast(&self, current_aqi: f64, days: usize) -> AnalysisResult<Vec<u32>>;
}

/// Flood risk from a weather snapshot.
#[async_trait]
pub trait FloodPredictor: Send + Sync {
    async fn current_risk(
        &self,
        weather: &WeatherSnapshot,
        lat: f64,
        lng: f64,
    ) -> AnalysisResult<FloodRisk>;

    /// Projections for future horizons, depths scaled by `risk_multiplier`.
    async fn future_risk(
        &self,
        weather: &WeatherSnapshot,
        lat: f64,
        lng: f64,
        risk_multiplier: f64,
    ) -> AnalysisResult<Vec<FutureFloodRisk>>;
}

/// Lightning exposure for a city and building type.
#[async_trait]
pub trait LightningAssessor: Send + Sync {
    async fn assess(&self, city: &str, building_type: ZoneType) -> AnalysisResult<LightningRisk>;
}
