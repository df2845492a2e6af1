//! Orchestration boundary shared by the HTTP layer and library callers.
//!
//! [`ParcelAnalysisService`] owns the repository, the zone predictor and the
//! data providers. Predictions take the predictor's read lock; training
//! holds the write lock for the whole fit, so a report never observes a
//! half-trained model.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::algorithms::geometry::centroid;
use crate::catalog::{CityCatalog, DEFAULT_CITY};
use crate::db::repository::FullRepository;
use crate::db::services as repo_services;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{
    Document, FloodAssessment, NearbyArea, Polygon, Report, TrainingSample, WeatherSnapshot,
    ZonePrediction, ZoneType,
};
use crate::services::capabilities::{
    AmenityFinder, AqiForecaster, FloodPredictor, LightningAssessor, RoadConditionProvider,
};
use crate::services::features::extract_features;
use crate::services::ingestion::{ingest, next_sequence, rules_to_training_samples};
use crate::services::predictor::{ModelConfig, TrainingReport, ZonePredictor};
use crate::services::report::{build_report, ReportOverlays};
use crate::services::risk::{
    fallback_amenities, fallback_aqi_forecast, fallback_flood_assessment,
    fallback_lightning_risk, CityLightningAssessor, FallbackAmenityFinder, HeuristicFloodPredictor,
    NoRoadData, SeasonalAqiForecaster, UNKNOWN_ROAD_CONDITION,
};

fn default_city() -> String {
    DEFAULT_CITY.to_string()
}

fn default_forecast_days() -> usize {
    30
}

fn default_current_aqi() -> f64 {
    100.0
}

/// `[report]` settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// City used when a request names none.
    #[serde(default = "default_city")]
    pub default_city: String,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
    /// AQI reading used to seed forecasts when a request has none.
    #[serde(default = "default_current_aqi")]
    pub current_aqi: f64,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            forecast_days: default_forecast_days(),
            current_aqi: default_current_aqi(),
        }
    }
}

/// External data providers consulted during report generation.
#[derive(Clone)]
pub struct Providers {
    pub amenities: Arc<dyn AmenityFinder>,
    pub road: Arc<dyn RoadConditionProvider>,
    pub aqi: Arc<dyn AqiForecaster>,
    pub flood: Arc<dyn FloodPredictor>,
    pub lightning: Arc<dyn LightningAssessor>,
}

impl Default for Providers {
    fn default() -> Self {
        Self {
            amenities: Arc::new(FallbackAmenityFinder),
            road: Arc::new(NoRoadData),
            aqi: Arc::new(SeasonalAqiForecaster),
            flood: Arc::new(HeuristicFloodPredictor),
            lightning: Arc::new(CityLightningAssessor),
        }
    }
}

/// An explicitly labelled parcel contributed as training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelledParcel {
    #[serde(default)]
    pub city: Option<String>,
    pub polygon: Polygon,
    #[serde(default)]
    pub nearby_areas: Vec<NearbyArea>,
    pub zone_type: ZoneType,
    pub far: f64,
}

/// Inputs for one report.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub polygon: Polygon,
    pub nearby_areas: Vec<NearbyArea>,
    pub city: Option<String>,
    pub current_aqi: Option<f64>,
    /// Caller-supplied overlays; providers fill only the absent ones.
    pub overlays: ReportOverlays,
}

/// Flood-model weather inputs for a city in a calendar month.
pub fn weather_snapshot(city: &str, month: u32) -> WeatherSnapshot {
    let climate = CityCatalog::climate(city);
    WeatherSnapshot {
        rainfall: climate.monsoon_rainfall * CityCatalog::season_adjustment(month),
        temperature: climate.temperature,
        humidity: climate.humidity,
        pressure: climate.pressure,
        elevation: climate.elevation,
    }
}

fn or_fallback<T>(provider: &str, result: AnalysisResult<T>, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{} provider failed, using fallback: {}", provider, e);
            fallback()
        }
    }
}

#[derive(Clone)]
pub struct ParcelAnalysisService {
    repository: Arc<dyn FullRepository>,
    predictor: Arc<RwLock<ZonePredictor>>,
    providers: Providers,
    settings: ReportSettings,
}

impl ParcelAnalysisService {
    pub fn new(
        repository: Arc<dyn FullRepository>,
        model: ModelConfig,
        settings: ReportSettings,
    ) -> Self {
        Self {
            repository,
            predictor: Arc::new(RwLock::new(ZonePredictor::new(model))),
            providers: Providers::default(),
            settings,
        }
    }

    pub fn with_providers(mut self, providers: Providers) -> Self {
        self.providers = providers;
        self
    }

    pub fn repository(&self) -> &Arc<dyn FullRepository> {
        &self.repository
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    pub fn is_trained(&self) -> bool {
        self.predictor.read().is_trained()
    }

    pub fn model_version(&self) -> String {
        self.predictor.read().model_version().to_string()
    }

    /// Canonical key of the requested city, or the configured default.
    pub fn resolve_city(&self, city: Option<&str>) -> String {
        match city.map(str::trim).filter(|c| !c.is_empty()) {
            Some(city) => CityCatalog::canonical_key(city),
            None => CityCatalog::canonical_key(&self.settings.default_city),
        }
    }

    /// Fail with [`AnalysisError::NoRegulationsForCity`] unless at least one
    /// document was ingested for `city`.
    pub async fn ensure_regulations(&self, city: &str) -> AnalysisResult<()> {
        let documents = repo_services::documents_for_city(self.repository.as_ref(), city).await?;
        if documents.is_empty() {
            return Err(AnalysisError::no_regulations(city));
        }
        Ok(())
    }

    /// Extract, store and learn from one uploaded document.
    ///
    /// Rules carrying both a zone type and a FAR become training samples.
    pub async fn ingest_document(
        &self,
        filename: &str,
        bytes: &[u8],
        city: Option<&str>,
    ) -> AnalysisResult<Document> {
        let default_city = self.resolve_city(city);
        let existing = repo_services::list_documents(self.repository.as_ref(), None).await?;
        let sequence = next_sequence(existing.iter().map(|d| d.id.as_str()));
        let document = ingest(filename, bytes, &default_city, sequence)?;

        repo_services::store_document(self.repository.as_ref(), document.clone()).await?;
        let samples = rules_to_training_samples(&document);
        if !samples.is_empty() {
            repo_services::add_training_samples(self.repository.as_ref(), samples).await?;
        }
        Ok(document)
    }

    /// Convert labelled parcels to samples and store them. Returns the new
    /// sample total.
    pub async fn add_labelled_parcels(&self, parcels: Vec<LabelledParcel>) -> AnalysisResult<usize> {
        let samples = parcels
            .into_iter()
            .map(|parcel| {
                if !parcel.far.is_finite() || parcel.far < 0.0 {
                    return Err(AnalysisError::InvalidInput(format!(
                        "FAR must be a non-negative number, got {}",
                        parcel.far
                    )));
                }
                Ok(TrainingSample {
                    city: self.resolve_city(parcel.city.as_deref()),
                    features: extract_features(&parcel.polygon, &parcel.nearby_areas),
                    zone_type: parcel.zone_type,
                    far: parcel.far,
                })
            })
            .collect::<AnalysisResult<Vec<_>>>()?;
        Ok(repo_services::add_training_samples(self.repository.as_ref(), samples).await?)
    }

    pub async fn training_samples(&self) -> AnalysisResult<Vec<TrainingSample>> {
        Ok(repo_services::training_samples(self.repository.as_ref()).await?)
    }

    /// Fit the predictor on `samples` under the write lock. Blocking.
    pub fn train_with(&self, samples: &[TrainingSample]) -> AnalysisResult<TrainingReport> {
        let mut predictor = self.predictor.write();
        predictor.train(samples)
    }

    /// Fit on every accumulated sample on the blocking pool.
    pub async fn train(&self) -> AnalysisResult<TrainingReport> {
        let samples = self.training_samples().await?;
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.train_with(&samples))
            .await
            .map_err(|e| AnalysisError::BackgroundTask(e.to_string()))?
    }

    /// Zone prediction for a parcel. Blocking; no city check.
    pub fn predict_zoning(
        &self,
        polygon: &Polygon,
        nearby: &[NearbyArea],
    ) -> AnalysisResult<ZonePrediction> {
        let features = extract_features(polygon, nearby);
        let prediction = self.predictor.read().predict(&features)?;
        debug!(
            "Predicted {} (confidence {:.2}, model {})",
            prediction.attributes.zone_type, prediction.confidence, prediction.model_version
        );
        Ok(prediction)
    }

    /// [`Self::predict_zoning`] on the blocking pool, so a fit holding the
    /// predictor write lock never stalls a runtime worker.
    async fn predict_in_background(
        &self,
        polygon: &Polygon,
        nearby: &[NearbyArea],
    ) -> AnalysisResult<ZonePrediction> {
        let service = self.clone();
        let (polygon, nearby) = (polygon.clone(), nearby.to_vec());
        tokio::task::spawn_blocking(move || service.predict_zoning(&polygon, &nearby))
            .await
            .map_err(|e| AnalysisError::BackgroundTask(e.to_string()))?
    }

    /// Zone prediction for a parcel in a city with ingested regulations.
    pub async fn predict_for_city(
        &self,
        city: Option<&str>,
        polygon: &Polygon,
        nearby: &[NearbyArea],
    ) -> AnalysisResult<ZonePrediction> {
        let city = self.resolve_city(city);
        self.ensure_regulations(&city).await?;
        self.predict_in_background(polygon, nearby).await
    }

    async fn flood_assessment(&self, city: &str, lat: f64, lng: f64) -> FloodAssessment {
        let weather = weather_snapshot(city, Utc::now().month());
        let multiplier = CityCatalog::climate(city).risk_multiplier;

        let current = self.providers.flood.current_risk(&weather, lat, lng).await;
        let future = self
            .providers
            .flood
            .future_risk(&weather, lat, lng, multiplier)
            .await;

        let assessment = current.and_then(|current| future.map(|future| FloodAssessment { current, future }));
        or_fallback("flood", assessment, fallback_flood_assessment)
    }

    /// Full development report.
    ///
    /// Fails only for a city without regulations or an unusable prediction;
    /// provider failures are logged and replaced by fallbacks.
    pub async fn generate_report(&self, request: ReportRequest) -> AnalysisResult<Report> {
        let ReportRequest {
            polygon,
            nearby_areas,
            city,
            current_aqi,
            mut overlays,
        } = request;

        let city = self.resolve_city(city.as_deref());
        self.ensure_regulations(&city).await?;

        let prediction = self.predict_in_background(&polygon, &nearby_areas).await?;
        let center = centroid(&polygon);
        let (lat, lng) = (center.lat, center.lng);

        if overlays.amenities.is_none() {
            let found = self.providers.amenities.find_amenities(lat, lng).await;
            overlays.amenities = Some(or_fallback("amenities", found, fallback_amenities));
        }
        if overlays.aqi_forecast.is_none() {
            let days = self.settings.forecast_days;
            let current = current_aqi.unwrap_or(self.settings.current_aqi);
            let forecast = self.providers.aqi.forecast(current, days).await;
            overlays.aqi_forecast = Some(or_fallback("aqi", forecast, || fallback_aqi_forecast(days)));
        }
        if overlays.lightning_risk.is_none() {
            let risk = self
                .providers
                .lightning
                .assess(&city, prediction.attributes.zone_type)
                .await;
            overlays.lightning_risk = Some(or_fallback("lightning", risk, fallback_lightning_risk));
        }
        if overlays.road_condition.is_none() {
            let road = self.providers.road.road_condition(lat, lng).await;
            overlays.road_condition = Some(or_fallback("road condition", road, || {
                UNKNOWN_ROAD_CONDITION.to_string()
            }));
        }
        if overlays.flood_risk.is_none() {
            overlays.flood_risk = Some(self.flood_assessment(&city, lat, lng).await);
        }

        let report = build_report(&polygon, &nearby_areas, prediction, overlays, &city)?;
        info!(
            "Generated report for {} ({:.0} sqm, score {})",
            report.city, report.parcel_info.area_sqm, report.buildability.score
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod analysis_tests;
