//! Built-in data providers and the fallback payloads used when a provider
//! is missing or fails.
//!
//! Every provider here is deterministic and answers without I/O. Real
//! integrations implement the same traits from [`super::capabilities`].

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::algorithms::geometry::haversine_km;
use crate::catalog::CityCatalog;
use crate::error::AnalysisResult;
use crate::models::{
    Amenities, Amenity, FloodAssessment, FloodRisk, FloodRiskLevel, FutureFloodRisk,
    LightningRisk, LightningRiskLevel, LngLat, WeatherSnapshot, ZoneType,
};
use crate::services::capabilities::{
    AmenityFinder, AqiForecaster, FloodPredictor, LightningAssessor, RoadConditionProvider,
};

/// Road condition reported when nothing is known about the surroundings.
pub const UNKNOWN_ROAD_CONDITION: &str = "unknown";

/// Entries kept per amenity category.
pub const MAX_AMENITIES_PER_CATEGORY: usize = 3;

/// Smallest distance reported for an amenity.
pub const MIN_AMENITY_DISTANCE_KM: f64 = 0.1;

const WALKING_KMH: f64 = 5.0;
const DRIVING_KMH: f64 = 30.0;

/// Rainfall (mm) above which future projections stop growing.
const MAX_PROJECTED_RAINFALL: f64 = 300.0;

const MODERATE_LIGHTNING_WARNING: &str =
    "Moderate Lightning Risk. Basic lightning protection recommended.";
const HIGH_LIGHTNING_WARNING: &str = "High Lightning Risk Area. Install advanced lightning \
     protection systems (LPS) as per IS/IEC 62305.";

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Amenities
// ---------------------------------------------------------------------------

/// Build an amenity from a candidate location relative to the parcel.
///
/// Travel times assume 5 km/h walking and 30 km/h city driving, never below
/// one minute.
pub fn amenity_at(name: impl Into<String>, origin: LngLat, location: LngLat) -> Amenity {
    let distance = haversine_km(origin, location).value();
    let reported = if distance > 0.0 {
        round_to(distance, 2).max(MIN_AMENITY_DISTANCE_KM)
    } else {
        MIN_AMENITY_DISTANCE_KM
    };
    let minutes = |kmh: f64| ((distance / kmh * 60.0).round() as u32).max(1);

    Amenity {
        lat: Some(location.lat),
        lng: Some(location.lng),
        ..Amenity::new(name, reported).with_travel_times(minutes(WALKING_KMH), minutes(DRIVING_KMH))
    }
}

/// Dedupe by name (first wins), sort by ascending distance and keep the
/// closest [`MAX_AMENITIES_PER_CATEGORY`].
pub fn rank_amenities(candidates: Vec<Amenity>) -> Vec<Amenity> {
    let mut ranked: Vec<Amenity> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !ranked.iter().any(|a| a.name == candidate.name) {
            ranked.push(candidate);
        }
    }
    ranked.sort_by(|a, b| {
        let da = a.distance().unwrap_or(f64::INFINITY);
        let db = b.distance().unwrap_or(f64::INFINITY);
        da.total_cmp(&db)
    });
    ranked.truncate(MAX_AMENITIES_PER_CATEGORY);
    ranked
}

/// Demo amenity set used when no finder result is available.
pub fn fallback_amenities() -> Amenities {
    let entry = |name: &str, km: f64, walk: u32, drive: u32| {
        Amenity::new(name, km).with_travel_times(walk, drive)
    };
    Amenities {
        schools: rank_amenities(vec![
            entry("Demo School", 1.2, 14, 2),
            entry("City High", 3.5, 42, 7),
            entry("Tech Institute", 12.0, 144, 24),
        ]),
        hospitals: rank_amenities(vec![
            entry("City Hospital", 2.5, 30, 5),
            entry("General Clinic", 4.1, 49, 8),
            entry("Trauma Center", 15.2, 182, 30),
        ]),
        transport: rank_amenities(vec![
            entry("Central Station", 3.0, 36, 6),
            entry("Bus Terminal", 0.8, 10, 2),
            entry("Metro Stop", 1.5, 18, 3),
        ]),
        parks: rank_amenities(vec![
            entry("Central Park", 0.5, 6, 1),
            entry("Botanical Garden", 5.2, 62, 10),
            entry("Community Park", 2.1, 25, 4),
        ]),
    }
}

/// Finder that always answers with [`fallback_amenities`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackAmenityFinder;

#[async_trait]
impl AmenityFinder for FallbackAmenityFinder {
    async fn find_amenities(&self, _lat: f64, _lng: f64) -> AnalysisResult<Amenities> {
        Ok(fallback_amenities())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoRoadData;

#[async_trait]
impl RoadConditionProvider for NoRoadData {
    async fn road_condition(&self, _lat: f64, _lng: f64) -> AnalysisResult<String> {
        Ok(UNKNOWN_ROAD_CONDITION.to_string())
    }
}

// ---------------------------------------------------------------------------
// Air quality
// ---------------------------------------------------------------------------

const FALLBACK_AQI: [u32; 30] = [
    45, 48, 50, 52, 49, 47, 45, 44, 46, 48, 50, 55, 58, 60, 55, 50, 48, 45, 42, 40, 38, 40, 42,
    45, 48, 50, 52, 55, 58, 60,
];

/// Fixed forecast used when no forecaster result is available, cycled to
/// the requested length.
pub fn fallback_aqi_forecast(days: usize) -> Vec<u32> {
    FALLBACK_AQI.iter().copied().cycle().take(days).collect()
}

/// Seasonal swing of ±20 around the current reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalAqiForecaster;

impl SeasonalAqiForecaster {
    pub fn forecast_days(current_aqi: f64, days: usize) -> Vec<u32> {
        (1..=days)
            .map(|day| {
                let value = current_aqi + 20.0 * (day as f64 / 10.0).sin();
                value.round().max(0.0) as u32
            })
            .collect()
    }
}

#[async_trait]
impl AqiForecaster for SeasonalAqiForecaster {
    async fn forecast(&self, current_aqi: f64, days: usize) -> AnalysisResult<Vec<u32>> {
        Ok(Self::forecast_days(current_aqi, days))
    }
}

// ---------------------------------------------------------------------------
// Lightning
// ---------------------------------------------------------------------------

pub fn lightning_risk(city: &str, building_type: ZoneType) -> LightningRisk {
    if !CityCatalog::is_lightning_prone(city) {
        return fallback_lightning_risk();
    }
    match building_type {
        ZoneType::Commercial | ZoneType::Mixed => LightningRisk {
            risk_level: LightningRiskLevel::High,
            warning: Some(HIGH_LIGHTNING_WARNING.to_string()),
        },
        ZoneType::Residential | ZoneType::Industrial => LightningRisk {
            risk_level: LightningRiskLevel::Moderate,
            warning: Some(MODERATE_LIGHTNING_WARNING.to_string()),
        },
    }
}

/// Lightning-prone cities are Moderate, High for taller commercial and
/// mixed-use buildings.
#[derive(Debug, Clone, Copy, Default)]
pub struct CityLightningAssessor;

#[async_trait]
impl LightningAssessor for CityLightningAssessor {
    async fn assess(&self, city: &str, building_type: ZoneType) -> AnalysisResult<LightningRisk> {
        Ok(lightning_risk(city, building_type))
    }
}

pub fn fallback_lightning_risk() -> LightningRisk {
    LightningRisk {
        risk_level: LightningRiskLevel::Low,
        warning: None,
    }
}

// ---------------------------------------------------------------------------
// Flood
// ---------------------------------------------------------------------------

/// Climate-shift horizon: years ahead, rainfall factor, elevation loss (m).
const FLOOD_HORIZONS: [(u32, f64, f64); 3] = [(5, 1.05, 0.5), (10, 1.10, 1.0), (20, 1.20, 2.0)];

/// Deterministic ±50 m elevation offset for a location.
pub fn elevation_offset(lat: f64, lng: f64) -> f64 {
    let digest = Sha256::digest(format!("{:.4}{:.4}", lat, lng).as_bytes());
    let prefix = &hex::encode(digest)[..4];
    let value = u32::from_str_radix(prefix, 16).unwrap_or(0);
    f64::from(value % 100) - 50.0
}

/// Linear flood heuristic over a weather snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicFloodPredictor;

impl HeuristicFloodPredictor {
    /// Risk score (0–100) and flood depth in inches.
    pub fn score(weather: &WeatherSnapshot) -> (f64, f64) {
        let raw = weather.rainfall * 0.4 + weather.humidity * 0.2
            + (1020.0 - weather.pressure) * 0.5
            - weather.elevation * 0.3;
        let risk = raw.clamp(0.0, 100.0);
        let depth = if risk > 20.0 { (risk - 20.0) * 0.6 } else { 0.0 };
        (risk, depth)
    }

    fn local_elevation(weather: &WeatherSnapshot, lat: f64, lng: f64) -> f64 {
        (weather.elevation + elevation_offset(lat, lng)).max(0.0)
    }

    pub fn current(weather: &WeatherSnapshot, lat: f64, lng: f64) -> FloodRisk {
        let elevation = Self::local_elevation(weather, lat, lng);
        let (risk, depth) = Self::score(&WeatherSnapshot {
            elevation,
            ..*weather
        });
        let level = FloodRiskLevel::from_score(risk);
        FloodRisk {
            risk_score: round_to(risk, 2),
            risk_level: level,
            description: level.description().to_string(),
            depth_inches: round_to(depth, 1),
            elevation: round_to(elevation, 1),
        }
    }

    pub fn future(
        weather: &WeatherSnapshot,
        lat: f64,
        lng: f64,
        risk_multiplier: f64,
    ) -> Vec<FutureFloodRisk> {
        let elevation = Self::local_elevation(weather, lat, lng);
        FLOOD_HORIZONS
            .iter()
            .map(|&(years, rainfall_factor, elevation_loss)| {
                let projected = WeatherSnapshot {
                    rainfall: (weather.rainfall * rainfall_factor).min(MAX_PROJECTED_RAINFALL),
                    temperature: weather.temperature + f64::from(years) * 0.05,
                    elevation: (elevation - elevation_loss).max(0.0),
                    ..*weather
                };
                let (risk, depth) = Self::score(&projected);
                FutureFloodRisk {
                    year: format!("+{} Years", years),
                    risk_score: round_to(risk, 3),
                    risk_level: FloodRiskLevel::from_score(risk),
                    depth_inches: round_to(depth * risk_multiplier, 2),
                }
            })
            .collect()
    }
}

#[async_trait]
impl FloodPredictor for HeuristicFloodPredictor {
    async fn current_risk(
        &self,
        weather: &WeatherSnapshot,
        lat: f64,
        lng: f64,
    ) -> AnalysisResult<FloodRisk> {
        Ok(Self::current(weather, lat, lng))
    }

    async fn future_risk(
        &self,
        weather: &WeatherSnapshot,
        lat: f64,
        lng: f64,
        risk_multiplier: f64,
    ) -> AnalysisResult<Vec<FutureFloodRisk>> {
        Ok(Self::future(weather, lat, lng, risk_multiplier))
    }
}

/// Flood block used when no predictor result is available.
pub fn fallback_flood_assessment() -> FloodAssessment {
    let future = |year: &str, score: f64, level: FloodRiskLevel, depth: f64| FutureFloodRisk {
        year: year.to_string(),
        risk_score: score,
        risk_level: level,
        depth_inches: depth,
    };
    FloodAssessment {
        current: FloodRisk {
            risk_score: 15.0,
            risk_level: FloodRiskLevel::Low,
            description: FloodRiskLevel::Low.description().to_string(),
            depth_inches: 0.5,
            elevation: 10.0,
        },
        future: vec![
            future("+5 Years", 18.0, FloodRiskLevel::Low, 0.8),
            future("+10 Years", 25.0, FloodRiskLevel::Moderate, 2.5),
            future("+20 Years", 35.0, FloodRiskLevel::Moderate, 4.2),
        ],
    }
}
