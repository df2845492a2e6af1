//! Domain models shared by the analysis services, repositories and HTTP layer.

pub mod amenity;
pub mod document;
pub mod features;
pub mod geometry;
pub mod nearby;
pub mod report;
pub mod risk;
pub mod units;
pub mod zoning;

pub use amenity::{Amenities, Amenity, AmenityCategory};
pub use document::{CityStatistics, Document, DocumentFormat, DocumentSummary, DocumentsOverview};
pub use features::{FeatureVector, TrainingSample};
pub use geometry::{LngLat, Polygon};
pub use nearby::{NearbyArea, NearbyZone};
pub use report::{
    BuildabilityFactor, BuildabilityResult, Congestion, FactorStatus, Grade, MarketTrend, Outlook,
    ParcelInfo, PriceBand, Pricing, Recommendation, RecommendationKind, Report, Scenario,
    TrafficImpact, TrendDirection, ValueRange,
};
pub use risk::{
    FloodAssessment, FloodRisk, FloodRiskLevel, FutureFloodRisk, LightningRisk,
    LightningRiskLevel, WeatherSnapshot,
};
pub use zoning::{ZonePrediction, ZoneType, ZoningAttributes, ZoningRule};
