//! Service layer for parcel analysis.
//!
//! Most modules are synchronous, pure computations over the domain models
//! (feature extraction, scoring, scenarios, pricing, rule extraction).
//! [`analysis`] is the orchestration boundary that ties them to the
//! repository and the external data providers.

pub mod analysis;
pub mod buildability;
pub mod capabilities;
pub mod features;
pub mod ingestion;
pub mod learners;
pub mod predictor;
pub mod pricing;
pub mod report;
pub mod risk;
pub mod rule_extractor;
pub mod scenarios;
pub mod synthetic;
pub mod text_extract;

pub use analysis::{
    weather_snapshot, LabelledParcel, ParcelAnalysisService, Providers, ReportRequest,
    ReportSettings,
};
pub use buildability::score_buildability;
pub use capabilities::{
    AmenityFinder, AqiForecaster, Classifier, FloodPredictor, LightningAssessor, Regressor,
    RoadConditionProvider,
};
pub use features::extract_features;
pub use ingestion::{ingest, rules_to_training_samples};
pub use learners::{KnnRegressor, NearestCentroidClassifier, StandardScaler};
pub use predictor::{ModelConfig, TrainingReport, ZonePredictor};
pub use pricing::{market_trend, price_per_sqm, pricing, traffic_impact};
pub use report::{assemble_report, build_report, ReportOverlays};
pub use rule_extractor::{detect_city, extract_rules};
pub use scenarios::generate_scenarios;
pub use text_extract::extract_text;
