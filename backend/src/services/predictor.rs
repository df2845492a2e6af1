//! Zone-type and FAR prediction.
//!
//! A [`ZonePredictor`] starts `Untrained` and answers with a deterministic
//! rule-based guess. [`ZonePredictor::train`] fits the classifier and
//! regressor capabilities and switches it to `Trained`, recording the feature
//! name order that every later prediction must replay.

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::capabilities::{Classifier, Regressor};
use super::learners::{KnnRegressor, NearestCentroidClassifier, StandardScaler};
use super::synthetic::synthetic_samples;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::features::{
    NEARBY_COMMERCIAL_COUNT, NEARBY_INDUSTRIAL_COUNT, NEARBY_RESIDENTIAL_COUNT,
};
use crate::models::{FeatureVector, TrainingSample, ZonePrediction, ZoneType, ZoningAttributes};

/// Version tag reported while untrained.
pub const RULE_BASED_VERSION: &str = "rule-based";
/// Confidence reported by the rule-based fallback.
pub const RULE_BASED_CONFIDENCE: f64 = 0.75;
/// FAR reported by the rule-based fallback.
pub const RULE_BASED_FAR: f64 = 2.0;

/// Training parameters (`[model]` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Below this many real samples, synthetic ones are mixed in.
    #[serde(default = "default_min_training_samples")]
    pub min_training_samples: usize,
    #[serde(default = "default_synthetic_samples")]
    pub synthetic_samples: usize,
    /// Seed for synthetic data and the hold-out split.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_min_training_samples() -> usize {
    10
}

fn default_synthetic_samples() -> usize {
    100
}

fn default_seed() -> u64 {
    42
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            min_training_samples: default_min_training_samples(),
            synthetic_samples: default_synthetic_samples(),
            seed: default_seed(),
            test_fraction: default_test_fraction(),
            version: default_version(),
        }
    }
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Classifier accuracy on the hold-out split.
    pub accuracy: f64,
    pub version: String,
    /// Rows used, synthetic ones included.
    pub samples: usize,
}

enum PredictorState {
    Untrained,
    Trained {
        feature_names: Vec<String>,
        scaler: StandardScaler,
    },
}

pub struct ZonePredictor {
    config: ModelConfig,
    classifier: Box<dyn Classifier>,
    regressor: Box<dyn Regressor>,
    state: PredictorState,
}

impl ZonePredictor {
    /// Predictor with the built-in learners.
    pub fn new(config: ModelConfig) -> Self {
        Self::with_learners(
            config,
            Box::new(NearestCentroidClassifier::new()),
            Box::new(KnnRegressor::default()),
        )
    }

    pub fn with_learners(
        config: ModelConfig,
        classifier: Box<dyn Classifier>,
        regressor: Box<dyn Regressor>,
    ) -> Self {
        Self {
            config,
            classifier,
            regressor,
            state: PredictorState::Untrained,
        }
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, PredictorState::Trained { .. })
    }

    /// Feature names bound at training time, in vector order.
    pub fn feature_names(&self) -> Option<&[String]> {
        match &self.state {
            PredictorState::Trained { feature_names, .. } => Some(feature_names),
            PredictorState::Untrained => None,
        }
    }

    pub fn model_version(&self) -> &str {
        if self.is_trained() {
            &self.config.version
        } else {
            RULE_BASED_VERSION
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Fit both learners.
    ///
    /// With fewer than `min_training_samples` real samples, the configured
    /// number of seeded synthetic samples is appended first. Feature order is
    /// taken from the first sample. A failed fit leaves the predictor untrained.
    pub fn train(&mut self, samples: &[TrainingSample]) -> AnalysisResult<TrainingReport> {
        let mut data = samples.to_vec();
        if data.len() < self.config.min_training_samples {
            debug!(
                "Only {} training samples, adding {} synthetic",
                data.len(),
                self.config.synthetic_samples
            );
            data.extend(synthetic_samples(
                self.config.synthetic_samples,
                self.config.seed,
            ));
        }

        let result = self.fit(&data);
        match &result {
            Ok(report) => info!(
                "Trained zone model {} on {} samples (accuracy {:.3})",
                report.version, report.samples, report.accuracy
            ),
            Err(e) => {
                warn!("Training failed: {}", e);
                self.state = PredictorState::Untrained;
            }
        }
        result
    }

    fn fit(&mut self, data: &[TrainingSample]) -> AnalysisResult<TrainingReport> {
        let first = data
            .first()
            .ok_or_else(|| AnalysisError::Training("no training samples".to_string()))?;
        let feature_names: Vec<String> = first.features.names().map(str::to_string).collect();

        let rows = data
            .iter()
            .map(|s| s.features.ordered_values(&feature_names))
            .collect::<AnalysisResult<Vec<_>>>()?;
        let scaler = StandardScaler::fit(&rows)?;
        let scaled = scaler.transform_all(&rows)?;

        let (train_idx, test_idx) =
            holdout_split(data.len(), self.config.test_fraction, self.config.seed);
        let pick_rows = |idx: &[usize]| idx.iter().map(|&i| scaled[i].clone()).collect::<Vec<_>>();
        let x_train = pick_rows(&train_idx);
        let zones: Vec<ZoneType> = train_idx.iter().map(|&i| data[i].zone_type).collect();
        let fars: Vec<f64> = train_idx.iter().map(|&i| data[i].far).collect();

        self.classifier.fit(&x_train, &zones)?;
        self.regressor.fit(&x_train, &fars)?;

        let eval_idx = if test_idx.is_empty() { &train_idx } else { &test_idx };
        let mut correct = 0usize;
        for &i in eval_idx {
            if self.classifier.predict(&scaled[i])? == data[i].zone_type {
                correct += 1;
            }
        }
        let accuracy = correct as f64 / eval_idx.len() as f64;

        self.state = PredictorState::Trained {
            feature_names,
            scaler,
        };

        Ok(TrainingReport {
            accuracy,
            version: self.config.version.clone(),
            samples: data.len(),
        })
    }

    /// Predict zoning for a feature vector.
    ///
    /// Trained predictions read features in the bound order; a missing name is
    /// [`AnalysisError::InsufficientData`].
    pub fn predict(&self, features: &FeatureVector) -> AnalysisResult<ZonePrediction> {
        let (feature_names, scaler) = match &self.state {
            PredictorState::Untrained => return Ok(rule_based_prediction(features)),
            PredictorState::Trained {
                feature_names,
                scaler,
            } => (feature_names, scaler),
        };

        let values = features.ordered_values(feature_names)?;
        let row = scaler.transform(&values)?;

        let zone = self.classifier.predict(&row)?;
        let confidence = self
            .classifier
            .predict_proba(&row)?
            .into_iter()
            .map(|(_, p)| p)
            .fold(0.0, f64::max);
        let predicted_far = self.regressor.predict(&row)?;

        debug!(
            "Predicted {} (confidence {:.3}, FAR {:.2})",
            zone, confidence, predicted_far
        );

        Ok(ZonePrediction {
            attributes: ZoningAttributes::for_zone(zone),
            confidence,
            model_version: self.config.version.clone(),
            predicted_far,
        })
    }
}

impl Default for ZonePredictor {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}

/// Seeded shuffle into train and test index sets.
///
/// The test set holds `ceil(n * fraction)` rows but always leaves at least
/// one training row.
fn holdout_split(n: usize, fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let fraction = fraction.clamp(0.0, 1.0);
    let test_len = ((n as f64 * fraction).ceil() as usize).min(n.saturating_sub(1));
    let train = indices.split_off(test_len);
    (train, indices)
}

/// Neighbour-count rules used while no model is trained.
///
/// Commercial wins only if it strictly outnumbers residential; otherwise any
/// industrial neighbour makes the parcel mixed; otherwise residential.
pub fn rule_based_prediction(features: &FeatureVector) -> ZonePrediction {
    let count = |name: &str| features.get(name).unwrap_or(0.0);
    let residential = count(NEARBY_RESIDENTIAL_COUNT);
    let commercial = count(NEARBY_COMMERCIAL_COUNT);
    let industrial = count(NEARBY_INDUSTRIAL_COUNT);

    let zone = if commercial > residential {
        ZoneType::Commercial
    } else if industrial > 0.0 {
        ZoneType::Mixed
    } else {
        ZoneType::Residential
    };

    ZonePrediction {
        attributes: ZoningAttributes::for_zone(zone),
        confidence: RULE_BASED_CONFIDENCE,
        model_version: RULE_BASED_VERSION.to_string(),
        predicted_far: RULE_BASED_FAR,
    }
}

#[cfg(test)]
#[path = "predictor_tests.rs"]
mod predictor_tests;
