//! Built-in learners: feature scaling, a nearest-centroid zone classifier
//! and a k-nearest-neighbour FAR regressor.

use super::capabilities::{Classifier, Regressor};
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::ZoneType;

/// Neighbours averaged by [`KnnRegressor::default`].
pub const DEFAULT_K: usize = 5;

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn check_shape(x: &[Vec<f64>], labels: usize) -> AnalysisResult<usize> {
    if x.is_empty() {
        return Err(AnalysisError::Training("no training rows".to_string()));
    }
    if x.len() != labels {
        return Err(AnalysisError::Training(format!(
            "{} rows but {} targets",
            x.len(),
            labels
        )));
    }
    let width = x[0].len();
    if x.iter().any(|row| row.len() != width) {
        return Err(AnalysisError::Training("ragged feature rows".to_string()));
    }
    Ok(width)
}

fn check_row(row: &[f64], width: usize) -> AnalysisResult<()> {
    if row.len() != width {
        return Err(AnalysisError::InvalidInput(format!(
            "expected {} features, got {}",
            width,
            row.len()
        )));
    }
    Ok(())
}

/// Per-column standardisation to zero mean and unit variance.
///
/// Uses the population standard deviation; zero-variance columns scale by 1.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(x: &[Vec<f64>]) -> AnalysisResult<Self> {
        let width = check_shape(x, x.len())?;
        let n = x.len() as f64;

        let means: Vec<f64> = (0..width)
            .map(|col| x.iter().map(|row| row[col]).sum::<f64>() / n)
            .collect();
        let scales = (0..width)
            .map(|col| {
                let var = x
                    .iter()
                    .map(|row| (row[col] - means[col]).powi(2))
                    .sum::<f64>()
                    / n;
                let std = var.sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Ok(Self { means, scales })
    }

    pub fn transform(&self, row: &[f64]) -> AnalysisResult<Vec<f64>> {
        check_row(row, self.means.len())?;
        Ok(row
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(v, (mean, scale))| (v - mean) / scale)
            .collect())
    }

    pub fn transform_all(&self, x: &[Vec<f64>]) -> AnalysisResult<Vec<Vec<f64>>> {
        x.iter().map(|row| self.transform(row)).collect()
    }
}

/// Assigns each row to the class whose mean row is closest.
///
/// Probabilities are the softmax of negative squared distances to each
/// class centroid.
#[derive(Debug, Clone, Default)]
pub struct NearestCentroidClassifier {
    centroids: Vec<(ZoneType, Vec<f64>)>,
}

impl NearestCentroidClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classes seen during fit, in canonical zone order.
    pub fn classes(&self) -> Vec<ZoneType> {
        self.centroids.iter().map(|(zone, _)| *zone).collect()
    }
}

impl Classifier for NearestCentroidClassifier {
    fn fit(&mut self, x: &[Vec<f64>], y: &[ZoneType]) -> AnalysisResult<()> {
        let width = check_shape(x, y.len())?;

        let mut centroids = Vec::new();
        for zone in ZoneType::ALL {
            let rows: Vec<&Vec<f64>> = x
                .iter()
                .zip(y)
                .filter(|(_, label)| **label == zone)
                .map(|(row, _)| row)
                .collect();
            if rows.is_empty() {
                continue;
            }
            let n = rows.len() as f64;
            let centroid = (0..width)
                .map(|col| rows.iter().map(|row| row[col]).sum::<f64>() / n)
                .collect();
            centroids.push((zone, centroid));
        }

        self.centroids = centroids;
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> AnalysisResult<ZoneType> {
        let proba = self.predict_proba(row)?;
        proba
            .iter()
            .fold(None::<(ZoneType, f64)>, |best, &(zone, p)| match best {
                Some((_, best_p)) if best_p >= p => best,
                _ => Some((zone, p)),
            })
            .map(|(zone, _)| zone)
            .ok_or_else(|| AnalysisError::Training("classifier is not fitted".to_string()))
    }

    fn predict_proba(&self, row: &[f64]) -> AnalysisResult<Vec<(ZoneType, f64)>> {
        let width = match self.centroids.first() {
            Some((_, centroid)) => centroid.len(),
            None => return Err(AnalysisError::Training("classifier is not fitted".to_string())),
        };
        check_row(row, width)?;

        let scores: Vec<f64> = self
            .centroids
            .iter()
            .map(|(_, centroid)| -squared_distance(row, centroid))
            .collect();
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        Ok(self
            .centroids
            .iter()
            .zip(exps)
            .map(|((zone, _), e)| (*zone, e / total))
            .collect())
    }
}

/// Mean target of the `k` nearest training rows.
#[derive(Debug, Clone)]
pub struct KnnRegressor {
    k: usize,
    rows: Vec<Vec<f64>>,
    targets: Vec<f64>,
}

impl KnnRegressor {
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            rows: Vec::new(),
            targets: Vec::new(),
        }
    }
}

impl Default for KnnRegressor {
    fn default() -> Self {
        Self::new(DEFAULT_K)
    }
}

impl Regressor for KnnRegressor {
    fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> AnalysisResult<()> {
        check_shape(x, y.len())?;
        self.rows = x.to_vec();
        self.targets = y.to_vec();
        Ok(())
    }

    fn predict(&self, row: &[f64]) -> AnalysisResult<f64> {
        let width = match self.rows.first() {
            Some(first) => first.len(),
            None => return Err(AnalysisError::Training("regressor is not fitted".to_string())),
        };
        check_row(row, width)?;

        let mut distances: Vec<(f64, usize)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, train)| (squared_distance(row, train), i))
            .collect();
        distances.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let k = self.k.min(distances.len());
        let sum: f64 = distances[..k].iter().map(|(_, i)| self.targets[*i]).sum();
        Ok(sum / k as f64)
    }
}
