//! Risk overlay payloads: flood, lightning and the weather input they use.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Weather inputs to a flood predictor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Monthly rainfall in mm.
    pub rainfall: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// hPa.
    pub pressure: f64,
    /// Meters above sea level.
    pub elevation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloodRiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl FloodRiskLevel {
    /// Level for a 0–100 risk score.
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::Low
        } else if score < 50.0 {
            Self::Moderate
        } else if score < 80.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Minimal flood risk. Standard precautions recommended.",
            Self::Moderate => "Moderate flood risk. Monitor weather conditions.",
            Self::High => "High flood risk. Prepare flood mitigation measures.",
            Self::Critical => "Critical flood risk. Immediate action required.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloodRisk {
    pub risk_score: f64,
    pub risk_level: FloodRiskLevel,
    pub description: String,
    pub depth_inches: f64,
    /// Meters.
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FutureFloodRisk {
    /// Horizon label such as `"+10 Years"`.
    pub year: String,
    pub risk_score: f64,
    pub risk_level: FloodRiskLevel,
    pub depth_inches: f64,
}

/// Current flood risk plus the climate-shifted horizons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodAssessment {
    pub current: FloodRisk,
    pub future: Vec<FutureFloodRisk>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightningRiskLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for LightningRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightningRisk {
    pub risk_level: LightningRiskLevel,
    #[serde(default)]
    pub warning: Option<String>,
}
