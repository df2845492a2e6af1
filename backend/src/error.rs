//! Error taxonomy for parcel analysis.

use crate::db::repository::RepositoryError;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors surfaced by the analysis core and its orchestration boundary.
///
/// Optional external inputs (amenities, road data, flood and AQI
/// predictors) never produce an error that aborts a report; their failures
/// are logged and replaced by fallback values. [`AnalysisError::ExternalService`]
/// exists for callers that query those providers directly.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::result_large_err)]
pub enum AnalysisError {
    /// The document extension is not one of `.txt`, `.docx`, `.pdf`.
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// A feature bound at training time is missing from a prediction input.
    #[error("Insufficient data: missing feature '{feature}'")]
    InsufficientData { feature: String },

    /// A report or prediction was requested for a city with no ingested documents.
    #[error("No zoning regulations found for {city}. Please upload documents first.")]
    NoRegulationsForCity { city: String },

    /// An external provider failed.
    #[error("External service '{service}' failed: {message}")]
    ExternalService { service: String, message: String },

    /// Text could not be read out of a supported container.
    #[error("Text extraction failed: {0}")]
    TextExtraction(String),

    /// Malformed request input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model fitting failed.
    #[error("Training failed: {0}")]
    Training(String),

    /// A blocking-pool task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    BackgroundTask(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl AnalysisError {
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn insufficient_data(feature: impl Into<String>) -> Self {
        Self::InsufficientData {
            feature: feature.into(),
        }
    }

    pub fn no_regulations(city: impl Into<String>) -> Self {
        Self::NoRegulationsForCity { city: city.into() }
    }

    pub fn external(service: impl Into<String>, message: impl ToString) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// Whether the caller can recover by changing its request (as opposed to
    /// an internal failure).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. }
                | Self::NoRegulationsForCity { .. }
                | Self::InvalidInput(_)
                | Self::TextExtraction(_)
        )
    }
}
