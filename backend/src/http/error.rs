//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::error::AnalysisError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
    /// Analysis pipeline error
    Analysis(AnalysisError),
}

fn repository_error(e: RepositoryError) -> (StatusCode, ApiError) {
    let msg = e.to_string();
    if e.is_not_found() {
        (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("REPOSITORY_ERROR", msg),
        )
    }
}

fn analysis_error(e: AnalysisError) -> (StatusCode, ApiError) {
    let msg = e.to_string();
    match e {
        AnalysisError::NoRegulationsForCity { city } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("NO_ZONING_DOCS", msg).with_details(city),
        ),
        AnalysisError::UnsupportedFormat { .. } => (
            StatusCode::BAD_REQUEST,
            ApiError::new("UNSUPPORTED_FORMAT", msg)
                .with_details("Supported formats: .txt, .docx, .pdf"),
        ),
        AnalysisError::InvalidInput(_) => {
            (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
        }
        AnalysisError::TextExtraction(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::new("TEXT_EXTRACTION_FAILED", msg),
        ),
        AnalysisError::Repository(e) => repository_error(e),
        AnalysisError::ExternalService { .. } => (
            StatusCode::BAD_GATEWAY,
            ApiError::new("EXTERNAL_SERVICE_ERROR", msg),
        ),
        AnalysisError::BackgroundTask(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", msg),
        ),
        AnalysisError::InsufficientData { .. } | AnalysisError::Training(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("ANALYSIS_ERROR", msg),
        ),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => repository_error(e),
            AppError::Analysis(e) => analysis_error(e),
        };

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_code(err: AppError) -> (StatusCode, String) {
        let (status, body) = match err {
            AppError::Analysis(e) => analysis_error(e),
            AppError::Repository(e) => repository_error(e),
            other => {
                let response = other.into_response();
                return (response.status(), String::new());
            }
        };
        (status, body.code)
    }

    #[test]
    fn test_no_regulations_is_a_client_error() {
        let (status, code) = status_and_code(AnalysisError::no_regulations("mumbai").into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "NO_ZONING_DOCS");
    }

    #[test]
    fn test_unsupported_format_lists_supported_ones() {
        let (status, body) = analysis_error(AnalysisError::unsupported_format(".xlsx"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.message.contains(".xlsx"));
        assert!(body.details.unwrap().contains(".docx"));
    }

    #[test]
    fn test_repository_not_found_is_404() {
        let (status, code) = status_and_code(RepositoryError::not_found("document 7").into());
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");

        let wrapped: AppError = AnalysisError::from(RepositoryError::not_found("x")).into();
        assert_eq!(status_and_code(wrapped).0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_training_failure_is_internal() {
        let (status, _) = status_and_code(AnalysisError::Training("singular".into()).into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
