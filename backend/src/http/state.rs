//! Application state for the HTTP server.

use crate::services::ParcelAnalysisService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Analysis service; owns the repository and the zone predictor.
    pub service: ParcelAnalysisService,
}

impl AppState {
    /// Create a new application state around an analysis service.
    pub fn new(service: ParcelAnalysisService) -> Self {
        Self { service }
    }
}
