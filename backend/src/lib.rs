//! # Parcel Insight
//!
//! Development-potential analysis for land parcels.
//!
//! Given a parcel polygon and a description of its surroundings, the crate
//! predicts zoning attributes, scores buildability, proposes development
//! scenarios and assembles a full report with pricing, amenities and risk
//! overlays. Regulatory documents are ingested to extract zoning rules, which
//! both gate report generation per city and feed model training.
//!
//! ## Architecture
//!
//! - [`models`]: serializable domain types
//! - [`algorithms`]: planar and geodesic geometry
//! - [`catalog`]: static per-city tables
//! - [`services`]: feature extraction, prediction, scoring, scenarios, rule
//!   extraction, report assembly and the [`services::ParcelAnalysisService`]
//!   orchestration boundary
//! - [`db`]: repository pattern for documents and training samples
//! - [`config`]: TOML + environment configuration
//! - [`http`]: axum REST API (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod algorithms;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{AnalysisError, AnalysisResult};
