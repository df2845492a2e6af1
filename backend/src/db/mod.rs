//! Storage module for processed documents and training samples.
//!
//! This module provides abstractions for storage operations via the Repository pattern,
//! allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (analysis service, REST API)         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - City filtering and summaries                         │
//! │  - Document statistics                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────┐
//!     │ Local (in-memory)            │ File (JSON metadata)
//!     └──────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use parcel_insight::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let documents = services::list_documents(repo.as_ref(), Some("bangalore")).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "local-repo", feature = "file-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;

pub use services::{
    add_training_samples, city_statistics, delete_document, documents_for_city,
    documents_overview, get_document, health_check, list_documents, store_document,
    training_samples,
};

pub use repo_config::RepositoryConfig;

pub use factory::{RepositoryBuilder, RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "file-repo")]
pub use repositories::FileRepository;
pub use repository::{
    DocumentRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    TrainingRepository,
};
