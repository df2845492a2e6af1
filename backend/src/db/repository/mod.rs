//! Repository traits for ingested documents and training samples.
//!
//! Implementations must be `Send + Sync`; the analysis service shares a
//! single `Arc<dyn FullRepository>` across request handlers.

use async_trait::async_trait;

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::{Document, TrainingSample};

/// Storage for processed document metadata.
///
/// Documents are immutable once stored; the only mutation is deletion by id.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist a new document. Storing an id twice is a validation error.
    async fn store_document(&self, document: Document) -> RepositoryResult<()>;

    async fn get_document(&self, id: &str) -> RepositoryResult<Document>;

    /// All documents in ingestion order.
    async fn list_documents(&self) -> RepositoryResult<Vec<Document>>;

    /// Remove a document and return it. Unknown ids are `NotFound`.
    async fn delete_document(&self, id: &str) -> RepositoryResult<Document>;

    async fn document_count(&self) -> RepositoryResult<usize>;

    async fn health_check(&self) -> RepositoryResult<bool>;
}

/// Accumulator of labelled training samples.
#[async_trait]
pub trait TrainingRepository: Send + Sync {
    /// Append samples and return the new total.
    async fn add_training_samples(&self, samples: Vec<TrainingSample>) -> RepositoryResult<usize>;

    /// All samples in insertion order.
    async fn training_samples(&self) -> RepositoryResult<Vec<TrainingSample>>;

    async fn training_sample_count(&self) -> RepositoryResult<usize>;

    async fn clear_training_samples(&self) -> RepositoryResult<()>;
}

/// Everything the analysis service needs from storage.
pub trait FullRepository: DocumentRepository + TrainingRepository {}

impl<T> FullRepository for T where T: DocumentRepository + TrainingRepository {}
