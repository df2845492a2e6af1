//! In-memory repository for tests and local development.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::{
    DocumentRepository, ErrorContext, RepositoryError, RepositoryResult, TrainingRepository,
};
use crate::models::{Document, TrainingSample};

/// Process-local storage guarded by `parking_lot` locks.
///
/// Each instance is fully isolated, so parallel tests never see each other's
/// documents or samples.
pub struct LocalRepository {
    documents: RwLock<Vec<Document>>,
    samples: RwLock<Vec<TrainingSample>>,
    healthy: AtomicBool,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            samples: RwLock::new(Vec::new()),
            healthy: AtomicBool::new(true),
        }
    }

    /// Seed the repository with already-processed documents.
    #[cfg_attr(not(feature = "file-repo"), allow(dead_code))]
    pub(crate) fn with_documents(documents: Vec<Document>) -> Self {
        let repo = Self::new();
        *repo.documents.write() = documents;
        repo
    }

    /// Drop every document and sample.
    pub fn clear(&self) {
        self.documents.write().clear();
        self.samples.write().clear();
    }

    /// Toggle the value reported by `health_check`.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentRepository for LocalRepository {
    async fn store_document(&self, document: Document) -> RepositoryResult<()> {
        let mut documents = self.documents.write();
        if documents.iter().any(|d| d.id == document.id) {
            return Err(RepositoryError::ValidationError {
                message: format!("Document {} already exists", document.id),
                context: ErrorContext::new("store_document")
                    .with_entity("document")
                    .with_entity_id(&document.id),
            });
        }
        documents.push(document);
        Ok(())
    }

    async fn get_document(&self, id: &str) -> RepositoryResult<Document> {
        self.documents
            .read()
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Document {} not found", id),
                    ErrorContext::new("get_document")
                        .with_entity("document")
                        .with_entity_id(id),
                )
            })
    }

    async fn list_documents(&self) -> RepositoryResult<Vec<Document>> {
        Ok(self.documents.read().clone())
    }

    async fn delete_document(&self, id: &str) -> RepositoryResult<Document> {
        let mut documents = self.documents.write();
        let index = documents.iter().position(|d| d.id == id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Document {} not found", id),
                ErrorContext::new("delete_document")
                    .with_entity("document")
                    .with_entity_id(id),
            )
        })?;
        Ok(documents.remove(index))
    }

    async fn document_count(&self) -> RepositoryResult<usize> {
        Ok(self.documents.read().len())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.healthy.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl TrainingRepository for LocalRepository {
    async fn add_training_samples(&self, samples: Vec<TrainingSample>) -> RepositoryResult<usize> {
        let mut stored = self.samples.write();
        stored.extend(samples);
        Ok(stored.len())
    }

    async fn training_samples(&self) -> RepositoryResult<Vec<TrainingSample>> {
        Ok(self.samples.read().clone())
    }

    async fn training_sample_count(&self) -> RepositoryResult<usize> {
        Ok(self.samples.read().len())
    }

    async fn clear_training_samples(&self) -> RepositoryResult<()> {
        self.samples.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn document(id: &str, city: &str) -> Document {
        Document {
            id: id.to_string(),
            filename: format!("{}.txt", id),
            city: city.to_string(),
            processed_at: Utc::now(),
            rules: Vec::new(),
            text_length: 0,
        }
    }

    #[tokio::test]
    async fn test_store_and_list_in_order() {
        let repo = LocalRepository::new();
        repo.store_document(document("b", "mumbai")).await.unwrap();
        repo.store_document(document("a", "delhi")).await.unwrap();

        let ids: Vec<String> = repo
            .list_documents()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(repo.document_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let repo = LocalRepository::new();
        repo.store_document(document("a", "delhi")).await.unwrap();
        let err = repo.store_document(document("a", "delhi")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo.delete_document("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().entity_id.as_deref(), Some("missing"));
    }

    #[tokio::test]
    async fn test_health_toggle_and_clear() {
        let repo = LocalRepository::new();
        repo.store_document(document("a", "delhi")).await.unwrap();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        repo.clear();
        assert_eq!(repo.document_count().await.unwrap(), 0);
    }
}
