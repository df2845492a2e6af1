//! JSON-file repository: one metadata file per document.
//!
//! Each document is written to `<data_dir>/<id>.json` (pretty-printed, no raw
//! text). On open, every `*.json` file in the directory is loaded back;
//! unreadable files are skipped with a warning. Training samples are not
//! persisted and live in memory for the lifetime of the process.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{info, warn};

use super::local::LocalRepository;
use crate::db::repository::{
    DocumentRepository, ErrorContext, RepositoryError, RepositoryResult, TrainingRepository,
};
use crate::models::{Document, TrainingSample};

pub struct FileRepository {
    data_dir: PathBuf,
    cache: LocalRepository,
}

impl FileRepository {
    /// Open (creating if needed) a data directory and load stored documents.
    pub fn open(data_dir: impl AsRef<Path>) -> RepositoryResult<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            RepositoryError::configuration_with_context(
                format!("Cannot create data directory: {}", e),
                ErrorContext::new("open").with_details(data_dir.display().to_string()),
            )
        })?;

        let documents = Self::load_documents(&data_dir)?;
        info!(
            "Loaded {} documents from {}",
            documents.len(),
            data_dir.display()
        );

        Ok(Self {
            data_dir,
            cache: LocalRepository::with_documents(documents),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn load_documents(data_dir: &Path) -> RepositoryResult<Vec<Document>> {
        let mut documents = Vec::new();
        for entry in std::fs::read_dir(data_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(RepositoryError::from)
                .and_then(|content| {
                    serde_json::from_str::<Document>(&content).map_err(RepositoryError::from)
                });
            match parsed {
                Ok(document) => documents.push(document),
                Err(e) => warn!("Skipping metadata file {}: {}", path.display(), e),
            }
        }
        documents.sort_by(|a, b| {
            a.processed_at
                .cmp(&b.processed_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(documents)
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", id))
    }
}

#[async_trait]
impl DocumentRepository for FileRepository {
    async fn store_document(&self, document: Document) -> RepositoryResult<()> {
        let path = self.document_path(&document.id);
        if self.cache.get_document(&document.id).await.is_ok() {
            return Err(RepositoryError::ValidationError {
                message: format!("Document {} already exists", document.id),
                context: ErrorContext::new("store_document")
                    .with_entity("document")
                    .with_entity_id(&document.id),
            });
        }

        let body = serde_json::to_string_pretty(&document)?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("store_document"))?;
        self.cache.store_document(document).await
    }

    async fn get_document(&self, id: &str) -> RepositoryResult<Document> {
        self.cache.get_document(id).await
    }

    async fn list_documents(&self) -> RepositoryResult<Vec<Document>> {
        self.cache.list_documents().await
    }

    async fn delete_document(&self, id: &str) -> RepositoryResult<Document> {
        let removed = self.cache.delete_document(id).await?;
        match tokio::fs::remove_file(self.document_path(id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Metadata file for document {} was already gone", id);
            }
            Err(e) => return Err(RepositoryError::from(e).with_operation("delete_document")),
        }
        Ok(removed)
    }

    async fn document_count(&self) -> RepositoryResult<usize> {
        self.cache.document_count().await
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(tokio::fs::metadata(&self.data_dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }
}

#[async_trait]
impl TrainingRepository for FileRepository {
    async fn add_training_samples(&self, samples: Vec<TrainingSample>) -> RepositoryResult<usize> {
        self.cache.add_training_samples(samples).await
    }

    async fn training_samples(&self) -> RepositoryResult<Vec<TrainingSample>> {
        self.cache.training_samples().await
    }

    async fn training_sample_count(&self) -> RepositoryResult<usize> {
        self.cache.training_sample_count().await
    }

    async fn clear_training_samples(&self) -> RepositoryResult<()> {
        self.cache.clear_training_samples().await
    }
}
