//! Service layer for document and training-sample storage.
//!
//! Thin async functions over any [`DocumentRepository`] / [`TrainingRepository`]
//! implementation. They hold the bookkeeping rules (city filtering, summaries,
//! statistics) so each backend only has to store and return records.

use std::collections::BTreeMap;

use log::info;

use super::repository::{DocumentRepository, RepositoryResult, TrainingRepository};
use crate::models::{
    CityStatistics, Document, DocumentSummary, DocumentsOverview, TrainingSample,
};

/// Check if the repository is healthy.
pub async fn health_check<R: DocumentRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Store a processed document and return its summary.
pub async fn store_document<R: DocumentRepository + ?Sized>(
    repo: &R,
    document: Document,
) -> RepositoryResult<DocumentSummary> {
    let summary = document.summary();
    repo.store_document(document).await?;
    info!(
        "Stored document {} ({}) for {} with {} rules",
        summary.id, summary.filename, summary.city, summary.rules_count
    );
    Ok(summary)
}

/// Fetch a full document by id.
pub async fn get_document<R: DocumentRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> RepositoryResult<Document> {
    repo.get_document(id).await
}

/// Delete a document by id, returning the summary of what was removed.
pub async fn delete_document<R: DocumentRepository + ?Sized>(
    repo: &R,
    id: &str,
) -> RepositoryResult<DocumentSummary> {
    let removed = repo.delete_document(id).await?;
    info!("Deleted document {}", id);
    Ok(removed.summary())
}

/// Lowercase and drop spaces and underscores: `"New York"` and `"new_york"`
/// compare equal.
fn normalize_city(city: &str) -> String {
    city.chars()
        .filter(|c| !matches!(c, ' ' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Documents for a city.
///
/// Exact city matches win; if there are none, documents whose city matches
/// case-insensitively (ignoring spaces and underscores) are returned.
pub async fn documents_for_city<R: DocumentRepository + ?Sized>(
    repo: &R,
    city: &str,
) -> RepositoryResult<Vec<Document>> {
    let documents = repo.list_documents().await?;

    let exact: Vec<Document> = documents.iter().filter(|d| d.city == city).cloned().collect();
    if !exact.is_empty() {
        return Ok(exact);
    }

    let target = normalize_city(city);
    Ok(documents
        .into_iter()
        .filter(|d| normalize_city(&d.city) == target)
        .collect())
}

/// List document summaries, optionally filtered by city.
pub async fn list_documents<R: DocumentRepository + ?Sized>(
    repo: &R,
    city: Option<&str>,
) -> RepositoryResult<Vec<DocumentSummary>> {
    let documents = match city.filter(|c| !c.trim().is_empty()) {
        Some(city) => documents_for_city(repo, city).await?,
        None => repo.list_documents().await?,
    };
    Ok(documents.iter().map(Document::summary).collect())
}

/// Per-city document and rule counts, ordered by city name.
pub async fn city_statistics<R: DocumentRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<CityStatistics>> {
    let mut by_city: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for document in repo.list_documents().await? {
        let entry = by_city.entry(document.city.clone()).or_default();
        entry.0 += 1;
        entry.1 += document.rules_count();
    }

    Ok(by_city
        .into_iter()
        .map(|(city, (documents, total_rules))| CityStatistics {
            city,
            documents,
            total_rules,
        })
        .collect())
}

/// Aggregate counts over every stored document.
pub async fn documents_overview<R: DocumentRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<DocumentsOverview> {
    let documents = repo.list_documents().await?;
    let total_documents = documents.len();
    let total_rules_extracted: usize = documents.iter().map(Document::rules_count).sum();

    let mut zone_types_found = BTreeMap::new();
    for zone in documents
        .iter()
        .flat_map(|d| d.rules.iter())
        .filter_map(|r| r.zone_type)
    {
        *zone_types_found.entry(zone).or_insert(0) += 1;
    }

    let average_rules_per_document = if total_documents > 0 {
        total_rules_extracted as f64 / total_documents as f64
    } else {
        0.0
    };

    Ok(DocumentsOverview {
        total_documents,
        total_rules_extracted,
        zone_types_found,
        average_rules_per_document,
    })
}

/// Append training samples, returning the new total.
pub async fn add_training_samples<R: TrainingRepository + ?Sized>(
    repo: &R,
    samples: Vec<TrainingSample>,
) -> RepositoryResult<usize> {
    let added = samples.len();
    let total = repo.add_training_samples(samples).await?;
    info!("Added {} training samples (total: {})", added, total);
    Ok(total)
}

pub async fn training_samples<R: TrainingRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<TrainingSample>> {
    repo.training_samples().await
}
