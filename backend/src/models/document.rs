//! Ingested regulatory documents and their bookkeeping views.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::zoning::{ZoneType, ZoningRule};

/// Metadata of one ingested document. Raw text is never kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub city: String,
    pub processed_at: DateTime<Utc>,
    pub rules: Vec<ZoningRule>,
    /// Character count of the extracted text.
    pub text_length: usize,
}

impl Document {
    pub fn rules_count(&self) -> usize {
        self.rules.len()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            filename: self.filename.clone(),
            city: self.city.clone(),
            processed_at: self.processed_at,
            rules_count: self.rules_count(),
        }
    }
}

/// Listing entry for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub filename: String,
    pub city: String,
    pub processed_at: DateTime<Utc>,
    pub rules_count: usize,
}

/// Per-city ingestion counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityStatistics {
    pub city: String,
    pub documents: usize,
    pub total_rules: usize,
}

/// Aggregate view across every ingested document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentsOverview {
    pub total_documents: usize,
    pub total_rules_extracted: usize,
    pub zone_types_found: BTreeMap<ZoneType, usize>,
    pub average_rules_per_document: f64,
}

/// Supported document containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Txt,
    Docx,
    Pdf,
}

impl DocumentFormat {
    /// Resolve the format from a file name's extension, case-insensitively.
    ///
    /// Returns the lowercased extension (with leading dot) on failure so the
    /// caller can report it.
    pub fn from_filename(filename: &str) -> Result<Self, String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        match extension.as_str() {
            ".txt" => Ok(Self::Txt),
            ".docx" => Ok(Self::Docx),
            ".pdf" => Ok(Self::Pdf),
            _ => Err(extension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_document() -> Document {
        Document {
            id: "202401150930000".into(),
            filename: "bbmp_zoning.txt".into(),
            city: "bangalore".into(),
            processed_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
            rules: vec![
                ZoningRule {
                    zone_type: Some(ZoneType::Residential),
                    far: Some(2.5),
                    source_sentence: "residential far is 2.5".into(),
                    ..Default::default()
                },
                ZoningRule {
                    ground_coverage: Some(60),
                    setback: Some(3),
                    source_sentence: "coverage 60% with setback 3m".into(),
                    ..Default::default()
                },
            ],
            text_length: 420,
        }
    }

    #[test]
    fn test_metadata_round_trip_preserves_rules() {
        let doc = sample_document();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();

        assert_eq!(back.rules, doc.rules);
        assert_eq!(back.rules_count(), 2);
        assert_eq!(back.summary().rules_count, doc.summary().rules_count);
    }

    #[test]
    fn test_metadata_uses_snake_case_keys() {
        let json = serde_json::to_value(sample_document()).unwrap();
        assert!(json.get("processed_at").is_some());
        assert!(json.get("text_length").is_some());
        assert_eq!(json["rules"][0]["zone_type"], "residential");
        assert!(json["rules"][1].get("far").is_none());
    }

    #[test]
    fn test_format_from_filename() {
        assert_eq!(DocumentFormat::from_filename("a.TXT"), Ok(DocumentFormat::Txt));
        assert_eq!(DocumentFormat::from_filename("rules.docx"), Ok(DocumentFormat::Docx));
        assert_eq!(DocumentFormat::from_filename("x.Pdf"), Ok(DocumentFormat::Pdf));
        assert_eq!(DocumentFormat::from_filename("sheet.xlsx"), Err(".xlsx".to_string()));
        assert_eq!(DocumentFormat::from_filename("README"), Err(String::new()));
    }
}
