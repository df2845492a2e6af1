//! Document ingestion: uploaded bytes to a stored [`Document`], and document
//! rules to training samples.

use chrono::{DateTime, Utc};
use log::info;

use crate::algorithms::geometry::{METERS_PER_DEGREE_LAT, METERS_PER_DEGREE_LNG};
use crate::catalog::{CityCatalog, DEFAULT_CITY};
use crate::error::AnalysisResult;
use crate::models::features::AVG_NEARBY_FAR;
use crate::models::{Document, LngLat, Polygon, TrainingSample};
use crate::services::features::extract_features;
use crate::services::rule_extractor::{detect_city, extract_rules};
use crate::services::text_extract::extract_text;

/// Area of the synthetic reference parcel used for rule-derived samples.
pub const REFERENCE_PARCEL_SQM: f64 = 1000.0;

const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const ID_TIMESTAMP_LEN: usize = 14;

/// Document id: UTC timestamp followed by a sequence number.
pub fn document_id(processed_at: DateTime<Utc>, sequence: usize) -> String {
    format!("{}{}", processed_at.format(ID_TIMESTAMP_FORMAT), sequence)
}

/// Sequence for the next document: one past the highest sequence among
/// `existing_ids`, so an id freed by a deletion is never handed out while a
/// later one is still stored. Equals the document count when nothing was
/// deleted.
pub fn next_sequence<'a>(existing_ids: impl IntoIterator<Item = &'a str>) -> usize {
    existing_ids
        .into_iter()
        .filter_map(|id| id.get(ID_TIMESTAMP_LEN..)?.parse::<usize>().ok())
        .max()
        .map_or(0, |highest| highest + 1)
}

/// Extract, parse and describe one uploaded document at a given instant.
///
/// A city detected in the text overrides `default_city`. The raw text is
/// dropped once rules are extracted; only its character count is kept.
pub fn ingest_at(
    filename: &str,
    bytes: &[u8],
    default_city: &str,
    sequence: usize,
    processed_at: DateTime<Utc>,
) -> AnalysisResult<Document> {
    let text = extract_text(filename, bytes)?;
    let rules = extract_rules(&text);
    let text_length = text.chars().count();
    let city = detect_city(&text)
        .map(str::to_string)
        .unwrap_or_else(|| CityCatalog::canonical_key(default_city));

    info!(
        "Processed {} for {}: {} rules from {} characters",
        filename,
        city,
        rules.len(),
        text_length
    );

    Ok(Document {
        id: document_id(processed_at, sequence),
        filename: filename.to_string(),
        city,
        processed_at,
        text_length,
        rules,
    })
}

pub fn ingest(
    filename: &str,
    bytes: &[u8],
    default_city: &str,
    sequence: usize,
) -> AnalysisResult<Document> {
    ingest_at(filename, bytes, default_city, sequence, Utc::now())
}

/// Square parcel of [`REFERENCE_PARCEL_SQM`] centered on the city center
/// (the default city's center when the city has none).
pub fn reference_parcel(city: &str) -> Polygon {
    let center = CityCatalog::center(city)
        .or_else(|| CityCatalog::center(DEFAULT_CITY))
        .unwrap_or(LngLat::new(0.0, 0.0));
    let side_m = REFERENCE_PARCEL_SQM.sqrt();
    let half_lng = side_m / METERS_PER_DEGREE_LNG / 2.0;
    let half_lat = side_m / METERS_PER_DEGREE_LAT / 2.0;

    Polygon::from_coords(&[
        [center.lng - half_lng, center.lat - half_lat],
        [center.lng + half_lng, center.lat - half_lat],
        [center.lng + half_lng, center.lat + half_lat],
        [center.lng - half_lng, center.lat + half_lat],
    ])
}

/// Training samples for every rule carrying both a zone type and a FAR.
pub fn rules_to_training_samples(document: &Document) -> Vec<TrainingSample> {
    let base = extract_features(&reference_parcel(&document.city), &[]);

    document
        .rules
        .iter()
        .filter_map(|rule| {
            let zone_type = rule.zone_type?;
            let far = rule.far?;
            let mut features = base.clone();
            features.insert(AVG_NEARBY_FAR, far);
            Some(TrainingSample {
                city: document.city.clone(),
                features,
                zone_type,
                far,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::geometry::area_sqm;
    use crate::error::AnalysisError;
    use crate::models::features::FEATURE_NAMES;
    use crate::models::ZoneType;
    use chrono::TimeZone;

    const BYLAWS: &str = "BBMP Revised Master Plan.\n\n\
        Residential plots: FAR is 1.75 and height up to 15m. \
        Commercial zones have FSI of 3.0 with coverage of 60%. \
        Parking must be provided.";

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn test_document_id_format() {
        assert_eq!(document_id(at(), 0), "202403051407090");
        assert_eq!(document_id(at(), 12), "2024030514070912");
    }

    #[test]
    fn test_next_sequence_follows_highest_stored_id() {
        assert_eq!(next_sequence(Vec::<&str>::new()), 0);
        assert_eq!(next_sequence(["202403051407090", "202403051407091"]), 2);
        // "...0" was deleted; "...1" is still stored
        assert_eq!(next_sequence(["202403051407091"]), 2);
        assert_eq!(next_sequence(["2024030514070912", "202403051407093"]), 13);
        assert_eq!(next_sequence(["short", "20240305140709x"]), 0);
    }

    #[test]
    fn test_ingest_detects_city_and_rules() {
        let doc = ingest_at("bylaws.txt", BYLAWS.as_bytes(), "mumbai", 3, at()).unwrap();
        assert_eq!(doc.id, "202403051407093");
        assert_eq!(doc.city, "bangalore");
        assert_eq!(doc.rules_count(), 2);
        assert_eq!(doc.rules[0].zone_type, Some(ZoneType::Residential));
        assert_eq!(doc.rules[1].far, Some(3.0));
        assert_eq!(doc.text_length, BYLAWS.chars().count());
    }

    #[test]
    fn test_ingest_keeps_default_city_without_keywords() {
        let doc = ingest_at("plain.txt", b"FAR is 2.0 with setback 3m", "Hyderabad", 0, at())
            .unwrap();
        assert_eq!(doc.city, "hyderabad");
    }

    #[test]
    fn test_ingest_rejects_unknown_extension() {
        let err = ingest("table.csv", b"far,2", "bangalore", 0).unwrap_err();
        assert!(matches!(err, AnalysisError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_reference_parcel_area() {
        let parcel = reference_parcel("mumbai");
        assert!((area_sqm(&parcel) - REFERENCE_PARCEL_SQM).abs() < 0.5);

        let unknown = reference_parcel("atlantis");
        assert_eq!(unknown, reference_parcel(DEFAULT_CITY));
    }

    #[test]
    fn test_rules_to_samples_need_zone_and_far() {
        let doc = ingest_at("bylaws.txt", BYLAWS.as_bytes(), "bangalore", 0, at()).unwrap();
        let samples = rules_to_training_samples(&doc);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].zone_type, ZoneType::Residential);
        assert_eq!(samples[0].far, 1.75);
        assert_eq!(samples[0].features.get(AVG_NEARBY_FAR), Some(1.75));
        assert_eq!(samples[1].features.get(AVG_NEARBY_FAR), Some(3.0));
        assert_eq!(
            samples[0].features.names().collect::<Vec<_>>(),
            FEATURE_NAMES.to_vec()
        );
    }
}
