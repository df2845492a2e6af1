#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::db::repositories::LocalRepository;
    use crate::db::services::{
        city_statistics, delete_document, documents_overview, list_documents, store_document,
    };
    use crate::models::{Document, ZoneType, ZoningRule};

    fn rule(zone: Option<ZoneType>, far: f64) -> ZoningRule {
        ZoningRule {
            zone_type: zone,
            far: Some(far),
            source_sentence: "far is given".to_string(),
            ..ZoningRule::default()
        }
    }

    fn create_test_document(id: &str, city: &str, rules: Vec<ZoningRule>) -> Document {
        Document {
            id: id.to_string(),
            filename: format!("{}.txt", id),
            city: city.to_string(),
            processed_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            rules,
            text_length: 120,
        }
    }

    async fn seeded_repo() -> LocalRepository {
        let repo = LocalRepository::new();
        let docs = vec![
            create_test_document(
                "d1",
                "new_york",
                vec![rule(Some(ZoneType::Commercial), 3.0)],
            ),
            create_test_document(
                "d2",
                "bangalore",
                vec![
                    rule(Some(ZoneType::Residential), 2.0),
                    rule(Some(ZoneType::Residential), 1.75),
                    rule(None, 2.5),
                ],
            ),
            create_test_document("d3", "bangalore", vec![]),
        ];
        for doc in docs {
            store_document(&repo, doc).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_list_documents_without_filter() {
        let repo = seeded_repo().await;
        let summaries = list_documents(&repo, None).await.unwrap();

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[1].rules_count, 3);
    }

    #[tokio::test]
    async fn test_city_filter_exact_then_normalized() {
        let repo = seeded_repo().await;

        let exact = list_documents(&repo, Some("bangalore")).await.unwrap();
        assert_eq!(exact.len(), 2);

        let normalized = list_documents(&repo, Some("New York")).await.unwrap();
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized[0].id, "d1");

        let none = list_documents(&repo, Some("mumbai")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_blank_filter_lists_everything() {
        let repo = seeded_repo().await;
        assert_eq!(list_documents(&repo, Some("  ")).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_city_statistics() {
        let repo = seeded_repo().await;
        let stats = city_statistics(&repo).await.unwrap();

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].city, "bangalore");
        assert_eq!(stats[0].documents, 2);
        assert_eq!(stats[0].total_rules, 3);
        assert_eq!(stats[1].city, "new_york");
    }

    #[tokio::test]
    async fn test_documents_overview() {
        let repo = seeded_repo().await;
        let overview = documents_overview(&repo).await.unwrap();

        assert_eq!(overview.total_documents, 3);
        assert_eq!(overview.total_rules_extracted, 4);
        assert_eq!(overview.zone_types_found.get(&ZoneType::Residential), Some(&2));
        assert_eq!(overview.zone_types_found.get(&ZoneType::Commercial), Some(&1));
        assert!((overview.average_rules_per_document - 4.0 / 3.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_overview_of_empty_repository() {
        let repo = LocalRepository::new();
        let overview = documents_overview(&repo).await.unwrap();

        assert_eq!(overview.total_documents, 0);
        assert_eq!(overview.average_rules_per_document, 0.0);
    }

    #[tokio::test]
    async fn test_delete_document() {
        let repo = seeded_repo().await;
        let removed = delete_document(&repo, "d2").await.unwrap();
        assert_eq!(removed.city, "bangalore");

        assert_eq!(list_documents(&repo, None).await.unwrap().len(), 2);
        assert!(delete_document(&repo, "d2").await.unwrap_err().is_not_found());
    }
}
