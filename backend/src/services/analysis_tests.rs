#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::db::repository::DocumentRepository;
    use crate::db::LocalRepository;
    use crate::error::{AnalysisError, AnalysisResult};
    use crate::models::{
        Amenities, FloodRisk, FutureFloodRisk, LightningRisk, LightningRiskLevel, NearbyArea,
        Polygon, WeatherSnapshot, ZoneType,
    };
    use crate::services::analysis::{
        weather_snapshot, LabelledParcel, ParcelAnalysisService, Providers, ReportRequest,
        ReportSettings,
    };
    use crate::services::capabilities::{
        AmenityFinder, AqiForecaster, FloodPredictor, LightningAssessor, RoadConditionProvider,
    };
    use crate::services::predictor::{ModelConfig, RULE_BASED_VERSION};
    use crate::services::risk::{
        fallback_amenities, fallback_aqi_forecast, fallback_flood_assessment,
        fallback_lightning_risk,
    };

    const BYLAWS: &str = "Bengaluru zoning regulations. Residential FAR is 1.75 with \
                          height up to 15m. Commercial FSI of 3.0 and coverage of 60%.";

    fn service() -> ParcelAnalysisService {
        ParcelAnalysisService::new(
            Arc::new(LocalRepository::new()),
            ModelConfig::default(),
            ReportSettings::default(),
        )
    }

    fn parcel() -> Polygon {
        Polygon::from_coords(&[
            [77.5940, 12.9710],
            [77.5950, 12.9710],
            [77.5950, 12.9720],
            [77.5940, 12.9720],
        ])
    }

    fn request(city: &str) -> ReportRequest {
        ReportRequest {
            polygon: parcel(),
            city: Some(city.to_string()),
            ..Default::default()
        }
    }

    struct Broken;

    fn broken<T>(service: &str) -> AnalysisResult<T> {
        Err(AnalysisError::external(service, "connection refused"))
    }

    #[async_trait]
    impl AmenityFinder for Broken {
        async fn find_amenities(&self, _lat: f64, _lng: f64) -> AnalysisResult<Amenities> {
            broken("amenities")
        }
    }

    #[async_trait]
    impl RoadConditionProvider for Broken {
        async fn road_condition(&self, _lat: f64, _lng: f64) -> AnalysisResult<String> {
            broken("overpass")
        }
    }

    #[async_trait]
    impl AqiForecaster for Broken {
        async fn forecast(&self, _current_aqi: f64, _days: usize) -> AnalysisResult<Vec<u32>> {
            broken("aqi")
        }
    }

    #[async_trait]
    impl FloodPredictor for Broken {
        async fn current_risk(
            &self,
            _weather: &WeatherSnapshot,
            _lat: f64,
            _lng: f64,
        ) -> AnalysisResult<FloodRisk> {
            broken("flood")
        }

        async fn future_risk(
            &self,
            _weather: &WeatherSnapshot,
            _lat: f64,
            _lng: f64,
            _risk_multiplier: f64,
        ) -> AnalysisResult<Vec<FutureFloodRisk>> {
            broken("flood")
        }
    }

    #[async_trait]
    impl LightningAssessor for Broken {
        async fn assess(&self, _city: &str, _building_type: ZoneType) -> AnalysisResult<LightningRisk> {
            broken("lightning")
        }
    }

    fn broken_providers() -> Providers {
        let broken = Arc::new(Broken);
        Providers {
            amenities: broken.clone(),
            road: broken.clone(),
            aqi: broken.clone(),
            flood: broken.clone(),
            lightning: broken,
        }
    }

    #[tokio::test]
    async fn test_report_requires_regulations() {
        let err = service().generate_report(request("mumbai")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::NoRegulationsForCity { ref city } if city == "mumbai"));

        let err = service()
            .predict_for_city(Some("mumbai"), &parcel(), &[])
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_ingest_stores_document_and_samples() {
        let service = service();
        let doc = service
            .ingest_document("bylaws.txt", BYLAWS.as_bytes(), Some("delhi"))
            .await
            .unwrap();

        assert_eq!(doc.city, "bangalore");
        assert_eq!(doc.rules_count(), 2);
        assert_eq!(service.repository().document_count().await.unwrap(), 1);
        assert_eq!(service.training_samples().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_upload_after_delete_gets_fresh_id() {
        let service = service();
        let first = service
            .ingest_document("a.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();
        let second = service
            .ingest_document("b.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();
        service.repository().delete_document(&first.id).await.unwrap();

        let third = service
            .ingest_document("c.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();
        assert_ne!(third.id, second.id);
        assert!(third.id.ends_with('2'));
        assert_eq!(service.repository().document_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_report_with_builtin_providers() {
        let service = service();
        service
            .ingest_document("bylaws.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();

        let report = service.generate_report(request("Bangalore")).await.unwrap();
        assert_eq!(report.city, "bangalore");
        assert_eq!(report.aqi_forecast.len(), 30);
        assert_eq!(report.lightning_risk.risk_level, LightningRiskLevel::Moderate);
        assert_eq!(report.road_condition, "unknown");
        assert_eq!(report.flood_risk.future.len(), 3);
        assert_eq!(report.amenities, fallback_amenities());
    }

    #[tokio::test]
    async fn test_failing_providers_fall_back() {
        let service = service().with_providers(broken_providers());
        service
            .ingest_document("bylaws.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();

        let report = service.generate_report(request("bangalore")).await.unwrap();
        assert_eq!(report.amenities, fallback_amenities());
        assert_eq!(report.road_condition, "unknown");
        assert_eq!(report.aqi_forecast, fallback_aqi_forecast(30));
        assert_eq!(report.lightning_risk, fallback_lightning_risk());
        assert_eq!(report.flood_risk, fallback_flood_assessment());
    }

    #[tokio::test]
    async fn test_training_switches_model() {
        let service = service();
        service
            .ingest_document("bylaws.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();
        assert!(!service.is_trained());

        let report = service.train().await.unwrap();
        assert!(service.is_trained());
        assert_eq!(report.version, "1.0.0");
        assert_eq!(service.model_version(), "1.0.0");

        let prediction = service.predict_zoning(&parcel(), &[]).unwrap();
        assert_eq!(prediction.model_version, "1.0.0");
        assert!(prediction.confidence > 0.0 && prediction.confidence <= 1.0);
    }

    #[tokio::test]
    async fn test_labelled_parcels() {
        let service = service();
        let parcel = LabelledParcel {
            city: Some("New York".into()),
            polygon: parcel(),
            nearby_areas: vec![NearbyArea::new(ZoneType::Commercial, 12_000.0, 3.0, 77.59, 12.97)],
            zone_type: ZoneType::Commercial,
            far: 3.0,
        };
        assert_eq!(service.add_labelled_parcels(vec![parcel.clone()]).await.unwrap(), 1);

        let samples = service.training_samples().await.unwrap();
        assert_eq!(samples[0].city, "new_york");

        let invalid = LabelledParcel {
            far: f64::NAN,
            ..parcel
        };
        assert!(matches!(
            service.add_labelled_parcels(vec![invalid]).await,
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_city_and_weather() {
        let service = service();
        assert_eq!(service.resolve_city(None), "bangalore");
        assert_eq!(service.resolve_city(Some("  ")), "bangalore");
        assert_eq!(service.resolve_city(Some("New York")), "new_york");

        let monsoon = weather_snapshot("bangalore", 7);
        let winter = weather_snapshot("bangalore", 1);
        assert!((monsoon.rainfall - winter.rainfall * 3.0).abs() < 1e-9);
    }
    #[tokio::test]
    async fn test_predict_for_city_with_regulations() {
        let service = service();
        service
            .ingest_document("bylaws.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();

        let prediction = service
            .predict_for_city(Some("Bengaluru"), &parcel(), &[])
            .await
            .unwrap();
        assert_eq!(prediction.model_version, RULE_BASED_VERSION);
    }

    /// A fit holding the predictor write lock must not park the runtime:
    /// on the single-threaded test runtime the sleeping task below only
    /// wakes if the report task is waiting on the blocking pool.
    #[tokio::test]
    async fn test_report_waits_for_training_without_blocking_runtime() {
        let service = service();
        service
            .ingest_document("bylaws.txt", BYLAWS.as_bytes(), None)
            .await
            .unwrap();

        let (locked_tx, locked_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let predictor = Arc::clone(&service.predictor);
        let trainer = std::thread::spawn(move || {
            let _fitting = predictor.write();
            locked_tx.send(()).unwrap();
            let _ = release_rx.recv();
        });
        locked_rx.recv().unwrap();

        let pending = tokio::spawn({
            let service = service.clone();
            async move { service.generate_report(request("bangalore")).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        release_tx.send(()).unwrap();
        let report = pending.await.unwrap().unwrap();
        assert_eq!(report.city, "bangalore");
        trainer.join().unwrap();
    }
}
