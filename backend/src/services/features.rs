//! Feature extraction: polygon plus neighbourhood context to a [`FeatureVector`].

use crate::algorithms::geometry::{area_sqm, centroid, compactness, distance_km, perimeter_m};
use crate::models::features::{
    nearby_count_name, AREA, AVG_NEARBY_FAR, AVG_NEARBY_VALUE, CENTROID_LAT, CENTROID_LNG,
    COMPACTNESS, DIST_TO_COMMERCIAL, PERIMETER,
};
use crate::models::{FeatureVector, LngLat, NearbyArea, NearbyZone, Polygon, ZoneType};

/// Average nearby value used when no neighbour reports one.
pub const DEFAULT_NEARBY_VALUE: f64 = 8500.0;
/// FAR assumed for a neighbour that does not report one.
pub const DEFAULT_NEARBY_FAR: f64 = 2.0;
/// Distance to commercial (km) when neighbours exist but none is commercial.
pub const NO_COMMERCIAL_DISTANCE_KM: f64 = 10.0;
/// Distance to commercial (km) when there is no neighbourhood context at all.
pub const DEFAULT_COMMERCIAL_DISTANCE_KM: f64 = 5.0;

/// Neighbour counts assumed for an empty neighbourhood.
fn default_zone_count(zone: ZoneType) -> f64 {
    match zone {
        ZoneType::Residential => 3.0,
        ZoneType::Commercial => 1.0,
        ZoneType::Industrial => 0.0,
        ZoneType::Mixed => 1.0,
    }
}

/// Build the feature vector for a parcel.
///
/// Keys are always inserted in the canonical order of
/// [`crate::models::features::FEATURE_NAMES`]. An empty neighbourhood yields
/// fixed non-zero defaults for every nearby-derived feature.
pub fn extract_features(polygon: &Polygon, nearby: &[NearbyArea]) -> FeatureVector {
    let area = area_sqm(polygon);
    let perimeter = perimeter_m(polygon);
    let center = centroid(polygon);

    let mut features = FeatureVector::new()
        .with(AREA, area)
        .with(PERIMETER, perimeter)
        .with(COMPACTNESS, compactness(area, perimeter))
        .with(CENTROID_LNG, center.lng)
        .with(CENTROID_LAT, center.lat);

    if nearby.is_empty() {
        features.insert(AVG_NEARBY_VALUE, DEFAULT_NEARBY_VALUE);
        for zone in ZoneType::ALL {
            features.insert(nearby_count_name(zone), default_zone_count(zone));
        }
        features.insert(AVG_NEARBY_FAR, DEFAULT_NEARBY_FAR);
        features.insert(DIST_TO_COMMERCIAL, DEFAULT_COMMERCIAL_DISTANCE_KM);
        return features;
    }

    features.insert(
        AVG_NEARBY_VALUE,
        average_nearby_value(nearby).unwrap_or(DEFAULT_NEARBY_VALUE),
    );

    for zone in ZoneType::ALL {
        let count = nearby
            .iter()
            .filter(|n| n.zone() == NearbyZone::Known(zone))
            .count();
        features.insert(nearby_count_name(zone), count as f64);
    }

    let far_sum: f64 = nearby
        .iter()
        .map(|n| n.far.unwrap_or(DEFAULT_NEARBY_FAR))
        .sum();
    features.insert(AVG_NEARBY_FAR, far_sum / nearby.len() as f64);

    features.insert(
        DIST_TO_COMMERCIAL,
        nearest_commercial_km(center, nearby).unwrap_or(NO_COMMERCIAL_DISTANCE_KM),
    );

    features
}

/// Mean of the values neighbours actually reported.
pub fn average_nearby_value(nearby: &[NearbyArea]) -> Option<f64> {
    let values: Vec<f64> = nearby
        .iter()
        .filter_map(|n| n.value)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Distance from the parcel centroid to the closest located commercial neighbour.
fn nearest_commercial_km(center: LngLat, nearby: &[NearbyArea]) -> Option<f64> {
    nearby
        .iter()
        .filter(|n| n.zone() == NearbyZone::Known(ZoneType::Commercial))
        .filter_map(|n| n.position())
        .map(|(lng, lat)| distance_km(center, LngLat::new(lng, lat)).value())
        .min_by(|a, b| a.total_cmp(b))
}
