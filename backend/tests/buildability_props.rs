//! Property tests for buildability scoring.

use proptest::prelude::*;

use parcel_insight::models::{
    Amenities, Amenity, FactorStatus, Grade, ZoneType, ZoningAttributes,
};
use parcel_insight::services::score_buildability;

/// Sum of the "limited" points of the three amenity factors.
const AMENITY_FLOOR: u32 = 5 + 5 + 3;
/// Lowest zoning compliance plus lowest site area points.
const ZONING_AND_SITE_FLOOR: u32 = 10 + 8;

const CITIES: [&str; 6] = ["bangalore", "mumbai", "delhi", "new_york", "chennai", "atlantis"];

fn attributes() -> impl Strategy<Value = ZoningAttributes> {
    (
        prop::sample::select(ZoneType::ALL.to_vec()),
        prop::option::of(Just("not stated")),
    )
        .prop_map(|(zone, far_override)| {
            let mut attributes = ZoningAttributes::for_zone(zone);
            if let Some(far) = far_override {
                attributes.far = far.to_string();
            }
            attributes
        })
}

fn amenity() -> impl Strategy<Value = Amenity> {
    prop::option::of(0.0f64..40.0).prop_map(|distance| match distance {
        Some(km) => Amenity::new("Stop", km),
        None => Amenity {
            distance_km: None,
            ..Amenity::new("Unmapped", 0.0)
        },
    })
}

fn amenities() -> impl Strategy<Value = Amenities> {
    let list = || prop::collection::vec(amenity(), 0..5);
    (list(), list(), list(), list()).prop_map(|(schools, hospitals, transport, parks)| Amenities {
        schools,
        hospitals,
        transport,
        parks,
    })
}

proptest! {
    #[test]
    fn score_is_bounded_sum_of_factors(
        attributes in attributes(),
        area in 0.0f64..100_000.0,
        amenities in amenities(),
        city in prop::sample::select(CITIES.to_vec()),
    ) {
        let result = score_buildability(&attributes, area, &amenities, city);

        prop_assert_eq!(result.factors.len(), 5);
        prop_assert_eq!(result.score, result.factors.iter().map(|f| f.score).sum::<u32>());
        prop_assert!(result.score <= 100);
        prop_assert!(result.score >= ZONING_AND_SITE_FLOOR + AMENITY_FLOOR);
        prop_assert_eq!(result.grade, Grade::from_score(result.score));
    }

    #[test]
    fn no_amenities_scores_the_limited_floor(
        attributes in attributes(),
        area in 0.0f64..100_000.0,
        city in prop::sample::select(CITIES.to_vec()),
    ) {
        let result = score_buildability(&attributes, area, &Amenities::default(), city);

        let zoning_and_site = result.factors[0].score + result.factors[1].score;
        prop_assert_eq!(result.score, zoning_and_site + AMENITY_FLOOR);
        prop_assert!(result.factors[2..].iter().all(|f| f.status == FactorStatus::Limited));
    }

    #[test]
    fn known_distances_never_score_below_missing_ones(
        attributes in attributes(),
        area in 0.0f64..100_000.0,
        amenities in amenities(),
        city in prop::sample::select(CITIES.to_vec()),
    ) {
        let with = score_buildability(&attributes, area, &amenities, city);
        let without = score_buildability(&attributes, area, &Amenities::default(), city);
        prop_assert!(with.score >= without.score);
    }
}
