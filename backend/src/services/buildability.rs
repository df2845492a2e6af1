//! Buildability scoring.
//!
//! Five independent factors, each with its own point budget. The total is
//! their plain sum (at most 100) and maps to a letter grade.

use crate::catalog::CityCatalog;
use crate::models::{
    Amenities, AmenityCategory, BuildabilityFactor, BuildabilityResult, FactorStatus, Grade,
    ZoningAttributes,
};

/// Points for one distance band.
struct DistanceBands {
    name: &'static str,
    /// Upper bounds (exclusive, km) for excellent and good.
    excellent_below: f64,
    good_below: f64,
    /// Points for excellent, good, fair and limited.
    points: [u32; 4],
}

const SCHOOLS: DistanceBands = DistanceBands {
    name: "School Proximity",
    excellent_below: 1.5,
    good_below: 3.0,
    points: [20, 15, 8, 5],
};

const TRANSPORT: DistanceBands = DistanceBands {
    name: "Transport Access",
    excellent_below: 1.0,
    good_below: 2.0,
    points: [20, 15, 8, 5],
};

const HEALTHCARE: DistanceBands = DistanceBands {
    name: "Healthcare Access",
    excellent_below: 2.0,
    good_below: 4.0,
    points: [15, 10, 5, 3],
};

fn factor(name: &str, score: u32, status: FactorStatus) -> BuildabilityFactor {
    BuildabilityFactor {
        name: name.to_string(),
        score,
        status,
    }
}

impl DistanceBands {
    fn score(&self, distance_km: Option<f64>) -> BuildabilityFactor {
        let [excellent, good, fair, limited] = self.points;
        match distance_km {
            None => factor(self.name, limited, FactorStatus::Limited),
            Some(d) if d < self.excellent_below => factor(self.name, excellent, FactorStatus::Excellent),
            Some(d) if d < self.good_below => factor(self.name, good, FactorStatus::Good),
            Some(_) => factor(self.name, fair, FactorStatus::Fair),
        }
    }
}

fn distances(amenities: &Amenities, category: AmenityCategory) -> Vec<f64> {
    amenities
        .category(category)
        .iter()
        .filter_map(|a| a.distance())
        .collect()
}

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn zoning_compliance(attributes: &ZoningAttributes) -> BuildabilityFactor {
    if attributes.max_far().is_some() {
        factor("Zoning Compliance", 25, FactorStatus::Excellent)
    } else {
        factor("Zoning Compliance", 10, FactorStatus::Limited)
    }
}

fn site_area(area_sqm: f64, city: &str) -> BuildabilityFactor {
    let threshold = CityCatalog::area_threshold_sqm(city);
    if area_sqm > threshold * 2.0 {
        factor("Site Area", 20, FactorStatus::Excellent)
    } else if area_sqm > threshold {
        factor("Site Area", 15, FactorStatus::Good)
    } else {
        factor("Site Area", 8, FactorStatus::Fair)
    }
}

/// Score a parcel.
///
/// Schools and healthcare use the average distance of their entries;
/// transport uses the nearest stop. A category with no usable distance
/// scores its "limited" floor, never zero.
pub fn score_buildability(
    attributes: &ZoningAttributes,
    area_sqm: f64,
    amenities: &Amenities,
    city: &str,
) -> BuildabilityResult {
    let transport_min = distances(amenities, AmenityCategory::Transport)
        .into_iter()
        .min_by(|a, b| a.total_cmp(b));

    let factors = vec![
        zoning_compliance(attributes),
        site_area(area_sqm, city),
        SCHOOLS.score(average(&distances(amenities, AmenityCategory::Schools))),
        TRANSPORT.score(transport_min),
        HEALTHCARE.score(average(&distances(amenities, AmenityCategory::Hospitals))),
    ];

    let score: u32 = factors.iter().map(|f| f.score).sum();
    BuildabilityResult {
        score,
        grade: Grade::from_score(score),
        factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amenity, ZoneType};

    fn residential() -> ZoningAttributes {
        ZoningAttributes::for_zone(ZoneType::Residential)
    }

    #[test]
    fn test_empty_amenities_floor() {
        let result = score_buildability(&residential(), 100.0, &Amenities::default(), "bangalore");

        // 25 zoning + 8 site area + 5 + 5 + 3 limited floors.
        assert_eq!(result.score, 46);
        assert_eq!(result.grade, Grade::C);
        let statuses: Vec<FactorStatus> = result.factors.iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            vec![
                FactorStatus::Excellent,
                FactorStatus::Fair,
                FactorStatus::Limited,
                FactorStatus::Limited,
                FactorStatus::Limited,
            ]
        );
    }

    #[test]
    fn test_perfect_parcel_scores_100() {
        let amenities = Amenities {
            schools: vec![Amenity::new("A", 0.5), Amenity::new("B", 1.0)],
            hospitals: vec![Amenity::new("H", 1.2)],
            transport: vec![Amenity::new("Metro", 0.4), Amenity::new("Bus", 5.0)],
            parks: vec![],
        };
        let result = score_buildability(&residential(), 5000.0, &amenities, "bangalore");
        assert_eq!(result.score, 100);
        assert_eq!(result.grade, Grade::APlus);
    }

    #[test]
    fn test_transport_uses_minimum_schools_use_average() {
        let amenities = Amenities {
            // Average 2.0 -> good, even though one school is very close.
            schools: vec![Amenity::new("Near", 0.2), Amenity::new("Far", 3.8)],
            hospitals: vec![Amenity::new("H", 4.5)],
            // Minimum 0.9 -> excellent, even though the average is 3.0.
            transport: vec![Amenity::new("Stop", 0.9), Amenity::new("Other", 5.1)],
            parks: vec![],
        };
        let result = score_buildability(&residential(), 700.0, &amenities, "bangalore");

        assert_eq!(result.factors[1].score, 15);
        assert_eq!(result.factors[2].status, FactorStatus::Good);
        assert_eq!(result.factors[3].status, FactorStatus::Excellent);
        assert_eq!(result.factors[4].status, FactorStatus::Fair);
        assert_eq!(result.score, 25 + 15 + 15 + 20 + 5);
    }

    #[test]
    fn test_area_threshold_is_city_specific() {
        let empty = Amenities::default();
        let ny = score_buildability(&residential(), 700.0, &empty, "new_york");
        assert_eq!(ny.factors[1].status, FactorStatus::Excellent);

        let hyd = score_buildability(&residential(), 700.0, &empty, "hyderabad");
        assert_eq!(hyd.factors[1].status, FactorStatus::Good);
    }

    #[test]
    fn test_unparseable_far_is_limited() {
        let mut attributes = residential();
        attributes.far = "unspecified".to_string();
        let result = score_buildability(&attributes, 100.0, &Amenities::default(), "bangalore");
        assert_eq!(result.factors[0].score, 10);
        assert_eq!(result.factors[0].status, FactorStatus::Limited);
    }
}
