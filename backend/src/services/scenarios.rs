//! Conservative / Moderate / Maximum build-out scenarios.

use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{Scenario, ZoningAttributes};

/// Construction cost per built square meter.
pub const COST_PER_SQM: f64 = 35_000.0;

struct Tier {
    name: &'static str,
    description: &'static str,
    far_fraction: f64,
    open_space_fraction: f64,
    roi: &'static str,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "Conservative",
        description: "Minimum FAR utilization with maximum open space",
        far_fraction: 0.6,
        open_space_fraction: 0.5,
        roi: "12-15%",
    },
    Tier {
        name: "Moderate",
        description: "Balanced development with good open space",
        far_fraction: 0.8,
        open_space_fraction: 0.35,
        roi: "15-18%",
    },
    Tier {
        name: "Maximum",
        description: "Full FAR utilization for maximum returns",
        far_fraction: 1.0,
        open_space_fraction: 0.25,
        roi: "18-22%",
    },
];

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Floors needed to fit `built_sqm` on a footprint of `footprint_sqm`, at least one.
fn floor_count(built_sqm: f64, footprint_sqm: f64) -> u32 {
    if footprint_sqm > 0.0 {
        ((built_sqm / footprint_sqm).floor() as u32).max(1)
    } else {
        1
    }
}

/// Derive the three scenarios from the FAR and coverage upper bounds.
///
/// Fails only when the FAR range has no parseable upper bound; a missing
/// coverage bound is treated as zero coverage, which yields one floor.
pub fn generate_scenarios(
    area_sqm: f64,
    attributes: &ZoningAttributes,
) -> AnalysisResult<Vec<Scenario>> {
    let max_far = attributes.max_far().ok_or_else(|| {
        AnalysisError::InvalidInput(format!("unparseable FAR range '{}'", attributes.far))
    })?;
    let coverage = attributes.max_coverage_fraction().unwrap_or(0.0);
    let footprint = area_sqm * coverage;

    Ok(TIERS
        .iter()
        .map(|tier| {
            let far = max_far * tier.far_fraction;
            let built = (area_sqm * far).trunc();
            Scenario {
                name: tier.name.to_string(),
                description: tier.description.to_string(),
                far: round1(far),
                floors: floor_count(built, footprint),
                built_area_sqm: built,
                open_space_sqm: (area_sqm * tier.open_space_fraction).trunc(),
                estimated_cost: (built * COST_PER_SQM).trunc(),
                roi: tier.roi.to_string(),
            }
        })
        .collect())
}
