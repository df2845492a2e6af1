//! Presentation-boundary unit conversions.
//!
//! Internally every area is square meters; these helpers exist for response
//! shaping only.

pub const SQFT_PER_SQM: f64 = 10.7639;

pub fn sqm_to_sqft(sqm: f64) -> f64 {
    sqm * SQFT_PER_SQM
}

/// Convert a price per square meter into a price per square foot.
pub fn per_sqm_to_per_sqft(price_per_sqm: f64) -> f64 {
    price_per_sqm / SQFT_PER_SQM
}
