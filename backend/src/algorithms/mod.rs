//! Pure numeric algorithms with no I/O and no shared state.

pub mod geometry;

pub use geometry::{area_sqm, centroid, compactness, distance_km, haversine_km, perimeter_m};
