//! Parcel geometry primitives.
//!
//! Positions travel as `[longitude, latitude]` pairs, matching the GeoJSON
//! ordering used by map front-ends.

use serde::{Deserialize, Serialize};

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(pair: [f64; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(point: LngLat) -> Self {
        [point.lng, point.lat]
    }
}

/// Land parcel boundary.
///
/// Vertices are ordered; the closing edge (last → first) is implicit, so the
/// first vertex does not need to be repeated. Geometry operations accept any
/// vertex count and degrade to zero for fewer than three vertices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(Vec<LngLat>);

impl Polygon {
    /// Minimum vertex count for a polygon with a non-zero area.
    pub const MIN_VERTICES: usize = 3;

    pub fn new(vertices: Vec<LngLat>) -> Self {
        Self(vertices)
    }

    /// Build a polygon from raw `[lng, lat]` pairs.
    pub fn from_coords(coords: &[[f64; 2]]) -> Self {
        Self(coords.iter().copied().map(LngLat::from).collect())
    }

    pub fn vertices(&self) -> &[LngLat] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the polygon has enough vertices to enclose an area.
    pub fn is_closed_shape(&self) -> bool {
        self.0.len() >= Self::MIN_VERTICES
    }

    /// Same vertices in the opposite traversal direction.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }
}

impl From<Vec<LngLat>> for Polygon {
    fn from(vertices: Vec<LngLat>) -> Self {
        Self(vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_serializes_as_coordinate_pairs() {
        let polygon = Polygon::from_coords(&[[77.6, 12.9], [77.61, 12.9], [77.61, 12.91]]);
        let json = serde_json::to_string(&polygon).unwrap();
        assert_eq!(json, "[[77.6,12.9],[77.61,12.9],[77.61,12.91]]");

        let back: Polygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, polygon);
    }

    #[test]
    fn test_closed_shape_requires_three_vertices() {
        assert!(!Polygon::from_coords(&[[0.0, 0.0], [1.0, 1.0]]).is_closed_shape());
        assert!(Polygon::from_coords(&[[0.0, 0.0], [1.0, 1.0], [1.0, 0.0]]).is_closed_shape());
    }
}
