//! Planar parcel geometry on an equirectangular approximation.
//!
//! Degrees are scaled to meters with fixed equatorial factors
//! ([`METERS_PER_DEGREE_LNG`], [`METERS_PER_DEGREE_LAT`]). Longitude is not
//! compressed by latitude, so results drift at high latitudes; the
//! approximation is meant for regional-scale parcels only.
//!
//! Every function accepts any vertex count and never fails: fewer than three
//! vertices yield a zero area and perimeter, and an empty polygon has its
//! centroid at the origin.

use qtty::Kilometers;

use crate::models::geometry::{LngLat, Polygon};

/// Meters per degree of longitude at the equator.
pub const METERS_PER_DEGREE_LNG: f64 = 111_320.0;
/// Meters per degree of latitude at the equator.
pub const METERS_PER_DEGREE_LAT: f64 = 110_540.0;
/// Kilometers per degree for the coarse point-to-point distance.
pub const KM_PER_DEGREE: f64 = 111.0;
/// Mean Earth radius used by [`haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn scaled(point: &LngLat) -> (f64, f64) {
    (
        point.lng * METERS_PER_DEGREE_LNG,
        point.lat * METERS_PER_DEGREE_LAT,
    )
}

/// Iterate the polygon edges, including the closing edge last → first.
fn edges(polygon: &Polygon) -> impl Iterator<Item = (&LngLat, &LngLat)> {
    let vertices = polygon.vertices();
    let n = vertices.len();
    (0..n).map(move |i| (&vertices[i], &vertices[(i + 1) % n]))
}

/// Shoelace area in square meters.
pub fn area_sqm(polygon: &Polygon) -> f64 {
    if !polygon.is_closed_shape() {
        return 0.0;
    }
    let twice_signed: f64 = edges(polygon)
        .map(|(a, b)| {
            let (xi, yi) = scaled(a);
            let (xj, yj) = scaled(b);
            xi * yj - xj * yi
        })
        .sum();
    (twice_signed / 2.0).abs()
}

/// Sum of scaled edge lengths in meters.
pub fn perimeter_m(polygon: &Polygon) -> f64 {
    if !polygon.is_closed_shape() {
        return 0.0;
    }
    edges(polygon)
        .map(|(a, b)| {
            let dx = (b.lng - a.lng) * METERS_PER_DEGREE_LNG;
            let dy = (b.lat - a.lat) * METERS_PER_DEGREE_LAT;
            dx.hypot(dy)
        })
        .sum()
}

/// Arithmetic mean of the vertices.
///
/// This is not the area-weighted centroid; vertex-dense stretches of an
/// irregular boundary pull the result toward them.
pub fn centroid(polygon: &Polygon) -> LngLat {
    let vertices = polygon.vertices();
    if vertices.is_empty() {
        return LngLat::new(0.0, 0.0);
    }
    let n = vertices.len() as f64;
    let (sum_lng, sum_lat) = vertices
        .iter()
        .fold((0.0, 0.0), |(lng, lat), p| (lng + p.lng, lat + p.lat));
    LngLat::new(sum_lng / n, sum_lat / n)
}

/// Isoperimetric ratio `4πA / P²`: 1 for a circle, smaller for elongated shapes.
pub fn compactness(area_sqm: f64, perimeter_m: f64) -> f64 {
    if perimeter_m > 0.0 {
        (4.0 * std::f64::consts::PI * area_sqm) / (perimeter_m * perimeter_m)
    } else {
        0.0
    }
}

/// Euclidean degree distance scaled by 111 km per degree.
///
/// Ignores latitude-dependent longitude compression; acceptable only for
/// regional distances.
pub fn distance_km(a: LngLat, b: LngLat) -> Kilometers {
    let d = (a.lng - b.lng).hypot(a.lat - b.lat);
    Kilometers::new(d * KM_PER_DEGREE)
}

/// Great-circle distance between two positions.
pub fn haversine_km(a: LngLat, b: LngLat) -> Kilometers {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    Kilometers::new(EARTH_RADIUS_KM * c)
}
