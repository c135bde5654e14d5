//! Geographic primitives for the run tracker
//!
//! Positions are plain latitude/longitude pairs in degrees. Distances between
//! consecutive fixes are small, so the great-circle (haversine) distance on a
//! spherical Earth is accurate enough for pace and distance reporting.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Default starting position for simulated runs (Rio de Janeiro)
pub const DEFAULT_START: GeoPoint = GeoPoint {
    latitude: -22.9068,
    longitude: -43.1729,
};

/// A single geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in meters
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self, other)
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        DEFAULT_START
    }
}

/// Haversine great-circle distance between two points, in meters
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + (d_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
    // Rounding can push h just past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(-22.9068, -43.1729);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);

        // 2 * pi * R / 360
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        assert!((haversine_distance(&a, &b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_default_is_rio() {
        let p = GeoPoint::default();
        assert_eq!(p.latitude, -22.9068);
        assert_eq!(p.longitude, -43.1729);
    }
}
