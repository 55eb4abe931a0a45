//! Points and the local planar projection
//!
//! The projection treats the patch of the Earth covered by a dataset as flat.
//! It is only meaningful for points within a few tens of kilometres of each
//! other: distances between widely dispersed points are badly distorted, and
//! a run over a whole country will silently produce skewed features. Swap in
//! a geodesic (haversine) distance if the data spans more than one metro area.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Earth radius used by the projection (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Identifier of a property/listing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityKey(String);

impl EntityKey {
    /// Create a key from anything string-like
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for EntityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A located property observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyPoint {
    /// Entity key
    pub id: EntityKey,
    /// Latitude in degrees, [-90, 90]
    pub latitude: f64,
    /// Longitude in degrees, [-180, 180]
    pub longitude: f64,
}

impl PropertyPoint {
    /// Create a new point
    pub fn new(id: impl Into<EntityKey>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
        }
    }

    /// Project this point onto the local plane
    pub fn project(&self) -> CartesianPoint {
        project(self.latitude, self.longitude)
    }
}

/// Planar coordinate (km)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
}

impl CartesianPoint {
    /// Create a new planar point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &CartesianPoint) -> f64 {
        distance(self, other)
    }
}

/// Map latitude/longitude (degrees) onto the flat-earth plane.
///
/// `x = R·cos(lat)·cos(lon)`, `y = R·cos(lat)·sin(lon)`. This is not a
/// geodesic projection. Out-of-range inputs are not checked; they produce
/// finite but meaningless coordinates.
pub fn project(latitude: f64, longitude: f64) -> CartesianPoint {
    let lat = latitude.to_radians();
    let lon = longitude.to_radians();
    CartesianPoint {
        x: EARTH_RADIUS_KM * lat.cos() * lon.cos(),
        y: EARTH_RADIUS_KM * lat.cos() * lon.sin(),
    }
}

/// Euclidean distance between two planar points
pub fn distance(p1: &CartesianPoint, p2: &CartesianPoint) -> f64 {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_origin() {
        let p = project(0.0, 0.0);
        assert_eq!(p.x, EARTH_RADIUS_KM);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn test_project_quarter_turn() {
        let p = project(0.0, 90.0);
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - EARTH_RADIUS_KM).abs() < 1e-9);
    }

    #[test]
    fn test_project_pole_collapses() {
        let north = project(90.0, 0.0);
        let other = project(90.0, 120.0);
        assert!(distance(&north, &other) < 1e-9);
    }

    #[test]
    fn test_self_distance_is_zero() {
        let p = project(50.8225, -0.1372);
        assert_eq!(distance(&p, &p), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = project(50.8225, -0.1372);
        let b = project(50.8301, -0.1504);
        assert_eq!(distance(&a, &b), distance(&b, &a));
        assert_eq!(a.distance_to(&b), distance(&a, &b));
    }

    #[test]
    fn test_distance_pythagorean() {
        let a = CartesianPoint::new(0.0, 0.0);
        let b = CartesianPoint::new(3.0, 4.0);
        assert_eq!(distance(&a, &b), 5.0);
    }

    #[test]
    fn test_entity_key_display() {
        let key = EntityKey::from("abc-1");
        assert_eq!(key.to_string(), "abc-1");
        assert_eq!(key.as_str(), "abc-1");
    }
}
