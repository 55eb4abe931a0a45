//! Centroid distance feature

use crate::dedup::dedup_points;
use crate::point::{CartesianPoint, EntityKey, PropertyPoint};
use std::collections::BTreeMap;

/// Unweighted mean of a set of planar points.
///
/// The mean is taken over offsets from the first point, which keeps full
/// precision for coordinates around ±6371 km and makes the centroid of
/// identical points exactly that point. Returns `None` for an empty slice.
pub fn centroid(points: &[CartesianPoint]) -> Option<CartesianPoint> {
    let origin = *points.first()?;
    let n = points.len() as f64;

    let (sum_dx, sum_dy) = points.iter().fold((0.0, 0.0), |(sx, sy), p| {
        (sx + (p.x - origin.x), sy + (p.y - origin.y))
    });

    Some(CartesianPoint {
        x: origin.x + sum_dx / n,
        y: origin.y + sum_dy / n,
    })
}

/// Distance of each planar point from the centroid of the whole set
pub fn distances_to_centroid(points: &[CartesianPoint]) -> Vec<f64> {
    match centroid(points) {
        Some(center) => points.iter().map(|p| p.distance_to(&center)).collect(),
        None => Vec::new(),
    }
}

/// Distance (km) of every distinct entity from the population centroid.
///
/// Each entity counts once regardless of how many observations it has.
pub fn distance_from_centroid(points: &[PropertyPoint]) -> BTreeMap<EntityKey, f64> {
    let (distinct, _) = dedup_points(points);
    let projected: Vec<CartesianPoint> = distinct.iter().map(PropertyPoint::project).collect();

    distinct
        .into_iter()
        .map(|p| p.id)
        .zip(distances_to_centroid(&projected))
        .collect()
}
