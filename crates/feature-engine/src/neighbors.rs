//! Neighbour density feature
//!
//! A neighbour is another distinct entity at planar distance strictly below
//! the radius. `Pairwise` compares every pair and is O(n²); it is the
//! reference. `Indexed` builds an R-tree over the projected points and only
//! compares candidates inside the radius. Both return the same counts.

use crate::dedup::dedup_points;
use crate::error::GeoFeatureError;
use crate::point::{distance, CartesianPoint, EntityKey, PropertyPoint};
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Default neighbour radius (km)
pub const DEFAULT_NEIGHBOR_RADIUS_KM: f64 = 0.1;

/// Slack applied to the R-tree query so boundary candidates are never lost
/// to rounding; the exact `<` test is applied afterwards.
const INDEX_QUERY_SLACK: f64 = 1.0 + 1e-9;

/// Neighbour search strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborStrategy {
    /// Compare every pair, O(n²)
    Pairwise,
    /// R-tree candidate search
    #[default]
    Indexed,
}

impl std::str::FromStr for NeighborStrategy {
    type Err = GeoFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pairwise" => Ok(Self::Pairwise),
            "indexed" | "rtree" => Ok(Self::Indexed),
            other => Err(GeoFeatureError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Check that a radius can be used as a strict distance threshold
pub fn validate_radius(radius: f64) -> Result<(), GeoFeatureError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(GeoFeatureError::InvalidRadius(radius))
    }
}

/// Count, for each planar point, the other points closer than `radius`.
///
/// Output is index-aligned with `points`.
pub fn count_neighbors(
    points: &[CartesianPoint],
    radius: f64,
    strategy: NeighborStrategy,
) -> Result<Vec<u32>, GeoFeatureError> {
    validate_radius(radius)?;

    let counts = match strategy {
        NeighborStrategy::Pairwise => count_pairwise(points, radius),
        NeighborStrategy::Indexed => count_indexed(points, radius),
    };
    debug!(
        "Counted neighbours for {} points (radius={} km, strategy={:?})",
        points.len(),
        radius,
        strategy
    );

    Ok(counts)
}

fn count_pairwise(points: &[CartesianPoint], radius: f64) -> Vec<u32> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            points
                .iter()
                .enumerate()
                .filter(|(j, q)| *j != i && distance(p, q) < radius)
                .count() as u32
        })
        .collect()
}

fn count_indexed(points: &[CartesianPoint], radius: f64) -> Vec<u32> {
    let tree = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect(),
    );
    let query_radius = radius * INDEX_QUERY_SLACK;
    let query_radius_2 = query_radius * query_radius;

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            tree.locate_within_distance([p.x, p.y], query_radius_2)
                .filter(|candidate| candidate.data != i)
                .filter(|candidate| distance(p, &points[candidate.data]) < radius)
                .count() as u32
        })
        .collect()
}

/// Number of other distinct entities within `radius` km of each entity.
///
/// Entities sharing an exact location count each other.
pub fn neighbor_count(
    points: &[PropertyPoint],
    radius: f64,
    strategy: NeighborStrategy,
) -> Result<BTreeMap<EntityKey, u32>, GeoFeatureError> {
    let (distinct, _) = dedup_points(points);
    let projected: Vec<CartesianPoint> = distinct.iter().map(PropertyPoint::project).collect();
    let counts = count_neighbors(&projected, radius, strategy)?;

    Ok(distinct.into_iter().map(|p| p.id).zip(counts).collect())
}
