//! Geospatial Feature Engine
//!
//! Computes per-listing location features for churn models: distance from
//! the population centroid and neighbour density. Coordinates are projected
//! onto a local flat-earth plane (see [`project`]), so results are only
//! meaningful for datasets covering a single metro area.

mod centroid;
mod dedup;
mod engine;
mod error;
mod neighbors;
mod point;

pub use centroid::{centroid, distance_from_centroid, distances_to_centroid};
pub use dedup::{dedup_points, DedupReport};
pub use engine::{GeoFeatureConfig, GeoFeatureEngine, GeoFeatureRow, GeoFeatures};
pub use error::GeoFeatureError;
pub use neighbors::{
    count_neighbors, neighbor_count, validate_radius, NeighborStrategy, DEFAULT_NEIGHBOR_RADIUS_KM,
};
pub use point::{distance, project, CartesianPoint, EntityKey, PropertyPoint, EARTH_RADIUS_KM};
