//! Geo Feature Engine

use crate::centroid::{centroid, distances_to_centroid};
use crate::dedup::{dedup_points, DedupReport};
use crate::error::GeoFeatureError;
use crate::neighbors::{count_neighbors, validate_radius, NeighborStrategy, DEFAULT_NEIGHBOR_RADIUS_KM};
use crate::point::{CartesianPoint, EntityKey, PropertyPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Geo feature configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoFeatureConfig {
    /// Neighbour radius (km, same units as the projection)
    pub neighbor_radius_km: f64,
    /// Neighbour search strategy
    pub strategy: NeighborStrategy,
}

impl Default for GeoFeatureConfig {
    fn default() -> Self {
        Self {
            neighbor_radius_km: DEFAULT_NEIGHBOR_RADIUS_KM,
            strategy: NeighborStrategy::default(),
        }
    }
}

/// Features computed for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoFeatureRow {
    pub id: EntityKey,
    /// Planar distance from the population centroid (km)
    pub dist_from_centroid: f64,
    /// Other entities strictly within the neighbour radius
    pub neighbor_count: u32,
}

/// Output of one engine invocation, keyed by entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoFeatures {
    rows: BTreeMap<EntityKey, GeoFeatureRow>,
    centroid: Option<CartesianPoint>,
    dedup: DedupReport,
}

impl GeoFeatures {
    /// Features for an entity
    pub fn get(&self, id: &EntityKey) -> Option<&GeoFeatureRow> {
        self.rows.get(id)
    }

    /// Rows in entity key order
    pub fn iter(&self) -> impl Iterator<Item = &GeoFeatureRow> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Population centroid in planar coordinates, `None` for empty input
    pub fn centroid(&self) -> Option<CartesianPoint> {
        self.centroid
    }

    /// Deduplication statistics for this run
    pub fn dedup_report(&self) -> &DedupReport {
        &self.dedup
    }
}

/// Stateless engine computing centroid distance and neighbour counts.
///
/// Dedup and projection happen once per call and are shared by both
/// features.
#[derive(Debug, Clone, Default)]
pub struct GeoFeatureEngine {
    config: GeoFeatureConfig,
}

impl GeoFeatureEngine {
    /// Create a new engine, rejecting an unusable radius
    pub fn new(config: GeoFeatureConfig) -> Result<Self, GeoFeatureError> {
        validate_radius(config.neighbor_radius_km)?;
        info!("Creating geo feature engine with config: {:?}", config);
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeoFeatureConfig {
        &self.config
    }

    /// Compute features for every distinct entity in `points`
    pub fn compute(&self, points: &[PropertyPoint]) -> Result<GeoFeatures, GeoFeatureError> {
        let (distinct, dedup) = dedup_points(points);
        let projected: Vec<CartesianPoint> = distinct.iter().map(PropertyPoint::project).collect();

        let center = centroid(&projected);
        let distances = distances_to_centroid(&projected);
        let counts = count_neighbors(&projected, self.config.neighbor_radius_km, self.config.strategy)?;

        let rows: BTreeMap<EntityKey, GeoFeatureRow> = distinct
            .into_iter()
            .zip(distances)
            .zip(counts)
            .map(|((point, dist_from_centroid), neighbor_count)| {
                let row = GeoFeatureRow {
                    id: point.id.clone(),
                    dist_from_centroid,
                    neighbor_count,
                };
                (point.id, row)
            })
            .collect();

        info!(
            "Computed geo features for {} entities from {} observations",
            rows.len(),
            dedup.observations
        );

        Ok(GeoFeatures {
            rows,
            centroid: center,
            dedup,
        })
    }
}
