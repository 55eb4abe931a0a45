//! Per-entity point deduplication
//!
//! Location is treated as time-invariant per entity, but raw tables carry
//! one row per observation. The last observation of a key in input order
//! wins; callers sort by observation time first so that "last" means
//! "most recent".

use crate::point::{EntityKey, PropertyPoint};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of collapsing observations to one point per entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    /// Rows seen
    pub observations: usize,
    /// Distinct entity keys kept
    pub entities: usize,
    /// Keys whose observations disagreed on coordinates
    pub conflicting_keys: usize,
}

/// Collapse observations to one point per entity key.
///
/// Output order is the order in which each key was first seen, with the
/// coordinates of its last observation.
pub fn dedup_points(points: &[PropertyPoint]) -> (Vec<PropertyPoint>, DedupReport) {
    let mut slots: HashMap<&EntityKey, usize> = HashMap::with_capacity(points.len());
    let mut distinct: Vec<PropertyPoint> = Vec::new();
    let mut conflicted: Vec<bool> = Vec::new();

    for point in points {
        match slots.get(&point.id) {
            Some(&slot) => {
                let kept = &mut distinct[slot];
                if kept.latitude != point.latitude || kept.longitude != point.longitude {
                    if !conflicted[slot] {
                        warn!(
                            "Entity {} has conflicting coordinates ({}, {}) vs ({}, {}); keeping the latest",
                            point.id, kept.latitude, kept.longitude, point.latitude, point.longitude
                        );
                    }
                    conflicted[slot] = true;
                    kept.latitude = point.latitude;
                    kept.longitude = point.longitude;
                }
            }
            None => {
                slots.insert(&point.id, distinct.len());
                distinct.push(point.clone());
                conflicted.push(false);
            }
        }
    }

    let report = DedupReport {
        observations: points.len(),
        entities: distinct.len(),
        conflicting_keys: conflicted.iter().filter(|c| **c).count(),
    };
    debug!(
        "Deduplicated {} observations into {} entities ({} conflicting)",
        report.observations, report.entities, report.conflicting_keys
    );

    (distinct, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_identical_rows() {
        let points = vec![
            PropertyPoint::new("a", 50.0, -0.1),
            PropertyPoint::new("b", 50.1, -0.2),
            PropertyPoint::new("a", 50.0, -0.1),
        ];
        let (distinct, report) = dedup_points(&points);
        assert_eq!(distinct.len(), 2);
        assert_eq!(distinct[0].id.as_str(), "a");
        assert_eq!(distinct[1].id.as_str(), "b");
        assert_eq!(report.observations, 3);
        assert_eq!(report.conflicting_keys, 0);
    }

    #[test]
    fn test_dedup_latest_wins() {
        let points = vec![
            PropertyPoint::new("a", 50.0, -0.1),
            PropertyPoint::new("a", 50.0005, -0.1),
            PropertyPoint::new("a", 50.001, -0.1),
        ];
        let (distinct, report) = dedup_points(&points);
        assert_eq!(distinct.len(), 1);
        assert_eq!(distinct[0].latitude, 50.001);
        assert_eq!(report.conflicting_keys, 1);
    }

    #[test]
    fn test_dedup_empty() {
        let (distinct, report) = dedup_points(&[]);
        assert!(distinct.is_empty());
        assert_eq!(report, DedupReport::default());
    }
}
