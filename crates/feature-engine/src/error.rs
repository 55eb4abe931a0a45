//! Geo Feature Error Types

use thiserror::Error;

/// Errors raised while configuring or running the geo feature engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoFeatureError {
    /// Neighbour radius is not a positive finite number
    #[error("Neighbour radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    /// Unrecognised neighbour search strategy name
    #[error("Unknown neighbour strategy: {0} (expected \"pairwise\" or \"indexed\")")]
    UnknownStrategy(String),
}
