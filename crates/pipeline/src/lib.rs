//! Listing Churn Data-Preparation Pipeline
//!
//! Loads a raw listing/performance CSV, validates coordinates, computes
//! geo features, labels churn targets and writes the augmented table.

mod config;

pub use crate::config::{PipelineConfig, ENV_PREFIX};

use data_validator::Validator;
use feature_engine::{CartesianPoint, DedupReport, GeoFeatureEngine, GeoFeatureError, NeighborStrategy};
use listings::{
    attach_geo_features, extract_points, label_churn, normalize_bedrooms, read_csv, sort_observations, write_csv,
    ChurnReport, TableError,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    GeoFeature(#[from] GeoFeatureError),
    #[error("Failed to write summary to {path}: {source}")]
    Summary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a pipeline run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows_in: usize,
    pub rows_out: usize,
    pub dedup: DedupReport,
    pub centroid: Option<CartesianPoint>,
    pub neighbor_radius_km: f64,
    pub strategy: NeighborStrategy,
    /// Entities with at least one neighbour
    pub entities_with_neighbors: usize,
    pub churn: Option<ChurnReport>,
    pub dropped_columns: usize,
}

/// Initialize logging
pub fn init_logging(json: bool, verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.expect("Failed to set tracing subscriber");
}

/// Run the pipeline end to end
pub fn run(config: &PipelineConfig) -> Result<RunSummary, PipelineError> {
    let engine = GeoFeatureEngine::new(config.geo.clone())?;
    let validator = Validator::new(config.validation.clone());

    let mut table = read_csv(&config.input)?;
    let rows_in = table.len();

    sort_observations(&mut table, &config.columns, &validator)?;
    let points = extract_points(&table, &config.columns, &validator)?;
    let features = engine.compute(&points)?;
    attach_geo_features(&mut table, &config.columns, &features)?;

    let churn = if config.label_churn {
        Some(label_churn(&mut table, &config.columns, &validator, config.censor_month)?)
    } else {
        None
    };

    if let Some(column) = &config.bedrooms_column {
        if table.column_index(column).is_some() {
            let changed = normalize_bedrooms(&mut table, column)?;
            info!("Normalised {} studio bedroom values", changed);
        }
    }

    let dropped_columns = table.drop_columns(&config.drop_columns);
    if dropped_columns < config.drop_columns.len() {
        warn!(
            "Only {} of {} configured drop columns were present",
            dropped_columns,
            config.drop_columns.len()
        );
    }

    write_csv(&config.output, &table)?;

    let summary = RunSummary {
        input: config.input.clone(),
        output: config.output.clone(),
        rows_in,
        rows_out: table.len(),
        dedup: features.dedup_report().clone(),
        centroid: features.centroid(),
        neighbor_radius_km: engine.config().neighbor_radius_km,
        strategy: engine.config().strategy,
        entities_with_neighbors: features.iter().filter(|row| row.neighbor_count > 0).count(),
        churn,
        dropped_columns,
    };

    if let Some(path) = &config.summary {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).map_err(|source| PipelineError::Summary {
            path: path.clone(),
            source,
        })?;
        info!("Wrote run summary to {}", path.display());
    }

    info!(
        "Pipeline finished: {} rows in, {} rows out, {} entities",
        summary.rows_in, summary.rows_out, summary.dedup.entities
    );
    Ok(summary)
}
