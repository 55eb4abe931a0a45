//! Listing Tables
//!
//! Holds raw listing/performance rows in memory, loads and writes them as
//! CSV, labels churn targets and joins geo features back onto every row.

mod churn;
mod csv_io;
mod header;
mod points;
mod table;

pub use churn::{label_churn, normalize_bedrooms, ChurnReport, TARGET_COLUMN};
pub use csv_io::{read_csv, read_csv_from, write_csv, write_csv_to};
pub use header::normalize_header;
pub use points::{
    attach_geo_features, extract_points, sort_observations, ListingColumns,
    DIST_FROM_CENTROID_COLUMN, NUM_NEIGHBOURS_COLUMN,
};
pub use table::Table;

use data_validator::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Table errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV has no header row")]
    EmptyHeader,
    #[error("Row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("Missing column: {0}")]
    MissingColumn(String),
    #[error("Column {column} has {found} values, table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Row {row}: no geo features computed for entity {entity}")]
    MissingFeatures { row: usize, entity: String },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}
