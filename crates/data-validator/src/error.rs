//! Validation Error Types

use thiserror::Error;

/// Errors during listing validation.
///
/// `row` is the 1-based data row (header excluded) and `entity` the raw
/// entity key of that row, so bad data can be traced upstream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("row {row} (entity {entity}): {field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        row: usize,
        entity: String,
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Required field is empty
    #[error("row {row} (entity {entity}): missing required field {field}")]
    MissingField {
        row: usize,
        entity: String,
        field: String,
    },

    /// Field is not a number
    #[error("row {row} (entity {entity}): {field} value {raw:?} is not a number")]
    InvalidNumber {
        row: usize,
        entity: String,
        field: String,
        raw: String,
    },

    /// Field parsed to NaN or infinity
    #[error("row {row} (entity {entity}): {field} value {raw:?} is not finite")]
    NonFinite {
        row: usize,
        entity: String,
        field: String,
        raw: String,
    },

    /// Field is not a date
    #[error("row {row} (entity {entity}): {field} value {raw:?} is not a YYYY-MM-DD or YYYY-MM date")]
    InvalidDate {
        row: usize,
        entity: String,
        field: String,
        raw: String,
    },

    /// Entity key is blank
    #[error("row {row}: entity key is blank")]
    BlankEntity { row: usize },
}

impl ValidationError {
    /// Data row the error refers to
    pub fn row(&self) -> usize {
        match self {
            ValidationError::OutOfRange { row, .. }
            | ValidationError::MissingField { row, .. }
            | ValidationError::InvalidNumber { row, .. }
            | ValidationError::NonFinite { row, .. }
            | ValidationError::InvalidDate { row, .. }
            | ValidationError::BlankEntity { row } => *row,
        }
    }
}
