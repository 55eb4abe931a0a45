//! Field Validator for Listing Rows

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Latitude valid range (degrees)
    pub latitude_range: (f64, f64),
    /// Longitude valid range (degrees)
    pub longitude_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            latitude_range: (-90.0, 90.0),
            longitude_range: (-180.0, 180.0),
        }
    }
}

/// Where a value came from, for error context
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    /// 1-based data row
    pub row: usize,
    /// Raw entity key of the row
    pub entity: &'a str,
}

impl<'a> RowContext<'a> {
    pub fn new(row: usize, entity: &'a str) -> Self {
        Self { row, entity }
    }
}

/// Validator for raw listing fields
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        debug!("Creating validator with config: {:?}", config);
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Parse a numeric field and check it against a range
    pub fn parse_in_range(
        &self,
        field: &str,
        raw: &str,
        range: (f64, f64),
        ctx: RowContext<'_>,
    ) -> Result<f64, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField {
                row: ctx.row,
                entity: ctx.entity.to_string(),
                field: field.to_string(),
            });
        }

        let value: f64 = trimmed.parse().map_err(|_| ValidationError::InvalidNumber {
            row: ctx.row,
            entity: ctx.entity.to_string(),
            field: field.to_string(),
            raw: trimmed.to_string(),
        })?;

        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                row: ctx.row,
                entity: ctx.entity.to_string(),
                field: field.to_string(),
                raw: trimmed.to_string(),
            });
        }

        if value < range.0 || value > range.1 {
            return Err(ValidationError::OutOfRange {
                row: ctx.row,
                entity: ctx.entity.to_string(),
                field: field.to_string(),
                value,
                min: range.0,
                max: range.1,
            });
        }

        Ok(value)
    }

    /// Parse and validate a latitude
    pub fn parse_latitude(&self, raw: &str, ctx: RowContext<'_>) -> Result<f64, ValidationError> {
        self.parse_in_range("latitude", raw, self.config.latitude_range, ctx)
    }

    /// Parse and validate a longitude
    pub fn parse_longitude(&self, raw: &str, ctx: RowContext<'_>) -> Result<f64, ValidationError> {
        self.parse_in_range("longitude", raw, self.config.longitude_range, ctx)
    }

    /// Check that an entity key is not blank, returning it trimmed
    pub fn validate_entity_key<'r>(&self, raw: &'r str, row: usize) -> Result<&'r str, ValidationError> {
        let key = raw.trim();
        if key.is_empty() {
            Err(ValidationError::BlankEntity { row })
        } else {
            Ok(key)
        }
    }

    /// Parse a reporting month (`YYYY-MM-DD`, or `YYYY-MM` as the first day)
    pub fn parse_month(
        &self,
        field: &str,
        raw: &str,
        ctx: RowContext<'_>,
    ) -> Result<NaiveDate, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingField {
                row: ctx.row,
                entity: ctx.entity.to_string(),
                field: field.to_string(),
            });
        }

        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d"))
            .map_err(|_| ValidationError::InvalidDate {
                row: ctx.row,
                entity: ctx.entity.to_string(),
                field: field.to_string(),
                raw: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RowContext<'static> {
        RowContext::new(7, "1001")
    }

    #[test]
    fn test_valid_coordinates() {
        let validator = Validator::default();
        assert_eq!(validator.parse_latitude("50.8225", ctx()).unwrap(), 50.8225);
        assert_eq!(validator.parse_longitude(" -0.1372 ", ctx()).unwrap(), -0.1372);
        assert!(validator.parse_latitude("90", ctx()).is_ok());
        assert!(validator.parse_longitude("-180", ctx()).is_ok());
    }

    #[test]
    fn test_missing_coordinate() {
        let validator = Validator::default();
        let err = validator.parse_latitude("  ", ctx()).unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { row: 7, .. }));
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let validator = Validator::default();
        let err = validator.parse_longitude("west", ctx()).unwrap_err();
        assert_eq!(err.row(), 7);
        assert!(err.to_string().contains("entity 1001"));
        assert!(err.to_string().contains("\"west\""));
    }

    #[test]
    fn test_non_finite_coordinate() {
        let validator = Validator::default();
        assert!(matches!(
            validator.parse_latitude("NaN", ctx()),
            Err(ValidationError::NonFinite { .. })
        ));
        assert!(matches!(
            validator.parse_latitude("inf", ctx()),
            Err(ValidationError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_out_of_range() {
        let validator = Validator::default();
        assert!(matches!(
            validator.parse_latitude("91", ctx()),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validator.parse_longitude("-180.5", ctx()),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_custom_range() {
        let validator = Validator::new(ValidationConfig {
            latitude_range: (50.0, 51.0),
            longitude_range: (-1.0, 1.0),
        });
        assert!(validator.parse_latitude("49.9", ctx()).is_err());
        assert!(validator.parse_latitude("50.5", ctx()).is_ok());
    }

    #[test]
    fn test_blank_entity() {
        let validator = Validator::default();
        assert_eq!(validator.validate_entity_key(" 42 ", 1).unwrap(), "42");
        assert_eq!(
            validator.validate_entity_key("", 3).unwrap_err(),
            ValidationError::BlankEntity { row: 3 }
        );
    }

    #[test]
    fn test_parse_month() {
        let validator = Validator::default();
        let expected = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        assert_eq!(validator.parse_month("reporting_month", "2023-09-01", ctx()).unwrap(), expected);
        assert_eq!(validator.parse_month("reporting_month", "2023-09", ctx()).unwrap(), expected);
        assert!(matches!(
            validator.parse_month("reporting_month", "Sept 2023", ctx()),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    proptest::proptest! {
        #[test]
        fn prop_in_range_latitude_parses(lat in -90.0f64..=90.0) {
            let parsed = Validator::default().parse_latitude(&lat.to_string(), ctx()).unwrap();
            proptest::prop_assert_eq!(parsed, lat);
        }

        #[test]
        fn prop_out_of_range_longitude_rejected(excess in 1e-6f64..1e6, west in proptest::bool::ANY) {
            let lon = if west { -180.0 - excess } else { 180.0 + excess };
            let is_out_of_range = matches!(
                Validator::default().parse_longitude(&lon.to_string(), ctx()),
                Err(ValidationError::OutOfRange { .. })
            );
            proptest::prop_assert!(is_out_of_range);
        }
    }
}
