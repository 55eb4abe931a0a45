//! Listing locations and geo feature join-back

use crate::table::Table;
use crate::TableError;
use chrono::NaiveDate;
use data_validator::{RowContext, Validator};
use feature_engine::{EntityKey, GeoFeatures, PropertyPoint};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Column holding the centroid distance feature
pub const DIST_FROM_CENTROID_COLUMN: &str = "dist_from_centroid";
/// Column holding the neighbour count feature
pub const NUM_NEIGHBOURS_COLUMN: &str = "num_neighbours";

/// Names of the columns the pipeline reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingColumns {
    /// Entity key column
    pub entity: String,
    /// Observation month column
    pub month: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for ListingColumns {
    fn default() -> Self {
        Self {
            entity: "airbnb_property_id".to_string(),
            month: "reporting_month".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
        }
    }
}

/// Sort rows by entity then observation month.
///
/// Leaves the table untouched when it has no month column, in which case
/// input order decides which observation of an entity is the latest.
/// Returns whether the table was sorted.
pub fn sort_observations(
    table: &mut Table,
    columns: &ListingColumns,
    validator: &Validator,
) -> Result<bool, TableError> {
    let Some(month_idx) = table.column_index(&columns.month) else {
        debug!("No {} column, keeping input row order", columns.month);
        return Ok(false);
    };
    let entity_idx = table.require_column(&columns.entity)?;

    let mut keys: Vec<(String, NaiveDate)> = Vec::with_capacity(table.len());
    for (i, row) in table.rows().iter().enumerate() {
        let entity = validator.validate_entity_key(&row[entity_idx], i + 1)?;
        let month = validator.parse_month(&columns.month, &row[month_idx], RowContext::new(i + 1, entity))?;
        keys.push((entity.to_string(), month));
    }

    table.sort_rows_by_keys(keys)?;
    Ok(true)
}

/// Validate and extract one point per row, failing on the first bad row
pub fn extract_points(
    table: &Table,
    columns: &ListingColumns,
    validator: &Validator,
) -> Result<Vec<PropertyPoint>, TableError> {
    let entity_idx = table.require_column(&columns.entity)?;
    let lat_idx = table.require_column(&columns.latitude)?;
    let lon_idx = table.require_column(&columns.longitude)?;

    let mut points = Vec::with_capacity(table.len());
    for (i, row) in table.rows().iter().enumerate() {
        let entity = validator.validate_entity_key(&row[entity_idx], i + 1)?;
        let ctx = RowContext::new(i + 1, entity);
        let latitude = validator.parse_latitude(&row[lat_idx], ctx)?;
        let longitude = validator.parse_longitude(&row[lon_idx], ctx)?;
        points.push(PropertyPoint::new(entity, latitude, longitude));
    }

    debug!("Extracted {} located observations", points.len());
    Ok(points)
}

/// Add the centroid distance and neighbour count columns.
///
/// Every row of an entity receives that entity's values.
pub fn attach_geo_features(
    table: &mut Table,
    columns: &ListingColumns,
    features: &GeoFeatures,
) -> Result<(), TableError> {
    let entity_idx = table.require_column(&columns.entity)?;

    let mut distances = Vec::with_capacity(table.len());
    let mut neighbours = Vec::with_capacity(table.len());
    for (i, row) in table.rows().iter().enumerate() {
        let key = EntityKey::new(row[entity_idx].trim());
        let feature = features.get(&key).ok_or_else(|| TableError::MissingFeatures {
            row: i + 1,
            entity: key.to_string(),
        })?;
        distances.push(feature.dist_from_centroid.to_string());
        neighbours.push(feature.neighbor_count.to_string());
    }

    table.push_column(DIST_FROM_CENTROID_COLUMN, distances)?;
    table.push_column(NUM_NEIGHBOURS_COLUMN, neighbours)?;
    Ok(())
}
