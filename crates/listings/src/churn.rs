//! Churn target labelling
//!
//! Rows are sorted by listing then month. A row is retained (`target = true`)
//! when the next row belongs to the same listing, and churned otherwise, so
//! of two rows sharing a listing and month only the later one can churn.
//! Rows in or after the censor month cannot be labelled honestly because
//! their follow-up lies outside the data, so they are dropped.

use crate::points::ListingColumns;
use crate::table::Table;
use crate::TableError;
use chrono::NaiveDate;
use data_validator::{RowContext, Validator};
use serde::Serialize;
use tracing::info;

/// Column holding the churn target
pub const TARGET_COLUMN: &str = "target";

/// Outcome of churn labelling
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChurnReport {
    /// Rows kept with a label
    pub labelled_rows: usize,
    /// Labelled rows with a later observation
    pub retained: usize,
    /// Labelled rows without a later observation
    pub churned: usize,
    /// Rows dropped at or after the censor month
    pub censored_rows: usize,
    /// Censor month used
    pub censor_month: Option<NaiveDate>,
}

/// Add the `target` column and drop censored rows.
///
/// Sorts the table by listing then month. `censor_month` defaults to the
/// latest month in the table.
pub fn label_churn(
    table: &mut Table,
    columns: &ListingColumns,
    validator: &Validator,
    censor_month: Option<NaiveDate>,
) -> Result<ChurnReport, TableError> {
    let entity_idx = table.require_column(&columns.entity)?;
    let month_idx = table.require_column(&columns.month)?;

    let mut observations: Vec<(String, NaiveDate)> = Vec::with_capacity(table.len());
    for (i, row) in table.rows().iter().enumerate() {
        let entity = validator.validate_entity_key(&row[entity_idx], i + 1)?;
        let month = validator.parse_month(&columns.month, &row[month_idx], RowContext::new(i + 1, entity))?;
        observations.push((entity.to_string(), month));
    }

    table.sort_rows_by_keys(observations.clone())?;
    observations.sort();

    let censor = censor_month.or_else(|| observations.iter().map(|(_, m)| *m).max());

    let mut report = ChurnReport {
        censor_month: censor,
        ..Default::default()
    };
    let mut targets = Vec::with_capacity(observations.len());
    let mut keep = Vec::with_capacity(observations.len());
    for (i, (entity, month)) in observations.iter().enumerate() {
        let retained = observations.get(i + 1).is_some_and(|(next, _)| next == entity);
        targets.push(retained.to_string());

        let censored = censor.is_some_and(|c| *month >= c);
        keep.push(!censored);
        if censored {
            report.censored_rows += 1;
        } else if retained {
            report.retained += 1;
        } else {
            report.churned += 1;
        }
    }
    report.labelled_rows = report.retained + report.churned;

    table.push_column(TARGET_COLUMN, targets)?;
    table.retain_rows(&keep)?;

    info!(
        "Labelled {} rows ({} retained, {} churned), censored {} rows from {:?}",
        report.labelled_rows, report.retained, report.churned, report.censored_rows, report.censor_month
    );
    Ok(report)
}

/// Replace `"Studio"` bedroom counts with `"1"`; returns cells changed
pub fn normalize_bedrooms(table: &mut Table, column: &str) -> Result<usize, TableError> {
    let idx = table.require_column(column)?;
    let mut changed = 0;
    for cell in table.column_mut(idx) {
        if cell.trim().eq_ignore_ascii_case("studio") {
            *cell = "1".to_string();
            changed += 1;
        }
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[&str; 2]]) -> Table {
        Table::from_rows(
            vec!["airbnb_property_id".to_string(), "reporting_month".to_string()],
            rows.iter().map(|r| r.map(String::from).to_vec()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_label_churn_default_censor() {
        let mut t = table(&[
            ["a", "2023-08-01"],
            ["a", "2023-09-01"],
            ["a", "2023-10-01"],
            ["b", "2023-08-01"],
            ["c", "2023-09-01"],
            ["c", "2023-10-01"],
        ]);
        let report = label_churn(&mut t, &ListingColumns::default(), &Validator::default(), None).unwrap();

        assert_eq!(report.censor_month, NaiveDate::from_ymd_opt(2023, 10, 1));
        assert_eq!(report.censored_rows, 2);
        assert_eq!(report.labelled_rows, 4);
        assert_eq!(report.retained, 3);
        assert_eq!(report.churned, 1);

        let ids: Vec<&str> = t.column("airbnb_property_id").unwrap().collect();
        let targets: Vec<&str> = t.column(TARGET_COLUMN).unwrap().collect();
        assert_eq!(ids, vec!["a", "a", "b", "c"]);
        assert_eq!(targets, vec!["true", "true", "false", "true"]);
    }

    #[test]
    fn test_label_churn_explicit_censor() {
        let mut t = table(&[["a", "2023-08-01"], ["a", "2023-09-01"], ["b", "2023-07-01"]]);
        let censor = NaiveDate::from_ymd_opt(2023, 9, 1);
        let report = label_churn(&mut t, &ListingColumns::default(), &Validator::default(), censor).unwrap();
        assert_eq!(report.censored_rows, 1);
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(0, TARGET_COLUMN), Some("true"));
        assert_eq!(t.cell(1, TARGET_COLUMN), Some("false"));
    }

    #[test]
    fn test_label_churn_empty() {
        let mut t = table(&[]);
        let report = label_churn(&mut t, &ListingColumns::default(), &Validator::default(), None).unwrap();
        assert_eq!(report, ChurnReport::default());
        assert_eq!(t.headers().last().map(String::as_str), Some(TARGET_COLUMN));
    }

    #[test]
    fn test_label_churn_bad_month() {
        let mut t = table(&[["a", "last month"]]);
        assert!(matches!(
            label_churn(&mut t, &ListingColumns::default(), &Validator::default(), None),
            Err(TableError::Validation(_))
        ));
    }

    #[test]
    fn test_normalize_bedrooms() {
        let mut t = Table::from_rows(
            vec!["bedrooms".to_string()],
            vec![vec!["Studio".to_string()], vec!["2".to_string()], vec!["studio".to_string()]],
        )
        .unwrap();
        assert_eq!(normalize_bedrooms(&mut t, "bedrooms").unwrap(), 2);
        let cells: Vec<&str> = t.column("bedrooms").unwrap().collect();
        assert_eq!(cells, vec!["1", "2", "1"]);
    }

    #[test]
    fn test_label_churn_sorts_and_breaks_month_ties() {
        let mut t = table(&[
            ["b", "2023-08-01"],
            ["a", "2023-09-01"],
            ["a", "2023-08-01"],
            ["a", "2023-08-01"],
            ["a", "2023-10-01"],
        ]);
        let report = label_churn(&mut t, &ListingColumns::default(), &Validator::default(), None).unwrap();

        let ids: Vec<&str> = t.column("airbnb_property_id").unwrap().collect();
        let months: Vec<&str> = t.column("reporting_month").unwrap().collect();
        let targets: Vec<&str> = t.column(TARGET_COLUMN).unwrap().collect();
        assert_eq!(ids, vec!["a", "a", "a", "b"]);
        assert_eq!(months, vec!["2023-08-01", "2023-08-01", "2023-09-01", "2023-08-01"]);
        assert_eq!(targets, vec!["true", "true", "true", "false"]);
        assert_eq!(report.censored_rows, 1);
    }

    #[test]
    fn test_label_churn_duplicate_final_month() {
        let mut t = table(&[["a", "2023-08-01"], ["a", "2023-08-01"], ["b", "2023-09-01"]]);
        let censor = NaiveDate::from_ymd_opt(2023, 9, 1);
        label_churn(&mut t, &ListingColumns::default(), &Validator::default(), censor).unwrap();
        let targets: Vec<&str> = t.column(TARGET_COLUMN).unwrap().collect();
        assert_eq!(targets, vec!["true", "false"]);
    }
}
