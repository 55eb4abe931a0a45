//! In-memory string table

use crate::TableError;

/// Rows of string cells under a named header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table, rejecting duplicate column names
    pub fn new(headers: Vec<String>) -> Result<Self, TableError> {
        for (i, name) in headers.iter().enumerate() {
            if headers[..i].contains(name) {
                return Err(TableError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            headers,
            rows: Vec::new(),
        })
    }

    /// Create a table from headers and rows
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut table = Self::new(headers)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row; it must have one cell per column
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.headers.len() {
            return Err(TableError::RaggedRow {
                row: self.rows.len() + 1,
                expected: self.headers.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a column that must exist
    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Cells of a column, top to bottom
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| row[idx].as_str()))
    }

    /// Cell at `row` (0-based) in column `name`
    pub fn cell(&self, row: usize, name: &str) -> Option<&str> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| r[idx].as_str())
    }

    /// Mutable access to one column's cells
    pub(crate) fn column_mut(&mut self, idx: usize) -> impl Iterator<Item = &mut String> {
        self.rows.iter_mut().map(move |row| &mut row[idx])
    }

    /// Append a column with one value per row
    pub fn push_column(&mut self, name: &str, values: Vec<String>) -> Result<(), TableError> {
        if self.column_index(name).is_some() {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        self.headers.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Remove the named columns that exist; returns how many were removed
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        let keep: Vec<bool> = self
            .headers
            .iter()
            .map(|h| !names.iter().any(|n| n.as_ref() == h))
            .collect();
        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped == 0 {
            return 0;
        }

        self.headers = retain_by_mask(std::mem::take(&mut self.headers), &keep);
        for row in &mut self.rows {
            *row = retain_by_mask(std::mem::take(row), &keep);
        }
        dropped
    }

    /// Keep only the rows whose mask entry is `true`
    pub fn retain_rows(&mut self, keep: &[bool]) -> Result<(), TableError> {
        if keep.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: "<row mask>".to_string(),
                expected: self.rows.len(),
                found: keep.len(),
            });
        }
        self.rows = retain_by_mask(std::mem::take(&mut self.rows), keep);
        Ok(())
    }

    /// Stable-sort rows by one precomputed key per row
    pub fn sort_rows_by_keys<K: Ord>(&mut self, keys: Vec<K>) -> Result<(), TableError> {
        if keys.len() != self.rows.len() {
            return Err(TableError::LengthMismatch {
                column: "<sort keys>".to_string(),
                expected: self.rows.len(),
                found: keys.len(),
            });
        }

        let mut keyed: Vec<(K, Vec<String>)> = keys.into_iter().zip(std::mem::take(&mut self.rows)).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        self.rows = keyed.into_iter().map(|(_, row)| row).collect();
        Ok(())
    }
}

fn retain_by_mask<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, k)| k.then_some(item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sample() -> Table {
        Table::from_rows(
            strings(&["id", "city", "bedrooms"]),
            vec![
                strings(&["b", "Brighton", "2"]),
                strings(&["a", "Hove", "Studio"]),
                strings(&["c", "Brighton", "3"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_header_rejected() {
        assert!(matches!(
            Table::new(strings(&["id", "id"])),
            Err(TableError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut table = sample();
        let err = table.push_row(strings(&["d"])).unwrap_err();
        assert!(matches!(err, TableError::RaggedRow { row: 4, expected: 3, found: 1 }));
    }

    #[test]
    fn test_column_access() {
        let table = sample();
        let ids: Vec<&str> = table.column("id").unwrap().collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(table.cell(1, "bedrooms"), Some("Studio"));
        assert!(table.column("missing").is_none());
        assert!(matches!(table.require_column("missing"), Err(TableError::MissingColumn(_))));
    }

    #[test]
    fn test_push_column() {
        let mut table = sample();
        table.push_column("score", strings(&["1", "2", "3"])).unwrap();
        assert_eq!(table.headers().last().unwrap(), "score");
        assert_eq!(table.cell(2, "score"), Some("3"));

        assert!(matches!(
            table.push_column("short", strings(&["1"])),
            Err(TableError::LengthMismatch { .. })
        ));
        assert!(matches!(
            table.push_column("city", strings(&["x", "y", "z"])),
            Err(TableError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_drop_columns() {
        let mut table = sample();
        assert_eq!(table.drop_columns(&["city", "not_there"]), 1);
        assert_eq!(table.headers(), &strings(&["id", "bedrooms"])[..]);
        assert_eq!(table.rows()[0], strings(&["b", "2"]));
    }

    #[test]
    fn test_retain_and_sort() {
        let mut table = sample();
        table.sort_rows_by_keys(vec!["b", "a", "c"]).unwrap();
        let ids: Vec<&str> = table.column("id").unwrap().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        table.retain_rows(&[true, false, true]).unwrap();
        let ids: Vec<&str> = table.column("id").unwrap().collect();
        assert_eq!(ids, vec!["a", "c"]);
    }
}
