//! CSV loading and writing

use crate::header::normalize_header;
use crate::table::Table;
use crate::TableError;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV file, normalising its headers
pub fn read_csv(path: &Path) -> Result<Table, TableError> {
    let file = File::open(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_csv_from(file)?;
    info!(
        "Loaded {} rows and {} columns from {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV from any reader, normalising its headers
pub fn read_csv_from<R: Read>(reader: R) -> Result<Table, TableError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(TableError::EmptyHeader);
    }
    debug!("Normalised CSV headers: {:?}", headers);

    let mut table = Table::new(headers)?;
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != table.headers().len() {
            return Err(TableError::RaggedRow {
                row: i + 1,
                expected: table.headers().len(),
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(str::to_owned).collect())?;
    }

    Ok(table)
}

/// Write a table to a CSV file
pub fn write_csv(path: &Path, table: &Table) -> Result<(), TableError> {
    let file = File::create(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv_to(file, table)?;
    info!(
        "Wrote {} rows and {} columns to {}",
        table.len(),
        table.headers().len(),
        path.display()
    );
    Ok(())
}

/// Write a table as CSV to any writer
pub fn write_csv_to<W: Write>(writer: W, table: &Table) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
