// src/output.rs

use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::Path,
};
use tracing::info;

use crate::{
    error::ScrapeError,
    extract::{StructuredResult, Table},
};

/// What `save_result` did to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Appended,
    Unchanged,
}

/// Write `table` as CSV, optionally preceded by its header row.
pub fn write_table<W: Write>(
    table: &Table,
    writer: W,
    include_header: bool,
) -> Result<(), ScrapeError> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    if include_header {
        wtr.write_record(table.columns())?;
    }
    for row in table.rows() {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Persist one job's result.
///
/// A missing (or zero-length) file is created with a header row; an existing
/// one only receives the new rows. An empty result creates an empty file and
/// never touches an existing one.
pub fn save_result(
    result: &StructuredResult,
    path: impl AsRef<Path>,
) -> Result<SaveOutcome, ScrapeError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let has_content = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);

    let outcome = match result {
        StructuredResult::Empty if path.exists() => SaveOutcome::Unchanged,
        StructuredResult::Empty => {
            File::create(path)?;
            SaveOutcome::Created
        }
        StructuredResult::Table(table) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            write_table(table, file, !has_content)?;
            if has_content {
                SaveOutcome::Appended
            } else {
                SaveOutcome::Created
            }
        }
    };

    info!(path = %path.display(), rows = result.row_count(), ?outcome, "saved result");
    Ok(outcome)
}

/// Read a saved CSV back; the first record is the header. Values stay strings.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table, ScrapeError> {
    let mut rdr = ReaderBuilder::new().from_path(path.as_ref())?;
    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let rows = rdr
        .records()
        .map(|rec| rec.map(|r| r.iter().map(str::to_string).collect::<Vec<_>>()))
        .collect::<Result<Vec<_>, _>>()?;
    Table::new(columns, rows)
}
