// src/extract/record.rs

use serde::Serialize;
use tracing::{debug, info};

use super::rows::RawRow;
use crate::error::ScrapeError;

/// Cell text the site uses for "this table has no rows".
pub const NO_RECORD_SENTINEL: &str = "No Record Found";

/// A header row plus data rows, every row as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, rejecting any row whose width differs from the header.
    /// Duplicate column names are kept as they are.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ScrapeError> {
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != columns.len())
        {
            return Err(ScrapeError::RowArityMismatch {
                row,
                expected: columns.len(),
                found,
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
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
}

/// What a single extraction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredResult {
    /// The site reported no records.
    Empty,
    Table(Table),
}

impl StructuredResult {
    pub fn row_count(&self) -> usize {
        match self {
            StructuredResult::Empty => 0,
            StructuredResult::Table(t) => t.len(),
        }
    }
}

/// True when any cell of `row` carries the no-data sentinel.
pub fn is_sentinel_row(row: &[String]) -> bool {
    row.iter().any(|cell| cell.contains(NO_RECORD_SENTINEL))
}

/// Interpret extracted rows as `[title], [header...], data-or-sentinel...`.
#[tracing::instrument(level = "debug", skip(rows), fields(count = rows.len()))]
pub fn build_record(mut rows: Vec<RawRow>) -> Result<StructuredResult, ScrapeError> {
    if rows.len() < 3 {
        return Err(ScrapeError::MalformedTable { rows: rows.len() });
    }

    let title = rows[0].first().cloned().unwrap_or_default();

    if is_sentinel_row(&rows[2]) {
        info!(title = %title, "{}", NO_RECORD_SENTINEL);
        return Ok(StructuredResult::Empty);
    }

    let data = rows.split_off(2);
    // rows is now [title, header]
    let header = rows.swap_remove(1);
    let table = Table::new(header, data)?;
    debug!(title = %title, columns = table.columns().len(), rows = table.len(), "built table");
    Ok(StructuredResult::Table(table))
}
