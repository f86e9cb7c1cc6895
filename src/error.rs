// src/error.rs

use thiserror::Error;

/// Every way a scrape job can fail, from fetching the page to writing the CSV.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The page could not be retrieved.
    #[error("fetching {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid CSS selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// No candidate table carries a heading cell with this text.
    #[error("table with heading {heading:?} not found")]
    TableNotFound { heading: String },

    /// Fewer than the three rows (title, header, data/sentinel) were extracted.
    #[error("malformed table: expected at least 3 rows, got {rows}")]
    MalformedTable { rows: usize },

    /// A data row has a different number of cells than the header row.
    #[error("row {row} has {found} values but the header has {expected}")]
    RowArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown extractor {0:?}")]
    UnknownExtractor(String),

    #[error("missing required columns in input file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A jobs-file row that cannot be read as a job.
    #[error("bad job row at line {line}: {reason}")]
    JobRow { line: u64, reason: String },

    #[error("config: {0}")]
    Config(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Short, stable name of the failure kind, used as the prefix of log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Fetch { .. } => "fetch_failure",
            ScrapeError::InvalidUrl { .. } => "invalid_url",
            ScrapeError::InvalidSelector { .. } => "invalid_selector",
            ScrapeError::TableNotFound { .. } => "table_not_found",
            ScrapeError::MalformedTable { .. } => "malformed_table",
            ScrapeError::RowArityMismatch { .. } => "row_arity_mismatch",
            ScrapeError::UnknownExtractor(_) => "unknown_extractor",
            ScrapeError::MissingColumns(_) => "missing_columns",
            ScrapeError::JobRow { .. } => "bad_job_row",
            ScrapeError::Config(_) => "config",
            ScrapeError::Io(_) => "io",
            ScrapeError::Csv(_) => "csv",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_details() {
        let err = ScrapeError::RowArityMismatch {
            row: 0,
            expected: 2,
            found: 3,
        };
        assert_eq!(err.to_string(), "row 0 has 3 values but the header has 2");
        assert_eq!(err.kind(), "row_arity_mismatch");

        let err = ScrapeError::MissingColumns(vec!["url".into(), "web_id".into()]);
        assert_eq!(
            err.to_string(),
            "missing required columns in input file: url, web_id"
        );
    }

    #[test]
    fn test_io_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScrapeError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
