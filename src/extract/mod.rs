// src/extract/mod.rs

pub mod locate;
pub mod record;
pub mod rows;

use scraper::Html;
use std::{fmt, str::FromStr};

use crate::error::ScrapeError;

pub use locate::{locate_table, parse_selector};
pub use record::{build_record, is_sentinel_row, StructuredResult, Table, NO_RECORD_SENTINEL};
pub use rows::{normalize_rows, RawRow};

/// A site shape: how to pull raw rows out of a page and how to turn them into a result.
pub trait TableExtractor {
    /// Locate the table under `selector` headed by `heading` and return its body rows.
    fn extract_values(
        &self,
        html: &str,
        selector: &str,
        heading: &str,
    ) -> Result<Vec<RawRow>, ScrapeError>;

    /// Interpret the raw rows.
    fn process_input_data(&self, rows: Vec<RawRow>) -> Result<StructuredResult, ScrapeError>;

    /// Extract then process.
    fn execute(
        &self,
        html: &str,
        selector: &str,
        heading: &str,
    ) -> Result<StructuredResult, ScrapeError> {
        let rows = self.extract_values(html, selector, heading)?;
        self.process_input_data(rows)
    }
}

/// Pages with a titled `<th>` table: title row, header row, then data or
/// a "No Record Found" row.
#[derive(Debug, Default, Clone, Copy)]
pub struct NdslExtractor;

impl TableExtractor for NdslExtractor {
    fn extract_values(
        &self,
        html: &str,
        selector: &str,
        heading: &str,
    ) -> Result<Vec<RawRow>, ScrapeError> {
        let doc = Html::parse_document(html);
        let table = locate_table(&doc, selector, heading)?;
        Ok(normalize_rows(table))
    }

    fn process_input_data(&self, rows: Vec<RawRow>) -> Result<StructuredResult, ScrapeError> {
        build_record(rows)
    }
}

/// Identifier from the job's `scraper_object` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    Ndsl,
}

impl ExtractorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::Ndsl => "NDSLScraper",
        }
    }

    pub fn extractor(self) -> Box<dyn TableExtractor + Send + Sync> {
        match self {
            ExtractorKind::Ndsl => Box::new(NdslExtractor),
        }
    }
}

impl FromStr for ExtractorKind {
    type Err = ScrapeError;

    /// Blank means the default site shape.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "ndsl" | "ndslscraper" => Ok(ExtractorKind::Ndsl),
            _ => Err(ScrapeError::UnknownExtractor(s.trim().to_string())),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASES_PAGE: &str = r#"
        <html><body>
          <table class="table">
            <tbody>
              <tr><th colspan="3">Hearing List</th></tr>
              <tr><td>Date</td><td>Court</td></tr>
              <tr><td>No Record Found</td></tr>
            </tbody>
          </table>
          <table class="table">
            <tbody>
              <tr><th colspan="3">Case Status</th></tr>
              <tr><th>Case No</th><th>Status</th></tr>
              <tr><td> 101/2024 </td><td>Pending</td></tr>
              <tr><td>102/2024</td><td>Disposed</td></tr>
            </tbody>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_execute_table() {
        let result = NdslExtractor
            .execute(CASES_PAGE, "table.table", "Case Status")
            .unwrap();
        let StructuredResult::Table(table) = result else {
            panic!("expected a table");
        };
        assert_eq!(table.columns(), ["Case No", "Status"]);
        assert_eq!(table.rows()[0], ["101/2024", "Pending"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_execute_sentinel() {
        let result = NdslExtractor
            .execute(CASES_PAGE, "table.table", "Hearing List")
            .unwrap();
        assert_eq!(result, StructuredResult::Empty);
    }

    #[test]
    fn test_execute_missing_heading() {
        let err = NdslExtractor
            .execute(CASES_PAGE, "table.table", "Orders")
            .unwrap_err();
        assert_eq!(err.kind(), "table_not_found");
    }

    #[test]
    fn test_extractor_kind_parsing() {
        assert_eq!("NDSLScraper".parse::<ExtractorKind>().unwrap(), ExtractorKind::Ndsl);
        assert_eq!(" ndsl ".parse::<ExtractorKind>().unwrap(), ExtractorKind::Ndsl);
        assert_eq!("".parse::<ExtractorKind>().unwrap(), ExtractorKind::Ndsl);
        assert!("ndsl_scraper".parse::<ExtractorKind>().is_err());
        let err = "CourtScraper".parse::<ExtractorKind>().unwrap_err();
        assert!(matches!(err, ScrapeError::UnknownExtractor(ref name) if name == "CourtScraper"));
    }

    #[test]
    fn test_dispatch_through_kind() {
        let extractor = ExtractorKind::Ndsl.extractor();
        let rows = extractor
            .extract_values(CASES_PAGE, "table.table", "Case Status")
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], ["Case Status"]);
    }
}
