// src/jobs.rs

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, io::Read, path::Path};
use tracing::{debug, warn};

use crate::error::ScrapeError;

pub const REQUIRED_COLUMNS: [&str; 6] = [
    "web_id",
    "url",
    "table_to_extract",
    "additional_argument",
    "file_path",
    "scraper_object",
];

/// One row of the jobs CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub web_id: String,
    pub url: String,
    /// CSS selector for candidate tables.
    pub table_to_extract: String,
    /// Heading text identifying the target table.
    pub additional_argument: String,
    /// Output CSV.
    pub file_path: String,
    #[serde(default)]
    pub scraper_object: String,
}

/// A jobs-file row that could not be turned into a [`JobSpec`].
#[derive(Debug)]
pub struct JobRowError {
    /// 1-based line in the jobs file.
    pub line: u64,
    /// The row's `web_id`, when that cell could still be read.
    pub web_id: Option<String>,
    pub error: ScrapeError,
}

/// One parsed row of the jobs file.
pub type JobRow = Result<JobSpec, JobRowError>;

pub fn load_jobs(path: impl AsRef<Path>) -> Result<Vec<JobRow>, ScrapeError> {
    let file = std::fs::File::open(path.as_ref())?;
    read_jobs(file)
}

/// Parse jobs from any reader.
///
/// A header missing any required column fails the whole file. After that,
/// every row is parsed on its own: a ragged or undecodable row becomes an
/// `Err` entry and the rows around it are still returned.
pub fn read_jobs<R: Read>(reader: R) -> Result<Vec<JobRow>, ScrapeError> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let present: HashSet<&str> = headers.iter().collect();
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(ScrapeError::MissingColumns(missing));
    }
    let web_id_idx = headers.iter().position(|h| h == "web_id");

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!(line, "unreadable job row: {}", e);
                rows.push(Err(JobRowError {
                    line,
                    web_id: None,
                    error: e.into(),
                }));
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let web_id = web_id_idx
            .and_then(|i| record.get(i))
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let parsed = if record.len() != headers.len() {
            Err(ScrapeError::JobRow {
                line,
                reason: format!(
                    "found {} fields, header has {}",
                    record.len(),
                    headers.len()
                ),
            })
        } else {
            record
                .deserialize::<JobSpec>(Some(&headers))
                .map_err(ScrapeError::from)
        };

        rows.push(parsed.map_err(|error| {
            warn!(line, web_id = ?web_id, "bad job row: {}", error);
            JobRowError {
                line,
                web_id,
                error,
            }
        }));
    }

    debug!(count = rows.len(), "loaded jobs");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_jobs(rows: Vec<JobRow>) -> Vec<JobSpec> {
        rows.into_iter().map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_reads_jobs_and_ignores_extra_columns() {
        let csv = "\
web_id,url,table_to_extract,additional_argument,file_path,scraper_object,notes
W1,https://example.org/a,table.table,Case Status,out/a.csv,NDSLScraper,first
W2,https://example.org/b,table,\"Orders, Final\",out/b.csv,,second
";
        let jobs = ok_jobs(read_jobs(csv.as_bytes()).unwrap());
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].web_id, "W1");
        assert_eq!(jobs[0].additional_argument, "Case Status");
        assert_eq!(jobs[1].additional_argument, "Orders, Final");
        assert_eq!(jobs[1].scraper_object, "");
    }

    #[test]
    fn test_missing_columns_listed() {
        let csv = "web_id,table_to_extract,file_path,scraper_object\nW1,t,o.csv,x\n";
        match read_jobs(csv.as_bytes()) {
            Err(ScrapeError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["additional_argument".to_string(), "url".to_string()]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_ragged_row_does_not_hide_neighbours() {
        let csv = "\
web_id,url,table_to_extract,additional_argument,file_path,scraper_object
W1,https://example.org/a,table,Case Status,out/a.csv,NDSLScraper
W2,https://example.org/b,table,Case Status,out/b.csv
,https://example.org/c,table
W4,https://example.org/d,table,Case Status,out/d.csv,NDSLScraper
";
        let rows = read_jobs(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].as_ref().unwrap().web_id, "W1");
        assert_eq!(rows[3].as_ref().unwrap().web_id, "W4");

        let bad = rows[1].as_ref().unwrap_err();
        assert_eq!(bad.line, 3);
        assert_eq!(bad.web_id.as_deref(), Some("W2"));
        assert_eq!(bad.error.kind(), "bad_job_row");

        let anonymous = rows[2].as_ref().unwrap_err();
        assert_eq!(anonymous.line, 4);
        assert_eq!(anonymous.web_id, None);
    }

    #[test]
    fn test_header_only_file_has_no_jobs() {
        let csv = REQUIRED_COLUMNS.join(",") + "\n";
        assert!(read_jobs(csv.as_bytes()).unwrap().is_empty());
    }
}
