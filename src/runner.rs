// src/runner.rs

use std::path::Path;
use tracing::{error, info};

use crate::{
    error::ScrapeError,
    extract::{ExtractorKind, StructuredResult, TableExtractor, NO_RECORD_SENTINEL},
    fetch::PageFetcher,
    jobs::{load_jobs, JobRow, JobRowError, JobSpec},
    output::{save_result, SaveOutcome},
    status_log::{Status, StatusLog},
};

/// Web id used for failures that happen before any job is read.
pub const BATCH_WEB_ID: &str = "batch";
pub const SUCCESS_MESSAGE: &str = "Extraction successful";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub web_id: String,
    pub rows: usize,
    pub no_records: bool,
    pub saved: SaveOutcome,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub passed: usize,
    pub failed: usize,
}

/// Runs jobs one after another: fetch, extract, save, log.
pub struct Runner<F> {
    fetcher: F,
    log: StatusLog,
}

impl<F: PageFetcher> Runner<F> {
    pub fn new(fetcher: F, log: StatusLog) -> Self {
        Self { fetcher, log }
    }

    pub fn log(&self) -> &StatusLog {
        &self.log
    }

    /// One job end to end. Nothing is logged here; see [`Runner::run_all`].
    #[tracing::instrument(level = "info", skip(self, job), fields(web_id = %job.web_id))]
    pub async fn run_job(&self, job: &JobSpec) -> Result<JobOutcome, ScrapeError> {
        let kind: ExtractorKind = job.scraper_object.parse()?;
        let html = self.fetcher.fetch(&job.url).await?;

        let result = kind.extractor().execute(
            &html,
            &job.table_to_extract,
            &job.additional_argument,
        )?;
        let saved = save_result(&result, &job.file_path)?;

        Ok(JobOutcome {
            web_id: job.web_id.clone(),
            rows: result.row_count(),
            no_records: matches!(result, StructuredResult::Empty),
            saved,
        })
    }

    /// Run every job, logging a pass/fail entry for each. A failing job does
    /// not stop the batch; only a failure to write the log does.
    pub async fn run_all(&self, jobs: &[JobSpec]) -> Result<BatchSummary, ScrapeError> {
        let mut summary = BatchSummary::default();
        for job in jobs {
            self.run_and_log(job, &mut summary).await?;
        }
        Ok(summary)
    }

    /// Like [`Runner::run_all`], but rows that never became jobs are logged
    /// as failures in place.
    pub async fn run_rows(&self, rows: &[JobRow]) -> Result<BatchSummary, ScrapeError> {
        let mut summary = BatchSummary::default();
        for row in rows {
            match row {
                Ok(job) => self.run_and_log(job, &mut summary).await?,
                Err(bad) => {
                    let web_id = row_log_id(bad);
                    error!(web_id = %web_id, kind = bad.error.kind(), "job row rejected: {}", bad.error);
                    self.log.record(
                        &web_id,
                        Status::Fail,
                        &format!("{}: {}", bad.error.kind(), bad.error),
                    )?;
                    summary.failed += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn run_and_log(&self, job: &JobSpec, summary: &mut BatchSummary) -> Result<(), ScrapeError> {
        match self.run_job(job).await {
            Ok(outcome) => {
                info!(
                    web_id = %outcome.web_id,
                    rows = outcome.rows,
                    saved = ?outcome.saved,
                    "job passed"
                );
                let message = if outcome.no_records {
                    NO_RECORD_SENTINEL
                } else {
                    SUCCESS_MESSAGE
                };
                self.log.record(&job.web_id, Status::Pass, message)?;
                summary.passed += 1;
            }
            Err(e) => {
                error!(web_id = %job.web_id, kind = e.kind(), "job failed: {}", e);
                self.log
                    .record(&job.web_id, Status::Fail, &format!("{}: {}", e.kind(), e))?;
                summary.failed += 1;
            }
        }
        Ok(())
    }

    /// Load the jobs CSV and run it. A jobs file that cannot be read at all
    /// is logged under [`BATCH_WEB_ID`] and returned as an error.
    pub async fn run_from_file(&self, jobs_path: impl AsRef<Path>) -> Result<BatchSummary, ScrapeError> {
        let jobs_path = jobs_path.as_ref();
        let rows = match load_jobs(jobs_path) {
            Ok(rows) => rows,
            Err(e) => {
                error!(path = %jobs_path.display(), "cannot load jobs: {}", e);
                self.log
                    .record(BATCH_WEB_ID, Status::Fail, &format!("{}: {}", e.kind(), e))?;
                return Err(e);
            }
        };
        info!(count = rows.len(), path = %jobs_path.display(), "loaded jobs");
        self.run_rows(&rows).await
    }
}

/// Log id for a rejected row: its own `web_id`, or `batch:<line>`.
fn row_log_id(bad: &JobRowError) -> String {
    bad.web_id
        .clone()
        .unwrap_or_else(|| format!("{}:{}", BATCH_WEB_ID, bad.line))
}
