// src/status_log.rs

use chrono::Local;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};

use crate::error::ScrapeError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the status log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub web_id: String,
    pub status: Status,
    pub message: String,
}

/// Append-only CSV log of job outcomes: `timestamp,web_id,status,message`.
#[derive(Debug, Clone)]
pub struct StatusLog {
    path: PathBuf,
}

impl StatusLog {
    /// Prepare the log at `path`, creating its directory if needed. The file
    /// itself is created on the first record.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ScrapeError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a single entry; the header goes in only when the file is new or empty.
    pub fn record(&self, web_id: &str, status: Status, message: &str) -> Result<(), ScrapeError> {
        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut wtr = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        wtr.serialize(LogEntry {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            web_id: web_id.to_string(),
            status,
            message: message.to_string(),
        })?;
        wtr.flush()?;
        Ok(())
    }
}

pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<LogEntry>, ScrapeError> {
    let mut rdr = ReaderBuilder::new().from_path(path.as_ref())?;
    let entries = rdr
        .deserialize::<LogEntry>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}
