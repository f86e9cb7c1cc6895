pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod jobs;
pub mod output;
pub mod runner;
pub mod status_log;

pub use error::ScrapeError;
