use anyhow::{Context, Result};
use ndslscraper::{
    config::AppConfig,
    fetch::HttpFetcher,
    runner::Runner,
    status_log::StatusLog,
};
use std::env;
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ndslscraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = env::args().nth(1).unwrap_or_else(|| "config.yaml".to_string());
    let config = AppConfig::load(&config_path)
        .with_context(|| format!("loading config {}", config_path))?;
    info!(
        jobs = %config.input_filename.display(),
        log = %config.log_filename.display(),
        "config loaded"
    );

    // ─── 3) build runner ─────────────────────────────────────────────
    let log = StatusLog::open(&config.log_filename)
        .with_context(|| format!("opening status log {}", config.log_filename.display()))?;
    let fetcher = HttpFetcher::new(&config.fetch).context("building page fetcher")?;
    let runner = Runner::new(fetcher, log);

    // ─── 4) run every job in order ───────────────────────────────────
    let start = Instant::now();
    let summary = runner
        .run_from_file(&config.input_filename)
        .await
        .with_context(|| format!("running jobs from {}", config.input_filename.display()))?;

    info!(
        passed = summary.passed,
        failed = summary.failed,
        elapsed = ?start.elapsed(),
        "all done"
    );
    Ok(())
}
