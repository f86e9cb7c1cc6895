use anyhow::{Context, Result};
use ndslscraper::{
    extract::{NdslExtractor, StructuredResult, TableExtractor, NO_RECORD_SENTINEL},
    output::write_table,
};
use std::{env, fs, io, process::exit};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    // Usage: extract_local [--json] <HTML_FILE> <SELECTOR> <HEADING>
    let args: Vec<String> = env::args().collect();
    let json = args.iter().skip(1).any(|a| a == "--json");
    let positional: Vec<&str> = args
        .iter()
        .skip(1)
        .filter(|a| *a != "--json")
        .map(String::as_str)
        .collect();
    let &[html_path, selector, heading] = positional.as_slice() else {
        eprintln!(
            "Usage: {} [--json] <HTML_FILE> <SELECTOR> <HEADING>",
            args.first().map(String::as_str).unwrap_or("extract_local")
        );
        exit(1);
    };

    let html = fs::read_to_string(html_path).with_context(|| format!("reading {}", html_path))?;
    let result = NdslExtractor
        .execute(&html, selector, heading)
        .with_context(|| format!("extracting {:?} from {}", heading, html_path))?;

    match result {
        StructuredResult::Empty => eprintln!("{}", NO_RECORD_SENTINEL),
        StructuredResult::Table(table) if json => {
            serde_json::to_writer_pretty(io::stdout().lock(), &table)?;
            println!();
        }
        StructuredResult::Table(table) => write_table(&table, io::stdout().lock(), true)?,
    }
    Ok(())
}
