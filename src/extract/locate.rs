// src/extract/locate.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::rows::cell_text;
use crate::error::ScrapeError;

static HEADING_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th").expect("`th` selector should parse"));

/// Parse a user-supplied CSS selector, keeping the offending text in the error.
pub fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|e| ScrapeError::InvalidSelector {
        selector: selector.to_string(),
        reason: format!("{:?}", e),
    })
}

/// Find the first element matching `selector` (in document order) that owns a
/// `<th>` whose trimmed text is exactly `heading`.
pub fn locate_table<'a>(
    doc: &'a Html,
    selector: &str,
    heading: &str,
) -> Result<ElementRef<'a>, ScrapeError> {
    let candidates = parse_selector(selector)?;

    for (idx, table) in doc.select(&candidates).enumerate() {
        if has_heading(table, heading) {
            debug!(selector, heading, candidate = idx, "located table");
            return Ok(table);
        }
    }

    Err(ScrapeError::TableNotFound {
        heading: heading.to_string(),
    })
}

fn has_heading(table: ElementRef<'_>, heading: &str) -> bool {
    table.select(&HEADING_CELL).any(|th| cell_text(th) == heading)
}
