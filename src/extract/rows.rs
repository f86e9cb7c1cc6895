// src/extract/rows.rs

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static ROW_CELLS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td, th").expect("`td, th` selector should parse"));

/// One body row's cell texts, trimmed, in document order.
pub type RawRow = Vec<String>;

/// Text content of an element with surrounding whitespace stripped.
pub(crate) fn cell_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Direct element children of `parent` with the given tag name.
fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

/// Turn every row of `table`'s own `<tbody>` sections into a [`RawRow`].
///
/// Rows are taken from the table's direct `tbody > tr` children only, so an
/// enclosing layout table's body never pulls in this table's `<thead>`.
/// Header and data cells are both kept, so a title row made of a single
/// `<th>` comes through as a one-cell row.
pub fn normalize_rows(table: ElementRef<'_>) -> Vec<RawRow> {
    child_elements(table, "tbody")
        .flat_map(|body| child_elements(body, "tr"))
        .map(|row| row.select(&ROW_CELLS).map(cell_text).collect())
        .collect()
}
