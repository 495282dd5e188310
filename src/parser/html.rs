//! Label/value lookups over parsed assessor pages.
//!
//! County sites lay their data out as two-column tables: a label cell followed
//! by a value cell. These helpers find the label by exact, whitespace-normalized
//! text and read the sibling cell.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("static selector"));
static STRONG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong").expect("static selector"));
static WITH_ID: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("static selector"));
static BLOCKQUOTE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("blockquote").expect("static selector"));
static PANEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.panel").expect("static selector"));
static PANEL_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".panel-title").expect("static selector"));
static PANEL_BODY_DIV: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".panel-body > div").expect("static selector"));

/// Text content with runs of whitespace collapsed, like XPath `normalize-space()`.
pub fn normalized_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn next_sibling_cell<'a>(cell: ElementRef<'a>) -> Option<ElementRef<'a>> {
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "td")
}

/// Cell following the first `td` labelled `label`.
pub fn value_cell_after_label<'a>(doc: &'a Html, label: &str) -> Option<ElementRef<'a>> {
    doc.select(&TD)
        .filter(|td| normalized_text(*td) == label)
        .find_map(next_sibling_cell)
}

/// Whether any `td` is labelled `label`.
pub fn has_label_cell(doc: &Html, label: &str) -> bool {
    doc.select(&TD).any(|td| normalized_text(td) == label)
}

pub fn value_after_label(doc: &Html, label: &str) -> Option<String> {
    value_cell_after_label(doc, label)
        .map(normalized_text)
        .and_then(non_empty)
}

/// Value for a label rendered as `<td><strong>label</strong></td><td>value</td>`.
pub fn value_after_strong_label(doc: &Html, label: &str) -> Option<String> {
    doc.select(&STRONG)
        .filter(|strong| normalized_text(*strong) == label)
        .find_map(|strong| {
            let cell = strong
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "td")?;
            next_sibling_cell(cell)
        })
        .map(normalized_text)
        .and_then(non_empty)
}

pub fn text_by_id(doc: &Html, id: &str) -> Option<String> {
    doc.select(&WITH_ID)
        .find(|e| e.value().id() == Some(id))
        .map(normalized_text)
        .and_then(non_empty)
}

/// Text of the first `blockquote` inside the first container that has one.
pub fn first_blockquote_in(doc: &Html, container: &Selector) -> Option<String> {
    doc.select(container)
        .find_map(|div| div.select(&BLOCKQUOTE).next())
        .map(normalized_text)
        .and_then(non_empty)
}

/// Texts of the links directly inside the cell after `label`.
pub fn links_after_label(doc: &Html, label: &str) -> Vec<String> {
    doc.select(&TD)
        .filter(|td| normalized_text(*td) == label)
        .filter_map(next_sibling_cell)
        .flat_map(|cell| {
            cell.children()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "a")
                .map(normalized_text)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// First body block of the panel whose title contains `title`.
pub fn panel_body_text(doc: &Html, title: &str) -> Option<String> {
    doc.select(&PANEL)
        .filter(|panel| {
            panel
                .select(&PANEL_TITLE)
                .any(|t| normalized_text(t).contains(title))
        })
        .find_map(|panel| panel.select(&PANEL_BODY_DIV).next())
        .map(normalized_text)
        .and_then(non_empty)
}
