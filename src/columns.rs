//! Fuzzy header detection for sales reports.
//!
//! Storefronts rename their export columns constantly ("Net Units Sold",
//! "Paid Units", "Qty"), so columns are located by candidate substrings
//! rather than exact names. Candidates are tried in priority order and the
//! first header containing the candidate wins.

use std::sync::OnceLock;

use regex::Regex;

const TITLE_CANDIDATES: &[&str] = &["title", "book title", "asin title", "name"];

const UNITS_CANDIDATES: &[&str] = &[
    "net units sold",
    "units sold",
    "paid units",
    "units",
    "qty",
    "quantity",
    "ordered units",
];

const ROYALTY_CANDIDATES: &[&str] = &[
    "royalty",
    "estimated earnings",
    "earnings",
    "amount",
    "revenue",
];

const DATE_CANDIDATES: &[&str] = &[
    "royalty date",
    "order date",
    "month",
    "transaction date",
    "date",
];

fn non_alnum() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"))
}

/// Lowercase a header and collapse every run of punctuation or whitespace
/// into a single space: "Net Units Sold (USD)" becomes "net units sold usd".
pub fn normalize_header(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    non_alnum().replace_all(&lowered, " ").trim().to_string()
}

/// Column indexes located in a header row. `title`, `royalty` and `date`
/// must all be present for a table to yield rows; `units` is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: Option<usize>,
    pub units: Option<usize>,
    pub royalty: Option<usize>,
    pub date: Option<usize>,
}

impl ColumnMap {
    pub fn has_required(&self) -> bool {
        self.title.is_some() && self.royalty.is_some() && self.date.is_some()
    }
}

fn find_column(normalized: &[String], candidates: &[&str]) -> Option<usize> {
    for candidate in candidates {
        if let Some(idx) = normalized.iter().position(|h| h.contains(candidate)) {
            return Some(idx);
        }
    }
    None
}

pub fn detect_columns(headers: &[String]) -> ColumnMap {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    ColumnMap {
        title: find_column(&normalized, TITLE_CANDIDATES),
        units: find_column(&normalized, UNITS_CANDIDATES),
        royalty: find_column(&normalized, ROYALTY_CANDIDATES),
        date: find_column(&normalized, DATE_CANDIDATES),
    }
}
