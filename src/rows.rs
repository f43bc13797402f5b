//! Row normalization: raw report cells to [`ParsedRow`]s.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;

use crate::columns::detect_columns;
use crate::models::ParsedRow;

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Matching key for a title: lowercased with whitespace collapsed.
pub fn normalize_title(raw: &str) -> String {
    raw.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lenient numeric parse: keep digits, dots and minus signs, drop everything
/// else ("$1,234.56" reads as 1234.56). Unparseable input counts as zero so
/// a stray footer cell never sinks the whole report.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(0.0)
}

/// Unit counts are whole numbers; fractional cells truncate toward zero.
pub fn parse_units(raw: &str) -> i64 {
    parse_number(raw) as i64
}

fn iso_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}(-\d{2})?$").expect("valid regex"))
}

fn slash_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}/\d{2}(/\d{2})?$").expect("valid regex"))
}

fn month_name_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z]+)\s+(\d{4})$").expect("valid regex"))
}

fn month_slash_year() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{4})$").expect("valid regex"))
}

const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%Y/%m/%d",
];

/// Reduce a date cell to a YYYY-MM month key. Tried in order: ISO dates,
/// slash dates, RFC 3339 timestamps, common report formats, "MM/YYYY",
/// then "January 2024" style period labels. Returns `None` for anything
/// unrecognized; the caller drops such rows.
pub fn month_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if iso_like().is_match(trimmed) {
        return Some(trimmed[..7].to_string());
    }

    if slash_like().is_match(trimmed) {
        return Some(trimmed.replace('/', "-")[..7].to_string());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().format("%Y-%m").to_string());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date.format("%Y-%m").to_string());
        }
    }

    if let Some(caps) = month_slash_year().captures(trimmed) {
        let month: u32 = caps[1].parse().ok()?;
        let year: i32 = caps[2].parse().ok()?;
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
            return Some(date.format("%Y-%m").to_string());
        }
        return None;
    }

    if let Some(caps) = month_name_year().captures(trimmed) {
        let synthetic = format!("{} 1 {}", &caps[1], &caps[2]);
        for format in ["%B %d %Y", "%b %d %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&synthetic, format) {
                return Some(date.format("%Y-%m").to_string());
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Table to rows
// ---------------------------------------------------------------------------

/// Map a raw table (header row first) to parsed rows. Yields nothing when
/// the header row lacks a title, royalty or date column; that is not an
/// error here because a workbook may hold several tables and only some of
/// them are sales data. Rows with a blank title or an unreadable date are
/// skipped.
pub fn rows_from_table(table: &[Vec<String>]) -> Vec<ParsedRow> {
    let Some(header) = table.first() else {
        return Vec::new();
    };
    let cols = detect_columns(header);
    if !cols.has_required() {
        return Vec::new();
    }

    let cell = |row: &[String], idx: Option<usize>| -> String {
        idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
    };

    let mut parsed = Vec::new();
    for row in &table[1..] {
        let title = cell(row, cols.title);
        if title.trim().is_empty() {
            continue;
        }
        let Some(month) = month_key(&cell(row, cols.date)) else {
            continue;
        };
        let units = match cols.units {
            Some(_) => parse_units(&cell(row, cols.units)),
            None => 0,
        };
        parsed.push(ParsedRow {
            source_title: title.trim().to_string(),
            title_key: normalize_title(&title),
            units,
            royalty: parse_number(&cell(row, cols.royalty)),
            month,
        });
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_normalize_title_collapses_whitespace() {
        assert_eq!(normalize_title("  The  GREAT \t Escape "), "the great escape");
        assert_eq!(normalize_title("Sourdough"), "sourdough");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("$1,234.56"), 1234.56);
        assert_eq!(parse_number("4.99"), 4.99);
        assert_eq!(parse_number("-12.5"), -12.5);
        assert_eq!(parse_number("1,234"), 1234.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
    }

    #[test]
    fn test_parse_number_ignores_accounting_parens() {
        // Parentheses are stripped, not read as a negative sign.
        assert_eq!(parse_number("(50.00)"), 50.0);
    }

    #[test]
    fn test_parse_units_truncates() {
        assert_eq!(parse_units("3"), 3);
        assert_eq!(parse_units("2.9"), 2);
        assert_eq!(parse_units("-1"), -1);
        assert_eq!(parse_units("n/a"), 0);
    }

    #[test]
    fn test_month_key_iso_dates() {
        assert_eq!(month_key("2024-03"), Some("2024-03".to_string()));
        assert_eq!(month_key("2024-03-15"), Some("2024-03".to_string()));
        assert_eq!(month_key(" 2024-11-01 "), Some("2024-11".to_string()));
    }

    #[test]
    fn test_month_key_slash_dates() {
        assert_eq!(month_key("2024/03"), Some("2024-03".to_string()));
        assert_eq!(month_key("2024/03/15"), Some("2024-03".to_string()));
        assert_eq!(month_key("3/15/2024"), Some("2024-03".to_string()));
        assert_eq!(month_key("03/2024"), Some("2024-03".to_string()));
    }

    #[test]
    fn test_month_key_text_dates() {
        assert_eq!(month_key("Jan 15, 2024"), Some("2024-01".to_string()));
        assert_eq!(month_key("15 March 2024"), Some("2024-03".to_string()));
        assert_eq!(month_key("January 2024"), Some("2024-01".to_string()));
        assert_eq!(month_key("Sep 2025"), Some("2025-09".to_string()));
    }

    #[test]
    fn test_month_key_rfc3339() {
        assert_eq!(month_key("2024-06-30T23:00:00Z"), Some("2024-06".to_string()));
        assert_eq!(month_key("2024-07-01T01:00:00+03:00"), Some("2024-06".to_string()));
    }

    #[test]
    fn test_month_key_rejects_garbage() {
        assert_eq!(month_key(""), None);
        assert_eq!(month_key("   "), None);
        assert_eq!(month_key("Total"), None);
        assert_eq!(month_key("13/2024"), None);
        assert_eq!(month_key("Smarch 2024"), None);
    }

    #[test]
    fn test_rows_from_table_maps_cells() {
        let rows = rows_from_table(&table(&[
            &["Title", "Net Units Sold", "Royalty", "Royalty Date"],
            &["  Sourdough for Beginners ", "3", "$12.50", "2024-01-15"],
            &["Night Runs", "", "4.10", "2024-01-20"],
        ]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].source_title, "Sourdough for Beginners");
        assert_eq!(rows[0].title_key, "sourdough for beginners");
        assert_eq!(rows[0].units, 3);
        assert_eq!(rows[0].royalty, 12.5);
        assert_eq!(rows[0].month, "2024-01");
        assert_eq!(rows[1].units, 0);
    }

    #[test]
    fn test_rows_from_table_skips_bad_rows() {
        let rows = rows_from_table(&table(&[
            &["Title", "Royalty", "Date"],
            &["", "5.00", "2024-01-01"],
            &["No Date", "5.00", "soon"],
            &["Good", "5.00", "2024-02-01"],
        ]));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source_title, "Good");
    }

    #[test]
    fn test_rows_from_table_units_default_to_zero() {
        let rows = rows_from_table(&table(&[
            &["Title", "Royalty", "Month"],
            &["Salt Flats", "9.99", "2024-05"],
        ]));
        assert_eq!(rows[0].units, 0);
        assert_eq!(rows[0].royalty, 9.99);
    }

    #[test]
    fn test_rows_from_table_without_required_columns() {
        let rows = rows_from_table(&table(&[
            &["SKU", "Warehouse"],
            &["A-1", "East"],
        ]));
        assert!(rows.is_empty());
        assert!(rows_from_table(&[]).is_empty());
    }

    #[test]
    fn test_rows_from_table_handles_short_rows() {
        let rows = rows_from_table(&table(&[
            &["Title", "Units", "Royalty", "Date"],
            &["Short Row"],
        ]));
        assert!(rows.is_empty());
    }
}
