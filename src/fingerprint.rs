//! Import fingerprints.
//!
//! A fingerprint is a 32-bit polynomial rolling hash over a bounded sample
//! of the report, rendered as a decimal string. Fingerprints recorded by
//! the web edition of the tracker use the same scheme, so import logs stay
//! comparable across a backup restore. The hash is intentionally cheap and
//! collision-prone across wildly different files is acceptable; it only has
//! to catch the same report being imported twice.

#[cfg(feature = "xlsx")]
use crate::error::Result;
#[cfg(feature = "xlsx")]
use crate::models::ParsedRow;

/// CSV sampling stops after this many non-blank lines.
const CSV_SAMPLE_LINES: usize = 2000;

/// Workbook sampling stops after this many parsed rows.
#[cfg(feature = "xlsx")]
const WORKBOOK_SAMPLE_ROWS: usize = 3000;

/// Rolling hash over the UTF-16 code units of `s`, with 32-bit wrapping.
pub fn fingerprint_text(s: &str) -> String {
    let mut hash: i32 = 0;
    for unit in s.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(unit as i32);
    }
    hash.to_string()
}

/// Fingerprint of a CSV report: carriage returns stripped, then the first
/// [`CSV_SAMPLE_LINES`] non-blank lines joined with `\n`. CRLF and LF
/// copies of the same report therefore hash identically, and blank lines
/// never count toward the sample.
pub fn csv_fingerprint(content: &str) -> String {
    let stripped = content.replace('\r', "");
    let sample: Vec<&str> = stripped
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .take(CSV_SAMPLE_LINES)
        .collect();
    fingerprint_text(&sample.join("\n"))
}

/// Fingerprint of a workbook: the JSON serialization of the first
/// [`WORKBOOK_SAMPLE_ROWS`] parsed rows. Workbook bytes are not hashed
/// directly because the same sheet re-saved by Excel changes its zip
/// container without changing any data.
#[cfg(feature = "xlsx")]
pub fn workbook_fingerprint(rows: &[ParsedRow]) -> Result<String> {
    let sample = &rows[..rows.len().min(WORKBOOK_SAMPLE_ROWS)];
    let json = serde_json::to_string(sample)?;
    Ok(fingerprint_text(&json))
}
