//! Import orchestration: one report file, end to end.
//!
//! The whole pipeline runs against a staged copy of the state and the copy
//! replaces the caller's state only after every step succeeded. A duplicate
//! report, a cancelled reconciliation or a report with no matching rows
//! therefore leaves catalog, ledger and import log exactly as they were.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{FolioError, Result};
use crate::ledger::{aggregate_rows, merge_sales};
use crate::models::{new_id, AppState, ImportRecord};
use crate::parser::parse_report;
use crate::reconcile::{apply_resolution, apply_title_mappings, unknown_titles, TitleResolver};

/// What one committed import did, for the summary line and the log.
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub file_name: String,
    pub rows_count: usize,
    pub affected_books: usize,
    pub latest_month: Option<String>,
    /// Titles added to the catalog during reconciliation.
    pub created_books: Vec<String>,
}

pub fn run_import(
    state: &mut AppState,
    path: &Path,
    resolver: &mut dyn TitleResolver,
) -> Result<ImportSummary> {
    let report = parse_report(path)?;

    if let Some(existing) = state
        .imports
        .iter()
        .find(|i| i.import_hash == report.fingerprint)
    {
        return Err(FolioError::DuplicateImport(existing.file_name.clone()));
    }

    let mut staged = state.clone();
    let mut rows = report.rows;

    let unmatched = unknown_titles(&rows, &staged.books);
    let mut created_books = Vec::new();
    if !unmatched.is_empty() {
        log::info!(
            "{}: {} unmatched title(s) need resolving",
            report.file_name,
            unmatched.len()
        );
        let resolution = resolver.resolve(&unmatched, &staged.books)?;
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let (mappings, created) =
            apply_resolution(&mut staged.books, &unmatched, &resolution, &today)?;
        rows = apply_title_mappings(rows, &mappings);
        created_books = created;
    }

    let aggregated = aggregate_rows(&rows, &staged.books);
    if aggregated.is_empty() {
        return Err(FolioError::NoMatchingRows);
    }

    merge_sales(&mut staged.sales, &aggregated, &report.fingerprint);

    let latest_month = aggregated.iter().map(|a| a.month.clone()).max();
    let affected_books = aggregated
        .iter()
        .map(|a| a.book_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    staged.imports.push(ImportRecord {
        id: new_id(),
        import_hash: report.fingerprint,
        file_name: report.file_name.clone(),
        imported_at: chrono::Utc::now().to_rfc3339(),
        latest_month: latest_month.clone(),
        affected_books,
        rows_count: rows.len(),
    });

    log::info!(
        "{}: {} rows merged into {} book(s)",
        report.file_name,
        rows.len(),
        affected_books
    );

    *state = staged;
    Ok(ImportSummary {
        file_name: report.file_name,
        rows_count: rows.len(),
        affected_books,
        latest_month,
        created_books,
    })
}
