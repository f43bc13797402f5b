use std::path::Path;

use crate::error::{FolioError, Result};
use crate::fingerprint::csv_fingerprint;
#[cfg(feature = "xlsx")]
use crate::fingerprint::workbook_fingerprint;
use crate::models::ParsedRow;
use crate::rows::rows_from_table;

/// Output of parsing one report file, before any catalog matching.
#[derive(Debug, Clone)]
pub struct ParsedReport {
    pub rows: Vec<ParsedRow>,
    pub fingerprint: String,
    pub file_name: String,
}

/// Parse a sales report by extension. Files without an extension are read
/// as CSV, which covers shell-generated exports like `report`.
pub fn parse_report(path: &Path) -> Result<ParsedReport> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();
    let lower = file_name.to_lowercase();

    if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        #[cfg(feature = "xlsx")]
        {
            return parse_workbook(path, &file_name);
        }
        #[cfg(not(feature = "xlsx"))]
        {
            let extension = lower.rsplit('.').next().unwrap_or("").to_string();
            return Err(FolioError::UnsupportedFileType(extension));
        }
    }

    if lower.ends_with(".csv") || !lower.contains('.') {
        let content = std::fs::read_to_string(path)?;
        return parse_csv_text(&content, &file_name);
    }

    let extension = lower.rsplit('.').next().unwrap_or("").to_string();
    Err(FolioError::UnsupportedFileType(extension))
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

pub fn parse_csv_text(content: &str, file_name: &str) -> Result<ParsedReport> {
    if content.trim().is_empty() {
        return Err(FolioError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut table: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        table.push(row);
    }

    if table.len() < 2 {
        return Err(FolioError::NoDataRows);
    }

    let rows = rows_from_table(&table);
    if rows.is_empty() {
        return Err(FolioError::UnrecognizedColumns(file_name.to_string()));
    }

    log::debug!("{file_name}: {} rows parsed from CSV", rows.len());
    Ok(ParsedReport {
        rows,
        fingerprint: csv_fingerprint(content),
        file_name: file_name.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Workbooks
// ---------------------------------------------------------------------------

/// Excel epoch is 1899-12-30, which absorbs the 1900 leap year bug.
#[cfg(feature = "xlsx")]
fn excel_serial_to_date(serial: f64) -> Option<chrono::NaiveDate> {
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::Duration::days(serial as i64))
}

#[cfg(feature = "xlsx")]
fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

/// Sheets to read from a workbook: every sheet, unless some are
/// "Combined Sales" sheets, in which case only those. KDP royalty
/// workbooks carry per-marketplace sheets plus a combined one; reading all
/// of them would double count.
fn select_sheets(sheet_names: &[String]) -> Vec<String> {
    use crate::columns::normalize_header;

    let combined: Vec<String> = sheet_names
        .iter()
        .filter(|name| normalize_header(name).contains("combined sales"))
        .cloned()
        .collect();
    if combined.is_empty() {
        sheet_names.to_vec()
    } else {
        combined
    }
}

#[cfg(feature = "xlsx")]
pub fn parse_workbook(path: &Path, file_name: &str) -> Result<ParsedReport> {
    use calamine::Reader;

    let mut workbook = calamine::open_workbook_auto(path)?;
    let selected = select_sheets(&workbook.sheet_names().to_vec());

    let mut rows: Vec<ParsedRow> = Vec::new();
    for sheet in &selected {
        let Ok(range) = workbook.worksheet_range(sheet) else {
            continue;
        };
        let mut table: Vec<Vec<String>> = Vec::new();
        for raw_row in range.rows() {
            let cells: Vec<String> = raw_row.iter().map(cell_text).collect();
            if cells.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            table.push(cells);
        }
        if table.is_empty() {
            continue;
        }
        let sheet_rows = rows_from_table(&table);
        log::debug!("{file_name} / {sheet}: {} rows parsed", sheet_rows.len());
        rows.extend(sheet_rows);
    }

    if rows.is_empty() {
        return Err(FolioError::UnrecognizedColumns(file_name.to_string()));
    }

    let fingerprint = workbook_fingerprint(&rows)?;
    Ok(ParsedReport {
        rows,
        fingerprint,
        file_name: file_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KDP_CSV: &str = "\
Title,Author,Net Units Sold,Royalty,Royalty Date
Sourdough for Beginners,J. Baker,3,12.50,2024-01-15
Night Runs,K. Swift,1,4.10,2024-01-20
Sourdough for Beginners,J. Baker,2,8.00,2024-02-03
";

    #[test]
    fn test_parse_csv_text() {
        let report = parse_csv_text(KDP_CSV, "jan.csv").unwrap();
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.file_name, "jan.csv");
        assert_eq!(report.rows[0].title_key, "sourdough for beginners");
        assert_eq!(report.rows[0].units, 3);
        assert_eq!(report.rows[2].month, "2024-02");
        assert!(!report.fingerprint.is_empty());
    }

    #[test]
    fn test_parse_csv_text_quoted_titles() {
        let content = "\
Title,Royalty,Date
\"Cook, Eat, Repeat\",9.00,2024-03-01
\"The \"\"Big\"\" Book\",1.00,2024-03-02
";
        let report = parse_csv_text(content, "q.csv").unwrap();
        assert_eq!(report.rows[0].source_title, "Cook, Eat, Repeat");
        assert_eq!(report.rows[1].source_title, "The \"Big\" Book");
    }

    #[test]
    fn test_parse_csv_text_empty_file() {
        let err = parse_csv_text("", "empty.csv").unwrap_err();
        assert!(matches!(err, FolioError::EmptyFile));
        let err = parse_csv_text("  \n \n", "empty.csv").unwrap_err();
        assert!(matches!(err, FolioError::EmptyFile));
    }

    #[test]
    fn test_parse_csv_text_header_only() {
        let err = parse_csv_text("Title,Royalty,Date\n", "h.csv").unwrap_err();
        assert!(matches!(err, FolioError::NoDataRows));
    }

    #[test]
    fn test_parse_csv_text_unrecognized_columns() {
        let content = "SKU,Warehouse\nA-1,East\n";
        let err = parse_csv_text(content, "stock.csv").unwrap_err();
        assert!(matches!(err, FolioError::UnrecognizedColumns(name) if name == "stock.csv"));
    }

    #[test]
    fn test_parse_csv_text_same_fingerprint_for_same_content() {
        let a = parse_csv_text(KDP_CSV, "a.csv").unwrap();
        let b = parse_csv_text(KDP_CSV, "b.csv").unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn test_select_sheets_prefers_combined_sales() {
        let names = vec![
            "Royalties".to_string(),
            "Combined Sales - eBook".to_string(),
            "Combined Sales - Paperback".to_string(),
        ];
        assert_eq!(
            select_sheets(&names),
            vec![
                "Combined Sales - eBook".to_string(),
                "Combined Sales - Paperback".to_string()
            ]
        );

        let plain = vec!["Sheet1".to_string(), "Sheet2".to_string()];
        assert_eq!(select_sheets(&plain), plain);
    }

    #[test]
    fn test_parse_report_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, "%PDF-1.4").unwrap();
        let err = parse_report(&path).unwrap_err();
        assert!(matches!(err, FolioError::UnsupportedFileType(ext) if ext == "pdf"));
    }

    #[test]
    fn test_parse_report_reads_extensionless_as_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export");
        std::fs::write(&path, KDP_CSV).unwrap();
        let report = parse_report(&path).unwrap();
        assert_eq!(report.rows.len(), 3);
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_excel_serial_to_date() {
        let date = excel_serial_to_date(45667.0).unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-01-10");
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn test_cell_text_variants() {
        use calamine::Data;
        assert_eq!(cell_text(&Data::String("Night Runs".to_string())), "Night Runs");
        assert_eq!(cell_text(&Data::Float(12.0)), "12");
        assert_eq!(cell_text(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
