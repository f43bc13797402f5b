use std::path::Path;

use comfy_table::{Cell, Table};

use crate::fmt::month_label;
use crate::store::{load_state, state_path};

pub fn list(data_dir: &Path) -> anyhow::Result<()> {
    let state = load_state(&state_path(data_dir));
    if state.imports.is_empty() {
        println!("No imports yet. Import a report with `folio import <file>`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Imported At", "File", "Rows", "Books", "Latest Month"]);
    for record in &state.imports {
        // RFC 3339 timestamps are readable enough truncated to the minute.
        let stamp: String = record.imported_at.chars().take(16).collect();
        table.add_row(vec![
            Cell::new(stamp.replace('T', " ")),
            Cell::new(&record.file_name),
            Cell::new(record.rows_count),
            Cell::new(record.affected_books),
            Cell::new(
                record
                    .latest_month
                    .as_deref()
                    .map(month_label)
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("Imports\n{table}");
    Ok(())
}
