use std::path::Path;

use crate::fmt::{format_bytes, month_label};
use crate::store::{load_state, state_path};

pub fn run(data_dir: &Path) -> anyhow::Result<()> {
    let path = state_path(data_dir);
    println!("Data file:  {}", path.display());

    if !path.exists() {
        println!();
        println!("No data yet. Add a book or import a report to get started.");
        return Ok(());
    }

    let size = std::fs::metadata(&path)?.len();
    println!("File size:  {}", format_bytes(size));

    let state = load_state(&path);
    println!();
    println!("Books:          {}", state.books.len());
    println!("Sales records:  {}", state.sales.len());
    println!("Imports:        {}", state.imports.len());

    if let Some(last) = state.imports.last() {
        let latest = last
            .latest_month
            .as_deref()
            .map(month_label)
            .unwrap_or_else(|| "-".to_string());
        println!();
        println!("Last import: {} ({} rows, latest month {latest})", last.file_name, last.rows_count);
    }
    Ok(())
}
