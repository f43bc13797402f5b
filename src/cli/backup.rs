use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use dialoguer::Confirm;

use crate::cli::today;
use crate::store::{
    default_backup_name, export_backup, load_state, parse_backup, save_state, state_path,
};

pub fn export(data_dir: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let state = load_state(&state_path(data_dir));
    let out = output.unwrap_or_else(|| PathBuf::from(default_backup_name(&today())));
    export_backup(&state, &out).with_context(|| format!("writing {}", out.display()))?;
    println!(
        "Backup saved to {} ({} books, {} sales records, {} imports)",
        out.display(),
        state.books.len(),
        state.sales.len(),
        state.imports.len()
    );
    Ok(())
}

pub fn restore(data_dir: &Path, file: &Path, yes: bool) -> anyhow::Result<()> {
    let text =
        std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let restored = parse_backup(&text)?;

    let path = state_path(data_dir);
    let current = load_state(&path);
    let has_data =
        !current.books.is_empty() || !current.sales.is_empty() || !current.imports.is_empty();
    if has_data && !yes {
        let confirmed = Confirm::new()
            .with_prompt("Replace all current data with this backup?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("{}", "Nothing restored.".yellow());
            return Ok(());
        }
    }

    save_state(&path, &restored).context("saving state")?;
    println!(
        "Restored {} books, {} sales records, {} imports",
        restored.books.len(),
        restored.sales.len(),
        restored.imports.len()
    );
    Ok(())
}
