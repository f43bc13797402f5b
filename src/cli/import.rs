use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use crate::cli::prompt::InteractiveResolver;
use crate::fmt::month_label;
use crate::importer::run_import;
use crate::reconcile::{AutoCreateResolver, TitleResolver};
use crate::store::{load_state, save_state, state_path};

pub fn run(
    data_dir: &Path,
    file: &Path,
    create_unmatched: bool,
    niche: Option<&str>,
    format: Option<&str>,
) -> anyhow::Result<()> {
    let path = state_path(data_dir);
    let mut state = load_state(&path);

    let niche = niche.unwrap_or(&state.settings.default_niche).to_string();
    let format = format.unwrap_or(&state.settings.default_format).to_string();
    let mut resolver: Box<dyn TitleResolver> = if create_unmatched {
        Box::new(AutoCreateResolver { niche, format })
    } else {
        Box::new(InteractiveResolver {
            default_niche: niche,
            default_format: format,
        })
    };

    let summary = run_import(&mut state, file, resolver.as_mut())?;
    save_state(&path, &state).context("saving state")?;

    if !summary.created_books.is_empty() {
        println!(
            "Added {} new book(s): {}",
            summary.created_books.len(),
            summary.created_books.join(", ")
        );
    }
    let latest = summary
        .latest_month
        .as_deref()
        .map(month_label)
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}",
        format!(
            "Imported {}: {} rows across {} book(s), latest month {latest}",
            summary.file_name, summary.rows_count, summary.affected_books
        )
        .green()
    );
    Ok(())
}
