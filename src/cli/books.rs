use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use comfy_table::{Cell, Table};
use dialoguer::Confirm;

use crate::catalog::{add_book, delete_book, update_book, BookDraft, BookPatch};
use crate::cli::today;
use crate::fmt::money;
use crate::store::{load_state, save_state, state_path};

#[allow(clippy::too_many_arguments)]
pub fn add(
    data_dir: &Path,
    title: &str,
    series: &str,
    niche: Option<&str>,
    format: Option<&str>,
    publish_date: Option<&str>,
    design_cost: f64,
    marketing_cost: f64,
) -> anyhow::Result<()> {
    let path = state_path(data_dir);
    let mut state = load_state(&path);

    let draft = BookDraft {
        title: title.to_string(),
        series: series.to_string(),
        niche: niche.unwrap_or(&state.settings.default_niche).to_string(),
        format: format.unwrap_or(&state.settings.default_format).to_string(),
        publish_date: publish_date.map(str::to_string).unwrap_or_else(today),
        design_cost,
        marketing_cost,
    };
    let title = add_book(&mut state, draft)?.title.clone();
    save_state(&path, &state).context("saving state")?;
    println!("Added book: {title}");
    Ok(())
}

pub fn list(data_dir: &Path) -> anyhow::Result<()> {
    let state = load_state(&state_path(data_dir));
    if state.books.is_empty() {
        println!("No books yet. Add one with `folio books add <title>`.");
        return Ok(());
    }

    let mut revenue: HashMap<&str, f64> = HashMap::new();
    for sale in &state.sales {
        *revenue.entry(sale.book_id.as_str()).or_default() += sale.royalty;
    }

    let mut table = Table::new();
    table.set_header(vec!["Title", "Series", "Niche", "Format", "Published", "Revenue"]);
    for book in &state.books {
        table.add_row(vec![
            Cell::new(&book.title),
            Cell::new(&book.series),
            Cell::new(&book.niche),
            Cell::new(&book.format),
            Cell::new(&book.publish_date),
            Cell::new(money(revenue.get(book.id.as_str()).copied().unwrap_or(0.0))),
        ]);
    }
    println!("Catalog\n{table}");

    let mut per_niche: Vec<(String, usize)> = Vec::new();
    for book in &state.books {
        let niche = if book.niche.is_empty() {
            "Uncategorized".to_string()
        } else {
            book.niche.clone()
        };
        match per_niche.iter_mut().find(|(name, _)| *name == niche) {
            Some((_, count)) => *count += 1,
            None => per_niche.push((niche, 1)),
        }
    }
    per_niche.sort_by(|a, b| b.1.cmp(&a.1));
    let composition: Vec<String> = per_niche
        .iter()
        .map(|(name, count)| format!("{name} ({count})"))
        .collect();
    println!("\n{} books: {}", state.books.len(), composition.join(", "));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    data_dir: &Path,
    book: &str,
    title: Option<String>,
    series: Option<String>,
    niche: Option<String>,
    format: Option<String>,
    publish_date: Option<String>,
    design_cost: Option<f64>,
    marketing_cost: Option<f64>,
) -> anyhow::Result<()> {
    let path = state_path(data_dir);
    let mut state = load_state(&path);

    let patch = BookPatch {
        title,
        series,
        niche,
        format,
        publish_date,
        design_cost,
        marketing_cost,
    };
    let updated = update_book(&mut state, book, patch)?;
    save_state(&path, &state).context("saving state")?;
    println!("Updated book: {}", updated.title);
    Ok(())
}

pub fn delete(data_dir: &Path, book: &str, yes: bool) -> anyhow::Result<()> {
    let path = state_path(data_dir);
    let mut state = load_state(&path);

    let sales_count = {
        let found = crate::catalog::find_book(&state, book)
            .ok_or_else(|| crate::error::FolioError::UnknownBook(book.to_string()))?;
        let id = found.id.clone();
        state.sales.iter().filter(|s| s.book_id == id).count()
    };

    if !yes {
        let prompt = format!("Delete this book and its {sales_count} sales record(s)?");
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("{}", "Nothing deleted.".yellow());
            return Ok(());
        }
    }

    let removed = delete_book(&mut state, book)?;
    save_state(&path, &state).context("saving state")?;
    println!("Deleted book: {} ({sales_count} sales records removed)", removed.title);
    Ok(())
}
