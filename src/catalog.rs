//! Catalog management: adding, editing and removing books.

use chrono::NaiveDate;

use crate::error::{FolioError, Result};
use crate::models::{new_id, AppState, Book};
use crate::rows::normalize_title;

/// Field values for a new catalog entry.
#[derive(Debug, Clone, Default)]
pub struct BookDraft {
    pub title: String,
    pub series: String,
    pub niche: String,
    pub format: String,
    pub publish_date: String,
    pub design_cost: f64,
    pub marketing_cost: f64,
}

/// Partial update; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub title: Option<String>,
    pub series: Option<String>,
    pub niche: Option<String>,
    pub format: Option<String>,
    pub publish_date: Option<String>,
    pub design_cost: Option<f64>,
    pub marketing_cost: Option<f64>,
}

fn validate(book: &Book) -> Result<()> {
    if book.title.trim().is_empty() {
        return Err(FolioError::Validation("a book needs a title".to_string()));
    }
    if book.niche.trim().is_empty() {
        return Err(FolioError::Validation("a book needs a niche".to_string()));
    }
    if NaiveDate::parse_from_str(&book.publish_date, "%Y-%m-%d").is_err() {
        return Err(FolioError::Validation(format!(
            "publish date '{}' is not a YYYY-MM-DD date",
            book.publish_date
        )));
    }
    if book.design_cost < 0.0 || book.marketing_cost < 0.0 {
        return Err(FolioError::Validation(
            "costs cannot be negative".to_string(),
        ));
    }
    Ok(())
}

fn assert_title_free(state: &AppState, title: &str, except_id: Option<&str>) -> Result<()> {
    let key = normalize_title(title);
    let clash = state
        .books
        .iter()
        .any(|b| Some(b.id.as_str()) != except_id && normalize_title(&b.title) == key);
    if clash {
        return Err(FolioError::Validation(format!(
            "a book titled '{title}' is already in the catalog"
        )));
    }
    Ok(())
}

/// Find a book by exact id or, failing that, by title key.
pub fn find_book<'a>(state: &'a AppState, needle: &str) -> Option<&'a Book> {
    if let Some(book) = state.books.iter().find(|b| b.id == needle) {
        return Some(book);
    }
    let key = normalize_title(needle);
    state.books.iter().find(|b| normalize_title(&b.title) == key)
}

pub fn add_book(state: &mut AppState, draft: BookDraft) -> Result<&Book> {
    let book = Book {
        id: new_id(),
        title: draft.title.trim().to_string(),
        series: draft.series.trim().to_string(),
        niche: draft.niche.trim().to_string(),
        format: draft.format.trim().to_string(),
        publish_date: draft.publish_date.trim().to_string(),
        design_cost: draft.design_cost,
        marketing_cost: draft.marketing_cost,
    };
    validate(&book)?;
    assert_title_free(state, &book.title, None)?;
    state.books.push(book);
    Ok(state.books.last().expect("book was just pushed"))
}

pub fn update_book(state: &mut AppState, needle: &str, patch: BookPatch) -> Result<Book> {
    let id = find_book(state, needle)
        .map(|b| b.id.clone())
        .ok_or_else(|| FolioError::UnknownBook(needle.to_string()))?;

    let index = state
        .books
        .iter()
        .position(|b| b.id == id)
        .ok_or_else(|| FolioError::UnknownBook(needle.to_string()))?;

    let mut updated = state.books[index].clone();
    if let Some(title) = patch.title {
        updated.title = title.trim().to_string();
    }
    if let Some(series) = patch.series {
        updated.series = series.trim().to_string();
    }
    if let Some(niche) = patch.niche {
        updated.niche = niche.trim().to_string();
    }
    if let Some(format) = patch.format {
        updated.format = format.trim().to_string();
    }
    if let Some(publish_date) = patch.publish_date {
        updated.publish_date = publish_date.trim().to_string();
    }
    if let Some(design_cost) = patch.design_cost {
        updated.design_cost = design_cost;
    }
    if let Some(marketing_cost) = patch.marketing_cost {
        updated.marketing_cost = marketing_cost;
    }

    validate(&updated)?;
    assert_title_free(state, &updated.title, Some(&id))?;
    state.books[index] = updated.clone();
    Ok(updated)
}

/// Remove a book and every ledger record attached to it.
pub fn delete_book(state: &mut AppState, needle: &str) -> Result<Book> {
    let id = find_book(state, needle)
        .map(|b| b.id.clone())
        .ok_or_else(|| FolioError::UnknownBook(needle.to_string()))?;

    let index = state
        .books
        .iter()
        .position(|b| b.id == id)
        .ok_or_else(|| FolioError::UnknownBook(needle.to_string()))?;
    let removed = state.books.remove(index);
    state.sales.retain(|s| s.book_id != id);
    Ok(removed)
}
