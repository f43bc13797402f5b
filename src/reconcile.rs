//! Matching parsed report titles against the catalog.
//!
//! A report may spell a title differently from the catalog or contain
//! brand-new books. Unmatched titles are collected and handed to a
//! [`TitleResolver`], which decides per title whether to create a catalog
//! entry or map it onto an existing one. The CLI supplies an interactive
//! resolver; imports can also run unattended with [`AutoCreateResolver`].

use std::collections::{HashMap, HashSet};

use crate::error::{FolioError, Result};
use crate::models::{new_id, Book, ParsedRow};
use crate::rows::normalize_title;

/// One report title with no catalog counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedTitle {
    pub title_key: String,
    pub source_title: String,
}

/// Report titles absent from the catalog, in first-appearance order and
/// deduplicated by title key.
pub fn unknown_titles(rows: &[ParsedRow], books: &[Book]) -> Vec<UnmatchedTitle> {
    let known: HashSet<String> = books.iter().map(|b| normalize_title(&b.title)).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unknown = Vec::new();
    for row in rows {
        if known.contains(&row.title_key) || !seen.insert(&row.title_key) {
            continue;
        }
        unknown.push(UnmatchedTitle {
            title_key: row.title_key.clone(),
            source_title: row.source_title.clone(),
        });
    }
    unknown
}

/// Rewrite rows whose title key has a mapping. The mapped value is a book
/// title; both the key and the display title of the row are replaced so the
/// row aggregates under the target book.
pub fn apply_title_mappings(
    rows: Vec<ParsedRow>,
    mappings: &HashMap<String, String>,
) -> Vec<ParsedRow> {
    rows.into_iter()
        .map(|mut row| {
            if let Some(mapped) = mappings.get(&row.title_key) {
                if !mapped.trim().is_empty() {
                    row.title_key = normalize_title(mapped);
                    row.source_title = mapped.clone();
                }
            }
            row
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleDecision {
    /// Add the title to the catalog as a new book.
    Create,
    /// Fold the title's rows into the book with this id.
    MapTo(String),
}

/// Decisions for a batch of unmatched titles, keyed by title key, plus the
/// niche and format to stamp on any created books. Titles without a
/// decision default to [`TitleDecision::Create`].
#[derive(Debug, Clone)]
pub struct TitleResolution {
    pub decisions: HashMap<String, TitleDecision>,
    pub niche: String,
    pub format: String,
}

pub trait TitleResolver {
    /// Decide what to do with each unmatched title. Returning
    /// [`FolioError::ImportCancelled`] aborts the import with no state
    /// change.
    fn resolve(&mut self, unmatched: &[UnmatchedTitle], books: &[Book])
        -> Result<TitleResolution>;
}

/// Resolver that creates a catalog entry for every unmatched title.
pub struct AutoCreateResolver {
    pub niche: String,
    pub format: String,
}

impl TitleResolver for AutoCreateResolver {
    fn resolve(&mut self, unmatched: &[UnmatchedTitle], _books: &[Book]) -> Result<TitleResolution> {
        Ok(TitleResolution {
            decisions: unmatched
                .iter()
                .map(|u| (u.title_key.clone(), TitleDecision::Create))
                .collect(),
            niche: self.niche.clone(),
            format: self.format.clone(),
        })
    }
}

/// Apply a resolution: create requested books (skipping titles the catalog
/// already has under another spelling) and build the title mappings for
/// [`apply_title_mappings`]. Returns the mappings and the titles of books
/// actually created. `today` is the publish date stamped on new entries.
pub fn apply_resolution(
    books: &mut Vec<Book>,
    unmatched: &[UnmatchedTitle],
    resolution: &TitleResolution,
    today: &str,
) -> Result<(HashMap<String, String>, Vec<String>)> {
    let niche = if resolution.niche.trim().is_empty() {
        "Uncategorized".to_string()
    } else {
        resolution.niche.trim().to_string()
    };
    let format = if resolution.format.trim().is_empty() {
        "Paperback".to_string()
    } else {
        resolution.format.trim().to_string()
    };

    let mut mappings = HashMap::new();
    let mut created = Vec::new();

    for unmatched_title in unmatched {
        match resolution.decisions.get(&unmatched_title.title_key) {
            Some(TitleDecision::MapTo(book_id)) => {
                let book = books
                    .iter()
                    .find(|b| b.id == *book_id)
                    .ok_or_else(|| FolioError::UnknownBook(book_id.clone()))?;
                mappings.insert(unmatched_title.title_key.clone(), book.title.clone());
            }
            Some(TitleDecision::Create) | None => {
                let title = unmatched_title.source_title.trim().to_string();
                let key = normalize_title(&title);
                if !books.iter().any(|b| normalize_title(&b.title) == key) {
                    books.push(Book {
                        id: new_id(),
                        title: title.clone(),
                        series: String::new(),
                        niche: niche.clone(),
                        format: format.clone(),
                        publish_date: today.to_string(),
                        design_cost: 0.0,
                        marketing_cost: 0.0,
                    });
                    created.push(title.clone());
                }
                mappings.insert(unmatched_title.title_key.clone(), title);
            }
        }
    }

    Ok((mappings, created))
}
