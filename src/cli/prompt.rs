//! Interactive reconciliation: the one point where an import waits on the
//! user. Each unmatched title is either added to the catalog or mapped onto
//! an existing book; choosing to cancel (or closing the terminal) aborts
//! the import before anything is written.

use colored::Colorize;
use dialoguer::{Input, Select};

use crate::error::{FolioError, Result};
use crate::models::Book;
use crate::reconcile::{TitleDecision, TitleResolution, TitleResolver, UnmatchedTitle};

pub struct InteractiveResolver {
    pub default_niche: String,
    pub default_format: String,
}

impl TitleResolver for InteractiveResolver {
    fn resolve(&mut self, unmatched: &[UnmatchedTitle], books: &[Book]) -> Result<TitleResolution> {
        println!(
            "\n{} title(s) in this report are not in your catalog.\n",
            unmatched.len()
        );

        let mut decisions = std::collections::HashMap::new();
        for entry in unmatched {
            println!("{}", "\u{2500}".repeat(60));
            println!("  Report title: {}", entry.source_title.bold());

            let mut options = vec!["Add as a new book".to_string()];
            if !books.is_empty() {
                options.push("Map to an existing book".to_string());
            }
            options.push("Cancel import".to_string());

            let choice = Select::new()
                .with_prompt("What is this?")
                .items(&options)
                .default(0)
                .interact()
                .map_err(|_| FolioError::ImportCancelled)?;

            if options[choice] == "Cancel import" {
                return Err(FolioError::ImportCancelled);
            }
            if options[choice] == "Add as a new book" {
                decisions.insert(entry.title_key.clone(), TitleDecision::Create);
                continue;
            }

            let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
            let target = Select::new()
                .with_prompt("Which book?")
                .items(&titles)
                .default(0)
                .interact()
                .map_err(|_| FolioError::ImportCancelled)?;
            decisions.insert(
                entry.title_key.clone(),
                TitleDecision::MapTo(books[target].id.clone()),
            );
        }

        let creating = decisions
            .values()
            .any(|d| matches!(d, TitleDecision::Create));
        let (niche, format) = if creating {
            println!("{}", "\u{2500}".repeat(60));
            let niche: String = Input::new()
                .with_prompt("Niche for new books")
                .default(self.default_niche.clone())
                .interact_text()
                .map_err(|_| FolioError::ImportCancelled)?;
            let format: String = Input::new()
                .with_prompt("Format for new books")
                .default(self.default_format.clone())
                .interact_text()
                .map_err(|_| FolioError::ImportCancelled)?;
            (niche, format)
        } else {
            (self.default_niche.clone(), self.default_format.clone())
        };

        Ok(TitleResolution {
            decisions,
            niche,
            format,
        })
    }
}
