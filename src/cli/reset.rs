use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;

use crate::store::{reset_state, state_path};

pub fn run(data_dir: &Path, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete all books, sales and import history?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("{}", "Nothing deleted.".yellow());
            return Ok(());
        }
    }

    reset_state(&state_path(data_dir))?;
    println!("All data deleted.");
    Ok(())
}
