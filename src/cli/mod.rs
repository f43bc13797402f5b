pub mod backup;
pub mod books;
pub mod import;
pub mod imports;
pub mod prompt;
pub mod report;
pub mod reset;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Month key for "now", local time. Passed into analytics so the engine
/// itself stays clock-free.
pub(crate) fn current_month() -> String {
    chrono::Local::now().format("%Y-%m").to_string()
}

pub(crate) fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[derive(Parser)]
#[command(name = "folio", about = "Royalty analytics CLI for self-published authors.")]
pub struct Cli {
    /// Directory holding the state file (default: platform data dir)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage the book catalog.
    Books {
        #[command(subcommand)]
        command: BooksCommands,
    },
    /// Import a sales report (CSV or XLSX) into the ledger.
    Import {
        /// Path to the report file
        file: PathBuf,
        /// Create a catalog entry for every unmatched title without asking
        #[arg(long = "create-unmatched")]
        create_unmatched: bool,
        /// Niche for books created during this import
        #[arg(long)]
        niche: Option<String>,
        /// Format for books created during this import
        #[arg(long)]
        format: Option<String>,
    },
    /// Show the import history.
    Imports {
        #[command(subcommand)]
        command: ImportsCommands,
    },
    /// Portfolio reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Back up or restore all data as JSON.
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
    /// Delete all local data.
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the data file location and entity counts.
    Status,
}

#[derive(Subcommand)]
pub enum BooksCommands {
    /// Add a book to the catalog.
    Add {
        /// Book title
        title: String,
        /// Series name
        #[arg(long, default_value = "")]
        series: String,
        /// Niche, e.g. 'Cozy Mystery'
        #[arg(long)]
        niche: Option<String>,
        /// Format: Paperback, Hardcover, eBook, Audiobook
        #[arg(long)]
        format: Option<String>,
        /// Publication date: YYYY-MM-DD (default: today)
        #[arg(long = "publish-date")]
        publish_date: Option<String>,
        /// Cover and interior design spend
        #[arg(long = "design-cost", default_value = "0")]
        design_cost: f64,
        /// Ads and promotion spend
        #[arg(long = "marketing-cost", default_value = "0")]
        marketing_cost: f64,
    },
    /// List the catalog with lifetime revenue per book.
    List,
    /// Edit a book found by title or id.
    Edit {
        /// Current title (or id) of the book
        book: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New series name
        #[arg(long)]
        series: Option<String>,
        /// New niche
        #[arg(long)]
        niche: Option<String>,
        /// New format
        #[arg(long)]
        format: Option<String>,
        /// New publication date: YYYY-MM-DD
        #[arg(long = "publish-date")]
        publish_date: Option<String>,
        /// New design spend
        #[arg(long = "design-cost")]
        design_cost: Option<f64>,
        /// New marketing spend
        #[arg(long = "marketing-cost")]
        marketing_cost: Option<f64>,
    },
    /// Delete a book and its sales records.
    Delete {
        /// Title (or id) of the book
        book: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ImportsCommands {
    /// List every imported report, oldest first.
    List,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Portfolio KPIs and suggestions.
    Summary,
    /// Per-book return on investment.
    Roi,
    /// Revenue by month.
    Months,
    /// Revenue by niche.
    Niches,
}

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Write all data to a JSON backup file.
    Export {
        /// Output path (default: ./folio-backup-YYYY-MM-DD.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace all data with a backup file's contents.
    Restore {
        /// Path to a backup JSON file
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}
