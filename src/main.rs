mod analytics;
mod catalog;
mod cli;
mod columns;
mod error;
mod fingerprint;
mod fmt;
mod importer;
mod ledger;
mod models;
mod parser;
mod reconcile;
mod rows;
mod store;

use clap::Parser;

use cli::{BackupCommands, BooksCommands, Cli, Commands, ImportsCommands, ReportCommands};

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(store::default_data_dir);

    let result = match cli.command {
        Commands::Books { command } => match command {
            BooksCommands::Add {
                title,
                series,
                niche,
                format,
                publish_date,
                design_cost,
                marketing_cost,
            } => cli::books::add(
                &data_dir,
                &title,
                &series,
                niche.as_deref(),
                format.as_deref(),
                publish_date.as_deref(),
                design_cost,
                marketing_cost,
            ),
            BooksCommands::List => cli::books::list(&data_dir),
            BooksCommands::Edit {
                book,
                title,
                series,
                niche,
                format,
                publish_date,
                design_cost,
                marketing_cost,
            } => cli::books::edit(
                &data_dir,
                &book,
                title,
                series,
                niche,
                format,
                publish_date,
                design_cost,
                marketing_cost,
            ),
            BooksCommands::Delete { book, yes } => cli::books::delete(&data_dir, &book, yes),
        },
        Commands::Import {
            file,
            create_unmatched,
            niche,
            format,
        } => cli::import::run(
            &data_dir,
            &file,
            create_unmatched,
            niche.as_deref(),
            format.as_deref(),
        ),
        Commands::Imports { command } => match command {
            ImportsCommands::List => cli::imports::list(&data_dir),
        },
        Commands::Report { command } => match command {
            ReportCommands::Summary => cli::report::summary(&data_dir),
            ReportCommands::Roi => cli::report::roi_report(&data_dir),
            ReportCommands::Months => cli::report::months(&data_dir),
            ReportCommands::Niches => cli::report::niches(&data_dir),
        },
        Commands::Backup { command } => match command {
            BackupCommands::Export { output } => cli::backup::export(&data_dir, output),
            BackupCommands::Restore { file, yes } => cli::backup::restore(&data_dir, &file, yes),
        },
        Commands::Reset { yes } => cli::reset::run(&data_dir, yes),
        Commands::Status => cli::status::run(&data_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
