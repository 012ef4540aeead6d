//! `libcatalog`: console front end for the catalog.

mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use libcatalog::{
    catalog::Catalog,
    config::CatalogConfig,
    persist::flatfile::FlatFileSink,
    shell::{Shell, write_book_list, write_member},
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();

    let config = match &cli.config {
        Some(path) => CatalogConfig::load(path)?,
        None => CatalogConfig::default(),
    }
    .with_overrides(cli.books.clone(), cli.members.clone());
    tracing::debug!(?config, "resolved config");

    let mut catalog = Catalog::new(FlatFileSink::from_config(&config));
    let report = catalog.load().with_context(|| {
        format!(
            "loading {} and {}",
            config.books_path.display(),
            config.members_path.display()
        )
    })?;
    if !report.skipped.is_empty() {
        tracing::warn!(count = report.skipped.len(), "skipped unreadable lines");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => {
            let stdin = io::stdin();
            let mut shell = Shell::new(stdin.lock(), &mut out);
            shell.run(&mut catalog)?;
        }
        Commands::Books { sort } => {
            let store = catalog.store();
            match sort {
                Some(key) => write_book_list(&mut out, store.sorted_books(key.into()))?,
                None => write_book_list(&mut out, store.books())?,
            }
        }
        Commands::Members => {
            for member in catalog.store().members() {
                writeln!(out, "-------")?;
                write_member(&mut out, member)?;
            }
        }
        Commands::Search { by, keyword } => {
            let found = catalog.store().search(by.into(), keyword.trim());
            writeln!(out, "Found {} books:", found.len())?;
            write_book_list(&mut out, found)?;
        }
        Commands::Export => {
            serde_json::to_writer_pretty(&mut out, &catalog.store().export_snapshot())?;
            writeln!(out)?;
        }
        Commands::Check => {
            let findings = catalog.store().check_consistency();
            if findings.is_empty() {
                writeln!(out, "No inconsistencies found.")?;
            }
            for finding in findings {
                writeln!(out, "{}", serde_json::to_string(&finding)?)?;
            }
        }
    }

    Ok(())
}
