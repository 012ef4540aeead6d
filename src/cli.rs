use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use libcatalog::types::{SearchField, SortKey};

#[derive(Parser)]
#[command(
    name = "libcatalog",
    about = "Track a library's books and members in flat files",
    version
)]
pub struct Cli {
    /// TOML config file with file locations
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Books file (overrides config)
    #[arg(long)]
    pub books: Option<PathBuf>,

    /// Members file (overrides config)
    #[arg(long)]
    pub members: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive menu (default)
    Shell,

    /// List books, optionally sorted
    Books {
        /// Sort key
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },

    /// List members
    Members,

    /// Case-insensitive keyword search over books
    Search {
        /// Field to match against
        #[arg(long, value_enum, default_value = "title")]
        by: FieldArg,

        /// Keyword to look for
        keyword: String,
    },

    /// Print every record as JSON
    Export,

    /// Report books and members whose issued state disagrees
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Title,
    Author,
    Category,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Title => SortKey::Title,
            SortArg::Author => SortKey::Author,
            SortArg::Category => SortKey::Category,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FieldArg {
    Title,
    Author,
    Category,
}

impl From<FieldArg> for SearchField {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Title => SearchField::Title,
            FieldArg::Author => SearchField::Author,
            FieldArg::Category => SearchField::Category,
        }
    }
}
