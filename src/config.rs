//! Catalog file locations and write behaviour.
//!
//! Loaded from an optional TOML file; every key has a default:
//!
//! ```toml
//! books_path = "books.txt"
//! members_path = "members.txt"
//! atomic_writes = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Failure to read or parse a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("reading {}: {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid config TOML.
    #[error("parsing {}: {source}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: toml::de::Error,
    },
}

/// Resolved catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Books file.
    pub books_path: PathBuf,
    /// Members file.
    pub members_path: PathBuf,
    /// Write through a temp file and rename instead of truncating in place.
    pub atomic_writes: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            books_path: PathBuf::from("books.txt"),
            members_path: PathBuf::from("members.txt"),
            atomic_writes: true,
        }
    }
}

impl CatalogConfig {
    /// Parses config TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Reads and parses a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Replaces file locations with any explicitly given values.
    pub fn with_overrides(mut self, books_path: Option<PathBuf>, members_path: Option<PathBuf>) -> Self {
        if let Some(path) = books_path {
            self.books_path = path;
        }
        if let Some(path) = members_path {
            self.members_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = CatalogConfig::from_toml_str("").expect("parse");
        assert_eq!(cfg, CatalogConfig::default());
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let cfg = CatalogConfig::from_toml_str("members_path = \"data/m.txt\"\natomic_writes = false\n")
            .expect("parse");
        assert_eq!(cfg.books_path, PathBuf::from("books.txt"));
        assert_eq!(cfg.members_path, PathBuf::from("data/m.txt"));
        assert!(!cfg.atomic_writes);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CatalogConfig::from_toml_str("book_path = \"typo.txt\"").is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cfg = CatalogConfig::default().with_overrides(Some(PathBuf::from("b.txt")), None);
        assert_eq!(cfg.books_path, PathBuf::from("b.txt"));
        assert_eq!(cfg.members_path, PathBuf::from("members.txt"));
    }
}
