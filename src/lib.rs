//! Lexicon-Harvest: a polite dictionary headword harvester
//!
//! This crate walks a paginated, alphabetically indexed web dictionary one
//! index key at a time, extracts the headwords from every result page and
//! appends them to a flat word list.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Lexicon-Harvest operations
///
/// Only setup and resource-acquisition failures surface as this type.
/// Page-level failures are absorbed by the crawler and logged.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error for {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector '{0}'")]
    InvalidSelector(String),

    #[error("Invalid index key: {0}")]
    InvalidKey(String),
}

/// Non-fatal extraction failures reported by a page parser
///
/// Callers degrade these to a default value (one page, zero entries).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("page content is empty")]
    EmptyContent,

    #[error("no pagination indicator found")]
    MissingIndicator,

    #[error("malformed page count in '{0}'")]
    MalformedCount(String),

    #[error("no entry groups found")]
    NoEntryGroups,
}

/// Result type alias for Lexicon-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, Dictionary};
pub use crawler::{run_crawl, Coordinator, KeyPaginator};
pub use index::{Entry, IndexKey, PageCount, PageRequest};
pub use output::{CrawlReport, FileSink, OutputSink};
