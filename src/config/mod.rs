//! Configuration module for Lexicon-Harvest
//!
//! This module builds the single immutable [`Config`] a crawl runs with. It
//! starts from built-in defaults, layers an optional TOML file on top, then
//! applies command-line overrides and validates the result.
//!
//! # Example
//!
//! ```no_run
//! use lexicon_harvest::config::{load_config, Dictionary, Overrides};
//!
//! let overrides = Overrides {
//!     dictionary: Some(Dictionary::Medical),
//!     ..Default::default()
//! };
//! let config = load_config(None, overrides).unwrap();
//! println!("Writing to {}", config.output.path.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, Dictionary, FileConfig, FileOutputConfig, OutputConfig, Overrides,
    SelectorConfig, UserAgentConfig, DEFAULT_BASE_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_file_config, resolve};
pub use validation::validate;
