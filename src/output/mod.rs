//! Output module for persisting harvested entries
//!
//! This module handles:
//! - Appending each key's entries to the word list as the key completes
//! - Summarising the crawl in a per-key report

mod report;
mod sink;

pub use report::{print_report, CrawlReport, KeyReport};
pub use sink::{FileSink, MemorySink, OutputSink};
