//! Crawler module for browse-page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of one browse page at a time
//! - HTML parsing of page counts and entries
//! - Per-key pagination with an inter-key delay
//! - Overall crawl coordination and progress reporting

mod coordinator;
mod fetcher;
mod paginator;
mod parser;
mod progress;
#[cfg(test)]
mod test_support;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use paginator::{KeyOutcome, KeyPaginator, PageOutcome, PaginatorState};
pub use parser::{parse_page_indicator, HtmlPageParser, PageParser};
pub use progress::{LogProgress, NoProgress, ProgressReporter};
