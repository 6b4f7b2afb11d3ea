//! Per-key pagination
//!
//! A [`KeyPaginator`] walks every result page of one index key:
//!
//! ```text
//! DeterminingPageCount ──> Paginating(1..=count) ──> Done (inter-key pause)
//! ```
//!
//! The page count is fixed once known. Every failure along the way
//! degrades to fewer entries plus a warning; nothing here returns an error.

use crate::crawler::{PageFetcher, PageParser, ProgressReporter};
use crate::index::{Entry, IndexKey, PageCount, PageRequest};
use crate::output::KeyReport;
use crate::ParseFailure;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Where a paginator is in its walk over one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// Fetching page 1 to learn the page count
    DeterminingPageCount,

    /// Fetching `page` of `total`
    Paginating { page: u32, total: PageCount },

    /// All pages attempted (or cancelled)
    Done,
}

/// Everything collected for one key
#[derive(Debug, Clone)]
pub struct KeyOutcome {
    /// Counters for the report
    pub report: KeyReport,

    /// Entries in page order, then document order
    pub entries: Vec<Entry>,

    /// True if cancellation stopped pagination early
    pub cancelled: bool,
}

/// What a single page contributed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page fetched and parsed
    Entries(Vec<Entry>),

    /// Page fetched but held no entry groups
    NoEntries,

    /// Page could not be fetched
    FetchFailed,
}

/// Drives fetch + parse across all pages of one index key
pub struct KeyPaginator<'a, F: ?Sized, P: ?Sized> {
    namespace: &'a str,
    fetcher: &'a F,
    parser: &'a P,
    min_delay: Duration,
    cancel: CancellationToken,
}

impl<'a, F, P> KeyPaginator<'a, F, P>
where
    F: PageFetcher + ?Sized,
    P: PageParser + ?Sized,
{
    /// Creates a paginator for one namespace
    ///
    /// `min_delay` is paused once after each key, not between pages.
    pub fn new(namespace: &'a str, fetcher: &'a F, parser: &'a P, min_delay: Duration) -> Self {
        Self {
            namespace,
            fetcher,
            parser,
            min_delay,
            cancel: CancellationToken::new(),
        }
    }

    /// Stops pagination between pages once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fetches page 1 and reads the page count from it
    ///
    /// A failed fetch or an unreadable indicator yields one page. Page 1 is
    /// not re-fetched after a failed fetch.
    pub async fn discover_page_count(&self, key: IndexKey) -> PageCount {
        let request = PageRequest::new(self.namespace, key, 1);

        let Some(content) = self.fetcher.fetch(&request).await.into_content() else {
            tracing::warn!(
                namespace = self.namespace,
                key = %key,
                "Could not fetch page 1 for key {}, assuming a single page",
                key
            );
            return PageCount::ONE;
        };

        match self.parser.extract_page_count(&content) {
            Ok(count) => {
                tracing::debug!("Key {} has {} pages", key, count);
                count
            }
            Err(failure) => {
                tracing::warn!(
                    namespace = self.namespace,
                    key = %key,
                    "Could not determine the number of pages for key {} ({}). Will stop after page 1.",
                    key,
                    failure
                );
                PageCount::ONE
            }
        }
    }

    /// Fetches one page and extracts its entries
    pub async fn fetch_page(&self, key: IndexKey, page: u32) -> PageOutcome {
        let request = PageRequest::new(self.namespace, key, page);

        let Some(content) = self.fetcher.fetch(&request).await.into_content() else {
            tracing::warn!(
                namespace = self.namespace,
                key = %key,
                page,
                "Empty page, cannot parse entries for key {} on page {}",
                key,
                page
            );
            return PageOutcome::FetchFailed;
        };

        match self.parser.extract_entries(&content) {
            Ok(entries) => {
                tracing::debug!("Added {} new words from key {} page {}", entries.len(), key, page);
                PageOutcome::Entries(entries)
            }
            Err(failure @ (ParseFailure::NoEntryGroups | ParseFailure::EmptyContent)) => {
                tracing::warn!(
                    namespace = self.namespace,
                    key = %key,
                    page,
                    "Could not find any entries for key {} on page {} ({})",
                    key,
                    page,
                    failure
                );
                PageOutcome::NoEntries
            }
            Err(failure) => {
                tracing::warn!(
                    namespace = self.namespace,
                    key = %key,
                    page,
                    "Failed to parse entries for key {} on page {}: {}",
                    key,
                    page,
                    failure
                );
                PageOutcome::NoEntries
            }
        }
    }

    /// Crawls every page of `key`
    ///
    /// With `Some(count)` pagination starts immediately; with `None` the
    /// count is discovered from page 1 first. Each attempted page ticks
    /// `progress` once. After the last page the inter-key delay is applied,
    /// cut short if cancellation fires.
    pub async fn run(
        &self,
        key: IndexKey,
        known_count: Option<PageCount>,
        progress: &dyn ProgressReporter,
    ) -> KeyOutcome {
        tracing::info!("Fetching dictionary for key {}", key);

        let mut outcome = KeyOutcome {
            report: KeyReport {
                key,
                page_count: known_count.unwrap_or_default(),
                pages_attempted: 0,
                pages_failed: 0,
                pages_without_entries: 0,
                entries: 0,
            },
            entries: Vec::new(),
            cancelled: false,
        };

        let mut state = match known_count {
            Some(total) => PaginatorState::Paginating { page: 1, total },
            None => PaginatorState::DeterminingPageCount,
        };

        loop {
            state = match state {
                PaginatorState::DeterminingPageCount => {
                    let total = self.discover_page_count(key).await;
                    outcome.report.page_count = total;
                    PaginatorState::Paginating { page: 1, total }
                }
                PaginatorState::Paginating { page, total } if page > total.get() => {
                    PaginatorState::Done
                }
                PaginatorState::Paginating { page, total } => {
                    if self.cancel.is_cancelled() {
                        tracing::info!("Cancelled before key {} page {}", key, page);
                        outcome.cancelled = true;
                        PaginatorState::Done
                    } else {
                        tracing::debug!("Crawling key {} page {}/{}", key, page, total);
                        let page_outcome = self.fetch_page(key, page).await;
                        progress.tick();

                        outcome.report.pages_attempted += 1;
                        match page_outcome {
                            PageOutcome::Entries(entries) => outcome.entries.extend(entries),
                            PageOutcome::NoEntries => outcome.report.pages_without_entries += 1,
                            PageOutcome::FetchFailed => outcome.report.pages_failed += 1,
                        }

                        PaginatorState::Paginating {
                            page: page + 1,
                            total,
                        }
                    }
                }
                PaginatorState::Done => break,
            };
        }

        outcome.report.entries = outcome.entries.len() as u64;

        if !outcome.cancelled && !self.min_delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.min_delay) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Inter-key delay after key {} cut short", key);
                }
            }
        }

        outcome
    }
}
