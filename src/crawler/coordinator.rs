//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Discovering the page count of every index key up front
//! - Paginating each key in order with the precomputed count
//! - Streaming each key's entries to the output sink as it completes
//! - Honouring cancellation between pages and keys

use crate::config::Config;
use crate::crawler::paginator::KeyPaginator;
use crate::crawler::{
    HtmlPageParser, HttpFetcher, LogProgress, PageFetcher, PageParser, ProgressReporter,
};
use crate::index::{Entry, IndexKey, PageCount};
use crate::output::{CrawlReport, FileSink, OutputSink};
use crate::HarvestError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Result of a finished (or cancelled) crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Every entry collected, in key, page and document order
    pub entries: Vec<Entry>,

    /// Per-key summary
    pub report: CrawlReport,
}

/// Main crawler coordinator structure
pub struct Coordinator<F, P> {
    config: Arc<Config>,
    fetcher: F,
    parser: P,
    cancel: CancellationToken,
}

impl<F: PageFetcher, P: PageParser> Coordinator<F, P> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawl configuration
    /// * `fetcher` - Retrieves browse pages
    /// * `parser` - Extracts page counts and entries
    pub fn new(config: Config, fetcher: F, parser: P) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            parser,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Returns a handle that stops the crawl when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    fn paginator(&self) -> KeyPaginator<'_, F, P> {
        KeyPaginator::new(
            self.config.namespace(),
            &self.fetcher,
            &self.parser,
            self.config.crawler.min_delay(),
        )
        .with_cancellation(self.cancel.clone())
    }

    /// Determines the page count of every configured key, in order
    ///
    /// Failures default the affected key to one page. Stops early, returning
    /// the keys discovered so far, if cancellation fires.
    pub async fn discover_page_counts(&self) -> Vec<(IndexKey, PageCount)> {
        tracing::info!("Determining the number of pages per key to scrape");

        let paginator = self.paginator();
        let mut counts = Vec::with_capacity(self.config.keys.len());

        for &key in &self.config.keys {
            if self.cancel.is_cancelled() {
                tracing::info!("Cancelled while determining page counts");
                break;
            }
            let count = paginator.discover_page_count(key).await;
            counts.push((key, count));
        }

        counts
    }

    /// Runs the main crawl loop
    ///
    /// 1. Discovers page counts for all keys (the progress total)
    /// 2. Paginates each key with its precomputed count
    /// 3. Appends each key's entries to `sink` as soon as the key is done
    /// 4. Closes `sink` on every exit path
    ///
    /// Page-level failures never surface here; only sink errors do.
    pub async fn run(
        &self,
        sink: &mut dyn OutputSink,
        progress: &dyn ProgressReporter,
    ) -> Result<CrawlOutcome, HarvestError> {
        let result = self.crawl_into(sink, progress).await;
        let closed = sink.close();
        progress.finish();

        let outcome = result?;
        closed?;
        Ok(outcome)
    }

    async fn crawl_into(
        &self,
        sink: &mut dyn OutputSink,
        progress: &dyn ProgressReporter,
    ) -> Result<CrawlOutcome, HarvestError> {
        let mut report = CrawlReport::new(self.config.namespace(), self.config.config_hash.clone());
        let mut entries: Vec<Entry> = Vec::new();

        let counts = self.discover_page_counts().await;
        let total_pages: u64 = counts.iter().map(|(_, count)| u64::from(count.get())).sum();
        report.cancelled = counts.len() < self.config.keys.len();

        tracing::info!("Start scraping by key");
        progress.start(total_pages);

        let paginator = self.paginator();
        for (key, count) in counts {
            if self.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let key_outcome = paginator.run(key, Some(count), progress).await;

            sink.append(&key_outcome.entries)?;
            tracing::info!(
                "Key {}: {} entries from {} pages",
                key,
                key_outcome.entries.len(),
                key_outcome.report.pages_attempted
            );

            entries.extend(key_outcome.entries);
            report.keys.push(key_outcome.report);

            if key_outcome.cancelled {
                report.cancelled = true;
                break;
            }
        }

        report.finish();

        if report.cancelled {
            tracing::warn!(
                "Crawl cancelled after {} of {} keys; {} entries kept",
                report.keys.len(),
                self.config.keys.len(),
                entries.len()
            );
        } else {
            tracing::info!(
                "Crawl completed: {} entries from {} keys",
                entries.len(),
                report.keys.len()
            );
        }

        Ok(CrawlOutcome { entries, report })
    }
}

/// Runs a complete crawl with the HTTP fetcher, HTML parser and file sink
///
/// The output file is created before any request is made, so an unwritable
/// destination fails fast.
///
/// # Example
///
/// ```no_run
/// use lexicon_harvest::config::{load_config, Dictionary, Overrides};
/// use lexicon_harvest::crawler::run_crawl;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let overrides = Overrides {
///     dictionary: Some(Dictionary::Medical),
///     ..Default::default()
/// };
/// let config = load_config(None, overrides)?;
/// let outcome = run_crawl(config, CancellationToken::new()).await?;
/// println!("{} entries", outcome.entries.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    cancel: CancellationToken,
) -> Result<CrawlOutcome, HarvestError> {
    let parser = HtmlPageParser::new(&config.selectors)?;
    let fetcher = HttpFetcher::from_config(&config)?;
    let mut sink = FileSink::create(&config.output.path)?;
    let progress = LogProgress::new(config.crawler.progress_interval);

    tracing::info!(
        "Downloading the `{}` dictionary to {} with {}s delay between keys",
        config.dictionary,
        config.output.path.display(),
        config.crawler.min_delay_secs
    );

    let coordinator = Coordinator::new(config, fetcher, parser).with_cancellation(cancel);
    coordinator.run(&mut sink, &progress).await
}
