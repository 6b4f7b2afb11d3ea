//! Crawl report generation
//!
//! Summarises what a crawl did per index key so skipped or empty pages can
//! be spotted without grepping the logs.

use crate::index::{IndexKey, PageCount};
use chrono::{DateTime, Utc};

/// Outcome counters for one index key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyReport {
    /// The index key
    pub key: IndexKey,

    /// Page count used for pagination
    pub page_count: PageCount,

    /// Pages fetched (equals `page_count` unless cancelled)
    pub pages_attempted: u32,

    /// Pages whose fetch failed
    pub pages_failed: u32,

    /// Pages fetched successfully that held no entry groups
    pub pages_without_entries: u32,

    /// Entries collected for this key
    pub entries: u64,
}

/// Summary of a whole crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Dictionary namespace crawled
    pub namespace: String,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Per-key results in crawl order
    pub keys: Vec<KeyReport>,

    /// True if the crawl stopped before every key was processed
    pub cancelled: bool,

    /// Hash of the config file used, if any
    pub config_hash: Option<String>,
}

impl CrawlReport {
    /// Creates an empty report stamped with the current time
    pub fn new(namespace: impl Into<String>, config_hash: Option<String>) -> Self {
        Self {
            namespace: namespace.into(),
            started_at: Utc::now(),
            finished_at: None,
            keys: Vec::new(),
            cancelled: false,
            config_hash,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Duration of the run in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn total_entries(&self) -> u64 {
        self.keys.iter().map(|k| k.entries).sum()
    }

    pub fn total_pages(&self) -> u64 {
        self.keys.iter().map(|k| u64::from(k.page_count.get())).sum()
    }

    pub fn pages_attempted(&self) -> u64 {
        self.keys.iter().map(|k| u64::from(k.pages_attempted)).sum()
    }

    pub fn pages_failed(&self) -> u64 {
        self.keys.iter().map(|k| u64::from(k.pages_failed)).sum()
    }

    /// Percentage of attempted pages that were fetched successfully
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_attempted();
        if attempted == 0 {
            return 0.0;
        }
        ((attempted - self.pages_failed()) as f64 / attempted as f64) * 100.0
    }
}

/// Prints a report to stdout in a formatted manner
pub fn print_report(report: &CrawlReport) {
    println!("=== Harvest Report ===\n");

    println!("Overview:");
    println!("  Dictionary: {}", report.namespace);
    println!("  Started: {}", report.started_at.to_rfc3339());
    if let Some(finished) = report.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(secs) = report.duration_seconds() {
        println!("  Duration: {}s", secs);
    }
    if let Some(hash) = &report.config_hash {
        println!("  Config hash: {}", hash);
    }
    if report.cancelled {
        println!("  Status: cancelled (partial output)");
    } else {
        println!("  Status: completed");
    }
    println!();

    println!("Keys:");
    for key in &report.keys {
        println!(
            "  {}: {} entries, {}/{} pages, {} failed, {} without entries",
            key.key,
            key.entries,
            key.pages_attempted,
            key.page_count,
            key.pages_failed,
            key.pages_without_entries
        );
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched)",
        report.success_rate(),
        report.pages_attempted() - report.pages_failed(),
        report.pages_attempted()
    );
    println!("Total entries: {}", report.total_entries());
}
