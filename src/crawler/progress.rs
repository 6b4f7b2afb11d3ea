//! Progress reporting for a crawl
//!
//! The crawler announces the total number of pages once the page counts
//! are known, then ticks once per page attempted, successful or not.
//! Reporters only observe; they never influence control flow.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Receives page-processed ticks against a precomputed total
pub trait ProgressReporter: Send + Sync {
    /// Called once before pagination starts
    fn start(&self, total_pages: u64);

    /// Called once per page attempted
    fn tick(&self);

    /// Called when the crawl ends, whether complete or cancelled
    fn finish(&self);
}

/// Discards all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn start(&self, _total_pages: u64) {}
    fn tick(&self) {}
    fn finish(&self) {}
}

/// Logs progress through `tracing` every `interval` pages
#[derive(Debug)]
pub struct LogProgress {
    interval: u64,
    total: AtomicU64,
    done: AtomicU64,
    started: Mutex<Option<Instant>>,
}

impl LogProgress {
    /// Creates a reporter that logs every `interval` ticks (at least 1)
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            total: AtomicU64::new(0),
            done: AtomicU64::new(0),
            started: Mutex::new(None),
        }
    }

    /// Pages ticked so far
    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    fn rate(&self, done: u64) -> f64 {
        let started = self.started.lock().ok().and_then(|guard| *guard);
        match started {
            Some(instant) => {
                let secs = instant.elapsed().as_secs_f64();
                if secs > 0.0 {
                    done as f64 / secs
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }
}

impl ProgressReporter for LogProgress {
    fn start(&self, total_pages: u64) {
        self.total.store(total_pages, Ordering::Relaxed);
        self.done.store(0, Ordering::Relaxed);
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        tracing::info!("Crawling {} pages in total", total_pages);
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.interval == 0 {
            let total = self.total.load(Ordering::Relaxed);
            tracing::info!(
                "Progress: {}/{} pages, {:.2} pages/sec",
                done,
                total,
                self.rate(done)
            );
        }
    }

    fn finish(&self) {
        let done = self.done();
        let total = self.total.load(Ordering::Relaxed);
        tracing::info!(
            "Progress: {}/{} pages, {:.2} pages/sec (finished)",
            done,
            total,
            self.rate(done)
        );
    }
}
