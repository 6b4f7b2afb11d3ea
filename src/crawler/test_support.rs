//! In-memory fetcher used by the crawler's unit tests

use crate::crawler::{FetchResult, PageFetcher};
use crate::index::PageRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves canned responses keyed by `(key, page)` and records every request
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: HashMap<(char, u32), FetchResult>,
    requests: Mutex<Vec<PageRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` with status 200 for the given page
    pub fn page(mut self, key: char, page: u32, body: &str) -> Self {
        self.pages.insert(
            (key, page),
            FetchResult::Success {
                body: body.to_string(),
            },
        );
        self
    }

    /// Serves an HTTP error for the given page
    pub fn status(mut self, key: char, page: u32, status_code: u16) -> Self {
        self.pages
            .insert((key, page), FetchResult::HttpError { status_code });
        self
    }

    /// All requests received, in order
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Pages requested for one key, in order
    pub fn pages_requested(&self, key: char) -> Vec<u32> {
        self.requests()
            .into_iter()
            .filter(|r| r.key.as_char() == key)
            .map(|r| r.page)
            .collect()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, request: &PageRequest) -> FetchResult {
        self.requests.lock().unwrap().push(request.clone());
        self.pages
            .get(&(request.key.as_char(), request.page))
            .cloned()
            // Anything unscripted behaves like a missing page
            .unwrap_or(FetchResult::HttpError { status_code: 404 })
    }
}

/// Builds a browse page with an optional counter and one entry group per slice
pub fn browse_page(counter: Option<&str>, groups: &[&[&str]]) -> String {
    let mut html = String::from("<html><body>");
    if let Some(counter) = counter {
        html.push_str(&format!(r#"<span class="counters">{}</span>"#, counter));
    }
    for group in groups {
        html.push_str(r#"<div class="entries"><ul>"#);
        for word in *group {
            html.push_str(&format!(r#"<li><a href="/w/{0}">{0}</a></li>"#, word));
        }
        html.push_str("</ul></div>");
    }
    html.push_str("</body></html>");
    html
}
