//! Page parser for extracting headwords and pagination
//!
//! This module turns the raw HTML of one browse page into:
//! - The total page count advertised by the pagination widget
//!   ("page X of Y")
//! - The ordered list of entries found in the page's entry groups
//!
//! Both extractions report failures as [`ParseFailure`] values. Callers
//! decide the fallback (one page, zero entries); nothing here aborts a crawl.

use crate::config::SelectorConfig;
use crate::index::{Entry, PageCount};
use crate::{ConfigError, ParseFailure};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Captures the total in "page 1 of 12". The group may match empty so a
/// truncated indicator is reported as malformed rather than missing.
static PAGE_OF_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bof\b\s*([0-9]*)").expect("hardcoded regex pattern is valid")
});

/// Extracts entries and page counts from raw page content
///
/// Implementations must be pure: parsing the same content twice yields the
/// same result.
pub trait PageParser: Send + Sync {
    /// Reads the total number of pages from the pagination indicator
    fn extract_page_count(&self, content: &str) -> Result<PageCount, ParseFailure>;

    /// Collects every entry on the page, in document order
    fn extract_entries(&self, content: &str) -> Result<Vec<Entry>, ParseFailure>;
}

/// HTML extractor driven by CSS selectors
///
/// # Example
///
/// ```
/// use lexicon_harvest::crawler::{HtmlPageParser, PageParser};
///
/// let parser = HtmlPageParser::default();
/// let html = r#"<span class="counters">page 1 of 3</span>
///               <div class="entries"><a href="/w/apple">apple</a></div>"#;
///
/// assert_eq!(parser.extract_page_count(html).unwrap().get(), 3);
/// assert_eq!(parser.extract_entries(html).unwrap(), vec!["apple".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct HtmlPageParser {
    counter: Selector,
    entry_group: Selector,
    entry_link: Selector,
}

impl HtmlPageParser {
    /// Compiles the configured selectors
    pub fn new(selectors: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            counter: create_selector(&selectors.counter)?,
            entry_group: create_selector(&selectors.entry_group)?,
            entry_link: create_selector(&selectors.entry_link)?,
        })
    }
}

impl Default for HtmlPageParser {
    fn default() -> Self {
        // The default selectors are covered by tests
        Self::new(&SelectorConfig::default()).expect("default selectors are valid")
    }
}

impl PageParser for HtmlPageParser {
    fn extract_page_count(&self, content: &str) -> Result<PageCount, ParseFailure> {
        if content.trim().is_empty() {
            return Err(ParseFailure::EmptyContent);
        }

        let document = Html::parse_document(content);
        let counter_text = document
            .select(&self.counter)
            .next()
            .map(|element| element.text().collect::<String>())
            .ok_or(ParseFailure::MissingIndicator)?;

        parse_page_indicator(&counter_text)
    }

    fn extract_entries(&self, content: &str) -> Result<Vec<Entry>, ParseFailure> {
        if content.trim().is_empty() {
            return Err(ParseFailure::EmptyContent);
        }

        let document = Html::parse_document(content);
        let mut groups = document.select(&self.entry_group).peekable();
        if groups.peek().is_none() {
            return Err(ParseFailure::NoEntryGroups);
        }

        let entries = groups
            .flat_map(|group| group.select(&self.entry_link))
            .map(|link| normalize_link_text(link.text()))
            .filter(|text| !text.is_empty())
            .collect();

        Ok(entries)
    }
}

/// Parses the total out of an indicator such as "page 1 of 12"
///
/// The last "of N" in the text wins. An empty capture, a zero or a number
/// too large for a page count are all reported as malformed.
pub fn parse_page_indicator(text: &str) -> Result<PageCount, ParseFailure> {
    let captures = PAGE_OF_REGEX
        .captures_iter(text)
        .last()
        .ok_or(ParseFailure::MissingIndicator)?;

    let digits = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    digits
        .parse::<u32>()
        .ok()
        .and_then(PageCount::new)
        .ok_or_else(|| ParseFailure::MalformedCount(text.trim().to_string()))
}

/// Joins a link's text nodes and collapses every whitespace run, line
/// breaks included, to a single space
fn normalize_link_text<'a>(text: impl Iterator<Item = &'a str>) -> Entry {
    let joined: String = text.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[inline]
fn create_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|_| ConfigError::InvalidSelector(selector.to_string()))
}
