use super::IndexKey;
use std::fmt;
use std::num::NonZeroU32;

/// Number of result pages advertised for one index key
///
/// Always at least one. When the count cannot be determined the crawl
/// treats the key as having exactly one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageCount(NonZeroU32);

impl PageCount {
    /// The fallback used when a page count cannot be determined
    pub const ONE: PageCount = PageCount(NonZeroU32::MIN);

    /// Creates a page count, returning `None` for zero
    pub fn new(count: u32) -> Option<Self> {
        NonZeroU32::new(count).map(Self)
    }

    /// Returns the count as a plain integer
    pub fn get(&self) -> u32 {
        self.0.get()
    }

    /// Iterates the page numbers `1..=count` in crawl order
    pub fn pages(&self) -> impl Iterator<Item = u32> {
        1..=self.0.get()
    }
}

impl Default for PageCount {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for PageCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One page of one index key in one dictionary namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// Dictionary namespace (e.g. `medical`)
    pub namespace: String,

    /// The index key being browsed
    pub key: IndexKey,

    /// One-based page number
    pub page: u32,
}

impl PageRequest {
    /// Creates a new page request
    pub fn new(namespace: impl Into<String>, key: IndexKey, page: u32) -> Self {
        Self {
            namespace: namespace.into(),
            key,
            page,
        }
    }

    /// Renders the request URL as `{base}/{namespace}/{key}/{page}`
    ///
    /// Trailing slashes on `base_url` are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use lexicon_harvest::index::{IndexKey, PageRequest};
    ///
    /// let key = IndexKey::new('a').unwrap();
    /// let request = PageRequest::new("medical", key, 3);
    /// assert_eq!(
    ///     request.url("https://example.com/browse/"),
    ///     "https://example.com/browse/medical/a/3"
    /// );
    /// ```
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.namespace,
            self.key,
            self.page
        )
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "namespace={} key={} page={}",
            self.namespace, self.key, self.page
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> IndexKey {
        IndexKey::new(c).unwrap()
    }

    #[test]
    fn test_page_count_rejects_zero() {
        assert!(PageCount::new(0).is_none());
        assert_eq!(PageCount::new(7).unwrap().get(), 7);
        assert_eq!(PageCount::default(), PageCount::ONE);
        assert_eq!(PageCount::ONE.get(), 1);
    }

    #[test]
    fn test_pages_are_contiguous_from_one() {
        let pages: Vec<u32> = PageCount::new(4).unwrap().pages().collect();
        assert_eq!(pages, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_url_template() {
        let request = PageRequest::new("dictionary", key('0'), 12);
        assert_eq!(
            request.url("https://www.merriam-webster.com/browse"),
            "https://www.merriam-webster.com/browse/dictionary/0/12"
        );
    }

    #[test]
    fn test_url_template_trims_trailing_slashes() {
        let request = PageRequest::new("medical", key('b'), 1);
        assert_eq!(
            request.url("http://127.0.0.1:8080//"),
            "http://127.0.0.1:8080/medical/b/1"
        );
    }

    #[test]
    fn test_display_carries_context() {
        let request = PageRequest::new("medical", key('c'), 2);
        assert_eq!(request.to_string(), "namespace=medical key=c page=2");
    }
}
