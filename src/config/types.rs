use crate::index::{default_keys, IndexKey};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default site root that namespaces, keys and pages are appended to
pub const DEFAULT_BASE_URL: &str = "https://www.merriam-webster.com/browse";

/// Dictionary namespaces the harvester knows how to browse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dictionary {
    /// The medical dictionary
    Medical,
    /// The standard dictionary
    Dictionary,
}

impl Dictionary {
    /// Returns the namespace segment used in request URLs
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Medical => "medical",
            Self::Dictionary => "dictionary",
        }
    }

    /// Returns the output path used when none is configured
    pub fn default_output_path(&self) -> PathBuf {
        PathBuf::from(format!("dictionary/{}_word_list.tsv", self.namespace()))
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// Fully resolved, immutable crawl configuration
///
/// Built once at startup from an optional config file plus CLI overrides,
/// then shared read-only with the crawler.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which dictionary to harvest
    pub dictionary: Dictionary,

    /// Index keys in crawl order
    pub keys: Vec<IndexKey>,

    pub crawler: CrawlerConfig,
    pub user_agent: UserAgentConfig,
    pub selectors: SelectorConfig,
    pub output: OutputConfig,

    /// SHA-256 of the config file this was loaded from, if any
    pub config_hash: Option<String>,
}

impl Config {
    /// Creates a configuration with defaults for everything but the dictionary
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            keys: default_keys(),
            crawler: CrawlerConfig::default(),
            user_agent: UserAgentConfig::default(),
            selectors: SelectorConfig::default(),
            output: OutputConfig {
                path: dictionary.default_output_path(),
            },
            config_hash: None,
        }
    }

    /// Returns the dictionary namespace used in request URLs
    pub fn namespace(&self) -> &'static str {
        self.dictionary.namespace()
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Site root; requests go to `{base-url}/{namespace}/{key}/{page}`
    pub base_url: String,

    /// Pause after each index key has been paginated (seconds)
    pub min_delay_secs: u64,

    /// Total time allowed for one request (seconds)
    pub request_timeout_secs: u64,

    /// Time allowed to establish a connection (seconds)
    pub connect_timeout_secs: u64,

    /// Emit a progress line every this many pages
    pub progress_interval: u64,
}

impl CrawlerConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_secs(self.min_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            min_delay_secs: 1,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            progress_interval: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    ///
    /// The parenthesised contact block is only added when at least one
    /// contact field is set.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        match (&self.contact_url, &self.contact_email) {
            (Some(url), Some(email)) => format!("{} (+{}; {})", base, url, email),
            (Some(url), None) => format!("{} (+{})", base, url),
            (None, Some(email)) => format!("{} ({})", base, email),
            (None, None) => base,
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "LexiconHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// CSS selectors the HTML extractor uses to find its regions
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    /// Element holding the "page X of Y" text
    pub counter: String,

    /// Region containing a group of entries
    pub entry_group: String,

    /// Element inside a group whose text is one entry
    pub entry_link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            counter: "span.counters".to_string(),
            entry_group: "div.entries".to_string(),
            entry_link: "a".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Path to the word list file
    pub path: PathBuf,
}

/// Optional `[output]` section of a config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub path: Option<PathBuf>,
}

/// On-disk TOML layout; every section is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FileConfig {
    pub dictionary: Option<Dictionary>,

    /// Keys in crawl order, e.g. `"abc0"`
    pub keys: Option<String>,

    pub crawler: CrawlerConfig,
    pub user_agent: UserAgentConfig,
    pub selectors: SelectorConfig,
    pub output: FileOutputConfig,
}

/// Values supplied on the command line; these win over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dictionary: Option<Dictionary>,
    pub output: Option<PathBuf>,
    pub min_delay_secs: Option<u64>,
    pub base_url: Option<String>,
    pub keys: Option<String>,
}
