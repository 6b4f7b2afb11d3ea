/// Index key definitions
///
/// An index key is the single-character bucket the dictionary uses to
/// partition its headwords alphabetically.
use crate::{ConfigError, ConfigResult};
use std::fmt;

/// A single-character browse bucket (`a`..=`z` or the numeric bucket `0`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexKey(char);

impl IndexKey {
    /// Creates a key from a character
    ///
    /// Only lowercase ASCII letters and ASCII digits are valid keys.
    pub fn new(c: char) -> ConfigResult<Self> {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            Ok(Self(c))
        } else {
            Err(ConfigError::InvalidKey(format!(
                "'{}' is not a lowercase ASCII letter or digit",
                c
            )))
        }
    }

    /// Returns the key as a character
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for IndexKey {
    type Error = ConfigError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::new(c)
    }
}

/// Returns the full key set in crawl order: `a` through `z`, then `0`
pub fn default_keys() -> Vec<IndexKey> {
    ('a'..='z').chain(std::iter::once('0')).map(IndexKey).collect()
}

/// Parses a key list such as `"abc0"` into ordered keys
///
/// The order of the input is the crawl order. Empty input and repeated
/// keys are rejected.
pub fn parse_keys(input: &str) -> ConfigResult<Vec<IndexKey>> {
    let mut keys: Vec<IndexKey> = Vec::new();

    for c in input.chars().filter(|c| !c.is_whitespace() && *c != ',') {
        let key = IndexKey::new(c)?;
        if keys.contains(&key) {
            return Err(ConfigError::InvalidKey(format!("duplicate key '{}'", key)));
        }
        keys.push(key);
    }

    if keys.is_empty() {
        return Err(ConfigError::InvalidKey("key list cannot be empty".to_string()));
    }

    Ok(keys)
}
