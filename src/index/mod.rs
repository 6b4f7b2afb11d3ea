//! Index module for Lexicon-Harvest
//!
//! This module defines the values that address the dictionary's browse
//! index: the single-character index keys, the page requests built from
//! them and the page counts discovered for each key.

mod key;
mod request;

pub use key::{default_keys, parse_keys, IndexKey};
pub use request::{PageCount, PageRequest};

/// A single extracted headword
///
/// Entries are kept exactly as extracted: no trimming of inner text,
/// no deduplication and no case folding.
pub type Entry = String;
