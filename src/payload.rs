//! Payload key-value extraction
//!
//! Audit payloads are scanned as plain text for `"key":"value"` spans rather
//! than parsed as JSON. Parsing runs in two stages: [`tokenize`] yields each
//! matched span left to right without overlap, and [`extract_pairs`] folds the
//! spans into a [`PayloadPairs`] map where a repeated key keeps its first
//! position but takes its last value.
//!
//! Keys and values are runs of non-quote characters. An escaped quote inside
//! a value (`\"`) ends the value early, so such pairs come out truncated or
//! are skipped entirely.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static PAIR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]+)":"([^"]+)""#).unwrap()
});

/// Iterate over every `"key":"value"` span in `payload`
pub fn tokenize(payload: &str) -> impl Iterator<Item = (&str, &str)> {
    PAIR_REGEX.captures_iter(payload).filter_map(|caps| {
        let key = caps.get(1)?.as_str();
        let value = caps.get(2)?.as_str();
        Some((key, value))
    })
}

/// Extract the key-value pairs of one payload
pub fn extract_pairs(payload: &str) -> PayloadPairs {
    let mut pairs = PayloadPairs::new();
    for (key, value) in tokenize(payload) {
        pairs.insert(key, value);
    }
    pairs
}

/// Ordered key-value pairs taken from a single payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadPairs {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PayloadPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair, overwriting the value of an existing key in place
    pub fn insert(&mut self, key: &str, value: &str) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 = value.to_string(),
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value.to_string()));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    /// Keys in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for PayloadPairs {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
