use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Ordered, duplicate-free list of output column names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSchema {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ColumnSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column unless it is already present. Returns `true` if added.
    pub fn push(&mut self, column: &str) -> bool {
        if self.seen.contains(column) {
            return false;
        }
        self.seen.insert(column.to_string());
        self.order.push(column.to_string());
        true
    }

    pub fn contains(&self, column: &str) -> bool {
        self.seen.contains(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ColumnSchema {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut schema = ColumnSchema::new();
        for column in iter {
            schema.push(column.as_ref());
        }
        schema
    }
}

impl Serialize for ColumnSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.order.iter())
    }
}
