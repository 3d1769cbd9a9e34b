use std::collections::HashMap;

use serde_json::Value;

use super::MemoryStore;
use crate::error::MemoryError;

/// HashMap-backed live store that remembers insertion order.
///
/// The order list holds each key once, at the position of its first
/// insertion, which gives the recency window its slot-keeping semantics.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: HashMap<String, Value>,
    order: Vec<String>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MemoryStore for InMemoryStore {
    fn store(&mut self, key: &str, value: Value) -> Result<(), MemoryError> {
        if !self.entries.contains_key(key) {
            self.order.push(key.to_string());
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Value>, MemoryError> {
        Ok(self.entries.get(key).cloned())
    }

    fn recent(&self, n: usize) -> Result<Vec<Value>, MemoryError> {
        let start = self.order.len().saturating_sub(n);
        Ok(self.order[start..]
            .iter()
            .filter_map(|key| self.entries.get(key).cloned())
            .collect())
    }
}
