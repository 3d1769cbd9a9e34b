use serde_json::Value;

use super::{DurableStore, MemoryStore};
use crate::error::MemoryError;

/// Write-through composition of a live store and a durable backend.
///
/// Every store lands in both tiers, live first, so the live tier is never
/// behind the durable one. Reads prefer the live tier and only consult the
/// backend on a live miss; the recency window is served entirely from the
/// live tier.
pub struct TieredMemory<M: MemoryStore, B: DurableStore> {
    live: M,
    durable: B,
}

impl<M: MemoryStore, B: DurableStore> TieredMemory<M, B> {
    /// Compose a live store with a durable backend
    pub fn new(live: M, durable: B) -> Self {
        Self { live, durable }
    }

    /// Access the live tier
    pub fn live(&self) -> &M {
        &self.live
    }

    /// Access the durable tier
    pub fn durable(&self) -> &B {
        &self.durable
    }

    /// Split the composition back into its tiers
    pub fn into_parts(self) -> (M, B) {
        (self.live, self.durable)
    }
}

impl<M: MemoryStore, B: DurableStore> MemoryStore for TieredMemory<M, B> {
    fn store(&mut self, key: &str, value: Value) -> Result<(), MemoryError> {
        self.live.store(key, value.clone())?;
        self.durable.save(key, &value)
    }

    fn retrieve(&self, key: &str) -> Result<Option<Value>, MemoryError> {
        match self.live.retrieve(key)? {
            Some(value) => Ok(Some(value)),
            None => self.durable.load(key),
        }
    }

    fn recent(&self, n: usize) -> Result<Vec<Value>, MemoryError> {
        self.live.recent(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapBackend {
        saved: HashMap<String, Value>,
    }

    impl DurableStore for MapBackend {
        fn save(&mut self, key: &str, value: &Value) -> Result<(), MemoryError> {
            self.saved.insert(key.to_string(), value.clone());
            Ok(())
        }

        fn load(&self, key: &str) -> Result<Option<Value>, MemoryError> {
            Ok(self.saved.get(key).cloned())
        }
    }

    struct RefusingBackend;

    impl DurableStore for RefusingBackend {
        fn save(&mut self, key: &str, _value: &Value) -> Result<(), MemoryError> {
            Err(MemoryError::StoreFailed {
                key: key.to_string(),
                reason: "disk full".into(),
            })
        }

        fn load(&self, _key: &str) -> Result<Option<Value>, MemoryError> {
            Ok(None)
        }
    }

    #[test]
    fn store_writes_both_tiers() {
        let mut memory = TieredMemory::new(InMemoryStore::new(), MapBackend::default());
        memory.store("fact", json!("water is wet")).unwrap();

        assert_eq!(
            memory.live().retrieve("fact").unwrap(),
            Some(json!("water is wet"))
        );
        assert_eq!(
            memory.durable().load("fact").unwrap(),
            Some(json!("water is wet"))
        );
    }

    #[test]
    fn retrieve_prefers_live_and_falls_back_to_durable() {
        let mut backend = MapBackend::default();
        backend.save("archived", &json!("from disk")).unwrap();

        let mut memory = TieredMemory::new(InMemoryStore::new(), backend);
        memory.live.store("fresh", json!("from ram")).unwrap();

        assert_eq!(memory.retrieve("fresh").unwrap(), Some(json!("from ram")));
        assert_eq!(
            memory.retrieve("archived").unwrap(),
            Some(json!("from disk"))
        );
        assert_eq!(memory.retrieve("nowhere").unwrap(), None);
    }

    #[test]
    fn into_parts_hands_back_both_tiers_intact() {
        let mut memory = TieredMemory::new(InMemoryStore::new(), MapBackend::default());
        memory.store("fact", json!("split me")).unwrap();

        let (live, durable) = memory.into_parts();
        assert_eq!(live.retrieve("fact").unwrap(), Some(json!("split me")));
        assert_eq!(durable.load("fact").unwrap(), Some(json!("split me")));
    }

    #[test]
    fn durable_failure_surfaces_after_live_write() {
        let mut memory = TieredMemory::new(InMemoryStore::new(), RefusingBackend);

        let err = memory.store("fact", json!("kept live")).unwrap_err();
        assert!(matches!(err, MemoryError::StoreFailed { .. }));
        // the live tier already holds the value
        assert_eq!(
            memory.live().retrieve("fact").unwrap(),
            Some(json!("kept live"))
        );
    }

    #[test]
    fn recency_window_is_served_from_the_live_tier() {
        let mut backend = MapBackend::default();
        backend.save("older", &json!("ignored")).unwrap();

        let mut memory = TieredMemory::new(InMemoryStore::new(), backend);
        memory.store("a", json!(1)).unwrap();
        memory.store("b", json!(2)).unwrap();

        assert_eq!(memory.recent(5).unwrap(), vec![json!(1), json!(2)]);
    }
}
