//! # Memory Module
//!
//! Agent memory is a key-value store with a recency window. The live store
//! backs `remember`/`recall` on the agent surface and receives every
//! perceived observation; recall-augmented planning reads the recency
//! window back out. A second, durable tier can be layered underneath with
//! [`TieredMemory`] for state that must outlive the live store.
//!
//! ## Core Components
//!
//! - **[MemoryStore]**: Live store contract (store, retrieve, recent, add)
//! - **[InMemoryStore]**: HashMap-backed store preserving insertion order
//! - **[DurableStore]**: Contract for a persistent secondary backend
//! - **[TieredMemory]**: Write-through composition of live + durable tiers

mod in_memory;
mod tiered;

pub use in_memory::InMemoryStore;
pub use tiered::TieredMemory;

use serde_json::Value;

use crate::error::MemoryError;
use crate::plan::Observation;

/// Key under which the most recently perceived observation is recorded.
pub const LAST_OBSERVATION_KEY: &str = "last_observation";

/// Live memory store attached to an agent.
///
/// Writes are upserts; re-storing an existing key updates its value but
/// keeps the key's original recency slot, so [`MemoryStore::recent`] tracks
/// first insertion order rather than update order.
pub trait MemoryStore: Send {
    /// Store a value under a key, replacing any previous value
    fn store(&mut self, key: &str, value: Value) -> Result<(), MemoryError>;

    /// Fetch the value stored under a key
    fn retrieve(&self, key: &str) -> Result<Option<Value>, MemoryError>;

    /// The `n` most recently inserted values, oldest first within the
    /// window
    fn recent(&self, n: usize) -> Result<Vec<Value>, MemoryError>;

    /// Record a perceived observation.
    ///
    /// The default keeps a single rolling slot: the observation text is
    /// stored under [`LAST_OBSERVATION_KEY`]. Stores that index
    /// observations differently can override this.
    fn add(&mut self, observation: &Observation) -> Result<(), MemoryError> {
        self.store(LAST_OBSERVATION_KEY, Value::String(observation.text.clone()))
    }
}

/// Persistent secondary backend for [`TieredMemory`].
///
/// Deliberately smaller than [`MemoryStore`]: the durable tier only ever
/// sees keyed saves and loads, never recency queries.
pub trait DurableStore: Send {
    /// Persist a value under a key
    fn save(&mut self, key: &str, value: &Value) -> Result<(), MemoryError>;

    /// Load a persisted value
    fn load(&self, key: &str) -> Result<Option<Value>, MemoryError>;
}
