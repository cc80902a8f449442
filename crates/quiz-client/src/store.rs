/// Key-value persistence for client state, with graceful degradation.
///
/// The browser build keeps this in `localStorage`; tests and tooling use
/// [`MemoryStore`]. Stored data that cannot be parsed is treated as absent and
/// logged, never surfaced as an error.
use std::collections::{BTreeSet, HashMap};

use tracing::warn;

/// Storage key holding the JSON array of flagged question ids.
pub const FLAGGED_KEY: &str = "flaggedQuestions";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. Returns `true` if successful.
    fn set(&mut self, key: &str, value: &str) -> bool;

    /// Remove a single key. Returns `true` if the key existed.
    fn remove(&mut self, key: &str) -> bool;

    fn clear(&mut self);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.entries.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The flagged-id set on top of a [`KeyValueStore`].
#[derive(Debug, Default, Clone)]
pub struct FlagStore<S> {
    store: S,
}

impl<S: KeyValueStore> FlagStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Read the persisted set. Missing or corrupt data yields an empty set.
    pub fn load(&self) -> BTreeSet<String> {
        let Some(raw) = self.store.get(FLAGGED_KEY) else {
            return BTreeSet::new();
        };
        serde_json::from_str::<Vec<String>>(&raw)
            .inspect_err(|e| warn!(error = %e, key = FLAGGED_KEY, "stored flags unreadable, starting empty"))
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn save(&mut self, flagged: &BTreeSet<String>) -> bool {
        let ids: Vec<&String> = flagged.iter().collect();
        let Ok(raw) = serde_json::to_string(&ids) else {
            return false;
        };
        self.store.set(FLAGGED_KEY, &raw)
    }

    pub fn clear(&mut self) -> bool {
        self.store.remove(FLAGGED_KEY)
    }
}
