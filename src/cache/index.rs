//! Key Index Module
//!
//! Canonical existence check: a key is live iff it is present here.

use std::collections::HashMap;

use crate::cache::arena::EntryId;

// == Key Index ==
/// Maps cache keys to their arena handles.
#[derive(Debug, Default)]
pub struct KeyIndex {
    map: HashMap<String, EntryId>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn lookup(&self, key: &str) -> Option<EntryId> {
        self.map.get(key).copied()
    }

    /// Registers a new key. Callers check for presence first.
    pub fn insert(&mut self, key: String, id: EntryId) {
        let previous = self.map.insert(key, id);
        debug_assert!(previous.is_none(), "key index already held this key");
    }

    /// Removes a key; absent keys are ignored.
    pub fn remove(&mut self, key: &str) -> Option<EntryId> {
        self.map.remove(key)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.map.keys()
    }
}
