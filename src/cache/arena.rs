//! Entry Arena Module
//!
//! Slot storage for cache entries. Every other structure refers to entries
//! by [`EntryId`] instead of holding references, so the tier lists can link
//! entries both ways without aliasing.

use crate::cache::entry::Entry;

/// Stable handle to an entry slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

// == Entry Arena ==
/// Vector of optional slots plus a free list for slot reuse.
#[derive(Debug)]
pub struct EntryArena<V> {
    slots: Vec<Option<Entry<V>>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<V> EntryArena<V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, entry: Entry<V>) -> EntryId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(entry);
            idx
        } else {
            self.slots.push(Some(entry));
            self.slots.len() - 1
        };
        self.len += 1;
        EntryId(idx)
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Entry<V>> {
        let slot = self.slots.get_mut(id.0)?;
        let entry = slot.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(entry)
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry<V>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry<V>> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &Entry<V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|entry| (EntryId(idx), entry)))
    }
}

impl<V> Default for EntryArena<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::ops::Index<EntryId> for EntryArena<V> {
    type Output = Entry<V>;

    /// Panics on a stale handle: every structure must drop an id in the same
    /// operation that frees its slot.
    fn index(&self, id: EntryId) -> &Entry<V> {
        match self.get(id) {
            Some(entry) => entry,
            None => panic!("stale entry handle {:?}", id),
        }
    }
}

impl<V> std::ops::IndexMut<EntryId> for EntryArena<V> {
    fn index_mut(&mut self, id: EntryId) -> &mut Entry<V> {
        match self.get_mut(id) {
            Some(entry) => entry,
            None => panic!("stale entry handle {:?}", id),
        }
    }
}
