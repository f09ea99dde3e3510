//! LRU List Module
//!
//! Per-tier recency list threaded through the entry arena.

use crate::cache::arena::{EntryArena, EntryId};

// == LRU List ==
/// Doubly linked list of entries that share one priority.
///
/// - Head = most recently used
/// - Tail = least recently used
///
/// Links live in the entries themselves (`prev`/`next`), so the list only
/// stores its two ends and a length. Every operation is O(1).
#[derive(Debug, Default)]
pub struct LruList {
    head: Option<EntryId>,
    tail: Option<EntryId>,
    len: usize,
}

impl LruList {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Links a detached entry at the most recently used end.
    pub fn push_front<V>(&mut self, arena: &mut EntryArena<V>, id: EntryId) {
        let old_head = self.head;
        {
            let entry = &mut arena[id];
            debug_assert!(entry.prev.is_none() && entry.next.is_none());
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(head) => arena[head].prev = Some(id),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
    }

    // == Remove ==
    /// Unlinks an entry from this list and clears its links.
    pub fn remove<V>(&mut self, arena: &mut EntryArena<V>, id: EntryId) {
        assert!(self.len > 0, "unlink from an empty tier list");
        let (prev, next) = {
            let entry = &arena[id];
            (entry.prev, entry.next)
        };

        match prev {
            Some(prev) => arena[prev].next = next,
            None => {
                debug_assert_eq!(self.head, Some(id));
                self.head = next;
            }
        }
        match next {
            Some(next) => arena[next].prev = prev,
            None => {
                debug_assert_eq!(self.tail, Some(id));
                self.tail = prev;
            }
        }

        let entry = &mut arena[id];
        entry.prev = None;
        entry.next = None;
        self.len -= 1;
    }

    // == Touch ==
    /// Marks an entry as recently used (moves it to the front).
    pub fn touch<V>(&mut self, arena: &mut EntryArena<V>, id: EntryId) {
        if self.head == Some(id) {
            return;
        }
        self.remove(arena, id);
        self.push_front(arena, id);
    }

    // == Peek Oldest ==
    /// Returns the least recently used entry without removing it.
    pub fn peek_oldest(&self) -> Option<EntryId> {
        self.tail
    }

    #[allow(dead_code)]
    pub fn peek_newest(&self) -> Option<EntryId> {
        self.head
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks the list from most to least recently used.
    pub fn iter<'a, V>(&self, arena: &'a EntryArena<V>) -> impl Iterator<Item = EntryId> + 'a {
        std::iter::successors(self.head, move |&id| arena[id].next)
    }

    #[cfg(test)]
    pub fn validate<V>(&self, arena: &EntryArena<V>) {
        let mut prev = None;
        let mut count = 0usize;
        for id in self.iter(arena) {
            assert_eq!(arena[id].prev, prev, "broken back link");
            prev = Some(id);
            count += 1;
            assert!(count <= self.len, "list longer than its length");
        }
        assert_eq!(self.tail, prev);
        assert_eq!(count, self.len);
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::Entry;

    fn setup(keys: &[&str]) -> (EntryArena<()>, LruList, Vec<EntryId>) {
        let mut arena = EntryArena::new();
        let mut lru = LruList::new();
        let ids = keys
            .iter()
            .map(|k| {
                let id = arena.insert(Entry::new(k.to_string(), (), 0, 0));
                lru.push_front(&mut arena, id);
                id
            })
            .collect();
        (arena, lru, ids)
    }

    fn order(arena: &EntryArena<()>, lru: &LruList) -> Vec<String> {
        lru.iter(arena).map(|id| arena[id].key.clone()).collect()
    }

    #[test]
    fn test_lru_new() {
        let lru = LruList::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_lru_push_front_order() {
        let (arena, lru, ids) = setup(&["key1", "key2", "key3"]);

        assert_eq!(lru.len(), 3);
        // key1 is oldest (added first)
        assert_eq!(lru.peek_oldest(), Some(ids[0]));
        assert_eq!(lru.peek_newest(), Some(ids[2]));
        assert_eq!(order(&arena, &lru), vec!["key3", "key2", "key1"]);
        lru.validate(&arena);
    }

    #[test]
    fn test_lru_touch_moves_to_front() {
        let (mut arena, mut lru, ids) = setup(&["a", "b", "c"]);

        lru.touch(&mut arena, ids[0]);

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some(ids[1]));
        assert_eq!(order(&arena, &lru), vec!["a", "c", "b"]);
        lru.validate(&arena);
    }

    #[test]
    fn test_lru_touch_head_is_noop() {
        let (mut arena, mut lru, ids) = setup(&["a", "b"]);
        lru.touch(&mut arena, ids[1]);
        assert_eq!(order(&arena, &lru), vec!["b", "a"]);
        lru.validate(&arena);
    }

    #[test]
    fn test_lru_remove_middle_head_tail() {
        let (mut arena, mut lru, ids) = setup(&["a", "b", "c", "d"]);

        lru.remove(&mut arena, ids[1]);
        assert_eq!(order(&arena, &lru), vec!["d", "c", "a"]);
        lru.validate(&arena);

        lru.remove(&mut arena, ids[3]);
        assert_eq!(order(&arena, &lru), vec!["c", "a"]);
        lru.validate(&arena);

        lru.remove(&mut arena, ids[0]);
        assert_eq!(order(&arena, &lru), vec!["c"]);
        assert_eq!(lru.peek_oldest(), Some(ids[2]));
        lru.validate(&arena);

        lru.remove(&mut arena, ids[2]);
        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
        assert_eq!(lru.peek_newest(), None);
    }

    #[test]
    fn test_lru_removed_entry_links_cleared() {
        let (mut arena, mut lru, ids) = setup(&["a", "b", "c"]);
        lru.remove(&mut arena, ids[1]);
        assert!(arena[ids[1]].prev.is_none());
        assert!(arena[ids[1]].next.is_none());
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let (mut arena, mut lru, ids) = setup(&["a", "b", "c"]);

        // Access in a different order: a, c, b
        lru.touch(&mut arena, ids[0]);
        lru.touch(&mut arena, ids[2]);
        lru.touch(&mut arena, ids[1]);

        // front=[b, c, a]=back
        assert_eq!(order(&arena, &lru), vec!["b", "c", "a"]);
        assert_eq!(lru.peek_oldest(), Some(ids[0]));
        lru.validate(&arena);
    }
}
