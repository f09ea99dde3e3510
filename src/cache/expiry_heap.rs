//! Expiry Heap Module
//!
//! Array-backed min-heap of entry handles ordered by `expire_at`.
//!
//! Each entry stores its own heap slot, rewritten on every swap, which lets
//! the heap remove or re-key an arbitrary entry in O(log N) instead of
//! searching for it first.

use crate::cache::arena::{EntryArena, EntryId};
use crate::cache::entry::Timestamp;

/// Slot value for entries that are not in the heap.
const DETACHED: usize = usize::MAX;

// == Expiry Heap ==
#[derive(Debug, Default)]
pub struct ExpiryHeap {
    slots: Vec<EntryId>,
}

impl ExpiryHeap {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    // == Insert ==
    /// Pushes `id` and sifts it up. Returns its final slot, which is also
    /// written to the entry.
    pub fn insert<V>(&mut self, arena: &mut EntryArena<V>, id: EntryId) -> usize {
        let slot = self.slots.len();
        self.slots.push(id);
        arena[id].heap_slot = slot;
        self.sift_up(arena, slot)
    }

    // == Peek Min ==
    /// Entry with the earliest expiration time.
    pub fn peek_min(&self) -> Option<EntryId> {
        self.slots.first().copied()
    }

    // == Remove At ==
    /// Removes the entry stored at `slot`, which need not be the minimum.
    ///
    /// The last element is moved into the hole and sifted in whichever
    /// direction restores heap order.
    ///
    /// # Panics
    /// If `slot` is out of range. A stale slot means the structures went out
    /// of sync, which is a bug in the caller.
    pub fn remove_at<V>(&mut self, arena: &mut EntryArena<V>, slot: usize) -> EntryId {
        assert!(
            slot < self.slots.len(),
            "expiry heap slot {} out of range (len {})",
            slot,
            self.slots.len()
        );

        let last = self.slots.len() - 1;
        self.swap(arena, slot, last);
        let removed = match self.slots.pop() {
            Some(id) => id,
            None => unreachable!("heap was checked to be non-empty"),
        };
        arena[removed].heap_slot = DETACHED;

        if slot < self.slots.len() {
            self.restore(arena, slot);
        }
        removed
    }

    // == Update Expiry ==
    /// Re-keys `id` in place and re-sifts it from its current slot.
    pub fn update_expiry<V>(
        &mut self,
        arena: &mut EntryArena<V>,
        id: EntryId,
        expire_at: Timestamp,
    ) {
        let slot = arena[id].heap_slot;
        assert_eq!(
            self.slots.get(slot),
            Some(&id),
            "entry back-reference does not match its heap slot"
        );
        arena[id].expire_at = expire_at;
        self.restore(arena, slot);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn restore<V>(&mut self, arena: &mut EntryArena<V>, slot: usize) {
        let slot = self.sift_up(arena, slot);
        self.sift_down(arena, slot);
    }

    fn sift_up<V>(&mut self, arena: &mut EntryArena<V>, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if self.expire_at(arena, slot) >= self.expire_at(arena, parent) {
                break;
            }
            self.swap(arena, slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down<V>(&mut self, arena: &mut EntryArena<V>, mut slot: usize) -> usize {
        let len = self.slots.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < len && self.expire_at(arena, left) < self.expire_at(arena, smallest) {
                smallest = left;
            }
            if right < len && self.expire_at(arena, right) < self.expire_at(arena, smallest) {
                smallest = right;
            }
            if smallest == slot {
                return slot;
            }
            self.swap(arena, slot, smallest);
            slot = smallest;
        }
    }

    fn swap<V>(&mut self, arena: &mut EntryArena<V>, a: usize, b: usize) {
        self.slots.swap(a, b);
        arena[self.slots[a]].heap_slot = a;
        arena[self.slots[b]].heap_slot = b;
    }

    fn expire_at<V>(&self, arena: &EntryArena<V>, slot: usize) -> Timestamp {
        arena[self.slots[slot]].expire_at
    }

    /// Checks heap order and every back-reference.
    #[cfg(test)]
    pub fn validate<V>(&self, arena: &EntryArena<V>) {
        for (slot, &id) in self.slots.iter().enumerate() {
            assert_eq!(arena[id].heap_slot, slot, "stale heap back-reference");
            if slot > 0 {
                let parent = (slot - 1) / 2;
                assert!(
                    self.expire_at(arena, parent) <= self.expire_at(arena, slot),
                    "heap order violated at slot {}",
                    slot
                );
            }
        }
    }
}
