//! Priority Tier Table Module
//!
//! Groups live entries by priority. Each priority with at least one entry
//! owns an [`LruList`]; the set of such priorities is kept ordered so the
//! lowest one can be found without scanning.
//!
//! Lower numeric priority is less important and is evicted first.

use std::collections::{BTreeSet, HashMap};

use crate::cache::arena::{EntryArena, EntryId};
use crate::cache::lru::LruList;

// == Priority Tiers ==
#[derive(Debug, Default)]
pub struct PriorityTiers {
    /// Recency list per active priority
    tiers: HashMap<i64, LruList>,
    /// Active priorities, ordered
    active: BTreeSet<i64>,
}

impl PriorityTiers {
    pub fn new() -> Self {
        Self {
            tiers: HashMap::new(),
            active: BTreeSet::new(),
        }
    }

    // == Touch ==
    /// Moves an entry to the front of its own tier. Membership is unchanged.
    pub fn touch<V>(&mut self, arena: &mut EntryArena<V>, id: EntryId) {
        let tier = self.linked_tier(arena, id);
        self.tier_mut(tier).touch(arena, id);
    }

    // == Upsert ==
    /// Places an entry at the front of the tier for `priority`.
    ///
    /// A linked entry is first unlinked from its current tier, which is
    /// dropped if that leaves it empty. The target tier is created on demand.
    /// Only creating or dropping a tier touches the ordered priority set.
    pub fn upsert<V>(&mut self, arena: &mut EntryArena<V>, id: EntryId, priority: i64) {
        if arena[id].tier.is_some() {
            self.remove(arena, id);
        }

        let tier = self.tiers.entry(priority).or_insert_with(|| {
            self.active.insert(priority);
            LruList::new()
        });
        tier.push_front(arena, id);

        let entry = &mut arena[id];
        entry.priority = priority;
        entry.tier = Some(priority);
    }

    // == Remove ==
    /// Unlinks an entry from its tier, dropping the tier if it empties.
    pub fn remove<V>(&mut self, arena: &mut EntryArena<V>, id: EntryId) {
        let priority = self.linked_tier(arena, id);
        let tier = self.tier_mut(priority);
        tier.remove(arena, id);
        if tier.is_empty() {
            self.tiers.remove(&priority);
            self.active.remove(&priority);
        }
        arena[id].tier = None;
    }

    // == Lowest Tier ==
    /// Lowest active priority, if any entry is linked.
    pub fn lowest_tier(&self) -> Option<i64> {
        self.active.first().copied()
    }

    // == Victim ==
    /// Least recently used entry of the lowest active tier.
    pub fn victim_of_lowest_tier(&self) -> Option<EntryId> {
        let lowest = self.lowest_tier()?;
        self.tiers.get(&lowest).and_then(LruList::peek_oldest)
    }

    /// Number of entries linked into the tier for `priority`.
    pub fn tier_len(&self, priority: i64) -> usize {
        self.tiers.get(&priority).map_or(0, LruList::len)
    }

    /// Number of active tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Entries of one tier, most recently used first.
    #[allow(dead_code)]
    pub fn tier_entries<V>(&self, arena: &EntryArena<V>, priority: i64) -> Vec<EntryId> {
        self.tiers
            .get(&priority)
            .map(|tier| tier.iter(arena).collect())
            .unwrap_or_default()
    }

    fn linked_tier<V>(&self, arena: &EntryArena<V>, id: EntryId) -> i64 {
        match arena[id].tier {
            Some(tier) => tier,
            None => panic!("entry {:?} is not linked into any tier", id),
        }
    }

    fn tier_mut(&mut self, priority: i64) -> &mut LruList {
        match self.tiers.get_mut(&priority) {
            Some(tier) => tier,
            None => panic!("no tier record for priority {}", priority),
        }
    }

    /// Checks tier/priority-set agreement and every list's links.
    #[cfg(test)]
    pub fn validate<V>(&self, arena: &EntryArena<V>) -> usize {
        assert_eq!(self.tiers.len(), self.active.len());
        let mut linked = 0;
        for (&priority, tier) in &self.tiers {
            assert!(self.active.contains(&priority));
            assert!(!tier.is_empty(), "empty tier {} kept alive", priority);
            tier.validate(arena);
            for id in tier.iter(arena) {
                assert_eq!(arena[id].tier, Some(priority));
                assert_eq!(arena[id].priority, priority);
            }
            linked += tier.len();
        }
        linked
    }
}
