//! Array-backed binary max-heap with an identifier → slot index.
//!
//! Every swap, push, and pop keeps the position index in sync with the heap
//! array, so an entry can be located by identifier in O(1) and re-ordered in
//! O(log n) after its priority changes.

use std::collections::HashMap;
use std::hash::Hash;

/// A heap slot: identifier plus its current priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry<K, P> {
    id: K,
    priority: P,
}

/// Binary max-heap keyed by identifier.
///
/// Invariants:
/// - `priority[i] >= priority[2i + 1]` and `priority[i] >= priority[2i + 2]`
///   for every in-bounds child.
/// - `index[id] == i` exactly when `entries[i].id == id`.
#[derive(Debug, Clone)]
pub struct IndexedMaxHeap<K, P> {
    entries: Vec<Entry<K, P>>,
    index: HashMap<K, usize>,
}

impl<K, P> Default for IndexedMaxHeap<K, P>
where
    K: Copy + Eq + Hash,
    P: Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, P> IndexedMaxHeap<K, P>
where
    K: Copy + Eq + Hash,
    P: Copy + Ord,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    pub fn priority_of(&self, id: &K) -> Option<P> {
        self.index.get(id).map(|&slot| self.entries[slot].priority)
    }

    /// The maximum entry, without removing it.
    pub fn peek(&self) -> Option<(K, P)> {
        self.entries.first().map(|e| (e.id, e.priority))
    }

    /// Insert `id` at the bottom of the heap and sift it up.
    ///
    /// The caller must ensure `id` is not already present.
    pub fn push(&mut self, id: K, priority: P) {
        debug_assert!(!self.contains(&id), "push of an identifier already in the heap");
        let slot = self.entries.len();
        self.entries.push(Entry { id, priority });
        self.index.insert(id, slot);
        self.sift_up(slot);
    }

    /// Replace the priority of `id` and restore heap order from its slot.
    ///
    /// Returns the previous priority, or `None` (and does nothing) if `id`
    /// is absent.
    pub fn update(&mut self, id: &K, priority: P) -> Option<P> {
        let slot = *self.index.get(id)?;
        let previous = std::mem::replace(&mut self.entries[slot].priority, priority);
        self.repair(slot);
        Some(previous)
    }

    /// Remove and return the maximum entry.
    pub fn pop(&mut self) -> Option<(K, P)> {
        let last = self.entries.len().checked_sub(1)?;
        self.swap_entries(0, last);
        let entry = self.entries.pop()?;
        self.index.remove(&entry.id);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.id, entry.priority))
    }

    /// Remove `id` from anywhere in the heap, returning its priority.
    pub fn remove(&mut self, id: &K) -> Option<P> {
        let slot = *self.index.get(id)?;
        let last = self.entries.len() - 1;
        self.swap_entries(slot, last);
        let entry = self.entries.pop()?;
        self.index.remove(&entry.id);
        // The entry moved into `slot` came from the bottom and may need to
        // travel in either direction.
        if slot < self.entries.len() {
            self.repair(slot);
        }
        Some(entry.priority)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    /// Iterate over `(id, priority)` pairs in heap-array order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = (K, P)> + '_ {
        self.entries.iter().map(|e| (e.id, e.priority))
    }

    /// Verify heap order and index bijection. O(n); meant for tests and
    /// debug assertions.
    pub fn check_invariants(&self) -> bool {
        if self.index.len() != self.entries.len() {
            return false;
        }
        for (slot, entry) in self.entries.iter().enumerate() {
            if self.index.get(&entry.id) != Some(&slot) {
                return false;
            }
            if slot > 0 && self.entries[parent_of(slot)].priority < entry.priority {
                return false;
            }
        }
        true
    }

    /// Restore order for a slot whose priority changed in an unknown
    /// direction.
    fn repair(&mut self, slot: usize) {
        if slot > 0 && self.entries[slot].priority > self.entries[parent_of(slot)].priority {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
    }

    /// Move the entry at `slot` up while it beats its parent.
    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = parent_of(slot);
            if self.entries[slot].priority <= self.entries[parent].priority {
                break;
            }
            self.swap_entries(slot, parent);
            slot = parent;
        }
    }

    /// Move the entry at `slot` down while its larger child beats it.
    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = left_child_of(slot);
            if left >= len {
                break;
            }
            let right = left + 1;

            let mut largest = left;
            if right < len && self.entries[right].priority > self.entries[left].priority {
                largest = right;
            }

            if self.entries[largest].priority <= self.entries[slot].priority {
                break;
            }
            self.swap_entries(slot, largest);
            slot = largest;
        }
    }

    /// Swap two slots and update the index for both occupants.
    fn swap_entries(&mut self, a: usize, b: usize) {
        self.entries.swap(a, b);
        self.index.insert(self.entries[a].id, a);
        self.index.insert(self.entries[b].id, b);
    }
}

#[inline(always)]
fn parent_of(slot: usize) -> usize {
    (slot - 1) / 2
}

#[inline(always)]
fn left_child_of(slot: usize) -> usize {
    2 * slot + 1
}
