//! Evaluation Cache
//!
//! Memoized node values, one slot per declared node. A filled slot means
//! "computed", an empty slot means "uncomputed". There is no eviction policy
//! besides explicit invalidation.

use smallvec::SmallVec;

use super::node::NodeId;

/// A memoized value together with the arguments it was computed for.
#[derive(Debug, Clone)]
struct Entry<V> {
    args: SmallVec<[V; 2]>,
    value: V,
}

/// Per-instance value store.
#[derive(Debug)]
pub struct EvaluationCache<V> {
    slots: Vec<Option<Entry<V>>>,
}

impl<V> EvaluationCache<V>
where
    V: Clone + PartialEq,
{
    /// Create a cache with one empty slot per node.
    pub fn new(node_count: usize) -> Self {
        Self {
            slots: (0..node_count).map(|_| None).collect(),
        }
    }

    /// Get the memoized value if the slot was filled by a call with the same
    /// arguments.
    pub fn get(&self, id: NodeId, args: &[V]) -> Option<&V> {
        self.slots[id.index()]
            .as_ref()
            .filter(|entry| entry.args.as_slice() == args)
            .map(|entry| &entry.value)
    }

    /// Fill the slot, replacing whatever it held.
    pub fn put(&mut self, id: NodeId, args: &[V], value: V) {
        self.slots[id.index()] = Some(Entry {
            args: args.iter().cloned().collect(),
            value,
        });
    }

    /// Empty the slot, returning the evicted value.
    pub fn evict(&mut self, id: NodeId) -> Option<V> {
        self.slots[id.index()].take().map(|entry| entry.value)
    }

    /// Check whether the slot holds any value.
    pub fn contains(&self, id: NodeId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
