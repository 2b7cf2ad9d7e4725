//! Edge storage for trie nodes.
//!
//! Each edge-set starts empty, holds a single entry inline after its first
//! insert, and promotes to a sharded concurrent map on its second distinct key.
//! Promotion is one-way (`Empty -> One -> Many`) and every transition is a
//! compare-and-swap on one atomic reference, so readers never take a lock
//! unless the set has been promoted.

use ahash::RandomState;
use arc_swap::ArcSwap;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Current shape of an edge-set.
enum Edges<K, V> {
    Empty,
    One(K, V),
    Many(DashMap<K, V, RandomState>),
}

/// Result of [`EdgeSet::get_or_insert_with`].
#[derive(Debug)]
pub(crate) struct Inserted<V> {
    /// The value now associated with the key
    pub value: V,
    /// This call installed `value`
    pub created: bool,
    /// Candidates built by this call that lost a race and were dropped
    pub discarded: usize,
    /// This call promoted the set from a single entry to a map
    pub promoted: bool,
}

/// Lock-free-on-read edge-set keyed by `K`.
pub(crate) struct EdgeSet<K, V> {
    slot: ArcSwap<Edges<K, V>>,
}

impl<K, V> EdgeSet<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty edge-set.
    pub fn new() -> Self {
        Self {
            slot: ArcSwap::from_pointee(Edges::Empty),
        }
    }

    /// Look up `key` without inserting.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &**self.slot.load() {
            Edges::Empty => None,
            Edges::One(k, v) => (<K as Borrow<Q>>::borrow(k) == key).then(|| v.clone()),
            Edges::Many(map) => map.get(key).map(|entry| entry.value().clone()),
        }
    }

    /// Return the value for `key`, inserting `make(&key)` if absent.
    ///
    /// Concurrent callers with the same key all receive the same value. `make`
    /// may run more than once under contention; only one result is installed
    /// and the others are dropped. `shard_amount` configures the map created
    /// on promotion.
    pub fn get_or_insert_with(
        &self,
        key: K,
        shard_amount: Option<usize>,
        make: impl Fn(&K) -> V,
    ) -> Inserted<V> {
        let mut discarded = 0;
        let mut promoted = false;

        loop {
            let current = self.slot.load();
            match &**current {
                Edges::Empty => {
                    let candidate = make(&key);
                    let next = Arc::new(Edges::One(key.clone(), candidate.clone()));
                    let prev = self.slot.compare_and_swap(&*current, next);
                    if Arc::ptr_eq(&*prev, &*current) {
                        return Inserted {
                            value: candidate,
                            created: true,
                            discarded,
                            promoted,
                        };
                    }
                    discarded += 1;
                }
                Edges::One(k, v) if *k == key => {
                    return Inserted {
                        value: v.clone(),
                        created: false,
                        discarded,
                        promoted,
                    };
                }
                Edges::One(k, v) => {
                    let map = new_map(shard_amount);
                    map.insert(k.clone(), v.clone());
                    let prev = self.slot.compare_and_swap(&*current, Arc::new(Edges::Many(map)));
                    // A lost race means someone else promoted; either way the
                    // next pass sees a map.
                    promoted |= Arc::ptr_eq(&*prev, &*current);
                }
                Edges::Many(map) => {
                    let (value, created) = match map.entry(key) {
                        Entry::Occupied(entry) => (entry.get().clone(), false),
                        Entry::Vacant(entry) => {
                            let value = make(entry.key());
                            entry.insert(value.clone());
                            (value, true)
                        }
                    };
                    return Inserted {
                        value,
                        created,
                        discarded,
                        promoted,
                    };
                }
            }
        }
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        match &**self.slot.load() {
            Edges::Empty => 0,
            Edges::One(..) => 1,
            Edges::Many(map) => map.len(),
        }
    }

    /// Whether the set has been promoted to a map.
    pub fn is_promoted(&self) -> bool {
        matches!(&**self.slot.load(), Edges::Many(_))
    }

    /// Replace the contents with a fresh empty set, returning the values
    /// that were stored.
    ///
    /// Readers that already loaded the previous contents keep using them.
    pub fn take(&self) -> Vec<V> {
        let previous = self.slot.swap(Arc::new(Edges::Empty));
        match &*previous {
            Edges::Empty => Vec::new(),
            Edges::One(_, v) => vec![v.clone()],
            Edges::Many(map) => map.iter().map(|entry| entry.value().clone()).collect(),
        }
    }
}

impl<K, V> Default for EdgeSet<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> fmt::Debug for EdgeSet<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match &**self.slot.load() {
            Edges::Empty => "Empty".to_string(),
            Edges::One(..) => "One".to_string(),
            Edges::Many(map) => format!("Many({})", map.len()),
        };
        f.debug_struct("EdgeSet").field("shape", &shape).finish()
    }
}

fn new_map<K, V>(shard_amount: Option<usize>) -> DashMap<K, V, RandomState>
where
    K: Eq + Hash,
{
    match shard_amount {
        Some(shards) => DashMap::with_hasher_and_shard_amount(RandomState::new(), shards),
        None => DashMap::with_hasher(RandomState::new()),
    }
}
