//! Bounded LRU store.
//!
//! Recency is an index-linked doubly-linked list over a slab of nodes, with an
//! `FxHashMap` from key to slot. Insert, overwrite, touch, remove and eviction
//! are all O(1). The store is not synchronized; [`super::CollectionDataCache`]
//! owns it behind its lock.

use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Slots reserved up front, regardless of capacity.
const PREALLOC_LIMIT: usize = 1024;

struct Node<K, V> {
    entry: Option<(K, V)>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Map with at most `capacity` entries, evicting the least recently used.
pub struct BoundedLru<K, V> {
    capacity: NonZeroUsize,
    index: FxHashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    /// Least recently used.
    head: Option<usize>,
    /// Most recently used.
    tail: Option<usize>,
}

impl<K, V> BoundedLru<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty store holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        let reserve = capacity.get().min(PREALLOC_LIMIT);
        Self {
            capacity,
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            nodes: Vec::with_capacity(reserve),
            free: Vec::new(),
            head: None,
            tail: None,
        }
    }

    /// Maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Current number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether `key` is present. Does not touch recency.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or overwrites `key`, making it the most recently used.
    ///
    /// Returns the entry evicted to make room, if any. Overwriting an existing
    /// key never evicts.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            if let Some(entry) = self.nodes[idx].entry.as_mut() {
                entry.1 = value;
            }
            self.move_to_back(idx);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity.get() {
            self.pop_front()
        } else {
            None
        };

        let idx = self.alloc(key.clone(), value);
        self.push_back(idx);
        self.index.insert(key, idx);
        evicted
    }

    /// Looks up `key` without touching recency.
    #[must_use]
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.nodes[idx].entry.as_ref().map(|(_, v)| v)
    }

    /// Looks up `key` and marks it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_back(idx);
        self.nodes[idx].entry.as_ref().map(|(_, v)| v)
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.index.remove(key)?;
        self.unlink(idx);
        self.free.push(idx);
        self.nodes[idx].entry.take().map(|(_, v)| v)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let idx = self.head?;
        self.unlink(idx);
        self.free.push(idx);
        let (key, value) = self.nodes[idx].entry.take()?;
        self.index.remove(&key);
        Some((key, value))
    }

    /// Removes all entries. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates entries from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            current: self.head,
        }
    }

    fn alloc(&mut self, key: K, value: V) -> usize {
        let node = Node {
            entry: Some((key, value)),
            prev: None,
            next: None,
        };
        if let Some(idx) = self.free.pop() {
            self.nodes[idx] = node;
            idx
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    fn push_back(&mut self, idx: usize) {
        self.nodes[idx].prev = self.tail;
        self.nodes[idx].next = None;
        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn move_to_back(&mut self, idx: usize) {
        if self.tail == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_back(idx);
    }

    /// Walks the list both ways and checks it against the index.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let forward: Vec<usize> = {
            let mut out = Vec::new();
            let mut cur = self.head;
            while let Some(idx) = cur {
                out.push(idx);
                cur = self.nodes[idx].next;
            }
            out
        };
        let mut backward: Vec<usize> = {
            let mut out = Vec::new();
            let mut cur = self.tail;
            while let Some(idx) = cur {
                out.push(idx);
                cur = self.nodes[idx].prev;
            }
            out
        };
        backward.reverse();

        assert_eq!(forward, backward, "list links disagree");
        assert_eq!(forward.len(), self.index.len(), "list and index sizes differ");
        assert!(self.index.len() <= self.capacity.get(), "capacity exceeded");
        for idx in forward {
            let (key, _) = self.nodes[idx].entry.as_ref().expect("linked slot is vacant");
            assert_eq!(self.index.get(key), Some(&idx), "index points elsewhere");
        }
    }
}

/// Iterator over a [`BoundedLru`], least recently used first.
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    current: Option<usize>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.nodes[self.current?];
        self.current = node.next;
        node.entry.as_ref().map(|(k, v)| (k, v))
    }
}
