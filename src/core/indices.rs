use std::hash::Hash;

use hashbrown::HashMap;

/// Hash map that also remembers first-insertion order of its keys.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    records: HashMap<K, V>,
    order: Vec<K>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, V> OrderedMap<K, V> {
    /// Inserts or replaces the value for `key`; a replaced key keeps its position.
    ///
    /// Returns the previous value when one existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let prev = self.records.insert(key, value);
        if prev.is_none() {
            self.order.push(key);
        }
        prev
    }

    /// Looks up a value.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.records.get(key)
    }

    /// Looks up a value for mutation.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.records.get_mut(key)
    }

    /// True when `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.records.contains_key(key)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.order.iter().filter_map(|key| self.records.get(key))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
