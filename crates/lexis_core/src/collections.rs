//! Collection types used by the rule tables.

use rustc_hash::FxHashMap as RawFxHashMap;
use std::hash::Hash;

/// An ordered map that preserves insertion order.
///
/// Literal symbols are probed in the order they were registered, so the
/// table needs both O(1) duplicate detection and stable iteration.
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
    index: RawFxHashMap<K, usize>,
}

impl<K: Eq + Hash + Clone, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: RawFxHashMap::default(),
        }
    }

    /// Insert a value only if the key is absent. Returns the value back on
    /// collision.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(), V> {
        if self.index.contains_key(&key) {
            return Err(value);
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K: Eq + Hash + Clone, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// A set that uses FxHash for fast hashing. Rule tables are built from
/// trusted configuration, so DoS resistance is not needed.
pub type FxHashSet<T> = rustc_hash::FxHashSet<T>;

/// Re-export FxHashMap for convenience.
pub type FxHashMap<K, V> = RawFxHashMap<K, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_map_preserves_order() {
        let mut map = OrderedMap::new();
        map.try_insert("c", 3).unwrap();
        map.try_insert("a", 1).unwrap();
        map.try_insert("b", 2).unwrap();

        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, vec![3, 1, 2]);
    }

    #[test]
    fn test_ordered_map_try_insert_rejects_duplicates() {
        let mut map = OrderedMap::new();
        assert_eq!(map.try_insert("==", 1), Ok(()));
        assert_eq!(map.try_insert("==", 2), Err(2));
        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, vec![1]);
    }
}
