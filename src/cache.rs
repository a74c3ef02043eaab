use std::cell::Cell;

use crate::reference::BddId;
use crate::utils::{pairing2, pairing3, MyHash};

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Direct-mapped, lossy operation cache.
///
/// A colliding insert overwrites the previous entry. Lookups compare the full
/// key, so an evicted or colliding entry is a miss, never a wrong answer.
pub struct Cache<K, V> {
    data: Vec<Option<Entry<K, V>>>,
    bitmask: u64,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Cache<K, V> {
    /// Create a new cache of size `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");

        let size = 1 << bits;
        let bitmask = (size - 1) as u64;

        Self {
            data: std::iter::repeat_with(|| None).take(size).collect(),
            bitmask,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.data.fill_with(|| None);
    }

    fn index(&self, key: u64) -> usize {
        (key & self.bitmask) as usize
    }
}

impl<K, V> Cache<K, V>
where
    K: MyHash + Eq,
{
    /// Get the cached result.
    pub fn get(&self, key: &K) -> Option<&V> {
        match &self.data[self.index(key.hash())] {
            Some(entry) if &entry.key == key => {
                self.hits.set(self.hits.get() + 1);
                Some(&entry.value)
            }
            _ => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    /// Insert a result into the cache.
    pub fn insert(&mut self, key: K, value: V) {
        let index = self.index(key.hash());
        self.data[index] = Some(Entry { key, value });
    }
}

impl MyHash for BddId {
    fn hash(&self) -> u64 {
        self.get() as u64
    }
}

impl MyHash for (BddId, BddId) {
    fn hash(&self) -> u64 {
        pairing2(self.0.get() as u64, self.1.get() as u64)
    }
}

impl MyHash for (BddId, BddId, BddId) {
    fn hash(&self) -> u64 {
        pairing3(self.0.get() as u64, self.1.get() as u64, self.2.get() as u64)
    }
}
