use std::ops::Index;

use crate::utils::MyHash;

/// End-of-chain marker.
///
/// Slot 0 holds the FALSE terminal, which is added with [`Table::add`] and
/// never chained into a bucket, so `0` is free to mean "no next entry".
const NIL: usize = 0;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
    hashed: bool,
}

/// Hash-consing table with chained buckets.
///
/// The position of a value in the table is its identity: values are only ever
/// appended, so indices stay stable for the lifetime of the table.
pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T> {
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Table bits should be in the range 0..=31");

        let buckets_size = 1 << bits;
        Self {
            data: Vec::with_capacity(buckets_size),
            buckets: vec![NIL; buckets_size],
            bitmask: (buckets_size - 1) as u64,
        }
    }

    /// Get the number of stored values.
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Get the number of buckets.
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        &self.data[index].value
    }
    /// Get the index of the next entry in the same bucket.
    pub fn next(&self, index: usize) -> usize {
        self.data[index].next
    }

    /// Append a value without registering it in any bucket.
    pub fn add(&mut self, value: T) -> usize {
        let index = self.data.len();
        self.data.push(Entry {
            value,
            next: NIL,
            hashed: false,
        });
        index
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.data.iter().enumerate().map(|(i, e)| (i, &e.value))
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Find the index of an equal value, if present.
    pub fn find(&self, value: &T) -> Option<usize> {
        let mut index = self.buckets[self.bucket_index(value)];
        while index != NIL {
            if self.value(index) == value {
                return Some(index);
            }
            index = self.next(index);
        }
        None
    }

    /// Put a value into the table.
    ///
    /// Returns the index of the value and whether it was already present.
    pub fn put(&mut self, value: T) -> (usize, bool) {
        if let Some(index) = self.find(&value) {
            return (index, true);
        }

        let index = self.add(value);
        self.link(index);

        if self.data.len() > 2 * self.buckets.len() {
            self.grow();
        }

        (index, false)
    }

    fn link(&mut self, index: usize) {
        assert_ne!(index, NIL, "Index 0 cannot be chained into a bucket");
        let b = self.bucket_index(self.value(index));
        self.data[index].next = self.buckets[b];
        self.data[index].hashed = true;
        self.buckets[b] = index;
    }

    fn grow(&mut self) {
        let size = self.buckets.len() * 2;
        log::debug!("growing unique table buckets: {} -> {}", self.buckets.len(), size);
        self.buckets = vec![NIL; size];
        self.bitmask = (size - 1) as u64;
        for index in 0..self.data.len() {
            if self.data[index].hashed {
                self.link(index);
            }
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}
