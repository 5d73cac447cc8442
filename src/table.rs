use std::ops::Index;

use log::debug;

use crate::utils::MyHash;

/// Largest number of table bits, so every index fits in a positive `i32`.
pub const MAX_BITS: usize = 31;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

/// Append-only hash-consing table.
///
/// Values are stored in a plain vector and chained into hash buckets by index.
/// Index 0 is a sentry and never holds a value.
/// Both the storage and the bucket array double when exhausted.
#[derive(Debug)]
pub struct Table<T> {
    data: Vec<Entry<T>>,

    buckets: Vec<usize>,
    bitmask: u64,

    /// Current storage capacity, grows geometrically up to `2^MAX_BITS`.
    capacity: usize,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with initial capacity `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= MAX_BITS, "Storage bits should be in the range 0..={}", MAX_BITS);

        let capacity = 1 << bits;
        let mut data = Vec::with_capacity(capacity);
        data.push(Entry {
            value: T::default(),
            next: 0,
        });

        let buckets_bits = bits.min(16);
        let buckets_size = 1 << buckets_bits;

        Self {
            data,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
            capacity,
        }
    }
}

impl<T> Table<T> {
    /// Get the current capacity of the table.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Get the number of stored values (excluding the sentry).
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }
    /// Get the index of the next cell in the same bucket.
    pub fn next(&self, index: usize) -> usize {
        self.data[index].next
    }

    /// Append a new value and return its index.
    fn add(&mut self, value: T) -> usize {
        if self.data.len() == self.capacity {
            self.grow();
        }
        self.data.push(Entry { value, next: 0 });
        self.data.len() - 1
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity * 2;
        if new_capacity > 1 << MAX_BITS {
            panic!("Storage is full");
        }
        debug!("table: growing capacity {} -> {}", self.capacity, new_capacity);
        self.data.reserve(new_capacity - self.data.len());
        self.capacity = new_capacity;
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Put a value into the table, returning the index of the equal value if it already exists.
    pub fn put(&mut self, value: T) -> usize {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        while index != 0 {
            if &value == self.value(index) {
                return index;
            }
            index = self.next(index);
        }

        // Prepend the new value to its bucket chain.
        let i = self.add(value);
        self.data[i].next = self.buckets[bucket_index];
        self.buckets[bucket_index] = i;

        if self.size() > 2 * self.buckets.len() {
            self.rehash();
        }
        i
    }

    /// Double the bucket array and relink every chain.
    fn rehash(&mut self) {
        let size = self.buckets.len() * 2;
        debug!("table: rehashing into {} buckets", size);
        self.buckets = vec![0; size];
        self.bitmask = (size - 1) as u64;
        for i in 1..self.data.len() {
            let b = self.bucket_index(&self.data[i].value);
            self.data[i].next = self.buckets[b];
            self.buckets[b] = i;
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}
