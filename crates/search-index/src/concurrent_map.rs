//! Sharded, mutex-per-bucket accumulator keyed by integer document id.
//!
//! Direct translation of the original `ConcurrentMap<Key, Value>`: a key
//! routes to bucket `(key as u64) % bucket_count`, and each bucket is an
//! independently-locked `HashMap`. Used only by the parallel read path
//! (§4.5, §4.9) to accumulate per-document relevance without a single
//! global lock.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, MutexGuard};

struct Bucket {
    map: Mutex<HashMap<i64, f64>>,
}

/// A sharded `{i64 -> f64}` map safe for concurrent accumulation across
/// `rayon` worker threads, one mutex per bucket.
pub struct ConcurrentMap {
    buckets: Vec<Bucket>,
}

/// A locked handle granting exclusive mutable access to the value at one
/// key. Releases the bucket's mutex when dropped.
pub struct BucketAccess<'a> {
    guard: MutexGuard<'a, HashMap<i64, f64>>,
    key: i64,
}

impl Deref for BucketAccess<'_> {
    type Target = f64;
    fn deref(&self) -> &f64 {
        self.guard.get(&self.key).expect("slot created by get_mut")
    }
}

impl DerefMut for BucketAccess<'_> {
    fn deref_mut(&mut self) -> &mut f64 {
        self.guard.get_mut(&self.key).expect("slot created by get_mut")
    }
}

impl ConcurrentMap {
    /// Create a map with `bucket_count` independently-locked buckets.
    pub fn new(bucket_count: usize) -> Self {
        assert!(bucket_count > 0, "ConcurrentMap requires at least one bucket");
        Self {
            buckets: (0..bucket_count)
                .map(|_| Bucket { map: Mutex::new(HashMap::new()) })
                .collect(),
        }
    }

    fn bucket_index(&self, key: i64) -> usize {
        (key as u64 as usize) % self.buckets.len()
    }

    /// Acquire the bucket holding `key` and return a handle granting
    /// exclusive mutable access, creating a zero-initialized slot on first
    /// touch.
    pub fn get_mut(&self, key: i64) -> BucketAccess<'_> {
        let index = self.bucket_index(key);
        let mut guard = self.buckets[index].map.lock().expect("bucket mutex poisoned");
        guard.entry(key).or_insert(0.0);
        BucketAccess { guard, key }
    }

    /// Remove `key` from whichever bucket holds it.
    pub fn erase(&self, key: i64) {
        let index = self.bucket_index(key);
        let mut guard = self.buckets[index].map.lock().expect("bucket mutex poisoned");
        guard.remove(&key);
    }

    /// Lock every bucket in turn and merge into one ordinary map. Consumes
    /// `self` because the spec forbids calling this concurrently with other
    /// operations — taking it by value makes that a compile-time guarantee
    /// rather than a documented caveat.
    pub fn into_ordinary_map(self) -> HashMap<i64, f64> {
        let mut merged = HashMap::new();
        for bucket in &self.buckets {
            let guard = bucket.map.lock().expect("bucket mutex poisoned");
            merged.extend(guard.iter().map(|(&k, &v)| (k, v)));
        }
        merged
    }
}
