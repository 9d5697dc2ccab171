//! Fixed-size pool of locks keyed by a hashed name.
//!
//! Per-key mutual exclusion over an unbounded key space (object ids, ref
//! names) without growing a map entry per key forever: the key hashes into
//! one of a small, fixed number of buckets, and unrelated keys that land in
//! the same bucket simply serialize against each other. That's a deliberate
//! trade of occasional false contention for bounded memory.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher as _};
use std::sync::{Mutex, MutexGuard};

/// Default bucket count, matching the source's fixed-pool size.
pub const DEFAULT_BUCKETS: usize = 101;

/// A fixed-size array of plain mutexes indexed by `hash(key) % buckets`.
pub struct NamedMutex {
    buckets: Vec<Mutex<()>>,
}

impl NamedMutex {
    /// Create a pool with the default bucket count.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create a pool with a specific bucket count (must be > 0).
    pub fn with_buckets(buckets: usize) -> Self {
        assert!(buckets > 0, "NamedMutex needs at least one bucket");
        Self {
            buckets: (0..buckets).map(|_| Mutex::new(())).collect(),
        }
    }

    fn bucket_index(&self, key: &(impl Hash + ?Sized)) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.buckets.len()
    }

    /// Lock the bucket that `key` hashes into. Collisions with unrelated
    /// keys serialize; that's expected and harmless.
    pub fn lock(&self, key: &(impl Hash + ?Sized)) -> MutexGuard<'_, ()> {
        let idx = self.bucket_index(key);
        match self.buckets[idx].lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for NamedMutex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_same_bucket() {
        let pool = NamedMutex::new();
        assert_eq!(pool.bucket_index("refs/heads/main"), pool.bucket_index("refs/heads/main"));
    }

    #[test]
    fn lock_is_reentrant_safe_across_keys() {
        let pool = NamedMutex::with_buckets(4);
        let _a = pool.lock("refs/heads/a");
        // A different bucket must still be lockable while another is held.
        let mut found_free = false;
        for candidate in ["x", "y", "z", "w", "v"] {
            if pool.bucket_index(candidate) != pool.bucket_index("refs/heads/a") {
                let _b = pool.lock(candidate);
                found_free = true;
                break;
            }
        }
        assert!(found_free, "expected at least one distinct bucket among probes");
    }

    #[test]
    fn custom_bucket_count() {
        let pool = NamedMutex::with_buckets(1);
        assert_eq!(pool.buckets.len(), 1);
        let _g = pool.lock("anything");
    }
}
