//! # Cache
//!
//! Generic key→value store with explicit invalidation and no backend
//! knowledge.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  get(key)         → Option<V>  (clone, never an aliased ref)    │
//! │  put(key, value)  → ()         (last completed write wins)      │
//! │  invalidate(key)  → ()                                          │
//! │  invalidate_all() → ()                                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No eviction policy beyond explicit invalidation: no TTL, no size bound,
//! no background work. The dataset (a bookstore catalog) is small; a future
//! LRU/TTL policy can be added behind the same four operations without
//! touching callers.
//!
//! Thread-safety: concurrent `get`/`put`/`invalidate` on the same key must
//! not corrupt internal state. The cache does NOT provide read-modify-write
//! atomicity; that serialization happens at the repository layer.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

/// In-memory cache over a `RwLock<HashMap>`.
///
/// Entries are owned exclusively by the cache; `get` hands out clones so
/// callers can never mutate cached state behind the repository's back.
#[derive(Debug, Default)]
pub struct Cache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache.
    pub fn new() -> Self {
        Cache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a clone of the cached value for `key`, if present.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn put(&self, key: K, value: V) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
    }

    /// Stores `value` under `key` only if `predicate` still holds.
    ///
    /// The predicate is evaluated under the same write lock `invalidate`
    /// takes, so an invalidation observed by the predicate can never race
    /// past it: either the predicate sees the invalidation and the insert
    /// is dropped, or the insert completes first and a pending
    /// invalidation removes it afterwards. Returns whether the value was
    /// stored.
    pub fn put_if(&self, key: K, value: V, predicate: impl FnOnce() -> bool) -> bool {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if predicate() {
            entries.insert(key, value);
            true
        } else {
            false
        }
    }

    /// Removes the entry for `key`. A subsequent `get` is a miss.
    pub fn invalidate(&self, key: &K) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Removes every entry.
    pub fn invalidate_all(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of live entries (diagnostics).
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
