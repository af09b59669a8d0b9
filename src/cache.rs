//! In-memory caching of background removal results
//!
//! Removal is by far the most expensive stage, so its output is cached per
//! request body. Keys are SHA-256 digests of the input bytes; a stable
//! content hash keeps keys valid across process restarts and makes
//! collisions a non-concern at this scale. The enhancement pipeline itself
//! never reads or writes this cache.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};

/// SHA-256 digest identifying a request body
pub type ContentKey = [u8; 32];

/// Compute the content key for a byte buffer
#[must_use]
pub fn content_key(bytes: &[u8]) -> ContentKey {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Result cache statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries currently held
    pub entries: usize,
    /// Total size of cached payloads in bytes
    pub total_size_bytes: u64,
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
}

impl CacheStats {
    /// Hit ratio in [0, 1]; 0 when no lookups happened yet
    #[must_use]
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            return 0.0;
        }
        self.hits as f64 / lookups as f64
    }
}

/// Bounded in-memory store of removal outputs keyed by content hash.
///
/// Eviction is oldest-insertion-first once the capacity is reached. The
/// cache is owned by a single processor; callers that share one across
/// threads wrap it themselves.
#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<ContentKey, Vec<u8>>,
    insertion_order: VecDeque<ContentKey>,
    capacity: usize,
    stats: CacheStats,
}

impl ResultCache {
    /// Create a cache holding at most `capacity` entries
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            capacity: capacity.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Look up a previously stored payload, counting the hit or miss
    pub fn get(&mut self, key: &ContentKey) -> Option<&[u8]> {
        if let Some(payload) = self.entries.get(key) {
            self.stats.hits += 1;
            Some(payload.as_slice())
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Store a payload, evicting the oldest entry when full
    pub fn put(&mut self, key: ContentKey, payload: Vec<u8>) {
        if self.entries.contains_key(&key) {
            // Refresh in place; insertion order is unchanged
            self.entries.insert(key, payload);
            self.refresh_size();
            return;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.insertion_order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.insertion_order.push_back(key);
        self.entries.insert(key, payload);
        self.refresh_size();
    }

    /// Drop all entries, keeping hit/miss counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
        self.refresh_size();
    }

    /// Current statistics snapshot
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.entries = self.entries.len();
        stats
    }

    /// Number of entries currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn refresh_size(&mut self) {
        self.stats.total_size_bytes = self.entries.values().map(|v| v.len() as u64).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_key_is_stable_and_input_sensitive() {
        assert_eq!(content_key(b"abc"), content_key(b"abc"));
        assert_ne!(content_key(b"abc"), content_key(b"abd"));
        // Known SHA-256 of the empty string
        let empty = content_key(b"");
        assert_eq!(empty[0], 0xe3);
        assert_eq!(empty[31], 0x55);
    }

    #[test]
    fn get_counts_hits_and_misses() {
        let mut cache = ResultCache::new(4);
        let key = content_key(b"payload");
        assert!(cache.get(&key).is_none());
        cache.put(key, b"result".to_vec());
        assert_eq!(cache.get(&key), Some(b"result".as_slice()));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert!((stats.hit_ratio() - 0.5).abs() < 1e-9);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.total_size_bytes, 6);
    }

    #[test]
    fn evicts_oldest_entry_at_capacity() {
        let mut cache = ResultCache::new(2);
        let keys: Vec<_> = (0u8..3).map(|i| content_key(&[i])).collect();
        cache.put(keys[0], vec![0]);
        cache.put(keys[1], vec![1]);
        cache.put(keys[2], vec![2]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&keys[0]).is_none());
        assert!(cache.get(&keys[1]).is_some());
        assert!(cache.get(&keys[2]).is_some());
    }

    #[test]
    fn put_refreshes_existing_entry_without_growing() {
        let mut cache = ResultCache::new(2);
        let key = content_key(b"same");
        cache.put(key, vec![1, 2, 3]);
        cache.put(key, vec![9]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some([9].as_slice()));
        assert_eq!(cache.stats().total_size_bytes, 1);
    }

    #[test]
    fn clear_keeps_counters() {
        let mut cache = ResultCache::new(2);
        let key = content_key(b"x");
        cache.put(key, vec![1]);
        let _ = cache.get(&key);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().total_size_bytes, 0);
    }
}
