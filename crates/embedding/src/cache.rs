use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;

/// Run-scoped LRU cache mapping text hash to embedding vector.
///
/// Owned by the caller and thrown away with the run; nothing here is
/// persisted, and the canonical registry's embeddings must be re-derived
/// whenever the registry changes.
pub struct EmbeddingCache {
    cache: LruCache<u64, Vec<f32>>,
    hits: u64,
    misses: u64,
}

impl EmbeddingCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    fn key(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }

    /// Look up a cached embedding by text.
    pub fn get(&mut self, text: &str) -> Option<Vec<f32>> {
        match self.cache.get(&Self::key(text)) {
            Some(vector) => {
                self.hits += 1;
                Some(vector.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store an embedding for a text.
    pub fn put(&mut self, text: &str, embedding: Vec<f32>) {
        self.cache.put(Self::key(text), embedding);
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_and_miss_counters() {
        let mut cache = EmbeddingCache::new(8);

        assert!(cache.get("password reset").is_none());
        assert_eq!(cache.misses(), 1);

        cache.put("password reset", vec![0.1, 0.2]);
        assert_eq!(cache.get("password reset").unwrap(), vec![0.1, 0.2]);
        assert_eq!(cache.hits(), 1);
        assert!(cache.hit_rate() > 0.0);
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut cache = EmbeddingCache::new(2);
        cache.put("a", vec![1.0]);
        cache.put("b", vec![2.0]);
        cache.put("c", vec![3.0]);

        assert!(cache.get("a").is_none());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut cache = EmbeddingCache::new(0);
        cache.put("x", vec![1.0]);
        assert!(cache.get("x").is_some());
    }
}
