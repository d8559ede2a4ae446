// File: retext-core/src/cache.rs
//! An optional, caller-owned cache for substitution results.
//!
//! Entries are keyed by the field's identity, the active rule-set fingerprint
//! and a digest of the input, so a hit always corresponds to the exact output
//! the engine would compute. Dropping the cache never changes output.

use log::trace;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::CacheConfig;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    field: String,
    fingerprint: String,
    input_digest: String,
}

#[derive(Debug)]
struct CacheEntry {
    value: String,
    inserted_at: Instant,
}

/// A bounded, TTL-limited map from `(field, rule-set, input)` to output.
#[derive(Debug)]
pub struct SubstitutionCache {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for SubstitutionCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl SubstitutionCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.capacity)
    }

    /// Returns the cached output for this key, or computes, stores and
    /// returns it.
    pub fn get_or_insert_with<F>(&mut self, field: &str, fingerprint: &str, input: &str, compute: F) -> String
    where
        F: FnOnce() -> String,
    {
        let key = CacheKey {
            field: field.to_string(),
            fingerprint: fingerprint.to_string(),
            input_digest: digest(input),
        };
        let now = Instant::now();

        if let Some(entry) = self.entries.get(&key) {
            if now.duration_since(entry.inserted_at) < self.ttl {
                self.hits += 1;
                trace!("Cache hit for field '{}'.", field);
                return entry.value.clone();
            }
        }

        self.misses += 1;
        let value = compute();
        self.make_room(now);
        self.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                inserted_at: now,
            },
        );
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since the cache was created.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops expired entries; if still full, evicts the oldest one.
    fn make_room(&mut self, now: Instant) {
        if self.entries.len() < self.capacity {
            return;
        }
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.duration_since(entry.inserted_at) < ttl);
        if self.entries.len() < self.capacity {
            return;
        }
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_at)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

fn digest(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_skips_recompute() {
        let mut cache = SubstitutionCache::default();
        let first = cache.get_or_insert_with("title:1", "fp", "cat", || "dog".to_string());
        let second = cache.get_or_insert_with("title:1", "fp", "cat", || panic!("recomputed"));
        assert_eq!(first, "dog");
        assert_eq!(second, "dog");
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn test_changed_input_or_rules_miss() {
        let mut cache = SubstitutionCache::default();
        cache.get_or_insert_with("title:1", "fp", "cat", || "dog".to_string());
        let other_input = cache.get_or_insert_with("title:1", "fp", "cats", || "cats".to_string());
        let other_rules = cache.get_or_insert_with("title:1", "fp2", "cat", || "cow".to_string());
        assert_eq!(other_input, "cats");
        assert_eq!(other_rules, "cow");
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_expired_entries_are_recomputed() {
        let mut cache = SubstitutionCache::new(Duration::ZERO, 4);
        cache.get_or_insert_with("f", "fp", "x", || "1".to_string());
        let again = cache.get_or_insert_with("f", "fp", "x", || "2".to_string());
        assert_eq!(again, "2");
    }

    #[test]
    fn test_capacity_is_bounded() {
        let mut cache = SubstitutionCache::new(Duration::from_secs(60), 2);
        for i in 0..5 {
            let input = i.to_string();
            cache.get_or_insert_with("f", "fp", &input, || input.clone());
        }
        assert_eq!(cache.len(), 2);
    }
}
