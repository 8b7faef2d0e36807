//! Short-lived memo of final result lists, keyed by normalized query and brand.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use partfinder_core::Product;
use sha2::{Digest, Sha256};

use crate::text::normalize_whitespace_lower;

const GENERIC_BRAND: &str = "__generic__";

/// Cache key for a search: SHA-256 hex of the lowercased, whitespace-collapsed
/// query, a unit separator, and the brand (or a generic marker).
#[must_use]
pub fn cache_key(query: &str, brand: Option<&str>) -> String {
    let normalized = normalize_whitespace_lower(query);
    let brand = brand.unwrap_or(GENERIC_BRAND);
    let digest = Sha256::digest(format!("{normalized}\u{1f}{brand}").as_bytes());
    format!("{digest:x}")
}

struct CacheEntry {
    created_at: Instant,
    products: Vec<Product>,
}

/// TTL-bounded, capacity-bounded result cache.
///
/// Expired entries are removed when read. On overflow the entry with the
/// oldest creation time is evicted. A capacity of zero disables the cache.
pub struct ResultCache {
    ttl: Duration,
    capacity: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResultCache {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<Product>> {
        self.get_at(key, Instant::now())
    }

    pub fn put(&self, key: String, products: Vec<Product>) {
        self.put_at(key, products, Instant::now());
    }

    /// Like [`ResultCache::get`], evaluated as of `now`.
    #[must_use]
    pub fn get_at(&self, key: &str, now: Instant) -> Option<Vec<Product>> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.created_at) < self.ttl {
            return Some(entry.products.clone());
        }
        entries.remove(key);
        tracing::debug!(key, "evicted expired cache entry");
        None
    }

    /// Like [`ResultCache::put`], stamping the entry with `now`.
    pub fn put_at(&self, key: String, products: Vec<Product>, now: Instant) {
        if !self.is_enabled() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                created_at: now,
                products,
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
