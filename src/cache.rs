//! Time-expiring lookup cache

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Default time-to-live for cached responses (5 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Key under which a lookup is cached
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The caller's own address
    SelfLookup,
    /// An explicitly traced address
    Trace(String),
}

impl CacheKey {
    /// String form of the key
    pub fn as_str(&self) -> &str {
        match self {
            CacheKey::SelfLookup => "userIP",
            CacheKey::Trace(ip) => ip,
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache entry with timestamp
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Thread-safe key/value cache whose entries expire after a fixed TTL
///
/// Expired entries are dropped when read. There is no size bound and no
/// background eviction.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: Arc<Mutex<HashMap<String, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<V: Clone> ResponseCache<V> {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Create a new cache with the default TTL
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }

    /// Time-to-live applied to entries
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Look up a key as of `now`
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.entries.lock().expect("mutex poisoned");

        if let Some(entry) = entries.get(key) {
            if now.saturating_duration_since(entry.stored_at) < self.ttl {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    /// Store a value, replacing any previous entry for the key
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// Store a value with an explicit timestamp
    pub fn set_at(&self, key: impl Into<String>, value: V, stored_at: Instant) {
        let mut entries = self.entries.lock().expect("mutex poisoned");
        entries.insert(key.into(), CacheEntry { value, stored_at });
    }

    /// Get the number of entries in the cache, expired or not
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("mutex poisoned");
        entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        let entries = self.entries.lock().expect("mutex poisoned");
        entries.is_empty()
    }

    /// Clear all entries from the cache
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("mutex poisoned");
        entries.clear();
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let cache = ResponseCache::with_default_ttl();
        assert!(cache.is_empty());

        cache.set("k", 42u32);
        assert_eq!(cache.get("k"), Some(42));
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_overwrite() {
        let cache = ResponseCache::with_default_ttl();
        cache.set("k", "first".to_string());
        cache.set("k", "second".to_string());
        assert_eq!(cache.get("k").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expiry_after_five_minutes() {
        let cache = ResponseCache::with_default_ttl();
        let t0 = Instant::now();
        cache.set_at("k", 7u8, t0);

        assert_eq!(cache.get_at("k", t0 + Duration::from_secs(299)), Some(7));
        // Expiry is strict: exactly the TTL is already a miss
        assert_eq!(cache.get_at("k", t0 + DEFAULT_CACHE_TTL), None);
        // The expired entry was dropped on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expiry_with_short_ttl() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        cache.set("k", 1u8);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(CacheKey::SelfLookup.as_str(), "userIP");
        assert_eq!(CacheKey::Trace("8.8.8.8".to_string()).as_str(), "8.8.8.8");
        assert_eq!(CacheKey::SelfLookup.to_string(), "userIP");
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        cache.set(CacheKey::SelfLookup.as_str(), 1u8);
        cache.set("8.8.8.8", 2u8);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
