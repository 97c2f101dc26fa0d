//! Fixed-TTL in-memory cache for subgraph responses.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Default cache lifetime: five minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Expiring key-value cache. Entries past their TTL are dropped on read;
/// there is no background eviction.
#[derive(Debug)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().expect("cache lock poisoned");
        let (inserted_at, value) = entries.get(key)?;
        if inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some(value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(key.into(), (Instant::now(), value));
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 1u32);
        assert_eq!(cache.get("k"), Some(1));
    }

    #[test]
    fn test_miss_for_unknown_key() {
        let cache: TtlCache<u32> = TtlCache::default();
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expiry() {
        let cache = TtlCache::new(Duration::from_millis(10));
        cache.insert("k", 1u32);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn test_overwrite_refreshes() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("k", 1u32);
        cache.insert("k", 2u32);
        assert_eq!(cache.get("k"), Some(2));
    }
}
