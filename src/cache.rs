//! Short-lived in-memory cache for fetched JSON documents
//!
//! Repeat requests for the same endpoint within the TTL window are served
//! from memory, which absorbs refresh cycles across cards and amortizes load
//! on the public relays. Entries are keyed by the originally requested URL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Default validity window for a cached response
const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug)]
struct CacheEntry {
    data: Value,
    stored_at: Instant,
    proxy_used: String,
}

/// A fresh cache entry returned by [`ResponseCache::get`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    /// The decoded JSON document
    pub data: Value,
    /// Label of the relay (or "direct") that originally produced the data
    pub proxy_used: String,
}

/// Process-wide response cache shared by every card
///
/// Expiry is checked on read: stale entries are treated as misses and stay
/// in the map until overwritten. There is no eviction beyond that, so growth
/// is unbounded by distinct URL, an accepted limitation for a dashboard with
/// a handful of endpoints.
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseCache {
    /// Creates a cache with the default 30 second TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates a cache with a custom TTL
    ///
    /// Useful for tests that need entries to expire quickly.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Looks up a fresh entry for the given URL
    ///
    /// Returns `None` when there is no entry or the entry has outlived the
    /// TTL. Stale entries are not removed here, just ignored.
    pub fn get(&self, url: &str) -> Option<CacheHit> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(url)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(CacheHit {
                data: entry.data.clone(),
                proxy_used: entry.proxy_used.clone(),
            })
        } else {
            None
        }
    }

    /// Stores a document for the given URL, overwriting any existing entry
    pub fn put(&self, url: &str, data: Value, proxy_used: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            url.to_string(),
            CacheEntry {
                data,
                stored_at: Instant::now(),
                proxy_used: proxy_used.to_string(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread;

    #[test]
    fn test_get_returns_none_for_missing_url() {
        let cache = ResponseCache::new();
        assert!(cache.get("https://a.test/x").is_none());
    }

    #[test]
    fn test_put_then_get_returns_data_and_proxy_label() {
        let cache = ResponseCache::new();
        cache.put("https://a.test/x", json!({"v": 1}), "All Origins");

        let hit = cache.get("https://a.test/x").expect("Should be a hit");
        assert_eq!(hit.data, json!({"v": 1}));
        assert_eq!(hit.proxy_used, "All Origins");
    }

    #[test]
    fn test_expired_entry_is_treated_as_miss() {
        let cache = ResponseCache::with_ttl(Duration::from_millis(10));
        cache.put("https://a.test/x", json!(1), "direct");

        thread::sleep(Duration::from_millis(20));

        assert!(cache.get("https://a.test/x").is_none());
    }

    #[test]
    fn test_put_overwrites_existing_entry() {
        let cache = ResponseCache::new();
        cache.put("https://a.test/x", json!(1), "direct");
        cache.put("https://a.test/x", json!(2), "CodeTabs Proxy");

        let hit = cache.get("https://a.test/x").expect("Should be a hit");
        assert_eq!(hit.data, json!(2));
        assert_eq!(hit.proxy_used, "CodeTabs Proxy");
    }

    #[test]
    fn test_overwrite_refreshes_the_timestamp() {
        let cache = ResponseCache::with_ttl(Duration::from_millis(40));
        cache.put("https://a.test/x", json!(1), "direct");
        thread::sleep(Duration::from_millis(25));
        cache.put("https://a.test/x", json!(2), "direct");
        thread::sleep(Duration::from_millis(25));

        // 50ms after the first put, 25ms after the second: still fresh
        let hit = cache.get("https://a.test/x").expect("Should be a hit");
        assert_eq!(hit.data, json!(2));
    }

    #[test]
    fn test_entries_are_keyed_by_url() {
        let cache = ResponseCache::new();
        cache.put("https://a.test/x", json!("x"), "direct");
        cache.put("https://a.test/y", json!("y"), "direct");

        assert_eq!(cache.get("https://a.test/x").unwrap().data, json!("x"));
        assert_eq!(cache.get("https://a.test/y").unwrap().data, json!("y"));
    }
}
