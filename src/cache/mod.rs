//! In-memory content cache
//!
//! Holds the results of the last scans of one content directory. Every
//! entry shares a single refresh timestamp, so all of them expire together
//! once the time-to-live has elapsed.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::content::ContentItem;

/// Default time-to-live for cached content
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Key of a cached result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The full, sorted listing
    All,
    /// A single document looked up by slug
    Item(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::All => f.write_str("all"),
            CacheKey::Item(slug) => write!(f, "item:{}", slug),
        }
    }
}

/// A cached result
#[derive(Debug, Clone)]
pub enum CacheEntry {
    List(Arc<Vec<ContentItem>>),
    Item(Arc<ContentItem>),
}

/// Cache of scan results with one shared refresh timestamp
#[derive(Debug)]
pub struct ContentCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
    refreshed_at: Option<Instant>,
}

impl ContentCache {
    /// Create an empty cache
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
            refreshed_at: None,
        }
    }

    /// Whether cached entries are still valid at `now`
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.refreshed_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.ttl)
    }

    /// Look up `key`, dropping every entry first if the cache has expired
    pub fn get(&mut self, key: &CacheKey, now: Instant) -> Option<CacheEntry> {
        if !self.is_fresh(now) {
            if !self.entries.is_empty() {
                tracing::debug!("Cache expired, dropping {} entries", self.entries.len());
            }
            self.clear();
            return None;
        }
        self.entries.get(key).cloned()
    }

    /// Store the result of a full rescan.
    ///
    /// Starts a new generation: older entries are dropped and the refresh
    /// timestamp moves to `now`, so no entry outlives the TTL.
    pub fn store_listing(&mut self, items: Arc<Vec<ContentItem>>, now: Instant) {
        self.entries.clear();
        self.entries.insert(CacheKey::All, CacheEntry::List(items));
        self.refreshed_at = Some(now);
    }

    /// Store a single item within the current generation.
    ///
    /// The refresh timestamp is only set when the cache was empty; an item
    /// lookup never extends the lifetime of older entries.
    pub fn store_item(&mut self, slug: &str, item: Arc<ContentItem>, now: Instant) {
        if !self.is_fresh(now) {
            self.clear();
        }
        if self.refreshed_at.is_none() {
            self.refreshed_at = Some(now);
        }
        self.entries
            .insert(CacheKey::Item(slug.to_string()), CacheEntry::Item(item));
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
        self.refreshed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn item(slug: &str) -> ContentItem {
        ContentItem {
            slug: slug.to_string(),
            title: slug.to_string(),
            date: "2024-01-01".to_string(),
            description: String::new(),
            category: None,
            read_time: "1 min read".to_string(),
            content: String::new(),
            extra: IndexMap::new(),
        }
    }

    fn listing(slugs: &[&str]) -> Arc<Vec<ContentItem>> {
        Arc::new(slugs.iter().map(|s| item(s)).collect())
    }

    #[test]
    fn test_key_display() {
        assert_eq!(CacheKey::All.to_string(), "all");
        assert_eq!(CacheKey::Item("hello".into()).to_string(), "item:hello");
    }

    #[test]
    fn test_empty_cache_misses() {
        let mut cache = ContentCache::new(Duration::from_secs(60));
        assert!(cache.get(&CacheKey::All, Instant::now()).is_none());
        assert!(!cache.is_fresh(Instant::now()));
    }

    #[test]
    fn test_listing_hit_within_ttl() {
        let mut cache = ContentCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.store_listing(listing(&["a", "b"]), t0);

        let hit = cache.get(&CacheKey::All, t0 + Duration::from_secs(59));
        match hit {
            Some(CacheEntry::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected listing, got {:?}", other),
        }
    }

    #[test]
    fn test_everything_expires_together() {
        let mut cache = ContentCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.store_listing(listing(&["a"]), t0);
        cache.store_item("a", Arc::new(item("a")), t0 + Duration::from_secs(30));
        assert_eq!(cache.entries.len(), 2);

        let later = t0 + Duration::from_secs(60);
        assert!(cache.get(&CacheKey::Item("a".into()), later).is_none());
        assert!(cache.entries.is_empty());
    }

    #[test]
    fn test_item_store_does_not_extend_listing() {
        let mut cache = ContentCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.store_listing(listing(&["a"]), t0);
        cache.store_item("a", Arc::new(item("a")), t0 + Duration::from_secs(50));

        assert!(cache
            .get(&CacheKey::All, t0 + Duration::from_secs(61))
            .is_none());
    }

    #[test]
    fn test_item_store_after_expiry_starts_fresh() {
        let mut cache = ContentCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.store_listing(listing(&["a"]), t0);

        let t1 = t0 + Duration::from_secs(120);
        cache.store_item("b", Arc::new(item("b")), t1);
        assert_eq!(cache.entries.len(), 1);
        assert!(cache.get(&CacheKey::All, t1).is_none());
        assert!(cache
            .get(&CacheKey::Item("b".into()), t1 + Duration::from_secs(10))
            .is_some());
    }

    #[test]
    fn test_listing_starts_new_generation() {
        let mut cache = ContentCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.store_item("old", Arc::new(item("old")), t0);
        cache.store_listing(listing(&["a"]), t0 + Duration::from_secs(30));

        let t1 = t0 + Duration::from_secs(31);
        assert!(cache.get(&CacheKey::Item("old".into()), t1).is_none());
        assert!(cache.get(&CacheKey::All, t1).is_some());
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let mut cache = ContentCache::new(Duration::ZERO);
        let t0 = Instant::now();
        cache.store_listing(listing(&["a"]), t0);
        assert!(cache.get(&CacheKey::All, t0).is_none());
    }
}
