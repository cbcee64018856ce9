use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use business::domain::cache::{CacheInvalidator, CacheTag};

struct Entry {
    value: Value,
    tags: HashSet<CacheTag>,
    stored_at: Instant,
}

/// Read cache keyed by request path, where every entry carries the tags
/// that make it stale.
pub struct TaggedCache {
    entries: Mutex<HashMap<String, Entry>>,
    revalidate: Duration,
}

impl TaggedCache {
    pub fn new(revalidate: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            revalidate,
        }
    }

    // A poisoned lock only means another reader panicked; the map is still usable.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fresh value for `key`, or `None` when absent or older than the revalidate window.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries();
        let fresh = entries
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.revalidate)?;
        if !fresh {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn put(&self, key: impl Into<String>, value: Value, tags: &[CacheTag]) {
        self.entries().insert(
            key.into(),
            Entry {
                value,
                tags: tags.iter().cloned().collect(),
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl CacheInvalidator for TaggedCache {
    fn invalidate(&self, tags: &[CacheTag]) {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| !tags.iter().any(|tag| entry.tags.contains(tag)));
        tracing::debug!(
            dropped = before - entries.len(),
            tags = ?tags.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "cache entries invalidated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_drop_only_entries_carrying_an_invalidated_tag() {
        let cache = TaggedCache::new(Duration::from_secs(60));
        cache.put("/products", json!([1, 2]), &[CacheTag::Products]);
        cache.put(
            "/products/1",
            json!({"id": 1}),
            &[CacheTag::Products, CacheTag::Product(1)],
        );
        cache.put("/products/categories", json!(["home"]), &[CacheTag::Categories]);

        cache.invalidate(&[CacheTag::Product(1)]);

        assert!(cache.get("/products/1").is_none());
        assert_eq!(cache.get("/products"), Some(json!([1, 2])));
        assert_eq!(cache.get("/products/categories"), Some(json!(["home"])));
    }

    #[test]
    fn should_leave_cache_untouched_for_unknown_tags() {
        let cache = TaggedCache::new(Duration::from_secs(60));
        cache.put("/products", json!([]), &[CacheTag::Products]);

        cache.invalidate(&[CacheTag::Category("garden".to_string())]);

        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_expire_entries_after_revalidate_window() {
        let cache = TaggedCache::new(Duration::from_secs(60));
        cache.put("/products", json!([]), &[CacheTag::Products]);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("/products").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("/products").is_none());
        assert!(cache.is_empty());
    }
}
