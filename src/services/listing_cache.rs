use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::errors::StoreResult;
use crate::domain::value_objects::{naming::extension_of, Prefix};
use crate::ports::storage::ObjectStore;

/// Cache of prefix listings with TTL expiry and manual invalidation.
///
/// Callers that just uploaded an object call [`invalidate`](Self::invalidate)
/// so the next listing sees it immediately, without every caller paying for a
/// forced refresh. With a non-positive TTL (the default) every call lists
/// fresh.
pub struct ListingCache {
    store: Arc<dyn ObjectStore>,
    ttl: Duration,
    state: Mutex<ListingState>,
}

#[derive(Default)]
struct ListingState {
    entries: HashMap<String, CachedListing>,
    force_refresh: bool,
}

struct CachedListing {
    fetched_at: Instant,
    keys: Vec<String>,
}

impl ListingCache {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self::with_ttl(store, Duration::ZERO)
    }

    pub fn with_ttl(store: Arc<dyn ObjectStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            state: Mutex::new(ListingState::default()),
        }
    }

    /// Request that the next lookup bypasses the cache. The flag is consumed
    /// by the fetch it triggers.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().expect("listing cache lock poisoned");
        state.force_refresh = true;
    }

    /// Full key listing for a prefix, cached or fresh. Keys are returned in
    /// server order and are not deduplicated; uniqueness is the store's
    /// responsibility.
    pub async fn list_objects(&self, prefix: &str, refresh: bool) -> StoreResult<Vec<String>> {
        let refresh = refresh || self.ttl.is_zero();

        if !refresh {
            let state = self.state.lock().expect("listing cache lock poisoned");
            if !state.force_refresh {
                if let Some(cached) = state.entries.get(prefix) {
                    if cached.fetched_at.elapsed() < self.ttl {
                        return Ok(cached.keys.clone());
                    }
                }
            }
        }

        let keys = self.store.list(prefix).await?;
        tracing::debug!(prefix, count = keys.len(), "listed objects");

        let mut state = self.state.lock().expect("listing cache lock poisoned");
        state.entries.insert(
            prefix.to_string(),
            CachedListing {
                fetched_at: Instant::now(),
                keys: keys.clone(),
            },
        );
        state.force_refresh = false;

        Ok(keys)
    }

    /// Relative media names under a prefix, filtered by extension and sorted.
    /// Directory markers and keys that strip to nothing are discarded.
    pub async fn list_media_keys(
        &self,
        prefix: &Prefix,
        extensions: &[&str],
        refresh: bool,
    ) -> StoreResult<Vec<String>> {
        let wanted: HashSet<String> = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        let keys = self.list_objects(prefix.as_str(), refresh).await?;

        let mut names: Vec<String> = keys
            .iter()
            .filter(|key| !key.ends_with('/'))
            .map(|key| prefix.strip(key))
            .filter(|rel| !rel.is_empty())
            .filter(|rel| wanted.contains(&extension_of(rel)))
            .map(str::to_string)
            .collect();
        names.sort();

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::domain::errors::StoreError;
    use crate::domain::models::ObjectMetadata;
    use crate::domain::value_objects::RemoteKey;

    struct FakeStore {
        keys: Vec<String>,
        list_calls: AtomicUsize,
    }

    impl FakeStore {
        fn new(keys: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                keys: keys.iter().map(|k| k.to_string()).collect(),
                list_calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ObjectStore for FakeStore {
        async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .keys
                .iter()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }

        async fn head(&self, key: &RemoteKey) -> StoreResult<ObjectMetadata> {
            Err(StoreError::NotFound {
                key: key.as_str().to_string(),
            })
        }

        async fn exists(&self, _key: &RemoteKey) -> StoreResult<bool> {
            Ok(false)
        }

        async fn download(&self, _key: &RemoteKey, _dest: &Path) -> StoreResult<()> {
            Ok(())
        }

        async fn upload(
            &self,
            _local: &Path,
            _key: &RemoteKey,
            _content_type: Option<&str>,
        ) -> StoreResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn zero_ttl_always_lists_fresh() {
        let store = FakeStore::new(&["in/a.png"]);
        let cache = ListingCache::new(store.clone());

        cache.list_objects("in/", false).await.unwrap();
        cache.list_objects("in/", false).await.unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn positive_ttl_serves_from_cache() {
        let store = FakeStore::new(&["in/a.png"]);
        let cache = ListingCache::with_ttl(store.clone(), Duration::from_secs(60));

        cache.list_objects("in/", false).await.unwrap();
        cache.list_objects("in/", false).await.unwrap();
        assert_eq!(store.calls(), 1);

        cache.list_objects("in/", true).await.unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_one_fresh_listing() {
        let store = FakeStore::new(&["in/a.png"]);
        let cache = ListingCache::with_ttl(store.clone(), Duration::from_secs(60));

        cache.list_objects("in/", false).await.unwrap();
        cache.invalidate();
        cache.list_objects("in/", false).await.unwrap();
        assert_eq!(store.calls(), 2);

        // The flag was consumed by the refetch.
        cache.list_objects("in/", false).await.unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn media_keys_are_filtered_stripped_and_sorted() {
        let store = FakeStore::new(&[
            "in/zebra.PNG",
            "in/archive.tar",
            "in/sub/",
            "in/cat.png",
            "in/clip.mp4",
        ]);
        let cache = ListingCache::new(store);
        let prefix = Prefix::new("in");

        let names = cache
            .list_media_keys(&prefix, &["png", ".MP4"], false)
            .await
            .unwrap();
        assert_eq!(names, vec!["cat.png", "clip.mp4", "zebra.PNG"]);
    }
}
