use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::value_objects::{CacheKind, RemoteKey};
use crate::ports::storage::ObjectStore;

/// On-disk mirror of remote objects with ETag change detection.
///
/// Layout: `<root>/<kind>/<remote key with separators translated>`, each file
/// accompanied by a `.etag` sidecar holding the unquoted ETag of its last
/// known-good download. The cache grows monotonically; cleanup is external.
pub struct ContentCache {
    store: Arc<dyn ObjectStore>,
    root: PathBuf,
}

impl ContentCache {
    pub fn new(store: Arc<dyn ObjectStore>, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Deterministic local path for a cached object.
    pub fn local_path(&self, kind: CacheKind, key: &RemoteKey) -> PathBuf {
        let mut path = self.root.join(kind.as_str());
        for segment in key.as_str().split('/') {
            path.push(segment);
        }
        path
    }

    fn etag_path(cache_path: &Path) -> PathBuf {
        let mut name = cache_path.as_os_str().to_os_string();
        name.push(".etag");
        PathBuf::from(name)
    }

    fn read_sidecar(path: &Path) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text.trim().to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(path, err)),
        }
    }

    fn write_sidecar(path: &Path, etag: &str) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        std::fs::write(path, etag).map_err(|e| StoreError::io(path, e))
    }

    /// Ensure the object is mirrored locally and fresh, returning its path.
    ///
    /// Re-downloads when `refresh` is set, when no local file exists, or when
    /// the remote ETag is non-empty and differs from the recorded one. An
    /// object whose store reports no ETag is treated as up to date once
    /// downloaded; there is no signal to detect its staleness.
    pub async fn fetch(
        &self,
        key: &RemoteKey,
        kind: CacheKind,
        refresh: bool,
    ) -> StoreResult<PathBuf> {
        let cache_path = self.local_path(kind, key);
        let etag_path = Self::etag_path(&cache_path);

        let remote = self.store.head(key).await?;
        let remote_etag = remote.etag_str();
        let local_etag = Self::read_sidecar(&etag_path)?;

        let stale = refresh
            || !cache_path.exists()
            || (!remote_etag.is_empty() && local_etag.as_deref() != Some(remote_etag));

        if stale {
            tracing::debug!(key = %key, kind = %kind, refresh, "cache stale, downloading");
            self.store.download(key, &cache_path).await?;
            if !remote_etag.is_empty() {
                Self::write_sidecar(&etag_path, remote_etag)?;
            }
        }

        Ok(cache_path)
    }
}
