use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::{
    path::Path as ObjectPath, Attribute, AttributeValue, Attributes,
    ObjectStore as ApacheObjectStore, PutOptions, PutPayload,
};

use crate::{
    domain::{
        errors::{StoreError, StoreResult},
        models::ObjectMetadata,
        value_objects::RemoteKey,
    },
    ports::storage::ObjectStore,
};

const DEFAULT_UPLOAD_ATTEMPTS: u32 = 3;
const UPLOAD_BACKOFF: Duration = Duration::from_millis(500);

/// Adapter that implements our ObjectStore trait over Apache object_store
/// backends (AWS S3, in-memory, ...).
///
/// All store faults are translated to the domain taxonomy here; upper layers
/// never see transport errors.
pub struct ApacheStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
    upload_attempts: u32,
}

impl ApacheStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self {
            inner: store,
            upload_attempts: DEFAULT_UPLOAD_ATTEMPTS,
        }
    }

    pub fn with_upload_attempts(mut self, attempts: u32) -> Self {
        self.upload_attempts = attempts.max(1);
        self
    }

    fn to_object_path(key: &RemoteKey) -> ObjectPath {
        ObjectPath::from(key.as_str())
    }

    /// Translate a store fault into the domain taxonomy.
    fn convert_error(key: &str, err: object_store::Error) -> StoreError {
        match err {
            object_store::Error::NotFound { .. } => StoreError::NotFound {
                key: key.to_string(),
            },
            other => StoreError::Transfer {
                message: format!("store request failed for '{}'", key),
                source: Some(other.to_string()),
            },
        }
    }

    /// ETags arrive quoted from S3-compatible stores; the domain works with
    /// the raw token.
    fn strip_etag_quotes(etag: String) -> String {
        etag.trim_matches('"').to_string()
    }

    /// Linear backoff: 0.5 s times the attempt number just failed.
    fn backoff_delay(attempt: u32) -> Duration {
        UPLOAD_BACKOFF * attempt
    }
}

#[async_trait]
impl ObjectStore for ApacheStoreAdapter {
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let prefix_path = (!prefix.is_empty()).then(|| ObjectPath::from(prefix));

        let mut stream = self.inner.list(prefix_path.as_ref());
        let mut keys = Vec::new();
        while let Some(meta) = stream
            .try_next()
            .await
            .map_err(|e| Self::convert_error(prefix, e))?
        {
            keys.push(meta.location.to_string());
        }

        Ok(keys)
    }

    async fn head(&self, key: &RemoteKey) -> StoreResult<ObjectMetadata> {
        let path = Self::to_object_path(key);

        let meta = self
            .inner
            .head(&path)
            .await
            .map_err(|e| Self::convert_error(key.as_str(), e))?;

        Ok(ObjectMetadata {
            etag: meta.e_tag.map(Self::strip_etag_quotes),
            size: meta.size,
            last_modified: Some(meta.last_modified.into()),
            content_type: None,
        })
    }

    async fn exists(&self, key: &RemoteKey) -> StoreResult<bool> {
        match self.head(key).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn download(&self, key: &RemoteKey, dest: &Path) -> StoreResult<()> {
        let path = Self::to_object_path(key);

        let result = self
            .inner
            .get(&path)
            .await
            .map_err(|e| Self::convert_error(key.as_str(), e))?;

        let bytes = result.bytes().await.map_err(|e| StoreError::Transfer {
            message: format!("failed to read object body for '{}'", key),
            source: Some(e.to_string()),
        })?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| StoreError::io(dest, e))?;

        tracing::debug!(key = %key, dest = %dest.display(), size = bytes.len(), "downloaded object");
        Ok(())
    }

    async fn upload(
        &self,
        local: &Path,
        key: &RemoteKey,
        content_type: Option<&str>,
    ) -> StoreResult<()> {
        let path = Self::to_object_path(key);

        let data = tokio::fs::read(local)
            .await
            .map_err(|e| StoreError::io(local, e))?;
        let payload = PutPayload::from(Bytes::from(data));

        let mut attributes = Attributes::new();
        if let Some(ct) = content_type {
            attributes.insert(Attribute::ContentType, AttributeValue::from(ct.to_string()));
        }

        let mut attempt = 1;
        loop {
            let opts = PutOptions {
                attributes: attributes.clone(),
                ..Default::default()
            };
            match self.inner.put_opts(&path, payload.clone(), opts).await {
                Ok(_) => return Ok(()),
                Err(err) if attempt < self.upload_attempts => {
                    tracing::warn!(key = %key, attempt, error = %err, "upload failed, retrying");
                    tokio::time::sleep(Self::backoff_delay(attempt)).await;
                    attempt += 1;
                }
                Err(err) => return Err(Self::convert_error(key.as_str(), err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn adapter() -> ApacheStoreAdapter {
        ApacheStoreAdapter::new(Arc::new(InMemory::new()))
    }

    async fn put_local_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        tokio::fs::write(&path, contents).await.unwrap();
        path
    }

    #[tokio::test]
    async fn upload_head_download_round_trip() {
        let adapter = adapter();
        let dir = tempfile::TempDir::new().unwrap();
        let source = put_local_file(&dir, "cat.png", b"png bytes").await;

        let key = RemoteKey::new("in/cat.png").unwrap();
        adapter
            .upload(&source, &key, Some("image/png"))
            .await
            .unwrap();

        let meta = adapter.head(&key).await.unwrap();
        assert_eq!(meta.size, 9);
        assert!(meta.etag.is_some());
        // Quoting is already stripped at this boundary.
        assert!(!meta.etag_str().contains('"'));

        let dest = dir.path().join("fetched").join("cat.png");
        adapter.download(&key, &dest).await.unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"png bytes");
    }

    #[tokio::test]
    async fn head_of_missing_object_is_not_found() {
        let adapter = adapter();
        let key = RemoteKey::new("in/missing.png").unwrap();

        let err = adapter.head(&key).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!adapter.exists(&key).await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_full_keys_under_prefix() {
        let adapter = adapter();
        let dir = tempfile::TempDir::new().unwrap();
        let source = put_local_file(&dir, "f", b"x").await;

        for key in ["in/a.png", "in/sub/b.png", "out/c.png"] {
            adapter
                .upload(&source, &RemoteKey::new(key).unwrap(), None)
                .await
                .unwrap();
        }

        let mut keys = adapter.list("in").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["in/a.png", "in/sub/b.png"]);

        let all = adapter.list("").await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn overwrite_changes_etag() {
        let adapter = adapter();
        let dir = tempfile::TempDir::new().unwrap();
        let key = RemoteKey::new("in/cat.png").unwrap();

        let v1 = put_local_file(&dir, "v1", b"first").await;
        adapter.upload(&v1, &key, None).await.unwrap();
        let etag1 = adapter.head(&key).await.unwrap().etag;

        let v2 = put_local_file(&dir, "v2", b"second").await;
        adapter.upload(&v2, &key, None).await.unwrap();
        let etag2 = adapter.head(&key).await.unwrap().etag;

        assert_ne!(etag1, etag2);
    }

    #[test]
    fn backoff_is_linear_in_attempt_number() {
        assert_eq!(
            ApacheStoreAdapter::backoff_delay(1),
            Duration::from_millis(500)
        );
        assert_eq!(
            ApacheStoreAdapter::backoff_delay(2),
            Duration::from_millis(1000)
        );
        assert_eq!(
            ApacheStoreAdapter::backoff_delay(3),
            Duration::from_millis(1500)
        );
    }
}
