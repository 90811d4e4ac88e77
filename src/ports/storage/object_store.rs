use std::path::Path;

use async_trait::async_trait;

use crate::domain::{errors::StoreResult, models::ObjectMetadata, value_objects::RemoteKey};

/// Port for object storage operations against one bucket.
/// This abstracts the actual storage backend and is the seam where tests
/// inject fakes.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Enumerate all keys under a prefix, in server-provided order.
    /// Pagination is handled transparently; callers see one sequence.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Fetch object metadata. Fails with [`StoreError::NotFound`] when the
    /// object does not exist.
    ///
    /// [`StoreError::NotFound`]: crate::domain::errors::StoreError::NotFound
    async fn head(&self, key: &RemoteKey) -> StoreResult<ObjectMetadata>;

    /// Check whether an object exists (head succeeded).
    async fn exists(&self, key: &RemoteKey) -> StoreResult<bool>;

    /// Fetch full object contents to a local path, creating parent
    /// directories as needed.
    async fn download(&self, key: &RemoteKey, dest: &Path) -> StoreResult<()>;

    /// Upload a local file. Transient store faults are retried by the
    /// implementation up to a fixed number of attempts.
    async fn upload(
        &self,
        local: &Path,
        key: &RemoteKey,
        content_type: Option<&str>,
    ) -> StoreResult<()>;
}
