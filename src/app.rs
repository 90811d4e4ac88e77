use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use object_store::memory::InMemory;

use crate::{
    adapters::outbound::storage::{create_s3_store, ApacheStoreAdapter},
    config::StoreConfig,
    domain::{
        errors::{StoreResult, ValidationError},
        models::content_type_for_path,
        value_objects::{CacheKind, Prefix, RemoteKey},
    },
    ports::storage::ObjectStore,
    services::{hash_file, ContentCache, ListingCache, OutputNamer, ThumbnailPipeline},
};

const CACHE_DIR_NAME: &str = "s3-media-cache";

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] crate::domain::errors::ConfigError),

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Builder wiring configuration, store backend, and services together.
///
/// Config and store default to the environment and the S3 backend; both can
/// be injected, which is how tests run everything against fakes or the
/// in-memory backend.
pub struct AppBuilder {
    config: Option<StoreConfig>,
    store: Option<Arc<dyn ObjectStore>>,
    cache_root: Option<PathBuf>,
    listing_ttl: Duration,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            store: None,
            cache_root: None,
            listing_ttl: Duration::ZERO,
        }
    }

    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    pub fn with_listing_ttl(mut self, ttl: Duration) -> Self {
        self.listing_ttl = ttl;
        self
    }

    pub fn build(self) -> Result<AppServices, AppError> {
        let config = match self.config {
            Some(config) => config,
            None => StoreConfig::resolve()?.clone(),
        };
        let config = Arc::new(config);

        let store: Arc<dyn ObjectStore> = match self.store {
            Some(store) => store,
            None => {
                let backend =
                    create_s3_store(&config).map_err(|e| AppError::StorageInit {
                        message: e.to_string(),
                    })?;
                Arc::new(ApacheStoreAdapter::new(backend))
            }
        };

        let cache_root = self
            .cache_root
            .unwrap_or_else(|| std::env::temp_dir().join(CACHE_DIR_NAME));

        let content = Arc::new(ContentCache::new(store.clone(), cache_root));
        let listing = ListingCache::with_ttl(store.clone(), self.listing_ttl);
        let names = OutputNamer::new(store.clone(), config.clone());
        let thumbnails = ThumbnailPipeline::new(store.clone(), content.clone(), config.clone());

        Ok(AppServices {
            config,
            store,
            listing,
            content,
            names,
            thumbnails,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Service container and the boundary the host pipeline calls into.
pub struct AppServices {
    pub config: Arc<StoreConfig>,
    pub store: Arc<dyn ObjectStore>,
    pub listing: ListingCache,
    pub content: Arc<ContentCache>,
    pub names: OutputNamer,
    pub thumbnails: ThumbnailPipeline,
}

impl AppServices {
    /// Compose the input key for a relative name.
    pub fn input_key_for(&self, name: &str) -> Result<RemoteKey, ValidationError> {
        self.config.input_key_for(name)
    }

    /// Compose the input key for a relative name, accepting already-prefixed
    /// names unchanged.
    pub fn resolve_input_key(&self, name: &str) -> Result<RemoteKey, ValidationError> {
        self.config.resolve_input_key(name)
    }

    /// Compose an output key under an optional subfolder.
    pub fn output_key_for(
        &self,
        subfolder: &str,
        filename: &str,
    ) -> Result<RemoteKey, ValidationError> {
        self.config.output_key_for(subfolder, filename)
    }

    /// Mirror a remote object into the local cache and return its path.
    pub async fn fetch_cached(&self, key: &RemoteKey) -> StoreResult<PathBuf> {
        self.content.fetch(key, CacheKind::Objects, false).await
    }

    /// Upload a local file, with the content type inferred from its
    /// extension.
    pub async fn upload(&self, local: &Path, key: &RemoteKey) -> StoreResult<()> {
        self.store
            .upload(local, key, content_type_for_path(local))
            .await
    }

    /// Ensure and upload a thumbnail for an image source.
    pub async fn ensure_thumbnail(
        &self,
        local_source: &Path,
        source_key: &RemoteKey,
    ) -> StoreResult<PathBuf> {
        self.thumbnails
            .ensure_thumbnail(local_source, source_key)
            .await
    }

    /// Sorted relative media names under a prefix.
    pub async fn list_media_keys(
        &self,
        prefix: &Prefix,
        extensions: &[&str],
        refresh: bool,
    ) -> StoreResult<Vec<String>> {
        self.listing.list_media_keys(prefix, extensions, refresh).await
    }

    pub async fn object_exists(&self, key: &RemoteKey) -> StoreResult<bool> {
        self.store.exists(key).await
    }

    /// Make the next listing see objects uploaded since the last one.
    pub fn invalidate_listing_cache(&self) {
        self.listing.invalidate();
    }

    /// Collision-free output names for a batch of files.
    pub async fn reserve_output_names(
        &self,
        subfolder: &str,
        filenames: &[String],
    ) -> StoreResult<(Vec<String>, Vec<RemoteKey>)> {
        self.names.reserve_names(subfolder, filenames).await
    }

    /// Digest of a purely local file, for change detection before any remote
    /// ETag exists.
    pub fn file_hash(&self, path: &Path) -> StoreResult<String> {
        hash_file(path)
    }
}

/// Create services backed by the in-memory store, for tests and development.
pub fn create_in_memory_app(
    config: StoreConfig,
    cache_root: impl Into<PathBuf>,
) -> Result<AppServices, AppError> {
    let adapter = Arc::new(ApacheStoreAdapter::new(Arc::new(InMemory::new())));
    AppBuilder::new()
        .with_config(config)
        .with_store(adapter)
        .with_cache_root(cache_root)
        .build()
}

/// Create services from environment variables (a `.env` file is honored).
pub fn create_app_from_env() -> Result<AppServices, AppError> {
    dotenvy::dotenv().ok();
    AppBuilder::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Prefix;

    fn test_config() -> StoreConfig {
        StoreConfig {
            endpoint: None,
            region: None,
            access_key: "ak".to_string(),
            secret_key: "sk".to_string(),
            bucket: "bucket".to_string(),
            input_prefix: Prefix::new("in"),
            output_prefix: Prefix::new("out"),
            thumb_prefix: Prefix::new("thumbs"),
        }
    }

    #[tokio::test]
    async fn in_memory_app_round_trips_an_object() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = create_in_memory_app(test_config(), dir.path().join("cache")).unwrap();

        let local = dir.path().join("cat.png");
        tokio::fs::write(&local, b"png bytes").await.unwrap();

        let key = app.input_key_for("cat.png").unwrap();
        assert_eq!(key.as_str(), "in/cat.png");

        app.upload(&local, &key).await.unwrap();
        assert!(app.object_exists(&key).await.unwrap());

        let cached = app.fetch_cached(&key).await.unwrap();
        assert_eq!(tokio::fs::read(&cached).await.unwrap(), b"png bytes");
    }

    #[test]
    fn builder_requires_no_env_when_fully_injected() {
        let dir = tempfile::TempDir::new().unwrap();
        let app = create_in_memory_app(test_config(), dir.path()).unwrap();
        assert_eq!(app.config.bucket, "bucket");
    }
}
