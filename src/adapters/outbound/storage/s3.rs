//! S3 backend construction from resolved store configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use object_store::{aws::AmazonS3Builder, ObjectStore as ApacheObjectStore};

use crate::config::StoreConfig;

const DEFAULT_REGION: &str = "us-east-1";

/// Create the S3 store backend for a resolved configuration.
pub fn create_s3_store(config: &StoreConfig) -> Result<Arc<dyn ApacheObjectStore>> {
    let mut builder = AmazonS3Builder::new()
        .with_bucket_name(&config.bucket)
        .with_access_key_id(&config.access_key)
        .with_secret_access_key(&config.secret_key)
        .with_region(config.region.as_deref().unwrap_or(DEFAULT_REGION));

    if let Some(endpoint) = &config.endpoint {
        builder = builder.with_endpoint(endpoint);
        // Self-hosted endpoints (minio and friends) are commonly plain http.
        if endpoint.starts_with("http://") {
            builder = builder.with_allow_http(true);
        }
    }

    let store = builder.build().context("Failed to build S3 store")?;

    Ok(Arc::new(store))
}
