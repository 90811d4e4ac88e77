pub mod adapters;
pub mod app;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - value objects, models, and errors
pub use domain::{
    CacheKind,
    ConfigError,
    ObjectMetadata,
    Prefix,
    RemoteKey,
    StoreError,
    StoreResult,
    ValidationError,
    content_type_for_path,
};

// Configuration
pub use config::StoreConfig;

// Port traits - interfaces for external systems
pub use ports::ObjectStore;

// Service implementations - the caching and naming layer
pub use services::{
    ContentCache, ListingCache, OutputNamer, ThumbnailPipeline, THUMB_MAX_SIZE, hash_file,
};

// Application factory and configuration
pub use app::{AppBuilder, AppError, AppServices, create_app_from_env, create_in_memory_app};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{ApacheStoreAdapter, create_s3_store};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        ApacheStoreAdapter, AppBuilder, AppServices, CacheKind, ContentCache, ListingCache,
        ObjectStore, OutputNamer, Prefix, RemoteKey, StoreConfig, ThumbnailPipeline,
        create_app_from_env, create_in_memory_app,
    };
}
