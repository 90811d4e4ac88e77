// Storage implementations
pub mod apache_store_adapter;
pub mod s3;

// Re-export key types
pub use apache_store_adapter::ApacheStoreAdapter;
pub use s3::create_s3_store;
