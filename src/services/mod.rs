mod content_cache;
mod hashing;
mod listing_cache;
mod output_names;
mod thumbnails;

pub use content_cache::ContentCache;
pub use hashing::hash_file;
pub use listing_cache::ListingCache;
pub use output_names::OutputNamer;
pub use thumbnails::{ThumbnailPipeline, THUMB_MAX_SIZE};
