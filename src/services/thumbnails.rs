use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageReader};

use crate::config::StoreConfig;
use crate::domain::errors::{StoreError, StoreResult};
use crate::domain::value_objects::{CacheKind, RemoteKey};
use crate::ports::storage::ObjectStore;
use crate::services::ContentCache;

/// Neither thumbnail dimension exceeds this bound.
pub const THUMB_MAX_SIZE: u32 = 256;

const THUMB_JPEG_QUALITY: u8 = 85;

/// Derives bounded JPEG previews for image sources and keeps the remote
/// thumbnail area in sync. Video sources are handled by callers and never
/// reach this pipeline.
pub struct ThumbnailPipeline {
    store: Arc<dyn ObjectStore>,
    cache: Arc<ContentCache>,
    config: Arc<StoreConfig>,
}

impl ThumbnailPipeline {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        cache: Arc<ContentCache>,
        config: Arc<StoreConfig>,
    ) -> Self {
        Self {
            store,
            cache,
            config,
        }
    }

    /// Ensure a local thumbnail exists for the source and upload it.
    ///
    /// Generation is skipped when the local thumbnail is already cached, but
    /// the upload is not: the remote copy can be missing even when the local
    /// cache has one.
    pub async fn ensure_thumbnail(
        &self,
        local_source: &Path,
        source_key: &RemoteKey,
    ) -> StoreResult<PathBuf> {
        let thumb_key = self.config.thumb_key_for(source_key)?;
        let thumb_path = self.cache.local_path(CacheKind::Thumbs, &thumb_key);

        if !thumb_path.exists() {
            if let Some(parent) = thumb_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
            generate_thumbnail(local_source, &thumb_path)?;
            tracing::debug!(source = %local_source.display(), thumb = %thumb_path.display(), "generated thumbnail");
        }

        self.store
            .upload(&thumb_path, &thumb_key, Some("image/jpeg"))
            .await?;

        Ok(thumb_path)
    }
}

fn image_error(path: &Path, err: image::ImageError) -> StoreError {
    StoreError::Image {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Decode, correct embedded orientation, reduce to a JPEG-friendly
/// colorspace, bound dimensions without upscaling, and encode.
fn generate_thumbnail(source: &Path, dest: &Path) -> StoreResult<()> {
    let reader = ImageReader::open(source)
        .map_err(|e| StoreError::io(source, e))?
        .with_guessed_format()
        .map_err(|e| StoreError::io(source, e))?;
    let mut decoder = reader.into_decoder().map_err(|e| image_error(source, e))?;
    let orientation = decoder.orientation().map_err(|e| image_error(source, e))?;
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| image_error(source, e))?;
    img.apply_orientation(orientation);

    let img = match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let (width, height) = img.dimensions();
    let img = if width > THUMB_MAX_SIZE || height > THUMB_MAX_SIZE {
        img.thumbnail(THUMB_MAX_SIZE, THUMB_MAX_SIZE)
    } else {
        img
    };

    let file = File::create(dest).map_err(|e| StoreError::io(dest, e))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, THUMB_JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .map_err(|e| image_error(dest, e))?;

    Ok(())
}
