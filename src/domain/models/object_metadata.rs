use std::time::SystemTime;

/// Metadata returned by a head operation.
///
/// The ETag is stored unquoted; store-specific quoting is stripped at the
/// adapter boundary. An absent ETag means the store provides no change
/// signal for the object.
#[derive(Debug, Clone, Default)]
pub struct ObjectMetadata {
    pub etag: Option<String>,
    pub size: u64,
    pub last_modified: Option<SystemTime>,
    pub content_type: Option<String>,
}

impl ObjectMetadata {
    /// The ETag as a change-detection token: unquoted, empty when the store
    /// provided none.
    pub fn etag_str(&self) -> &str {
        self.etag.as_deref().unwrap_or("")
    }
}
