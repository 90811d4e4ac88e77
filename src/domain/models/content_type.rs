use std::path::Path;

use crate::domain::value_objects::naming::extension_of;

/// Content type sent with uploads, keyed by extension. Unknown extensions
/// send no override and let the store apply its default.
pub fn content_type_for_path(path: &Path) -> Option<&'static str> {
    let name = path.file_name()?.to_str()?;
    content_type_for_name(name)
}

pub fn content_type_for_name(name: &str) -> Option<&'static str> {
    match extension_of(name).as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        "mkv" => Some("video/x-matroska"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type_for_name("a.JPG"), Some("image/jpeg"));
        assert_eq!(content_type_for_name("a.jpeg"), Some("image/jpeg"));
        assert_eq!(content_type_for_name("a.png"), Some("image/png"));
        assert_eq!(content_type_for_name("clip.mov"), Some("video/quicktime"));
        assert_eq!(content_type_for_name("clip.mkv"), Some("video/x-matroska"));
    }

    #[test]
    fn unknown_extension_sends_no_override() {
        assert_eq!(content_type_for_name("archive.tar"), None);
        assert_eq!(content_type_for_name("noext"), None);
    }
}
