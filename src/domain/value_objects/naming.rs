//! Filename arithmetic: extension handling, numeric suffixing, and
//! sanitization of user-supplied relative folders.

use crate::domain::errors::ValidationError;

/// Split a file name on the last dot: ("clip", ".mp4"). Names without an
/// extension yield an empty second part; a leading dot is not an extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Lowercased extension without the dot, or empty for extension-less names.
pub fn extension_of(name: &str) -> String {
    let (_, ext) = split_extension(name);
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Insert a numeric collision suffix before the extension:
/// `apply_suffix("out.png", 2)` is `"out (2).png"`. Suffix 0 leaves the name
/// unchanged.
pub fn apply_suffix(name: &str, suffix: u32) -> String {
    if suffix == 0 {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    format!("{} ({}){}", stem, suffix, ext)
}

/// Normalize a user-supplied subfolder: backslashes become slashes, current
/// directory collapses to empty, traversal and absolute paths are rejected.
pub fn sanitize_subfolder(value: &str) -> Result<String, ValidationError> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let normalized = value.replace('\\', "/");
    let segments: Vec<&str> = normalized
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if normalized.starts_with('/') || segments.iter().any(|s| *s == "..") {
        return Err(ValidationError::PathTraversal {
            value: value.to_string(),
        });
    }
    Ok(segments.join("/"))
}
