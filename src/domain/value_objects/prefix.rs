use crate::domain::errors::ValidationError;

use super::RemoteKey;

/// A normalized key namespace segment (input/output/thumbnail area of the
/// bucket). Invariant: no leading slash and exactly one trailing slash, or
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefix(String);

impl Prefix {
    /// Normalize a raw prefix string. Empty or slash-only input yields the
    /// empty prefix.
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            Self(String::new())
        } else {
            Self(format!("{}/", trimmed))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compose this prefix with a relative name into a full key.
    pub fn join(&self, name: &str) -> Result<RemoteKey, ValidationError> {
        let name = name.trim_start_matches('/');
        if self.0.is_empty() {
            RemoteKey::new(name)
        } else {
            RemoteKey::new(format!("{}{}", self.0, name))
        }
    }

    /// Strip this prefix from a full key, returning the relative name.
    /// Keys outside the prefix are returned unchanged.
    pub fn strip<'a>(&self, key: &'a str) -> &'a str {
        if !self.0.is_empty() {
            key.strip_prefix(self.0.as_str()).unwrap_or(key)
        } else {
            key
        }
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(Prefix::new("in").as_str(), "in/");
        assert_eq!(Prefix::new("/in/").as_str(), "in/");
        assert_eq!(Prefix::new("a/b").as_str(), "a/b/");
        assert_eq!(Prefix::new("").as_str(), "");
        assert_eq!(Prefix::new("///").as_str(), "");
    }

    #[test]
    fn join_strips_leading_slashes() {
        let prefix = Prefix::new("in");
        assert_eq!(prefix.join("/cat.png").unwrap().as_str(), "in/cat.png");

        let empty = Prefix::default();
        assert_eq!(empty.join("/cat.png").unwrap().as_str(), "cat.png");
    }

    #[test]
    fn strip_outside_prefix_is_identity() {
        let prefix = Prefix::new("in");
        assert_eq!(prefix.strip("out/cat.png"), "out/cat.png");
        assert_eq!(prefix.strip("in/cat.png"), "cat.png");
    }

    // For all keys K under prefix P: join(P, strip(P, K)) == K.
    #[test]
    fn strip_join_round_trip() {
        let cases = [
            ("in", "in/cat.png"),
            ("in", "in/sub/cat.png"),
            ("a/b", "a/b/c/d.mp4"),
            ("", "cat.png"),
            ("", "sub/cat.png"),
        ];
        for (raw_prefix, key) in cases {
            let prefix = Prefix::new(raw_prefix);
            let rel = prefix.strip(key);
            assert_eq!(prefix.join(rel).unwrap().as_str(), key);
        }
    }
}
