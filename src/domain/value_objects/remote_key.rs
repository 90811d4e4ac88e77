use crate::domain::errors::ValidationError;

/// A validated object key (full path inside the bucket, prefix included)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteKey(String);

impl RemoteKey {
    /// Create a new RemoteKey with validation
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if value.is_empty() {
            return Err(ValidationError::EmptyKey);
        }

        if value.len() > 1024 {
            return Err(ValidationError::KeyTooLong {
                actual: value.len(),
                max: 1024,
            });
        }

        if value.contains('\0') {
            return Err(ValidationError::InvalidKeyCharacter('\0'));
        }

        if value.starts_with('/') {
            return Err(ValidationError::KeyStartsWithSlash);
        }

        if value.contains("//") {
            return Err(ValidationError::KeyContainsDoubleSlash);
        }

        // User-supplied names compose into keys, so traversal segments are
        // rejected here, before any filesystem or network operation.
        if value.split('/').any(|segment| segment == "..") {
            return Err(ValidationError::PathTraversal { value });
        }

        Ok(Self(value))
    }

    /// Get the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the file name part of the key (everything after the last '/')
    pub fn file_name(&self) -> &str {
        self.0.rfind('/').map_or(&self.0, |idx| &self.0[idx + 1..])
    }

    /// Check if this key has the given prefix
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
