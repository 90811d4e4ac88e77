use super::{ConfigError, ValidationError};

/// Errors that can occur during store and cache operations
#[derive(Debug)]
pub enum StoreError {
    /// Remote object absent. Recoverable; callers branch on it.
    NotFound { key: String },

    /// Network or store fault during a remote operation
    Transfer {
        message: String,
        source: Option<String>,
    },

    /// Local filesystem fault
    Io { path: String, message: String },

    /// Thumbnail decode/encode fault
    Image { path: String, message: String },

    /// Malformed user-supplied key or relative path
    Validation(ValidationError),

    /// Missing or invalid store configuration
    Configuration(ConfigError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound { key } => {
                write!(f, "Remote object not found: {}", key)
            }
            StoreError::Transfer { message, .. } => {
                write!(f, "Store transfer failed: {}", message)
            }
            StoreError::Io { path, message } => {
                write!(f, "I/O error on '{}': {}", path, message)
            }
            StoreError::Image { path, message } => {
                write!(f, "Image processing failed for '{}': {}", path, message)
            }
            StoreError::Validation(err) => write!(f, "{}", err),
            StoreError::Configuration(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err)
    }
}

impl From<ConfigError> for StoreError {
    fn from(err: ConfigError) -> Self {
        StoreError::Configuration(err)
    }
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
