/// Validation errors for domain value objects and user-supplied names
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // RemoteKey validation errors
    EmptyKey,
    KeyTooLong {
        actual: usize,
        max: usize,
    },
    InvalidKeyCharacter(char),
    KeyStartsWithSlash,
    KeyContainsDoubleSlash,

    // Relative-name validation errors
    PathTraversal {
        value: String,
    },
    EmptyFileName,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyKey => write!(f, "Remote key cannot be empty"),
            ValidationError::KeyTooLong { actual, max } => {
                write!(f, "Remote key too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidKeyCharacter(c) => {
                write!(f, "Invalid character in remote key: '{}'", c.escape_default())
            }
            ValidationError::KeyStartsWithSlash => {
                write!(f, "Remote key cannot start with '/'")
            }
            ValidationError::KeyContainsDoubleSlash => {
                write!(f, "Remote key cannot contain '//'")
            }
            ValidationError::PathTraversal { value } => {
                write!(f, "Relative path escapes its root: '{}'", value)
            }
            ValidationError::EmptyFileName => write!(f, "File name cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}
