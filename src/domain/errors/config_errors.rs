/// Errors raised while resolving store configuration from the environment
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// One or more required variables are unset. All missing names are
    /// collected before failing so the operator gets the complete list.
    MissingVariables(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariables(names) => {
                write!(f, "Missing store configuration: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for ConfigError {}
