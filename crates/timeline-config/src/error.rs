//! Configuration error types.

/// Result type alias for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur during configuration loading and resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Unrecognized environment name.
    #[error("unknown environment '{0}' (expected 'development' or 'production')")]
    InvalidEnvironment(String),

    /// A configured base URL is not a valid absolute URL.
    #[error("invalid {field} '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
}
