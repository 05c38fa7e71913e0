use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML document could not be parsed.
    #[error("Failed to parse {path}: {source}")]
    ParseError {
        /// File (or pseudo-file) being parsed.
        path: String,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// A config file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadError {
        /// File being read.
        path: String,
        /// I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A value failed validation.
    #[error("Invalid value for {field}: {message}")]
    ValidationError {
        /// Dotted field path.
        field: String,
        /// What is wrong.
        message: String,
    },

    /// The resolved configuration could not be rendered.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),

    /// The home directory could not be determined.
    #[error("Could not determine the home directory")]
    NoHomeDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
