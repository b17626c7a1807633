//! Error types for record loading and configuration.

use thiserror::Error;

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors surfaced by record I/O and configuration loading.
///
/// Shape problems inside a record are never errors: the normalizer substitutes defaults.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration could not be serialized: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}
