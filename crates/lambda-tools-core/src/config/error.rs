//! Configuration loading errors

use thiserror::Error;

/// Errors that can occur while loading a raw configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Expected a configuration object, found {0}")]
    NotAnObject(&'static str),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
