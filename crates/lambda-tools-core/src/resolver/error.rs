//! Resolution errors

use thiserror::Error;

use crate::kms::DecryptError;

/// Errors that can occur while resolving a configuration
///
/// `Clone` because one failed resolution is handed to every caller that
/// awaited it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No configuration object was supplied
    #[error("Expected raw config object")]
    MissingInput,

    /// The configuration is not shaped as expected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A `kms` entry is not a base64 string
    #[error("kms entry '{key}' is not valid ciphertext: {reason}")]
    InvalidCiphertext { key: String, reason: String },

    /// The key service returned bytes that are not UTF-8
    #[error("kms entry '{key}' decrypted to invalid UTF-8")]
    InvalidPlaintext { key: String },

    /// The key service failed for a `kms` entry
    #[error("Failed to decrypt kms entry '{key}': {source}")]
    DecryptionFailure {
        key: String,
        #[source]
        source: DecryptError,
    },
}

impl ResolveError {
    /// The `kms` entry this error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            ResolveError::InvalidCiphertext { key, .. }
            | ResolveError::InvalidPlaintext { key }
            | ResolveError::DecryptionFailure { key, .. } => Some(key),
            ResolveError::MissingInput | ResolveError::InvalidConfig(_) => None,
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;
