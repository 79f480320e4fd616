//! Core trait and error type for key decryption

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a key decryption service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Invalid ciphertext: {0}")]
    InvalidCiphertext(String),

    #[error("Key service unavailable: {0}")]
    Unavailable(String),

    #[error("Decrypt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Decrypt error: {0}")]
    Other(String),
}

pub type DecryptResult<T> = Result<T, DecryptError>;

/// Key-management decrypt capability
///
/// The service is opaque: it takes a raw ciphertext blob and hands back the
/// plaintext bytes. Implementations wrap a cloud KMS client, or serve fixed
/// answers in tests (`MemoryKeyDecryptor`).
///
/// # Example
///
/// ```
/// use lambda_tools_core::kms::{KeyDecryptor, MemoryKeyDecryptor};
///
/// let kms = MemoryKeyDecryptor::new().with_plaintext(b"olleh", b"hello");
/// let plaintext = futures::executor::block_on(kms.decrypt(b"olleh")).unwrap();
/// assert_eq!(plaintext, b"hello".to_vec());
/// ```
#[async_trait]
pub trait KeyDecryptor: Send + Sync {
    /// Human-readable name of this service
    fn name(&self) -> &str;

    /// Decrypt one ciphertext blob
    async fn decrypt(&self, ciphertext: &[u8]) -> DecryptResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decrypt_error_display() {
        assert_eq!(
            DecryptError::AccessDenied("missing kms:Decrypt".to_string()).to_string(),
            "Access denied: missing kms:Decrypt"
        );
        assert_eq!(
            DecryptError::Timeout(Duration::from_millis(250)).to_string(),
            "Decrypt timed out after 250ms"
        );
    }
}
