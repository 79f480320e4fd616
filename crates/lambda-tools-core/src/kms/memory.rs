//! In-memory key decryptor

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use super::traits::{DecryptError, DecryptResult, KeyDecryptor};

/// In-memory key decryptor for testing and local runs
///
/// Maps ciphertext blobs to plaintext, can be told to fail for specific
/// blobs, and counts every call so tests can assert how often the key
/// service was hit.
///
/// # Thread Safety
///
/// All state sits behind locks or atomics; share it freely via `Arc`.
#[derive(Debug, Default)]
pub struct MemoryKeyDecryptor {
    plaintexts: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    failures: RwLock<HashMap<Vec<u8>, DecryptError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    calls_by_ciphertext: Mutex<HashMap<Vec<u8>, usize>>,
}

impl MemoryKeyDecryptor {
    /// Create a decryptor that knows no ciphertexts
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ciphertext/plaintext pair (builder style)
    pub fn with_plaintext(self, ciphertext: impl AsRef<[u8]>, plaintext: impl AsRef<[u8]>) -> Self {
        self.insert(ciphertext, plaintext);
        self
    }

    /// Make every call wait before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Register a ciphertext/plaintext pair
    pub fn insert(&self, ciphertext: impl AsRef<[u8]>, plaintext: impl AsRef<[u8]>) {
        self.plaintexts
            .write()
            .insert(ciphertext.as_ref().to_vec(), plaintext.as_ref().to_vec());
    }

    /// Fail every decrypt of `ciphertext` with `error` until cleared
    pub fn fail_with(&self, ciphertext: impl AsRef<[u8]>, error: DecryptError) {
        self.failures.write().insert(ciphertext.as_ref().to_vec(), error);
    }

    /// Stop failing `ciphertext`
    pub fn clear_failure(&self, ciphertext: impl AsRef<[u8]>) {
        self.failures.write().remove(ciphertext.as_ref());
    }

    /// Total number of decrypt calls
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of decrypt calls for one ciphertext
    pub fn calls_for(&self, ciphertext: impl AsRef<[u8]>) -> usize {
        self.calls_by_ciphertext
            .lock()
            .get(ciphertext.as_ref())
            .copied()
            .unwrap_or(0)
    }

    /// Zero all call counters
    pub fn reset_counts(&self) {
        self.calls.store(0, Ordering::SeqCst);
        self.calls_by_ciphertext.lock().clear();
    }
}

#[async_trait]
impl KeyDecryptor for MemoryKeyDecryptor {
    fn name(&self) -> &str {
        "memory"
    }

    async fn decrypt(&self, ciphertext: &[u8]) -> DecryptResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .calls_by_ciphertext
            .lock()
            .entry(ciphertext.to_vec())
            .or_insert(0) += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.failures.read().get(ciphertext) {
            return Err(err.clone());
        }

        self.plaintexts
            .read()
            .get(ciphertext)
            .cloned()
            .ok_or_else(|| {
                DecryptError::InvalidCiphertext(format!(
                    "no key can decrypt a {} byte blob",
                    ciphertext.len()
                ))
            })
    }
}
