//! One-time decryption of `kms` entries in a configuration object
//!
//! The first `resolve` call clones the caller's config, decrypts every
//! ciphertext under `kms` in parallel and caches the outcome. Every later
//! call, whatever it is given, returns the cached config without touching
//! the key service again.
//!
//! Architecture:
//! - The cache slot holds a single shared future; concurrent first callers
//!   all await that same future, so each ciphertext is decrypted once
//! - Input problems (missing config, malformed `kms`) are reported before
//!   anything is dispatched and never occupy the slot
//! - A failed resolution is kept or discarded according to `FailurePolicy`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::future::{try_join_all, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::error::{ResolveError, ResolveResult};
use crate::config::{json_type_name, RawConfig, ResolvedConfig, KMS_KEY};
use crate::kms::{decode_ciphertext, DecryptError, DecryptResult, KeyDecryptor};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::{log_debug, log_warn};

type Resolution = Shared<BoxFuture<'static, ResolveResult<ResolvedConfig>>>;

/// What happens to a resolution that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep the failure; every later call gets the same error without retrying
    #[default]
    Cache,
    /// Drop the failure once it settles; the next call starts over
    Retry,
}

/// The single cached resolution, tagged so a stale attempt never clears a newer one
struct CacheEntry {
    id: u64,
    resolution: Resolution,
}

#[derive(Default)]
struct ResolutionCache {
    slot: Mutex<Option<CacheEntry>>,
    next_id: AtomicU64,
}

impl ResolutionCache {
    fn clear_if(&self, id: u64) {
        let mut slot = self.slot.lock();
        if slot.as_ref().map(|entry| entry.id) == Some(id) {
            *slot = None;
        }
    }
}

/// A cloned config plus the decoded ciphertext blobs to decrypt
struct PreparedResolution {
    config: Map<String, Value>,
    entries: Vec<(String, Vec<u8>)>,
}

/// Resolves `kms` ciphertext entries once and caches the result
///
/// Clones share one cache. Create one resolver per process (see
/// `install_shared_resolver`) or one per test.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use lambda_tools_core::config::RawConfig;
/// use lambda_tools_core::kms::{encode_ciphertext, MemoryKeyDecryptor};
/// use lambda_tools_core::resolver::ConfigResolver;
///
/// let kms = Arc::new(MemoryKeyDecryptor::new().with_plaintext(b"olleh", b"hello"));
/// let resolver = ConfigResolver::new(kms.clone());
///
/// let raw = RawConfig::from_json_str(&format!(
///     r#"{{"foo": "bar", "kms": {{"secret": "{}"}}}}"#,
///     encode_ciphertext(b"olleh")
/// ))
/// .unwrap();
///
/// let resolved = futures::executor::block_on(resolver.resolve(Some(&raw))).unwrap();
/// assert_eq!(resolved.kms_value("secret"), Some("hello"));
///
/// // Cached: no further decrypt calls
/// futures::executor::block_on(resolver.resolve(None)).unwrap();
/// assert_eq!(kms.call_count(), 1);
/// ```
#[derive(Clone)]
pub struct ConfigResolver {
    decryptor: Arc<dyn KeyDecryptor>,
    logger: SharedLogger,
    failure_policy: FailurePolicy,
    decrypt_timeout: Option<Duration>,
    cache: Arc<ResolutionCache>,
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("decryptor", &self.decryptor.name())
            .field("failure_policy", &self.failure_policy)
            .field("decrypt_timeout", &self.decrypt_timeout)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

impl ConfigResolver {
    /// Create a resolver backed by `decryptor`
    pub fn new(decryptor: Arc<dyn KeyDecryptor>) -> Self {
        Self {
            decryptor,
            logger: Arc::new(NoOpLogger::new()),
            failure_policy: FailurePolicy::default(),
            decrypt_timeout: None,
            cache: Arc::new(ResolutionCache::default()),
        }
    }

    /// Set the logger for resolver diagnostics
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Choose whether failed resolutions are cached
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Fail any single decrypt that takes longer than `timeout`
    ///
    /// Off by default.
    ///
    /// # Panics
    ///
    /// Resolving with a timeout set panics unless it runs inside a Tokio
    /// runtime with the time driver enabled; `futures::executor::block_on`
    /// is not enough.
    pub fn with_decrypt_timeout(mut self, timeout: Duration) -> Self {
        self.decrypt_timeout = Some(timeout);
        self
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    /// Resolve `raw`, or return the cached resolution
    ///
    /// `raw` is only read on the first call (or, under
    /// `FailurePolicy::Retry`, the first call after a failure). It is never
    /// modified. `None` with nothing cached fails with `MissingInput`.
    pub async fn resolve(&self, raw: Option<&RawConfig>) -> ResolveResult<ResolvedConfig> {
        let (resolution, reused) = {
            let mut slot = self.cache.slot.lock();
            match slot.as_ref() {
                Some(entry) => (entry.resolution.clone(), true),
                None => {
                    let raw = raw.ok_or(ResolveError::MissingInput)?;
                    let prepared = prepare(raw)?;
                    let id = self.cache.next_id.fetch_add(1, Ordering::SeqCst);
                    let resolution = self.start(id, prepared);
                    *slot = Some(CacheEntry {
                        id,
                        resolution: resolution.clone(),
                    });
                    (resolution, false)
                }
            }
        };

        // The slot lock is released before any logger runs
        if reused {
            log_debug!(self.logger, "Config already resolving or resolved, reusing it");
        }

        resolution.await
    }

    /// Whether a successful resolution is cached
    pub fn is_resolved(&self) -> bool {
        self.cached().is_some()
    }

    /// The cached config, if resolution has succeeded
    pub fn cached(&self) -> Option<ResolvedConfig> {
        let slot = self.cache.slot.lock();
        match slot.as_ref()?.resolution.peek() {
            Some(Ok(config)) => Some(config.clone()),
            _ => None,
        }
    }

    /// Forget any cached or in-flight resolution
    ///
    /// Callers already awaiting an in-flight resolution still receive its outcome.
    pub fn reset(&self) {
        *self.cache.slot.lock() = None;
    }

    fn start(&self, id: u64, prepared: PreparedResolution) -> Resolution {
        let decryptor = Arc::clone(&self.decryptor);
        let logger = Arc::clone(&self.logger);
        let timeout = self.decrypt_timeout;
        let retry = self.failure_policy == FailurePolicy::Retry;
        let cache: Weak<ResolutionCache> = Arc::downgrade(&self.cache);

        async move {
            let result = decrypt_all(decryptor, Arc::clone(&logger), timeout, prepared).await;
            if let Err(err) = &result {
                log_warn!(logger, "Config resolution failed: {}", err);
                if retry {
                    if let Some(cache) = cache.upgrade() {
                        cache.clear_if(id);
                    }
                }
            }
            result
        }
        .boxed()
        .shared()
    }
}

/// Clone the config and decode every ciphertext entry
fn prepare(raw: &RawConfig) -> ResolveResult<PreparedResolution> {
    let config = raw.as_map().clone();

    let entries = match config.get(KMS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(kms)) => kms
            .iter()
            .map(|(key, value)| {
                let encoded = value.as_str().ok_or_else(|| ResolveError::InvalidCiphertext {
                    key: key.clone(),
                    reason: format!("expected a base64 string, found {}", json_type_name(value)),
                })?;
                let blob = decode_ciphertext(encoded).map_err(|e| ResolveError::InvalidCiphertext {
                    key: key.clone(),
                    reason: e.to_string(),
                })?;
                Ok((key.clone(), blob))
            })
            .collect::<ResolveResult<Vec<_>>>()?,
        Some(other) => {
            return Err(ResolveError::InvalidConfig(format!(
                "'{}' must be an object, found {}",
                KMS_KEY,
                json_type_name(other)
            )))
        }
    };

    Ok(PreparedResolution { config, entries })
}

/// Decrypt all entries concurrently and write the plaintexts into the clone
async fn decrypt_all(
    decryptor: Arc<dyn KeyDecryptor>,
    logger: SharedLogger,
    timeout: Option<Duration>,
    prepared: PreparedResolution,
) -> ResolveResult<ResolvedConfig> {
    let PreparedResolution { mut config, entries } = prepared;
    log_debug!(
        logger,
        "Decrypting {} kms entries via {}",
        entries.len(),
        decryptor.name()
    );

    let requests = entries.into_iter().map(|(key, blob)| {
        let decryptor = Arc::clone(&decryptor);
        async move {
            let plaintext = decrypt_with_deadline(decryptor.as_ref(), &blob, timeout)
                .await
                .map_err(|source| ResolveError::DecryptionFailure {
                    key: key.clone(),
                    source,
                })?;
            let plaintext = String::from_utf8(plaintext)
                .map_err(|_| ResolveError::InvalidPlaintext { key: key.clone() })?;
            Ok::<_, ResolveError>((key, plaintext))
        }
    });

    // Nothing is written until every request has succeeded
    let plaintexts = try_join_all(requests).await?;

    if let Some(Value::Object(kms)) = config.get_mut(KMS_KEY) {
        for (key, plaintext) in plaintexts {
            kms.insert(key, Value::String(plaintext));
        }
    }

    log_debug!(logger, "Config resolved");
    Ok(ResolvedConfig::new(config))
}

async fn decrypt_with_deadline(
    decryptor: &dyn KeyDecryptor,
    blob: &[u8],
    deadline: Option<Duration>,
) -> DecryptResult<Vec<u8>> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, decryptor.decrypt(blob))
            .await
            .unwrap_or(Err(DecryptError::Timeout(limit))),
        None => decryptor.decrypt(blob).await,
    }
}
