//! lambda-tools Core
//!
//! Runtime-agnostic helpers for serverless request handlers:
//!
//! - `resolver`: decrypt the `kms` ciphertext entries of a configuration
//!   object once per process and serve the cached result afterwards
//! - `logging`: single-line `key=value` log records for log search backends
//!
//! ```rust,ignore
//! use lambda_tools_core::{ConfigResolver, Fields, KeyValueLogger, Level, RawConfig};
//!
//! let resolver = ConfigResolver::new(Arc::new(my_kms_client));
//! let config = resolver.resolve(Some(&RawConfig::from_path("config.json")?)).await?;
//!
//! let logger = KeyValueLogger::new(Some("checkout"), Level::Info);
//! logger.info(Fields::new().with("msg", "started").with("region", config.get("region").cloned().unwrap_or_default()));
//! ```

pub mod config;
pub mod kms;
pub mod logging;
pub mod resolver;

// Re-export commonly used types
pub use config::{ConfigError, ConfigFormat, ConfigResult, RawConfig, ResolvedConfig, KMS_KEY};

pub use kms::{KeyDecryptor, DecryptError, DecryptResult, MemoryKeyDecryptor};

pub use logging::{
    Logger, NoOpLogger, SharedLogger,
    KeyValueLogger, Level, Message, Fields, FieldValue,
    LineSink, StdoutSink, MemorySink,
    LogError, LogResult,
};

pub use resolver::{
    ConfigResolver, FailurePolicy, ResolveError, ResolveResult,
    install_shared_resolver, shared_resolver, shared_resolver_or_init,
};
