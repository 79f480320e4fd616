//! Configuration objects
//!
//! - `RawConfig`: caller-owned input, optionally holding `kms` ciphertext entries
//! - `ResolvedConfig`: the same object with every ciphertext decrypted
//! - JSON/YAML loading from strings and files

mod error;
mod raw;
mod resolved;
mod file;

pub use error::{ConfigError, ConfigResult};
pub use raw::{RawConfig, KMS_KEY};
pub(crate) use raw::json_type_name;
pub use resolved::ResolvedConfig;
pub use file::ConfigFormat;
