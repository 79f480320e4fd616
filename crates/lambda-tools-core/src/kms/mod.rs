//! Key-management decryption
//!
//! - `KeyDecryptor` trait for plugging in a key service
//! - `MemoryKeyDecryptor` for tests and local runs
//! - base64 helpers for ciphertext entries in config files

mod traits;
mod memory;
mod ciphertext;

pub use traits::{KeyDecryptor, DecryptError, DecryptResult};
pub use memory::MemoryKeyDecryptor;
pub use ciphertext::{decode_ciphertext, encode_ciphertext};
