//! Configuration resolution
//!
//! Decrypts the `kms` entries of a configuration object once per resolver
//! and hands out the cached result afterwards.

mod error;
mod config_resolver;
mod shared;

pub use error::{ResolveError, ResolveResult};
pub use config_resolver::{ConfigResolver, FailurePolicy};
pub use shared::{install_shared_resolver, shared_resolver, shared_resolver_or_init};
