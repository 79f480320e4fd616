//! Process-wide resolver slot
//!
//! A Lambda container keeps one resolver for its whole lifetime, so that the
//! key service is only asked once per cold start. The slot is filled
//! explicitly at startup; tests build their own `ConfigResolver` instead.

use once_cell::sync::OnceCell;

use super::config_resolver::ConfigResolver;

static SHARED_RESOLVER: OnceCell<ConfigResolver> = OnceCell::new();

/// Install the process-wide resolver
///
/// Returns the resolver back as `Err` if one is already installed.
pub fn install_shared_resolver(resolver: ConfigResolver) -> Result<(), ConfigResolver> {
    SHARED_RESOLVER.set(resolver)
}

/// The process-wide resolver, if installed
pub fn shared_resolver() -> Option<&'static ConfigResolver> {
    SHARED_RESOLVER.get()
}

/// The process-wide resolver, installing one built by `init` if there is none
pub fn shared_resolver_or_init(init: impl FnOnce() -> ConfigResolver) -> &'static ConfigResolver {
    SHARED_RESOLVER.get_or_init(init)
}
