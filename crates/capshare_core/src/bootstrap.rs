//! Module-initialization wiring for the shared extension store.
//!
//! # Responsibility
//! - Create the process-wide [`ExtensionStore`] and publish it once under
//!   [`EXTENSIONS_NAMESPACE`]:[`EXTENSIONS_MODULE`].
//! - Give plugins a typed way to import the published store.

use crate::extensions::store::ExtensionStore;
use crate::host::HostProvider;
use crate::publisher::publish;
use crate::registry::{lookup_as, Capability, ModuleKey, RegistryResult};
use std::sync::Arc;

/// Namespace the extension store is published under.
pub const EXTENSIONS_NAMESPACE: &str = "jenkins-cd";
/// Module name the extension store is published under.
pub const EXTENSIONS_MODULE: &str = "js-extensions";

/// Creates the shared extension store and publishes it to the host.
///
/// Returns the published handle so the caller can keep using the exact
/// instance other plugins will import.
///
/// # Errors
/// - Propagates publish errors unchanged; nothing is published on failure.
pub fn publish_extensions(host: &impl HostProvider) -> RegistryResult<Arc<ExtensionStore>> {
    let store = Arc::new(ExtensionStore::new());
    let capability =
        Capability::new(Arc::clone(&store)).with_version(env!("CARGO_PKG_VERSION"));
    publish(host, EXTENSIONS_NAMESPACE, EXTENSIONS_MODULE, capability)?;
    Ok(store)
}

/// Imports the extension store previously published to `host`.
///
/// # Errors
/// - `HostUnavailable` when the host cannot provide its registry.
/// - `NotFound` when nothing was published yet.
/// - `TypeMismatch` when the key holds something other than the store.
pub fn import_extensions(host: &impl HostProvider) -> RegistryResult<Arc<ExtensionStore>> {
    let registry = host.registry()?;
    let key = extensions_key()?;
    lookup_as::<ExtensionStore>(&*registry, &key)
}

/// Registry key of the shared extension store.
pub fn extensions_key() -> RegistryResult<ModuleKey> {
    Ok(ModuleKey::new(EXTENSIONS_NAMESPACE, EXTENSIONS_MODULE)?)
}
