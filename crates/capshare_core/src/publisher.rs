//! Capability publishing into a host registry.
//!
//! # Invariants
//! - The key is validated before the host is consulted.
//! - Exactly one registry mutation happens on success, none on failure.
//! - Host errors propagate unchanged; nothing is retried or logged here.

use crate::host::HostProvider;
use crate::registry::{Capability, ModuleKey, RegistryResult};

/// Publishes `capability` under `(namespace, name)` in the host registry.
///
/// The capability must be fully constructed before this call; consumers may
/// observe it as soon as the host stores it.
///
/// # Errors
/// - `InvalidKey` when `namespace` or `name` is empty or malformed.
/// - `HostUnavailable` when `host` cannot provide its registry.
/// - `RegistrationConflict` when the host rejects a duplicate key.
pub fn publish(
    host: &impl HostProvider,
    namespace: &str,
    name: &str,
    capability: Capability,
) -> RegistryResult<()> {
    let key = ModuleKey::new(namespace, name)?;
    publish_key(host, key, capability)
}

/// Publishes under an already validated key.
pub fn publish_key(
    host: &impl HostProvider,
    key: ModuleKey,
    capability: Capability,
) -> RegistryResult<()> {
    host.registry()?.register(key, capability)
}
