//! Shared capability publishing for plugin hosts.
//! Independently loaded plugins find each other's capabilities by
//! `(namespace, name)` through one host-owned registry.

pub mod bootstrap;
pub mod config;
pub mod extensions;
pub mod host;
pub mod logging;
pub mod publisher;
pub mod registry;

pub use bootstrap::{
    extensions_key, import_extensions, publish_extensions, EXTENSIONS_MODULE,
    EXTENSIONS_NAMESPACE,
};
pub use config::{ConfigError, HostConfig};
pub use extensions::manifest::{ExtensionDeclaration, ManifestValidationError, PluginManifest};
pub use extensions::store::{ExtensionStore, ExtensionStoreError, RegisteredExtension};
pub use host::{global_host, HostProvider, HostSlot};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use publisher::{publish, publish_key};
pub use registry::{
    lookup_as, Capability, CapabilityRegistry, DuplicatePolicy, DuplicatePolicyError, KeyError,
    ModuleKey, RegistrationInfo, RegistryError, RegistryResult, SharedRegistry,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
