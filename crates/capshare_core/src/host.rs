//! Host registry providers.
//!
//! # Responsibility
//! - Model how a publisher obtains the host registry at call time.
//! - Represent "host loader not installed yet" as a recoverable error.
//!
//! # Invariants
//! - A [`HostSlot`] is installed at most once; the installed registry never
//!   changes afterwards.
//! - Querying an empty slot never installs anything.

use crate::registry::{CapabilityRegistry, RegistryError, RegistryResult, SharedRegistry};
use log::{info, warn};
use once_cell::sync::OnceCell;
use std::sync::Arc;

static GLOBAL_HOST: HostSlot = HostSlot::new();

/// Source of the host registry handed to publishers and consumers.
pub trait HostProvider {
    /// Returns the host registry.
    ///
    /// # Errors
    /// - `HostUnavailable` when the host has not been installed or cannot be
    ///   reached.
    fn registry(&self) -> RegistryResult<Arc<dyn CapabilityRegistry>>;
}

impl HostProvider for Arc<dyn CapabilityRegistry> {
    fn registry(&self) -> RegistryResult<Arc<dyn CapabilityRegistry>> {
        Ok(Arc::clone(self))
    }
}

impl HostProvider for Arc<SharedRegistry> {
    fn registry(&self) -> RegistryResult<Arc<dyn CapabilityRegistry>> {
        Ok(Arc::clone(self) as Arc<dyn CapabilityRegistry>)
    }
}

/// Write-once holder for a host registry.
pub struct HostSlot {
    registry: OnceCell<Arc<dyn CapabilityRegistry>>,
}

impl HostSlot {
    pub const fn new() -> Self {
        Self {
            registry: OnceCell::new(),
        }
    }

    /// Installs the host registry.
    ///
    /// Installing the same registry again is a no-op.
    ///
    /// # Errors
    /// - `AlreadyInstalled` when a different registry is already installed.
    pub fn install(&self, registry: Arc<dyn CapabilityRegistry>) -> RegistryResult<()> {
        let installed = self.registry.get_or_init(|| {
            info!(
                "event=host_install module=host status=ok policy={}",
                registry.policy()
            );
            Arc::clone(&registry)
        });

        if Arc::ptr_eq(installed, &registry) {
            return Ok(());
        }
        warn!("event=host_install module=host status=conflict");
        Err(RegistryError::AlreadyInstalled)
    }

    pub fn is_installed(&self) -> bool {
        self.registry.get().is_some()
    }
}

impl Default for HostSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProvider for HostSlot {
    fn registry(&self) -> RegistryResult<Arc<dyn CapabilityRegistry>> {
        self.registry
            .get()
            .cloned()
            .ok_or_else(|| RegistryError::HostUnavailable("host registry not installed".to_string()))
    }
}

/// Returns the process-wide host slot.
///
/// Hosts that share one registry across independently loaded modules install
/// it here once at startup; everything else should pass a provider explicitly.
pub fn global_host() -> &'static HostSlot {
    &GLOBAL_HOST
}
