//! Host capability registry contracts.
//!
//! # Responsibility
//! - Define the injectable `register`/`lookup` boundary between publishers
//!   and the host that owns published capabilities.
//! - Provide one in-process registry implementation for hosts and tests.
//!
//! # Invariants
//! - A `(namespace, name)` key maps to at most one capability at a time.
//! - Duplicate handling is decided by the registry's [`DuplicatePolicy`] and
//!   is the same for every repeat of the same key.
//! - Lookups return the stored handle, never a copy of the object.

mod capability;
mod key;
mod policy;
mod shared;

pub use capability::Capability;
pub use key::{KeyError, KeyPart, ModuleKey};
pub use policy::{
    parse_duplicate_policy, DuplicatePolicy, DuplicatePolicyError, DUPLICATE_POLICY_OVERWRITE,
    DUPLICATE_POLICY_REJECT,
};
pub use shared::SharedRegistry;

use serde::{Deserialize, Serialize};
use std::any::{type_name, Any};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors surfaced by publishing and host registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidKey(KeyError),
    RegistrationConflict(ModuleKey),
    HostUnavailable(String),
    /// A host slot already holds a different registry.
    AlreadyInstalled,
    NotFound(ModuleKey),
    TypeMismatch {
        key: ModuleKey,
        expected: &'static str,
        actual: &'static str,
    },
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(err) => write!(f, "invalid module key: {err}"),
            Self::RegistrationConflict(key) => {
                write!(f, "module already registered: {key}")
            }
            Self::HostUnavailable(reason) => write!(f, "host registry unavailable: {reason}"),
            Self::AlreadyInstalled => {
                write!(f, "a different host registry is already installed")
            }
            Self::NotFound(key) => write!(f, "module not registered: {key}"),
            Self::TypeMismatch {
                key,
                expected,
                actual,
            } => write!(
                f,
                "module {key} holds `{actual}`, requested `{expected}`"
            ),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidKey(err) => Some(err),
            Self::RegistrationConflict(_)
            | Self::HostUnavailable(_)
            | Self::AlreadyInstalled
            | Self::NotFound(_)
            | Self::TypeMismatch { .. } => None,
        }
    }
}

impl From<KeyError> for RegistryError {
    fn from(value: KeyError) -> Self {
        Self::InvalidKey(value)
    }
}

/// Snapshot row describing one stored registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInfo {
    /// Qualified `namespace:name` key.
    pub key: String,
    pub namespace: String,
    pub name: String,
    /// Rust type name of the stored capability.
    pub type_name: String,
    pub version: Option<String>,
    /// Unique per stored registration; changes when an entry is overwritten.
    pub registration_id: Uuid,
    /// Unix epoch milliseconds.
    pub registered_at_ms: i64,
}

/// Host-owned, process-wide store of published capabilities.
///
/// Implementations synchronize internally; callers never lock.
pub trait CapabilityRegistry: Send + Sync {
    /// Duplicate handling applied by [`CapabilityRegistry::register`].
    fn policy(&self) -> DuplicatePolicy;

    /// Stores `capability` under `key`.
    ///
    /// # Errors
    /// - `RegistrationConflict` when the key exists and policy is `Reject`.
    fn register(&self, key: ModuleKey, capability: Capability) -> RegistryResult<()>;

    /// Returns the handle stored under `key`.
    fn lookup(&self, key: &ModuleKey) -> Option<Capability>;

    /// Returns registrations sorted by key.
    fn snapshot(&self) -> Vec<RegistrationInfo>;
}

/// Looks up `key` and downcasts it to `T`.
///
/// # Errors
/// - `NotFound` when nothing is registered under `key`.
/// - `TypeMismatch` when the stored object is not a `T`.
pub fn lookup_as<T>(registry: &dyn CapabilityRegistry, key: &ModuleKey) -> RegistryResult<Arc<T>>
where
    T: Any + Send + Sync,
{
    let capability = registry
        .lookup(key)
        .ok_or_else(|| RegistryError::NotFound(key.clone()))?;
    capability
        .downcast::<T>()
        .ok_or_else(|| RegistryError::TypeMismatch {
            key: key.clone(),
            expected: type_name::<T>(),
            actual: capability.type_name(),
        })
}
