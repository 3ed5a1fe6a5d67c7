//! Type-erased capability handles.

use std::any::{type_name, Any};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Shared, type-erased reference to one published capability object.
///
/// Clones share the same underlying allocation, so identity survives every
/// trip through a registry.
#[derive(Clone)]
pub struct Capability {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    version: Option<String>,
}

impl Capability {
    /// Wraps an already constructed object.
    pub fn new<T>(value: Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            value,
            type_name: type_name::<T>(),
            version: None,
        }
    }

    /// Attaches a version label reported in registry snapshots.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        let trimmed = version.trim();
        self.version = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Recovers the concrete object, or `None` when it is not a `T`.
    pub fn downcast<T>(&self) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    pub fn is<T>(&self) -> bool
    where
        T: Any + Send + Sync,
    {
        self.value.is::<T>()
    }

    /// Returns true when both handles point at the same object.
    pub fn ptr_eq(&self, other: &Capability) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl Debug for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capability")
            .field("type_name", &self.type_name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
