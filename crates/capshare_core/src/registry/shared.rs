//! In-process host registry.
//!
//! # Responsibility
//! - Store published capabilities keyed by [`ModuleKey`].
//! - Apply the configured [`DuplicatePolicy`] atomically per key.
//! - Emit metadata-only `capability_register` events.

use super::{
    Capability, CapabilityRegistry, DuplicatePolicy, ModuleKey, RegistrationInfo, RegistryError,
    RegistryResult,
};
use crate::logging::registration_scope;
use log::{info, warn};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

struct Entry {
    capability: Capability,
    registration_id: Uuid,
    registered_at_ms: i64,
}

impl Entry {
    fn new(capability: Capability) -> Self {
        Self {
            capability,
            registration_id: Uuid::new_v4(),
            registered_at_ms: now_epoch_ms(),
        }
    }
}

/// Thread-safe registry owned by the host process.
#[derive(Default)]
pub struct SharedRegistry {
    policy: DuplicatePolicy,
    entries: RwLock<BTreeMap<ModuleKey, Entry>>,
}

impl SharedRegistry {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, key: &ModuleKey) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl CapabilityRegistry for SharedRegistry {
    fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    fn register(&self, key: ModuleKey, capability: Capability) -> RegistryResult<()> {
        let type_name = capability.type_name();
        let _scope = registration_scope(key.to_string());
        let mut entries = self.entries.write();

        if entries.contains_key(&key) {
            match self.policy {
                DuplicatePolicy::Reject => {
                    warn!(
                        "event=capability_register module=registry status=conflict key={} policy={}",
                        key, self.policy
                    );
                    return Err(RegistryError::RegistrationConflict(key));
                }
                DuplicatePolicy::Overwrite => {
                    info!(
                        "event=capability_register module=registry status=replaced key={} type={}",
                        key, type_name
                    );
                    entries.insert(key, Entry::new(capability));
                    return Ok(());
                }
            }
        }

        info!(
            "event=capability_register module=registry status=ok key={} type={}",
            key, type_name
        );
        entries.insert(key, Entry::new(capability));
        Ok(())
    }

    fn lookup(&self, key: &ModuleKey) -> Option<Capability> {
        self.entries
            .read()
            .get(key)
            .map(|entry| entry.capability.clone())
    }

    fn snapshot(&self) -> Vec<RegistrationInfo> {
        self.entries
            .read()
            .iter()
            .map(|(key, entry)| RegistrationInfo {
                key: key.to_string(),
                namespace: key.namespace().to_string(),
                name: key.name().to_string(),
                type_name: entry.capability.type_name().to_string(),
                version: entry.capability.version().map(str::to_string),
                registration_id: entry.registration_id,
                registered_at_ms: entry.registered_at_ms,
            })
            .collect()
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
