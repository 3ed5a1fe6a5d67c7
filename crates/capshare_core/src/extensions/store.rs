//! Shared extension store contracts.

use crate::extensions::manifest::{ManifestValidationError, PluginManifest};
use crate::logging::registration_scope;
use log::{info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One component registered against one extension point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredExtension {
    pub plugin_id: String,
    pub component: String,
    pub extension_point: String,
}

#[derive(Debug, Default)]
struct StoreState {
    plugins: BTreeMap<String, PluginManifest>,
    points: BTreeMap<String, Vec<RegisteredExtension>>,
}

/// Process-wide store that plugins register extension-point implementations
/// into once it has been published through the host registry.
///
/// Declaration-only: nothing here resolves or renders components.
#[derive(Debug, Default)]
pub struct ExtensionStore {
    state: RwLock<StoreState>,
}

impl ExtensionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every extension of one plugin after manifest validation.
    ///
    /// Either all declarations of the manifest become visible or none do.
    pub fn register_manifest(&self, manifest: &PluginManifest) -> Result<(), ExtensionStoreError> {
        manifest
            .validate()
            .map_err(ExtensionStoreError::InvalidManifest)?;

        let manifest = manifest.normalized();
        let _scope = registration_scope(format!("plugin:{}", manifest.plugin_id));
        let mut state = self.state.write();
        if state.plugins.contains_key(manifest.plugin_id.as_str()) {
            warn!(
                "event=extension_register module=extensions status=conflict plugin_id={}",
                manifest.plugin_id
            );
            return Err(ExtensionStoreError::DuplicatePluginId(manifest.plugin_id));
        }

        for declaration in &manifest.extensions {
            state
                .points
                .entry(declaration.extension_point.clone())
                .or_default()
                .push(RegisteredExtension {
                    plugin_id: manifest.plugin_id.clone(),
                    component: declaration.component.clone(),
                    extension_point: declaration.extension_point.clone(),
                });
        }

        info!(
            "event=extension_register module=extensions status=ok plugin_id={} version={} extension_count={}",
            manifest.plugin_id,
            manifest.version,
            manifest.extensions.len()
        );
        state.plugins.insert(manifest.plugin_id.clone(), manifest);
        Ok(())
    }

    /// Returns extensions for one point in registration order.
    pub fn extensions_for(&self, extension_point: &str) -> Vec<RegisteredExtension> {
        self.state
            .read()
            .points
            .get(extension_point.trim())
            .cloned()
            .unwrap_or_default()
    }

    /// Returns sorted extension point ids that have at least one extension.
    pub fn extension_points(&self) -> Vec<String> {
        self.state.read().points.keys().cloned().collect()
    }

    /// Returns sorted registered plugin ids.
    pub fn plugin_ids(&self) -> Vec<String> {
        self.state.read().plugins.keys().cloned().collect()
    }

    pub fn plugin(&self, plugin_id: &str) -> Option<PluginManifest> {
        self.state.read().plugins.get(plugin_id.trim()).cloned()
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.state.read().plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().plugins.is_empty()
    }
}

/// Extension store registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionStoreError {
    InvalidManifest(ManifestValidationError),
    DuplicatePluginId(String),
}

impl Display for ExtensionStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidManifest(err) => write!(f, "invalid plugin manifest: {err}"),
            Self::DuplicatePluginId(value) => {
                write!(f, "plugin already registered: {value}")
            }
        }
    }
}

impl Error for ExtensionStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidManifest(err) => Some(err),
            Self::DuplicatePluginId(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtensionStore, ExtensionStoreError};
    use crate::extensions::manifest::{ExtensionDeclaration, PluginManifest};

    fn manifest(plugin_id: &str, extensions: &[(&str, &str)]) -> PluginManifest {
        PluginManifest {
            plugin_id: plugin_id.to_string(),
            version: "1.0.0".to_string(),
            extensions: extensions
                .iter()
                .map(|(component, point)| ExtensionDeclaration::new(*component, *point))
                .collect(),
        }
    }

    #[test]
    fn indexes_extensions_by_point_in_registration_order() {
        let store = ExtensionStore::new();
        store
            .register_manifest(&manifest(
                "dashboard",
                &[("PipelineList", "jenkins.main.routes"), ("Logo", "jenkins.logo.top")],
            ))
            .expect("dashboard registration");
        store
            .register_manifest(&manifest("personalization", &[("Favorites", "jenkins.main.routes")]))
            .expect("personalization registration");

        let routes = store.extensions_for("jenkins.main.routes");
        let components: Vec<&str> = routes.iter().map(|ext| ext.component.as_str()).collect();
        assert_eq!(components, vec!["PipelineList", "Favorites"]);
        assert_eq!(routes[1].plugin_id, "personalization");

        assert_eq!(
            store.extension_points(),
            vec!["jenkins.logo.top".to_string(), "jenkins.main.routes".to_string()]
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rejects_duplicate_plugin_without_touching_index() {
        let store = ExtensionStore::new();
        store
            .register_manifest(&manifest("dashboard", &[("Logo", "jenkins.logo.top")]))
            .expect("first registration");

        let err = store
            .register_manifest(&manifest("dashboard", &[("Other", "jenkins.footer")]))
            .expect_err("duplicate plugin must fail");
        assert_eq!(err, ExtensionStoreError::DuplicatePluginId("dashboard".to_string()));
        assert!(store.extensions_for("jenkins.footer").is_empty());
    }

    #[test]
    fn rejects_invalid_manifest_and_stays_empty() {
        let store = ExtensionStore::new();
        let err = store
            .register_manifest(&manifest("dashboard", &[]))
            .expect_err("manifest without extensions must fail");
        assert!(matches!(err, ExtensionStoreError::InvalidManifest(_)));
        assert!(store.is_empty());
        assert!(store.extension_points().is_empty());
    }

    #[test]
    fn lookups_trim_input() {
        let store = ExtensionStore::new();
        store
            .register_manifest(&manifest(" dashboard ", &[(" Logo ", " jenkins.logo.top ")]))
            .expect("registration");

        assert_eq!(store.plugin_ids(), vec!["dashboard".to_string()]);
        assert!(store.plugin("  dashboard").is_some());
        let ext = store.extensions_for(" jenkins.logo.top ");
        assert_eq!(ext.len(), 1);
        assert_eq!(ext[0].component, "Logo");
        assert_eq!(ext[0].extension_point, "jenkins.logo.top");
    }

    #[test]
    fn stored_manifest_matches_its_trimmed_id() {
        let store = ExtensionStore::new();
        let mut declared = manifest(" dashboard ", &[(" Logo ", "jenkins.logo.top ")]);
        declared.version = " 1.0.0 ".to_string();
        store.register_manifest(&declared).expect("registration");

        let stored = store.plugin("dashboard").expect("stored manifest");
        assert_eq!(stored.plugin_id, "dashboard");
        assert_eq!(stored.version, "1.0.0");
        assert_eq!(stored.extensions[0].component, "Logo");
        assert_eq!(stored.extensions[0].extension_point, "jenkins.logo.top");
        assert_eq!(store.plugin_ids(), vec![stored.plugin_id.clone()]);
    }

    #[test]
    fn extension_rows_serialize_in_camel_case() {
        let store = ExtensionStore::new();
        store
            .register_manifest(&manifest("dashboard", &[("Logo", "jenkins.logo.top")]))
            .expect("registration");

        let value = serde_json::to_value(store.extensions_for("jenkins.logo.top"))
            .expect("serialize rows");
        assert_eq!(value[0]["pluginId"], "dashboard");
        assert_eq!(value[0]["extensionPoint"], "jenkins.logo.top");
        assert!(value[0].get("plugin_id").is_none());
    }

    #[test]
    fn unknown_point_yields_empty_list() {
        let store = ExtensionStore::new();
        assert!(store.extensions_for("jenkins.nothing").is_empty());
    }
}
