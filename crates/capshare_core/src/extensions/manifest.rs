//! Plugin extension manifest declaration and validation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declarative list of extension-point implementations shipped by one plugin.
///
/// Components are opaque identifiers; this crate never loads or renders them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginManifest {
    /// Stable plugin identifier, e.g. `blueocean-dashboard`.
    pub plugin_id: String,
    /// Plugin semantic version string (`major.minor.patch`).
    pub version: String,
    /// Contributed extensions.
    #[serde(default)]
    pub extensions: Vec<ExtensionDeclaration>,
}

/// One component contributed to one extension point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDeclaration {
    /// Component identifier, e.g. `AboutNavLink`.
    pub component: String,
    /// Extension point identifier, e.g. `jenkins.logo.top`.
    pub extension_point: String,
}

impl ExtensionDeclaration {
    pub fn new(component: impl Into<String>, extension_point: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            extension_point: extension_point.into(),
        }
    }
}

impl PluginManifest {
    /// Parses one manifest from JSON text. Validation is a separate step.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Returns a copy with every identifier trimmed.
    pub fn normalized(&self) -> PluginManifest {
        PluginManifest {
            plugin_id: self.plugin_id.trim().to_string(),
            version: self.version.trim().to_string(),
            extensions: self
                .extensions
                .iter()
                .map(|declaration| {
                    ExtensionDeclaration::new(
                        declaration.component.trim(),
                        declaration.extension_point.trim(),
                    )
                })
                .collect(),
        }
    }

    /// Validates declaration-level manifest invariants.
    pub fn validate(&self) -> Result<(), ManifestValidationError> {
        if self.plugin_id.trim().is_empty() {
            return Err(ManifestValidationError::EmptyPluginId);
        }
        if !is_valid_plugin_id(self.plugin_id.trim()) {
            return Err(ManifestValidationError::InvalidPluginId(
                self.plugin_id.clone(),
            ));
        }

        if self.version.trim().is_empty() {
            return Err(ManifestValidationError::EmptyVersion);
        }
        if !is_semver_triplet(self.version.trim()) {
            return Err(ManifestValidationError::InvalidVersion(
                self.version.clone(),
            ));
        }

        if self.extensions.is_empty() {
            return Err(ManifestValidationError::MissingExtensions);
        }

        let mut dedup = BTreeSet::<(&str, &str)>::new();
        for declaration in &self.extensions {
            let component = declaration.component.trim();
            let point = declaration.extension_point.trim();
            if component.is_empty() {
                return Err(ManifestValidationError::EmptyComponent);
            }
            if point.is_empty() {
                return Err(ManifestValidationError::EmptyExtensionPoint(
                    component.to_string(),
                ));
            }
            if !dedup.insert((component, point)) {
                return Err(ManifestValidationError::DuplicateExtension {
                    component: component.to_string(),
                    extension_point: point.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn is_valid_plugin_id(value: &str) -> bool {
    let mut chars = value.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_lowercase() && !first.is_ascii_digit() {
        return false;
    }

    let mut prev_separator = false;
    for c in chars {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            prev_separator = false;
            continue;
        }
        if c == '.' || c == '_' || c == '-' {
            if prev_separator {
                return false;
            }
            prev_separator = true;
            continue;
        }
        return false;
    }
    !prev_separator
}

fn is_semver_triplet(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

/// Manifest validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestValidationError {
    EmptyPluginId,
    InvalidPluginId(String),
    EmptyVersion,
    InvalidVersion(String),
    MissingExtensions,
    EmptyComponent,
    EmptyExtensionPoint(String),
    DuplicateExtension {
        component: String,
        extension_point: String,
    },
}

impl Display for ManifestValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPluginId => write!(f, "manifest plugin id must not be empty"),
            Self::InvalidPluginId(value) => write!(f, "manifest plugin id is invalid: {value}"),
            Self::EmptyVersion => write!(f, "manifest version must not be empty"),
            Self::InvalidVersion(value) => write!(
                f,
                "manifest version is invalid: {value} (expected major.minor.patch)"
            ),
            Self::MissingExtensions => write!(f, "manifest extensions must not be empty"),
            Self::EmptyComponent => write!(f, "manifest contains empty component value"),
            Self::EmptyExtensionPoint(component) => {
                write!(f, "extension point missing for component: {component}")
            }
            Self::DuplicateExtension {
                component,
                extension_point,
            } => write!(
                f,
                "component {component} declared twice for extension point {extension_point}"
            ),
        }
    }
}

impl Error for ManifestValidationError {}
