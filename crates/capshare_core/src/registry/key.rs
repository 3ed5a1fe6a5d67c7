//! Qualified `(namespace, name)` keys for published capabilities.
//!
//! # Invariants
//! - Both parts are stored trimmed and are never empty.
//! - Display form is `namespace:name`; `parse` accepts exactly that form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static KEY_PART_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@][A-Za-z0-9._@/-]*$").expect("valid key part regex"));

/// Which half of a key failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPart {
    Namespace,
    Name,
}

impl KeyPart {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Name => "name",
        }
    }
}

/// Key validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    Empty(KeyPart),
    Malformed { part: KeyPart, value: String },
    MissingSeparator(String),
}

impl Display for KeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty(part) => write!(f, "module {} must not be empty", part.as_str()),
            Self::Malformed { part, value } => {
                write!(f, "module {} is malformed: {value}", part.as_str())
            }
            Self::MissingSeparator(value) => {
                write!(f, "qualified module name must be `namespace:name`, got `{value}`")
            }
        }
    }
}

impl Error for KeyError {}

/// Registry key for one published capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleKey {
    namespace: String,
    name: String,
}

impl ModuleKey {
    /// Builds a key after trimming and validating both parts.
    pub fn new(namespace: &str, name: &str) -> Result<Self, KeyError> {
        let namespace = validate_part(namespace, KeyPart::Namespace)?;
        let name = validate_part(name, KeyPart::Name)?;
        Ok(Self { namespace, name })
    }

    /// Parses a qualified `namespace:name` string.
    pub fn parse(qualified: &str) -> Result<Self, KeyError> {
        let trimmed = qualified.trim();
        let Some((namespace, name)) = trimmed.split_once(':') else {
            return Err(KeyError::MissingSeparator(trimmed.to_string()));
        };
        Self::new(namespace, name)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for ModuleKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl FromStr for ModuleKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn validate_part(value: &str, part: KeyPart) -> Result<String, KeyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KeyError::Empty(part));
    }
    if !KEY_PART_RE.is_match(trimmed) {
        return Err(KeyError::Malformed {
            part,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
