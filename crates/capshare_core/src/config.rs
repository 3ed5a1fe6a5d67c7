//! Host configuration sourced from the process environment.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Set but invalid values are rejected, never silently ignored.

use crate::logging::{default_log_level, normalize_level};
use crate::registry::{parse_duplicate_policy, DuplicatePolicy, DuplicatePolicyError, SharedRegistry};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable selecting [`DuplicatePolicy`].
pub const ENV_DUPLICATE_POLICY: &str = "CAPSHARE_DUPLICATE_POLICY";
/// Environment variable selecting the log level.
pub const ENV_LOG_LEVEL: &str = "CAPSHARE_LOG_LEVEL";
/// Environment variable selecting the absolute log directory.
pub const ENV_LOG_DIR: &str = "CAPSHARE_LOG_DIR";

/// Settings a host needs to build its registry and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub duplicate_policy: DuplicatePolicy,
    pub log_level: &'static str,
    /// File logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

/// Rejected environment values. Every variant names its variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPolicy {
        variable: &'static str,
        source: DuplicatePolicyError,
    },
    InvalidLogLevel {
        variable: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Name of the offending environment variable.
    pub fn variable(&self) -> &'static str {
        match self {
            Self::InvalidPolicy { variable, .. } | Self::InvalidLogLevel { variable, .. } => {
                variable
            }
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPolicy { variable, source } => write!(f, "{variable}: {source}"),
            Self::InvalidLogLevel { variable, message } => write!(f, "{variable}: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPolicy { source, .. } => Some(source),
            Self::InvalidLogLevel { .. } => None,
        }
    }
}

impl HostConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(raw) = read(ENV_DUPLICATE_POLICY) {
            config.duplicate_policy =
                parse_duplicate_policy(&raw).map_err(|source| ConfigError::InvalidPolicy {
                    variable: ENV_DUPLICATE_POLICY,
                    source,
                })?;
        }
        if let Some(raw) = read(ENV_LOG_LEVEL) {
            config.log_level =
                normalize_level(&raw).map_err(|message| ConfigError::InvalidLogLevel {
                    variable: ENV_LOG_LEVEL,
                    message,
                })?;
        }
        if let Some(raw) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(raw));
        }
        Ok(config)
    }

    /// Builds an empty host registry using the configured policy.
    pub fn build_registry(&self) -> SharedRegistry {
        SharedRegistry::new(self.duplicate_policy)
    }
}
