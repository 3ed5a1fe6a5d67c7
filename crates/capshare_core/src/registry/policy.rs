//! Duplicate-key handling policy for host registries.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// What a registry does when a key is registered a second time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first registration and fail the second.
    #[default]
    Reject,
    /// Replace the stored capability with the newer one.
    Overwrite,
}

/// Config string value for [`DuplicatePolicy::Reject`].
pub const DUPLICATE_POLICY_REJECT: &str = "reject";
/// Config string value for [`DuplicatePolicy::Overwrite`].
pub const DUPLICATE_POLICY_OVERWRITE: &str = "overwrite";

impl DuplicatePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reject => DUPLICATE_POLICY_REJECT,
            Self::Overwrite => DUPLICATE_POLICY_OVERWRITE,
        }
    }
}

impl Display for DuplicatePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one policy from a config value. Matching is case-insensitive.
pub fn parse_duplicate_policy(value: &str) -> Result<DuplicatePolicy, DuplicatePolicyError> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.is_empty() {
        return Err(DuplicatePolicyError::Empty);
    }

    match normalized.as_str() {
        DUPLICATE_POLICY_REJECT => Ok(DuplicatePolicy::Reject),
        DUPLICATE_POLICY_OVERWRITE => Ok(DuplicatePolicy::Overwrite),
        _ => Err(DuplicatePolicyError::Unsupported(value.trim().to_string())),
    }
}

impl FromStr for DuplicatePolicy {
    type Err = DuplicatePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duplicate_policy(s)
    }
}

/// Policy parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicatePolicyError {
    Empty,
    Unsupported(String),
}

impl Display for DuplicatePolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "duplicate policy must not be empty"),
            Self::Unsupported(value) => write!(
                f,
                "duplicate policy is unsupported: {value} (expected reject|overwrite)"
            ),
        }
    }
}

impl Error for DuplicatePolicyError {}
