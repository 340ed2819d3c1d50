//! Configuration error types.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors that can occur when loading or resolving a machine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text is not valid JSON for `MachineConfig`
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// One or more state names do not belong to the enumeration
    #[error("Unknown states in configuration: {}", .names.join(", "))]
    UnknownStates { names: Vec<String> },

    /// The configured transitions or the machine built from them are invalid
    #[error(transparent)]
    Build(#[from] BuildError),
}
