//! Checkpoint error types.

use crate::core::SlotCountMismatch;
use thiserror::Error;

/// Errors that can occur while saving or restoring a snapshot
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// JSON encoding or decoding failed
    #[error("JSON checkpoint error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encoding or decoding failed
    #[error("Binary checkpoint error: {0}")]
    Binary(#[from] bincode::Error),

    /// Snapshot was written by an incompatible format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot was taken from a machine with a different number of states
    #[error(transparent)]
    TimerTableMismatch(#[from] SlotCountMismatch),

    /// The shallow-history table does not have one slot per state
    #[error("History table has {found} slots but the enumeration has {expected} states")]
    HistoryTableMismatch { found: usize, expected: usize },

    /// The snapshot's current state has children; a machine only rests in
    /// leaf states
    #[error("Snapshot current state '{state}' is composite")]
    CompositeCurrent { state: String },
}
