//! Checkpoint and resume for tick-driven machines.
//!
//! A [`Snapshot`] captures everything the runtime mutates: the current state,
//! the tick timestamp, the timer table, the caller's signal fields and the
//! transition log. Handlers are code and are not captured; a snapshot is
//! restored into a machine built with the same handler.

use crate::core::{Context, State, StateTimers, Timestamp, TransitionLog};
use crate::runtime::StateMachine;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable checkpoint of a machine's runtime state.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "D: Serialize",
    deserialize = "D: serde::Deserialize<'de>"
))]
pub struct Snapshot<S: State, D> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub taken_at: DateTime<Utc>,

    pub current: S,

    /// Timestamp of the last tick
    pub now: Timestamp,

    /// Entry timestamps in state index order
    pub timers: Vec<Timestamp>,

    pub data: D,

    pub history: TransitionLog<S>,

    /// Last active child of each composite, in state index order
    pub last_child: Vec<Option<S>>,
}

impl<S: State, D> Snapshot<S, D>
where
    D: Serialize + DeserializeOwned,
{
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl<S: State, D, H> StateMachine<S, D, H> {
    /// Capture the runtime state.
    ///
    /// # Panics
    ///
    /// Panics if the machine has not been initialized.
    pub fn snapshot(&self) -> Snapshot<S, D>
    where
        D: Clone,
    {
        assert!(
            self.is_initialized(),
            "cannot snapshot a machine that has not been initialized"
        );

        Snapshot {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            current: self.current_state(),
            now: self.now(),
            timers: self.state_timers().as_slice().to_vec(),
            data: self.data().clone(),
            history: self.history().clone(),
            last_child: self.last_children().to_vec(),
        }
    }

    /// Replace the runtime state with a snapshot's. The machine counts as
    /// initialized afterwards; no entry or exit hooks run. The transition
    /// log keeps this machine's capacity, retaining the newest records.
    pub fn restore(&mut self, snapshot: Snapshot<S, D>) -> Result<(), CheckpointError> {
        if snapshot.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: snapshot.version,
                supported: CHECKPOINT_VERSION,
            });
        }

        let timers = StateTimers::try_from(snapshot.timers)?;
        if snapshot.last_child.len() != S::count() {
            return Err(CheckpointError::HistoryTableMismatch {
                found: snapshot.last_child.len(),
                expected: S::count(),
            });
        }
        if snapshot.current.is_composite() {
            return Err(CheckpointError::CompositeCurrent {
                state: snapshot.current.name().to_string(),
            });
        }

        debug!(
            id = %snapshot.id,
            state = snapshot.current.name(),
            now = snapshot.now,
            "restoring checkpoint"
        );

        let context = Context::from_parts(snapshot.now, timers, snapshot.data);
        self.restore_parts(
            snapshot.current,
            context,
            snapshot.history,
            snapshot.last_child,
        );
        Ok(())
    }
}
