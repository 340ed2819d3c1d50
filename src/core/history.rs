//! Transition log.
//!
//! Records state changes as they are applied by the runtime. The log is
//! bounded: once full, the oldest records are evicted first.

use super::context::Timestamp;
use super::state::State;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of records retained by a machine's log.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Record of a single state transition.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{TransitionLog, TransitionRecord};
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Phase {
///         Fill,
///         Drain,
///     }
/// }
///
/// let mut log = TransitionLog::new(8);
/// log.record(TransitionRecord { from: Phase::Fill, to: Phase::Drain, at: 3.0 });
/// assert_eq!(log.path(), vec![Phase::Fill, Phase::Drain]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// The tick's `now` when the transition was applied
    pub at: Timestamp,
}

/// Bounded, ordered log of applied transitions.
///
/// Deserializing keeps only the newest `capacity` records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "", from = "StoredLog<S>")]
pub struct TransitionLog<S: State> {
    capacity: usize,
    records: VecDeque<TransitionRecord<S>>,
}

#[derive(Deserialize)]
#[serde(bound = "")]
struct StoredLog<S: State> {
    capacity: usize,
    records: Vec<TransitionRecord<S>>,
}

impl<S: State> From<StoredLog<S>> for TransitionLog<S> {
    fn from(stored: StoredLog<S>) -> Self {
        let mut log = Self::new(stored.capacity);
        log.extend(stored.records);
        log
    }
}

impl<S: State> Default for TransitionLog<S> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<S: State> TransitionLog<S> {
    /// Create an empty log. A capacity of `0` disables recording.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        }
    }

    /// Append a record, evicting the oldest one when the log is full.
    pub fn record(&mut self, record: TransitionRecord<S>) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Record every item in order, subject to the same eviction.
    pub fn extend(&mut self, records: impl IntoIterator<Item = TransitionRecord<S>>) {
        for record in records {
            self.record(record);
        }
    }

    /// Replace the contents with `other`'s records, keeping this log's
    /// capacity.
    pub(crate) fn refill_from(&mut self, other: TransitionLog<S>) {
        self.records.clear();
        self.extend(other.records);
    }

    /// States traversed by the retained records: the first record's `from`,
    /// then each record's `to`.
    pub fn path(&self) -> Vec<S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|r| r.to));
        path
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<S>> {
        self.records.back()
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<S>> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
