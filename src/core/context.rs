//! Shared mutable context visible to every state on every tick.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use thiserror::Error;

/// Monotonic time in seconds, sampled by the caller.
pub type Timestamp = f64;

/// One entry timestamp per state, indexed by [`State::index`].
///
/// The table always has exactly `S::count()` slots. Only the runtime writes
/// to it: every slot at initialization, and a slot when its state is
/// entered. Serialized as a plain list; loading a list of the wrong length
/// fails.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    bound = "",
    try_from = "Vec<Timestamp>",
    into = "Vec<Timestamp>"
)]
pub struct StateTimers<S: State> {
    entered_at: Vec<Timestamp>,
    _phantom: PhantomData<S>,
}

/// A timer list whose length differs from the number of states.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("timer table has {found} slots but the enumeration has {expected} states")]
pub struct SlotCountMismatch {
    pub found: usize,
    pub expected: usize,
}

impl<S: State> TryFrom<Vec<Timestamp>> for StateTimers<S> {
    type Error = SlotCountMismatch;

    fn try_from(entered_at: Vec<Timestamp>) -> Result<Self, Self::Error> {
        let found = entered_at.len();
        Self::from_slots(entered_at).ok_or(SlotCountMismatch {
            found,
            expected: S::count(),
        })
    }
}

impl<S: State> From<StateTimers<S>> for Vec<Timestamp> {
    fn from(timers: StateTimers<S>) -> Self {
        timers.entered_at
    }
}

impl<S: State> StateTimers<S> {
    pub(crate) fn new(now: Timestamp) -> Self {
        Self {
            entered_at: vec![now; S::count()],
            _phantom: PhantomData,
        }
    }

    /// Rebuild a table from raw slots. The slot count must match the
    /// enumeration.
    pub(crate) fn from_slots(entered_at: Vec<Timestamp>) -> Option<Self> {
        (entered_at.len() == S::count()).then_some(Self {
            entered_at,
            _phantom: PhantomData,
        })
    }

    /// When `state` was last entered.
    ///
    /// # Panics
    ///
    /// Panics if the state's index lies outside the table, which means its
    /// `State` implementation disagrees with `State::ALL`.
    pub fn entered_at(&self, state: S) -> Timestamp {
        self.entered_at[Self::slot(state)]
    }

    /// Raw slots in index order.
    pub fn as_slice(&self) -> &[Timestamp] {
        &self.entered_at
    }

    pub fn len(&self) -> usize {
        self.entered_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entered_at.is_empty()
    }

    pub(crate) fn baseline(&mut self, now: Timestamp) {
        self.entered_at.iter_mut().for_each(|slot| *slot = now);
    }

    pub(crate) fn record_entry(&mut self, state: S, now: Timestamp) {
        let slot = Self::slot(state);
        self.entered_at[slot] = now;
    }

    fn slot(state: S) -> usize {
        let index = state.index();
        assert!(
            index < S::count(),
            "state '{}' has index {} but the enumeration only has {} states",
            state.name(),
            index,
            S::count()
        );
        index
    }
}

/// The record shared by reference across all ticks and all states.
///
/// `now` is written by the caller before each tick. The timer table is
/// read-only outside the runtime. `data` carries the application's own
/// signal fields and is freely mutable by handlers and caller alike.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "D: Serialize", deserialize = "D: Deserialize<'de>"))]
pub struct Context<S: State, D> {
    now: Timestamp,
    timers: StateTimers<S>,
    /// Caller-defined signal fields.
    pub data: D,
}

impl<S: State, D> Context<S, D> {
    /// A zero-valued context: `now` is `0.0` and every timer reads `0.0`.
    pub fn new(data: D) -> Self {
        Self {
            now: 0.0,
            timers: StateTimers::new(0.0),
            data,
        }
    }

    pub(crate) fn from_parts(now: Timestamp, timers: StateTimers<S>, data: D) -> Self {
        Self { now, timers, data }
    }

    /// Latest time sample supplied by the caller.
    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Store the caller's current time sample.
    pub fn set_now(&mut self, now: Timestamp) {
        self.now = now;
    }

    pub fn timers(&self) -> &StateTimers<S> {
        &self.timers
    }

    /// When `state` was last entered.
    pub fn entered_at(&self, state: S) -> Timestamp {
        self.timers.entered_at(state)
    }

    /// Time spent in `state` since it was last entered: `now - entered_at`.
    pub fn elapsed_in(&self, state: S) -> Timestamp {
        self.now - self.timers.entered_at(state)
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    pub(crate) fn timers_mut(&mut self) -> &mut StateTimers<S> {
        &mut self.timers
    }
}

impl<S: State, D: Default> Default for Context<S, D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}
