//! Core state machine types.
//!
//! This module contains the data the runtime operates on:
//! - State definitions via the `State` trait, optionally nested
//! - Handler decisions
//! - The shared context and its per-state timer table
//! - The bounded transition log
//!
//! Nothing here samples a clock or performs I/O. Time enters only through
//! [`Context::set_now`].

mod context;
mod decision;
mod hierarchy;
mod history;
mod state;

pub use context::{Context, SlotCountMismatch, StateTimers, Timestamp};
pub use decision::Decision;
pub use hierarchy::{is_within, lineage};
pub use history::{TransitionLog, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use state::State;

pub(crate) use hierarchy::{descend, shared_prefix};
pub(crate) use state::enumeration_mismatches;
