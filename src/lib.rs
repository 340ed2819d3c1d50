//! Tickfsm: a tick-driven finite state machine core
//!
//! A machine holds exactly one active state and a shared [`Context`]. The
//! caller drives it: sample a monotonic clock, write the reading and any
//! input signals into the context, then call [`StateMachine::tick`]. Each
//! tick dispatches the current state's handler, which returns a
//! [`Decision`]: stay, or transition to another state.
//!
//! Every state has an entry timestamp in a per-state timer table. All slots
//! are baselined by [`StateMachine::initialize`]; afterwards a slot is only
//! written when its state is entered from a different state. A handler
//! measures time in state as `ctx.now() - ctx.entered_at(state)`.
//!
//! # Core Concepts
//!
//! - **State**: closed enumeration of fieldless variants, see [`state_enum!`]
//! - **Handler**: per-state logic via the [`StateHandler`] trait, a closure
//!   or a [`HandlerTable`](runtime::HandlerTable)
//! - **Topology**: optional declared transitions for validation, strict mode
//!   and diagrams
//! - **Checkpoint**: serializable snapshots of the runtime state
//!
//! # Example
//!
//! ```rust
//! use tickfsm::{state_enum, Context, Decision, StateMachine};
//!
//! state_enum! {
//!     enum Mode {
//!         A,
//!         B,
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Signals {
//!     go: bool,
//! }
//!
//! let handler = |state: Mode, ctx: &mut Context<Mode, Signals>| match state {
//!     Mode::A => Decision::when(ctx.data.go, Mode::B),
//!     Mode::B => Decision::stay(),
//! };
//!
//! let mut machine = StateMachine::new(Mode::A, handler, Signals::default());
//! machine.set_now(100.0);
//! machine.initialize();
//!
//! machine.tick_at(105.0);
//! assert_eq!(machine.current_state(), Mode::A);
//!
//! machine.data_mut().go = true;
//! machine.tick_at(105.0);
//! assert_eq!(machine.current_state(), Mode::B);
//! assert_eq!(machine.state_timers().as_slice(), &[100.0, 105.0]);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod graph;
pub mod runtime;

// Re-export commonly used types
pub use builder::{BuildError, HandlerTableBuilder, MachineBuilder};
pub use checkpoint::{CheckpointError, Snapshot};
pub use config::{ConfigError, MachineConfig};
pub use core::{Context, Decision, State, StateTimers, Timestamp, TransitionLog, TransitionRecord};
pub use graph::{Topology, TopologyViolation};
pub use runtime::{HandlerTable, StateHandler, StateMachine, TickOutcome};
