//! The tick-driven runtime.
//!
//! [`StateMachine`] owns the current state and the shared context and runs
//! one [`StateHandler`] dispatch per tick. Handlers are either a type
//! implementing the trait with an exhaustive `match`, a plain closure, or a
//! [`HandlerTable`] assembled per state.
//!
//! The runtime is synchronous and performs no I/O. Callers that tick from
//! several threads must hold a lock across sampling time and calling `tick`.

mod handler;
mod machine;

pub use handler::{HandlerTable, HookFn, RunFn, StateHandler};
pub use machine::{StateMachine, TickOutcome};
