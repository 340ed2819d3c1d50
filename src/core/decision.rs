//! Handler decisions.
//!
//! A handler never mutates the machine's current state directly. It returns
//! a [`Decision`] and the runtime applies it.

use super::state::State;

/// What the active state's handler wants the machine to do after this tick.
///
/// `Stay` and a self-targeted `Transition` are different signals. Neither
/// resets the state's entry timer, but the runtime reports them separately
/// so callers can tell "nothing to do" from "requested my own state".
///
/// # Example
///
/// ```rust
/// use tickfsm::core::Decision;
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Door {
///         Closed,
///         Open,
///     }
/// }
///
/// let decision = Decision::to(Door::Open);
/// assert_eq!(decision.target(), Some(Door::Open));
/// assert!(Decision::<Door>::stay().is_stay());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision<S: State> {
    /// Remain in the current state.
    Stay,
    /// Move to the given state at the end of this tick.
    Transition(S),
}

impl<S: State> Decision<S> {
    /// Remain in the current state.
    pub fn stay() -> Self {
        Self::Stay
    }

    /// Transition to `state`.
    pub fn to(state: S) -> Self {
        Self::Transition(state)
    }

    /// Transition to `state` when `condition` holds, otherwise stay.
    pub fn when(condition: bool, state: S) -> Self {
        if condition {
            Self::Transition(state)
        } else {
            Self::Stay
        }
    }

    pub fn is_stay(&self) -> bool {
        matches!(self, Self::Stay)
    }

    /// Requested target, if any.
    pub fn target(&self) -> Option<S> {
        match self {
            Self::Stay => None,
            Self::Transition(state) => Some(*state),
        }
    }

    /// Keep this decision if it transitions, otherwise evaluate `next`.
    ///
    /// Lets handlers list transition rules in priority order.
    pub fn or_else<F>(self, next: F) -> Self
    where
        F: FnOnce() -> Self,
    {
        match self {
            Self::Stay => next(),
            transition => transition,
        }
    }
}

impl<S: State> Default for Decision<S> {
    fn default() -> Self {
        Self::Stay
    }
}
