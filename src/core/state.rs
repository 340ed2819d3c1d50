//! Core State trait for tick-driven machines.
//!
//! A state is pure identity: an element of a closed, enumerable set. The
//! runtime uses the enumeration to size and index the per-state timer table,
//! so the trait exposes every variant in index order.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// Implementors are fieldless enums. `ALL` lists every variant in index
/// order and `ALL[i].index() == i` must hold for every `i`; the builders
/// reject enumerations that break this.
///
/// Prefer the [`state_enum!`](crate::state_enum) macro, which derives a
/// consistent implementation.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
/// enum Valve {
///     Closed,
///     Open,
/// }
///
/// impl State for Valve {
///     const ALL: &'static [Self] = &[Self::Closed, Self::Open];
///
///     fn index(&self) -> usize {
///         *self as usize
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Closed => "Closed",
///             Self::Open => "Open",
///         }
///     }
/// }
///
/// assert_eq!(Valve::count(), 2);
/// assert_eq!(Valve::from_name("Open"), Some(Valve::Open));
/// ```
pub trait State:
    Copy + Eq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Every state, in index order.
    const ALL: &'static [Self];

    /// Position of this state in [`State::ALL`] and in the timer table.
    fn index(&self) -> usize;

    /// Get the state's name for display/logging.
    fn name(&self) -> &'static str;

    /// Check if this is a final (terminal) state.
    ///
    /// A machine sitting in a final state no longer dispatches its handler.
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Enclosing composite state, `None` for top-level states.
    fn parent(&self) -> Option<Self> {
        None
    }

    /// Child entered when this composite state is entered without history.
    /// `Some` exactly for composite states.
    fn initial_child(&self) -> Option<Self> {
        None
    }

    /// Whether re-entering this composite state resumes its last active
    /// child instead of [`State::initial_child`].
    fn keeps_history(&self) -> bool {
        false
    }

    /// Whether this state has children.
    fn is_composite(&self) -> bool {
        self.initial_child().is_some()
    }

    /// Number of states in the enumeration.
    fn count() -> usize {
        Self::ALL.len()
    }

    /// Look up a state by index.
    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look up a state by its [`State::name`].
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }
}

/// Check that `ALL` and `index()` agree and that the parent links form a
/// well-formed tree, returning a description of every mismatch.
pub(crate) fn enumeration_mismatches<S: State>() -> Vec<String> {
    let mut problems = Vec::new();
    if S::ALL.is_empty() {
        problems.push("state enumeration is empty".to_string());
    }
    for (position, state) in S::ALL.iter().enumerate() {
        if state.index() != position {
            problems.push(format!(
                "state '{}' listed at position {} reports index {}",
                state.name(),
                position,
                state.index()
            ));
        }
        problems.extend(hierarchy_mismatches(*state));
    }
    problems
}

fn hierarchy_mismatches<S: State>(state: S) -> Vec<String> {
    let mut problems = Vec::new();

    let mut depth = 0;
    let mut cursor = state.parent();
    while let Some(ancestor) = cursor {
        depth += 1;
        if ancestor == state || depth > S::count() {
            problems.push(format!("state '{}' is its own ancestor", state.name()));
            break;
        }
        cursor = ancestor.parent();
    }

    if let Some(parent) = state.parent() {
        if !parent.is_composite() {
            problems.push(format!(
                "state '{}' has parent '{}', which declares no initial child",
                state.name(),
                parent.name()
            ));
        }
    }

    if let Some(child) = state.initial_child() {
        if child.parent() != Some(state) {
            problems.push(format!(
                "initial child '{}' of '{}' is not one of its children",
                child.name(),
                state.name()
            ));
        }
        if state.is_final() {
            problems.push(format!("composite state '{}' is final", state.name()));
        }
    } else if state.keeps_history() {
        problems.push(format!(
            "state '{}' keeps history but has no children",
            state.name()
        ));
    }

    problems
}
