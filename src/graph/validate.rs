//! Structural checks on a declared topology.
//!
//! Uses Stillwater's `Validation` so every problem is reported in a single
//! pass instead of stopping at the first one.

use crate::core::State;
use crate::graph::topology::Topology;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A structural problem in a declared topology.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TopologyViolation {
    #[error("Edge '{from}' -> '{to}' is declared more than once")]
    DuplicateEdge { from: String, to: String },

    #[error("Final state '{from}' has an outgoing edge to '{to}'")]
    EdgeFromFinal { from: String, to: String },

    #[error("Edge '{state}' -> '{state}' targets its own source")]
    SelfLoop { state: String },

    #[error("State '{state}' is unreachable from initial state '{initial}'")]
    Unreachable { state: String, initial: String },
}

/// Check a topology against the machine's initial state, accumulating ALL
/// violations.
///
/// Self-loops are rejected because a self-transition never re-enters a
/// state; declaring one documents behavior the runtime will not perform.
///
/// # Example
///
/// ```rust
/// use tickfsm::graph::{validate, Topology, TopologyViolation};
/// use tickfsm::state_enum;
/// use stillwater::validation::Validation;
///
/// state_enum! {
///     enum Step {
///         First,
///         Second,
///         Orphan,
///     }
/// }
///
/// let topology = Topology::new().edge(Step::First, Step::Second);
///
/// match validate(&topology, Step::First) {
///     Validation::Failure(errors) => {
///         assert!(errors
///             .iter()
///             .any(|e| matches!(e, TopologyViolation::Unreachable { .. })));
///     }
///     Validation::Success(_) => panic!("Orphan should be unreachable"),
/// }
/// ```
pub fn validate<S: State>(
    topology: &Topology<S>,
    initial: S,
) -> Validation<(), NonEmptyVec<TopologyViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<TopologyViolation>>> = Vec::new();
    let edges = topology.edges();

    for (i, edge) in edges.iter().enumerate() {
        let duplicated = edges[..i]
            .iter()
            .any(|earlier| earlier.from == edge.from && earlier.to == edge.to);
        if duplicated {
            checks.push(Validation::fail(TopologyViolation::DuplicateEdge {
                from: edge.from.name().to_string(),
                to: edge.to.name().to_string(),
            }));
        }

        if edge.from.is_final() {
            checks.push(Validation::fail(TopologyViolation::EdgeFromFinal {
                from: edge.from.name().to_string(),
                to: edge.to.name().to_string(),
            }));
        }

        if edge.from == edge.to {
            checks.push(Validation::fail(TopologyViolation::SelfLoop {
                state: edge.from.name().to_string(),
            }));
        }
    }

    let reachable = topology.reachable_from(initial);
    for state in S::ALL {
        let seen = reachable.get(state.index()).copied().unwrap_or(false);
        if !seen {
            checks.push(Validation::fail(TopologyViolation::Unreachable {
                state: state.name().to_string(),
                initial: initial.name().to_string(),
            }));
        }
    }

    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

/// Collect a validation outcome into a plain list of violations.
pub(crate) fn violations(
    result: Validation<(), NonEmptyVec<TopologyViolation>>,
) -> Vec<TopologyViolation> {
    match result {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
