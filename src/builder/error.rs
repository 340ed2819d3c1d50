//! Build errors for machines and handler tables.

use crate::graph::TopologyViolation;
use thiserror::Error;

/// Errors that can occur when building state machines and handler tables.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Handler not specified. Call .handler(h) before .build()")]
    MissingHandler,

    #[error("No run function for states: {}", .states.join(", "))]
    MissingHandlers { states: Vec<String> },

    #[error("State enumeration is inconsistent: {}", .details.join("; "))]
    InconsistentEnumeration { details: Vec<String> },

    #[error("Strict transitions require a topology. Call .topology(t) or declare transitions")]
    StrictWithoutTopology,

    #[error("Topology is invalid: {}", format_violations(.violations))]
    InvalidTopology { violations: Vec<TopologyViolation> },
}

fn format_violations(violations: &[TopologyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
