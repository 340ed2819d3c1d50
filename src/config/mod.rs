//! JSON machine configuration.
//!
//! A [`MachineConfig`] names states by their [`State::name`]; resolving it
//! against a concrete enumeration yields a [`ResolvedConfig`] that
//! [`MachineBuilder::from_config`](crate::builder::MachineBuilder::from_config)
//! consumes.
//!
//! # Example
//!
//! ```rust
//! use tickfsm::config::MachineConfig;
//! use tickfsm::state_enum;
//!
//! state_enum! {
//!     enum Pump {
//!         Idle,
//!         Priming,
//!         Running,
//!     }
//! }
//!
//! let config = MachineConfig::from_json_str(
//!     r#"{
//!         "initial": "Idle",
//!         "strict_transitions": true,
//!         "transitions": [
//!             { "from": "Idle", "to": "Priming", "label": "start" },
//!             { "from": "Priming", "to": "Running" },
//!             { "from": "Running", "to": "Idle" }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! let resolved = config.resolve::<Pump>().unwrap();
//! assert_eq!(resolved.initial, Pump::Idle);
//! assert_eq!(resolved.history_capacity, 64);
//! assert!(resolved.strict_transitions);
//! ```

mod error;

pub use error::ConfigError;

use crate::builder::BuildError;
use crate::core::{State, DEFAULT_HISTORY_CAPACITY};
use crate::graph::{validate, violations, Edge, Topology};
use serde::{Deserialize, Serialize};

/// Machine settings as written in a configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Name of the state the machine starts in.
    pub initial: String,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    #[serde(default)]
    pub strict_transitions: bool,

    /// Declared transitions. Empty means no topology.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<EdgeConfig>,
}

/// One declared transition, by state name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeConfig {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

/// A configuration bound to a concrete state enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig<S: State> {
    pub initial: S,
    pub history_capacity: usize,
    pub strict_transitions: bool,
    pub topology: Option<Topology<S>>,
}

impl MachineConfig {
    /// Configuration with defaults for everything but the initial state.
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            initial: initial.into(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            strict_transitions: false,
            transitions: Vec::new(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve state names against `S`.
    ///
    /// Every unknown name is reported in one [`ConfigError::UnknownStates`].
    /// A non-empty transition list is validated against the initial state.
    /// Strict checking with an empty transition list is rejected.
    pub fn resolve<S: State>(&self) -> Result<ResolvedConfig<S>, ConfigError> {
        let mut unknown: Vec<String> = Vec::new();
        let mut lookup = |name: &str| {
            let found = S::from_name(name);
            if found.is_none() && !unknown.iter().any(|n| n == name) {
                unknown.push(name.to_string());
            }
            found
        };

        let initial = lookup(&self.initial);
        let edges: Vec<Option<Edge<S>>> = self
            .transitions
            .iter()
            .map(|edge| {
                let from = lookup(&edge.from);
                let to = lookup(&edge.to);
                Some(Edge {
                    from: from?,
                    to: to?,
                    label: edge.label.clone(),
                })
            })
            .collect();

        let initial = match initial {
            Some(initial) if unknown.is_empty() => initial,
            _ => return Err(ConfigError::UnknownStates { names: unknown }),
        };

        let topology = if edges.is_empty() {
            if self.strict_transitions {
                return Err(BuildError::StrictWithoutTopology.into());
            }
            None
        } else {
            let mut topology = Topology::new();
            for edge in edges.into_iter().flatten() {
                topology.push(edge);
            }
            let found = violations(validate(&topology, initial));
            if !found.is_empty() {
                return Err(BuildError::InvalidTopology { violations: found }.into());
            }
            Some(topology)
        };

        Ok(ResolvedConfig {
            initial,
            history_capacity: self.history_capacity,
            strict_transitions: self.strict_transitions,
            topology,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::TopologyViolation;
    use crate::state_enum;

    state_enum! {
        enum Door {
            Closed,
            Opening,
            Open,
        }
    }

    #[test]
    fn defaults_apply_when_fields_are_omitted() {
        let config = MachineConfig::from_json_str(r#"{ "initial": "Closed" }"#).unwrap();

        assert_eq!(config, MachineConfig::new("Closed"));

        let resolved = config.resolve::<Door>().unwrap();
        assert_eq!(resolved.initial, Door::Closed);
        assert_eq!(resolved.history_capacity, DEFAULT_HISTORY_CAPACITY);
        assert!(!resolved.strict_transitions);
        assert!(resolved.topology.is_none());
    }

    #[test]
    fn missing_initial_is_a_parse_error() {
        let result = MachineConfig::from_json_str(r#"{ "history_capacity": 4 }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn transitions_resolve_into_topology() {
        let config = MachineConfig::from_json_str(
            r#"{
                "initial": "Closed",
                "history_capacity": 8,
                "transitions": [
                    { "from": "Closed", "to": "Opening", "label": "button" },
                    { "from": "Opening", "to": "Open" },
                    { "from": "Open", "to": "Closed" }
                ]
            }"#,
        )
        .unwrap();

        let resolved = config.resolve::<Door>().unwrap();
        let topology = resolved.topology.unwrap();

        assert_eq!(resolved.history_capacity, 8);
        assert_eq!(topology.edges().len(), 3);
        assert_eq!(topology.edges()[0].label.as_deref(), Some("button"));
        assert!(topology.allows(Door::Opening, Door::Open));
    }

    #[test]
    fn every_unknown_name_is_reported_once() {
        let mut config = MachineConfig::new("Ajar");
        config.transitions = vec![
            EdgeConfig {
                from: "Ajar".to_string(),
                to: "Open".to_string(),
                label: None,
            },
            EdgeConfig {
                from: "Open".to_string(),
                to: "Locked".to_string(),
                label: None,
            },
        ];

        match config.resolve::<Door>() {
            Err(ConfigError::UnknownStates { names }) => {
                assert_eq!(names, vec!["Ajar", "Locked"]);
            }
            other => panic!("expected unknown states, got {other:?}"),
        }
    }

    #[test]
    fn invalid_topology_is_a_build_error() {
        let mut config = MachineConfig::new("Closed");
        config.transitions = vec![EdgeConfig {
            from: "Closed".to_string(),
            to: "Opening".to_string(),
            label: None,
        }];

        match config.resolve::<Door>() {
            Err(ConfigError::Build(BuildError::InvalidTopology { violations })) => {
                assert_eq!(
                    violations,
                    vec![TopologyViolation::Unreachable {
                        state: "Open".to_string(),
                        initial: "Closed".to_string(),
                    }]
                );
            }
            other => panic!("expected an invalid topology, got {other:?}"),
        }
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut config = MachineConfig::new("Closed");
        config.strict_transitions = true;

        let text = config.to_json_string().unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["strict_transitions"], serde_json::Value::Bool(true));
        assert!(value.get("transitions").is_none());
        assert_eq!(MachineConfig::from_json_str(&text).unwrap(), config);
    }

    #[test]
    fn strict_without_transitions_is_a_build_error() {
        let mut config = MachineConfig::new("Closed");
        config.strict_transitions = true;

        assert!(matches!(
            config.resolve::<Door>(),
            Err(ConfigError::Build(BuildError::StrictWithoutTopology))
        ));
    }
}
