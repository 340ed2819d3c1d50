//! Declared transition edges.

use crate::core::State;
use serde::{Deserialize, Serialize};

/// One declared transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Edge<S: State> {
    pub from: S,
    pub to: S,
    /// Human-readable condition, shown on rendered diagrams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The set of transitions a machine is expected to take.
///
/// Handlers still decide transitions at run time. A topology documents them,
/// lets [`validate`](crate::graph::validate) catch structural mistakes, and
/// in strict mode makes the runtime panic on a transition nobody declared.
///
/// # Example
///
/// ```rust
/// use tickfsm::graph::Topology;
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Light {
///         Red,
///         Green,
///         Yellow,
///     }
/// }
///
/// let topology = Topology::new()
///     .labeled(Light::Red, Light::Green, "elapsed >= 30")
///     .labeled(Light::Green, Light::Yellow, "elapsed >= 25")
///     .labeled(Light::Yellow, Light::Red, "elapsed >= 5");
///
/// assert!(topology.allows(Light::Red, Light::Green));
/// assert!(!topology.allows(Light::Red, Light::Yellow));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Topology<S: State> {
    edges: Vec<Edge<S>>,
}

impl<S: State> Default for Topology<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> Topology<S> {
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Declare an unlabeled edge.
    pub fn edge(mut self, from: S, to: S) -> Self {
        self.edges.push(Edge {
            from,
            to,
            label: None,
        });
        self
    }

    /// Declare an edge with a label.
    pub fn labeled(mut self, from: S, to: S, label: impl Into<String>) -> Self {
        self.edges.push(Edge {
            from,
            to,
            label: Some(label.into()),
        });
        self
    }

    pub fn push(&mut self, edge: Edge<S>) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[Edge<S>] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether `from -> to` is declared.
    pub fn allows(&self, from: S, to: S) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    /// Declared targets reachable in one step from `state`.
    pub fn successors(&self, state: S) -> impl Iterator<Item = S> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.from == state)
            .map(|e| e.to)
    }

    /// States reachable from `start` through declared edges, including
    /// `start` itself. A reachable composite makes its initial child
    /// reachable, and a reachable child makes its parent reachable.
    /// Indexed by [`State::index`].
    pub fn reachable_from(&self, start: S) -> Vec<bool> {
        let mut seen = vec![false; S::count()];
        let mut stack = vec![start];
        while let Some(state) = stack.pop() {
            let Some(slot) = seen.get_mut(state.index()) else {
                continue;
            };
            if *slot {
                continue;
            }
            *slot = true;
            stack.extend(self.successors(state));
            // Entering a composite enters its initial child, and a child
            // is always active inside its parent.
            stack.extend(state.initial_child());
            stack.extend(state.parent());
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Mode {
            Boot,
            Run,
            Fault,
            Off,
        }
        final: [Off]
    }

    #[test]
    fn successors_follow_declared_edges() {
        let topology = Topology::new()
            .edge(Mode::Boot, Mode::Run)
            .edge(Mode::Boot, Mode::Fault)
            .edge(Mode::Run, Mode::Off);

        let next: Vec<Mode> = topology.successors(Mode::Boot).collect();
        assert_eq!(next, vec![Mode::Run, Mode::Fault]);
        assert_eq!(topology.successors(Mode::Off).count(), 0);
    }

    #[test]
    fn reachable_from_walks_transitively() {
        let topology = Topology::new()
            .edge(Mode::Boot, Mode::Run)
            .edge(Mode::Run, Mode::Off);

        assert_eq!(topology.reachable_from(Mode::Boot), vec![true, true, false, true]);
        assert_eq!(topology.reachable_from(Mode::Fault), vec![false, false, true, false]);
    }

    #[test]
    fn nested_states_reach_through_parent_and_initial_child() {
        state_enum! {
            enum Dryer {
                Idle,
                Drying,
                Heat,
                Tumble,
                Done,
            }
            final: [Done]
            composite: { Drying => [Heat, Tumble] }
        }

        let topology = Topology::new()
            .edge(Dryer::Idle, Dryer::Drying)
            .edge(Dryer::Heat, Dryer::Tumble)
            .edge(Dryer::Drying, Dryer::Done);

        assert_eq!(topology.reachable_from(Dryer::Idle), vec![true; 5]);
        assert_eq!(
            topology.reachable_from(Dryer::Tumble),
            vec![false, true, true, true, true]
        );
    }

    #[test]
    fn topology_serializes_with_labels() {
        let topology = Topology::new()
            .labeled(Mode::Boot, Mode::Run, "ready")
            .edge(Mode::Run, Mode::Off);

        let json = serde_json::to_string(&topology).unwrap();
        assert!(json.contains("\"label\":\"ready\""));

        let back: Topology<Mode> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, topology);
    }
}
