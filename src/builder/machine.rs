//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::ResolvedConfig;
use crate::core::{enumeration_mismatches, State, TransitionLog, DEFAULT_HISTORY_CAPACITY};
use crate::graph::{validate, violations, Topology};
use crate::runtime::{StateHandler, StateMachine};

/// Builder for constructing state machines with a fluent API.
///
/// The built machine is not yet initialized: set `now` and call
/// [`StateMachine::initialize`] before the first tick.
///
/// # Example
///
/// ```
/// use tickfsm::builder::MachineBuilder;
/// use tickfsm::core::{Context, Decision};
/// use tickfsm::graph::Topology;
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Fan {
///         Stopped,
///         Spinning,
///     }
/// }
///
/// let machine = MachineBuilder::new()
///     .initial(Fan::Stopped)
///     .handler(|state: Fan, ctx: &mut Context<Fan, bool>| match state {
///         Fan::Stopped => Decision::when(ctx.data, Fan::Spinning),
///         Fan::Spinning => Decision::when(!ctx.data, Fan::Stopped),
///     })
///     .data(false)
///     .topology(
///         Topology::new()
///             .edge(Fan::Stopped, Fan::Spinning)
///             .edge(Fan::Spinning, Fan::Stopped),
///     )
///     .strict(true)
///     .build()
///     .unwrap();
///
/// assert!(!machine.is_initialized());
/// assert!(machine.is_strict());
/// ```
pub struct MachineBuilder<S: State, D, H> {
    initial: Option<S>,
    handler: Option<H>,
    data: Option<D>,
    history_capacity: usize,
    topology: Option<Topology<S>>,
    strict: bool,
}

impl<S: State, D, H> MachineBuilder<S, D, H>
where
    H: StateHandler<S, D>,
{
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            handler: None,
            data: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            topology: None,
            strict: false,
        }
    }

    /// Start from a resolved configuration: initial state, history capacity,
    /// strictness and declared transitions.
    pub fn from_config(config: &ResolvedConfig<S>) -> Self {
        let builder = Self::new()
            .initial(config.initial)
            .history_capacity(config.history_capacity)
            .strict(config.strict_transitions);
        match &config.topology {
            Some(topology) => builder.topology(topology.clone()),
            None => builder,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Set the handler (required).
    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Set the caller-defined signal fields. Defaults to `D::default()`.
    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Number of transitions retained in the log. `0` disables it.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Declare the expected transitions.
    pub fn topology(mut self, topology: Topology<S>) -> Self {
        self.topology = Some(topology);
        self
    }

    /// Panic on transitions the topology does not declare. Building a strict
    /// machine without a topology fails with
    /// [`BuildError::StrictWithoutTopology`].
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Build the state machine.
    /// Returns an error if required fields are missing, the state
    /// enumeration is inconsistent, the topology is invalid, or strict
    /// checking was requested without a topology.
    pub fn build(mut self) -> Result<StateMachine<S, D, H>, BuildError>
    where
        D: Default,
    {
        let data = self.data.take().unwrap_or_default();
        self.finish(data)
    }

    /// Build with explicitly supplied data, for `D` without a default.
    pub fn build_with(self, data: D) -> Result<StateMachine<S, D, H>, BuildError> {
        self.finish(data)
    }

    fn finish(mut self, data: D) -> Result<StateMachine<S, D, H>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let handler = self.handler.take().ok_or(BuildError::MissingHandler)?;

        let details = enumeration_mismatches::<S>();
        if !details.is_empty() {
            return Err(BuildError::InconsistentEnumeration { details });
        }

        let machine = StateMachine::new(initial, handler, data)
            .with_history(TransitionLog::new(self.history_capacity));

        match self.topology {
            Some(topology) => {
                let found = violations(validate(&topology, initial));
                if !found.is_empty() {
                    return Err(BuildError::InvalidTopology { violations: found });
                }
                Ok(machine.with_topology(topology, self.strict))
            }
            None if self.strict => Err(BuildError::StrictWithoutTopology),
            None => Ok(machine),
        }
    }
}

impl<S, D, H> Default for MachineBuilder<S, D, H>
where
    S: State,
    H: StateHandler<S, D>,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, Decision};
    use crate::graph::TopologyViolation;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
        final: [Complete]
    }

    fn advance(state: TestState, _ctx: &mut Context<TestState, u8>) -> Decision<TestState> {
        match state {
            TestState::Initial => Decision::to(TestState::Processing),
            TestState::Processing => Decision::to(TestState::Complete),
            TestState::Complete => Decision::stay(),
        }
    }

    type Handler = fn(TestState, &mut Context<TestState, u8>) -> Decision<TestState>;

    #[test]
    fn builder_validates_required_fields() {
        let result = MachineBuilder::<TestState, u8, Handler>::new()
            .handler(advance)
            .build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_handler() {
        let result = MachineBuilder::<TestState, u8, Handler>::new()
            .initial(TestState::Initial)
            .build();

        assert!(matches!(result, Err(BuildError::MissingHandler)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = MachineBuilder::<TestState, u8, Handler>::new()
            .initial(TestState::Initial)
            .handler(advance)
            .data(9)
            .history_capacity(2)
            .build()
            .unwrap();

        assert_eq!(machine.current_state(), TestState::Initial);
        assert_eq!(*machine.data(), 9);
        assert_eq!(machine.history().capacity(), 2);
        assert!(machine.topology().is_none());
    }

    #[test]
    fn data_defaults_when_not_supplied() {
        let machine = MachineBuilder::<TestState, u8, Handler>::new()
            .initial(TestState::Initial)
            .handler(advance)
            .build()
            .unwrap();

        assert_eq!(*machine.data(), 0);
    }

    #[test]
    fn invalid_topology_is_rejected() {
        let result = MachineBuilder::<TestState, u8, Handler>::new()
            .initial(TestState::Initial)
            .handler(advance)
            .topology(Topology::new().edge(TestState::Initial, TestState::Processing))
            .build();

        match result {
            Err(BuildError::InvalidTopology { violations }) => {
                assert_eq!(
                    violations,
                    vec![TopologyViolation::Unreachable {
                        state: "Complete".to_string(),
                        initial: "Initial".to_string(),
                    }]
                );
            }
            _ => panic!("expected an invalid topology"),
        }
    }

    #[test]
    fn valid_topology_is_attached() {
        let machine = MachineBuilder::<TestState, u8, Handler>::new()
            .initial(TestState::Initial)
            .handler(advance)
            .topology(
                Topology::new()
                    .edge(TestState::Initial, TestState::Processing)
                    .edge(TestState::Processing, TestState::Complete),
            )
            .strict(true)
            .build()
            .unwrap();

        assert!(machine.is_strict());
        assert_eq!(machine.topology().map(|t| t.edges().len()), Some(2));
    }

    #[test]
    fn strict_without_topology_is_rejected() {
        let result = MachineBuilder::<TestState, u8, Handler>::new()
            .initial(TestState::Initial)
            .handler(advance)
            .strict(true)
            .build();

        assert!(matches!(result, Err(BuildError::StrictWithoutTopology)));
    }
}
