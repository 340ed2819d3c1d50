//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for creating state machines
//! with minimal boilerplate while maintaining type safety.

pub mod error;
pub mod machine;
pub mod macros;
pub mod table;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use table::HandlerTableBuilder;

use crate::config::{ConfigError, MachineConfig};
use crate::core::State;
use crate::runtime::{StateHandler, StateMachine};

/// Build a machine from JSON configuration text.
///
/// # Example
///
/// ```
/// use tickfsm::builder::machine_from_json;
/// use tickfsm::core::{Context, Decision};
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Relay {
///         Off,
///         On,
///     }
/// }
///
/// let mut machine = machine_from_json::<Relay, _, _>(
///     r#"{ "initial": "Off", "history_capacity": 4 }"#,
///     |state: Relay, ctx: &mut Context<Relay, bool>| match state {
///         Relay::Off => Decision::when(ctx.data, Relay::On),
///         Relay::On => Decision::when(!ctx.data, Relay::Off),
///     },
///     true,
/// )
/// .unwrap();
///
/// machine.initialize();
/// machine.tick_at(1.0);
/// assert_eq!(machine.current_state(), Relay::On);
/// assert_eq!(machine.history().capacity(), 4);
/// ```
pub fn machine_from_json<S, D, H>(
    json: &str,
    handler: H,
    data: D,
) -> Result<StateMachine<S, D, H>, ConfigError>
where
    S: State,
    H: StateHandler<S, D>,
{
    let config = MachineConfig::from_json_str(json)?.resolve::<S>()?;
    let machine = MachineBuilder::from_config(&config)
        .handler(handler)
        .build_with(data)?;
    Ok(machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Context, Decision};
    use crate::state_enum;

    state_enum! {
        enum Gate {
            Down,
            Up,
        }
    }

    fn gate(state: Gate, ctx: &mut Context<Gate, u8>) -> Decision<Gate> {
        match state {
            Gate::Down => Decision::when(ctx.data > 0, Gate::Up),
            Gate::Up => Decision::when(ctx.data == 0, Gate::Down),
        }
    }

    #[test]
    fn json_config_builds_strict_machine() {
        let machine = machine_from_json::<Gate, _, _>(
            r#"{
                "initial": "Down",
                "strict_transitions": true,
                "transitions": [
                    { "from": "Down", "to": "Up" },
                    { "from": "Up", "to": "Down" }
                ]
            }"#,
            gate,
            0u8,
        )
        .unwrap();

        assert_eq!(machine.initial_state(), Gate::Down);
        assert!(machine.is_strict());
        assert!(machine.topology().is_some());
    }

    #[test]
    fn unknown_initial_state_is_reported() {
        let result = machine_from_json::<Gate, _, _>(r#"{ "initial": "Sideways" }"#, gate, 0u8);

        match result {
            Err(ConfigError::UnknownStates { names }) => assert_eq!(names, vec!["Sideways"]),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an unknown state"),
        }
    }

    #[test]
    fn strict_json_without_transitions_is_reported() {
        let result = machine_from_json::<Gate, _, _>(
            r#"{ "initial": "Down", "strict_transitions": true }"#,
            gate,
            0u8,
        );

        assert!(matches!(
            result,
            Err(ConfigError::Build(BuildError::StrictWithoutTopology))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = machine_from_json::<Gate, _, _>("[]", gate, 0u8);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
