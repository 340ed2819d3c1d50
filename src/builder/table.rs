//! Builder for table-driven handlers.

use crate::builder::error::BuildError;
use crate::core::{enumeration_mismatches, Context, Decision, State};
use crate::runtime::{HandlerTable, HookFn, RunFn};

/// Builder for [`HandlerTable`] with a fluent API.
///
/// Every state needs a run function; `build` reports all states that lack
/// one.
///
/// # Example
///
/// ```
/// use tickfsm::builder::HandlerTableBuilder;
/// use tickfsm::core::Decision;
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Blinker {
///         Dark,
///         Lit,
///     }
/// }
///
/// let table = HandlerTableBuilder::<Blinker, ()>::new()
///     .on(Blinker::Dark, |ctx| Decision::when(ctx.elapsed_in(Blinker::Dark) >= 0.5, Blinker::Lit))
///     .on(Blinker::Lit, |ctx| Decision::when(ctx.elapsed_in(Blinker::Lit) >= 0.5, Blinker::Dark))
///     .build();
///
/// assert!(table.is_ok());
/// ```
pub struct HandlerTableBuilder<S: State, D> {
    run: Vec<Option<RunFn<S, D>>>,
    entry: Vec<Option<HookFn<S, D>>>,
    exit: Vec<Option<HookFn<S, D>>>,
    global_entry: Option<HookFn<S, D>>,
    global_exit: Option<HookFn<S, D>>,
}

impl<S: State, D: 'static> HandlerTableBuilder<S, D> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            run: empty_slots::<_, S>(),
            entry: empty_slots::<_, S>(),
            exit: empty_slots::<_, S>(),
            global_entry: None,
            global_exit: None,
        }
    }

    /// Set the run function for `state`, replacing any previous one.
    pub fn on<F>(mut self, state: S, run: F) -> Self
    where
        F: FnMut(&mut Context<S, D>) -> Decision<S> + Send + 'static,
    {
        if let Some(slot) = self.run.get_mut(state.index()) {
            *slot = Some(Box::new(run));
        }
        self
    }

    /// Use a copy of `run` for every state that has no run function yet.
    pub fn on_all<F>(mut self, run: F) -> Self
    where
        F: FnMut(&mut Context<S, D>) -> Decision<S> + Clone + Send + 'static,
    {
        for slot in self.run.iter_mut().filter(|slot| slot.is_none()) {
            *slot = Some(Box::new(run.clone()));
        }
        self
    }

    /// Hook run when `state` is entered.
    pub fn on_entry<F>(mut self, state: S, hook: F) -> Self
    where
        F: FnMut(S, &mut Context<S, D>) + Send + 'static,
    {
        if let Some(slot) = self.entry.get_mut(state.index()) {
            *slot = Some(Box::new(hook));
        }
        self
    }

    /// Hook run when `state` is left.
    pub fn on_exit<F>(mut self, state: S, hook: F) -> Self
    where
        F: FnMut(S, &mut Context<S, D>) + Send + 'static,
    {
        if let Some(slot) = self.exit.get_mut(state.index()) {
            *slot = Some(Box::new(hook));
        }
        self
    }

    /// Hook run on entering any state, before the state's own entry hook.
    pub fn on_any_entry<F>(mut self, hook: F) -> Self
    where
        F: FnMut(S, &mut Context<S, D>) + Send + 'static,
    {
        self.global_entry = Some(Box::new(hook));
        self
    }

    /// Hook run on leaving any state, before the state's own exit hook.
    pub fn on_any_exit<F>(mut self, hook: F) -> Self
    where
        F: FnMut(S, &mut Context<S, D>) + Send + 'static,
    {
        self.global_exit = Some(Box::new(hook));
        self
    }

    /// Build the table.
    /// Returns an error if the enumeration is inconsistent or any state has
    /// no run function.
    pub fn build(self) -> Result<HandlerTable<S, D>, BuildError> {
        let details = enumeration_mismatches::<S>();
        if !details.is_empty() {
            return Err(BuildError::InconsistentEnumeration { details });
        }

        let missing: Vec<String> = S::ALL
            .iter()
            .filter(|s| self.run[s.index()].is_none())
            .map(|s| s.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(BuildError::MissingHandlers { states: missing });
        }

        Ok(HandlerTable {
            run: self.run.into_iter().flatten().collect(),
            entry: self.entry,
            exit: self.exit,
            global_entry: self.global_entry,
            global_exit: self.global_exit,
        })
    }
}

impl<S: State, D: 'static> Default for HandlerTableBuilder<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_slots<T, S: State>() -> Vec<Option<T>> {
    std::iter::repeat_with(|| None).take(S::count()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::StateHandler;
    use crate::state_enum;

    state_enum! {
        enum Feeder {
            Waiting,
            Dispensing,
            Jammed,
        }
    }

    #[test]
    fn builder_reports_every_missing_state() {
        let result = HandlerTableBuilder::<Feeder, ()>::new()
            .on(Feeder::Waiting, |_| Decision::stay())
            .build();

        match result {
            Err(BuildError::MissingHandlers { states }) => {
                assert_eq!(states, vec!["Dispensing", "Jammed"]);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected missing handlers"),
        }
    }

    #[test]
    fn on_all_fills_only_empty_slots() {
        let mut table = HandlerTableBuilder::<Feeder, ()>::new()
            .on(Feeder::Waiting, |_| Decision::to(Feeder::Dispensing))
            .on_all(|_| Decision::stay())
            .build()
            .unwrap();
        let mut ctx = Context::new(());

        assert_eq!(table.run(Feeder::Waiting, &mut ctx), Decision::to(Feeder::Dispensing));
        assert_eq!(table.run(Feeder::Jammed, &mut ctx), Decision::Stay);
    }

    #[test]
    fn later_run_function_replaces_earlier() {
        let mut table = HandlerTableBuilder::<Feeder, ()>::new()
            .on_all(|_| Decision::stay())
            .on(Feeder::Jammed, |_| Decision::to(Feeder::Waiting))
            .build()
            .unwrap();
        let mut ctx = Context::new(());

        assert_eq!(table.run(Feeder::Jammed, &mut ctx), Decision::to(Feeder::Waiting));
    }

    #[test]
    fn missing_handlers_message_lists_states() {
        let err = BuildError::MissingHandlers {
            states: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.to_string(), "No run function for states: A, B");
    }
}
