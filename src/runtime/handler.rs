//! State handlers: the application logic dispatched once per tick.

use crate::core::{Context, Decision, State};

/// Logic associated with the machine's states.
///
/// `run` is called once per tick for the current state and returns the
/// decision. The hooks run inside the tick that applies a transition: the
/// old state's `on_exit`, then the new state's `on_entry` once its timer has
/// been recorded. Hooks may change `ctx.data` but cannot request a
/// transition.
pub trait StateHandler<S: State, D> {
    fn run(&mut self, state: S, ctx: &mut Context<S, D>) -> Decision<S>;

    fn on_entry(&mut self, _state: S, _ctx: &mut Context<S, D>) {}

    fn on_exit(&mut self, _state: S, _ctx: &mut Context<S, D>) {}
}

impl<S, D, F> StateHandler<S, D> for F
where
    S: State,
    F: FnMut(S, &mut Context<S, D>) -> Decision<S>,
{
    fn run(&mut self, state: S, ctx: &mut Context<S, D>) -> Decision<S> {
        self(state, ctx)
    }
}

/// Per-state run function stored in a [`HandlerTable`].
pub type RunFn<S, D> = Box<dyn FnMut(&mut Context<S, D>) -> Decision<S> + Send>;

/// Entry/exit hook stored in a [`HandlerTable`].
pub type HookFn<S, D> = Box<dyn FnMut(S, &mut Context<S, D>) + Send>;

/// Table-driven handler: one run function per state, indexed by
/// [`State::index`], with optional per-state and global hooks.
///
/// Built with [`HandlerTableBuilder`](crate::builder::HandlerTableBuilder),
/// which guarantees every state has a run function.
pub struct HandlerTable<S: State, D> {
    pub(crate) run: Vec<RunFn<S, D>>,
    pub(crate) entry: Vec<Option<HookFn<S, D>>>,
    pub(crate) exit: Vec<Option<HookFn<S, D>>>,
    pub(crate) global_entry: Option<HookFn<S, D>>,
    pub(crate) global_exit: Option<HookFn<S, D>>,
}

impl<S: State, D> HandlerTable<S, D> {
    /// Whether `state` has a dedicated entry hook.
    pub fn has_entry_hook(&self, state: S) -> bool {
        self.entry
            .get(state.index())
            .is_some_and(|hook| hook.is_some())
    }

    /// Whether `state` has a dedicated exit hook.
    pub fn has_exit_hook(&self, state: S) -> bool {
        self.exit
            .get(state.index())
            .is_some_and(|hook| hook.is_some())
    }
}

impl<S: State, D> StateHandler<S, D> for HandlerTable<S, D> {
    fn run(&mut self, state: S, ctx: &mut Context<S, D>) -> Decision<S> {
        let run = self.run.get_mut(state.index()).unwrap_or_else(|| {
            panic!(
                "no run function for state '{}' (index {})",
                state.name(),
                state.index()
            )
        });
        run(ctx)
    }

    fn on_entry(&mut self, state: S, ctx: &mut Context<S, D>) {
        if let Some(global) = self.global_entry.as_mut() {
            global(state, ctx);
        }
        if let Some(Some(hook)) = self.entry.get_mut(state.index()) {
            hook(state, ctx);
        }
    }

    fn on_exit(&mut self, state: S, ctx: &mut Context<S, D>) {
        if let Some(global) = self.global_exit.as_mut() {
            global(state, ctx);
        }
        if let Some(Some(hook)) = self.exit.get_mut(state.index()) {
            hook(state, ctx);
        }
    }
}
