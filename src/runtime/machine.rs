//! Tick-driven state machine.

use crate::core::{
    descend, is_within, lineage, shared_prefix, Context, Decision, State, StateTimers, Timestamp,
    TransitionLog, TransitionRecord,
};
use crate::graph::Topology;
use crate::runtime::handler::StateHandler;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome<S: State> {
    /// The handler asked to stay.
    Stayed(S),

    /// The handler requested the state that was already current, or one
    /// enclosing it. Timers and hooks are left alone.
    Reentered(S),

    /// The machine moved from one state to another. `to` is the leaf that
    /// became current, which lies inside the requested target when that
    /// target is composite.
    Transitioned { from: S, to: S },

    /// The current state is final; no handler was dispatched.
    Halted(S),
}

impl<S: State> TickOutcome<S> {
    /// State that is current after the tick.
    pub fn state(&self) -> S {
        match self {
            Self::Stayed(s) | Self::Reentered(s) | Self::Halted(s) => *s,
            Self::Transitioned { to, .. } => *to,
        }
    }

    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// A single active state, a shared context and the handler that drives them.
///
/// The caller owns time: it writes `now` into the context (or uses
/// [`StateMachine::tick_at`]) before each tick. The machine itself never
/// reads a clock, sleeps or blocks.
///
/// # Example
///
/// ```rust
/// use tickfsm::core::{Context, Decision};
/// use tickfsm::runtime::{StateMachine, TickOutcome};
/// use tickfsm::state_enum;
///
/// state_enum! {
///     enum Heater {
///         Off,
///         On,
///     }
/// }
///
/// // Turn on after two seconds off.
/// let handler = |state: Heater, ctx: &mut Context<Heater, ()>| match state {
///     Heater::Off => Decision::when(ctx.elapsed_in(state) >= 2.0, Heater::On),
///     Heater::On => Decision::stay(),
/// };
///
/// let mut machine = StateMachine::new(Heater::Off, handler, ());
/// machine.set_now(10.0);
/// machine.initialize();
///
/// assert_eq!(machine.tick_at(11.0), TickOutcome::Stayed(Heater::Off));
/// assert_eq!(
///     machine.tick_at(12.0),
///     TickOutcome::Transitioned { from: Heater::Off, to: Heater::On }
/// );
/// assert_eq!(machine.state_timers().as_slice(), &[10.0, 12.0]);
/// ```
pub struct StateMachine<S: State, D, H> {
    initial: S,
    current: S,
    context: Context<S, D>,
    handler: H,
    initialized: bool,
    history: TransitionLog<S>,
    last_child: Vec<Option<S>>,
    topology: Option<Topology<S>>,
    strict: bool,
}

impl<S, D, H> StateMachine<S, D, H>
where
    S: State,
    H: StateHandler<S, D>,
{
    /// Create a zero-valued machine. Call [`StateMachine::initialize`]
    /// before the first tick.
    pub fn new(initial: S, handler: H, data: D) -> Self {
        Self {
            initial,
            current: initial,
            context: Context::new(data),
            handler,
            initialized: false,
            history: TransitionLog::default(),
            last_child: vec![None; S::count()],
            topology: None,
            strict: false,
        }
    }

    pub(crate) fn with_history(mut self, history: TransitionLog<S>) -> Self {
        self.history = history;
        self
    }

    pub(crate) fn with_topology(mut self, topology: Topology<S>, strict: bool) -> Self {
        self.topology = Some(topology);
        self.strict = strict;
        self
    }

    /// Enter the initial state and baseline every timer to `now`.
    ///
    /// A composite initial state is entered down to its initial leaf. Entry
    /// hooks run outermost first, after the timers are set.
    ///
    /// # Panics
    ///
    /// Panics if the machine was already initialized.
    pub fn initialize(&mut self) {
        assert!(
            !self.initialized,
            "state machine initialized twice (current state '{}')",
            self.current.name()
        );
        let now = self.context.now();
        let mut entering = lineage(self.initial);
        entering.extend(descend(self.initial, &self.last_child));

        self.current = entering.last().copied().unwrap_or(self.initial);
        self.context.timers_mut().baseline(now);
        self.remember(&entering);
        self.initialized = true;
        info!(
            initial = self.initial.name(),
            leaf = self.current.name(),
            now,
            "state machine initialized"
        );
        for state in entering {
            self.handler.on_entry(state, &mut self.context);
        }
    }

    /// Run one cycle: dispatch the handler and apply its decision.
    ///
    /// The current state's handler runs first. While it stays, each
    /// enclosing state's handler runs in turn, innermost first; the first
    /// transition requested wins.
    ///
    /// # Panics
    ///
    /// Panics if called before [`StateMachine::initialize`], or if strict
    /// transitions are enabled and the handler requests a transition the
    /// topology does not declare.
    pub fn tick(&mut self) -> TickOutcome<S> {
        assert!(
            self.initialized,
            "tick called before initialize (state '{}')",
            self.current.name()
        );
        let state = self.current;
        if state.is_final() {
            trace!(state = state.name(), "final state, tick skipped");
            return TickOutcome::Halted(state);
        }

        let active = lineage(state);
        for &decider in active.iter().rev() {
            let target = match self.handler.run(decider, &mut self.context) {
                Decision::Stay => continue,
                Decision::Transition(target) => target,
            };
            if is_within(state, target) {
                trace!(
                    state = state.name(),
                    target = target.name(),
                    now = self.context.now(),
                    "self-transition"
                );
                return TickOutcome::Reentered(state);
            }
            self.check_declared(decider, target);
            let to = self.apply_transition(&active, target);
            return TickOutcome::Transitioned { from: state, to };
        }

        trace!(state = state.name(), now = self.context.now(), "stay");
        TickOutcome::Stayed(state)
    }

    /// Store `now` and run one tick.
    pub fn tick_at(&mut self, now: Timestamp) -> TickOutcome<S> {
        self.context.set_now(now);
        self.tick()
    }

    /// Leave the active states up to the common ancestor with `target`,
    /// then enter `target` and descend to a leaf. Returns the new leaf.
    fn apply_transition(&mut self, active: &[S], target: S) -> S {
        let now = self.context.now();
        let from = self.current;
        let target_path = lineage(target);
        let shared = shared_prefix(active, &target_path);

        for &state in active[shared..].iter().rev() {
            self.handler.on_exit(state, &mut self.context);
        }

        let mut entering = target_path[shared..].to_vec();
        entering.extend(descend(target, &self.last_child));
        let to = entering.last().copied().unwrap_or(target);

        self.current = to;
        for &state in &entering {
            self.context.timers_mut().record_entry(state, now);
        }
        self.remember(&entering);
        self.history.record(TransitionRecord { from, to, at: now });
        debug!(from = from.name(), to = to.name(), now, "state transition");
        for state in entering {
            self.handler.on_entry(state, &mut self.context);
        }
        to
    }

    /// Record each entered state as its parent's last active child.
    fn remember(&mut self, entered: &[S]) {
        for state in entered {
            if let Some(parent) = state.parent() {
                if let Some(slot) = self.last_child.get_mut(parent.index()) {
                    *slot = Some(*state);
                }
            }
        }
    }

    fn check_declared(&self, from: S, to: S) {
        if !self.strict {
            return;
        }
        if let Some(topology) = &self.topology {
            if !topology.allows(from, to) {
                warn!(
                    from = from.name(),
                    to = to.name(),
                    "handler requested an undeclared transition"
                );
                panic!(
                    "undeclared transition '{}' -> '{}'",
                    from.name(),
                    to.name()
                );
            }
        }
    }
}

impl<S: State, D, H> StateMachine<S, D, H> {
    pub fn current_state(&self) -> S {
        self.current
    }

    pub fn initial_state(&self) -> S {
        self.initial
    }

    pub fn state_name(&self) -> &'static str {
        self.current.name()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Check if machine is in a final state.
    pub fn is_final(&self) -> bool {
        self.current.is_final()
    }

    pub fn now(&self) -> Timestamp {
        self.context.now()
    }

    /// Store the caller's current time sample for the next tick.
    pub fn set_now(&mut self, now: Timestamp) {
        self.context.set_now(now);
    }

    /// Time spent in the current state.
    pub fn elapsed(&self) -> Timestamp {
        self.context.elapsed_in(self.current)
    }

    pub fn state_timers(&self) -> &StateTimers<S> {
        self.context.timers()
    }

    pub fn context(&self) -> &Context<S, D> {
        &self.context
    }

    pub fn data(&self) -> &D {
        &self.context.data
    }

    pub fn data_mut(&mut self) -> &mut D {
        &mut self.context.data
    }

    pub fn history(&self) -> &TransitionLog<S> {
        &self.history
    }

    pub fn topology(&self) -> Option<&Topology<S>> {
        self.topology.as_ref()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// The current leaf and its enclosing states, outermost first.
    pub fn active_path(&self) -> Vec<S> {
        lineage(self.current)
    }

    /// Whether `state` is the current state or encloses it.
    pub fn is_active(&self, state: S) -> bool {
        is_within(self.current, state)
    }

    /// Names along [`StateMachine::active_path`], joined with `/`.
    pub fn path_name(&self) -> String {
        self.active_path()
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Last active child of each composite state, indexed by
    /// [`State::index`].
    pub fn last_children(&self) -> &[Option<S>] {
        &self.last_child
    }

    /// Current state with its time in state, e.g. `Running (2.500s)` or
    /// `Oven/Bake (2.500s)` when nested.
    pub fn describe(&self) -> String {
        format!("{} ({:.3}s)", self.path_name(), self.elapsed())
    }

    /// Overwrite the runtime state from a checkpoint. No hooks run. The
    /// log keeps this machine's capacity.
    pub(crate) fn restore_parts(
        &mut self,
        current: S,
        context: Context<S, D>,
        history: TransitionLog<S>,
        last_child: Vec<Option<S>>,
    ) {
        self.current = current;
        self.context = context;
        self.history.refill_from(history);
        self.last_child = last_child;
        self.initialized = true;
    }
}

impl<S: State, D, H> fmt::Display for StateMachine<S, D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.initialized {
            f.write_str(&self.describe())
        } else {
            write!(f, "{} (not initialized)", self.initial.name())
        }
    }
}

impl<S: State, D: fmt::Debug, H> fmt::Debug for StateMachine<S, D, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("initial", &self.initial)
            .field("current", &self.current)
            .field("context", &self.context)
            .field("initialized", &self.initialized)
            .field("history", &self.history.len())
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}
