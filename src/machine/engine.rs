//! State machine that owns the graph and executes transition requests.

use super::error::MachineError;
use super::listeners::{Listeners, SubscriptionId};
use crate::core::{
    Graph, MachineId, StateHistory, StateId, StateTransition, TransitionId, DEFAULT_HISTORY_CAPACITY,
};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Label given to the start state when none is configured.
pub const DEFAULT_START_LABEL: &str = "Start";

/// Reaction hook invoked with `(from, to)` after the current state has moved.
pub type ReactionHook = Box<dyn FnMut(StateId, StateId) + Send>;

/// A finite state machine over an explicitly built graph.
///
/// The machine is created with a single start state, which is also the
/// initial current state and can never be removed. Callers add states and
/// transitions, then move the machine with [`request_transition`].
///
/// [`request_transition`]: StateMachine::request_transition
///
/// # Example
///
/// ```rust
/// use tiltfsm::{MachineError, StateMachine};
///
/// let mut machine = StateMachine::new(|_, _| {});
/// let start = machine.start();
/// let open = machine.add_state("Open");
/// let closed = machine.add_state("Closed");
/// machine.add_transition(start, open).unwrap();
/// machine.add_transition(open, closed).unwrap();
///
/// machine.request_transition(open).unwrap();
/// assert_eq!(machine.current_label(), "Open");
///
/// let err = machine.request_transition(start).unwrap_err();
/// assert!(matches!(err, MachineError::TransitionNotAllowed { .. }));
/// assert_eq!(machine.current(), open);
/// ```
pub struct StateMachine {
    pub(crate) graph: Graph,
    pub(crate) start: StateId,
    pub(crate) current: StateId,
    pub(crate) history: StateHistory,
    pub(crate) record_history: bool,
    pub(crate) on_transition: ReactionHook,
    pub(crate) listeners: Listeners,
    pub(crate) origin: Option<MachineId>,
}

impl StateMachine {
    /// Create a machine with the default configuration.
    ///
    /// The reaction hook is mandatory; pass `|_, _| {}` for none.
    pub fn new<F>(on_transition: F) -> Self
    where
        F: FnMut(StateId, StateId) + Send + 'static,
    {
        Self::assemble(
            DEFAULT_START_LABEL,
            StateHistory::with_capacity(DEFAULT_HISTORY_CAPACITY),
            true,
            Box::new(on_transition),
        )
    }

    pub(crate) fn assemble(
        start_label: &str,
        history: StateHistory,
        record_history: bool,
        on_transition: ReactionHook,
    ) -> Self {
        let mut graph = Graph::new(MachineId::new());
        let start = graph.insert_state(start_label);
        trace!(machine = %graph.machine(), label = start_label, "state machine created");

        Self::from_parts(graph, start, start, history, record_history, on_transition)
    }

    pub(crate) fn from_parts(
        graph: Graph,
        start: StateId,
        current: StateId,
        history: StateHistory,
        record_history: bool,
        on_transition: ReactionHook,
    ) -> Self {
        Self {
            graph,
            start,
            current,
            history,
            record_history,
            on_transition,
            listeners: Listeners::default(),
            origin: None,
        }
    }

    pub fn id(&self) -> MachineId {
        self.graph.machine()
    }

    /// Id of the machine this one was resumed from, if any.
    pub fn origin(&self) -> Option<MachineId> {
        self.origin
    }

    /// Carry a state handle over from the machine this one was resumed from.
    ///
    /// Handles already owned by this machine are returned as-is. Returns
    /// `None` for handles of any other machine and for removed states.
    pub fn translate_state(&self, state: StateId) -> Option<StateId> {
        let owner = state.machine();
        if owner != self.id() && Some(owner) != self.origin {
            return None;
        }
        let state = state.rebind(self.id());
        self.graph.contains_state(state).then_some(state)
    }

    /// Transition counterpart of [`StateMachine::translate_state`].
    pub fn translate_transition(&self, transition: TransitionId) -> Option<TransitionId> {
        let owner = transition.machine();
        if owner != self.id() && Some(owner) != self.origin {
            return None;
        }
        let transition = transition.rebind(self.id());
        self.graph.contains_transition(transition).then_some(transition)
    }

    /// The protected start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    /// Label of the current state, for per-tick behavior selection.
    pub fn current_label(&self) -> &str {
        self.graph.label(self.current).unwrap_or_default()
    }

    pub fn is_in(&self, state: StateId) -> bool {
        self.current == state
    }

    /// Read-only view of the underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    pub fn label(&self, state: StateId) -> Option<&str> {
        self.graph.label(state)
    }

    /// Target of a transition still in the machine's transition set.
    pub fn target(&self, transition: TransitionId) -> Option<StateId> {
        self.graph.transition(transition).map(|t| t.target())
    }

    pub fn outgoing(&self, state: StateId) -> &[TransitionId] {
        self.graph.outgoing(state)
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.graph.states().map(|(id, _)| id)
    }

    pub fn transitions(&self) -> impl Iterator<Item = TransitionId> + '_ {
        self.graph.transitions().map(|(id, _)| id)
    }

    pub fn contains_state(&self, state: StateId) -> bool {
        self.graph.contains_state(state)
    }

    pub fn contains_transition(&self, transition: TransitionId) -> bool {
        self.graph.contains_transition(transition)
    }

    /// First state carrying `label`. Labels are not unique; this is a
    /// convenience for diagnostics and tests.
    pub fn find_state(&self, label: &str) -> Option<StateId> {
        self.graph
            .states()
            .find(|(_, node)| node.label() == label)
            .map(|(id, _)| id)
    }

    /// Create a new state. Always succeeds.
    pub fn add_state(&mut self, label: impl Into<String>) -> StateId {
        let label = label.into();
        let id = self.graph.insert_state(label.clone());
        trace!(machine = %self.id(), state = %id, label = label.as_str(), "state added");
        id
    }

    /// Add a transition labelled "To <target label>".
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
    ) -> Result<TransitionId, MachineError> {
        self.insert_transition(from, to, None)
    }

    pub fn add_labeled_transition(
        &mut self,
        from: StateId,
        to: StateId,
        label: impl Into<String>,
    ) -> Result<TransitionId, MachineError> {
        self.insert_transition(from, to, Some(label.into()))
    }

    fn insert_transition(
        &mut self,
        from: StateId,
        to: StateId,
        label: Option<String>,
    ) -> Result<TransitionId, MachineError> {
        self.ensure_member(from)?;
        self.ensure_member(to)?;

        let id = self.graph.insert_transition(from, to, label);
        trace!(
            machine = %self.id(),
            transition = %id,
            from = %self.label_of(from),
            to = %self.label_of(to),
            "transition added"
        );
        Ok(id)
    }

    /// Remove a state, returning the outgoing transitions it held.
    ///
    /// The returned transitions are detached but remain in the machine's
    /// transition set, and edges from other states into the removed state
    /// are left in place. See [`StateMachine::prune`] for cleanup.
    ///
    /// Fails with `InvalidOperation` for the start state and for the
    /// current state.
    pub fn remove_state(&mut self, state: StateId) -> Result<Vec<TransitionId>, MachineError> {
        self.ensure_member(state)?;

        let reason = if state == self.start {
            Some("the start state cannot be removed")
        } else if state == self.current {
            Some("the current state cannot be removed")
        } else {
            None
        };
        if let Some(reason) = reason {
            let label = self.label_of(state);
            warn!(
                machine = %self.id(),
                state = %state,
                label = label.as_str(),
                reason,
                "state removal rejected"
            );
            return Err(MachineError::InvalidOperation {
                state,
                label,
                reason,
            });
        }

        let node = self
            .graph
            .remove_state(state)
            .ok_or(MachineError::InvalidState { state })?;
        debug!(
            machine = %self.id(),
            state = %state,
            label = node.label(),
            detached = node.outgoing().len(),
            "state removed"
        );
        Ok(node.outgoing().to_vec())
    }

    /// Detach a transition from every state that lists it.
    ///
    /// The transition stays in the machine's transition set. Returns the
    /// number of states it was detached from.
    pub fn remove_transition(&mut self, transition: TransitionId) -> Result<usize, MachineError> {
        if !self.graph.contains_transition(transition) {
            return Err(MachineError::InvalidTransition { transition });
        }

        let detached = self.graph.detach_transition(transition);
        debug!(machine = %self.id(), transition = %transition, detached, "transition detached");
        Ok(detached)
    }

    /// Drop dangling and detached transitions from the machine.
    ///
    /// A transition is dangling when its target is no longer a member and
    /// detached when no state lists it. Returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let doomed: Vec<TransitionId> = self
            .graph
            .transitions()
            .filter(|(id, node)| {
                !self.graph.contains_state(node.target()) || !self.graph.is_attached(*id)
            })
            .map(|(id, _)| id)
            .collect();

        for id in &doomed {
            self.graph.detach_transition(*id);
            self.graph.forget_transition(*id);
        }
        if !doomed.is_empty() {
            debug!(machine = %self.id(), pruned = doomed.len(), "transitions pruned");
        }
        doomed.len()
    }

    /// True if a request for `target` would move the machine right now.
    ///
    /// The current state itself is not a move and reports `false`.
    pub fn can_transition_to(&self, target: StateId) -> bool {
        target != self.current
            && self.graph.contains_state(target)
            && self.graph.find_edge(self.current, target).is_some()
    }

    /// Member states reachable in one step from the current state.
    pub fn available_targets(&self) -> Vec<StateId> {
        let mut targets = Vec::new();
        for id in self.graph.outgoing(self.current) {
            if let Some(target) = self.target(*id) {
                if self.graph.contains_state(target) && !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        targets
    }

    /// Move the machine to `target` along an existing edge.
    ///
    /// A request for the current state is a silent no-op. Otherwise the
    /// current state moves first, then the reaction hook runs, then every
    /// listener runs in registration order. A panicking listener unwinds
    /// through this call and the remaining listeners are skipped.
    pub fn request_transition(&mut self, target: StateId) -> Result<(), MachineError> {
        if target == self.current {
            trace!(machine = %self.id(), state = %target, "self-transition ignored");
            return Ok(());
        }
        self.ensure_member(target)?;

        let Some(via) = self.graph.find_edge(self.current, target) else {
            let err = MachineError::TransitionNotAllowed {
                current: self.current,
                current_label: self.label_of(self.current),
                target,
                target_label: self.label_of(target),
            };
            debug!(machine = %self.id(), error = %err, "transition rejected");
            return Err(err);
        };

        let from = self.current;
        self.current = target;
        if self.record_history {
            self.history.push(StateTransition {
                from,
                to: target,
                via,
                timestamp: Utc::now(),
            });
        }
        debug!(
            machine = %self.id(),
            from = %self.label_of(from),
            to = %self.label_of(target),
            via = %via,
            "transition executed"
        );

        (self.on_transition)(from, target);

        for listener in self.listeners.snapshot() {
            listener(from, target, self);
        }
        Ok(())
    }

    /// Register a listener for executed transitions.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(StateId, StateId, &StateMachine) + Send + Sync + 'static,
    {
        self.listeners.subscribe(Arc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn ensure_member(&self, state: StateId) -> Result<(), MachineError> {
        if self.graph.contains_state(state) {
            Ok(())
        } else {
            Err(MachineError::InvalidState { state })
        }
    }

    fn label_of(&self, state: StateId) -> String {
        self.graph
            .label(state)
            .map(str::to_string)
            .unwrap_or_else(|| state.to_string())
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("id", &self.id())
            .field("current", &self.current_label())
            .field("states", &self.graph.state_count())
            .field("transitions", &self.graph.transition_count())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
