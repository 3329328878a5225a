//! State transition history tracking.
//!
//! Every executed transition is appended to an immutable history owned by
//! the machine. Self-transitions are no-ops and are never recorded.

use super::ids::{MachineId, StateId, TransitionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of entries a machine keeps unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Record of a single executed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state being transitioned from
    pub from: StateId,
    /// The state being transitioned to
    pub to: StateId,
    /// The edge that made the move legal
    pub via: TransitionId,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of executed transitions.
///
/// `record` returns a new history and leaves the receiver untouched; the
/// owning machine appends in place. With a capacity set, the oldest entries
/// are dropped once it is exceeded.
///
/// # Example
///
/// ```rust
/// use tiltfsm::StateMachine;
///
/// let mut machine = StateMachine::new(|_, _| {});
/// let start = machine.start();
/// let free = machine.add_state("Free");
/// machine.add_transition(start, free).unwrap();
///
/// machine.request_transition(free).unwrap();
///
/// let path = machine.history().get_path();
/// assert_eq!(path, vec![start, free]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<StateTransition>,
    capacity: Option<usize>,
}

impl StateHistory {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
            capacity: None,
        }
    }

    /// Create an empty history keeping at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: Vec::new(),
            capacity: Some(capacity),
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition) -> Self {
        let mut history = self.clone();
        history.push(transition);
        history
    }

    /// Append in place, dropping the oldest entries past the capacity.
    pub(crate) fn push(&mut self, transition: StateTransition) {
        self.transitions.push(transition);
        if let Some(capacity) = self.capacity {
            let excess = self.transitions.len().saturating_sub(capacity);
            self.transitions.drain(..excess);
        }
    }

    /// Move every handle in the history to `machine`.
    pub(crate) fn rebind(self, machine: MachineId) -> Self {
        let transitions = self
            .transitions
            .into_iter()
            .map(|t| StateTransition {
                from: t.from.rebind(machine),
                to: t.to.rebind(machine),
                via: t.via.rebind(machine),
                timestamp: t.timestamp,
            })
            .collect();
        Self {
            transitions,
            capacity: self.capacity,
        }
    }

    /// Get the path of states traversed.
    ///
    /// The first entry is the `from` state of the oldest retained
    /// transition, followed by the `to` state of every transition.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the first and last retained transitions.
    ///
    /// Returns `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Most recent transition, if any.
    pub fn last(&self) -> Option<&StateTransition> {
        self.transitions.last()
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
