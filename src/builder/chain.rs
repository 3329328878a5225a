//! Path building: add a transition from a state and continue from its target.

use crate::core::{StateId, TransitionId};
use crate::machine::{MachineError, StateMachine};

/// A cursor on one state of a machine, used to lay out a path of edges.
///
/// Each call to [`Chain::to`] adds a transition from the cursor state and
/// moves the cursor to the target, so a path reads left to right.
///
/// # Example
///
/// ```rust
/// use tiltfsm::StateMachine;
///
/// let mut machine = StateMachine::new(|_, _| {});
/// let start = machine.start();
/// let free = machine.add_state("Free");
/// let captured = machine.add_state("Captured");
/// let flushed = machine.add_state("Flushed");
///
/// let end = machine
///     .chain(start)?
///     .to(free)?
///     .to(captured)?
///     .to(flushed)?
///     .state();
///
/// assert_eq!(end, flushed);
/// assert_eq!(machine.transitions().count(), 3);
/// # Ok::<(), tiltfsm::MachineError>(())
/// ```
pub struct Chain<'m> {
    machine: &'m mut StateMachine,
    state: StateId,
    last: Option<TransitionId>,
}

impl<'m> Chain<'m> {
    /// Add a transition from the cursor to `target` and move onto it.
    pub fn to(self, target: StateId) -> Result<Self, MachineError> {
        let transition = self.machine.add_transition(self.state, target)?;
        Ok(self.advance(target, transition))
    }

    /// Like [`Chain::to`] with an explicit transition label.
    pub fn to_labeled(self, target: StateId, label: impl Into<String>) -> Result<Self, MachineError> {
        let transition = self
            .machine
            .add_labeled_transition(self.state, target, label)?;
        Ok(self.advance(target, transition))
    }

    /// The state the cursor is on.
    pub fn state(&self) -> StateId {
        self.state
    }

    /// The transition added by the most recent step, if any.
    pub fn last_transition(&self) -> Option<TransitionId> {
        self.last
    }

    fn advance(self, target: StateId, transition: TransitionId) -> Self {
        Self {
            machine: self.machine,
            state: target,
            last: Some(transition),
        }
    }
}

impl StateMachine {
    /// Start a path at `from`. Fails with `InvalidState` for non-members.
    pub fn chain(&mut self, from: StateId) -> Result<Chain<'_>, MachineError> {
        if !self.contains_state(from) {
            return Err(MachineError::InvalidState { state: from });
        }
        Ok(Chain {
            machine: self,
            state: from,
            last: None,
        })
    }
}
