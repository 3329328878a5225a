//! Errors raised by graph construction and transition requests.

use crate::core::{StateId, TransitionId};
use thiserror::Error;

/// Errors that can occur while building or driving a state machine.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    /// The state is foreign to this machine or has been removed from it.
    #[error("State {state} does not belong to this machine")]
    InvalidState { state: StateId },

    /// The transition is foreign to this machine or no longer in its set.
    #[error("Transition {transition} does not belong to this machine")]
    InvalidTransition { transition: TransitionId },

    #[error("Invalid operation on state '{label}' ({state}): {reason}")]
    InvalidOperation {
        state: StateId,
        label: String,
        reason: &'static str,
    },

    #[error("No transition from '{current_label}' ({current}) to '{target_label}' ({target})")]
    TransitionNotAllowed {
        current: StateId,
        current_label: String,
        target: StateId,
        target_label: String,
    },
}

impl MachineError {
    /// True for the anticipated, recoverable rejection of a transition request.
    pub fn is_not_allowed(&self) -> bool {
        matches!(self, Self::TransitionNotAllowed { .. })
    }
}
