//! Findings reported by the graph audit.

use crate::core::{StateId, TransitionId};
use thiserror::Error;

/// A structural problem the machine tolerates but a caller may care about.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphIssue {
    /// An attached transition points at a state that has been removed.
    #[error("Transition '{label}' ({transition}) targets removed state {target}")]
    DanglingTransition {
        transition: TransitionId,
        label: String,
        target: StateId,
    },

    /// A transition is in the machine's set but listed by no state.
    #[error("Transition '{label}' ({transition}) is not attached to any state")]
    DetachedTransition {
        transition: TransitionId,
        label: String,
    },

    #[error("State '{label}' ({state}) is unreachable from the start state")]
    UnreachableState { state: StateId, label: String },
}

/// Which checks an audit runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AuditScope {
    pub dangling: bool,
    pub detached: bool,
    pub unreachable: bool,
}

impl AuditScope {
    /// Every check enabled.
    pub fn all() -> Self {
        Self {
            dangling: true,
            detached: true,
            unreachable: true,
        }
    }

    /// Only the checks that indicate stale transitions left by removals.
    pub fn removals() -> Self {
        Self {
            dangling: true,
            detached: true,
            unreachable: false,
        }
    }
}

impl Default for AuditScope {
    fn default() -> Self {
        Self::all()
    }
}
