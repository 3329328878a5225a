//! Build errors for the state machine builder.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Reaction hook not specified. Call .on_transition(hook) before .build()")]
    MissingReactionHook,

    #[error("History capacity must be at least 1. Use .record_history(false) to disable history")]
    ZeroHistoryCapacity,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
