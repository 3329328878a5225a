//! Builder and configuration for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{StateHistory, StateId, DEFAULT_HISTORY_CAPACITY};
use crate::machine::{ReactionHook, StateMachine, DEFAULT_START_LABEL};
use serde::{Deserialize, Serialize};

/// Construction settings for a [`StateMachine`].
///
/// Every field has a default, so partial JSON documents are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Label of the automatically created start state
    pub start_label: String,

    /// Whether executed transitions are kept in the machine's history
    pub record_history: bool,

    /// Maximum number of history entries kept; `None` is unbounded
    pub history_capacity: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            start_label: DEFAULT_START_LABEL.to_string(),
            record_history: true,
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl MachineConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        serde_json::from_str(json).map_err(|e| BuildError::InvalidConfig(e.to_string()))
    }

    fn validate(&self) -> Result<(), BuildError> {
        if self.record_history && self.history_capacity == Some(0) {
            return Err(BuildError::ZeroHistoryCapacity);
        }
        Ok(())
    }

    fn history(&self) -> StateHistory {
        match self.history_capacity {
            Some(capacity) => StateHistory::with_capacity(capacity),
            None => StateHistory::new(),
        }
    }
}

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use tiltfsm::builder::StateMachineBuilder;
///
/// let machine = StateMachineBuilder::new()
///     .start_label("Idle")
///     .history_capacity(32)
///     .on_transition(|_, _| {})
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_label(), "Idle");
/// ```
pub struct StateMachineBuilder {
    config: MachineConfig,
    on_transition: Option<ReactionHook>,
}

impl StateMachineBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            on_transition: None,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn start_label(mut self, label: impl Into<String>) -> Self {
        self.config.start_label = label.into();
        self
    }

    pub fn record_history(mut self, enabled: bool) -> Self {
        self.config.record_history = enabled;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = Some(capacity);
        self
    }

    /// Keep every executed transition. Memory grows with each move.
    pub fn unbounded_history(mut self) -> Self {
        self.config.history_capacity = None;
        self
    }

    /// Set the reaction hook (required).
    pub fn on_transition<F>(mut self, hook: F) -> Self
    where
        F: FnMut(StateId, StateId) + Send + 'static,
    {
        self.on_transition = Some(Box::new(hook));
        self
    }

    /// Build the state machine.
    /// Returns an error if the hook is missing or the configuration is invalid.
    pub fn build(self) -> Result<StateMachine, BuildError> {
        let hook = self.on_transition.ok_or(BuildError::MissingReactionHook)?;
        self.config.validate()?;

        Ok(StateMachine::assemble(
            &self.config.start_label,
            self.config.history(),
            self.config.record_history,
            hook,
        ))
    }
}

impl Default for StateMachineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
