//! Checkpoint and resume functionality for state machines.
//!
//! A checkpoint captures the graph, the start and current states and the
//! transition history. Every resume produces a machine with a fresh id, so a
//! checkpoint can be resumed any number of times alongside the machine it was
//! taken from without handles crossing between them. Arena slots are kept;
//! [`StateMachine::translate_state`] carries old handles over.
//! The reaction hook and listeners are closures and are not captured; the
//! hook is supplied again on resume.

use crate::core::{Graph, MachineId, StateHistory, StateId};
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a state machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// States and transitions, including detached ones
    pub graph: Graph,

    pub start: StateId,

    pub current: StateId,

    pub record_history: bool,

    pub history: StateHistory,
}

impl Checkpoint {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Serialize to the compact binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    /// Check the version and that every handle belongs to the graph's machine.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        self.graph
            .check_references()
            .map_err(CheckpointError::ValidationFailed)?;
        if !self.graph.contains_state(self.start) {
            return Err(CheckpointError::ValidationFailed(format!(
                "start state {} is not in the graph",
                self.start
            )));
        }
        if !self.graph.contains_state(self.current) {
            return Err(CheckpointError::ValidationFailed(format!(
                "current state {} is not in the graph",
                self.current
            )));
        }
        let machine = self.graph.machine();
        if let Some(entry) = self.history.transitions().iter().find(|t| {
            t.from.machine() != machine || t.to.machine() != machine || t.via.machine() != machine
        }) {
            return Err(CheckpointError::ValidationFailed(format!(
                "history entry {} -> {} belongs to another machine",
                entry.from, entry.to
            )));
        }
        Ok(())
    }
}

impl StateMachine {
    /// Capture the machine's graph, position and history.
    pub fn checkpoint(&self) -> Checkpoint {
        let checkpoint = Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            graph: self.graph.clone(),
            start: self.start,
            current: self.current,
            record_history: self.record_history,
            history: self.history.clone(),
        };
        debug!(machine = %self.id(), checkpoint = checkpoint.id.as_str(), "checkpoint created");
        checkpoint
    }

    /// Rebuild a machine from a checkpoint with a fresh reaction hook.
    ///
    /// The resumed machine gets a new id and reports the checkpointed one as
    /// its [`origin`](StateMachine::origin).
    pub fn resume<F>(checkpoint: Checkpoint, on_transition: F) -> Result<Self, CheckpointError>
    where
        F: FnMut(StateId, StateId) + Send + 'static,
    {
        if let Err(err) = checkpoint.validate() {
            warn!(checkpoint = checkpoint.id.as_str(), error = %err, "checkpoint rejected");
            return Err(err);
        }

        let origin = checkpoint.graph.machine();
        let machine = MachineId::new();
        debug!(
            machine = %machine,
            origin = %origin,
            checkpoint = checkpoint.id.as_str(),
            "resuming from checkpoint"
        );
        let mut resumed = Self::from_parts(
            checkpoint.graph.rebind(machine),
            checkpoint.start.rebind(machine),
            checkpoint.current.rebind(machine),
            checkpoint.history.rebind(machine),
            checkpoint.record_history,
            Box::new(on_transition),
        );
        resumed.origin = Some(origin);
        Ok(resumed)
    }
}
