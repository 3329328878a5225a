//! Opaque handles for machines, states and transitions.
//!
//! Handles are small `Copy` values. A state or transition handle carries the
//! id of the machine that created it, so membership checks reduce to an id
//! comparison plus an arena slot lookup.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of one state machine instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MachineId(Uuid);

impl MachineId {
    /// Generate a fresh, random machine id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MachineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a state owned by a machine.
///
/// Equality is handle identity: two states with the same label are still
/// different states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateId {
    machine: MachineId,
    index: u32,
}

impl StateId {
    pub(crate) fn new(machine: MachineId, index: usize) -> Self {
        Self {
            machine,
            index: index as u32,
        }
    }

    /// The machine this state was created by.
    pub fn machine(&self) -> MachineId {
        self.machine
    }

    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    /// Same slot, owned by `machine`.
    pub(crate) fn rebind(self, machine: MachineId) -> Self {
        Self { machine, ..self }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.index)
    }
}

/// Handle to a transition owned by a machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionId {
    machine: MachineId,
    index: u32,
}

impl TransitionId {
    pub(crate) fn new(machine: MachineId, index: usize) -> Self {
        Self {
            machine,
            index: index as u32,
        }
    }

    /// The machine this transition was created by.
    pub fn machine(&self) -> MachineId {
        self.machine
    }

    pub(crate) fn index(&self) -> usize {
        self.index as usize
    }

    /// Same slot, owned by `machine`.
    pub(crate) fn rebind(self, machine: MachineId) -> Self {
        Self { machine, ..self }
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transition#{}", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_ids_are_unique() {
        assert_ne!(MachineId::new(), MachineId::new());
    }

    #[test]
    fn state_ids_compare_by_machine_and_index() {
        let a = MachineId::new();
        let b = MachineId::new();

        assert_eq!(StateId::new(a, 1), StateId::new(a, 1));
        assert_ne!(StateId::new(a, 1), StateId::new(a, 2));
        assert_ne!(StateId::new(a, 1), StateId::new(b, 1));
    }

    #[test]
    fn rebind_keeps_index_and_changes_owner() {
        let a = MachineId::new();
        let b = MachineId::new();
        let state = StateId::new(a, 2).rebind(b);
        let transition = TransitionId::new(a, 5).rebind(b);

        assert_eq!(state, StateId::new(b, 2));
        assert_eq!(transition, TransitionId::new(b, 5));
    }

    #[test]
    fn handles_display_their_index() {
        let machine = MachineId::new();
        assert_eq!(StateId::new(machine, 3).to_string(), "state#3");
        assert_eq!(TransitionId::new(machine, 7).to_string(), "transition#7");
    }

    #[test]
    fn handles_serialize_correctly() {
        let id = StateId::new(MachineId::new(), 4);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: StateId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
