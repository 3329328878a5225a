//! Arena storage for a machine's states and transitions.
//!
//! States and transitions live in slot vectors indexed by their handles.
//! A removed entry leaves an empty slot behind, so handles are never reused
//! and a stale handle simply stops being a member.
//!
//! The graph performs no validation of its own. The engine checks membership
//! before calling the mutating methods, which are crate-private.

use super::ids::{MachineId, StateId, TransitionId};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A node in the graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateNode {
    label: String,
    outgoing: Vec<TransitionId>,
}

impl StateNode {
    /// Diagnostic label. Not an identifier.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Outgoing transitions, in the order they were added.
    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }
}

/// A directed edge. The source is implied by whichever state lists it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionNode {
    label: String,
    target: StateId,
}

impl TransitionNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> StateId {
        self.target
    }
}

/// States and transitions of one machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Graph {
    machine: MachineId,
    states: Vec<Option<StateNode>>,
    transitions: Vec<Option<TransitionNode>>,
}

impl Graph {
    pub(crate) fn new(machine: MachineId) -> Self {
        Self {
            machine,
            states: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Id of the machine owning this graph.
    pub fn machine(&self) -> MachineId {
        self.machine
    }

    /// True if `state` was created by this machine and has not been removed.
    pub fn contains_state(&self, state: StateId) -> bool {
        self.state(state).is_some()
    }

    /// True if `transition` is still in the machine's global transition set.
    ///
    /// A transition detached from every state stays a member until pruned.
    pub fn contains_transition(&self, transition: TransitionId) -> bool {
        self.transition(transition).is_some()
    }

    pub fn state(&self, state: StateId) -> Option<&StateNode> {
        if state.machine() != self.machine {
            return None;
        }
        self.states.get(state.index()).and_then(Option::as_ref)
    }

    pub fn transition(&self, transition: TransitionId) -> Option<&TransitionNode> {
        if transition.machine() != self.machine {
            return None;
        }
        self.transitions
            .get(transition.index())
            .and_then(Option::as_ref)
    }

    pub fn label(&self, state: StateId) -> Option<&str> {
        self.state(state).map(StateNode::label)
    }

    /// Outgoing transitions of `state`; empty for non-members.
    pub fn outgoing(&self, state: StateId) -> &[TransitionId] {
        self.state(state).map(StateNode::outgoing).unwrap_or(&[])
    }

    /// All member states in creation order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &StateNode)> + '_ {
        let machine = self.machine;
        self.states
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.as_ref().map(|node| (StateId::new(machine, i), node)))
    }

    /// All transitions in the global set in creation order.
    pub fn transitions(&self) -> impl Iterator<Item = (TransitionId, &TransitionNode)> + '_ {
        let machine = self.machine;
        self.transitions.iter().enumerate().filter_map(move |(i, slot)| {
            slot.as_ref()
                .map(|node| (TransitionId::new(machine, i), node))
        })
    }

    pub fn state_count(&self) -> usize {
        self.states.iter().flatten().count()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.iter().flatten().count()
    }

    /// First outgoing transition of `from` whose target is `to`.
    pub fn find_edge(&self, from: StateId, to: StateId) -> Option<TransitionId> {
        self.outgoing(from).iter().copied().find(|id| {
            self.transition(*id)
                .is_some_and(|transition| transition.target == to)
        })
    }

    /// True if some member state lists `transition` as outgoing.
    pub fn is_attached(&self, transition: TransitionId) -> bool {
        self.states
            .iter()
            .flatten()
            .any(|node| node.outgoing.contains(&transition))
    }

    /// States reachable from `start` by following outgoing edges to members.
    pub fn reachable_from(&self, start: StateId) -> HashSet<StateId> {
        let mut seen = HashSet::new();
        if !self.contains_state(start) {
            return seen;
        }

        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(state) = queue.pop_front() {
            for id in self.outgoing(state) {
                let Some(transition) = self.transition(*id) else {
                    continue;
                };
                if self.contains_state(transition.target) && seen.insert(transition.target) {
                    queue.push_back(transition.target);
                }
            }
        }
        seen
    }

    /// Check that every stored handle resolves inside this graph.
    ///
    /// Transition targets must belong to this machine, though they may point
    /// at a removed slot. Outgoing lists may only name transitions in the
    /// global set.
    pub fn check_references(&self) -> Result<(), String> {
        for (id, node) in self.transitions() {
            if node.target.machine() != self.machine {
                return Err(format!(
                    "{id} targets a state of machine {}",
                    node.target.machine()
                ));
            }
        }
        for (id, node) in self.states() {
            if let Some(t) = node.outgoing.iter().find(|t| !self.contains_transition(**t)) {
                return Err(format!("{id} lists {t}, which is not in the transition set"));
            }
        }
        Ok(())
    }

    /// Move every handle in the graph to `machine`, keeping slot positions.
    pub(crate) fn rebind(self, machine: MachineId) -> Self {
        let states = self
            .states
            .into_iter()
            .map(|slot| {
                slot.map(|node| StateNode {
                    label: node.label,
                    outgoing: node.outgoing.into_iter().map(|t| t.rebind(machine)).collect(),
                })
            })
            .collect();
        let transitions = self
            .transitions
            .into_iter()
            .map(|slot| {
                slot.map(|node| TransitionNode {
                    label: node.label,
                    target: node.target.rebind(machine),
                })
            })
            .collect();
        Self {
            machine,
            states,
            transitions,
        }
    }

    pub(crate) fn insert_state(&mut self, label: impl Into<String>) -> StateId {
        let id = StateId::new(self.machine, self.states.len());
        self.states.push(Some(StateNode {
            label: label.into(),
            outgoing: Vec::new(),
        }));
        id
    }

    /// Create an edge. Both endpoints must already be members.
    pub(crate) fn insert_transition(
        &mut self,
        from: StateId,
        to: StateId,
        label: Option<String>,
    ) -> TransitionId {
        let label = label.unwrap_or_else(|| format!("To {}", self.label(to).unwrap_or_default()));
        let id = TransitionId::new(self.machine, self.transitions.len());
        self.transitions.push(Some(TransitionNode { label, target: to }));
        if let Some(Some(node)) = self.states.get_mut(from.index()) {
            node.outgoing.push(id);
        }
        id
    }

    /// Remove a state. Its outgoing transitions are detached but stay in
    /// the global set; edges pointing at it from other states are untouched.
    pub(crate) fn remove_state(&mut self, state: StateId) -> Option<StateNode> {
        if state.machine() != self.machine {
            return None;
        }
        self.states.get_mut(state.index()).and_then(Option::take)
    }

    /// Detach `transition` from every state's outgoing set, returning how
    /// many states listed it.
    pub(crate) fn detach_transition(&mut self, transition: TransitionId) -> usize {
        let mut detached = 0;
        for node in self.states.iter_mut().flatten() {
            let before = node.outgoing.len();
            node.outgoing.retain(|id| *id != transition);
            detached += before - node.outgoing.len();
        }
        detached
    }

    /// Drop `transition` from the global set without touching any state.
    pub(crate) fn forget_transition(&mut self, transition: TransitionId) -> Option<TransitionNode> {
        if transition.machine() != self.machine {
            return None;
        }
        self.transitions
            .get_mut(transition.index())
            .and_then(Option::take)
    }
}
