//! Opt-in structural audit of a machine's graph.
//!
//! The machine never validates reachability and tolerates the stale
//! transitions that removals leave behind. The audit reports all of them in
//! one pass using Stillwater's `Validation`, which accumulates every finding
//! instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use stillwater::validation::Validation;
//! use tiltfsm::audit::{audit, GraphIssue};
//! use tiltfsm::StateMachine;
//!
//! let mut machine = StateMachine::new(|_, _| {});
//! let start = machine.start();
//! let free = machine.add_state("Free");
//! machine.add_transition(start, free).unwrap();
//! machine.remove_state(free).unwrap();
//!
//! match audit(&machine) {
//!     Validation::Failure(issues) => {
//!         assert!(issues
//!             .iter()
//!             .any(|i| matches!(i, GraphIssue::DanglingTransition { .. })));
//!     }
//!     Validation::Success(_) => panic!("expected a dangling transition"),
//! }
//! ```

pub mod issues;

pub use issues::{AuditScope, GraphIssue};

use crate::machine::StateMachine;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Run every check against `machine`.
pub fn audit(machine: &StateMachine) -> Validation<(), NonEmptyVec<GraphIssue>> {
    audit_with(machine, AuditScope::all())
}

/// Run the checks selected by `scope`, accumulating ALL findings.
pub fn audit_with(
    machine: &StateMachine,
    scope: AuditScope,
) -> Validation<(), NonEmptyVec<GraphIssue>> {
    let graph = machine.graph();
    let mut checks: Vec<Validation<(), NonEmptyVec<GraphIssue>>> = Vec::new();

    for (id, node) in graph.transitions() {
        let attached = graph.is_attached(id);
        if scope.detached && !attached {
            checks.push(Validation::fail(GraphIssue::DetachedTransition {
                transition: id,
                label: node.label().to_string(),
            }));
        } else if scope.dangling && attached && !graph.contains_state(node.target()) {
            checks.push(Validation::fail(GraphIssue::DanglingTransition {
                transition: id,
                label: node.label().to_string(),
                target: node.target(),
            }));
        }
    }

    if scope.unreachable {
        let reachable = graph.reachable_from(machine.start());
        for (id, node) in graph.states() {
            if !reachable.contains(&id) {
                checks.push(Validation::fail(GraphIssue::UnreachableState {
                    state: id,
                    label: node.label().to_string(),
                }));
            }
        }
    }

    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::linear_path;

    fn issues_of(result: Validation<(), NonEmptyVec<GraphIssue>>) -> Vec<GraphIssue> {
        match result {
            Validation::Failure(errors) => errors.iter().cloned().collect(),
            Validation::Success(_) => Vec::new(),
        }
    }

    #[test]
    fn clean_graph_passes() {
        let mut machine = StateMachine::new(|_, _| {});
        let start = machine.start();
        linear_path(&mut machine, start, &["Free", "Captured", "Flushed"]).unwrap();

        assert!(audit(&machine).is_success());
    }

    #[test]
    fn audit_accumulates_all_issues() {
        let mut machine = StateMachine::new(|_, _| {});
        let start = machine.start();
        let a = machine.add_state("A");
        let b = machine.add_state("B");
        let orphan = machine.add_state("Orphan");
        machine.add_transition(start, a).unwrap();
        let detached = machine.add_transition(start, b).unwrap();
        machine.add_transition(b, start).unwrap();
        machine.remove_state(a).unwrap();
        machine.remove_transition(detached).unwrap();

        let issues = issues_of(audit(&machine));

        assert_eq!(issues.len(), 4);
        assert!(issues
            .iter()
            .any(|i| matches!(i, GraphIssue::DanglingTransition { target, .. } if *target == a)));
        assert!(issues
            .iter()
            .any(|i| matches!(i, GraphIssue::DetachedTransition { transition, .. } if *transition == detached)));
        assert!(issues
            .iter()
            .any(|i| matches!(i, GraphIssue::UnreachableState { state, .. } if *state == b)));
        assert!(issues
            .iter()
            .any(|i| matches!(i, GraphIssue::UnreachableState { state, .. } if *state == orphan)));
    }

    #[test]
    fn removal_scope_ignores_unreachable_states() {
        let mut machine = StateMachine::new(|_, _| {});
        machine.add_state("Orphan");

        assert!(audit(&machine).is_failure());
        assert!(audit_with(&machine, AuditScope::removals()).is_success());
    }

    #[test]
    fn prune_clears_removal_findings() {
        let mut machine = StateMachine::new(|_, _| {});
        let start = machine.start();
        let a = machine.add_state("A");
        machine.add_transition(start, a).unwrap();
        machine.remove_state(a).unwrap();
        assert!(audit_with(&machine, AuditScope::removals()).is_failure());

        machine.prune();

        assert!(audit_with(&machine, AuditScope::removals()).is_success());
    }
}
