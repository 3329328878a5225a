//! Property-based tests for graph construction and transition execution.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated graphs and request sequences.

use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use tiltfsm::{MachineError, StateId, StateMachine};

/// Build a machine with `size` extra states and the given edges, where each
/// edge is a pair of indices into `[start, extra...]`.
fn build(size: usize, edges: &[(usize, usize)]) -> (StateMachine, Vec<StateId>) {
    build_with(size, edges, |_, _| {})
}

fn build_with<F>(size: usize, edges: &[(usize, usize)], hook: F) -> (StateMachine, Vec<StateId>)
where
    F: FnMut(StateId, StateId) + Send + 'static,
{
    let mut machine = StateMachine::new(hook);
    let mut states = vec![machine.start()];
    for i in 0..size {
        states.push(machine.add_state(format!("S{i}")));
    }
    for (from, to) in edges {
        machine
            .add_transition(states[from % states.len()], states[to % states.len()])
            .unwrap();
    }
    (machine, states)
}

prop_compose! {
    fn arbitrary_graph()(
        size in 1..8usize,
        edges in prop::collection::vec((0..9usize, 0..9usize), 0..20),
    ) -> (usize, Vec<(usize, usize)>) {
        (size, edges)
    }
}

proptest! {
    #[test]
    fn new_machine_is_at_start(size in 0..6usize) {
        let (machine, _) = build(size, &[]);
        prop_assert_eq!(machine.current(), machine.start());
        prop_assert!(machine.contains_state(machine.start()));
    }

    #[test]
    fn start_state_is_never_removable((size, edges) in arbitrary_graph()) {
        let (mut machine, _) = build(size, &edges);
        let states_before = machine.states().count();
        let transitions_before = machine.transitions().count();

        let result = machine.remove_state(machine.start());

        let is_invalid_operation = matches!(result, Err(MachineError::InvalidOperation { .. }));
        prop_assert!(is_invalid_operation);
        prop_assert_eq!(machine.states().count(), states_before);
        prop_assert_eq!(machine.transitions().count(), transitions_before);
    }

    #[test]
    fn member_edges_are_registered(
        (size, edges) in arbitrary_graph(),
        from in 0..9usize,
        to in 0..9usize,
    ) {
        let (mut machine, states) = build(size, &edges);
        let (from, to) = (states[from % states.len()], states[to % states.len()]);

        let transition = machine.add_transition(from, to).unwrap();

        prop_assert_eq!(machine.target(transition), Some(to));
        prop_assert!(machine.outgoing(from).contains(&transition));
        prop_assert!(machine.transitions().any(|t| t == transition));
    }

    #[test]
    fn removed_target_is_rejected_without_change(
        (size, edges) in arbitrary_graph(),
        victim in 1..9usize,
    ) {
        let (mut machine, states) = build(size, &edges);
        let victim = states[1 + (victim - 1) % (states.len() - 1)];
        machine.remove_state(victim).unwrap();
        let start = machine.start();
        let outgoing_before = machine.outgoing(start).to_vec();
        let transitions_before = machine.transitions().count();

        let result = machine.add_transition(start, victim);

        prop_assert_eq!(result, Err(MachineError::InvalidState { state: victim }));
        prop_assert_eq!(machine.outgoing(start), outgoing_before.as_slice());
        prop_assert_eq!(machine.transitions().count(), transitions_before);
    }

    #[test]
    fn requests_preserve_invariants(
        (size, edges) in arbitrary_graph(),
        requests in prop::collection::vec(0..9usize, 0..30),
    ) {
        let hook_calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&hook_calls);
        let (mut machine, states) =
            build_with(size, &edges, move |_, _| *counter.lock().unwrap() += 1);
        let mut moves = 0;

        for request in requests {
            let target = states[request % states.len()];
            let before = machine.current();
            let allowed = machine.can_transition_to(target);

            match machine.request_transition(target) {
                Ok(()) if target == before => {
                    prop_assert!(!allowed);
                }
                Ok(()) => {
                    prop_assert!(allowed);
                    moves += 1;
                }
                Err(err) => {
                    prop_assert!(err.is_not_allowed());
                    prop_assert_eq!(machine.current(), before);
                }
            }
            prop_assert!(machine.contains_state(machine.current()));
        }

        prop_assert_eq!(machine.history().len(), moves);
        prop_assert_eq!(*hook_calls.lock().unwrap(), moves);
    }

    #[test]
    fn self_transition_never_notifies((size, edges) in arbitrary_graph()) {
        let (mut machine, _) = build(size, &edges);
        let hits = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&hits);
        machine.subscribe(move |_, _, _| *counter.lock().unwrap() += 1);

        let current = machine.current();
        prop_assert_eq!(machine.request_transition(current), Ok(()));
        prop_assert_eq!(*hits.lock().unwrap(), 0);
        prop_assert!(machine.history().is_empty());
    }
}
