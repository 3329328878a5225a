//! Tiltfsm: a small graph-based finite state machine for game objects
//!
//! A machine owns a directed graph of states and transitions, built once
//! during setup. Afterwards the host moves it by requesting a target state;
//! the request succeeds only along an existing edge. Each executed
//! transition runs a reaction hook supplied at construction and then
//! notifies listeners in registration order.
//!
//! # Core Concepts
//!
//! - **Graph**: states and transitions stored in an arena, addressed by handles
//! - **Engine**: validates and executes transition requests
//! - **Reaction hook**: mandatory closure run on every executed transition
//! - **Listeners**: ordered `(from, to, machine)` callbacks
//! - **History**: timestamped record of executed transitions
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tiltfsm::StateMachine;
//!
//! let mut machine = StateMachine::new(|_, _| {});
//! let start = machine.start();
//! let free = machine.add_state("Free");
//! let captured = machine.add_state("Captured");
//! machine.chain(start)?.to(free)?.to(captured)?;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! machine.subscribe(move |from, to, m| {
//!     let from = m.label(from).unwrap_or_default().to_string();
//!     let to = m.label(to).unwrap_or_default().to_string();
//!     sink.lock().unwrap().push((from, to));
//! });
//!
//! machine.request_transition(free)?;
//! assert_eq!(
//!     *seen.lock().unwrap(),
//!     vec![("Start".to_string(), "Free".to_string())]
//! );
//! # Ok::<(), tiltfsm::MachineError>(())
//! ```

pub mod audit;
pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineConfig, StateMachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use core::{
    MachineId, StateHistory, StateId, StateTransition, TransitionId, DEFAULT_HISTORY_CAPACITY,
};
pub use machine::{MachineError, StateMachine, SubscriptionId};
