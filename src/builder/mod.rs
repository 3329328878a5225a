//! Builder API for ergonomic state machine construction.
//!
//! [`StateMachineBuilder`] configures and creates a machine; [`Chain`]
//! lays out paths of transitions on an existing one.

pub mod chain;
pub mod error;
pub mod machine;

pub use chain::Chain;
pub use error::BuildError;
pub use machine::{MachineConfig, StateMachineBuilder};

use crate::core::StateId;
use crate::machine::{MachineError, StateMachine};

/// Add one state per label and chain them in order from `from`.
///
/// Returns the new states in label order. Nothing is added when `from` is
/// not a member.
///
/// # Example
///
/// ```
/// use tiltfsm::builder::linear_path;
/// use tiltfsm::StateMachine;
///
/// let mut machine = StateMachine::new(|_, _| {});
/// let start = machine.start();
/// let states = linear_path(&mut machine, start, &["Free", "Captured", "Flushed"]).unwrap();
///
/// machine.request_transition(states[0]).unwrap();
/// assert_eq!(machine.current_label(), "Free");
/// ```
pub fn linear_path(
    machine: &mut StateMachine,
    from: StateId,
    labels: &[&str],
) -> Result<Vec<StateId>, MachineError> {
    if !machine.contains_state(from) {
        return Err(MachineError::InvalidState { state: from });
    }
    let states: Vec<StateId> = labels.iter().map(|label| machine.add_state(*label)).collect();

    let mut chain = machine.chain(from)?;
    for state in &states {
        chain = chain.to(*state)?;
    }
    Ok(states)
}
