//! Graph model: handles, arena storage and transition history.
//!
//! Everything in this module is passive data. The engine in
//! [`crate::machine`] is the only code that validates and mutates it.

mod graph;
mod history;
mod ids;

pub use graph::{Graph, StateNode, TransitionNode};
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use ids::{MachineId, StateId, TransitionId};
