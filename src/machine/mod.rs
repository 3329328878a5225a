//! Transition execution and change notification.
//!
//! # Key Concepts
//!
//! - **Engine**: [`StateMachine`] owns the graph and the current-state pointer
//! - **Reaction hook**: a closure supplied at construction, run on every
//!   executed transition before any listener
//! - **Listeners**: callbacks notified in registration order after the hook
//!
//! Everything is synchronous and single-threaded. Callers needing shared
//! access wrap the machine in their own lock.

mod engine;
mod error;
mod listeners;

pub use engine::{ReactionHook, StateMachine, DEFAULT_START_LABEL};
pub use error::MachineError;
pub use listeners::{Listener, SubscriptionId};
