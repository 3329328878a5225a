//! Ordered registry of transition listeners.

use super::engine::StateMachine;
use crate::core::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Callback invoked after every executed transition with `(from, to, machine)`.
pub type Listener = Arc<dyn Fn(StateId, StateId, &StateMachine) + Send + Sync>;

/// Token returned by [`StateMachine::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subscription#{}", self.0)
    }
}

/// Listeners in registration order.
#[derive(Default)]
pub(crate) struct Listeners {
    entries: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Clone the current listener list so callbacks can borrow the machine.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Listener {
        Arc::new(|_, _, _| {})
    }

    #[test]
    fn subscription_ids_are_unique() {
        let mut listeners = Listeners::default();
        let a = listeners.subscribe(noop());
        let b = listeners.subscribe(noop());

        assert_ne!(a, b);
        assert_eq!(listeners.len(), 2);
    }

    #[test]
    fn unsubscribe_removes_only_matching_entry() {
        let mut listeners = Listeners::default();
        let a = listeners.subscribe(noop());
        let _b = listeners.subscribe(noop());

        assert!(listeners.unsubscribe(a));
        assert!(!listeners.unsubscribe(a));
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_unsubscribe() {
        let mut listeners = Listeners::default();
        let a = listeners.subscribe(noop());
        listeners.unsubscribe(a);
        let b = listeners.subscribe(noop());

        assert_ne!(a, b);
    }
}
