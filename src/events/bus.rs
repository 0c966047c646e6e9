//! Event dispatcher owned by the `Game`.
//!
//! The bus stores subscriptions and history; the `Game` performs dispatch
//! (handlers need `&mut Game`). Dispatch is synchronous and depth-first:
//! an event emitted from inside a handler is fully dispatched before the
//! outer handler continues.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::event::{EventKind, GameEvent};
use crate::game::Game;

/// Rule-level handler. May mutate the game.
pub type EventHandler = Rc<dyn Fn(&mut Game, &GameEvent)>;

/// Read-only observer (presentation layer, logging).
pub type EventObserver = Rc<dyn Fn(&GameEvent)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u32);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscription({})", self.0)
    }
}

struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    handler: EventHandler,
}

/// Subscriptions, observers and the full event history of a match.
#[derive(Default)]
pub struct EventBus {
    /// In subscription order; handlers for one kind fire in this order.
    subscriptions: Vec<Subscription>,
    observers: Vec<EventObserver>,
    history: Vector<GameEvent>,
    next_id: u32,
    next_seq: u64,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: EventKind, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        id
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        match self.subscriptions.iter().position(|s| s.id == id) {
            Some(index) => {
                self.subscriptions.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_live(&self, id: SubscriptionId) -> bool {
        self.subscriptions.iter().any(|s| s.id == id)
    }

    pub fn observe(&mut self, observer: EventObserver) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Every event emitted so far.
    #[must_use]
    pub fn history(&self) -> &Vector<GameEvent> {
        &self.history
    }

    /// Stamp `event` with its sequence number and turn and append it to history.
    pub(crate) fn record(&mut self, mut event: GameEvent, turn: u32) -> GameEvent {
        event.seq = self.next_seq;
        event.turn = turn;
        self.next_seq += 1;
        self.history.push_back(event.clone());
        event
    }

    pub(crate) fn observers(&self) -> Vec<EventObserver> {
        self.observers.clone()
    }

    /// Handlers registered for `kind` at this moment, in order.
    pub(crate) fn handlers_for(&self, kind: EventKind) -> Vec<(SubscriptionId, EventHandler)> {
        self.subscriptions
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| (s.id, s.handler.clone()))
            .collect()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("observers", &self.observers.len())
            .field("history", &self.history.len())
            .finish()
    }
}
