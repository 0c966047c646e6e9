//! Game event bus.
//!
//! One ordered stream of [`GameEvent`]s per match, owned by the `Game`.
//!
//! ## Subscribers
//!
//! - **Handlers** (`Game::subscribe`) receive `&mut Game` and implement
//!   rules: modifier event mixins, durations, on-enter effects.
//! - **Observers** (`Game::observe`) receive only the event. The
//!   presentation layer and logging attach here.
//!
//! Handlers for one kind fire in subscription order. A handler removed
//! while an event is being dispatched does not fire for that event.

pub mod bus;
pub mod event;

pub use bus::{EventBus, EventHandler, EventObserver, SubscriptionId};
pub use event::{EventKind, GameEvent};
