//! Core engine types: ids, players, RNG, configuration, actions, turn state, errors.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord};
pub use config::{DeckList, GameConfig, Timeout};
pub use entity::{EntityId, EntityRef};
pub use error::{ActionError, ReplayError, SelectionError};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{Phase, TurnState};
