//! # ccg-rules
//!
//! A rules engine for a two-player collectible card game.
//!
//! ## Design Principles
//!
//! 1. **Everything is an interceptor**: a card's attack, a slot's "can summon
//!    here", a player's max mana are all base values folded through the
//!    interceptors registered on the entity. Cards never store derived stats.
//!
//! 2. **Modifiers own their effects**: buffs, auras, durations, event
//!    subscriptions and granted abilities are mixins on a modifier. Removing
//!    the modifier removes all of it, in one place.
//!
//! 3. **One aggregate**: a single [`Game`] owns the match. Rules read it
//!    through `&Game` and change it through `&mut Game`; there is no ambient
//!    state and no interior mutability.
//!
//! 4. **Deterministic**: given the config, seed, deck lists, actions and
//!    interaction outcomes, a match replays bit for bit ([`MatchRecord`]).
//!
//! ## Modules
//!
//! - `core`: ids, players, actions, config, errors, RNG, turn state
//! - `interceptors`: typed attributes and interceptor pipelines
//! - `modifiers`: modifiers and their mixins
//! - `events`: the event bus
//! - `cards`: blueprints, card instances, the registry
//! - `board`: slots and per-player piles
//! - `chain`: the LIFO effect chain
//! - `interaction`: player choices with timeout fallback
//! - `combat`: the attack state machine
//! - `game`: the match aggregate and every rule that drives it
//! - `games`: sample card pools

pub mod board;
pub mod cards;
pub mod chain;
pub mod combat;
pub mod core;
pub mod events;
pub mod game;
pub mod games;
pub mod interaction;
pub mod interceptors;
pub mod modifiers;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActionRecord, DeckList, EntityId, EntityRef, GameConfig, Phase, PlayerId,
    ReplayError, SelectionError, Timeout,
};

pub use crate::board::{BoardZone, SlotId};

pub use crate::cards::{AbilityBlueprint, BlueprintId, BlueprintRegistry, CardBlueprint, CardKind, Location};

pub use crate::interceptors::{Flag, InterceptContext, InterceptOrder, Redirect, Stat};

pub use crate::modifiers::{Aura, AuraScope, DurationTick, Mixin, Modifier, ModifierId};

pub use crate::events::{EventKind, GameEvent};

pub use crate::chain::{ChainLinkId, ChainState};

pub use crate::interaction::{
    Choice, ChoiceProvider, FirstEligible, InteractionKind, InteractionRequest, NoResponse,
    ScriptedProvider,
};

pub use crate::combat::{CombatState, CombatStep};

pub use crate::game::{Game, GameSnapshot, MatchRecord};
