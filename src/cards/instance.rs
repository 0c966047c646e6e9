//! Card instances - runtime card state.
//!
//! A `Card` is one physical card in a match. It references its blueprint,
//! tracks where it is, and carries its own modifiers and interceptors.
//! Kind-specific mutable state (minion damage, artifact wear) lives in
//! [`CardState`].

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::blueprint::{CardBlueprint, CardKind};
use crate::board::SlotId;
use crate::core::{EntityId, PlayerId};
use crate::interceptors::InterceptorRegistry;
use crate::modifiers::{ModifierHost, ModifierList};

/// Where a card is. A card is in exactly one location at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    MainDeck,
    DestinyDeck,
    Hand,
    /// In play: a minion or sigil in a slot, the hero, or an artifact.
    Board,
    Discard,
    Banish,
    /// Resolved destiny cards that don't stay on the board.
    DestinyZone,
    /// Played and waiting on the effect chain.
    Chain,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinionState {
    pub damage_taken: i64,
    pub exhausted: bool,
    pub summoning_sick: bool,
    pub attacks_this_turn: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroState {
    pub damage_taken: i64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactState {
    /// Durability lost so far.
    pub wear: i64,
}

/// Kind-specific mutable state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Minion(MinionState),
    Hero(HeroState),
    Artifact(ArtifactState),
    Spell,
    /// Sigils also use `MinionState` for readiness (abilities exhaust them).
    Sigil(MinionState),
}

impl CardState {
    /// Fresh state for a card of `kind`.
    #[must_use]
    pub fn for_kind(kind: CardKind) -> Self {
        match kind {
            CardKind::Minion => CardState::Minion(MinionState::default()),
            CardKind::Hero => CardState::Hero(HeroState::default()),
            CardKind::Artifact => CardState::Artifact(ArtifactState::default()),
            CardKind::Spell => CardState::Spell,
            CardKind::Sigil => CardState::Sigil(MinionState::default()),
        }
    }
}

/// A card instance in a match.
pub struct Card {
    pub id: EntityId,
    pub blueprint: Rc<CardBlueprint>,
    pub owner: PlayerId,
    pub location: Location,
    /// Set exactly while a minion or sigil occupies a slot.
    pub slot: Option<SlotId>,
    pub state: CardState,
    modifiers: ModifierList,
    interceptors: InterceptorRegistry,
}

impl Card {
    #[must_use]
    pub fn new(
        id: EntityId,
        blueprint: Rc<CardBlueprint>,
        owner: PlayerId,
        location: Location,
    ) -> Self {
        let state = CardState::for_kind(blueprint.kind);
        Self {
            id,
            blueprint,
            owner,
            location,
            slot: None,
            state,
            modifiers: ModifierList::new(),
            interceptors: InterceptorRegistry::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.blueprint.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.blueprint.name
    }

    #[must_use]
    pub fn on_board(&self) -> bool {
        self.location == Location::Board
    }

    /// Readiness state for minions and sigils.
    #[must_use]
    pub fn readiness(&self) -> Option<&MinionState> {
        match &self.state {
            CardState::Minion(m) | CardState::Sigil(m) => Some(m),
            _ => None,
        }
    }

    pub fn readiness_mut(&mut self) -> Option<&mut MinionState> {
        match &mut self.state {
            CardState::Minion(m) | CardState::Sigil(m) => Some(m),
            _ => None,
        }
    }

    /// Damage on a minion or hero; zero for everything else.
    #[must_use]
    pub fn damage_taken(&self) -> i64 {
        match &self.state {
            CardState::Minion(m) => m.damage_taken,
            CardState::Hero(h) => h.damage_taken,
            _ => 0,
        }
    }

    pub(crate) fn add_damage(&mut self, amount: i64) {
        match &mut self.state {
            CardState::Minion(m) => m.damage_taken += amount,
            CardState::Hero(h) => h.damage_taken += amount,
            other => panic!("{} cannot take damage in state {other:?}", self.id),
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.readiness().is_some_and(|m| m.exhausted)
    }

    /// Back to the printed card: fresh kind state, no slot.
    ///
    /// Modifiers are not touched here; the game detaches them first.
    pub(crate) fn reset_state(&mut self) {
        debug_assert!(self.modifiers.is_empty(), "{} reset with live modifiers", self.id);
        self.state = CardState::for_kind(self.blueprint.kind);
        self.slot = None;
    }
}

impl ModifierHost for Card {
    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    fn modifiers_mut(&mut self) -> &mut ModifierList {
        &mut self.modifiers
    }

    fn interceptors(&self) -> &InterceptorRegistry {
        &self.interceptors
    }

    fn interceptors_mut(&mut self) -> &mut InterceptorRegistry {
        &mut self.interceptors
    }
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Card")
            .field("id", &self.id)
            .field("name", &self.blueprint.name)
            .field("owner", &self.owner)
            .field("location", &self.location)
            .field("slot", &self.slot)
            .field("state", &self.state)
            .field("modifiers", &self.modifiers.len())
            .finish()
    }
}
