//! Per-player state.

use crate::board::Piles;
use crate::cards::Location;
use crate::core::EntityId;
use crate::interceptors::InterceptorRegistry;
use crate::modifiers::{ModifierHost, ModifierList};

/// One seat: hero, piles, mana, and player-level modifiers.
#[derive(Debug)]
pub struct PlayerState {
    pub(crate) hero: Option<EntityId>,
    pub(crate) piles: Piles,
    pub(crate) mana: i64,
    /// Mana refilled at turn start, before `Stat::MaxMana` interceptors.
    pub(crate) max_mana: i64,
    pub(crate) destiny_played: bool,
    pub(crate) turns_taken: u32,
    pub(crate) eliminated: bool,
    modifiers: ModifierList,
    interceptors: InterceptorRegistry,
}

impl PlayerState {
    pub(crate) fn new(starting_mana: i64) -> Self {
        Self {
            hero: None,
            piles: Piles::new(),
            mana: 0,
            max_mana: starting_mana,
            destiny_played: false,
            turns_taken: 0,
            eliminated: false,
            modifiers: ModifierList::new(),
            interceptors: InterceptorRegistry::new(),
        }
    }

    #[must_use]
    pub fn hero(&self) -> Option<EntityId> {
        self.hero
    }

    #[must_use]
    pub fn mana(&self) -> i64 {
        self.mana
    }

    #[must_use]
    pub fn max_mana(&self) -> i64 {
        self.max_mana
    }

    #[must_use]
    pub fn destiny_played(&self) -> bool {
        self.destiny_played
    }

    #[must_use]
    pub fn turns_taken(&self) -> u32 {
        self.turns_taken
    }

    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }

    #[must_use]
    pub fn piles(&self) -> &Piles {
        &self.piles
    }

    #[must_use]
    pub fn hand(&self) -> &[EntityId] {
        self.piles.cards(Location::Hand)
    }

    #[must_use]
    pub fn main_deck(&self) -> &[EntityId] {
        self.piles.cards(Location::MainDeck)
    }

    #[must_use]
    pub fn destiny_deck(&self) -> &[EntityId] {
        self.piles.cards(Location::DestinyDeck)
    }

    #[must_use]
    pub fn discard(&self) -> &[EntityId] {
        self.piles.cards(Location::Discard)
    }
}

impl ModifierHost for PlayerState {
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
