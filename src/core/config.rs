//! Match configuration.
//!
//! The engine hardcodes rules, not numbers. Board width, hand limits, mana
//! curve and interaction timeouts all come from `GameConfig`, which is
//! stored inside every match record so a replay runs under the same rules.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::PlayerId;
use crate::cards::BlueprintId;

/// How long an interaction waits for its actor before falling back.
///
/// `max_polls` bounds the number of provider polls and always applies, so
/// a provider that never answers cannot stall resolution. `deadline` adds a
/// wall-clock bound for adapters waiting on a network peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeout {
    pub max_polls: u32,
    pub deadline: Option<Duration>,
}

impl Timeout {
    #[must_use]
    pub const fn polls(max_polls: u32) -> Self {
        Self {
            max_polls,
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

impl Default for Timeout {
    fn default() -> Self {
        Self::polls(64)
    }
}

/// Blueprints making up one player's decks.
///
/// Deck legality is checked elsewhere; the engine builds whatever it is given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    pub hero: BlueprintId,
    pub main: Vec<BlueprintId>,
    pub destiny: Vec<BlueprintId>,
}

impl DeckList {
    #[must_use]
    pub fn new(hero: BlueprintId) -> Self {
        Self {
            hero,
            main: Vec::new(),
            destiny: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_main(mut self, cards: impl IntoIterator<Item = BlueprintId>) -> Self {
        self.main.extend(cards);
        self
    }

    #[must_use]
    pub fn with_destiny(mut self, cards: impl IntoIterator<Item = BlueprintId>) -> Self {
        self.destiny.extend(cards);
        self
    }
}

/// Complete match configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats.
    pub player_count: usize,

    /// Seat that takes the first turn.
    pub first_player: PlayerId,

    /// Slots per board zone (each player has an attack and a defense zone).
    pub slots_per_zone: u8,

    pub starting_hand_size: usize,

    /// Cards drawn beyond this are burned to the discard pile.
    pub max_hand_size: usize,

    pub starting_mana: i64,
    pub mana_per_turn: i64,
    pub max_mana_cap: i64,

    /// Whether the first player draws on turn 1.
    pub first_turn_draw: bool,

    /// Base value of `Stat::AttacksPerTurn` for every minion.
    pub attacks_per_turn: i64,

    /// Default timeout applied to interactions that don't set their own.
    pub interaction_timeout: Timeout,
}

impl GameConfig {
    /// Two-player defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            player_count: 2,
            first_player: PlayerId::new(0),
            slots_per_zone: 5,
            starting_hand_size: 4,
            max_hand_size: 8,
            starting_mana: 1,
            mana_per_turn: 1,
            max_mana_cap: 10,
            first_turn_draw: false,
            attacks_per_turn: 1,
            interaction_timeout: Timeout::default(),
        }
    }

    #[must_use]
    pub fn with_player_count(mut self, count: usize) -> Self {
        assert!((1..=255).contains(&count), "Player count must be 1-255");
        self.player_count = count;
        self
    }

    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.first_player = player;
        self
    }

    #[must_use]
    pub fn with_slots_per_zone(mut self, slots: u8) -> Self {
        assert!(slots > 0, "A board zone needs at least one slot");
        self.slots_per_zone = slots;
        self
    }

    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_mana(mut self, starting: i64, per_turn: i64, cap: i64) -> Self {
        self.starting_mana = starting;
        self.mana_per_turn = per_turn;
        self.max_mana_cap = cap;
        self
    }

    #[must_use]
    pub fn with_first_turn_draw(mut self, draw: bool) -> Self {
        self.first_turn_draw = draw;
        self
    }

    #[must_use]
    pub fn with_attacks_per_turn(mut self, attacks: i64) -> Self {
        self.attacks_per_turn = attacks;
        self
    }

    #[must_use]
    pub fn with_interaction_timeout(mut self, timeout: Timeout) -> Self {
        self.interaction_timeout = timeout;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
