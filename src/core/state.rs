//! Turn progression and action history.
//!
//! `TurnState` is the public, observable part of turn flow: whose turn it
//! is, which phase the match is in, and every action submitted so far.
//! History uses `im::Vector` so observers can hold a snapshot of it for free.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::player::PlayerId;

/// Coarse phase of the match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Decks built, first turn not started.
    #[default]
    Setup,
    /// Active player may submit actions.
    Main,
    /// An attack is being resolved.
    Combat,
    GameOver,
}

/// Public turn state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnState {
    player_count: usize,

    /// Turn number (0 before the first turn starts).
    pub turn_number: u32,

    /// Action sequence within the current turn.
    pub action_sequence: u32,

    pub active_player: PlayerId,

    pub phase: Phase,

    /// Every action submitted, in order.
    pub history: Vector<ActionRecord>,
}

impl TurnState {
    #[must_use]
    pub fn new(player_count: usize, first_player: PlayerId) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(
            first_player.index() < player_count,
            "First player {first_player} is not seated"
        );

        Self {
            player_count,
            turn_number: 0,
            action_sequence: 0,
            active_player: first_player,
            phase: Phase::Setup,
            history: Vector::new(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Seats in priority order: active player first.
    pub fn priority_order(&self) -> impl Iterator<Item = PlayerId> {
        self.active_player.order_from(self.player_count)
    }

    /// Begin a new turn for `player`.
    pub fn begin_turn(&mut self, player: PlayerId) {
        self.turn_number += 1;
        self.action_sequence = 0;
        self.active_player = player;
        self.phase = Phase::Main;
    }

    /// Record an action and return its record.
    pub fn record(&mut self, player: PlayerId, action: Action) -> ActionRecord {
        let record = ActionRecord::new(player, action, self.turn_number, self.action_sequence);
        self.action_sequence += 1;
        self.history.push_back(record.clone());
        record
    }
}
