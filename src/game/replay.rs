//! Match records and deterministic replay.
//!
//! A match is fully determined by its config, seed, deck lists, submitted
//! actions and interaction outcomes. [`MatchRecord`] captures exactly that;
//! [`MatchRecord::replay`] rebuilds the match by feeding the actions back
//! through [`Game::submit`] and the interaction log through a
//! [`ReplayProvider`] per player.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Game;
use crate::cards::BlueprintRegistry;
use crate::core::{ActionRecord, DeckList, GameConfig, PlayerId, ReplayError};
use crate::interaction::{InteractionRecord, ReplayProvider};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub config: GameConfig,
    pub seed: u64,
    pub decks: Vec<DeckList>,
    pub actions: Vec<ActionRecord>,
    pub interactions: Vec<InteractionRecord>,
}

impl MatchRecord {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Rebuild the match this record came from.
    pub fn replay(&self, registry: Rc<BlueprintRegistry>) -> Result<Game, ReplayError> {
        let mut game = Game::new(self.config.clone(), registry, self.seed);
        for player in PlayerId::all(game.player_count()) {
            let records = self
                .interactions
                .iter()
                .filter(|r| r.player == player)
                .cloned();
            game.set_provider(player, ReplayProvider::new(records));
        }

        game.setup(self.decks.clone());
        for (index, record) in self.actions.iter().enumerate() {
            game.submit(record.player, record.action.clone())
                .map_err(|source| ReplayError::Action { index, source })?;
        }
        debug!(
            actions = self.actions.len(),
            interactions = self.interactions.len(),
            "match replayed"
        );
        Ok(game)
    }
}

impl Game {
    /// Everything needed to replay this match so far.
    #[must_use]
    pub fn match_record(&self) -> MatchRecord {
        MatchRecord {
            config: self.config.clone(),
            seed: self.seed(),
            decks: self.decks.clone(),
            actions: self.turn.history.iter().cloned().collect(),
            interactions: self.interactions.iter().cloned().collect(),
        }
    }
}
