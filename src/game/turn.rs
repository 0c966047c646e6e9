//! Match setup and turn flow.
//!
//! ## Turn Structure
//!
//! 1. The active player's max mana grows (not on their first turn), mana
//!    refills to `Stat::MaxMana`, and their cards on the board ready up.
//! 2. They draw, except on the very first turn of the match unless
//!    `first_turn_draw` is set.
//! 3. `turn.start` fires.
//! 4. They act until `Action::EndTurn`; `turn.end` fires and the next
//!    player still standing takes over.

use tracing::{debug, info};

use super::Game;
use crate::cards::{CardKind, Location};
use crate::core::{DeckList, Phase, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::interceptors::Stat;

impl Game {
    /// Build every player's hero and decks, deal starting hands and start
    /// the first turn.
    ///
    /// Panics if the match already started or the deck count is wrong.
    pub fn setup(&mut self, decks: Vec<DeckList>) {
        assert_eq!(self.turn.phase, Phase::Setup, "setup() called twice");
        assert_eq!(
            decks.len(),
            self.player_count(),
            "expected one deck list per player"
        );

        for (player, deck) in PlayerId::all(self.player_count()).zip(&decks) {
            let hero = self.create_card(deck.hero, player, Location::Board);
            assert_eq!(
                self.card_ref(hero).kind(),
                CardKind::Hero,
                "{} is not a hero",
                deck.hero
            );
            self.players[player].hero = Some(hero);

            for &blueprint in &deck.main {
                self.create_card(blueprint, player, Location::MainDeck);
            }
            for &blueprint in &deck.destiny {
                self.create_card(blueprint, player, Location::DestinyDeck);
            }
            self.players[player]
                .piles
                .shuffle(Location::MainDeck, &mut self.rng);
        }
        self.decks = decks;

        for player in PlayerId::all(self.player_count()) {
            for _ in 0..self.config.starting_hand_size {
                self.draw(player);
            }
        }

        info!(players = self.player_count(), seed = self.seed(), "match started");
        self.start_turn(self.config.first_player);
    }

    pub(crate) fn start_turn(&mut self, player: PlayerId) {
        self.turn.begin_turn(player);

        let state = &mut self.players[player];
        if state.turns_taken > 0 {
            state.max_mana = (state.max_mana + self.config.mana_per_turn).min(self.config.max_mana_cap);
        }
        state.turns_taken += 1;
        let mana = self.stat(player, Stat::MaxMana);
        let state = &mut self.players[player];
        state.mana = mana;
        state.destiny_played = false;

        let ready: Vec<_> = self.board.occupants_of(player).collect();
        for card in ready {
            if let Some(readiness) = self.card_mut(card).readiness_mut() {
                readiness.exhausted = false;
                readiness.summoning_sick = false;
                readiness.attacks_this_turn = 0;
            }
        }
        debug!(%player, turn = self.turn.turn_number, mana, "turn start");

        if self.turn.turn_number > 1 || self.config.first_turn_draw {
            self.draw(player);
        }
        self.emit(GameEvent::new(EventKind::TurnStart).with_player(player));
    }

    pub(crate) fn end_turn(&mut self, player: PlayerId) {
        debug!(%player, turn = self.turn.turn_number, "turn end");
        self.emit(GameEvent::new(EventKind::TurnEnd).with_player(player));
        if self.is_over() {
            return;
        }

        let count = self.player_count();
        let next = player
            .order_from(count)
            .skip(1)
            .find(|&p| !self.players[p].eliminated)
            .unwrap_or(player);
        self.start_turn(next);
    }
}
