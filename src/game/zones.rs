//! Card creation and movement.
//!
//! [`Game::move_card`] is the only way a card changes location. It keeps
//! piles, slots and `Card::location`/`Card::slot` in step, and brackets the
//! move with `card.before_change_zone` / `card.after_change_zone`.

use tracing::debug;

use super::Game;
use crate::board::{PilePosition, SlotId};
use crate::cards::{BlueprintId, Card, Location};
use crate::core::{EntityId, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::modifiers::ModifierHost;

impl Game {
    /// Create a card owned by `owner` and run its blueprint's `on_init`.
    ///
    /// Cards created directly on the board go to the `Board` pile (heroes,
    /// artifacts); use [`Game::summon`] to put a minion in a slot.
    pub fn create_card(&mut self, blueprint: BlueprintId, owner: PlayerId, location: Location) -> EntityId {
        let blueprint = self.registry.expect(blueprint);
        let id = EntityId(self.next_entity);
        self.next_entity += 1;

        self.cards
            .insert(id, Card::new(id, blueprint.clone(), owner, location));
        self.players[owner]
            .piles
            .add(id, location, PilePosition::Top);

        if let Some(init) = blueprint.on_init.clone() {
            init(self, id);
        }
        id
    }

    /// Move `card` to `to`, into `slot` if given.
    ///
    /// A card leaving the board loses every modifier and returns to its
    /// printed state, then its `on_init` runs again.
    pub fn move_card(&mut self, card: EntityId, to: Location, slot: Option<SlotId>) {
        let (owner, from, from_slot, kind) = {
            let c = self.card_ref(card);
            (c.owner, c.location, c.slot, c.kind())
        };
        assert!(
            slot.is_none() || to == Location::Board,
            "{card} given a slot outside the board"
        );
        assert!(
            slot.is_none() || kind.needs_slot(),
            "{card} ({kind:?}) cannot occupy a slot"
        );

        self.emit(GameEvent::zone_change(EventKind::CardBeforeChangeZone, card, from, to).with_player(owner));
        if self.card_ref(card).location != from {
            debug!(%card, "card moved by a before_change_zone handler; move skipped");
            return;
        }

        match from_slot {
            Some(s) => {
                self.board
                    .slot_mut(s)
                    .unwrap_or_else(|| panic!("{card} sits in unknown {s}"))
                    .remove(card);
            }
            None => {
                let removed = self.players[owner].piles.remove(card, from);
                assert!(removed, "{card} missing from its {from:?} pile");
            }
        }
        {
            let c = self.card_mut(card);
            c.location = to;
            c.slot = None;
        }

        let left_board = from == Location::Board && to != Location::Board;
        if left_board {
            while let Some(id) = self.card_ref(card).modifiers().ids().first().copied() {
                self.remove_modifier(card, id);
            }
            self.card_mut(card).reset_state();
        }

        match slot {
            Some(s) => {
                self.board
                    .slot_mut(s)
                    .unwrap_or_else(|| panic!("{s} is not on the board"))
                    .summon(card);
                self.card_mut(card).slot = Some(s);
            }
            None => self.players[owner].piles.add(card, to, PilePosition::Top),
        }

        if left_board {
            if let Some(init) = self.card_ref(card).blueprint.on_init.clone() {
                init(self, card);
            }
        }

        debug!(%card, ?from, ?to, ?slot, "card moved");
        self.emit(GameEvent::zone_change(EventKind::CardAfterChangeZone, card, from, to).with_player(owner));
    }

    /// Put a minion or sigil into a slot. It arrives summoning sick.
    pub fn summon(&mut self, card: EntityId, slot: SlotId) {
        self.move_card(card, Location::Board, Some(slot));
        if let Some(readiness) = self.card_mut(card).readiness_mut() {
            readiness.summoning_sick = true;
        }
        let owner = self.owner_of(card);
        self.emit(
            GameEvent::new(EventKind::MinionSummoned)
                .with_target(card)
                .with_player(owner),
        );
    }

    /// Draw the top card of `player`'s main deck.
    ///
    /// With a full hand the card is burned to the discard pile instead.
    /// Returns the card if it reached the hand.
    pub fn draw(&mut self, player: PlayerId) -> Option<EntityId> {
        let Some(card) = self.players[player].piles.top(Location::MainDeck) else {
            debug!(%player, "draw from an empty deck");
            return None;
        };

        if self.players[player].hand().len() >= self.config.max_hand_size {
            self.move_card(card, Location::Discard, None);
            debug!(%player, %card, "hand full; card burned");
            self.emit(GameEvent::new(EventKind::CardBurned).with_target(card).with_player(player));
            return None;
        }

        self.move_card(card, Location::Hand, None);
        self.emit(GameEvent::new(EventKind::CardDrawn).with_target(card).with_player(player));
        Some(card)
    }

    /// Free slots of `player` that currently accept a summon.
    #[must_use]
    pub fn summon_slots(&self, player: PlayerId) -> Vec<SlotId> {
        self.board
            .free_slots(player)
            .filter(|&s| self.flag(s, crate::interceptors::Flag::CanSummonHere))
            .collect()
    }
}
