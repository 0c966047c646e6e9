//! Driving the effect chain.
//!
//! ## Resolution Loop
//!
//! ```text
//! while chain.len() > floor:
//!     offer a reaction window (every player, priority order)
//!     pop the top link
//!     resolve it (may push more links, which resolve first)
//! ```
//!
//! A reaction window keeps circling the table until a full pass goes by
//! with nobody reacting. Reactions are reaction-speed cards from hand,
//! offered through an `InteractionKind::Reaction` request with `min = 0`,
//! so a timeout simply passes.

use tracing::debug;

use super::Game;
use crate::board::SlotId;
use crate::cards::{CardBlueprint, CardKind, Location, Speed};
use crate::chain::{ChainLink, ChainLinkId, ChainState, LinkEffect};
use crate::core::{EntityId, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::interaction::{Choice, InteractionKind, InteractionRequest};
use crate::interceptors::{Flag, Stat};

impl Game {
    /// Push a rule-triggered effect onto the chain.
    ///
    /// If the chain was idle it is resolved right away; otherwise the link
    /// waits its turn above whatever is pending.
    pub fn push_triggered(
        &mut self,
        controller: PlayerId,
        source: Option<EntityId>,
        label: impl Into<String>,
        targets: Vec<Choice>,
        resolve: impl Fn(&mut Game, &[Choice]) + 'static,
    ) -> ChainLinkId {
        let idle = self.chain.state() == ChainState::Idle;
        let effect = LinkEffect::Triggered {
            label: label.into(),
            resolve: std::rc::Rc::new(resolve),
        };
        let id = self.push_link(controller, source, effect, targets);
        if idle {
            self.settle_above(0);
        }
        id
    }

    pub(crate) fn push_link(
        &mut self,
        controller: PlayerId,
        source: Option<EntityId>,
        effect: LinkEffect,
        targets: Vec<Choice>,
    ) -> ChainLinkId {
        let label = effect.label();
        let id = self.chain.push(controller, source, effect, targets);
        debug!(%id, %controller, %label, depth = self.chain.len(), "chain link added");

        let mut event = GameEvent::new(EventKind::ChainLinkAdded)
            .with_player(controller)
            .with_value(i64::from(id.0));
        if let Some(source) = source {
            event = event.with_source(source);
        }
        self.emit(event);
        id
    }

    /// Resolve links until only `floor` remain.
    ///
    /// `floor = 0` empties the chain. Nested windows (combat reactions) pass
    /// the length they found so they never resolve links beneath them.
    pub(crate) fn settle_above(&mut self, floor: usize) {
        while self.chain.len() > floor {
            if self.is_over() {
                self.abandon_chain();
                break;
            }
            self.reaction_window();
            if self.is_over() {
                continue;
            }
            let Some(link) = self.chain.pop() else {
                break;
            };
            self.resolve_link(link);
            self.chain.finish();
        }

        if floor == 0 && self.chain.state() == ChainState::Idle && !self.is_over() {
            debug!(resolved = self.chain.resolved_count(), "chain resolved");
            self.emit(GameEvent::new(EventKind::ChainResolved));
        }
    }

    /// The match ended mid-chain: pending links never resolve.
    fn abandon_chain(&mut self) {
        for link in self.chain.abandon() {
            debug!(id = %link.id, "chain link abandoned");
            if let LinkEffect::PlayCard { card, .. } = link.effect {
                if self.card_ref(card).location == Location::Chain {
                    self.move_card(card, Location::Discard, None);
                }
            }
        }
    }

    /// Reaction-speed cards `player` could play right now.
    #[must_use]
    pub fn playable_reactions(&self, player: PlayerId) -> Vec<EntityId> {
        if self.players[player].eliminated {
            return Vec::new();
        }
        self.players[player]
            .hand()
            .iter()
            .copied()
            .filter(|&card| {
                self.card_ref(card).blueprint.speed == Speed::Reaction
                    && self.check_play(player, card, Location::Hand, None).is_ok()
            })
            .collect()
    }

    /// Offer every player, in priority order, the chance to react.
    pub(crate) fn reaction_window(&mut self) {
        'window: loop {
            let order: Vec<PlayerId> = self.turn.priority_order().collect();
            for player in order {
                if self.is_over() {
                    return;
                }
                let playable = self.playable_reactions(player);
                if playable.is_empty() {
                    continue;
                }

                let request = InteractionRequest::new(player, InteractionKind::Reaction)
                    .with_prompt("Play a reaction?")
                    .with_candidates(playable.into_iter().map(Choice::Card))
                    .with_count(0, 1)
                    .eligible_if(move |game: &Game, choice: &Choice| {
                        choice.as_card().is_some_and(|card| {
                            game.check_play(player, card, Location::Hand, None).is_ok()
                        })
                    });

                self.chain.open_window();
                let picked = self.request(request);
                self.chain.close_window();

                if let Some(card) = picked.first().and_then(|c| c.as_card()) {
                    // Re-checked: the window may have changed the game.
                    if self.check_play(player, card, Location::Hand, None).is_ok() {
                        debug!(%player, %card, "reaction");
                        self.begin_play(player, card, None, false);
                        continue 'window;
                    }
                }
            }
            break;
        }
    }

    /// Pay for `card`, pick its slot and targets, and put it on the chain.
    pub(crate) fn begin_play(
        &mut self,
        player: PlayerId,
        card: EntityId,
        slot: Option<SlotId>,
        from_destiny: bool,
    ) -> ChainLinkId {
        let cost = self.stat(card, Stat::ManaCost).max(0);
        self.players[player].mana -= cost;
        if from_destiny {
            self.players[player].destiny_played = true;
        }
        self.emit(
            GameEvent::new(EventKind::CardBeforePlay)
                .with_target(card)
                .with_player(player)
                .with_value(cost),
        );

        let blueprint = self.card_ref(card).blueprint.clone();
        let slot = if blueprint.kind.needs_slot() {
            slot.or_else(|| self.request_summon_slot(player, card))
        } else {
            None
        };
        let targets = match blueprint.pre_response_targets.clone() {
            Some(targets) => targets(self, card),
            None => Vec::new(),
        };

        let from = self.card_ref(card).location;
        if from != Location::Chain {
            self.move_card(card, Location::Chain, None);
        }
        self.push_link(
            player,
            Some(card),
            LinkEffect::PlayCard {
                card,
                blueprint,
                slot,
                from_destiny,
            },
            targets,
        )
    }

    /// Ask where a minion or sigil should land. Falls back to the first
    /// free slot.
    pub(crate) fn request_summon_slot(&mut self, player: PlayerId, card: EntityId) -> Option<SlotId> {
        let slots = self.summon_slots(player);
        let first = *slots.first()?;
        let request = InteractionRequest::new(player, InteractionKind::SummonSlot)
            .with_prompt("Choose a slot")
            .with_source(card)
            .with_candidates(slots.into_iter().map(Choice::Slot))
            .eligible_if(|game: &Game, choice: &Choice| {
                choice
                    .as_slot()
                    .is_some_and(|s| game.flag(s, Flag::CanSummonHere))
            })
            .with_fallback(vec![Choice::Slot(first)]);
        self.request(request).first().and_then(|c| c.as_slot())
    }

    fn resolve_link(&mut self, link: ChainLink) {
        let ChainLink {
            id,
            controller,
            source,
            effect,
            targets,
        } = link;
        debug!(%id, label = %effect.label(), "resolving chain link");

        let mut before = GameEvent::new(EventKind::ChainBeforeEffectResolved)
            .with_player(controller)
            .with_value(i64::from(id.0));
        if let Some(source) = source {
            before = before.with_source(source);
        }
        let after = GameEvent {
            kind: EventKind::ChainAfterEffectResolved,
            ..before.clone()
        };
        self.emit(before);

        match effect {
            LinkEffect::PlayCard {
                card,
                blueprint,
                slot,
                from_destiny,
            } => self.resolve_play(controller, card, &blueprint, slot, from_destiny, &targets),
            LinkEffect::Ability { card, ability, .. } => (ability.on_resolve)(self, card, &targets),
            LinkEffect::Attack { attacker, target } => self.resolve_attack(attacker, target),
            LinkEffect::Triggered { resolve, .. } => resolve(self, &targets),
        }

        self.emit(after);
    }

    fn resolve_play(
        &mut self,
        player: PlayerId,
        card: EntityId,
        blueprint: &CardBlueprint,
        slot: Option<SlotId>,
        from_destiny: bool,
        targets: &[Choice],
    ) {
        if self.card_ref(card).location != Location::Chain {
            debug!(%card, "played card left the chain; effect negated");
            return;
        }

        match blueprint.kind {
            CardKind::Minion | CardKind::Sigil => {
                let free = slot.filter(|&s| {
                    self.board.slot(s).is_some_and(|bs| !bs.is_occupied())
                        && self.flag(s, Flag::CanSummonHere)
                });
                match free {
                    Some(slot) => self.summon(card, slot),
                    None => {
                        debug!(%card, "no slot left to land in; discarded");
                        self.move_card(card, Location::Discard, None);
                        return;
                    }
                }
                if let Some(on_play) = blueprint.on_play.clone() {
                    on_play(self, card, targets);
                }
            }
            CardKind::Artifact => {
                self.move_card(card, Location::Board, None);
                if let Some(on_play) = blueprint.on_play.clone() {
                    on_play(self, card, targets);
                }
            }
            CardKind::Spell => {
                if let Some(on_play) = blueprint.on_play.clone() {
                    on_play(self, card, targets);
                }
                if self.card_ref(card).location == Location::Chain {
                    let to = if from_destiny {
                        Location::DestinyZone
                    } else {
                        Location::Discard
                    };
                    self.move_card(card, to, None);
                }
            }
            CardKind::Hero => panic!("{card} is a hero and cannot be played"),
        }

        self.emit(
            GameEvent::new(EventKind::CardAfterPlay)
                .with_target(card)
                .with_player(player),
        );
    }
}
