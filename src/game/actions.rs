//! Player actions: validation, enumeration, submission.
//!
//! [`Game::submit`] is the only entry point for a player's turn. It refuses
//! anything [`Game::validate`] rejects, records the action, and runs it to
//! completion, including every chain link and interaction it causes.
//! [`Game::legal_actions`] lists exactly the actions `validate` accepts.

use tracing::debug;

use super::Game;
use crate::board::SlotId;
use crate::cards::{CardKind, Location};
use crate::chain::LinkEffect;
use crate::core::{Action, ActionError, EntityId, Phase, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::interceptors::{Flag, Stat};

impl Game {
    /// Check `action` for `player` without running it.
    pub fn validate(&self, player: PlayerId, action: &Action) -> Result<(), ActionError> {
        match self.turn.phase {
            Phase::GameOver => return Err(ActionError::GameOver),
            Phase::Setup => return Err(ActionError::NotStarted),
            Phase::Main | Phase::Combat => {}
        }
        if player != self.turn.active_player || self.players[player].eliminated {
            return Err(ActionError::NotYourTurn(player));
        }
        if self.chain.is_active() || self.combat.is_some() {
            return Err(ActionError::ResolutionInProgress);
        }

        match *action {
            Action::PlayCard { card, slot } => self.check_play(player, card, Location::Hand, slot),
            Action::PlayDestiny { card, slot } => {
                if self.players[player].destiny_played {
                    return Err(ActionError::DestinyAlreadyPlayed(player));
                }
                self.check_play(player, card, Location::DestinyDeck, slot)
            }
            Action::UseAbility { card, ability } => self.check_ability(player, card, ability),
            Action::Attack { attacker, target } => self.check_attack(player, attacker, target),
            Action::EndTurn => Ok(()),
        }
    }

    /// Whether `player` may play `card` from `from` right now, ignoring
    /// whose turn it is.
    pub(crate) fn check_play(
        &self,
        player: PlayerId,
        card: EntityId,
        from: Location,
        slot: Option<SlotId>,
    ) -> Result<(), ActionError> {
        let Some(c) = self
            .card(card)
            .filter(|c| c.owner == player && c.location == from)
        else {
            return Err(match from {
                Location::DestinyDeck => ActionError::NotInDestinyDeck { player, card },
                _ => ActionError::NotInHand { player, card },
            });
        };

        if c.kind() == CardKind::Hero
            || !self.flag(player, Flag::CanPlay)
            || !self.flag(card, Flag::CanPlay)
            || !c.blueprint.check_can_play(self, card)
        {
            return Err(ActionError::NotPlayable(card));
        }

        let required = self.stat(card, Stat::ManaCost).max(0);
        let available = self.players[player].mana;
        if required > available {
            return Err(ActionError::InsufficientMana {
                required,
                available,
            });
        }

        match slot {
            Some(slot) if !c.kind().needs_slot() => Err(ActionError::InvalidSlot(slot)),
            Some(slot) => {
                let legal = slot.player == player
                    && self.board.contains(slot)
                    && self.flag(slot, Flag::CanSummonHere);
                if legal {
                    Ok(())
                } else {
                    Err(ActionError::InvalidSlot(slot))
                }
            }
            None if c.kind().needs_slot() && self.summon_slots(player).is_empty() => {
                Err(ActionError::NoFreeSlot(card))
            }
            None => Ok(()),
        }
    }

    fn check_ability(&self, player: PlayerId, card: EntityId, index: u8) -> Result<(), ActionError> {
        let controlled = self
            .card(card)
            .is_some_and(|c| c.owner == player && c.on_board());
        if !controlled {
            return Err(ActionError::NotControlled(card));
        }
        let abilities = self.abilities_of(card);
        let Some(ability) = abilities.get(usize::from(index)) else {
            return Err(ActionError::UnknownAbility { card, index });
        };

        let usable = self.flag(card, Flag::CanUseAbilities)
            && !(ability.should_exhaust && self.card_ref(card).is_exhausted())
            && ability.can_use.as_ref().map_or(true, |f| f(self, card));
        if !usable {
            return Err(ActionError::AbilityUnavailable { card, index });
        }

        let available = self.players[player].mana;
        if ability.mana_cost > available {
            return Err(ActionError::InsufficientMana {
                required: ability.mana_cost,
                available,
            });
        }
        Ok(())
    }

    fn check_attack(&self, player: PlayerId, attacker: EntityId, target: EntityId) -> Result<(), ActionError> {
        let controlled = self
            .card(attacker)
            .is_some_and(|c| c.owner == player && c.on_board());
        if !controlled {
            return Err(ActionError::NotControlled(attacker));
        }
        if !self.flag(attacker, Flag::CanAttack) {
            return Err(ActionError::CannotAttack(attacker));
        }
        if !self.is_attackable_by(player, target) {
            return Err(ActionError::InvalidAttackTarget(target));
        }
        Ok(())
    }

    /// Every action `validate` would accept for `player`, in a stable order:
    /// plays (one per legal slot), destiny plays, abilities, attacks, end turn.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        if self.validate(player, &Action::EndTurn).is_err() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let slots = self.summon_slots(player);

        for (from, cards) in [
            (Location::Hand, self.players[player].hand()),
            (Location::DestinyDeck, self.players[player].destiny_deck()),
        ] {
            for &card in cards {
                let make = |slot| match from {
                    Location::DestinyDeck => Action::PlayDestiny { card, slot },
                    _ => Action::PlayCard { card, slot },
                };
                if self.card_ref(card).kind().needs_slot() {
                    actions.extend(
                        slots
                            .iter()
                            .map(|&s| make(Some(s)))
                            .filter(|a| self.validate(player, a).is_ok()),
                    );
                } else {
                    let action = make(None);
                    if self.validate(player, &action).is_ok() {
                        actions.push(action);
                    }
                }
            }
        }

        for card in self.board.occupants_of(player) {
            for index in 0..self.abilities_of(card).len() {
                let Ok(ability) = u8::try_from(index) else {
                    break;
                };
                let action = Action::UseAbility { card, ability };
                if self.validate(player, &action).is_ok() {
                    actions.push(action);
                }
            }
        }

        let targets: Vec<EntityId> = self
            .cards
            .values()
            .filter(|c| self.is_attackable_by(player, c.id))
            .map(|c| c.id)
            .collect();
        for attacker in self.minions_of(player) {
            if !self.flag(attacker, Flag::CanAttack) {
                continue;
            }
            actions.extend(
                targets
                    .iter()
                    .map(|&target| Action::Attack { attacker, target }),
            );
        }

        actions.push(Action::EndTurn);
        actions
    }

    /// Validate, record and run one action.
    pub fn submit(&mut self, player: PlayerId, action: Action) -> Result<(), ActionError> {
        self.validate(player, &action)?;
        debug!(%player, ?action, turn = self.turn.turn_number, "action");
        self.turn.record(player, action.clone());

        match action {
            Action::PlayCard { card, slot } => {
                self.begin_play(player, card, slot, false);
                self.settle_above(0);
            }
            Action::PlayDestiny { card, slot } => {
                self.begin_play(player, card, slot, true);
                self.settle_above(0);
            }
            Action::UseAbility { card, ability } => self.use_ability(player, card, ability),
            Action::Attack { attacker, target } => self.begin_attack(player, attacker, target),
            Action::EndTurn => self.end_turn(player),
        }
        Ok(())
    }

    fn use_ability(&mut self, player: PlayerId, card: EntityId, index: u8) {
        let abilities = self.abilities_of(card);
        let ability = abilities[usize::from(index)].clone();

        self.players[player].mana -= ability.mana_cost;
        if ability.should_exhaust {
            if let Some(readiness) = self.card_mut(card).readiness_mut() {
                readiness.exhausted = true;
            }
        }
        let targets = match ability.targets.clone() {
            Some(targets) => targets(self, card),
            None => Vec::new(),
        };

        self.emit(
            GameEvent::new(EventKind::AbilityUsed)
                .with_source(card)
                .with_player(player)
                .with_value(i64::from(index)),
        );
        self.push_link(
            player,
            Some(card),
            LinkEffect::Ability {
                card,
                index,
                ability,
            },
            targets,
        );
        self.settle_above(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardZone;
    use crate::cards::{AbilityBlueprint, BlueprintId, BlueprintRegistry, CardBlueprint};
    use crate::core::GameConfig;
    use crate::interaction::Choice;
    use std::rc::Rc;

    const SOLDIER: BlueprintId = BlueprintId::new(1);
    const TOTEM: BlueprintId = BlueprintId::new(2);
    const HERO: BlueprintId = BlueprintId::new(3);

    fn game() -> Game {
        let mut registry = BlueprintRegistry::new();
        registry.register(
            CardBlueprint::new(SOLDIER, "Soldier", CardKind::Minion)
                .with_cost(2)
                .with_stats(2, 2),
        );
        registry.register(
            CardBlueprint::new(TOTEM, "Totem", CardKind::Sigil).with_ability(
                AbilityBlueprint::new("Hum", |_game: &mut Game, _card: EntityId, _t: &[Choice]| {})
                    .with_cost(1),
            ),
        );
        registry.register(CardBlueprint::new(HERO, "Hero", CardKind::Hero).with_stats(0, 10));
        let mut game = Game::new(GameConfig::new().with_slots_per_zone(2), Rc::new(registry), 8);
        game.turn.begin_turn(PlayerId::new(0));
        game
    }

    #[test]
    fn test_turn_and_phase_checks() {
        let mut game = game();
        assert_eq!(
            game.validate(PlayerId::new(1), &Action::EndTurn),
            Err(ActionError::NotYourTurn(PlayerId::new(1)))
        );
        game.turn.phase = Phase::GameOver;
        assert_eq!(game.validate(PlayerId::new(0), &Action::EndTurn), Err(ActionError::GameOver));
        assert!(game.legal_actions(PlayerId::new(0)).is_empty());
    }

    #[test]
    fn test_play_checks() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let card = game.create_card(SOLDIER, p0, Location::Hand);
        let play = Action::PlayCard { card, slot: None };

        assert_eq!(
            game.validate(p0, &play),
            Err(ActionError::InsufficientMana {
                required: 2,
                available: 0
            })
        );

        game.players[p0].mana = 2;
        assert_eq!(game.validate(p0, &play), Ok(()));

        let enemy_slot = SlotId::new(PlayerId::new(1), BoardZone::Attack, 0);
        assert_eq!(
            game.validate(p0, &Action::PlayCard { card, slot: Some(enemy_slot) }),
            Err(ActionError::InvalidSlot(enemy_slot))
        );

        let other = game.create_card(SOLDIER, PlayerId::new(1), Location::Hand);
        assert_eq!(
            game.validate(p0, &Action::PlayCard { card: other, slot: None }),
            Err(ActionError::NotInHand { player: p0, card: other })
        );
    }

    #[test]
    fn test_legal_actions_enumerate_slots() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let card = game.create_card(SOLDIER, p0, Location::Hand);
        game.players[p0].mana = 2;

        let actions = game.legal_actions(p0);
        // Four free slots plus end turn.
        assert_eq!(actions.len(), 5);
        assert!(actions.iter().all(|a| game.validate(p0, a).is_ok()));
        assert!(actions.contains(&Action::PlayCard {
            card,
            slot: Some(SlotId::new(p0, BoardZone::Defense, 1)),
        }));
        assert_eq!(actions.last(), Some(&Action::EndTurn));
    }

    #[test]
    fn test_submit_play_summons_and_pays() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let card = game.create_card(SOLDIER, p0, Location::Hand);
        game.players[p0].mana = 3;
        let slot = SlotId::new(p0, BoardZone::Attack, 1);

        game.submit(p0, Action::PlayCard { card, slot: Some(slot) }).unwrap();
        assert_eq!(game.card_ref(card).slot, Some(slot));
        assert_eq!(game.player(p0).mana(), 1);
        assert_eq!(game.action_history().len(), 1);
        assert!(!game.chain().is_active());
    }

    #[test]
    fn test_ability_exhausts() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let totem = game.create_card(TOTEM, p0, Location::Hand);
        game.summon(totem, SlotId::new(p0, BoardZone::Defense, 0));
        game.players[p0].mana = 1;

        let use_it = Action::UseAbility { card: totem, ability: 0 };
        assert!(game.legal_actions(p0).contains(&use_it));
        game.submit(p0, use_it.clone()).unwrap();
        assert_eq!(
            game.validate(p0, &use_it),
            Err(ActionError::AbilityUnavailable { card: totem, index: 0 })
        );
        assert_eq!(
            game.validate(p0, &Action::UseAbility { card: totem, ability: 3 }),
            Err(ActionError::UnknownAbility { card: totem, index: 3 })
        );
    }

    #[test]
    fn test_attack_checks() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let soldier = game.create_card(SOLDIER, p0, Location::Hand);
        game.summon(soldier, SlotId::new(p0, BoardZone::Attack, 0));
        let hero = game.create_card(HERO, PlayerId::new(1), Location::Board);
        let own_hero = game.create_card(HERO, p0, Location::Board);

        let attack = Action::Attack { attacker: soldier, target: hero };
        assert_eq!(game.validate(p0, &attack), Err(ActionError::CannotAttack(soldier)));

        if let Some(readiness) = game.card_mut(soldier).readiness_mut() {
            readiness.summoning_sick = false;
        }
        assert_eq!(game.validate(p0, &attack), Ok(()));
        assert_eq!(
            game.validate(p0, &Action::Attack { attacker: soldier, target: own_hero }),
            Err(ActionError::InvalidAttackTarget(own_hero))
        );
        assert!(game.legal_actions(p0).contains(&attack));
    }
}
