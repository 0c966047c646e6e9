//! Damage, lethal checks and destruction.
//!
//! Damage runs through two stat pipelines: the dealer's `DamageDealt` and
//! then the receiver's `DamageReceived`. The result never goes below zero.
//! Destruction is synchronous: any change that leaves a minion or hero with
//! `damage_taken >= MaxHp` destroys it before control returns.

use tracing::debug;

use super::Game;
use crate::cards::{CardKind, CardState, Location};
use crate::core::{EntityId, Phase, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::interceptors::Stat;

impl Game {
    /// Damage `target` would take from `source` for a raw `amount`.
    #[must_use]
    pub fn compute_damage(&self, source: Option<EntityId>, target: EntityId, amount: i64) -> i64 {
        let dealt = match source {
            Some(source) => self.get_value(source, Stat::DamageDealt, amount),
            None => amount,
        };
        self.get_value(target, Stat::DamageReceived, dealt).max(0)
    }

    /// Deal damage and destroy the target if it is lethal. Returns the
    /// amount actually dealt.
    pub fn deal_damage(&mut self, source: Option<EntityId>, target: EntityId, amount: i64) -> i64 {
        let dealt = self.compute_damage(source, target, amount);
        self.apply_damage(source, target, dealt);
        self.check_lethal(target);
        dealt
    }

    /// Mark already-computed damage without a lethal check.
    ///
    /// Combat applies both sides this way and checks lethal afterwards, so
    /// the two hits land simultaneously.
    pub(crate) fn apply_damage(&mut self, source: Option<EntityId>, target: EntityId, amount: i64) {
        self.emit(GameEvent::damage(EventKind::DamageBefore, source, target, amount));
        self.card_mut(target).add_damage(amount);
        debug!(%target, amount, source = ?source, "damage");
        self.emit(GameEvent::damage(EventKind::DamageAfter, source, target, amount));

        if amount > 0 && self.card_ref(target).kind() == CardKind::Hero {
            let owner = self.owner_of(target);
            self.wear_artifacts(owner);
        }
    }

    /// Each hit on a hero wears down its owner's artifacts by one.
    fn wear_artifacts(&mut self, player: PlayerId) {
        let artifacts: Vec<EntityId> = self
            .cards
            .values()
            .filter(|c| c.owner == player && c.on_board() && c.kind() == CardKind::Artifact)
            .map(|c| c.id)
            .collect();

        for artifact in artifacts {
            let wear = match &mut self.card_mut(artifact).state {
                CardState::Artifact(state) => {
                    state.wear += 1;
                    state.wear
                }
                _ => continue,
            };
            if wear >= self.stat(artifact, Stat::Durability) {
                self.destroy(artifact);
            }
        }
    }

    /// Destroy `card` if it is an on-board minion or hero at or below 0 hp.
    pub(crate) fn check_lethal(&mut self, card: EntityId) {
        let Some(c) = self.card(card) else {
            return;
        };
        if !c.on_board() || !matches!(c.kind(), CardKind::Minion | CardKind::Hero) {
            return;
        }
        if c.damage_taken() >= self.stat(card, Stat::MaxHp) {
            self.destroy(card);
        }
    }

    /// Remaining hit points of a minion or hero.
    #[must_use]
    pub fn health(&self, card: EntityId) -> i64 {
        self.stat(card, Stat::MaxHp) - self.card_ref(card).damage_taken()
    }

    /// Destroy a card in play.
    ///
    /// Minions, sigils and artifacts go to the discard pile. A destroyed
    /// hero eliminates its owner; the last player standing wins.
    pub fn destroy(&mut self, card: EntityId) {
        let (kind, owner, on_board) = {
            let c = self.card_ref(card);
            (c.kind(), c.owner, c.on_board())
        };
        if !on_board {
            return;
        }
        debug!(%card, ?kind, "destroy");

        match kind {
            CardKind::Minion | CardKind::Sigil => {
                self.emit(
                    GameEvent::new(EventKind::MinionBeforeDestroy)
                        .with_target(card)
                        .with_player(owner),
                );
                if !self.card_ref(card).on_board() {
                    return;
                }
                self.move_card(card, Location::Discard, None);
                self.emit(
                    GameEvent::new(EventKind::MinionDestroyed)
                        .with_target(card)
                        .with_player(owner),
                );
            }
            CardKind::Artifact => {
                self.move_card(card, Location::Discard, None);
                self.emit(
                    GameEvent::new(EventKind::ArtifactDestroyed)
                        .with_target(card)
                        .with_player(owner),
                );
            }
            CardKind::Hero => {
                if self.players[owner].eliminated {
                    return;
                }
                self.emit(
                    GameEvent::new(EventKind::HeroDestroyed)
                        .with_target(card)
                        .with_player(owner),
                );
                self.eliminate(owner);
            }
            CardKind::Spell => {}
        }
    }

    /// Knock `player` out. Ends the match when one player is left.
    pub(crate) fn eliminate(&mut self, player: PlayerId) {
        if self.players[player].eliminated {
            return;
        }
        self.players[player].eliminated = true;
        debug!(%player, "eliminated");

        let standing: Vec<PlayerId> = PlayerId::all(self.player_count())
            .filter(|&p| !self.players[p].eliminated)
            .collect();
        if standing.len() <= 1 && self.turn.phase != Phase::GameOver {
            self.winner = standing.first().copied();
            self.turn.phase = Phase::GameOver;
            debug!(winner = ?self.winner, "game over");
            let mut event = GameEvent::new(EventKind::GameOver);
            if let Some(winner) = self.winner {
                event = event.with_player(winner);
            }
            self.emit(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardZone, SlotId};
    use crate::cards::{BlueprintId, BlueprintRegistry, CardBlueprint};
    use crate::core::GameConfig;
    use crate::interceptors::{InterceptContext, InterceptOrder};
    use crate::modifiers::{Mixin, Modifier};
    use std::rc::Rc;

    const GRUNT: BlueprintId = BlueprintId::new(1);
    const HERO: BlueprintId = BlueprintId::new(2);
    const SHIELD: BlueprintId = BlueprintId::new(3);

    fn game() -> Game {
        let mut registry = BlueprintRegistry::new();
        registry.register(CardBlueprint::new(GRUNT, "Grunt", CardKind::Minion).with_stats(2, 3));
        registry.register(CardBlueprint::new(HERO, "Hero", CardKind::Hero).with_stats(0, 5));
        registry.register(
            CardBlueprint::new(SHIELD, "Shield", CardKind::Artifact).with_durability(2),
        );
        Game::new(GameConfig::new(), Rc::new(registry), 3)
    }

    fn summoned(game: &mut Game, player: PlayerId, position: u8) -> EntityId {
        let card = game.create_card(GRUNT, player, Location::Hand);
        game.summon(card, SlotId::new(player, BoardZone::Defense, position));
        card
    }

    #[test]
    fn test_damage_pipelines_and_clamp() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let source = summoned(&mut game, p0, 0);
        let target = summoned(&mut game, PlayerId::new(1), 0);

        game.add_interceptor(
            source,
            Stat::DamageDealt,
            InterceptOrder::Registration,
            |v: i64, _ctx: &InterceptContext<'_>| v + 1,
        );
        game.add_modifier(target, Modifier::new("armor").with_mixin(Mixin::stat_bonus(Stat::DamageReceived, -5)));

        assert_eq!(game.compute_damage(Some(source), target, 2), 0);
        assert_eq!(game.compute_damage(None, source, 2), 2);
    }

    #[test]
    fn test_lethal_damage_destroys() {
        let mut game = game();
        let minion = summoned(&mut game, PlayerId::new(0), 1);

        assert_eq!(game.deal_damage(None, minion, 2), 2);
        assert_eq!(game.health(minion), 1);
        game.deal_damage(None, minion, 1);
        assert_eq!(game.card_ref(minion).location, Location::Discard);
        assert_eq!(game.card_ref(minion).damage_taken(), 0);

        let kinds: Vec<_> = game.events().iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EventKind::MinionBeforeDestroy));
        assert!(kinds.contains(&EventKind::MinionDestroyed));
    }

    #[test]
    fn test_hero_death_ends_match() {
        let mut game = game();
        let hero = game.create_card(HERO, PlayerId::new(1), Location::Board);
        game.players[PlayerId::new(1)].hero = Some(hero);

        game.deal_damage(None, hero, 9);
        assert!(game.player(PlayerId::new(1)).is_eliminated());
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_artifact_wears_out() {
        let mut game = game();
        let p0 = PlayerId::new(0);
        let hero = game.create_card(HERO, p0, Location::Board);
        let shield = game.create_card(SHIELD, p0, Location::Board);

        game.deal_damage(None, hero, 1);
        assert!(game.card_ref(shield).on_board());
        game.deal_damage(None, hero, 0);
        assert!(game.card_ref(shield).on_board());
        game.deal_damage(None, hero, 1);
        assert_eq!(game.card_ref(shield).location, Location::Discard);
    }
}
