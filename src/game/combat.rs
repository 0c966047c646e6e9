//! Driving an attack through its combat steps.
//!
//! [`Game::begin_attack`] declares the attack and its (possibly redirected)
//! target, then puts the attack on the chain. When that link resolves,
//! [`Game::resolve_attack`] runs the blocker step, a nested reaction
//! window, simultaneous damage, and cleanup.

use tracing::debug;

use super::Game;
use crate::cards::CardKind;
use crate::chain::LinkEffect;
use crate::combat::{CombatState, CombatStep};
use crate::core::{EntityId, Phase, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::interaction::{Choice, InteractionKind, InteractionRequest};
use crate::interceptors::{Flag, Redirect, Stat};

impl Game {
    /// Whether `target` may be attacked by `player`'s minions.
    #[must_use]
    pub fn is_attackable_by(&self, player: PlayerId, target: EntityId) -> bool {
        self.card(target).is_some_and(|c| {
            c.owner != player
                && c.on_board()
                && matches!(c.kind(), CardKind::Minion | CardKind::Hero)
                && !self.players[c.owner].eliminated
        }) && self.flag(target, Flag::CanBeAttacked)
    }

    fn advance_combat(&mut self, step: CombatStep) {
        if let Some(combat) = self.combat.as_mut() {
            combat.advance(step);
            debug!(?step, attacker = %combat.attacker, "combat step");
        }
    }

    /// Declare an attack and resolve it.
    pub(crate) fn begin_attack(&mut self, player: PlayerId, attacker: EntityId, target: EntityId) {
        self.combat = Some(CombatState::new(attacker, player, target));
        self.turn.phase = Phase::Combat;
        debug!(%player, %attacker, %target, "attack declared");
        self.emit(
            GameEvent::new(EventKind::CombatAttackDeclared)
                .with_source(attacker)
                .with_target(target)
                .with_player(player),
        );

        self.advance_combat(CombatStep::DeclareTarget);
        let redirected = self.redirect(target, Redirect::AttackTarget, target);
        let target = if redirected != target && self.is_attackable_by(player, redirected) {
            debug!(from = %target, to = %redirected, "attack redirected");
            redirected
        } else {
            target
        };
        if let Some(combat) = self.combat.as_mut() {
            combat.target = target;
        }
        self.emit(
            GameEvent::new(EventKind::CombatTargetDeclared)
                .with_source(attacker)
                .with_target(target)
                .with_player(player),
        );

        self.advance_combat(CombatStep::BuildingChain);
        self.push_link(
            player,
            Some(attacker),
            LinkEffect::Attack { attacker, target },
            vec![Choice::Card(target)],
        );
        self.settle_above(0);

        if self.combat.is_some() {
            self.finish_combat();
        }
    }

    /// Resolve an attack link: blockers, reactions, damage, cleanup.
    pub(crate) fn resolve_attack(&mut self, attacker: EntityId, target: EntityId) {
        if self.combat.is_none() {
            debug!(%attacker, "attack resolved outside combat; ignored");
            return;
        }

        self.advance_combat(CombatStep::DeclareBlocker);
        if self.card_ref(attacker).on_board() && self.flag(attacker, Flag::CanBeBlocked) {
            if let Some(blocker) = self.request_blocker(attacker, target) {
                let defender = self.owner_of(blocker);
                if let Some(combat) = self.combat.as_mut() {
                    combat.blocker = Some(blocker);
                    combat.target = blocker;
                }
                debug!(%blocker, %attacker, "blocked");
                self.emit(
                    GameEvent::new(EventKind::CombatBlockerDeclared)
                        .with_source(blocker)
                        .with_target(attacker)
                        .with_player(defender),
                );
            }
        }

        self.advance_combat(CombatStep::Reactions);
        let floor = self.chain.len();
        self.reaction_window();
        self.settle_above(floor);

        if !self.is_over() {
            self.advance_combat(CombatStep::DamageResolution);
            self.combat_damage();
        }
        self.finish_combat();
    }

    fn request_blocker(&mut self, attacker: EntityId, target: EntityId) -> Option<EntityId> {
        let defender = self.owner_of(target);
        let blockers: Vec<EntityId> = self
            .defenders_of(defender)
            .into_iter()
            .filter(|&c| c != target && self.flag(c, Flag::CanBlock))
            .collect();
        if blockers.is_empty() {
            return None;
        }

        let request = InteractionRequest::new(defender, InteractionKind::Block)
            .with_prompt("Block the attack?")
            .with_source(attacker)
            .with_candidates(blockers.into_iter().map(Choice::Card))
            .with_count(0, 1)
            .eligible_if(|game: &Game, choice: &Choice| {
                choice.as_card().is_some_and(|c| {
                    game.card_ref(c).on_board() && game.flag(c, Flag::CanBlock)
                })
            });
        self.request(request).first().and_then(|c| c.as_card())
    }

    /// Both sides hit at once; lethal is checked after both land.
    fn combat_damage(&mut self) {
        let Some((attacker, target)) = self.combat.as_ref().map(|c| (c.attacker, c.target)) else {
            return;
        };
        if !self.card_ref(attacker).on_board() || !self.card_ref(target).on_board() {
            debug!(%attacker, %target, "combatant left the board; no damage");
            return;
        }

        self.emit(
            GameEvent::new(EventKind::CombatBeforeDamage)
                .with_source(attacker)
                .with_target(target),
        );
        if !self.card_ref(attacker).on_board() || !self.card_ref(target).on_board() {
            return;
        }

        let attack = self.stat(attacker, Stat::Atk).max(0);
        let retaliates = self.card_ref(target).kind() == CardKind::Minion
            && self.flag(target, Flag::CanRetaliate);
        let to_target = self.compute_damage(Some(attacker), target, attack);
        let to_attacker = if retaliates {
            let counter = self.stat(target, Stat::Atk).max(0);
            self.compute_damage(Some(target), attacker, counter)
        } else {
            0
        };

        self.apply_damage(Some(attacker), target, to_target);
        if retaliates {
            self.apply_damage(Some(target), attacker, to_attacker);
        }
        if let Some(combat) = self.combat.as_mut() {
            combat.damage = Some((to_target, to_attacker));
        }

        self.check_lethal(target);
        self.check_lethal(attacker);
    }

    /// Cleanup: count the attack, maybe exhaust, leave combat.
    fn finish_combat(&mut self) {
        let Some(mut combat) = self.combat.take() else {
            return;
        };
        if combat.step() != CombatStep::Cleanup {
            combat.advance(CombatStep::Cleanup);
        }

        let attacker = combat.attacker;
        if self.card_ref(attacker).on_board() {
            let per_turn = self.stat(attacker, Stat::AttacksPerTurn);
            if let Some(readiness) = self.card_mut(attacker).readiness_mut() {
                readiness.attacks_this_turn += 1;
                if i64::from(readiness.attacks_this_turn) >= per_turn {
                    readiness.exhausted = true;
                }
            }
        }

        let (dealt, taken) = combat.damage.unwrap_or((0, 0));
        debug!(%attacker, target = %combat.target, dealt, taken, "combat over");
        self.emit(
            GameEvent::new(EventKind::CombatEnd)
                .with_source(attacker)
                .with_target(combat.target)
                .with_player(combat.attacking_player)
                .with_value(dealt)
                .with_value(taken),
        );
        if !self.is_over() {
            self.turn.phase = Phase::Main;
        }
    }
}
