//! Skirmish card definitions.

use super::ids::*;
use crate::cards::{AbilityBlueprint, BlueprintId, BlueprintRegistry, CardBlueprint, CardKind};
use crate::core::EntityId;
use crate::game::Game;
use crate::interaction::{Choice, InteractionKind, InteractionRequest};
use crate::interceptors::{Flag, InterceptContext, Redirect, Stat};
use crate::modifiers::{Aura, AuraScope, DurationTick, HandlerContext, Mixin, Modifier};

/// Every skirmish blueprint.
#[must_use]
pub fn registry() -> BlueprintRegistry {
    let mut registry = BlueprintRegistry::new();
    for blueprint in [
        warden(),
        footman(),
        shield_bearer(),
        standard_bearer(),
        spark_imp(),
        battle_fury(),
        sharpen(),
        vitality_charm(),
        firebolt(),
        frost_ward(),
        iron_buckler(),
        watchtower(),
        fated_champion(),
    ] {
        registry.register(blueprint);
    }
    registry
}

// === Targeting ===

fn targetable(game: &Game, card: EntityId) -> bool {
    game.card(card).is_some_and(|c| c.on_board()) && game.flag(card, Flag::CanBeTargeted)
}

/// Ask the card's owner to pick one of `candidates`.
///
/// With `optional`, the player may pick nothing and the request times out
/// to nothing; otherwise it times out to the first candidate.
fn choose_target(
    game: &mut Game,
    card: EntityId,
    prompt: &str,
    candidates: Vec<EntityId>,
    optional: bool,
) -> Vec<Choice> {
    let candidates: Vec<Choice> = candidates
        .into_iter()
        .filter(|&c| targetable(game, c))
        .map(Choice::Card)
        .collect();
    let fallback = if optional {
        Vec::new()
    } else {
        candidates.first().copied().into_iter().collect()
    };
    let (min, max) = if optional { (0, 1) } else { (1, 1) };

    let request = InteractionRequest::new(game.owner_of(card), InteractionKind::Target)
        .with_prompt(prompt)
        .with_source(card)
        .with_candidates(candidates)
        .with_count(min, max)
        .eligible_if(|game: &Game, choice: &Choice| choice.as_card().is_some_and(|c| targetable(game, c)))
        .with_fallback(fallback);
    game.request(request)
}

/// Chosen cards that are still legal targets at resolution.
fn live_targets<'a>(game: &'a Game, targets: &'a [Choice]) -> impl Iterator<Item = EntityId> + 'a {
    targets
        .iter()
        .filter_map(|c| c.as_card())
        .filter(move |&c| targetable(game, c))
}

fn friendly_minions(game: &Game, card: EntityId) -> Vec<EntityId> {
    game.minions_of(game.owner_of(card))
}

fn enemy_characters(game: &Game, card: EntityId) -> Vec<EntityId> {
    let owner = game.owner_of(card);
    let mut out = game.enemy_minions(owner);
    out.extend(
        crate::core::PlayerId::all(game.player_count())
            .filter(|&p| p != owner && !game.player(p).is_eliminated())
            .filter_map(|p| game.hero(p)),
    );
    out
}

/// A spell that puts `modifier` on a friendly minion.
fn buff_spell(
    id: BlueprintId,
    name: &str,
    cost: i64,
    modifier: impl Fn(EntityId) -> Modifier + 'static,
) -> CardBlueprint {
    CardBlueprint::new(id, name, CardKind::Spell)
        .with_cost(cost)
        .can_play(|game: &Game, card: EntityId| !friendly_minions(game, card).is_empty())
        .pre_response_targets(|game: &mut Game, card: EntityId| {
            let minions = friendly_minions(game, card);
            choose_target(game, card, "Choose a friendly minion", minions, false)
        })
        .on_play(move |game: &mut Game, card: EntityId, targets: &[Choice]| {
            let chosen: Vec<EntityId> = live_targets(game, targets).collect();
            for target in chosen {
                game.add_modifier(target, modifier(card));
            }
        })
}

// === Cards ===

fn warden() -> CardBlueprint {
    CardBlueprint::new(WARDEN, "Warden", CardKind::Hero).with_stats(0, 20)
}

fn footman() -> CardBlueprint {
    CardBlueprint::new(FOOTMAN, "Footman", CardKind::Minion)
        .with_cost(1)
        .with_stats(1, 2)
}

/// Adjacent allies hand attacks aimed at them to the Shield Bearer.
fn shield_bearer() -> CardBlueprint {
    CardBlueprint::new(SHIELD_BEARER, "Shield Bearer", CardKind::Minion)
        .with_cost(2)
        .with_stats(1, 4)
        .on_init(|game: &mut Game, card: EntityId| {
            let aura = Aura::new(
                |game: &Game, holder: EntityId, candidate: EntityId| {
                    let (Some(holder), Some(other)) = (game.card(holder), game.card(candidate)) else {
                        return false;
                    };
                    other.kind() == CardKind::Minion
                        && match (holder.slot, other.slot) {
                            (Some(h), Some(o)) => game.board().adjacent(h).contains(&o),
                            _ => false,
                        }
                },
                |holder: EntityId| {
                    Modifier::new("intercepted")
                        .with_source(holder)
                        .with_mixin(Mixin::keyword("Guarded"))
                        .with_mixin(Mixin::redirect(
                            Redirect::AttackTarget,
                            move |_target: EntityId, _ctx: &InterceptContext<'_>| holder,
                        ))
                },
            )
            .scoped(AuraScope::Own);
            game.add_modifier(
                card,
                Modifier::new("intercept")
                    .with_mixin(Mixin::keyword("Intercept"))
                    .with_mixin(Mixin::aura(aura)),
            );
        })
}

/// Other friendly minions get +1 attack per Standard Bearer.
fn standard_bearer() -> CardBlueprint {
    CardBlueprint::new(STANDARD_BEARER, "Standard Bearer", CardKind::Minion)
        .with_cost(3)
        .with_stats(2, 3)
        .on_init(|game: &mut Game, card: EntityId| {
            let aura = Aura::new(
                |game: &Game, _holder: EntityId, candidate: EntityId| {
                    game.card(candidate).is_some_and(|c| c.kind() == CardKind::Minion)
                },
                |holder: EntityId| {
                    Modifier::new("banner_buff")
                        .unique()
                        .with_source(holder)
                        .with_mixin(Mixin::keyword("Inspired"))
                        .with_mixin(Mixin::stat_bonus(Stat::Atk, 1))
                },
            )
            .scoped(AuraScope::Own);
            game.add_modifier(card, Modifier::new("banner").with_mixin(Mixin::aura(aura)));
        })
}

/// On entering the board, may deal 1 damage to an enemy.
fn spark_imp() -> CardBlueprint {
    CardBlueprint::new(SPARK_IMP, "Spark Imp", CardKind::Minion)
        .with_cost(2)
        .with_stats(2, 1)
        .on_init(|game: &mut Game, card: EntityId| {
            game.add_modifier(
                card,
                Modifier::new("spark").with_mixin(Mixin::on_enter(|game: &mut Game, ctx: &HandlerContext| {
                    let Some(imp) = ctx.card() else {
                        return;
                    };
                    let enemies = enemy_characters(game, imp);
                    let chosen = choose_target(game, imp, "Spark: deal 1 damage", enemies, true);
                    let targets: Vec<EntityId> = live_targets(game, &chosen).collect();
                    for target in targets {
                        game.deal_damage(Some(imp), target, 1);
                    }
                })),
            );
        })
}

fn battle_fury() -> CardBlueprint {
    buff_spell(BATTLE_FURY, "Battle Fury", 1, |source: EntityId| {
        Modifier::new("fury")
            .unique()
            .with_source(source)
            .with_mixin(Mixin::keyword("Fury"))
            .with_mixin(Mixin::stat_bonus(Stat::Atk, 2))
    })
}

fn sharpen() -> CardBlueprint {
    buff_spell(SHARPEN, "Sharpen", 1, |source: EntityId| {
        Modifier::new("sharpened")
            .with_source(source)
            .with_mixin(Mixin::stat_bonus(Stat::Atk, 1))
    })
}

fn vitality_charm() -> CardBlueprint {
    buff_spell(VITALITY_CHARM, "Vitality Charm", 1, |source: EntityId| {
        Modifier::new("vitality")
            .with_source(source)
            .with_mixin(Mixin::stat_bonus(Stat::MaxHp, 2))
    })
}

fn firebolt() -> CardBlueprint {
    CardBlueprint::new(FIREBOLT, "Firebolt", CardKind::Spell)
        .with_cost(2)
        .can_play(|game: &Game, card: EntityId| !enemy_characters(game, card).is_empty())
        .pre_response_targets(|game: &mut Game, card: EntityId| {
            let enemies = enemy_characters(game, card);
            choose_target(game, card, "Firebolt: deal 2 damage", enemies, false)
        })
        .on_play(|game: &mut Game, card: EntityId, targets: &[Choice]| {
            let chosen: Vec<EntityId> = live_targets(game, targets).collect();
            for target in chosen {
                game.deal_damage(Some(card), target, 2);
            }
        })
}

/// Reaction: freeze an enemy minion. It can't attack or block until its
/// controller's turn next ends.
fn frost_ward() -> CardBlueprint {
    CardBlueprint::new(FROST_WARD, "Frost Ward", CardKind::Spell)
        .with_cost(1)
        .reaction()
        .can_play(|game: &Game, card: EntityId| !game.enemy_minions(game.owner_of(card)).is_empty())
        .pre_response_targets(|game: &mut Game, card: EntityId| {
            let enemies = game.enemy_minions(game.owner_of(card));
            choose_target(game, card, "Frost Ward: freeze a minion", enemies, false)
        })
        .on_play(|game: &mut Game, card: EntityId, targets: &[Choice]| {
            let chosen: Vec<EntityId> = live_targets(game, targets).collect();
            for target in chosen {
                game.add_modifier(target, frozen(card));
            }
        })
}

pub(crate) fn frozen(source: EntityId) -> Modifier {
    Modifier::new("frozen")
        .unique()
        .with_source(source)
        .with_mixin(Mixin::keyword("Frozen"))
        .with_mixin(Mixin::set_flag(Flag::CanAttack, false))
        .with_mixin(Mixin::set_flag(Flag::CanBlock, false))
        .with_mixin(Mixin::duration_on(1, DurationTick::ControllerTurnEnd))
}

/// The owner's hero takes 1 less damage from each hit. Wears out after
/// three hits on the hero.
fn iron_buckler() -> CardBlueprint {
    CardBlueprint::new(IRON_BUCKLER, "Iron Buckler", CardKind::Artifact)
        .with_cost(2)
        .with_durability(3)
        .on_init(|game: &mut Game, card: EntityId| {
            let aura = Aura::new(
                |game: &Game, holder: EntityId, candidate: EntityId| {
                    game.hero(game.owner_of(holder)) == Some(candidate)
                },
                |holder: EntityId| {
                    Modifier::new("buckled")
                        .unique()
                        .with_source(holder)
                        .with_mixin(Mixin::stat_bonus(Stat::DamageReceived, -1))
                },
            )
            .scoped(AuraScope::Own);
            game.add_modifier(card, Modifier::new("buckler").with_mixin(Mixin::aura(aura)));
        })
}

fn watchtower() -> CardBlueprint {
    CardBlueprint::new(WATCHTOWER, "Watchtower", CardKind::Sigil)
        .with_cost(2)
        .with_ability(
            AbilityBlueprint::new("Survey", |game: &mut Game, card: EntityId, _targets: &[Choice]| {
                let owner = game.owner_of(card);
                game.draw(owner);
            })
            .with_cost(1),
        )
}

fn fated_champion() -> CardBlueprint {
    CardBlueprint::new(FATED_CHAMPION, "Fated Champion", CardKind::Minion)
        .with_cost(3)
        .with_stats(3, 3)
}
