//! Interceptor pipeline laws and game-level derived attributes.

mod common;

use std::rc::Rc;

use ccg_rules::board::BoardZone;
use ccg_rules::cards::BlueprintRegistry;
use ccg_rules::core::{EntityRef, GameConfig, PlayerId};
use ccg_rules::game::Game;
use ccg_rules::interceptors::{Flag, InterceptContext, InterceptOrder, InterceptorRegistry, Stat};
use proptest::prelude::*;

use common::*;

fn empty_game() -> Game {
    Game::new(GameConfig::new(), Rc::new(BlueprintRegistry::new()), 1)
}

// =============================================================================
// Pipeline Laws
// =============================================================================

proptest! {
    #[test]
    fn test_empty_pipeline_is_identity(base in -1000i64..1000) {
        let game = empty_game();
        let registry = InterceptorRegistry::new();
        let entity = EntityRef::Player(PlayerId::new(0));
        prop_assert_eq!(registry.get_value(Stat::Atk, base, &game, entity), base);
    }

    #[test]
    fn test_adding_then_removing_restores_value(
        base in -100i64..100,
        bonuses in prop::collection::vec(-10i64..10, 0..8),
        extra in -10i64..10,
    ) {
        let game = empty_game();
        let entity = EntityRef::Player(PlayerId::new(0));
        let mut registry = InterceptorRegistry::new();
        for bonus in bonuses {
            registry.add_fn(Stat::Atk, move |v, _| v + bonus);
        }
        let before = registry.get_value(Stat::Atk, base, &game, entity);

        let handle = registry.add_fn(Stat::Atk, move |v, _| v * 3 + extra);
        prop_assert!(registry.remove(handle));
        prop_assert!(!registry.remove(handle));
        prop_assert_eq!(registry.get_value(Stat::Atk, base, &game, entity), before);
    }

    #[test]
    fn test_folds_in_registration_order(base in -50i64..50, ops in prop::collection::vec((0u8..2, -5i64..5), 1..6)) {
        let game = empty_game();
        let entity = EntityRef::Player(PlayerId::new(0));
        let mut registry = InterceptorRegistry::new();
        let mut expected = base;
        for &(op, n) in &ops {
            if op == 0 {
                registry.add_fn(Stat::Atk, move |v, _| v + n);
                expected += n;
            } else {
                registry.add_fn(Stat::Atk, move |v, _| v * n);
                expected *= n;
            }
        }
        prop_assert_eq!(registry.get_value(Stat::Atk, base, &game, entity), expected);
    }
}

#[test]
fn test_last_runs_after_later_registrations() {
    let game = empty_game();
    let entity = EntityRef::Player(PlayerId::new(0));
    let mut registry = InterceptorRegistry::new();

    registry.add(Stat::Atk, InterceptOrder::Last, None, Rc::new(|v: i64, _: &InterceptContext<'_>| v.min(5)));
    registry.add_fn(Stat::Atk, |v, _| v + 10);
    assert_eq!(registry.get_value(Stat::Atk, 1, &game, entity), 5);
    assert_eq!(registry.count(Stat::Atk), 2);
}

// =============================================================================
// Game-Level Attributes
// =============================================================================

#[test]
fn test_slot_flag_blocks_summoning() {
    let mut game = started(registry_with([]), rich_config());
    let target = slot(p0(), BoardZone::Attack, 0);
    assert!(game.flag(target, Flag::CanSummonHere));
    assert_eq!(game.summon_slots(p0()).len(), 10);

    let handle = game.add_interceptor(target, Flag::CanSummonHere, InterceptOrder::Last, |_, _| false);
    assert!(!game.flag(target, Flag::CanSummonHere));
    assert_eq!(game.summon_slots(p0()).len(), 9);

    assert!(game.remove_interceptor(target, handle));
    assert!(game.flag(target, Flag::CanSummonHere));
}

#[test]
fn test_player_max_mana_is_derived() {
    let mut game = started(registry_with([]), rich_config());
    assert_eq!(game.stat(p0(), Stat::MaxMana), 10);

    game.add_interceptor(p0(), Stat::MaxMana, InterceptOrder::Registration, |v, _| v + 2);
    assert_eq!(game.stat(p0(), Stat::MaxMana), 12);
    assert_eq!(game.stat(p1(), Stat::MaxMana), 10);
}

#[test]
fn test_reducing_max_hp_below_damage_destroys_at_once() {
    let mut game = started(registry_with([]), rich_config());
    let dummy = place(&mut game, DUMMY, slot(p0(), BoardZone::Attack, 0));
    let handle = game.add_interceptor(dummy, Stat::MaxHp, InterceptOrder::Registration, |v, _| v + 2);
    game.deal_damage(None, dummy, 2);
    assert!(game.card_ref(dummy).on_board());

    game.remove_interceptor(dummy, handle);
    assert!(!game.card_ref(dummy).on_board());
    assert!(game.player(p0()).discard().contains(&dummy));
}
