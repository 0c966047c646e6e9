//! Event bus dispatch as seen through a running match.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use ccg_rules::board::BoardZone;
use ccg_rules::cards::Location;
use ccg_rules::core::Action;
use ccg_rules::events::{EventKind, GameEvent};
use ccg_rules::game::Game;
use ccg_rules::games::skirmish::ids::*;

use common::*;

#[test]
fn test_handlers_run_in_subscription_order() {
    let mut game = started(registry_with([]), rich_config());
    let log = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second", "third"] {
        let log = log.clone();
        game.subscribe(EventKind::TurnEnd, move |_game: &mut Game, _event: &GameEvent| {
            log.borrow_mut().push(tag);
        });
    }

    game.submit(p0(), Action::EndTurn).unwrap();
    assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn test_handler_removed_mid_dispatch_is_skipped() {
    let mut game = started(registry_with([]), rich_config());
    let hits = Rc::new(RefCell::new(0));

    let victim = Rc::new(RefCell::new(None));
    let target = victim.clone();
    game.subscribe(EventKind::TurnEnd, move |game: &mut Game, _event: &GameEvent| {
        if let Some(id) = target.borrow_mut().take() {
            game.unsubscribe(id);
        }
    });
    let counter = hits.clone();
    let id = game.subscribe(EventKind::TurnEnd, move |_game: &mut Game, _event: &GameEvent| {
        *counter.borrow_mut() += 1;
    });
    *victim.borrow_mut() = Some(id);

    game.submit(p0(), Action::EndTurn).unwrap();
    game.submit(p1(), Action::EndTurn).unwrap();
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn test_nested_events_dispatch_depth_first() {
    let mut game = started(registry_with([]), rich_config());
    let dummy = place(&mut game, DUMMY, slot(p1(), BoardZone::Attack, 0));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    game.observe(move |event: &GameEvent| sink.borrow_mut().push(event.kind));

    game.deal_damage(None, dummy, 3);

    let kinds = seen.borrow();
    let at = |kind: EventKind| kinds.iter().position(|&k| k == kind).unwrap();
    // Lethal is checked once the damage has landed.
    assert!(at(EventKind::DamageBefore) < at(EventKind::DamageAfter));
    assert!(at(EventKind::DamageAfter) < at(EventKind::MinionBeforeDestroy));
    assert!(at(EventKind::CardBeforeChangeZone) < at(EventKind::CardAfterChangeZone));
    assert!(at(EventKind::CardAfterChangeZone) < at(EventKind::MinionDestroyed));
    assert_eq!(game.card_ref(dummy).location, Location::Discard);
}

#[test]
fn test_history_is_sequenced_and_stamped() {
    let mut game = started(registry_with([]), rich_config());
    game.submit(p0(), Action::EndTurn).unwrap();

    let history = game.events();
    assert!(history.iter().zip(history.iter().skip(1)).all(|(a, b)| a.seq + 1 == b.seq));
    let turn_end = history.iter().find(|e| e.kind == EventKind::TurnEnd).unwrap();
    assert_eq!(turn_end.turn, 1);
    assert_eq!(turn_end.player, Some(p0()));
    let last_start = history.iter().rev().find(|e| e.kind == EventKind::TurnStart).unwrap();
    assert_eq!(last_start.turn, 2);
    assert_eq!(last_start.player, Some(p1()));
}

#[test]
fn test_draw_events_carry_locations() {
    let mut game = started(registry_with([]), rich_config());
    let drawn = game.draw(p0()).unwrap();

    let moved = game
        .events()
        .iter()
        .rev()
        .find(|e| e.kind == EventKind::CardAfterChangeZone)
        .cloned()
        .unwrap();
    assert_eq!(moved.target_card(), Some(drawn));
    assert_eq!(moved.from_location(), Some(Location::MainDeck));
    assert_eq!(moved.to_location(), Some(Location::Hand));
    assert_eq!(EventKind::CardAfterChangeZone.name(), "card.after_change_zone");
}
