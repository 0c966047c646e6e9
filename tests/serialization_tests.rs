//! Snapshots as a client sees them.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use ccg_rules::board::BoardZone;
use ccg_rules::cards::{CardKind, Location};
use ccg_rules::core::Action;
use ccg_rules::events::EventKind;
use ccg_rules::game::{Game, GameSnapshot};
use ccg_rules::games::skirmish::ids::*;

use common::*;

#[test]
fn test_snapshot_json_round_trip() {
    let mut game = started(registry_with([]), rich_config());
    let bearer = place(&mut game, STANDARD_BEARER, slot(p0(), BoardZone::Defense, 0));
    let footman = place(&mut game, FOOTMAN, slot(p0(), BoardZone::Attack, 0));
    in_hand(&mut game, SHARPEN, p0());

    let snapshot = game.snapshot();
    let json = snapshot.to_json().unwrap();
    assert_eq!(GameSnapshot::from_json(&json).unwrap(), snapshot);

    let card = snapshot.cards.iter().find(|c| c.id == footman).unwrap();
    assert_eq!(card.atk, 2);
    assert_eq!(card.keywords, vec!["Inspired".to_string()]);
    assert_eq!(card.modifiers[0].source, Some(bearer));
    assert_eq!(card.location, Location::Board);
    assert!(!card.can_attack);
}

#[test]
fn test_snapshot_hides_deck_order_and_lists_actions() {
    let game = started(registry_with([]), rich_config());
    let snapshot = game.snapshot();

    assert_eq!(snapshot.players.len(), 2);
    assert_eq!(snapshot.players[0].main_deck, 10);
    assert_eq!(snapshot.players[0].mana, 10);
    assert_eq!(snapshot.active_player, p0());
    assert_eq!(snapshot.legal_actions, game.legal_actions(p0()));
    assert_eq!(snapshot.legal_actions, vec![Action::EndTurn]);

    let heroes: Vec<_> = snapshot.cards.iter().filter(|c| c.kind == CardKind::Hero).collect();
    assert_eq!(heroes.len(), 2);
    assert_eq!(heroes[0].max_hp, 30);
}

#[test]
fn test_snapshot_mid_chain() {
    let mut game = started(registry_with([]), rich_config());
    place(&mut game, FOOTMAN, slot(p0(), BoardZone::Attack, 0));
    let spell = in_hand(&mut game, BATTLE_FURY, p0());

    let seen: Rc<RefCell<Option<GameSnapshot>>> = Rc::new(RefCell::new(None));
    let sink = seen.clone();
    game.subscribe(EventKind::ChainLinkAdded, move |game: &mut Game, _event| {
        *sink.borrow_mut() = Some(game.snapshot());
    });
    game.submit(p0(), Action::PlayCard { card: spell, slot: None }).unwrap();

    let snapshot = seen.borrow().clone().unwrap();
    assert_eq!(snapshot.chain.len(), 1);
    assert!(snapshot.legal_actions.is_empty());
    assert!(snapshot
        .cards
        .iter()
        .any(|c| c.id == spell && c.location == Location::Chain));
    assert!(game.snapshot().chain.is_empty());
}

#[test]
fn test_slot_snapshot_tracks_occupant() {
    let mut game = started(registry_with([]), rich_config());
    let at = slot(p1(), BoardZone::Defense, 3);
    let footman = place(&mut game, FOOTMAN, at);

    let snapshot = game.serialize_slot(at);
    assert_eq!(snapshot.occupant, Some(footman));
    assert!(!snapshot.can_summon_here);

    game.destroy(footman);
    let snapshot = game.serialize_slot(at);
    assert_eq!(snapshot.occupant, None);
    assert!(snapshot.can_summon_here);
}
