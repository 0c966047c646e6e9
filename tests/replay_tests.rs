//! Determinism and replay of recorded matches.

mod common;

use std::rc::Rc;

use ccg_rules::cards::BlueprintRegistry;
use ccg_rules::core::{Action, ActionError, ActionRecord, GameConfig, ReplayError};
use ccg_rules::game::{Game, MatchRecord};
use ccg_rules::games::skirmish;
use ccg_rules::interaction::FirstEligible;

use common::*;

fn skirmish_game(registry: Rc<BlueprintRegistry>, seed: u64) -> Game {
    init_tracing();
    let mut game = Game::new(GameConfig::new(), registry, seed);
    game.set_provider(p0(), FirstEligible);
    game.set_provider(p1(), FirstEligible);
    game.setup(vec![skirmish::starter_deck(), skirmish::starter_deck()]);
    game
}

/// Each turn: take up to five non-passing legal actions, then end the turn.
fn drive(game: &mut Game, turns: usize) {
    for _ in 0..turns {
        if game.is_over() {
            return;
        }
        let player = game.active_player();
        for _ in 0..5 {
            let Some(action) = game
                .legal_actions(player)
                .into_iter()
                .find(|a| *a != Action::EndTurn)
            else {
                break;
            };
            game.submit(player, action).unwrap();
            if game.is_over() {
                return;
            }
        }
        game.submit(player, Action::EndTurn).unwrap();
    }
}

#[test]
fn test_same_seed_same_match() {
    let registry = Rc::new(skirmish::registry());
    let mut a = skirmish_game(registry.clone(), 99);
    let mut b = skirmish_game(registry, 99);
    drive(&mut a, 10);
    drive(&mut b, 10);

    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.rng_state(), b.rng_state());
    assert_eq!(a.events().len(), b.events().len());
}

#[test]
fn test_seed_changes_deck_order() {
    let registry = Rc::new(skirmish::registry());
    let a = skirmish_game(registry.clone(), 1);
    let b = skirmish_game(registry, 2);

    let names = |game: &Game| -> Vec<String> {
        game.player(p0())
            .main_deck()
            .iter()
            .map(|&c| game.card_ref(c).name().to_owned())
            .collect()
    };
    assert_ne!(names(&a), names(&b));
}

#[test]
fn test_recorded_match_replays_identically() {
    let registry = Rc::new(skirmish::registry());
    let mut game = skirmish_game(registry.clone(), 2024);
    drive(&mut game, 12);

    let record = game.match_record();
    assert!(!record.actions.is_empty());
    let bytes = record.to_bytes().unwrap();
    let restored = MatchRecord::from_bytes(&bytes).unwrap();
    assert_eq!(restored, record);

    let replayed = restored.replay(registry).unwrap();
    assert_eq!(replayed.snapshot(), game.snapshot());
    assert_eq!(replayed.winner(), game.winner());

    let selections = |g: &Game| -> Vec<_> {
        g.interaction_log()
            .iter()
            .map(|r| (r.id, r.kind, r.outcome, r.selection.clone()))
            .collect()
    };
    assert_eq!(selections(&replayed), selections(&game));
}

#[test]
fn test_tampered_record_is_refused() {
    let registry = Rc::new(skirmish::registry());
    let mut game = skirmish_game(registry.clone(), 5);
    drive(&mut game, 2);

    let mut record = game.match_record();
    record
        .actions
        .insert(0, ActionRecord::new(p1(), Action::EndTurn, 1, 0));

    let err = record.replay(registry).unwrap_err();
    assert!(matches!(
        err,
        ReplayError::Action {
            index: 0,
            source: ActionError::NotYourTurn(_)
        }
    ));
}

#[test]
fn test_garbage_bytes_fail_to_decode() {
    let err = MatchRecord::from_bytes(&[0xff, 0x01]).unwrap_err();
    assert!(matches!(err, ReplayError::Decode(_)));
}
