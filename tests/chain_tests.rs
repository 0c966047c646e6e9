//! Effect chain: LIFO resolution, reaction windows, negation.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use ccg_rules::board::BoardZone;
use ccg_rules::cards::{AbilityBlueprint, BlueprintId, CardBlueprint, CardKind, Location};
use ccg_rules::chain::ChainState;
use ccg_rules::core::{Action, ActionError, EntityId};
use ccg_rules::events::EventKind;
use ccg_rules::game::Game;
use ccg_rules::games::skirmish::ids::*;
use ccg_rules::interaction::{Choice, InteractionKind, ScriptedProvider};
use ccg_rules::interceptors::Flag;
use proptest::prelude::*;

use common::*;

const DISPEL: BlueprintId = BlueprintId::new(950);
const ECHO: BlueprintId = BlueprintId::new(951);
const POWDER_KEG: BlueprintId = BlueprintId::new(952);

type Log = Rc<RefCell<Vec<EntityId>>>;

/// Reaction with no effect beyond noting that it resolved.
fn echo(log: Log) -> CardBlueprint {
    CardBlueprint::new(ECHO, "Echo", CardKind::Spell)
        .with_cost(1)
        .reaction()
        .on_play(move |_game: &mut Game, card: EntityId, _targets: &[Choice]| {
            log.borrow_mut().push(card);
        })
}

/// Sigil whose ability blows itself up, then hits every enemy minion it saw
/// when the ability was used for 2.
fn powder_keg() -> CardBlueprint {
    CardBlueprint::new(POWDER_KEG, "Powder Keg", CardKind::Sigil)
        .with_cost(1)
        .with_ability(
            AbilityBlueprint::new("Detonate", |game: &mut Game, card: EntityId, targets: &[Choice]| {
                game.destroy(card);
                for target in targets.iter().filter_map(|t| t.as_card()) {
                    game.deal_damage(Some(card), target, 2);
                }
            })
            .targets(|game: &mut Game, card: EntityId| {
                let owner = game.owner_of(card);
                game.enemy_minions(owner).into_iter().map(Choice::Card).collect()
            }),
        )
}

/// Reaction: send every enemy card on the chain to the discard pile.
fn dispel() -> CardBlueprint {
    CardBlueprint::new(DISPEL, "Dispel", CardKind::Spell)
        .with_cost(1)
        .reaction()
        .on_play(|game: &mut Game, card: EntityId, _targets: &[Choice]| {
            let owner = game.owner_of(card);
            let victims: Vec<EntityId> = game
                .cards()
                .filter(|c| c.location == Location::Chain && c.owner != owner)
                .map(|c| c.id)
                .collect();
            for victim in victims {
                game.move_card(victim, Location::Discard, None);
            }
        })
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn test_triggered_links_resolve_depth_first() {
    let mut game = started(registry_with([]), rich_config());
    let log = Rc::new(RefCell::new(Vec::new()));

    let outer_log = log.clone();
    game.push_triggered(p0(), None, "outer", Vec::new(), move |game: &mut Game, _t: &[Choice]| {
        outer_log.borrow_mut().push("outer");
        for name in ["a", "b"] {
            let inner_log = outer_log.clone();
            game.push_triggered(p0(), None, name, Vec::new(), move |_g: &mut Game, _t: &[Choice]| {
                inner_log.borrow_mut().push(name);
            });
        }
    });

    assert_eq!(*log.borrow(), vec!["outer", "b", "a"]);
    assert_eq!(game.chain().state(), ChainState::Idle);
    assert_eq!(game.chain().resolved_count(), 3);
}

#[test]
fn test_chain_resolved_fires_once_per_chain() {
    let mut game = started(registry_with([]), rich_config());
    let dummy = place(&mut game, DUMMY, slot(p1(), BoardZone::Attack, 0));
    let bolt = in_hand(&mut game, FIREBOLT, p0());

    game.submit(p0(), Action::PlayCard { card: bolt, slot: None }).unwrap();

    let resolved = game
        .events()
        .iter()
        .filter(|e| e.kind == EventKind::ChainResolved)
        .count();
    assert_eq!(resolved, 1);
    assert_eq!(game.card_ref(dummy).location, Location::Discard);
    assert_eq!(game.card_ref(bolt).location, Location::Discard);
}

#[test]
fn test_link_survives_its_source_being_destroyed() {
    let mut game = started(registry_with([powder_keg()]), rich_config());
    let keg = place(&mut game, POWDER_KEG, slot(p0(), BoardZone::Defense, 0));
    let bearer = place(&mut game, STANDARD_BEARER, slot(p1(), BoardZone::Attack, 0));
    let dummy = place(&mut game, DUMMY, slot(p1(), BoardZone::Attack, 1));
    assert!(game.flag(keg, Flag::CanUseAbilities));

    game.submit(p0(), Action::UseAbility { card: keg, ability: 0 }).unwrap();

    assert_eq!(game.card_ref(keg).location, Location::Discard);
    assert_eq!(game.card_ref(bearer).damage_taken(), 2);
    assert_eq!(game.card_ref(dummy).location, Location::Discard);

    let finished = game
        .events()
        .iter()
        .filter(|e| e.kind == EventKind::ChainAfterEffectResolved)
        .filter(|e| e.source == Some(keg.into()))
        .count();
    assert_eq!(finished, 1);
    assert_eq!(game.chain().state(), ChainState::Idle);
    assert!(game.chain().is_empty());
}

// =============================================================================
// Reactions
// =============================================================================

#[test]
fn test_reaction_negates_spell_on_chain() {
    let mut game = started(registry_with([dispel()]), rich_config());
    // p1 needs a turn behind them to have mana.
    pass_round(&mut game);
    let dummy = place(&mut game, DUMMY, slot(p1(), BoardZone::Attack, 0));
    let bolt = in_hand(&mut game, FIREBOLT, p0());
    let answer = in_hand(&mut game, DISPEL, p1());
    game.set_provider(
        p1(),
        ScriptedProvider::new().on(InteractionKind::Reaction, vec![Choice::Card(answer)]),
    );

    game.submit(p0(), Action::PlayCard { card: bolt, slot: None }).unwrap();

    assert!(game.card_ref(dummy).on_board());
    assert_eq!(game.card_ref(dummy).damage_taken(), 0);
    assert_eq!(game.card_ref(bolt).location, Location::Discard);
    assert_eq!(game.card_ref(answer).location, Location::Discard);
    assert_eq!(game.player(p1()).mana(), 9);
    assert_eq!(game.chain().resolved_count(), 2);
}

#[test]
fn test_reaction_declined_when_provider_passes() {
    let mut game = started(registry_with([dispel()]), rich_config());
    // p1 needs a turn behind them to have mana.
    pass_round(&mut game);
    let dummy = place(&mut game, DUMMY, slot(p1(), BoardZone::Attack, 0));
    let bolt = in_hand(&mut game, FIREBOLT, p0());
    let answer = in_hand(&mut game, DISPEL, p1());
    game.set_provider(p1(), ScriptedProvider::new().on(InteractionKind::Reaction, Vec::new()));

    game.submit(p0(), Action::PlayCard { card: bolt, slot: None }).unwrap();

    assert_eq!(game.card_ref(dummy).location, Location::Discard);
    assert_eq!(game.card_ref(answer).location, Location::Hand);
    assert_eq!(game.player(p1()).mana(), 10);
}

#[test]
fn test_reaction_cards_cannot_be_played_on_idle_chain() {
    let mut game = started(registry_with([dispel()]), rich_config());
    let answer = in_hand(&mut game, DISPEL, p0());

    assert_eq!(
        game.submit(p0(), Action::PlayCard { card: answer, slot: None }),
        Err(ActionError::NotPlayable(answer))
    );
    assert!(game.playable_reactions(p0()).is_empty());
}

#[test]
fn test_minion_displaced_before_landing_is_discarded() {
    let mut game = started(registry_with([]), rich_config());
    let target = slot(p0(), BoardZone::Attack, 0);
    let footman = in_hand(&mut game, FOOTMAN, p0());

    // Something lands in the chosen slot while the footman is on the chain.
    game.subscribe(EventKind::ChainLinkAdded, move |game: &mut Game, _event| {
        if game.board().slot(target).is_some_and(|s| !s.is_occupied()) {
            let squatter = game.create_card(DUMMY, p0(), Location::Hand);
            game.summon(squatter, target);
        }
    });
    game.submit(p0(), Action::PlayCard { card: footman, slot: Some(target) }).unwrap();

    assert_eq!(game.card_ref(footman).location, Location::Discard);
}

proptest! {
    /// `reactions` answers alternate starting with the non-active player; each
    /// side also holds one reaction it never plays, so both are always asked.
    #[test]
    fn test_reactions_close_the_chain(reactions in 0usize..5) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut game = started(registry_with([echo(log.clone())]), rich_config());
        pass_round(&mut game);

        let p1_plays: Vec<EntityId> = (0..(reactions + 1) / 2).map(|_| in_hand(&mut game, ECHO, p1())).collect();
        let p0_plays: Vec<EntityId> = (0..reactions / 2).map(|_| in_hand(&mut game, ECHO, p0())).collect();
        in_hand(&mut game, ECHO, p0());
        in_hand(&mut game, ECHO, p1());

        // p1 answers whenever asked; p0 passes first, then answers each of p1's plays.
        let mut p1_script = ScriptedProvider::new();
        for &card in &p1_plays {
            p1_script = p1_script.on(InteractionKind::Reaction, vec![Choice::Card(card)]);
        }
        let mut p0_script = ScriptedProvider::new();
        for &card in &p0_plays {
            p0_script = p0_script
                .on(InteractionKind::Reaction, Vec::new())
                .on(InteractionKind::Reaction, vec![Choice::Card(card)]);
        }
        game.set_provider(p0(), p0_script);
        game.set_provider(p1(), p1_script);

        let played: Vec<EntityId> = (0..reactions)
            .map(|i| if i % 2 == 0 { p1_plays[i / 2] } else { p0_plays[i / 2] })
            .collect();
        let root_log = log.clone();
        let root_saw = Rc::new(RefCell::new(None));
        let saw = root_saw.clone();
        let mark = game.events().len();
        game.push_triggered(p0(), None, "root", Vec::new(), move |_game: &mut Game, _t: &[Choice]| {
            *saw.borrow_mut() = Some(root_log.borrow().len());
        });

        let expected: Vec<EntityId> = played.iter().rev().copied().collect();
        prop_assert_eq!(log.borrow().clone(), expected);
        prop_assert_eq!(*root_saw.borrow(), Some(reactions));
        prop_assert_eq!(game.chain().resolved_count(), reactions as u64 + 1);
        prop_assert_eq!(game.chain().state(), ChainState::Idle);
        prop_assert!(game.chain().is_empty());

        let first_offer = game
            .events()
            .iter()
            .skip(mark)
            .find(|e| e.kind == EventKind::InteractionOpened)
            .and_then(|e| e.player);
        prop_assert_eq!(first_offer, Some(p0()));
        for card in played {
            prop_assert_eq!(game.card_ref(card).location, Location::Discard);
        }
    }
}
