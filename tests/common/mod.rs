//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use ccg_rules::board::{BoardZone, SlotId};
use ccg_rules::cards::{BlueprintId, BlueprintRegistry, CardBlueprint, CardKind, Location};
use ccg_rules::core::{DeckList, EntityId, GameConfig, PlayerId};
use ccg_rules::game::Game;
use ccg_rules::games::skirmish;

pub const HERO: BlueprintId = BlueprintId::new(900);
pub const DUMMY: BlueprintId = BlueprintId::new(901);

/// Install a test subscriber once; `RUST_LOG=ccg_rules=debug` shows the engine log.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn p0() -> PlayerId {
    PlayerId::new(0)
}

pub fn p1() -> PlayerId {
    PlayerId::new(1)
}

pub fn slot(player: PlayerId, zone: BoardZone, position: u8) -> SlotId {
    SlotId::new(player, zone, position)
}

/// Plenty of mana so tests don't fight the curve.
pub fn rich_config() -> GameConfig {
    GameConfig::new().with_mana(10, 0, 10).with_starting_hand_size(0)
}

/// The skirmish pool plus a vanilla hero and a 1/1 filler.
pub fn registry_with(extra: impl IntoIterator<Item = CardBlueprint>) -> Rc<BlueprintRegistry> {
    let mut registry = skirmish::registry();
    registry.register(CardBlueprint::new(HERO, "Test Hero", CardKind::Hero).with_stats(0, 30));
    registry.register(
        CardBlueprint::new(DUMMY, "Dummy", CardKind::Minion)
            .with_cost(1)
            .with_stats(1, 1),
    );
    for blueprint in extra {
        registry.register(blueprint);
    }
    Rc::new(registry)
}

/// A started two-player match whose decks are all filler.
pub fn started(registry: Rc<BlueprintRegistry>, config: GameConfig) -> Game {
    init_tracing();
    let mut game = Game::new(config, registry, 42);
    let deck = DeckList::new(HERO).with_main(vec![DUMMY; 10]);
    game.setup(vec![deck.clone(), deck]);
    game
}

/// Put a fresh card straight onto the board, bypassing the chain.
pub fn place(game: &mut Game, blueprint: BlueprintId, at: SlotId) -> EntityId {
    let card = game.create_card(blueprint, at.player, Location::Hand);
    game.summon(card, at);
    card
}

/// A fresh card in `player`'s hand.
pub fn in_hand(game: &mut Game, blueprint: BlueprintId, player: PlayerId) -> EntityId {
    game.create_card(blueprint, player, Location::Hand)
}

/// Clear summoning sickness by passing a full round.
pub fn pass_round(game: &mut Game) {
    let first = game.active_player();
    let count = game.player_count();
    for player in first.order_from(count) {
        game.submit(player, ccg_rules::core::Action::EndTurn)
            .expect("end turn");
    }
}
