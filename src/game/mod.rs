//! The match aggregate.
//!
//! `Game` owns everything one match needs: players, board, cards, the event
//! bus, the effect chain, the combat state, the RNG and the choice
//! providers. There is no ambient state; every rule reaches the match
//! through `&Game` (reads, interceptors) or `&mut Game` (effects).
//!
//! ## Layout
//!
//! The `impl Game` is split by concern:
//!
//! - `modifiers`: applying and detaching modifiers and their mixins, auras
//! - `zones`: the single card-movement mutator, draws, summons
//! - `damage`: damage, lethal checks, destruction
//! - `resolution`: chain driving and reaction windows
//! - `interact`: the interaction pump
//! - `combat`: the attack state machine driver
//! - `actions`: validation, legal actions, submission
//! - `turn`: setup and turn flow
//! - `snapshot` / `replay`: serialization
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use ccg_rules::core::{Action, GameConfig, PlayerId};
//! use ccg_rules::game::Game;
//! use ccg_rules::games::skirmish;
//!
//! let registry = Rc::new(skirmish::registry());
//! let mut game = Game::new(GameConfig::new(), registry, 42);
//! game.setup(vec![skirmish::starter_deck(), skirmish::starter_deck()]);
//!
//! let p0 = PlayerId::new(0);
//! assert_eq!(game.active_player(), p0);
//! assert!(game.legal_actions(p0).contains(&Action::EndTurn));
//!
//! game.submit(p0, Action::EndTurn).unwrap();
//! assert_eq!(game.active_player(), PlayerId::new(1));
//! ```

pub mod actions;
pub mod combat;
pub mod damage;
pub mod interact;
pub mod modifiers;
pub mod player;
pub mod replay;
pub mod resolution;
pub mod snapshot;
pub mod turn;
pub mod zones;

pub use player::PlayerState;
pub use replay::MatchRecord;
pub use snapshot::{CardSnapshot, GameSnapshot, ModifierSnapshot, PlayerSnapshot, SlotSnapshot};

use im::Vector;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::board::{Board, BoardZone};
use crate::cards::{AbilityBlueprint, BlueprintRegistry, Card, CardKind};
use crate::chain::EffectChain;
use crate::combat::CombatState;
use crate::core::{
    ActionRecord, DeckList, EntityId, EntityRef, GameConfig, GameRng, GameRngState, Phase,
    PlayerId, PlayerMap, TurnState,
};
use crate::events::{EventBus, EventHandler, EventKind, EventObserver, GameEvent, SubscriptionId};
use crate::interaction::{ChoiceProvider, InteractionRecord};
use crate::interceptors::{Attribute, Flag, Redirect, Stat};
use crate::modifiers::{ActiveModifier, ModifierHost, ModifierList};

/// One match.
pub struct Game {
    config: GameConfig,
    registry: Rc<BlueprintRegistry>,
    rng: GameRng,
    turn: TurnState,
    players: PlayerMap<PlayerState>,
    board: Board,
    /// Every card of the match, ordered by id.
    cards: BTreeMap<EntityId, Card>,
    next_entity: u32,
    next_modifier: u32,
    bus: EventBus,
    chain: EffectChain,
    combat: Option<CombatState>,
    providers: PlayerMap<Option<Box<dyn ChoiceProvider>>>,
    interactions: Vector<InteractionRecord>,
    next_interaction: u32,
    decks: Vec<DeckList>,
    winner: Option<PlayerId>,
    /// Live aura count per event kind that triggers a membership refresh.
    aura_triggers: FxHashMap<EventKind, u32>,
    aura_refreshing: bool,
    aura_dirty: bool,
}

impl Game {
    /// An empty match. Call [`Game::setup`] to build decks and start turn 1.
    #[must_use]
    pub fn new(config: GameConfig, registry: Rc<BlueprintRegistry>, seed: u64) -> Self {
        let player_count = config.player_count;
        let starting_mana = config.starting_mana;
        Self {
            turn: TurnState::new(player_count, config.first_player),
            players: PlayerMap::new(player_count, |_| PlayerState::new(starting_mana)),
            board: Board::new(player_count, config.slots_per_zone),
            providers: PlayerMap::new(player_count, |_| None),
            config,
            registry,
            rng: GameRng::new(seed),
            cards: BTreeMap::new(),
            next_entity: 0,
            next_modifier: 0,
            bus: EventBus::new(),
            chain: EffectChain::new(),
            combat: None,
            interactions: Vector::new(),
            next_interaction: 0,
            decks: Vec::new(),
            winner: None,
            aura_triggers: FxHashMap::default(),
            aura_refreshing: false,
            aura_dirty: false,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &Rc<BlueprintRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Seeded randomness for card effects.
    pub fn rng(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    #[must_use]
    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.turn.phase
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.turn.player_count()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.turn.phase == Phase::GameOver
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn chain(&self) -> &EffectChain {
        &self.chain
    }

    /// The attack being resolved, if any.
    #[must_use]
    pub fn combat(&self) -> Option<&CombatState> {
        self.combat.as_ref()
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    #[must_use]
    pub fn card(&self, id: EntityId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Like [`Game::card`], for ids that must exist.
    #[must_use]
    pub fn card_ref(&self, id: EntityId) -> &Card {
        self.cards
            .get(&id)
            .unwrap_or_else(|| panic!("{id} is not a card of this match"))
    }

    pub(crate) fn card_mut(&mut self, id: EntityId) -> &mut Card {
        self.cards
            .get_mut(&id)
            .unwrap_or_else(|| panic!("{id} is not a card of this match"))
    }

    /// Every card, ordered by id.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Cards in play (slotted, heroes, artifacts), ordered by id.
    pub fn cards_on_board(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.cards.values().filter(|c| c.on_board()).map(|c| c.id)
    }

    #[must_use]
    pub fn hero(&self, player: PlayerId) -> Option<EntityId> {
        self.players[player].hero
    }

    #[must_use]
    pub fn owner_of(&self, card: EntityId) -> PlayerId {
        self.card_ref(card).owner
    }

    /// Minions of `player` in slots, in board order.
    #[must_use]
    pub fn minions_of(&self, player: PlayerId) -> Vec<EntityId> {
        self.board
            .occupants_of(player)
            .filter(|&c| self.card_ref(c).kind() == CardKind::Minion)
            .collect()
    }

    /// Minions of every opponent of `player`, in board order.
    #[must_use]
    pub fn enemy_minions(&self, player: PlayerId) -> Vec<EntityId> {
        PlayerId::all(self.player_count())
            .filter(|&p| p != player)
            .flat_map(|p| self.minions_of(p))
            .collect()
    }

    /// Defense-zone minions of `player`.
    #[must_use]
    pub fn defenders_of(&self, player: PlayerId) -> Vec<EntityId> {
        self.minions_of(player)
            .into_iter()
            .filter(|&c| {
                self.card_ref(c)
                    .slot
                    .is_some_and(|s| s.zone == BoardZone::Defense)
            })
            .collect()
    }

    /// Every submitted action, in order.
    #[must_use]
    pub fn action_history(&self) -> &Vector<ActionRecord> {
        &self.turn.history
    }

    /// Every opened interaction, in order.
    #[must_use]
    pub fn interaction_log(&self) -> &Vector<InteractionRecord> {
        &self.interactions
    }

    #[must_use]
    pub fn events(&self) -> &Vector<GameEvent> {
        self.bus.history()
    }

    #[must_use]
    pub fn decks(&self) -> &[DeckList] {
        &self.decks
    }

    // === Modifier hosts ===

    pub(crate) fn try_host(&self, entity: EntityRef) -> Option<&dyn ModifierHost> {
        match entity {
            EntityRef::Card(id) => self.cards.get(&id).map(|c| c as &dyn ModifierHost),
            EntityRef::Slot(id) => self.board.slot(id).map(|s| s as &dyn ModifierHost),
            EntityRef::Player(p) => (p.index() < self.player_count())
                .then(|| &self.players[p] as &dyn ModifierHost),
        }
    }

    pub(crate) fn try_host_mut(&mut self, entity: EntityRef) -> Option<&mut dyn ModifierHost> {
        match entity {
            EntityRef::Card(id) => self
                .cards
                .get_mut(&id)
                .map(|c| c as &mut dyn ModifierHost),
            EntityRef::Slot(id) => self
                .board
                .slot_mut(id)
                .map(|s| s as &mut dyn ModifierHost),
            EntityRef::Player(p) => {
                if p.index() < self.turn.player_count() {
                    Some(&mut self.players[p] as &mut dyn ModifierHost)
                } else {
                    None
                }
            }
        }
    }

    /// The modifier host behind `entity`. Panics if it doesn't exist.
    #[must_use]
    pub fn host(&self, entity: EntityRef) -> &dyn ModifierHost {
        self.try_host(entity)
            .unwrap_or_else(|| panic!("{entity} does not exist in this match"))
    }

    pub(crate) fn host_mut(&mut self, entity: EntityRef) -> &mut dyn ModifierHost {
        self.try_host_mut(entity)
            .unwrap_or_else(|| panic!("{entity} does not exist in this match"))
    }

    /// A live modifier on `entity`.
    #[must_use]
    pub fn find_modifier(
        &self,
        entity: EntityRef,
        id: crate::modifiers::ModifierId,
    ) -> Option<&ActiveModifier> {
        self.try_host(entity)?.modifiers().get(id)
    }

    #[must_use]
    pub fn modifiers_of(&self, entity: impl Into<EntityRef>) -> &ModifierList {
        self.host(entity.into()).modifiers()
    }

    /// Player that controls an entity.
    #[must_use]
    pub fn controller_of(&self, entity: EntityRef) -> PlayerId {
        match entity {
            EntityRef::Card(id) => self.card_ref(id).owner,
            EntityRef::Slot(id) => id.player,
            EntityRef::Player(p) => p,
        }
    }

    // === Derived attributes ===

    /// Fold `base` through the entity's interceptors for `attr`.
    pub fn get_value<A: Attribute>(
        &self,
        entity: impl Into<EntityRef>,
        attr: A,
        base: A::Value,
    ) -> A::Value {
        let entity = entity.into();
        match self.try_host(entity) {
            Some(host) => host.interceptors().get_value(attr, base, self, entity),
            None => base,
        }
    }

    /// Current value of a stat, starting from the printed or rules value.
    pub fn stat(&self, entity: impl Into<EntityRef>, stat: Stat) -> i64 {
        let entity = entity.into();
        self.get_value(entity, stat, self.base_stat(entity, stat))
    }

    /// Current value of a flag, starting from the rules value.
    pub fn flag(&self, entity: impl Into<EntityRef>, flag: Flag) -> bool {
        let entity = entity.into();
        self.get_value(entity, flag, self.base_flag(entity, flag))
    }

    /// Where a redirect on `entity` points, starting from `base`.
    pub fn redirect(&self, entity: impl Into<EntityRef>, redirect: Redirect, base: EntityId) -> EntityId {
        self.get_value(entity, redirect, base)
    }

    fn base_stat(&self, entity: EntityRef, stat: Stat) -> i64 {
        match entity {
            EntityRef::Card(id) => {
                let Some(card) = self.cards.get(&id) else {
                    return 0;
                };
                let bp = &card.blueprint;
                match stat {
                    Stat::Atk => bp.atk,
                    Stat::MaxHp => bp.max_hp,
                    Stat::ManaCost => bp.mana_cost,
                    Stat::Durability => bp.durability,
                    Stat::AttacksPerTurn => self.config.attacks_per_turn,
                    Stat::DamageReceived | Stat::DamageDealt | Stat::MaxMana => 0,
                }
            }
            EntityRef::Player(p) => match stat {
                Stat::MaxMana => self.players[p].max_mana,
                _ => 0,
            },
            EntityRef::Slot(_) => 0,
        }
    }

    fn base_flag(&self, entity: EntityRef, flag: Flag) -> bool {
        match entity {
            EntityRef::Card(id) => {
                let Some(card) = self.cards.get(&id) else {
                    return false;
                };
                let zone = card.slot.map(|s| s.zone);
                let is_minion = card.kind() == CardKind::Minion;
                match flag {
                    Flag::CanAttack => {
                        is_minion
                            && zone == Some(BoardZone::Attack)
                            && card.readiness().is_some_and(|m| {
                                !m.exhausted
                                    && !m.summoning_sick
                                    && i64::from(m.attacks_this_turn)
                                        < self.stat(id, Stat::AttacksPerTurn)
                            })
                    }
                    Flag::CanBlock => {
                        is_minion && zone == Some(BoardZone::Defense) && !card.is_exhausted()
                    }
                    Flag::CanBeAttacked => {
                        card.on_board() && matches!(card.kind(), CardKind::Minion | CardKind::Hero)
                    }
                    Flag::CanRetaliate => is_minion,
                    Flag::CanBeBlocked
                    | Flag::CanBeTargeted
                    | Flag::CanPlay
                    | Flag::CanUseAbilities => true,
                    Flag::CanSummonHere => false,
                }
            }
            EntityRef::Slot(id) => match flag {
                Flag::CanSummonHere => self.board.slot(id).is_some_and(|s| !s.is_occupied()),
                _ => false,
            },
            EntityRef::Player(_) => matches!(flag, Flag::CanPlay),
        }
    }

    /// Printed abilities followed by granted ones, in modifier order.
    #[must_use]
    pub fn abilities_of(&self, card: EntityId) -> Vec<Rc<AbilityBlueprint>> {
        let card = self.card_ref(card);
        card.blueprint
            .abilities
            .iter()
            .cloned()
            .chain(
                card.modifiers()
                    .iter()
                    .flat_map(|m| m.granted_abilities().cloned()),
            )
            .collect()
    }

    // === Events ===

    /// Subscribe a rule-level handler.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl Fn(&mut Game, &GameEvent) + 'static,
    ) -> SubscriptionId {
        let handler: EventHandler = Rc::new(handler);
        self.bus.subscribe(kind, handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Attach a read-only observer to every event.
    pub fn observe(&mut self, observer: impl Fn(&GameEvent) + 'static) {
        let observer: EventObserver = Rc::new(observer);
        self.bus.observe(observer);
    }

    /// Record and dispatch an event, depth-first.
    ///
    /// Observers see it first, then handlers in subscription order. A handler
    /// unsubscribed by an earlier handler of the same event is skipped.
    pub fn emit(&mut self, event: GameEvent) {
        let event = self.bus.record(event, self.turn.turn_number);
        tracing::trace!(seq = event.seq, kind = %event.kind, "event");

        for observer in self.bus.observers() {
            observer(&event);
        }
        for (id, handler) in self.bus.handlers_for(event.kind) {
            if self.bus.is_live(id) {
                handler(self, &event);
            }
        }

        if self.aura_triggers.contains_key(&event.kind) {
            self.refresh_auras();
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("turn", &self.turn.turn_number)
            .field("active_player", &self.turn.active_player)
            .field("phase", &self.turn.phase)
            .field("cards", &self.cards.len())
            .field("chain", &self.chain.len())
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}
