//! Serializable views of a match.
//!
//! Snapshots hold derived values (current attack, flags, keywords), not
//! closures, so a client can render the game without running any rules.
//! They are plain data: `serde` in, `serde` out.

use serde::{Deserialize, Serialize};

use super::Game;
use crate::board::SlotId;
use crate::cards::{BlueprintId, CardKind, CardState, Location};
use crate::chain::ChainLinkView;
use crate::combat::CombatState;
use crate::core::{Action, EntityId, EntityRef, Phase, PlayerId};
use crate::interceptors::{Flag, Stat};
use crate::modifiers::{ActiveModifier, ModifierHost, ModifierId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierSnapshot {
    pub id: ModifierId,
    pub modifier_type: String,
    pub source: Option<EntityId>,
    pub stacks: u32,
    pub keywords: Vec<String>,
    pub remaining_turns: Option<u32>,
}

impl ModifierSnapshot {
    fn of(modifier: &ActiveModifier) -> Self {
        Self {
            id: modifier.id,
            modifier_type: modifier.modifier_type.as_str().to_owned(),
            source: modifier.source,
            stacks: modifier.stacks,
            keywords: modifier.keywords().map(str::to_owned).collect(),
            remaining_turns: modifier.remaining_turns(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub id: EntityId,
    pub blueprint: BlueprintId,
    pub name: String,
    pub kind: CardKind,
    pub owner: PlayerId,
    pub location: Location,
    pub slot: Option<SlotId>,
    pub state: CardState,
    pub atk: i64,
    pub max_hp: i64,
    pub mana_cost: i64,
    pub damage_taken: i64,
    pub can_attack: bool,
    pub can_be_targeted: bool,
    pub keywords: Vec<String>,
    pub modifiers: Vec<ModifierSnapshot>,
    pub abilities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub id: SlotId,
    pub occupant: Option<EntityId>,
    pub can_summon_here: bool,
    pub modifiers: Vec<ModifierSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub hero: Option<EntityId>,
    pub mana: i64,
    pub max_mana: i64,
    pub hand: Vec<EntityId>,
    /// Only the count: deck order is hidden information.
    pub main_deck: usize,
    pub destiny_deck: Vec<EntityId>,
    pub discard: Vec<EntityId>,
    pub destiny_zone: Vec<EntityId>,
    pub destiny_played: bool,
    pub eliminated: bool,
    pub modifiers: Vec<ModifierSnapshot>,
}

/// The whole visible match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn: u32,
    pub active_player: PlayerId,
    pub phase: Phase,
    pub winner: Option<PlayerId>,
    pub players: Vec<PlayerSnapshot>,
    pub slots: Vec<SlotSnapshot>,
    /// Cards in play and in the chain; deck and hand cards appear by id only.
    pub cards: Vec<CardSnapshot>,
    pub chain: Vec<ChainLinkView>,
    pub combat: Option<CombatState>,
    pub legal_actions: Vec<Action>,
}

impl GameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

fn modifier_snapshots(host: &dyn ModifierHost) -> Vec<ModifierSnapshot> {
    host.modifiers().iter().map(ModifierSnapshot::of).collect()
}

impl Game {
    /// One card with every derived value resolved.
    #[must_use]
    pub fn serialize_card(&self, id: EntityId) -> CardSnapshot {
        let card = self.card_ref(id);
        CardSnapshot {
            id,
            blueprint: card.blueprint.id,
            name: card.name().to_owned(),
            kind: card.kind(),
            owner: card.owner,
            location: card.location,
            slot: card.slot,
            state: card.state,
            atk: self.stat(id, Stat::Atk),
            max_hp: self.stat(id, Stat::MaxHp),
            mana_cost: self.stat(id, Stat::ManaCost),
            damage_taken: card.damage_taken(),
            can_attack: self.flag(id, Flag::CanAttack),
            can_be_targeted: self.flag(id, Flag::CanBeTargeted),
            keywords: card.modifiers().keywords(),
            modifiers: modifier_snapshots(card),
            abilities: self
                .abilities_of(id)
                .iter()
                .map(|a| a.name.clone())
                .collect(),
        }
    }

    #[must_use]
    pub fn serialize_slot(&self, id: SlotId) -> SlotSnapshot {
        let slot = self.host(EntityRef::Slot(id));
        SlotSnapshot {
            id,
            occupant: self.board.slot(id).and_then(|s| s.occupant()),
            can_summon_here: self.flag(id, Flag::CanSummonHere),
            modifiers: modifier_snapshots(slot),
        }
    }

    #[must_use]
    pub fn serialize_player(&self, player: PlayerId) -> PlayerSnapshot {
        let state = &self.players[player];
        PlayerSnapshot {
            id: player,
            hero: state.hero,
            mana: state.mana,
            max_mana: self.stat(player, Stat::MaxMana),
            hand: state.hand().to_vec(),
            main_deck: state.main_deck().len(),
            destiny_deck: state.destiny_deck().to_vec(),
            discard: state.discard().to_vec(),
            destiny_zone: state.piles.cards(Location::DestinyZone).to_vec(),
            destiny_played: state.destiny_played,
            eliminated: state.eliminated,
            modifiers: modifier_snapshots(state),
        }
    }

    /// Everything a client needs to draw the table and offer moves.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let active = self.turn.active_player;
        GameSnapshot {
            turn: self.turn.turn_number,
            active_player: active,
            phase: self.turn.phase,
            winner: self.winner,
            players: PlayerId::all(self.player_count())
                .map(|p| self.serialize_player(p))
                .collect(),
            slots: self.board.slots().map(|s| self.serialize_slot(s.id)).collect(),
            cards: self
                .cards
                .values()
                .filter(|c| matches!(c.location, Location::Board | Location::Chain))
                .map(|c| self.serialize_card(c.id))
                .collect(),
            chain: self.chain.links().iter().map(|l| l.view()).collect(),
            combat: self.combat.clone(),
            legal_actions: self.legal_actions(active),
        }
    }
}
