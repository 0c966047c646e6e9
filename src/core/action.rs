//! Player actions.
//!
//! Actions are what a player submits while the chain is idle. Anything a
//! player does *during* resolution (reacting, picking targets, blocking)
//! goes through the interaction system instead, so it lands in the
//! interaction log rather than here.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::PlayerId;
use crate::board::SlotId;

/// A top-level player action.
///
/// ```
/// use ccg_rules::core::{Action, EntityId};
///
/// let attack = Action::Attack { attacker: EntityId(4), target: EntityId(9) };
/// assert_eq!(attack.source(), Some(EntityId(4)));
/// assert_eq!(Action::EndTurn.source(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play a card from hand. Minions and sigils may name their slot up
    /// front; otherwise the slot is requested through an interaction.
    PlayCard { card: EntityId, slot: Option<SlotId> },

    /// Play a card from the destiny deck (once per turn).
    PlayDestiny { card: EntityId, slot: Option<SlotId> },

    /// Activate an ability (printed or granted) of a card on the board.
    UseAbility { card: EntityId, ability: u8 },

    /// Declare an attack.
    Attack { attacker: EntityId, target: EntityId },

    EndTurn,
}

impl Action {
    /// The card that performs this action, if any.
    #[must_use]
    pub fn source(&self) -> Option<EntityId> {
        match self {
            Action::PlayCard { card, .. }
            | Action::PlayDestiny { card, .. }
            | Action::UseAbility { card, .. } => Some(*card),
            Action::Attack { attacker, .. } => Some(*attacker),
            Action::EndTurn => None,
        }
    }
}

/// A recorded action, in submission order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,
    pub turn: u32,
    /// Sequence number within the turn.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
