//! Entity identification system.
//!
//! Every card in a match has a unique `EntityId`, allocated by the `Game`
//! when the card is created. Ids are never reused within a match, so a
//! destroyed card can still be referenced by history and chain links.
//!
//! ## EntityRef
//!
//! Cards are not the only things that carry modifiers. Board slots and
//! players do too. `EntityRef` names any of them:
//!
//! ```
//! use ccg_rules::core::{EntityId, EntityRef, PlayerId};
//!
//! let card = EntityRef::Card(EntityId(7));
//! assert_eq!(card.as_card(), Some(EntityId(7)));
//!
//! let player = EntityRef::Player(PlayerId::new(1));
//! assert_eq!(player.as_card(), None);
//! ```

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::board::SlotId;

/// Unique identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Anything that owns a modifier list and an interceptor registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Player(PlayerId),
    Card(EntityId),
    Slot(SlotId),
}

impl EntityRef {
    /// The card id, if this refers to a card.
    #[must_use]
    pub const fn as_card(self) -> Option<EntityId> {
        match self {
            EntityRef::Card(id) => Some(id),
            _ => None,
        }
    }

    /// The slot id, if this refers to a board slot.
    #[must_use]
    pub const fn as_slot(self) -> Option<SlotId> {
        match self {
            EntityRef::Slot(id) => Some(id),
            _ => None,
        }
    }

    /// The player id, if this refers to a player.
    #[must_use]
    pub const fn as_player(self) -> Option<PlayerId> {
        match self {
            EntityRef::Player(id) => Some(id),
            _ => None,
        }
    }
}

impl From<EntityId> for EntityRef {
    fn from(id: EntityId) -> Self {
        EntityRef::Card(id)
    }
}

impl From<PlayerId> for EntityRef {
    fn from(id: PlayerId) -> Self {
        EntityRef::Player(id)
    }
}

impl From<SlotId> for EntityRef {
    fn from(id: SlotId) -> Self {
        EntityRef::Slot(id)
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityRef::Player(p) => write!(f, "{p}"),
            EntityRef::Card(c) => write!(f, "{c}"),
            EntityRef::Slot(s) => write!(f, "{s}"),
        }
    }
}
