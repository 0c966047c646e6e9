//! Board slots.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::interceptors::InterceptorRegistry;
use crate::modifiers::{ModifierHost, ModifierList};

/// The two zones on each side of the board.
///
/// Attack/defense is the only zone model; there are no front/back rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoardZone {
    Attack,
    /// Minions here may block.
    Defense,
}

impl BoardZone {
    pub const ALL: [BoardZone; 2] = [BoardZone::Attack, BoardZone::Defense];

    #[must_use]
    pub const fn other(self) -> BoardZone {
        match self {
            BoardZone::Attack => BoardZone::Defense,
            BoardZone::Defense => BoardZone::Attack,
        }
    }
}

/// `(player, zone, position)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId {
    pub player: PlayerId,
    pub zone: BoardZone,
    pub position: u8,
}

impl SlotId {
    #[must_use]
    pub const fn new(player: PlayerId, zone: BoardZone, position: u8) -> Self {
        Self {
            player,
            zone,
            position,
        }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Slot({}, {:?}, {})", self.player.0, self.zone, self.position)
    }
}

/// One slot: at most one occupant, plus slot-level modifiers.
pub struct BoardSlot {
    pub id: SlotId,
    occupant: Option<EntityId>,
    modifiers: ModifierList,
    interceptors: InterceptorRegistry,
}

impl BoardSlot {
    #[must_use]
    pub fn new(id: SlotId) -> Self {
        Self {
            id,
            occupant: None,
            modifiers: ModifierList::new(),
            interceptors: InterceptorRegistry::new(),
        }
    }

    #[must_use]
    pub fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Place `card` here. Panics if the slot is occupied.
    pub fn summon(&mut self, card: EntityId) {
        if let Some(existing) = self.occupant {
            panic!("Cannot summon {card} into {}: occupied by {existing}", self.id);
        }
        self.occupant = Some(card);
    }

    /// Remove `card` from here. Panics if it isn't the occupant.
    pub fn remove(&mut self, card: EntityId) {
        match self.occupant {
            Some(existing) if existing == card => self.occupant = None,
            other => panic!("Cannot remove {card} from {}: occupant is {other:?}", self.id),
        }
    }
}

impl ModifierHost for BoardSlot {
    fn modifiers(&self) -> &ModifierList {
        &self.modifiers
    }

    fn modifiers_mut(&mut self) -> &mut ModifierList {
        &mut self.modifiers
    }

    fn interceptors(&self) -> &InterceptorRegistry {
        &self.interceptors
    }

    fn interceptors_mut(&mut self) -> &mut InterceptorRegistry {
        &mut self.interceptors
    }
}

impl std::fmt::Debug for BoardSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSlot")
            .field("id", &self.id)
            .field("occupant", &self.occupant)
            .field("modifiers", &self.modifiers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> BoardSlot {
        BoardSlot::new(SlotId::new(PlayerId::new(0), BoardZone::Defense, 1))
    }

    #[test]
    fn test_summon_and_remove() {
        let mut s = slot();
        assert!(!s.is_occupied());

        s.summon(EntityId(4));
        assert_eq!(s.occupant(), Some(EntityId(4)));

        s.remove(EntityId(4));
        assert!(!s.is_occupied());
    }

    #[test]
    #[should_panic(expected = "occupied by")]
    fn test_summon_into_occupied() {
        let mut s = slot();
        s.summon(EntityId(4));
        s.summon(EntityId(5));
    }

    #[test]
    #[should_panic(expected = "Cannot remove")]
    fn test_remove_absent() {
        let mut s = slot();
        s.remove(EntityId(4));
    }

    #[test]
    fn test_slot_display() {
        let id = SlotId::new(PlayerId::new(1), BoardZone::Attack, 3);
        assert_eq!(id.to_string(), "Slot(1, Attack, 3)");
        assert_eq!(BoardZone::Attack.other(), BoardZone::Defense);
    }
}
