//! The board: every slot of every player.

use smallvec::SmallVec;

use super::slot::{BoardSlot, BoardZone, SlotId};
use crate::core::{EntityId, PlayerId, PlayerMap};

/// One player's side: an attack zone and a defense zone of equal width.
#[derive(Debug)]
struct Side {
    attack: Vec<BoardSlot>,
    defense: Vec<BoardSlot>,
}

impl Side {
    fn new(player: PlayerId, width: u8) -> Self {
        let row = |zone: BoardZone| -> Vec<BoardSlot> {
            (0..width)
                .map(|pos| BoardSlot::new(SlotId::new(player, zone, pos)))
                .collect()
        };
        Self {
            attack: row(BoardZone::Attack),
            defense: row(BoardZone::Defense),
        }
    }

    fn zone(&self, zone: BoardZone) -> &[BoardSlot] {
        match zone {
            BoardZone::Attack => &self.attack,
            BoardZone::Defense => &self.defense,
        }
    }

    fn zone_mut(&mut self, zone: BoardZone) -> &mut [BoardSlot] {
        match zone {
            BoardZone::Attack => &mut self.attack,
            BoardZone::Defense => &mut self.defense,
        }
    }
}

/// All slots, addressed by [`SlotId`].
///
/// Iteration order is fixed: player, then attack before defense, then
/// position. Anything that walks the board walks it in this order.
#[derive(Debug)]
pub struct Board {
    sides: PlayerMap<Side>,
    width: u8,
}

impl Board {
    #[must_use]
    pub fn new(player_count: usize, width: u8) -> Self {
        assert!(width > 0, "A board zone needs at least one slot");
        Self {
            sides: PlayerMap::new(player_count, |p| Side::new(p, width)),
            width,
        }
    }

    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        id.player.index() < self.sides.player_count() && id.position < self.width
    }

    #[must_use]
    pub fn slot(&self, id: SlotId) -> Option<&BoardSlot> {
        if !self.contains(id) {
            return None;
        }
        self.sides[id.player].zone(id.zone).get(usize::from(id.position))
    }

    pub fn slot_mut(&mut self, id: SlotId) -> Option<&mut BoardSlot> {
        if !self.contains(id) {
            return None;
        }
        self.sides[id.player]
            .zone_mut(id.zone)
            .get_mut(usize::from(id.position))
    }

    /// Slots of one player in board order.
    pub fn slots_of(&self, player: PlayerId) -> impl Iterator<Item = &BoardSlot> {
        let side = &self.sides[player];
        side.attack.iter().chain(side.defense.iter())
    }

    /// Every slot in board order.
    pub fn slots(&self) -> impl Iterator<Item = &BoardSlot> {
        self.sides.iter().flat_map(|(_, side)| side.attack.iter().chain(side.defense.iter()))
    }

    /// Occupants of one player's slots, in board order.
    pub fn occupants_of(&self, player: PlayerId) -> impl Iterator<Item = EntityId> + '_ {
        self.slots_of(player).filter_map(BoardSlot::occupant)
    }

    /// Every occupant, in board order.
    pub fn occupants(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots().filter_map(BoardSlot::occupant)
    }

    pub fn free_slots(&self, player: PlayerId) -> impl Iterator<Item = SlotId> + '_ {
        self.slots_of(player)
            .filter(|s| !s.is_occupied())
            .map(|s| s.id)
    }

    /// Neighbours of a slot: same zone at position +-1, and the same
    /// position in the player's other zone.
    ///
    /// ```
    /// use ccg_rules::board::{Board, BoardZone, SlotId};
    /// use ccg_rules::core::PlayerId;
    ///
    /// let board = Board::new(2, 5);
    /// let p = PlayerId::new(0);
    /// let adjacent = board.adjacent(SlotId::new(p, BoardZone::Attack, 0));
    /// assert_eq!(
    ///     adjacent.as_slice(),
    ///     &[SlotId::new(p, BoardZone::Attack, 1), SlotId::new(p, BoardZone::Defense, 0)]
    /// );
    /// ```
    #[must_use]
    pub fn adjacent(&self, id: SlotId) -> SmallVec<[SlotId; 3]> {
        let mut out = SmallVec::new();
        if id.position > 0 {
            out.push(SlotId::new(id.player, id.zone, id.position - 1));
        }
        if id.position + 1 < self.width {
            out.push(SlotId::new(id.player, id.zone, id.position + 1));
        }
        out.push(SlotId::new(id.player, id.zone.other(), id.position));
        out
    }
}
