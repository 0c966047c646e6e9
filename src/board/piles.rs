//! Off-board card piles of one player.
//!
//! Decks, hand, discard, banish and the destiny zone are ordered lists of
//! card ids. Index 0 is the bottom, the last index the top; draws take from
//! the top. Artifacts in play are kept here too (under `Board`) since they
//! don't occupy a slot.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::Location;
use crate::core::{EntityId, GameRng};

/// Insertion point in a pile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilePosition {
    #[default]
    Top,
    Bottom,
    /// Clamped to the pile length.
    Index(usize),
}

/// Ordered piles keyed by location.
///
/// ```
/// use ccg_rules::board::{PilePosition, Piles};
/// use ccg_rules::cards::Location;
/// use ccg_rules::core::EntityId;
///
/// let mut piles = Piles::new();
/// piles.add(EntityId(10), Location::MainDeck, PilePosition::Top);
/// piles.add(EntityId(11), Location::MainDeck, PilePosition::Bottom);
///
/// assert_eq!(piles.top(Location::MainDeck), Some(EntityId(10)));
/// assert_eq!(piles.cards(Location::MainDeck), &[EntityId(11), EntityId(10)]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Piles {
    piles: FxHashMap<Location, Vec<EntityId>>,
}

impl Piles {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card to a pile. Panics if it is already in that pile.
    pub fn add(&mut self, card: EntityId, location: Location, position: PilePosition) {
        let pile = self.piles.entry(location).or_default();
        assert!(
            !pile.contains(&card),
            "{card} is already in {location:?}"
        );
        match position {
            PilePosition::Top => pile.push(card),
            PilePosition::Bottom => pile.insert(0, card),
            PilePosition::Index(i) => {
                let at = i.min(pile.len());
                pile.insert(at, card);
            }
        }
    }

    /// Remove a card from a pile. Returns `false` if it wasn't there.
    pub fn remove(&mut self, card: EntityId, location: Location) -> bool {
        let Some(pile) = self.piles.get_mut(&location) else {
            return false;
        };
        match pile.iter().position(|&c| c == card) {
            Some(index) => {
                pile.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, card: EntityId, location: Location) -> bool {
        self.cards(location).contains(&card)
    }

    /// Cards in a pile, bottom to top.
    #[must_use]
    pub fn cards(&self, location: Location) -> &[EntityId] {
        self.piles.get(&location).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self, location: Location) -> usize {
        self.cards(location).len()
    }

    #[must_use]
    pub fn top(&self, location: Location) -> Option<EntityId> {
        self.cards(location).last().copied()
    }

    pub fn shuffle(&mut self, location: Location, rng: &mut GameRng) {
        if let Some(pile) = self.piles.get_mut(&location) {
            rng.shuffle(pile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let mut piles = Piles::new();
        piles.add(EntityId(10), Location::Hand, PilePosition::Top);
        piles.add(EntityId(11), Location::Hand, PilePosition::Top);
        piles.add(EntityId(12), Location::Hand, PilePosition::Index(1));

        assert_eq!(
            piles.cards(Location::Hand),
            &[EntityId(10), EntityId(12), EntityId(11)]
        );
        assert_eq!(piles.len(Location::Hand), 3);
        assert_eq!(piles.len(Location::Discard), 0);
    }

    #[test]
    fn test_remove() {
        let mut piles = Piles::new();
        piles.add(EntityId(10), Location::Discard, PilePosition::Top);

        assert!(piles.remove(EntityId(10), Location::Discard));
        assert!(!piles.remove(EntityId(10), Location::Discard));
        assert!(!piles.remove(EntityId(10), Location::Banish));
        assert!(!piles.contains(EntityId(10), Location::Discard));
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut piles = Piles::new();
        for i in 0..20 {
            piles.add(EntityId(i), Location::MainDeck, PilePosition::Top);
        }
        let before = piles.cards(Location::MainDeck).to_vec();

        let mut rng = GameRng::new(42);
        piles.shuffle(Location::MainDeck, &mut rng);

        let mut after = piles.cards(Location::MainDeck).to_vec();
        assert_ne!(before, after);
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    #[should_panic(expected = "already in")]
    fn test_duplicate_panics() {
        let mut piles = Piles::new();
        piles.add(EntityId(10), Location::Hand, PilePosition::Top);
        piles.add(EntityId(10), Location::Hand, PilePosition::Top);
    }
}
