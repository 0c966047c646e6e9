//! Skirmish: a small sample card pool.
//!
//! Every card exercises one engine mechanic:
//!
//! | Card | Kind | Mechanic |
//! |------|------|----------|
//! | Warden | hero | elimination |
//! | Footman | minion | vanilla body |
//! | Shield Bearer | minion | aura granting an attack redirect |
//! | Standard Bearer | minion | aura with a unique, stacking buff |
//! | Spark Imp | minion | on-enter handler with an optional target |
//! | Battle Fury | spell | unique modifier |
//! | Sharpen | spell | non-unique modifier |
//! | Vitality Charm | spell | max HP interceptor |
//! | Firebolt | spell | targeted damage |
//! | Frost Ward | reaction | reaction window, timed modifier, flag veto |
//! | Iron Buckler | artifact | durability, damage-received interceptor |
//! | Watchtower | sigil | activated ability |
//! | Fated Champion | destiny minion | destiny deck |

mod cards;

pub use cards::registry;

use crate::cards::BlueprintId;
use crate::core::DeckList;

/// Blueprint ids of the skirmish pool.
pub mod ids {
    use crate::cards::BlueprintId;

    pub const WARDEN: BlueprintId = BlueprintId::new(1);
    pub const FOOTMAN: BlueprintId = BlueprintId::new(10);
    pub const SHIELD_BEARER: BlueprintId = BlueprintId::new(11);
    pub const STANDARD_BEARER: BlueprintId = BlueprintId::new(12);
    pub const SPARK_IMP: BlueprintId = BlueprintId::new(13);
    pub const BATTLE_FURY: BlueprintId = BlueprintId::new(20);
    pub const SHARPEN: BlueprintId = BlueprintId::new(21);
    pub const VITALITY_CHARM: BlueprintId = BlueprintId::new(22);
    pub const FIREBOLT: BlueprintId = BlueprintId::new(23);
    pub const FROST_WARD: BlueprintId = BlueprintId::new(24);
    pub const IRON_BUCKLER: BlueprintId = BlueprintId::new(30);
    pub const WATCHTOWER: BlueprintId = BlueprintId::new(40);
    pub const FATED_CHAMPION: BlueprintId = BlueprintId::new(50);
}

/// A 22-card main deck with one destiny card.
#[must_use]
pub fn starter_deck() -> DeckList {
    use ids::*;

    let pairs: [BlueprintId; 9] = [
        FOOTMAN,
        SHIELD_BEARER,
        STANDARD_BEARER,
        SPARK_IMP,
        BATTLE_FURY,
        SHARPEN,
        VITALITY_CHARM,
        FIREBOLT,
        FROST_WARD,
    ];
    DeckList::new(WARDEN)
        .with_main(pairs.iter().flat_map(|&id| [id, id]))
        .with_main([FOOTMAN, FOOTMAN, IRON_BUCKLER, WATCHTOWER])
        .with_destiny([FATED_CHAMPION])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_deck_is_registered() {
        let registry = registry();
        let deck = starter_deck();

        assert_eq!(deck.main.len(), 22);
        assert!(registry.contains(deck.hero));
        assert!(deck.main.iter().chain(&deck.destiny).all(|&id| registry.contains(id)));
    }
}
