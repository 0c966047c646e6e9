//! Game event types.
//!
//! Events are the record of everything that happened in a match, in the
//! order it happened. Rule triggers (modifier handlers) and read-only
//! observers (presentation, logging) both consume the same stream.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::Location;
use crate::core::{EntityId, EntityRef, PlayerId};

/// What happened. Names are stable and used on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CardBeforePlay,
    CardAfterPlay,
    CardBeforeChangeZone,
    CardAfterChangeZone,
    CardDrawn,
    /// Drawn into a full hand and discarded.
    CardBurned,
    MinionSummoned,
    MinionBeforeDestroy,
    MinionDestroyed,
    HeroDestroyed,
    ArtifactDestroyed,
    DamageBefore,
    DamageAfter,
    CombatAttackDeclared,
    CombatTargetDeclared,
    CombatBlockerDeclared,
    CombatBeforeDamage,
    CombatEnd,
    TurnStart,
    TurnEnd,
    ChainLinkAdded,
    ChainBeforeEffectResolved,
    ChainAfterEffectResolved,
    ChainResolved,
    /// `values`: modifier id, then its stacks after the change.
    ModifierAdded,
    /// `values`: modifier id, then the stacks left (0 once detached).
    ModifierRemoved,
    InteractionOpened,
    InteractionResolved,
    AbilityUsed,
    GameOver,
}

impl EventKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventKind::CardBeforePlay => "card.before_play",
            EventKind::CardAfterPlay => "card.after_play",
            EventKind::CardBeforeChangeZone => "card.before_change_zone",
            EventKind::CardAfterChangeZone => "card.after_change_zone",
            EventKind::CardDrawn => "card.drawn",
            EventKind::CardBurned => "card.burned",
            EventKind::MinionSummoned => "minion.summoned",
            EventKind::MinionBeforeDestroy => "minion.before_destroy",
            EventKind::MinionDestroyed => "minion.destroyed",
            EventKind::HeroDestroyed => "hero.destroyed",
            EventKind::ArtifactDestroyed => "artifact.destroyed",
            EventKind::DamageBefore => "damage.before",
            EventKind::DamageAfter => "damage.after",
            EventKind::CombatAttackDeclared => "combat.attack_declared",
            EventKind::CombatTargetDeclared => "combat.target_declared",
            EventKind::CombatBlockerDeclared => "combat.blocker_declared",
            EventKind::CombatBeforeDamage => "combat.before_damage",
            EventKind::CombatEnd => "combat.end",
            EventKind::TurnStart => "turn.start",
            EventKind::TurnEnd => "turn.end",
            EventKind::ChainLinkAdded => "effect_chain.link_added",
            EventKind::ChainBeforeEffectResolved => "effect_chain.before_effect_resolved",
            EventKind::ChainAfterEffectResolved => "effect_chain.after_effect_resolved",
            EventKind::ChainResolved => "effect_chain.resolved",
            EventKind::ModifierAdded => "modifier.added",
            EventKind::ModifierRemoved => "modifier.removed",
            EventKind::InteractionOpened => "interaction.opened",
            EventKind::InteractionResolved => "interaction.resolved",
            EventKind::AbilityUsed => "ability.used",
            EventKind::GameOver => "game.over",
        }
    }

    /// Events after which a card's position on the board may have changed.
    pub const BOARD_CHANGES: [EventKind; 4] = [
        EventKind::CardAfterChangeZone,
        EventKind::MinionSummoned,
        EventKind::TurnStart,
        EventKind::ChainAfterEffectResolved,
    ];
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A game event with contextual data.
///
/// `seq` and `turn` are stamped by the bus when the event is emitted.
///
/// ## Event Data
///
/// - `source`: the entity that caused the event
/// - `target`: the entity affected
/// - `values`: numeric payload (damage amount, stacks, ...); meaning per kind
/// - `locations`: `(from, to)` for zone changes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub seq: u64,
    pub turn: u32,
    pub kind: EventKind,
    pub source: Option<EntityRef>,
    pub target: Option<EntityRef>,
    pub player: Option<PlayerId>,
    pub values: SmallVec<[i64; 2]>,
    pub locations: Option<(Location, Location)>,
}

impl GameEvent {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: 0,
            turn: 0,
            kind,
            source: None,
            target: None,
            player: None,
            values: SmallVec::new(),
            locations: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<EntityRef>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<EntityRef>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: i64) -> Self {
        self.values.push(value);
        self
    }

    #[must_use]
    pub fn with_locations(mut self, from: Location, to: Location) -> Self {
        self.locations = Some((from, to));
        self
    }

    #[must_use]
    pub fn value(&self, index: usize, default: i64) -> i64 {
        self.values.get(index).copied().unwrap_or(default)
    }

    #[must_use]
    pub fn target_card(&self) -> Option<EntityId> {
        self.target.and_then(EntityRef::as_card)
    }

    #[must_use]
    pub fn source_card(&self) -> Option<EntityId> {
        self.source.and_then(EntityRef::as_card)
    }

    /// Destination of a zone change.
    #[must_use]
    pub fn to_location(&self) -> Option<Location> {
        self.locations.map(|(_, to)| to)
    }

    /// Origin of a zone change.
    #[must_use]
    pub fn from_location(&self) -> Option<Location> {
        self.locations.map(|(from, _)| from)
    }
}

/// Common event shapes.
impl GameEvent {
    /// `values[0]` = amount.
    #[must_use]
    pub fn damage(kind: EventKind, source: Option<EntityId>, target: EntityId, amount: i64) -> Self {
        let event = Self::new(kind).with_target(target).with_value(amount);
        match source {
            Some(source) => event.with_source(source),
            None => event,
        }
    }

    #[must_use]
    pub fn zone_change(kind: EventKind, card: EntityId, from: Location, to: Location) -> Self {
        Self::new(kind).with_target(card).with_locations(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let event = GameEvent::new(EventKind::DamageAfter)
            .with_source(EntityId(1))
            .with_target(EntityId(2))
            .with_player(PlayerId::new(0))
            .with_value(3);

        assert_eq!(event.source_card(), Some(EntityId(1)));
        assert_eq!(event.target_card(), Some(EntityId(2)));
        assert_eq!(event.value(0, 0), 3);
        assert_eq!(event.value(1, -1), -1);
    }

    #[test]
    fn test_zone_change() {
        let event = GameEvent::zone_change(
            EventKind::CardAfterChangeZone,
            EntityId(9),
            Location::Hand,
            Location::Board,
        );
        assert_eq!(event.from_location(), Some(Location::Hand));
        assert_eq!(event.to_location(), Some(Location::Board));
    }

    #[test]
    fn test_names() {
        assert_eq!(EventKind::CardAfterPlay.name(), "card.after_play");
        assert_eq!(EventKind::MinionSummoned.to_string(), "minion.summoned");
        assert_eq!(
            EventKind::ChainAfterEffectResolved.name(),
            "effect_chain.after_effect_resolved"
        );
    }

    #[test]
    fn test_serialization() {
        let event = GameEvent::damage(EventKind::DamageBefore, None, EntityId(4), 2);
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
