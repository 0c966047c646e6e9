//! Card blueprints: immutable data plus content callbacks.
//!
//! A blueprint is everything about a card that doesn't depend on a match:
//! its kind, printed numbers and the four callbacks the engine invokes.
//! Instance state (location, damage, modifiers) lives in [`Card`](super::Card).
//!
//! ## Callbacks
//!
//! | callback | when | may mutate |
//! |---|---|---|
//! | `on_init` | card created, and again after it resets on leaving the board | yes |
//! | `can_play` | legality checks, on top of the speed rule | no |
//! | `pre_response_targets` | while the card is being played, before its link is pushed | yes (interactions) |
//! | `on_play` | when the card's chain link resolves | yes |

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::ability::AbilityBlueprint;
use crate::core::EntityId;
use crate::game::Game;
use crate::interaction::Choice;

pub type InitFn = Rc<dyn Fn(&mut Game, EntityId)>;
pub type CanPlayFn = Rc<dyn Fn(&Game, EntityId) -> bool>;
pub type TargetsFn = Rc<dyn Fn(&mut Game, EntityId) -> Vec<Choice>>;
pub type PlayFn = Rc<dyn Fn(&mut Game, EntityId, &[Choice])>;

/// Identifies a blueprint (the "type" of a card, not an instance).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlueprintId(pub u32);

impl BlueprintId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for BlueprintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Blueprint({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Minion,
    Hero,
    Spell,
    Artifact,
    Sigil,
}

impl CardKind {
    /// Kinds that occupy a board slot.
    #[must_use]
    pub const fn needs_slot(self) -> bool {
        matches!(self, CardKind::Minion | CardKind::Sigil)
    }
}

/// When a card may be played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speed {
    /// Only on its controller's turn, while nothing is resolving.
    #[default]
    Normal,
    /// Only in reaction windows, while the chain is active.
    Reaction,
}

/// Immutable definition of one card.
///
/// ```
/// use ccg_rules::cards::{BlueprintId, CardBlueprint, CardKind};
///
/// let wolf = CardBlueprint::new(BlueprintId::new(3), "Grey Wolf", CardKind::Minion)
///     .with_cost(2)
///     .with_stats(2, 3);
///
/// assert_eq!(wolf.atk, 2);
/// assert_eq!(wolf.max_hp, 3);
/// assert!(wolf.on_play.is_none());
/// ```
#[derive(Clone)]
pub struct CardBlueprint {
    pub id: BlueprintId,
    pub name: String,
    pub kind: CardKind,
    pub speed: Speed,
    pub mana_cost: i64,
    pub atk: i64,
    pub max_hp: i64,
    /// Artifacts only.
    pub durability: i64,
    pub abilities: Vec<Rc<AbilityBlueprint>>,
    pub on_init: Option<InitFn>,
    pub can_play: Option<CanPlayFn>,
    pub pre_response_targets: Option<TargetsFn>,
    pub on_play: Option<PlayFn>,
}

impl CardBlueprint {
    #[must_use]
    pub fn new(id: BlueprintId, name: impl Into<String>, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            speed: Speed::Normal,
            mana_cost: 0,
            atk: 0,
            max_hp: 0,
            durability: 0,
            abilities: Vec::new(),
            on_init: None,
            can_play: None,
            pre_response_targets: None,
            on_play: None,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, mana_cost: i64) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, atk: i64, max_hp: i64) -> Self {
        self.atk = atk;
        self.max_hp = max_hp;
        self
    }

    #[must_use]
    pub fn with_durability(mut self, durability: i64) -> Self {
        self.durability = durability;
        self
    }

    #[must_use]
    pub fn reaction(mut self) -> Self {
        self.speed = Speed::Reaction;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: AbilityBlueprint) -> Self {
        self.abilities.push(Rc::new(ability));
        self
    }

    #[must_use]
    pub fn on_init(mut self, f: impl Fn(&mut Game, EntityId) + 'static) -> Self {
        self.on_init = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn can_play(mut self, f: impl Fn(&Game, EntityId) -> bool + 'static) -> Self {
        self.can_play = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn pre_response_targets(
        mut self,
        f: impl Fn(&mut Game, EntityId) -> Vec<Choice> + 'static,
    ) -> Self {
        self.pre_response_targets = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn on_play(mut self, f: impl Fn(&mut Game, EntityId, &[Choice]) + 'static) -> Self {
        self.on_play = Some(Rc::new(f));
        self
    }

    /// The speed rule: reactions need an active chain, everything else an idle one.
    #[must_use]
    pub fn speed_allows(&self, game: &Game) -> bool {
        match self.speed {
            Speed::Normal => !game.chain().is_active(),
            Speed::Reaction => game.chain().is_active(),
        }
    }

    /// Speed rule plus the blueprint's own `can_play`.
    #[must_use]
    pub fn check_can_play(&self, game: &Game, card: EntityId) -> bool {
        self.speed_allows(game) && self.can_play.as_ref().map_or(true, |f| f(game, card))
    }
}

impl std::fmt::Debug for CardBlueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardBlueprint")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("speed", &self.speed)
            .field("mana_cost", &self.mana_cost)
            .field("atk", &self.atk)
            .field("max_hp", &self.max_hp)
            .field("abilities", &self.abilities.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blueprint_id() {
        let id = BlueprintId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{id}"), "Blueprint(42)");
    }

    #[test]
    fn test_builder() {
        let bp = CardBlueprint::new(BlueprintId::new(1), "Frost Snap", CardKind::Spell)
            .with_cost(1)
            .reaction()
            .on_play(|_, _, _| {});

        assert_eq!(bp.speed, Speed::Reaction);
        assert_eq!(bp.mana_cost, 1);
        assert!(bp.on_play.is_some());
        assert!(bp.can_play.is_none());
    }

    #[test]
    fn test_needs_slot() {
        assert!(CardKind::Minion.needs_slot());
        assert!(CardKind::Sigil.needs_slot());
        assert!(!CardKind::Spell.needs_slot());
        assert!(!CardKind::Artifact.needs_slot());
    }
}
