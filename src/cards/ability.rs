//! Activatable abilities, printed on a blueprint or granted by a modifier.

use std::rc::Rc;

use super::blueprint::{CanPlayFn, PlayFn, TargetsFn};
use crate::core::EntityId;
use crate::game::Game;
use crate::interaction::Choice;

/// Same callback shape as a card, plus cost and exhaustion.
#[derive(Clone)]
pub struct AbilityBlueprint {
    pub name: String,
    pub mana_cost: i64,
    /// Using the ability exhausts the card (and requires it to be ready).
    pub should_exhaust: bool,
    pub can_use: Option<CanPlayFn>,
    pub targets: Option<TargetsFn>,
    pub on_resolve: PlayFn,
}

impl AbilityBlueprint {
    pub fn new(
        name: impl Into<String>,
        on_resolve: impl Fn(&mut Game, EntityId, &[Choice]) + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            mana_cost: 0,
            should_exhaust: true,
            can_use: None,
            targets: None,
            on_resolve: Rc::new(on_resolve),
        }
    }

    #[must_use]
    pub fn with_cost(mut self, mana_cost: i64) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    #[must_use]
    pub fn exhausting(mut self, should_exhaust: bool) -> Self {
        self.should_exhaust = should_exhaust;
        self
    }

    #[must_use]
    pub fn can_use(mut self, f: impl Fn(&Game, EntityId) -> bool + 'static) -> Self {
        self.can_use = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn targets(mut self, f: impl Fn(&mut Game, EntityId) -> Vec<Choice> + 'static) -> Self {
        self.targets = Some(Rc::new(f));
        self
    }
}

impl std::fmt::Debug for AbilityBlueprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilityBlueprint")
            .field("name", &self.name)
            .field("mana_cost", &self.mana_cost)
            .field("should_exhaust", &self.should_exhaust)
            .finish_non_exhaustive()
    }
}
