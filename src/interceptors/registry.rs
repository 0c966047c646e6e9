//! Per-entity interceptor registry.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use super::attribute::{Attribute, AttributeKey, Flag, Redirect, Stat};
use super::pipeline::{InterceptContext, InterceptOrder, InterceptorFn, Pipeline};
use crate::core::{EntityId, EntityRef};
use crate::game::Game;
use crate::modifiers::ModifierId;

/// Handle returned by [`InterceptorRegistry::add`].
///
/// Removing by handle removes exactly the function that was added, no
/// matter what has been registered or removed around it since.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterceptorHandle {
    id: u32,
    key: AttributeKey,
}

impl InterceptorHandle {
    #[must_use]
    pub fn key(self) -> AttributeKey {
        self.key
    }
}

/// Typed pipelines for every attribute of one entity.
///
/// ```
/// use std::rc::Rc;
/// use ccg_rules::cards::BlueprintRegistry;
/// use ccg_rules::core::{EntityRef, GameConfig, PlayerId};
/// use ccg_rules::game::Game;
/// use ccg_rules::interceptors::{InterceptorRegistry, Stat};
///
/// let game = Game::new(GameConfig::new(), Rc::new(BlueprintRegistry::new()), 7);
/// let entity = EntityRef::Player(PlayerId::new(0));
///
/// let mut registry = InterceptorRegistry::new();
/// assert_eq!(registry.get_value(Stat::Atk, 3, &game, entity), 3);
///
/// let handle = registry.add_fn(Stat::Atk, |v, _| v * 2);
/// registry.add_fn(Stat::Atk, |v, _| v + 1);
/// assert_eq!(registry.get_value(Stat::Atk, 3, &game, entity), 7);
///
/// assert!(registry.remove(handle));
/// assert_eq!(registry.get_value(Stat::Atk, 3, &game, entity), 4);
/// ```
#[derive(Default)]
pub struct InterceptorRegistry {
    pub(super) stats: FxHashMap<Stat, Pipeline<i64>>,
    pub(super) flags: FxHashMap<Flag, Pipeline<bool>>,
    pub(super) redirects: FxHashMap<Redirect, Pipeline<EntityId>>,
    next_id: u32,
}

impl InterceptorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformer for `attr`.
    pub fn add<A: Attribute>(
        &mut self,
        attr: A,
        order: InterceptOrder,
        owner: Option<ModifierId>,
        func: InterceptorFn<A::Value>,
    ) -> InterceptorHandle {
        let id = self.next_id;
        self.next_id += 1;

        A::pipelines_mut(self)
            .entry(attr)
            .or_default()
            .insert(id, order, owner, func);

        InterceptorHandle {
            id,
            key: attr.into(),
        }
    }

    /// Remove the transformer behind `handle`. Returns `false` if it was already gone.
    pub fn remove(&mut self, handle: InterceptorHandle) -> bool {
        match handle.key {
            AttributeKey::Stat(s) => self.stats.get_mut(&s).is_some_and(|p| p.remove(handle.id)),
            AttributeKey::Flag(f) => self.flags.get_mut(&f).is_some_and(|p| p.remove(handle.id)),
            AttributeKey::Redirect(r) => self
                .redirects
                .get_mut(&r)
                .is_some_and(|p| p.remove(handle.id)),
        }
    }

    /// Fold `base` through every transformer registered for `attr`.
    pub fn get_value<A: Attribute>(
        &self,
        attr: A,
        base: A::Value,
        game: &Game,
        entity: EntityRef,
    ) -> A::Value {
        match A::pipelines(self).get(&attr) {
            Some(pipeline) => pipeline.fold(base, game, entity),
            None => base,
        }
    }

    #[must_use]
    pub fn count<A: Attribute>(&self, attr: A) -> usize {
        A::pipelines(self).get(&attr).map_or(0, Pipeline::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stats.values().all(Pipeline::is_empty)
            && self.flags.values().all(Pipeline::is_empty)
            && self.redirects.values().all(Pipeline::is_empty)
    }

    /// Convenience for tests and content: wrap a plain closure.
    pub fn add_fn<A: Attribute>(
        &mut self,
        attr: A,
        func: impl Fn(A::Value, &InterceptContext<'_>) -> A::Value + 'static,
    ) -> InterceptorHandle {
        self.add(attr, InterceptOrder::Registration, None, Rc::new(func))
    }
}

impl std::fmt::Debug for InterceptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorRegistry")
            .field("stats", &self.stats)
            .field("flags", &self.flags)
            .field("redirects", &self.redirects)
            .finish()
    }
}
