//! Ordered transformer pipelines.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::core::{EntityId, EntityRef};
use crate::game::Game;
use crate::modifiers::ModifierId;

/// A value transformer. Receives the running value and returns the next one.
///
/// Interceptors only ever see `&Game`, so they cannot mutate anything.
pub type InterceptorFn<V> = Rc<dyn Fn(V, &InterceptContext<'_>) -> V>;

/// What an interceptor can see while it runs.
pub struct InterceptContext<'a> {
    pub game: &'a Game,
    /// The entity whose attribute is being derived.
    pub entity: EntityRef,
    /// The modifier that registered this interceptor, if any.
    pub modifier: Option<ModifierId>,
}

impl<'a> InterceptContext<'a> {
    #[must_use]
    pub fn new(game: &'a Game, entity: EntityRef, modifier: Option<ModifierId>) -> Self {
        Self {
            game,
            entity,
            modifier,
        }
    }

    /// Stack count of the owning modifier (1 for free-standing interceptors).
    #[must_use]
    pub fn stacks(&self) -> i64 {
        self.modifier
            .and_then(|id| self.game.find_modifier(self.entity, id))
            .map_or(1, |m| i64::from(m.stacks))
    }

    /// Card that granted the owning modifier.
    #[must_use]
    pub fn source(&self) -> Option<EntityId> {
        self.modifier
            .and_then(|id| self.game.find_modifier(self.entity, id))
            .and_then(|m| m.source)
    }
}

/// Where a new interceptor is placed in its pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterceptOrder {
    /// After every earlier registration, before any `Last` entry.
    #[default]
    Registration,
    /// After everything, including earlier `Last` entries.
    Last,
}

struct Entry<V> {
    id: u32,
    order: InterceptOrder,
    owner: Option<ModifierId>,
    func: InterceptorFn<V>,
}

/// The interceptors registered for one attribute of one entity.
pub struct Pipeline<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Default for Pipeline<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V: Clone> Pipeline<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(
        &mut self,
        id: u32,
        order: InterceptOrder,
        owner: Option<ModifierId>,
        func: InterceptorFn<V>,
    ) {
        let entry = Entry {
            id,
            order,
            owner,
            func,
        };
        match order {
            InterceptOrder::Last => self.entries.push(entry),
            InterceptOrder::Registration => {
                let at = self
                    .entries
                    .iter()
                    .position(|e| e.order == InterceptOrder::Last)
                    .unwrap_or(self.entries.len());
                self.entries.insert(at, entry);
            }
        }
    }

    pub(crate) fn remove(&mut self, id: u32) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Modifiers owning entries, in evaluation order.
    pub fn owners(&self) -> impl Iterator<Item = Option<ModifierId>> + '_ {
        self.entries.iter().map(|e| e.owner)
    }

    /// Fold `base` through every entry in order.
    pub fn fold(&self, base: V, game: &Game, entity: EntityRef) -> V {
        self.entries.iter().fold(base, |value, entry| {
            let ctx = InterceptContext::new(game, entity, entry.owner);
            (entry.func)(value, &ctx)
        })
    }
}

impl<V> std::fmt::Debug for Pipeline<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| (e.id, e.order, e.owner)))
            .finish()
    }
}
