//! Blueprint registry.
//!
//! The `BlueprintRegistry` holds every blueprint a match can instantiate.
//! It is built once, wrapped in `Rc`, and shared by the game and replays.

use rustc_hash::FxHashMap;
use std::rc::Rc;

use super::blueprint::{BlueprintId, CardBlueprint, CardKind};

/// Registry of card blueprints.
///
/// ## Example
///
/// ```
/// use ccg_rules::cards::{BlueprintId, BlueprintRegistry, CardBlueprint, CardKind};
///
/// let mut registry = BlueprintRegistry::new();
/// registry.register(CardBlueprint::new(BlueprintId::new(1), "Squire", CardKind::Minion));
///
/// let found = registry.get(BlueprintId::new(1)).unwrap();
/// assert_eq!(found.name, "Squire");
/// ```
#[derive(Clone, Debug, Default)]
pub struct BlueprintRegistry {
    blueprints: FxHashMap<BlueprintId, Rc<CardBlueprint>>,
}

impl BlueprintRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blueprint.
    ///
    /// Panics if a blueprint with the same ID already exists.
    pub fn register(&mut self, blueprint: CardBlueprint) {
        if self.blueprints.contains_key(&blueprint.id) {
            panic!("Blueprint with ID {} already registered", blueprint.id);
        }
        self.blueprints.insert(blueprint.id, Rc::new(blueprint));
    }

    #[must_use]
    pub fn get(&self, id: BlueprintId) -> Option<&Rc<CardBlueprint>> {
        self.blueprints.get(&id)
    }

    /// Look up a blueprint that must exist (deck lists are built from this registry).
    #[must_use]
    pub fn expect(&self, id: BlueprintId) -> Rc<CardBlueprint> {
        match self.blueprints.get(&id) {
            Some(bp) => Rc::clone(bp),
            None => panic!("{id} is not registered"),
        }
    }

    #[must_use]
    pub fn contains(&self, id: BlueprintId) -> bool {
        self.blueprints.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blueprints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blueprints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<CardBlueprint>> {
        self.blueprints.values()
    }

    pub fn find_by_kind(&self, kind: CardKind) -> impl Iterator<Item = &Rc<CardBlueprint>> {
        self.blueprints.values().filter(move |bp| bp.kind == kind)
    }

    /// Find a blueprint by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Rc<CardBlueprint>> {
        self.blueprints.values().find(|bp| bp.name == name)
    }
}
