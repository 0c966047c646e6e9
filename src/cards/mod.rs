//! Card system: blueprints, abilities, instances, and registry.
//!
//! ## Key Types
//!
//! - `BlueprintId`: identifier for a blueprint
//! - `CardBlueprint`: immutable data + callbacks (`on_init`, `can_play`,
//!   `pre_response_targets`, `on_play`)
//! - `AbilityBlueprint`: activatable ability with the same callback shape
//! - `Card`: runtime instance (location, owner, modifiers, interceptors)
//! - `BlueprintRegistry`: blueprint lookup
//!
//! The engine never looks inside a blueprint beyond these fields, so card
//! content stays pluggable.

pub mod ability;
pub mod blueprint;
pub mod instance;
pub mod registry;

pub use ability::AbilityBlueprint;
pub use blueprint::{
    BlueprintId, CanPlayFn, CardBlueprint, CardKind, InitFn, PlayFn, Speed, TargetsFn,
};
pub use instance::{ArtifactState, Card, CardState, HeroState, Location, MinionState};
pub use registry::BlueprintRegistry;
