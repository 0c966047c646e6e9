//! Modifiers: named, stacking effects attached to entities.
//!
//! A modifier is a type key, a source card, a stack count and an ordered
//! list of [`Mixin`]s. The `Game` applies the mixins in order when the
//! modifier is added and detaches them in the same order when it is
//! removed; this module only holds the data.
//!
//! ## Stacking
//!
//! - Unique types have at most one live instance per target. Reapplying one
//!   adds its stacks to the live instance instead of attaching a second.
//! - Other types attach an independent instance every time.
//! - An instance whose stacks reach zero is removed.
//!
//! ## Hosts
//!
//! Cards, board slots and players all carry modifiers. They share the
//! [`ModifierHost`] capability: a modifier list plus an interceptor registry.

pub mod list;
pub mod mixin;
pub mod modifier;

pub use list::ModifierList;
pub use mixin::{
    Aura, AuraGrant, AuraPredicate, AuraScope, Condition, DurationTick, EnterHandler, HandlerContext,
    InterceptorSpec, Mixin, ModifierEventHandler,
};
pub use modifier::{ActiveModifier, Modifier, ModifierId, ModifierType};

pub(crate) use modifier::Attachment;

use crate::interceptors::InterceptorRegistry;

/// Anything that carries modifiers and derives attributes through interceptors.
pub trait ModifierHost {
    fn modifiers(&self) -> &ModifierList;
    fn modifiers_mut(&mut self) -> &mut ModifierList;
    fn interceptors(&self) -> &InterceptorRegistry;
    fn interceptors_mut(&mut self) -> &mut InterceptorRegistry;
}
