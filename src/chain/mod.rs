//! Effect chain resolution.
//!
//! Card plays, activated abilities, attacks and triggered effects become
//! [`ChainLink`]s on the [`EffectChain`]. Before the top link resolves,
//! a reaction window offers every player (active player first) the chance
//! to push a reaction-speed card. Once everyone declines, the top link is
//! popped and resolved; anything it pushes resolves before the links below.
//!
//! The chain is empty and idle outside of action resolution. Driving the
//! chain lives on `Game` (see `game::resolution`), since resolving a link
//! needs the whole match.

#[allow(clippy::module_inception)]
pub mod chain;
pub mod link;

pub use chain::{ChainState, EffectChain};
pub use link::{ChainLink, ChainLinkId, ChainLinkView, LinkEffect, LinkKind, TriggeredFn};
