//! Combat state machine.
//!
//! An attack walks through [`CombatStep`]s:
//!
//! ```text
//! DeclareAttacker -> DeclareTarget -> BuildingChain -> DeclareBlocker
//!     -> Reactions -> DamageResolution -> Cleanup
//! ```
//!
//! Every guard is an interceptor-derived flag (`CanAttack`, `CanBeAttacked`,
//! `CanBeBlocked`, `CanBlock`, `CanRetaliate`), so modifiers can veto any
//! transition. `Redirect::AttackTarget` lets a modifier hijack the target
//! during `DeclareTarget`. `Cleanup` always runs, whether or not damage was
//! dealt. The driver lives on `Game` (see `game::combat`).

pub mod phase;

pub use phase::{CombatState, CombatStep};
