//! Board layout and card piles.
//!
//! Each player has an attack zone and a defense zone of
//! `GameConfig::slots_per_zone` slots. A slot holds at most one minion or
//! sigil and carries its own modifiers ("cannot summon here"). Everything
//! not in a slot lives in a player's [`Piles`].
//!
//! Slots are mutated only through `summon`/`remove`, which assert the
//! expected prior state. The `Game` keeps `Card::slot` in step with them.

#[allow(clippy::module_inception)]
pub mod board;
pub mod piles;
pub mod slot;

pub use board::Board;
pub use piles::{PilePosition, Piles};
pub use slot::{BoardSlot, BoardZone, SlotId};
