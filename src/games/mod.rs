//! Card pools built on the engine.
//!
//! - `skirmish`: a small two-player pool where every card exercises one
//!   engine mechanic. Used by the integration tests and as a reference for
//!   writing blueprints.

pub mod skirmish;
