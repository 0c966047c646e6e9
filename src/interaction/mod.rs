//! Interaction system: suspending resolution to collect a player's choice.
//!
//! Any rule that needs a target, a slot, a blocker or a yes/no answer
//! builds an [`InteractionRequest`] and hands it to `Game::request`. The
//! game opens an [`InteractionSession`] and pumps the acting player's
//! [`ChoiceProvider`] until the selection commits or the timeout elapses,
//! then returns the final selection to the caller.
//!
//! ## Guarantees
//!
//! - Eligibility is re-checked against the live state on every selection.
//! - A request with `min == 0` and nothing eligible is never opened; the
//!   caller gets an empty selection immediately.
//! - A request whose `min` cannot be met is never opened; the caller gets
//!   the fallback.
//! - No commit before the timeout means the fallback, verbatim.
//! - There is no cancel. The timeout is the only way out.
//!
//! Every opened request is logged as an [`InteractionRecord`]; the log plus
//! the RNG seed replays the match.

pub mod provider;
pub mod request;
pub mod session;

pub use provider::{ChoiceProvider, FirstEligible, NoResponse, ProviderReply, ReplayProvider, ScriptedProvider};
pub use request::{Choice, CommitRule, Eligibility, InteractionKind, InteractionRequest};
pub use session::{
    InteractionId, InteractionOutcome, InteractionRecord, InteractionSession, InteractionView,
};
