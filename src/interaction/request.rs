//! Interaction requests: what resolution code asks of a player.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::board::SlotId;
use crate::core::{EntityId, PlayerId, Timeout};
use crate::game::Game;

/// Is this candidate selectable right now?
pub type Eligibility = Rc<dyn Fn(&Game, &Choice) -> bool>;

/// May the current selection be finalized?
pub type CommitRule = Rc<dyn Fn(&Game, &[Choice]) -> bool>;

/// One selectable thing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    Card(EntityId),
    Slot(SlotId),
    Player(PlayerId),
    /// Index into a list of discrete options described by the prompt.
    Option(u8),
}

impl Choice {
    #[must_use]
    pub const fn as_card(self) -> Option<EntityId> {
        match self {
            Choice::Card(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_slot(self) -> Option<SlotId> {
        match self {
            Choice::Slot(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_player(self) -> Option<PlayerId> {
        match self {
            Choice::Player(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_option(self) -> Option<u8> {
        match self {
            Choice::Option(i) => Some(i),
            _ => None,
        }
    }
}

impl From<EntityId> for Choice {
    fn from(id: EntityId) -> Self {
        Choice::Card(id)
    }
}

impl From<SlotId> for Choice {
    fn from(id: SlotId) -> Self {
        Choice::Slot(id)
    }
}

/// What the request is for. Providers use it to pick a strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Pick targets for an effect.
    Target,
    /// Pick the slot a minion or sigil is summoned into.
    SummonSlot,
    /// Play a reaction card from hand, or pass.
    Reaction,
    /// Pick a blocker, or let the attack through.
    Block,
    Discard,
    /// Pick among discrete options.
    Option,
}

/// A bounded, validated selection request.
///
/// ```
/// use ccg_rules::core::{EntityId, PlayerId};
/// use ccg_rules::interaction::{Choice, InteractionKind, InteractionRequest};
///
/// let request = InteractionRequest::new(PlayerId::new(0), InteractionKind::Target)
///     .with_candidates([Choice::Card(EntityId(4)), Choice::Card(EntityId(5))])
///     .with_count(0, 1)
///     .with_fallback(vec![]);
///
/// assert_eq!(request.min, 0);
/// assert_eq!(request.candidates.len(), 2);
/// ```
#[derive(Clone)]
pub struct InteractionRequest {
    pub player: PlayerId,
    pub kind: InteractionKind,
    pub prompt: String,
    /// Card on whose behalf the request is made.
    pub source: Option<EntityId>,
    pub candidates: Vec<Choice>,
    /// Re-checked against the live state on every selection.
    pub eligibility: Option<Eligibility>,
    pub min: usize,
    pub max: usize,
    /// Extra commit condition on top of the count bounds.
    pub commit: Option<CommitRule>,
    /// Returned verbatim on timeout, or when `min` cannot be reached.
    pub fallback: Vec<Choice>,
    /// Overrides `GameConfig::interaction_timeout`.
    pub timeout: Option<Timeout>,
}

impl InteractionRequest {
    /// Exactly one choice, no candidates, empty fallback.
    #[must_use]
    pub fn new(player: PlayerId, kind: InteractionKind) -> Self {
        Self {
            player,
            kind,
            prompt: String::new(),
            source: None,
            candidates: Vec::new(),
            eligibility: None,
            min: 1,
            max: 1,
            commit: None,
            fallback: Vec::new(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_candidates(mut self, candidates: impl IntoIterator<Item = Choice>) -> Self {
        self.candidates.extend(candidates);
        self
    }

    #[must_use]
    pub fn eligible_if(mut self, f: impl Fn(&Game, &Choice) -> bool + 'static) -> Self {
        self.eligibility = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn with_count(mut self, min: usize, max: usize) -> Self {
        assert!(min <= max, "min choice count {min} exceeds max {max}");
        self.min = min;
        self.max = max;
        self
    }

    #[must_use]
    pub fn commit_when(mut self, f: impl Fn(&Game, &[Choice]) -> bool + 'static) -> Self {
        self.commit = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Vec<Choice>) -> Self {
        self.fallback = fallback;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Timeout) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Candidate and currently eligible.
    #[must_use]
    pub fn is_eligible(&self, game: &Game, choice: &Choice) -> bool {
        self.candidates.contains(choice)
            && self.eligibility.as_ref().map_or(true, |f| f(game, choice))
    }

    /// Candidates eligible right now, in candidate order.
    #[must_use]
    pub fn eligible(&self, game: &Game) -> Vec<Choice> {
        self.candidates
            .iter()
            .filter(|c| self.is_eligible(game, c))
            .copied()
            .collect()
    }
}

impl std::fmt::Debug for InteractionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionRequest")
            .field("player", &self.player)
            .field("kind", &self.kind)
            .field("prompt", &self.prompt)
            .field("candidates", &self.candidates)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
