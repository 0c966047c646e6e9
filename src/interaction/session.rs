//! An open interaction: the request plus the selection being built.

use serde::{Deserialize, Serialize};

use super::request::{Choice, InteractionKind, InteractionRequest};
use crate::core::{EntityId, PlayerId, SelectionError};
use crate::game::Game;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub u32);

impl std::fmt::Display for InteractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interaction({})", self.0)
    }
}

/// Selection state of one open request.
#[derive(Debug)]
pub struct InteractionSession {
    pub id: InteractionId,
    pub request: InteractionRequest,
    selected: Vec<Choice>,
}

impl InteractionSession {
    #[must_use]
    pub fn new(id: InteractionId, request: InteractionRequest) -> Self {
        Self {
            id,
            request,
            selected: Vec::new(),
        }
    }

    #[must_use]
    pub fn selected(&self) -> &[Choice] {
        &self.selected
    }

    /// Add a candidate. Eligibility is checked against the current state.
    pub fn select(&mut self, game: &Game, choice: Choice) -> Result<(), SelectionError> {
        if !self.request.candidates.contains(&choice) {
            return Err(SelectionError::NotACandidate(choice));
        }
        if self.selected.contains(&choice) {
            return Err(SelectionError::AlreadySelected(choice));
        }
        if self.selected.len() >= self.request.max {
            return Err(SelectionError::TooMany {
                max: self.request.max,
            });
        }
        if !self.request.is_eligible(game, &choice) {
            return Err(SelectionError::Ineligible(choice));
        }
        self.selected.push(choice);
        Ok(())
    }

    pub fn deselect(&mut self, choice: Choice) -> Result<(), SelectionError> {
        match self.selected.iter().position(|c| *c == choice) {
            Some(index) => {
                self.selected.remove(index);
                Ok(())
            }
            None => Err(SelectionError::NotSelected(choice)),
        }
    }

    /// Count within bounds, every pick still eligible, and the commit rule holds.
    #[must_use]
    pub fn can_commit(&self, game: &Game) -> bool {
        let count = self.selected.len();
        count >= self.request.min
            && count <= self.request.max
            && self
                .selected
                .iter()
                .all(|c| self.request.is_eligible(game, c))
            && self
                .request
                .commit
                .as_ref()
                .map_or(true, |f| f(game, &self.selected))
    }

    /// What a provider gets to look at.
    #[must_use]
    pub fn view(&self, game: &Game) -> InteractionView<'_> {
        InteractionView {
            id: self.id,
            player: self.request.player,
            kind: self.request.kind,
            prompt: &self.request.prompt,
            source: self.request.source,
            candidates: &self.request.candidates,
            eligible: self.request.eligible(game),
            selected: &self.selected,
            min: self.request.min,
            max: self.request.max,
            can_commit: self.can_commit(game),
        }
    }
}

/// Read-only snapshot of an open request handed to a choice provider.
#[derive(Clone, Debug)]
pub struct InteractionView<'a> {
    pub id: InteractionId,
    pub player: PlayerId,
    pub kind: InteractionKind,
    pub prompt: &'a str,
    pub source: Option<EntityId>,
    pub candidates: &'a [Choice],
    /// Candidates selectable right now.
    pub eligible: Vec<Choice>,
    pub selected: &'a [Choice],
    pub min: usize,
    pub max: usize,
    pub can_commit: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionOutcome {
    Committed,
    /// No commit before the timeout; the fallback was used.
    TimedOut,
}

/// Log entry for one opened request. Together with the seed, the log
/// replays a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: InteractionId,
    pub player: PlayerId,
    pub kind: InteractionKind,
    pub outcome: InteractionOutcome,
    /// Final selection handed back to resolution.
    pub selection: Vec<Choice>,
    pub polls: u32,
}
