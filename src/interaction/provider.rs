//! Choice providers: the pluggable answerers of interaction requests.
//!
//! A provider is polled with a read-only view of the open request and
//! replies one step at a time. It cannot touch the game, so the only thing
//! it contributes to a match is the sequence of choices it makes.

use std::collections::VecDeque;

use super::request::{Choice, InteractionKind};
use super::session::{InteractionId, InteractionOutcome, InteractionRecord, InteractionView};
use crate::core::SelectionError;
use crate::game::Game;

/// One step of a provider's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderReply {
    Select(Choice),
    Deselect(Choice),
    /// Finalize the current selection.
    Commit,
    /// No answer yet. Counts against the timeout.
    Wait,
}

/// Human input adapter or AI.
pub trait ChoiceProvider {
    fn poll(&mut self, game: &Game, view: &InteractionView<'_>) -> ProviderReply;

    /// A reply was refused by the session.
    fn rejected(&mut self, _request: InteractionId, _error: &SelectionError) {}

    /// The request closed, committed or timed out.
    fn closed(&mut self, _record: &InteractionRecord) {}
}

/// Never answers; every request times out to its fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResponse;

impl ChoiceProvider for NoResponse {
    fn poll(&mut self, _game: &Game, _view: &InteractionView<'_>) -> ProviderReply {
        ProviderReply::Wait
    }
}

/// Greedy AI: takes eligible candidates in order until it has at least one
/// (or `min`, if higher), then commits.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstEligible;

impl ChoiceProvider for FirstEligible {
    fn poll(&mut self, _game: &Game, view: &InteractionView<'_>) -> ProviderReply {
        let wanted = view.min.max(1).min(view.max);
        if view.selected.len() < wanted {
            if let Some(next) = view.eligible.iter().find(|c| !view.selected.contains(c)) {
                return ProviderReply::Select(*next);
            }
        }
        ProviderReply::Commit
    }
}

#[derive(Clone, Debug)]
struct Script {
    kind: Option<InteractionKind>,
    choices: Vec<Choice>,
}

/// Answers from a queue of prepared selections.
///
/// Each script answers the first request whose kind matches. Requests with
/// no matching script are passed (empty commit) when `min == 0` and left to
/// time out otherwise.
///
/// ```
/// use ccg_rules::core::EntityId;
/// use ccg_rules::interaction::{Choice, InteractionKind, ScriptedProvider};
///
/// let provider = ScriptedProvider::new()
///     .on(InteractionKind::Reaction, vec![Choice::Card(EntityId(8))])
///     .on(InteractionKind::Target, vec![Choice::Card(EntityId(2))]);
/// assert_eq!(provider.remaining(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedProvider {
    scripts: Vec<Script>,
    /// Request being served and the script serving it.
    serving: Option<(InteractionId, usize)>,
    cursor: usize,
    strict: bool,
}

impl ScriptedProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next request of `kind` with `choices`.
    #[must_use]
    pub fn on(mut self, kind: InteractionKind, choices: Vec<Choice>) -> Self {
        self.scripts.push(Script {
            kind: Some(kind),
            choices,
        });
        self
    }

    /// Answer the next request of any kind with `choices`.
    #[must_use]
    pub fn then(mut self, choices: Vec<Choice>) -> Self {
        self.scripts.push(Script {
            kind: None,
            choices,
        });
        self
    }

    /// Leave unscripted requests to time out instead of passing.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.scripts.len()
    }
}

impl ChoiceProvider for ScriptedProvider {
    fn poll(&mut self, _game: &Game, view: &InteractionView<'_>) -> ProviderReply {
        let script_index = match self.serving {
            Some((id, index)) if id == view.id => Some(index),
            _ => {
                let found = self
                    .scripts
                    .iter()
                    .position(|s| s.kind.map_or(true, |k| k == view.kind));
                if let Some(index) = found {
                    self.serving = Some((view.id, index));
                    self.cursor = 0;
                }
                found
            }
        };

        let Some(index) = script_index else {
            return if !self.strict && view.min == 0 {
                ProviderReply::Commit
            } else {
                ProviderReply::Wait
            };
        };

        let choices = &self.scripts[index].choices;
        while self.cursor < choices.len() {
            let next = choices[self.cursor];
            self.cursor += 1;
            if !view.selected.contains(&next) {
                return ProviderReply::Select(next);
            }
        }
        ProviderReply::Commit
    }

    fn closed(&mut self, record: &InteractionRecord) {
        if let Some((id, index)) = self.serving {
            if id == record.id {
                self.scripts.remove(index);
                self.serving = None;
                self.cursor = 0;
            }
        }
    }
}

/// Feeds back a recorded interaction log, one request at a time.
#[derive(Clone, Debug, Default)]
pub struct ReplayProvider {
    records: VecDeque<InteractionRecord>,
}

impl ReplayProvider {
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = InteractionRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.records.len()
    }
}

impl ChoiceProvider for ReplayProvider {
    fn poll(&mut self, _game: &Game, view: &InteractionView<'_>) -> ProviderReply {
        let Some(record) = self.records.front() else {
            return ProviderReply::Wait;
        };
        if record.id != view.id || record.outcome == InteractionOutcome::TimedOut {
            return ProviderReply::Wait;
        }
        match record
            .selection
            .iter()
            .find(|c| !view.selected.contains(c))
        {
            Some(next) => ProviderReply::Select(*next),
            None => ProviderReply::Commit,
        }
    }

    fn closed(&mut self, record: &InteractionRecord) {
        if self.records.front().is_some_and(|r| r.id == record.id) {
            self.records.pop_front();
        }
    }
}
