//! The interaction pump.
//!
//! Effects ask players for choices through [`Game::request`], which blocks
//! the effect (not the thread) while it polls the player's
//! [`ChoiceProvider`]. Every poll re-evaluates eligibility against the live
//! game, so a candidate that stopped being legal can no longer be picked.
//!
//! ## Timeouts
//!
//! A request ends with the provider's committed selection, or with its
//! fallback once the poll budget or wall-clock deadline runs out. Either way
//! the requesting effect gets a value and resolution continues.

use std::time::Instant;

use tracing::{debug, trace, warn};

use super::Game;
use crate::core::{PlayerId, SelectionError};
use crate::events::{EventKind, GameEvent};
use crate::interaction::{
    Choice, ChoiceProvider, InteractionId, InteractionOutcome, InteractionRecord,
    InteractionRequest, InteractionSession, NoResponse, ProviderReply,
};

impl Game {
    /// Install the choice provider for `player`, replacing any previous one.
    pub fn set_provider(&mut self, player: PlayerId, provider: impl ChoiceProvider + 'static) {
        self.providers[player] = Some(Box::new(provider));
    }

    /// Remove and return `player`'s provider.
    pub fn take_provider(&mut self, player: PlayerId) -> Option<Box<dyn ChoiceProvider>> {
        self.providers[player].take()
    }

    /// Ask `request.player` for a selection and wait for it.
    ///
    /// Returns the committed selection, or `request.fallback` on timeout.
    /// An optional request with nothing eligible returns empty without
    /// being opened; a request that can't be satisfied returns the fallback.
    pub fn request(&mut self, request: InteractionRequest) -> Vec<Choice> {
        let eligible = request.eligible(self).len();
        if request.min == 0 && eligible == 0 {
            trace!(kind = ?request.kind, player = %request.player, "nothing eligible; request skipped");
            return Vec::new();
        }
        if eligible < request.min {
            debug!(
                kind = ?request.kind,
                player = %request.player,
                eligible,
                min = request.min,
                "request cannot be satisfied; using fallback"
            );
            return request.fallback.clone();
        }

        let id = InteractionId(self.next_interaction);
        self.next_interaction += 1;
        let player = request.player;
        let kind = request.kind;
        let timeout = request.timeout.unwrap_or(self.config.interaction_timeout);
        let deadline = timeout.deadline.map(|d| Instant::now() + d);

        let mut event = GameEvent::new(EventKind::InteractionOpened)
            .with_player(player)
            .with_value(i64::from(id.0));
        if let Some(source) = request.source {
            event = event.with_source(source);
        }
        self.emit(event);
        debug!(%id, %player, ?kind, "interaction opened");

        let installed = self.providers[player].take();
        let had_provider = installed.is_some();
        let mut provider: Box<dyn ChoiceProvider> = installed.unwrap_or_else(|| Box::new(NoResponse));
        let mut session = InteractionSession::new(id, request);
        let mut polls = 0;
        let mut committed = false;

        while polls < timeout.max_polls && deadline.map_or(true, |d| Instant::now() < d) {
            polls += 1;
            let reply = provider.poll(self, &session.view(self));
            let result = match reply {
                ProviderReply::Select(choice) => session.select(self, choice),
                ProviderReply::Deselect(choice) => session.deselect(choice),
                ProviderReply::Commit => {
                    if session.can_commit(self) {
                        committed = true;
                        break;
                    }
                    Err(SelectionError::CannotCommit)
                }
                ProviderReply::Wait => Ok(()),
            };
            if let Err(error) = result {
                trace!(%id, %error, "selection rejected");
                provider.rejected(id, &error);
            }
        }

        let (outcome, selection) = if committed {
            (InteractionOutcome::Committed, session.selected().to_vec())
        } else {
            warn!(%id, %player, ?kind, polls, "interaction timed out; using fallback");
            (InteractionOutcome::TimedOut, session.request.fallback.clone())
        };
        let record = InteractionRecord {
            id,
            player,
            kind,
            outcome,
            selection: selection.clone(),
            polls,
        };
        provider.closed(&record);
        self.interactions.push_back(record);
        if had_provider {
            self.providers[player] = Some(provider);
        }

        self.emit(
            GameEvent::new(EventKind::InteractionResolved)
                .with_player(player)
                .with_value(i64::from(id.0))
                .with_value(selection.len() as i64),
        );
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BlueprintId, BlueprintRegistry, CardBlueprint, CardKind, Location};
    use crate::core::{EntityId, GameConfig, Timeout};
    use crate::interaction::{FirstEligible, InteractionKind, InteractionView, ScriptedProvider};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn game() -> (Game, Vec<EntityId>) {
        let mut registry = BlueprintRegistry::new();
        registry.register(CardBlueprint::new(BlueprintId::new(1), "Pawn", CardKind::Minion).with_stats(1, 1));
        let mut game = Game::new(
            GameConfig::new().with_interaction_timeout(Timeout::polls(8)),
            Rc::new(registry),
            2,
        );
        let cards = (0..3)
            .map(|_| game.create_card(BlueprintId::new(1), PlayerId::new(0), Location::Hand))
            .collect();
        (game, cards)
    }

    fn pick(cards: &[EntityId]) -> InteractionRequest {
        InteractionRequest::new(PlayerId::new(0), InteractionKind::Target)
            .with_candidates(cards.iter().map(|&c| Choice::Card(c)))
            .with_fallback(vec![Choice::Card(cards[0])])
    }

    #[test]
    fn test_committed_selection() {
        let (mut game, cards) = game();
        game.set_provider(
            PlayerId::new(0),
            ScriptedProvider::new().on(InteractionKind::Target, vec![Choice::Card(cards[2])]),
        );

        assert_eq!(game.request(pick(&cards)), vec![Choice::Card(cards[2])]);
        let record = &game.interaction_log()[0];
        assert_eq!(record.outcome, InteractionOutcome::Committed);
        assert_eq!(record.id, InteractionId(0));
        assert!(game.take_provider(PlayerId::new(0)).is_some());
    }

    #[test]
    fn test_timeout_returns_fallback() {
        let (mut game, cards) = game();

        assert_eq!(game.request(pick(&cards)), vec![Choice::Card(cards[0])]);
        let record = &game.interaction_log()[0];
        assert_eq!(record.outcome, InteractionOutcome::TimedOut);
        assert_eq!(record.polls, 8);
        assert!(game.take_provider(PlayerId::new(0)).is_none());
    }

    #[test]
    fn test_optional_request_with_nothing_eligible_is_skipped() {
        let (mut game, cards) = game();
        let request = pick(&cards).with_count(0, 1).eligible_if(|_game: &Game, _c: &Choice| false);

        assert!(game.request(request).is_empty());
        assert!(game.interaction_log().is_empty());
    }

    #[test]
    fn test_rejections_reach_the_provider() {
        struct Stubborn {
            target: Choice,
            errors: Rc<RefCell<Vec<SelectionError>>>,
        }
        impl ChoiceProvider for Stubborn {
            fn poll(&mut self, _game: &Game, view: &InteractionView<'_>) -> ProviderReply {
                if view.selected.is_empty() {
                    ProviderReply::Select(self.target)
                } else {
                    ProviderReply::Commit
                }
            }
            fn rejected(&mut self, _request: InteractionId, error: &SelectionError) {
                self.errors.borrow_mut().push(error.clone());
            }
        }

        let (mut game, cards) = game();
        let errors = Rc::new(RefCell::new(Vec::new()));
        let banned = cards[1];
        game.set_provider(
            PlayerId::new(0),
            Stubborn {
                target: Choice::Card(banned),
                errors: errors.clone(),
            },
        );
        let request = pick(&cards).eligible_if(move |_game: &Game, c: &Choice| *c != Choice::Card(banned));

        assert_eq!(game.request(request), vec![Choice::Card(cards[0])]);
        assert_eq!(errors.borrow().len(), 8);
        assert_eq!(errors.borrow()[0], SelectionError::Ineligible(Choice::Card(banned)));
    }

    #[test]
    fn test_first_eligible_fills_minimum() {
        let (mut game, cards) = game();
        game.set_provider(PlayerId::new(0), FirstEligible);
        let request = pick(&cards).with_count(2, 3);

        assert_eq!(
            game.request(request),
            vec![Choice::Card(cards[0]), Choice::Card(cards[1])]
        );
    }
}
