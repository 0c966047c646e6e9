//! Recoverable error types.
//!
//! Only two kinds of failure are recoverable: an illegal player action
//! (refused before anything mutates) and a refused interaction candidate
//! (reported back to the choice provider). Broken invariants panic.

use thiserror::Error;

use super::entity::EntityId;
use super::player::PlayerId;
use crate::board::SlotId;
use crate::interaction::Choice;

/// Why a submitted action was refused. No state has changed when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("the match is over")]
    GameOver,

    #[error("the match has not started")]
    NotStarted,

    #[error("{0} cannot act: it is not their turn")]
    NotYourTurn(PlayerId),

    #[error("actions are locked while the effect chain or combat is resolving")]
    ResolutionInProgress,

    #[error("{card} is not in {player}'s hand")]
    NotInHand { player: PlayerId, card: EntityId },

    #[error("{card} is not in {player}'s destiny deck")]
    NotInDestinyDeck { player: PlayerId, card: EntityId },

    #[error("{0} has already played a destiny card this turn")]
    DestinyAlreadyPlayed(PlayerId),

    #[error("{0} cannot be played right now")]
    NotPlayable(EntityId),

    #[error("not enough mana: {required} required, {available} available")]
    InsufficientMana { required: i64, available: i64 },

    #[error("{0} is not a legal summoning slot")]
    InvalidSlot(SlotId),

    #[error("no free slot to summon {0} into")]
    NoFreeSlot(EntityId),

    #[error("{0} is not on the board under the acting player's control")]
    NotControlled(EntityId),

    #[error("{0} cannot attack")]
    CannotAttack(EntityId),

    #[error("{0} is not a legal attack target")]
    InvalidAttackTarget(EntityId),

    #[error("{card} has no ability #{index}")]
    UnknownAbility { card: EntityId, index: u8 },

    #[error("ability #{index} of {card} cannot be used right now")]
    AbilityUnavailable { card: EntityId, index: u8 },
}

/// Why a candidate was refused by an interaction session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{0:?} is not a candidate for this request")]
    NotACandidate(Choice),

    #[error("{0:?} is no longer eligible")]
    Ineligible(Choice),

    #[error("{0:?} is already selected")]
    AlreadySelected(Choice),

    #[error("{0:?} is not selected")]
    NotSelected(Choice),

    #[error("at most {max} choices may be selected")]
    TooMany { max: usize },

    #[error("the selection does not satisfy the request yet")]
    CannotCommit,
}

/// Failure to decode or replay a stored match.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to decode match record: {0}")]
    Decode(#[from] bincode::Error),

    #[error("recorded action #{index} was refused on replay: {source}")]
    Action {
        index: usize,
        #[source]
        source: ActionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_messages() {
        let err = ActionError::InsufficientMana {
            required: 4,
            available: 2,
        };
        assert_eq!(err.to_string(), "not enough mana: 4 required, 2 available");

        let err = ActionError::NotYourTurn(PlayerId::new(1));
        assert_eq!(err.to_string(), "Player 1 cannot act: it is not their turn");
    }

    #[test]
    fn test_selection_error_messages() {
        let err = SelectionError::TooMany { max: 2 };
        assert_eq!(err.to_string(), "at most 2 choices may be selected");
    }
}
