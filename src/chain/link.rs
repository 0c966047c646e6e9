//! Chain links: one pending effect each.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::rc::Rc;

use crate::board::SlotId;
use crate::cards::{AbilityBlueprint, CardBlueprint};
use crate::core::{EntityId, PlayerId};
use crate::game::Game;
use crate::interaction::Choice;

/// Resolution callback of a triggered link. Receives the targets captured
/// when the link was pushed.
pub type TriggeredFn = Rc<dyn Fn(&mut Game, &[Choice])>;

/// Unique identifier for a chain link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainLinkId(pub u32);

impl std::fmt::Display for ChainLinkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChainLink({})", self.0)
    }
}

/// What a link does when it resolves.
///
/// Everything resolution needs is captured at push time (blueprints by
/// `Rc`, targets by value), so a link whose source card has left play still
/// resolves against what it captured.
#[derive(Clone)]
pub enum LinkEffect {
    PlayCard {
        card: EntityId,
        blueprint: Rc<CardBlueprint>,
        slot: Option<SlotId>,
        from_destiny: bool,
    },
    Ability {
        card: EntityId,
        index: u8,
        ability: Rc<AbilityBlueprint>,
    },
    Attack {
        attacker: EntityId,
        target: EntityId,
    },
    Triggered {
        label: String,
        resolve: TriggeredFn,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    PlayCard,
    Ability,
    Attack,
    Triggered,
}

impl LinkEffect {
    #[must_use]
    pub fn kind(&self) -> LinkKind {
        match self {
            LinkEffect::PlayCard { .. } => LinkKind::PlayCard,
            LinkEffect::Ability { .. } => LinkKind::Ability,
            LinkEffect::Attack { .. } => LinkKind::Attack,
            LinkEffect::Triggered { .. } => LinkKind::Triggered,
        }
    }

    /// Short human-readable description.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            LinkEffect::PlayCard { blueprint, .. } => blueprint.name.clone(),
            LinkEffect::Ability { ability, .. } => ability.name.clone(),
            LinkEffect::Attack { attacker, target } => format!("{attacker} attacks {target}"),
            LinkEffect::Triggered { label, .. } => label.clone(),
        }
    }
}

impl std::fmt::Debug for LinkEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkEffect::PlayCard {
                card,
                blueprint,
                slot,
                from_destiny,
            } => f
                .debug_struct("PlayCard")
                .field("card", card)
                .field("blueprint", &blueprint.id)
                .field("slot", slot)
                .field("from_destiny", from_destiny)
                .finish(),
            LinkEffect::Ability { card, index, .. } => f
                .debug_struct("Ability")
                .field("card", card)
                .field("index", index)
                .finish_non_exhaustive(),
            LinkEffect::Attack { attacker, target } => f
                .debug_struct("Attack")
                .field("attacker", attacker)
                .field("target", target)
                .finish(),
            LinkEffect::Triggered { label, .. } => f
                .debug_struct("Triggered")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

/// An entry on the effect chain.
#[derive(Clone, Debug)]
pub struct ChainLink {
    pub id: ChainLinkId,

    /// Player who made the choices for this link.
    pub controller: PlayerId,

    /// Card the effect originates from, if any.
    pub source: Option<EntityId>,

    pub effect: LinkEffect,

    /// Targets chosen before the link was pushed.
    pub targets: SmallVec<[Choice; 2]>,
}

impl ChainLink {
    /// Serializable description for observers.
    #[must_use]
    pub fn view(&self) -> ChainLinkView {
        ChainLinkView {
            id: self.id,
            controller: self.controller,
            source: self.source,
            kind: self.effect.kind(),
            label: self.effect.label(),
            targets: self.targets.to_vec(),
        }
    }
}

/// JSON-safe view of a chain link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLinkView {
    pub id: ChainLinkId,
    pub controller: PlayerId,
    pub source: Option<EntityId>,
    pub kind: LinkKind,
    pub label: String,
    pub targets: Vec<Choice>,
}
