//! The effect chain: a LIFO stack of pending links.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::link::{ChainLink, ChainLinkId, LinkEffect};
use crate::core::{EntityId, PlayerId};
use crate::interaction::Choice;

/// Observable state of the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainState {
    /// Empty, nothing resolving. Normal-speed cards may be played.
    #[default]
    Idle,
    /// Links pending, or a reaction window is offered.
    Open,
    /// A link has been popped and is resolving.
    Resolving,
}

/// The effect chain.
///
/// Only the top link is ever resolved next. Resolving a link may push new
/// links above the ones still pending, which are resolved first, so
/// processing is depth-first.
#[derive(Debug, Default)]
pub struct EffectChain {
    /// Bottom first.
    links: Vec<ChainLink>,

    /// Links popped and not yet finished (nested resolution depth).
    resolving: u32,

    window_open: bool,

    next_id: u32,

    resolved_count: u64,

    windows_opened: u64,
}

impl EffectChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ChainState {
        if self.window_open {
            ChainState::Open
        } else if self.resolving > 0 {
            ChainState::Resolving
        } else if !self.links.is_empty() {
            ChainState::Open
        } else {
            ChainState::Idle
        }
    }

    /// Something is pending or resolving. Reaction-speed cards may be played.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() != ChainState::Idle
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Pending links, bottom first.
    #[must_use]
    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    #[must_use]
    pub fn top(&self) -> Option<&ChainLink> {
        self.links.last()
    }

    /// Nesting depth of links currently resolving.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.resolving
    }

    /// Links resolved over the whole match.
    #[must_use]
    pub fn resolved_count(&self) -> u64 {
        self.resolved_count
    }

    /// Reaction windows offered over the whole match.
    #[must_use]
    pub fn windows_opened(&self) -> u64 {
        self.windows_opened
    }

    pub(crate) fn push(
        &mut self,
        controller: PlayerId,
        source: Option<EntityId>,
        effect: LinkEffect,
        targets: impl IntoIterator<Item = Choice>,
    ) -> ChainLinkId {
        let id = ChainLinkId(self.next_id);
        self.next_id += 1;
        self.links.push(ChainLink {
            id,
            controller,
            source,
            effect,
            targets: targets.into_iter().collect::<SmallVec<_>>(),
        });
        id
    }

    /// Pop the top link for resolution. Must be paired with [`Self::finish`].
    pub(crate) fn pop(&mut self) -> Option<ChainLink> {
        let link = self.links.pop()?;
        self.resolving += 1;
        Some(link)
    }

    pub(crate) fn finish(&mut self) {
        assert!(self.resolving > 0, "finish() without a resolving link");
        self.resolving -= 1;
        self.resolved_count += 1;
    }

    pub(crate) fn open_window(&mut self) {
        self.window_open = true;
        self.windows_opened += 1;
    }

    pub(crate) fn close_window(&mut self) {
        self.window_open = false;
    }

    /// Drop every pending link. Used when the match ends mid-chain.
    pub(crate) fn abandon(&mut self) -> Vec<ChainLink> {
        std::mem::take(&mut self.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn triggered(label: &str) -> LinkEffect {
        LinkEffect::Triggered {
            label: label.to_string(),
            resolve: Rc::new(|_game: &mut crate::game::Game, _targets: &[Choice]| {}),
        }
    }

    #[test]
    fn test_state_transitions() {
        let mut chain = EffectChain::new();
        assert_eq!(chain.state(), ChainState::Idle);
        assert!(!chain.is_active());

        chain.push(PlayerId::new(0), None, triggered("a"), []);
        assert_eq!(chain.state(), ChainState::Open);

        let link = chain.pop().unwrap();
        assert_eq!(link.effect.label(), "a");
        assert_eq!(chain.state(), ChainState::Resolving);

        chain.open_window();
        assert_eq!(chain.state(), ChainState::Open);
        chain.close_window();

        chain.finish();
        assert_eq!(chain.state(), ChainState::Idle);
        assert_eq!(chain.resolved_count(), 1);
        assert_eq!(chain.windows_opened(), 1);
    }

    #[test]
    fn test_lifo_order() {
        let mut chain = EffectChain::new();
        let first = chain.push(PlayerId::new(0), None, triggered("first"), []);
        let second = chain.push(
            PlayerId::new(1),
            Some(EntityId(7)),
            triggered("second"),
            [Choice::Card(EntityId(3))],
        );
        assert_ne!(first, second);
        assert_eq!(chain.top().map(|l| l.id), Some(second));

        let top = chain.pop().unwrap();
        assert_eq!(top.id, second);
        assert_eq!(top.targets.as_slice(), &[Choice::Card(EntityId(3))]);
        chain.finish();

        assert_eq!(chain.pop().unwrap().id, first);
        chain.finish();
        assert!(chain.pop().is_none());
    }

    #[test]
    fn test_view() {
        let mut chain = EffectChain::new();
        chain.push(
            PlayerId::new(0),
            Some(EntityId(1)),
            LinkEffect::Attack {
                attacker: EntityId(1),
                target: EntityId(2),
            },
            [],
        );
        let view = chain.top().unwrap().view();
        assert_eq!(view.kind, super::super::LinkKind::Attack);
        assert_eq!(view.label, "Entity(1) attacks Entity(2)");

        let json = serde_json::to_string(&view).unwrap();
        let back: super::super::ChainLinkView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    #[should_panic(expected = "without a resolving link")]
    fn test_finish_without_pop() {
        EffectChain::new().finish();
    }
}
