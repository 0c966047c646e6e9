//! Combat steps and the per-attack state.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};

/// One step of an attack, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatStep {
    DeclareAttacker,
    DeclareTarget,
    /// The attack link is on the chain and reactions may be pushed above it.
    BuildingChain,
    DeclareBlocker,
    /// Reaction window after blockers, before damage.
    Reactions,
    DamageResolution,
    Cleanup,
}

impl CombatStep {
    /// The step that normally follows this one.
    #[must_use]
    pub const fn next(self) -> Option<CombatStep> {
        match self {
            CombatStep::DeclareAttacker => Some(CombatStep::DeclareTarget),
            CombatStep::DeclareTarget => Some(CombatStep::BuildingChain),
            CombatStep::BuildingChain => Some(CombatStep::DeclareBlocker),
            CombatStep::DeclareBlocker => Some(CombatStep::Reactions),
            CombatStep::Reactions => Some(CombatStep::DamageResolution),
            CombatStep::DamageResolution => Some(CombatStep::Cleanup),
            CombatStep::Cleanup => None,
        }
    }

    /// Forward by one step, or straight to cleanup from anywhere.
    #[must_use]
    pub fn can_advance_to(self, to: CombatStep) -> bool {
        self.next() == Some(to) || (to == CombatStep::Cleanup && self != CombatStep::Cleanup)
    }
}

/// State of the attack currently being resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    pub attacker: EntityId,
    pub attacking_player: PlayerId,

    /// Target named when the attack was declared.
    pub declared_target: EntityId,

    /// Target after redirects and blocks.
    pub target: EntityId,

    pub blocker: Option<EntityId>,

    step: CombatStep,

    /// Damage dealt to the target and back to the attacker, once resolved.
    pub damage: Option<(i64, i64)>,
}

impl CombatState {
    #[must_use]
    pub fn new(attacker: EntityId, attacking_player: PlayerId, target: EntityId) -> Self {
        Self {
            attacker,
            attacking_player,
            declared_target: target,
            target,
            blocker: None,
            step: CombatStep::DeclareAttacker,
            damage: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> CombatStep {
        self.step
    }

    /// Move to `to`. Skipping steps other than jumping to cleanup is a bug.
    pub fn advance(&mut self, to: CombatStep) {
        assert!(
            self.step.can_advance_to(to),
            "illegal combat transition {:?} -> {:?}",
            self.step,
            to
        );
        self.step = to;
    }

    /// Whether the attack was retargeted (redirect or block).
    #[must_use]
    pub fn was_redirected(&self) -> bool {
        self.target != self.declared_target
    }
}
