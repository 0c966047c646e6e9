//! Modifier definitions and live instances.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::mixin::Mixin;
use crate::cards::AbilityBlueprint;
use crate::core::EntityId;
use crate::events::{EventKind, SubscriptionId};
use crate::interceptors::InterceptorHandle;

/// Unique identifier of a live modifier instance. Never reused within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModifierId(pub u32);

impl ModifierId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ModifierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Modifier({})", self.0)
    }
}

/// String key naming a kind of modifier ("frozen", "banner_buff", ...).
///
/// Uniqueness and lookups by type compare this key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModifierType(String);

impl ModifierType {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModifierType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ModifierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A modifier about to be applied.
///
/// ```
/// use ccg_rules::interceptors::Stat;
/// use ccg_rules::modifiers::{Mixin, Modifier};
///
/// let rage = Modifier::new("rage")
///     .unique()
///     .with_mixin(Mixin::keyword("Rage"))
///     .with_mixin(Mixin::stat_bonus(Stat::Atk, 2));
///
/// assert!(rage.unique);
/// assert_eq!(rage.stacks, 1);
/// assert_eq!(rage.mixins.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Modifier {
    pub modifier_type: ModifierType,
    /// Card that granted the modifier.
    pub source: Option<EntityId>,
    /// At most one live instance per target; reapplication adds stacks.
    pub unique: bool,
    pub stacks: u32,
    /// Applied in order on add, detached in the same order on remove.
    pub mixins: Vec<Mixin>,
}

impl Modifier {
    #[must_use]
    pub fn new(modifier_type: impl Into<String>) -> Self {
        Self {
            modifier_type: ModifierType::new(modifier_type),
            source: None,
            unique: false,
            stacks: 1,
            mixins: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    #[must_use]
    pub fn with_stacks(mut self, stacks: u32) -> Self {
        assert!(stacks > 0, "A modifier is applied with at least one stack");
        self.stacks = stacks;
        self
    }

    #[must_use]
    pub fn with_mixin(mut self, mixin: Mixin) -> Self {
        self.mixins.push(mixin);
        self
    }

    #[must_use]
    pub fn with_mixins(mut self, mixins: impl IntoIterator<Item = Mixin>) -> Self {
        self.mixins.extend(mixins);
        self
    }
}

/// Runtime bookkeeping one mixin leaves behind while attached.
#[derive(Clone, Debug)]
pub(crate) enum Attachment {
    Inert,
    Interceptor(InterceptorHandle),
    Subscription(SubscriptionId),
    Duration {
        remaining: u32,
        subscription: SubscriptionId,
    },
    /// Current members and the (possibly shared) modifier each received.
    Aura {
        members: BTreeMap<EntityId, ModifierId>,
        refresh_on: Vec<EventKind>,
    },
}

/// A modifier attached to an entity.
#[derive(Clone, Debug)]
pub struct ActiveModifier {
    pub id: ModifierId,
    pub modifier_type: ModifierType,
    pub source: Option<EntityId>,
    pub unique: bool,
    pub stacks: u32,
    pub mixins: Vec<Mixin>,
    /// Parallel to `mixins`. Filled while mixins are being applied.
    pub(crate) attachments: Vec<Attachment>,
}

impl ActiveModifier {
    pub(crate) fn new(id: ModifierId, modifier: Modifier) -> Self {
        Self {
            id,
            modifier_type: modifier.modifier_type,
            source: modifier.source,
            unique: modifier.unique,
            stacks: modifier.stacks,
            mixins: modifier.mixins,
            attachments: Vec::new(),
        }
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> + '_ {
        self.mixins.iter().filter_map(|m| match m {
            Mixin::Keyword(k) => Some(k.as_str()),
            _ => None,
        })
    }

    pub fn granted_abilities(&self) -> impl Iterator<Item = &Rc<AbilityBlueprint>> + '_ {
        self.mixins.iter().filter_map(|m| match m {
            Mixin::GrantAbility(a) => Some(a),
            _ => None,
        })
    }

    /// Turns left on the first duration mixin, if any.
    #[must_use]
    pub fn remaining_turns(&self) -> Option<u32> {
        self.attachments.iter().find_map(|a| match a {
            Attachment::Duration { remaining, .. } => Some(*remaining),
            _ => None,
        })
    }

    /// Members of this modifier's aura, if it has one.
    pub fn aura_members(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.attachments
            .iter()
            .filter_map(|a| match a {
                Attachment::Aura { members, .. } => Some(members.keys().copied()),
                _ => None,
            })
            .flatten()
    }
}
