//! Closed attribute keys.
//!
//! Every derived value an interceptor can touch is named here. Each key
//! family carries its own value type, so a `Stat` pipeline can only hold
//! `i64 -> i64` transformers and a `Flag` pipeline only `bool -> bool`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use super::pipeline::Pipeline;
use super::registry::InterceptorRegistry;
use crate::core::EntityId;

/// Numeric attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Atk,
    MaxHp,
    ManaCost,
    /// Damage about to be taken, after the dealer's `DamageDealt`.
    DamageReceived,
    /// Damage about to be dealt by this entity.
    DamageDealt,
    /// Player mana refill ceiling.
    MaxMana,
    AttacksPerTurn,
    Durability,
}

impl Stat {
    pub const ALL: [Stat; 8] = [
        Stat::Atk,
        Stat::MaxHp,
        Stat::ManaCost,
        Stat::DamageReceived,
        Stat::DamageDealt,
        Stat::MaxMana,
        Stat::AttacksPerTurn,
        Stat::Durability,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Stat::Atk => "atk",
            Stat::MaxHp => "maxHp",
            Stat::ManaCost => "manaCost",
            Stat::DamageReceived => "damageReceived",
            Stat::DamageDealt => "damageDealt",
            Stat::MaxMana => "maxMana",
            Stat::AttacksPerTurn => "attacksPerTurn",
            Stat::Durability => "durability",
        }
    }
}

/// Boolean permissions. Every flag defaults to the rules' own answer and
/// interceptors can only veto or grant on top of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Flag {
    CanAttack,
    CanBeAttacked,
    CanBeBlocked,
    CanBlock,
    CanRetaliate,
    CanBeTargeted,
    CanPlay,
    CanUseAbilities,
    /// Slot-level: may a minion or sigil be summoned here.
    CanSummonHere,
}

impl Flag {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Flag::CanAttack => "canAttack",
            Flag::CanBeAttacked => "canBeAttacked",
            Flag::CanBeBlocked => "canBeBlocked",
            Flag::CanBlock => "canBlock",
            Flag::CanRetaliate => "canRetaliate",
            Flag::CanBeTargeted => "canBeTargeted",
            Flag::CanPlay => "canPlay",
            Flag::CanUseAbilities => "canUseAbilities",
            Flag::CanSummonHere => "canSummonHere",
        }
    }
}

/// Entity-valued attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Redirect {
    /// Evaluated on the declared target of an attack; the result is the
    /// entity that actually gets attacked.
    AttackTarget,
}

impl Redirect {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Redirect::AttackTarget => "attackTarget",
        }
    }
}

/// Untyped attribute key, used by handles and hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AttributeKey {
    Stat(Stat),
    Flag(Flag),
    Redirect(Redirect),
}

impl AttributeKey {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AttributeKey::Stat(s) => s.name(),
            AttributeKey::Flag(f) => f.name(),
            AttributeKey::Redirect(r) => r.name(),
        }
    }
}

impl std::fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Stat> for AttributeKey {
    fn from(stat: Stat) -> Self {
        AttributeKey::Stat(stat)
    }
}

impl From<Flag> for AttributeKey {
    fn from(flag: Flag) -> Self {
        AttributeKey::Flag(flag)
    }
}

impl From<Redirect> for AttributeKey {
    fn from(redirect: Redirect) -> Self {
        AttributeKey::Redirect(redirect)
    }
}

/// A typed attribute family.
///
/// Implemented for [`Stat`], [`Flag`] and [`Redirect`] only; the registry
/// stores one pipeline map per family.
pub trait Attribute: Copy + Eq + Hash + Debug + Into<AttributeKey> + 'static {
    type Value: Clone + Debug + 'static;

    #[doc(hidden)]
    fn pipelines(registry: &InterceptorRegistry) -> &FxHashMap<Self, Pipeline<Self::Value>>;

    #[doc(hidden)]
    fn pipelines_mut(
        registry: &mut InterceptorRegistry,
    ) -> &mut FxHashMap<Self, Pipeline<Self::Value>>;
}

impl Attribute for Stat {
    type Value = i64;

    fn pipelines(registry: &InterceptorRegistry) -> &FxHashMap<Self, Pipeline<i64>> {
        &registry.stats
    }

    fn pipelines_mut(registry: &mut InterceptorRegistry) -> &mut FxHashMap<Self, Pipeline<i64>> {
        &mut registry.stats
    }
}

impl Attribute for Flag {
    type Value = bool;

    fn pipelines(registry: &InterceptorRegistry) -> &FxHashMap<Self, Pipeline<bool>> {
        &registry.flags
    }

    fn pipelines_mut(registry: &mut InterceptorRegistry) -> &mut FxHashMap<Self, Pipeline<bool>> {
        &mut registry.flags
    }
}

impl Attribute for Redirect {
    type Value = EntityId;

    fn pipelines(registry: &InterceptorRegistry) -> &FxHashMap<Self, Pipeline<EntityId>> {
        &registry.redirects
    }

    fn pipelines_mut(
        registry: &mut InterceptorRegistry,
    ) -> &mut FxHashMap<Self, Pipeline<EntityId>> {
        &mut registry.redirects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = Stat::ALL.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Stat::ALL.len());
    }

    #[test]
    fn test_key_display() {
        assert_eq!(AttributeKey::from(Stat::MaxHp).to_string(), "maxHp");
        assert_eq!(AttributeKey::from(Flag::CanAttack).to_string(), "canAttack");
        assert_eq!(
            AttributeKey::from(Redirect::AttackTarget).to_string(),
            "attackTarget"
        );
    }
}
