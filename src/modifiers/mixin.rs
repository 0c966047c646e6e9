//! Mixins: the capability units a modifier is composed from.
//!
//! A mixin is a tagged variant, not a trait object: the engine dispatches on
//! the tag when the modifier is applied and again when it is removed. The
//! closures inside are content callbacks and are shared via `Rc`.

use std::rc::Rc;

use super::modifier::{Modifier, ModifierId};
use crate::cards::AbilityBlueprint;
use crate::core::{EntityId, EntityRef, PlayerId};
use crate::events::{EventKind, GameEvent};
use crate::game::Game;
use crate::interceptors::{
    AttributeKey, Flag, InterceptContext, InterceptOrder, InterceptorFn, Redirect, Stat,
};

/// Condition for a togglable interceptor, re-checked on every evaluation.
pub type Condition = Rc<dyn Fn(&InterceptContext<'_>) -> bool>;

/// Event handler owned by a modifier.
pub type ModifierEventHandler = Rc<dyn Fn(&mut Game, &HandlerContext, &GameEvent)>;

/// Runs when the modifier's card enters the board.
pub type EnterHandler = Rc<dyn Fn(&mut Game, &HandlerContext)>;

/// `(game, holder, candidate)`: should `candidate` be in the aura?
pub type AuraPredicate = Rc<dyn Fn(&Game, EntityId, EntityId) -> bool>;

/// Builds the modifier an aura member receives, given the aura holder.
pub type AuraGrant = Rc<dyn Fn(EntityId) -> Modifier>;

/// Who a modifier handler is running for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerContext {
    /// The entity carrying the modifier.
    pub target: EntityRef,
    pub modifier: ModifierId,
    pub source: Option<EntityId>,
}

impl HandlerContext {
    /// The carrying card, if the modifier sits on a card.
    #[must_use]
    pub fn card(&self) -> Option<EntityId> {
        self.target.as_card()
    }
}

/// A typed interceptor waiting to be registered.
#[derive(Clone)]
pub enum InterceptorSpec {
    Stat {
        stat: Stat,
        order: InterceptOrder,
        func: InterceptorFn<i64>,
    },
    Flag {
        flag: Flag,
        order: InterceptOrder,
        func: InterceptorFn<bool>,
    },
    Redirect {
        redirect: Redirect,
        order: InterceptOrder,
        func: InterceptorFn<EntityId>,
    },
}

impl InterceptorSpec {
    #[must_use]
    pub fn key(&self) -> AttributeKey {
        match self {
            InterceptorSpec::Stat { stat, .. } => (*stat).into(),
            InterceptorSpec::Flag { flag, .. } => (*flag).into(),
            InterceptorSpec::Redirect { redirect, .. } => (*redirect).into(),
        }
    }

    #[must_use]
    pub fn last(self) -> Self {
        match self {
            InterceptorSpec::Stat { stat, func, .. } => InterceptorSpec::Stat {
                stat,
                order: InterceptOrder::Last,
                func,
            },
            InterceptorSpec::Flag { flag, func, .. } => InterceptorSpec::Flag {
                flag,
                order: InterceptOrder::Last,
                func,
            },
            InterceptorSpec::Redirect { redirect, func, .. } => InterceptorSpec::Redirect {
                redirect,
                order: InterceptOrder::Last,
                func,
            },
        }
    }

    /// Same interceptor, passing values through untouched while `condition` is false.
    #[must_use]
    pub(crate) fn gated(&self, condition: &Condition) -> Self {
        match self {
            InterceptorSpec::Stat { stat, order, func } => InterceptorSpec::Stat {
                stat: *stat,
                order: *order,
                func: gate(func.clone(), condition.clone()),
            },
            InterceptorSpec::Flag { flag, order, func } => InterceptorSpec::Flag {
                flag: *flag,
                order: *order,
                func: gate(func.clone(), condition.clone()),
            },
            InterceptorSpec::Redirect {
                redirect,
                order,
                func,
            } => InterceptorSpec::Redirect {
                redirect: *redirect,
                order: *order,
                func: gate(func.clone(), condition.clone()),
            },
        }
    }
}

fn gate<V: 'static>(func: InterceptorFn<V>, condition: Condition) -> InterceptorFn<V> {
    Rc::new(move |value: V, ctx: &InterceptContext<'_>| {
        if condition(ctx) {
            func(value, ctx)
        } else {
            value
        }
    })
}

/// When a duration counts down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DurationTick {
    /// At the end of every turn.
    #[default]
    AnyTurnEnd,
    /// At the end of turns taken by the carrying entity's controller.
    ControllerTurnEnd,
}

/// Which board cards an aura looks at before asking its predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuraScope {
    /// Cards owned by the holder's owner.
    Own,
    /// Cards owned by any other player.
    Enemy,
    #[default]
    All,
}

impl AuraScope {
    #[must_use]
    pub fn admits(self, holder_owner: PlayerId, candidate_owner: PlayerId) -> bool {
        match self {
            AuraScope::Own => holder_owner == candidate_owner,
            AuraScope::Enemy => holder_owner != candidate_owner,
            AuraScope::All => true,
        }
    }
}

/// Conditional re-application of a derived modifier to a dynamic set of cards.
///
/// Membership is recomputed after any event in `refresh_on`. The default set
/// is [`EventKind::BOARD_CHANGES`]; a predicate that reads modifiers, damage
/// or keywords must also list the events that change them.
#[derive(Clone)]
pub struct Aura {
    pub scope: AuraScope,
    pub predicate: AuraPredicate,
    pub grant: AuraGrant,
    /// Whether the holder itself may be a member.
    pub include_self: bool,
    pub refresh_on: Vec<EventKind>,
}

impl Aura {
    pub fn new(
        predicate: impl Fn(&Game, EntityId, EntityId) -> bool + 'static,
        grant: impl Fn(EntityId) -> Modifier + 'static,
    ) -> Self {
        Self {
            scope: AuraScope::All,
            predicate: Rc::new(predicate),
            grant: Rc::new(grant),
            include_self: false,
            refresh_on: EventKind::BOARD_CHANGES.to_vec(),
        }
    }

    #[must_use]
    pub fn including_self(mut self) -> Self {
        self.include_self = true;
        self
    }

    #[must_use]
    pub fn scoped(mut self, scope: AuraScope) -> Self {
        self.scope = scope;
        self
    }

    /// Also recompute membership after `kind`.
    #[must_use]
    pub fn refreshed_on(mut self, kind: EventKind) -> Self {
        if !self.refresh_on.contains(&kind) {
            self.refresh_on.push(kind);
        }
        self
    }
}

/// One capability of a modifier.
#[derive(Clone)]
pub enum Mixin {
    /// Display keyword only.
    Keyword(String),
    /// One interceptor, registered for the modifier's lifetime.
    Interceptor(InterceptorSpec),
    /// Removes the modifier after `turns` ticks.
    Duration { turns: u32, tick: DurationTick },
    Aura(Aura),
    /// An interceptor that only applies while `condition` holds.
    Togglable {
        condition: Condition,
        inner: InterceptorSpec,
    },
    /// Event-bus subscription for the modifier's lifetime.
    GameEvent {
        kind: EventKind,
        handler: ModifierEventHandler,
    },
    OnEnter(EnterHandler),
    /// Adds an activatable ability to the carrying card.
    GrantAbility(Rc<AbilityBlueprint>),
}

impl Mixin {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Mixin::Keyword(keyword.into())
    }

    pub fn stat(stat: Stat, func: impl Fn(i64, &InterceptContext<'_>) -> i64 + 'static) -> Self {
        Mixin::Interceptor(InterceptorSpec::Stat {
            stat,
            order: InterceptOrder::Registration,
            func: Rc::new(func),
        })
    }

    /// `+amount` per stack.
    #[must_use]
    pub fn stat_bonus(stat: Stat, amount: i64) -> Self {
        Self::stat(stat, move |value, ctx| value + amount * ctx.stacks())
    }

    pub fn flag(flag: Flag, func: impl Fn(bool, &InterceptContext<'_>) -> bool + 'static) -> Self {
        Mixin::Interceptor(InterceptorSpec::Flag {
            flag,
            order: InterceptOrder::Registration,
            func: Rc::new(func),
        })
    }

    /// Force a flag, ignoring the incoming value.
    #[must_use]
    pub fn set_flag(flag: Flag, value: bool) -> Self {
        Self::flag(flag, move |_, _| value)
    }

    pub fn redirect(
        redirect: Redirect,
        func: impl Fn(EntityId, &InterceptContext<'_>) -> EntityId + 'static,
    ) -> Self {
        Mixin::Interceptor(InterceptorSpec::Redirect {
            redirect,
            order: InterceptOrder::Registration,
            func: Rc::new(func),
        })
    }

    /// Move an interceptor mixin to the end of its pipeline.
    #[must_use]
    pub fn last(self) -> Self {
        match self {
            Mixin::Interceptor(spec) => Mixin::Interceptor(spec.last()),
            Mixin::Togglable { condition, inner } => Mixin::Togglable {
                condition,
                inner: inner.last(),
            },
            other => other,
        }
    }

    #[must_use]
    pub fn duration(turns: u32) -> Self {
        Self::duration_on(turns, DurationTick::AnyTurnEnd)
    }

    #[must_use]
    pub fn duration_on(turns: u32, tick: DurationTick) -> Self {
        assert!(turns > 0, "A duration lasts at least one turn");
        Mixin::Duration { turns, tick }
    }

    #[must_use]
    pub fn aura(aura: Aura) -> Self {
        Mixin::Aura(aura)
    }

    /// Wrap an interceptor mixin so it only applies while `condition` holds.
    ///
    /// Panics if `inner` is not an interceptor mixin.
    pub fn togglable(
        condition: impl Fn(&InterceptContext<'_>) -> bool + 'static,
        inner: Mixin,
    ) -> Self {
        match inner {
            Mixin::Interceptor(spec) => Mixin::Togglable {
                condition: Rc::new(condition),
                inner: spec,
            },
            other => panic!("Only interceptor mixins can be toggled, got {other:?}"),
        }
    }

    pub fn on_event(
        kind: EventKind,
        handler: impl Fn(&mut Game, &HandlerContext, &GameEvent) + 'static,
    ) -> Self {
        Mixin::GameEvent {
            kind,
            handler: Rc::new(handler),
        }
    }

    pub fn on_enter(handler: impl Fn(&mut Game, &HandlerContext) + 'static) -> Self {
        Mixin::OnEnter(Rc::new(handler))
    }

    #[must_use]
    pub fn grant_ability(ability: AbilityBlueprint) -> Self {
        Mixin::GrantAbility(Rc::new(ability))
    }
}

impl std::fmt::Debug for Mixin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mixin::Keyword(k) => write!(f, "Keyword({k})"),
            Mixin::Interceptor(spec) => write!(f, "Interceptor({})", spec.key()),
            Mixin::Duration { turns, tick } => write!(f, "Duration({turns}, {tick:?})"),
            Mixin::Aura(aura) => write!(f, "Aura({:?}, include_self: {})", aura.scope, aura.include_self),
            Mixin::Togglable { inner, .. } => write!(f, "Togglable({})", inner.key()),
            Mixin::GameEvent { kind, .. } => write!(f, "GameEvent({})", kind.name()),
            Mixin::OnEnter(_) => f.write_str("OnEnter"),
            Mixin::GrantAbility(a) => write!(f, "GrantAbility({})", a.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_moves_interceptor() {
        let mixin = Mixin::stat(Stat::Atk, |v, _| v.max(0)).last();
        match mixin {
            Mixin::Interceptor(InterceptorSpec::Stat { order, .. }) => {
                assert_eq!(order, InterceptOrder::Last);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_togglable_keeps_key() {
        let mixin = Mixin::togglable(|_| true, Mixin::set_flag(Flag::CanAttack, false));
        match &mixin {
            Mixin::Togglable { inner, .. } => {
                assert_eq!(inner.key(), AttributeKey::Flag(Flag::CanAttack));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(format!("{mixin:?}"), "Togglable(canAttack)");
    }

    #[test]
    #[should_panic(expected = "Only interceptor mixins can be toggled")]
    fn test_togglable_rejects_keyword() {
        let _ = Mixin::togglable(|_| true, Mixin::keyword("Nope"));
    }
}
