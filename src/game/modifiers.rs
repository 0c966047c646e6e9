//! Applying, merging and detaching modifiers.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use tracing::{trace, warn};

use super::Game;
use crate::cards::Location;
use crate::core::{EntityId, EntityRef};
use crate::events::{EventHandler, EventKind, GameEvent};
use crate::interceptors::{
    Attribute, AttributeKey, InterceptContext, InterceptOrder, InterceptorHandle, Stat,
};
use crate::modifiers::{
    ActiveModifier, Attachment, Aura, DurationTick, HandlerContext, InterceptorSpec, Mixin,
    Modifier, ModifierHost, ModifierId,
};

/// Passes before an aura refresh gives up on reaching a fixed point.
const MAX_AURA_PASSES: u32 = 16;

impl Game {
    /// Attach `modifier` to `target` and apply its mixins in order.
    ///
    /// A unique type already live on the target is not attached again: its
    /// stacks are added to the live instance, whose id is returned.
    pub fn add_modifier(&mut self, target: impl Into<EntityRef>, modifier: Modifier) -> ModifierId {
        let target = target.into();

        if modifier.unique {
            let merged = self
                .host_mut(target)
                .modifiers_mut()
                .find_unique_mut(&modifier.modifier_type)
                .map(|active| {
                    active.stacks += modifier.stacks;
                    (active.id, active.stacks)
                });
            if let Some((id, stacks)) = merged {
                trace!(%target, modifier = %id, kind = %modifier.modifier_type, stacks, "modifier stacked");
                self.emit(modifier_event(EventKind::ModifierAdded, target, id, stacks, modifier.source));
                if let EntityRef::Card(card) = target {
                    self.check_lethal(card);
                }
                return id;
            }
        }

        let id = ModifierId(self.next_modifier);
        self.next_modifier += 1;

        let mixins = modifier.mixins.clone();
        let source = modifier.source;
        let kind = modifier.modifier_type.clone();
        let stacks = modifier.stacks;
        self.host_mut(target)
            .modifiers_mut()
            .push(ActiveModifier::new(id, modifier));

        let ctx = HandlerContext {
            target,
            modifier: id,
            source,
        };
        let mut has_aura = false;
        for mixin in &mixins {
            has_aura |= matches!(mixin, Mixin::Aura(_));
            let attachment = self.attach_mixin(&ctx, mixin);
            match self
                .try_host_mut(target)
                .and_then(|h| h.modifiers_mut().get_mut(id))
            {
                Some(active) => active.attachments.push(attachment),
                None => {
                    // Removed while being applied (its target died).
                    self.detach(&ctx, attachment);
                    return id;
                }
            }
        }

        trace!(%target, modifier = %id, %kind, stacks, "modifier added");
        self.emit(modifier_event(EventKind::ModifierAdded, target, id, stacks, source));

        if has_aura {
            self.refresh_auras();
        }
        id
    }

    /// Detach a modifier, undoing its mixins in order. Returns `false` if it
    /// was not live.
    pub fn remove_modifier(&mut self, target: impl Into<EntityRef>, id: ModifierId) -> bool {
        let target = target.into();
        let Some(active) = self
            .try_host_mut(target)
            .and_then(|h| h.modifiers_mut().take(id))
        else {
            return false;
        };

        let ctx = HandlerContext {
            target,
            modifier: id,
            source: active.source,
        };
        for attachment in active.attachments {
            self.detach(&ctx, attachment);
        }

        trace!(%target, modifier = %id, kind = %active.modifier_type, "modifier removed");
        self.emit(modifier_event(EventKind::ModifierRemoved, target, id, 0, active.source));
        true
    }

    /// Take `count` stacks off a modifier; at zero the modifier is removed.
    /// Returns `false` if it was not live.
    pub fn remove_stacks(&mut self, target: impl Into<EntityRef>, id: ModifierId, count: u32) -> bool {
        let target = target.into();
        let Some(active) = self
            .try_host_mut(target)
            .and_then(|h| h.modifiers_mut().get_mut(id))
        else {
            return false;
        };

        if active.stacks > count {
            active.stacks -= count;
            let (stacks, source) = (active.stacks, active.source);
            trace!(%target, modifier = %id, stacks, "modifier unstacked");
            self.emit(modifier_event(EventKind::ModifierRemoved, target, id, stacks, source));
            if let EntityRef::Card(card) = target {
                self.check_lethal(card);
            }
            true
        } else {
            self.remove_modifier(target, id)
        }
    }

    /// Remove every live modifier of a type. Returns how many were removed.
    pub fn remove_modifiers_of_type(&mut self, target: impl Into<EntityRef>, kind: &str) -> usize {
        let target = target.into();
        let ids: Vec<ModifierId> = self
            .host(target)
            .modifiers()
            .iter()
            .filter(|m| m.modifier_type.as_str() == kind)
            .map(|m| m.id)
            .collect();
        ids.into_iter()
            .filter(|&id| self.remove_modifier(target, id))
            .count()
    }

    #[must_use]
    pub fn has_modifier_type(&self, target: impl Into<EntityRef>, kind: &str) -> bool {
        self.try_host(target.into())
            .is_some_and(|h| h.modifiers().has_type(kind))
    }

    /// Keywords of every live modifier on `target`, deduplicated.
    #[must_use]
    pub fn keywords_of(&self, target: impl Into<EntityRef>) -> Vec<String> {
        self.try_host(target.into())
            .map(|h| h.modifiers().keywords())
            .unwrap_or_default()
    }

    /// Register a free-standing interceptor, not owned by any modifier.
    pub fn add_interceptor<A: Attribute>(
        &mut self,
        target: impl Into<EntityRef>,
        attr: A,
        order: InterceptOrder,
        func: impl Fn(A::Value, &InterceptContext<'_>) -> A::Value + 'static,
    ) -> InterceptorHandle {
        let target = target.into();
        let handle = self
            .host_mut(target)
            .interceptors_mut()
            .add(attr, order, None, Rc::new(func));
        self.on_interceptor_changed(target, handle.key());
        handle
    }

    /// Undo exactly one registration. Returns `false` if it was already gone.
    pub fn remove_interceptor(&mut self, target: impl Into<EntityRef>, handle: InterceptorHandle) -> bool {
        let target = target.into();
        let removed = self
            .try_host_mut(target)
            .is_some_and(|h| h.interceptors_mut().remove(handle));
        if removed {
            self.on_interceptor_changed(target, handle.key());
        }
        removed
    }

    fn register_interceptor(
        &mut self,
        target: EntityRef,
        owner: ModifierId,
        spec: &InterceptorSpec,
    ) -> InterceptorHandle {
        let registry = self.host_mut(target).interceptors_mut();
        let handle = match spec.clone() {
            InterceptorSpec::Stat { stat, order, func } => registry.add(stat, order, Some(owner), func),
            InterceptorSpec::Flag { flag, order, func } => registry.add(flag, order, Some(owner), func),
            InterceptorSpec::Redirect {
                redirect,
                order,
                func,
            } => registry.add(redirect, order, Some(owner), func),
        };
        trace!(%target, modifier = %owner, key = %handle.key(), "interceptor registered");
        self.on_interceptor_changed(target, handle.key());
        handle
    }

    /// Derived-value hook. A lower max HP can kill on the spot.
    fn on_interceptor_changed(&mut self, target: EntityRef, key: AttributeKey) {
        if key == AttributeKey::Stat(Stat::MaxHp) {
            if let EntityRef::Card(card) = target {
                self.check_lethal(card);
            }
        }
    }

    fn attach_mixin(&mut self, ctx: &HandlerContext, mixin: &Mixin) -> Attachment {
        match mixin {
            Mixin::Keyword(_) | Mixin::GrantAbility(_) => Attachment::Inert,
            Mixin::Interceptor(spec) => {
                Attachment::Interceptor(self.register_interceptor(ctx.target, ctx.modifier, spec))
            }
            Mixin::Togglable { condition, inner } => {
                let gated = inner.gated(condition);
                Attachment::Interceptor(self.register_interceptor(ctx.target, ctx.modifier, &gated))
            }
            Mixin::Duration { turns, tick } => {
                let (target, id, tick) = (ctx.target, ctx.modifier, *tick);
                let handler: EventHandler = Rc::new(move |game: &mut Game, event: &GameEvent| {
                    game.tick_duration(target, id, tick, event);
                });
                Attachment::Duration {
                    remaining: *turns,
                    subscription: self.bus.subscribe(EventKind::TurnEnd, handler),
                }
            }
            Mixin::Aura(aura) => {
                for &kind in &aura.refresh_on {
                    *self.aura_triggers.entry(kind).or_insert(0) += 1;
                }
                Attachment::Aura {
                    members: BTreeMap::new(),
                    refresh_on: aura.refresh_on.clone(),
                }
            }
            Mixin::GameEvent { kind, handler } => {
                let (handler, ctx) = (handler.clone(), *ctx);
                let wrapped: EventHandler = Rc::new(move |game: &mut Game, event: &GameEvent| {
                    handler(game, &ctx, event);
                });
                Attachment::Subscription(self.bus.subscribe(*kind, wrapped))
            }
            Mixin::OnEnter(handler) => {
                let (handler, ctx) = (handler.clone(), *ctx);
                let wrapped: EventHandler = Rc::new(move |game: &mut Game, event: &GameEvent| {
                    let entered = event.target_card().is_some()
                        && event.target_card() == ctx.card()
                        && event.to_location() == Some(Location::Board);
                    if entered {
                        handler(game, &ctx);
                    }
                });
                Attachment::Subscription(self.bus.subscribe(EventKind::CardAfterChangeZone, wrapped))
            }
        }
    }

    fn detach(&mut self, ctx: &HandlerContext, attachment: Attachment) {
        match attachment {
            Attachment::Inert => {}
            Attachment::Interceptor(handle) => {
                self.remove_interceptor(ctx.target, handle);
            }
            Attachment::Subscription(subscription)
            | Attachment::Duration { subscription, .. } => {
                self.bus.unsubscribe(subscription);
            }
            Attachment::Aura {
                members,
                refresh_on,
            } => {
                for kind in refresh_on {
                    let emptied = self.aura_triggers.get_mut(&kind).is_some_and(|count| {
                        *count -= 1;
                        *count == 0
                    });
                    if emptied {
                        self.aura_triggers.remove(&kind);
                    }
                }
                for (member, granted) in members {
                    self.remove_stacks(member, granted, 1);
                }
            }
        }
    }

    fn tick_duration(&mut self, target: EntityRef, id: ModifierId, tick: DurationTick, event: &GameEvent) {
        if tick == DurationTick::ControllerTurnEnd
            && event.player != Some(self.controller_of(target))
        {
            return;
        }
        let Some(active) = self
            .try_host_mut(target)
            .and_then(|h| h.modifiers_mut().get_mut(id))
        else {
            return;
        };
        let expired = active.attachments.iter_mut().any(|a| match a {
            Attachment::Duration { remaining, .. } => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            _ => false,
        });
        if expired {
            trace!(%target, modifier = %id, "modifier expired");
            self.remove_modifier(target, id);
        }
    }

    // === Auras ===

    /// Recompute every aura's membership until nothing changes.
    ///
    /// Re-entrant calls (membership changes emitting board events) only mark
    /// the refresh dirty; the outer call runs another pass.
    pub(crate) fn refresh_auras(&mut self) {
        if self.aura_refreshing {
            self.aura_dirty = true;
            return;
        }
        self.aura_refreshing = true;
        let mut passes = 0;
        loop {
            self.aura_dirty = false;
            let changed = self.refresh_auras_once();
            passes += 1;
            if !changed && !self.aura_dirty {
                break;
            }
            if passes >= MAX_AURA_PASSES {
                warn!(passes, "aura membership did not settle");
                break;
            }
        }
        self.aura_refreshing = false;
    }

    /// One pass over every aura. Returns whether any membership changed.
    fn refresh_auras_once(&mut self) -> bool {
        let mut changed = false;
        for (holder, id, index, aura) in self.aura_sources() {
            let desired: BTreeSet<EntityId> = if self.card_ref(holder).on_board() {
                let owner = self.owner_of(holder);
                self.cards_on_board()
                    .filter(|&c| c != holder || aura.include_self)
                    .filter(|&c| aura.scope.admits(owner, self.owner_of(c)))
                    .filter(|&c| (aura.predicate)(self, holder, c))
                    .collect()
            } else {
                BTreeSet::new()
            };
            let Some(current) = self.aura_members(holder, id, index).cloned() else {
                continue;
            };

            for (&member, &granted) in &current {
                if !desired.contains(&member) {
                    if let Some(members) = self.aura_members_mut(holder, id, index) {
                        members.remove(&member);
                    }
                    self.remove_stacks(member, granted, 1);
                    changed = true;
                }
            }
            for &member in &desired {
                if current.contains_key(&member) {
                    continue;
                }
                // The holder may have lost the aura while earlier members changed.
                if self.aura_members(holder, id, index).is_none() {
                    break;
                }
                let mut grant = (aura.grant)(holder);
                if grant.source.is_none() {
                    grant.source = Some(holder);
                }
                let granted = self.add_modifier(member, grant);
                if let Some(members) = self.aura_members_mut(holder, id, index) {
                    members.insert(member, granted);
                } else {
                    self.remove_stacks(member, granted, 1);
                }
                changed = true;
            }
        }
        changed
    }

    /// Every aura mixin on a card: `(holder, modifier, mixin index, aura)`.
    fn aura_sources(&self) -> Vec<(EntityId, ModifierId, usize, Aura)> {
        let mut out = Vec::new();
        for card in self.cards.values() {
            for active in card.modifiers().iter() {
                for (index, mixin) in active.mixins.iter().enumerate() {
                    if let Mixin::Aura(aura) = mixin {
                        out.push((card.id, active.id, index, aura.clone()));
                    }
                }
            }
        }
        out
    }

    fn aura_members(&self, holder: EntityId, id: ModifierId, index: usize) -> Option<&BTreeMap<EntityId, ModifierId>> {
        match self.card(holder)?.modifiers().get(id)?.attachments.get(index)? {
            Attachment::Aura { members, .. } => Some(members),
            _ => None,
        }
    }

    fn aura_members_mut(
        &mut self,
        holder: EntityId,
        id: ModifierId,
        index: usize,
    ) -> Option<&mut BTreeMap<EntityId, ModifierId>> {
        let card = self.cards.get_mut(&holder)?;
        match card.modifiers_mut().get_mut(id)?.attachments.get_mut(index)? {
            Attachment::Aura { members, .. } => Some(members),
            _ => None,
        }
    }
}

fn modifier_event(
    kind: EventKind,
    target: EntityRef,
    id: ModifierId,
    stacks: u32,
    source: Option<EntityId>,
) -> GameEvent {
    let mut event = GameEvent::new(kind)
        .with_target(target)
        .with_value(i64::from(id.raw()))
        .with_value(i64::from(stacks));
    if let Some(source) = source {
        event = event.with_source(source);
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{BlueprintId, BlueprintRegistry, CardBlueprint, CardKind};
    use crate::core::{GameConfig, PlayerId};
    use crate::interceptors::Flag;

    fn game_with_minion() -> (Game, EntityId) {
        let mut registry = BlueprintRegistry::new();
        registry.register(
            CardBlueprint::new(BlueprintId::new(1), "Squire", CardKind::Minion).with_stats(1, 2),
        );
        let mut game = Game::new(GameConfig::new(), Rc::new(registry), 3);
        let card = game.create_card(BlueprintId::new(1), PlayerId::new(0), Location::Hand);
        (game, card)
    }

    #[test]
    fn test_unique_merges_and_others_stack_up() {
        let (mut game, card) = game_with_minion();

        let a = game.add_modifier(card, Modifier::new("rage").unique().with_mixin(Mixin::stat_bonus(Stat::Atk, 2)));
        let b = game.add_modifier(card, Modifier::new("rage").unique().with_mixin(Mixin::stat_bonus(Stat::Atk, 2)));
        assert_eq!(a, b);
        assert_eq!(game.modifiers_of(card).len(), 1);
        assert_eq!(game.find_modifier(card.into(), a).map(|m| m.stacks), Some(2));
        assert_eq!(game.stat(card, Stat::Atk), 1 + 4);

        let c = game.add_modifier(card, Modifier::new("whet").with_mixin(Mixin::stat_bonus(Stat::Atk, 1)));
        let d = game.add_modifier(card, Modifier::new("whet").with_mixin(Mixin::stat_bonus(Stat::Atk, 1)));
        assert_ne!(c, d);
        assert_eq!(game.modifiers_of(card).len(), 3);
        assert_eq!(game.stat(card, Stat::Atk), 7);
    }

    #[test]
    fn test_remove_stacks_then_instance() {
        let (mut game, card) = game_with_minion();
        let id = game.add_modifier(
            card,
            Modifier::new("rage").unique().with_stacks(2).with_mixin(Mixin::stat_bonus(Stat::Atk, 1)),
        );
        assert_eq!(game.stat(card, Stat::Atk), 3);

        assert!(game.remove_stacks(card, id, 1));
        assert_eq!(game.stat(card, Stat::Atk), 2);
        assert!(game.remove_stacks(card, id, 1));
        assert!(game.modifiers_of(card).is_empty());
        assert_eq!(game.stat(card, Stat::Atk), 1);
        assert!(!game.remove_stacks(card, id, 1));
    }

    #[test]
    fn test_remove_detaches_everything() {
        let (mut game, card) = game_with_minion();
        let before = game.bus.subscription_count();
        let id = game.add_modifier(
            card,
            Modifier::new("frozen")
                .with_mixin(Mixin::keyword("Frozen"))
                .with_mixin(Mixin::set_flag(Flag::CanBlock, false))
                .with_mixin(Mixin::duration(2))
                .with_mixin(Mixin::on_event(EventKind::TurnStart, |_game: &mut Game, _ctx: &HandlerContext, _e: &GameEvent| {})),
        );
        assert_eq!(game.keywords_of(card), vec!["Frozen".to_string()]);
        assert_eq!(game.bus.subscription_count(), before + 2);
        assert_eq!(game.host(card.into()).interceptors().count(Flag::CanBlock), 1);

        assert!(game.remove_modifier(card, id));
        assert!(game.keywords_of(card).is_empty());
        assert_eq!(game.bus.subscription_count(), before);
        assert!(game.host(card.into()).interceptors().is_empty());
        assert!(!game.remove_modifier(card, id));
    }

    #[test]
    fn test_duration_counts_turn_ends() {
        let (mut game, card) = game_with_minion();
        let id = game.add_modifier(card, Modifier::new("brief").with_mixin(Mixin::duration(2)));
        assert_eq!(game.find_modifier(card.into(), id).and_then(|m| m.remaining_turns()), Some(2));

        game.emit(GameEvent::new(EventKind::TurnEnd).with_player(PlayerId::new(1)));
        assert_eq!(game.find_modifier(card.into(), id).and_then(|m| m.remaining_turns()), Some(1));

        game.emit(GameEvent::new(EventKind::TurnEnd).with_player(PlayerId::new(0)));
        assert!(game.find_modifier(card.into(), id).is_none());
    }

    #[test]
    fn test_controller_duration_ignores_other_turns() {
        let (mut game, card) = game_with_minion();
        let id = game.add_modifier(
            card,
            Modifier::new("chill").with_mixin(Mixin::duration_on(1, DurationTick::ControllerTurnEnd)),
        );
        game.emit(GameEvent::new(EventKind::TurnEnd).with_player(PlayerId::new(1)));
        assert!(game.find_modifier(card.into(), id).is_some());
        game.emit(GameEvent::new(EventKind::TurnEnd).with_player(PlayerId::new(0)));
        assert!(game.find_modifier(card.into(), id).is_none());
    }

    #[test]
    fn test_togglable_follows_condition() {
        use std::cell::Cell;

        let (mut game, card) = game_with_minion();
        let enabled = Rc::new(Cell::new(false));
        let switch = enabled.clone();
        game.add_modifier(
            card,
            Modifier::new("enraged").with_mixin(Mixin::togglable(
                move |_ctx: &InterceptContext<'_>| switch.get(),
                Mixin::stat_bonus(Stat::Atk, 3),
            )),
        );
        assert_eq!(game.stat(card, Stat::Atk), 1);
        enabled.set(true);
        assert_eq!(game.stat(card, Stat::Atk), 4);
    }

    #[test]
    fn test_free_standing_interceptor() {
        let (mut game, card) = game_with_minion();
        let handle = game.add_interceptor(card, Stat::Atk, InterceptOrder::Last, |v, _| v * 10);
        game.add_modifier(card, Modifier::new("plus").with_mixin(Mixin::stat_bonus(Stat::Atk, 1)));
        assert_eq!(game.stat(card, Stat::Atk), 20);
        assert!(game.remove_interceptor(card, handle));
        assert_eq!(game.stat(card, Stat::Atk), 2);
    }
}
