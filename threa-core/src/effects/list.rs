//! The per-character effect collection.

use super::behavior::{BehaviorRegistry, EffectBehavior, STANDARD_REGISTRY};
use super::wound::wound_record;
use super::{
    EffectAddResult, EffectId, EffectModifier, EffectRecord, EffectTickResult, EffectType,
    ItemEffectTrigger,
};
use crate::actions::ActionType;
use crate::attributes::Attribute;
use crate::pools::Pools;
use crate::time::ROUND_SECONDS;
use crate::wounds::{BodyLocation, WoundRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Modifiers from every active effect, and their sum.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierTotal {
    pub modifiers: Vec<EffectModifier>,
    pub total: i32,
}

impl ModifierTotal {
    fn from_modifiers(modifiers: Vec<EffectModifier>) -> Self {
        let total = modifiers.iter().map(|m| m.value).sum();
        Self { modifiers, total }
    }
}

fn default_round_seconds() -> i64 {
    ROUND_SECONDS
}

/// Effects on one character, in the order they were added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectList {
    effects: Vec<EffectRecord>,
    /// Converts `duration_rounds` into an expiry time.
    #[serde(default = "default_round_seconds")]
    round_seconds: i64,
    #[serde(skip)]
    registry: Option<Arc<BehaviorRegistry>>,
}

impl Default for EffectList {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectList {
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
            round_seconds: ROUND_SECONDS,
            registry: None,
        }
    }

    /// Use `registry` instead of [`STANDARD_REGISTRY`].
    pub fn with_registry(mut self, registry: Arc<BehaviorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn set_registry(&mut self, registry: Arc<BehaviorRegistry>) {
        self.registry = Some(registry);
    }

    pub fn set_round_seconds(&mut self, seconds: i64) {
        self.round_seconds = seconds.max(1);
    }

    pub fn round_seconds(&self) -> i64 {
        self.round_seconds
    }

    fn behavior(&self, effect_type: EffectType) -> Arc<dyn EffectBehavior> {
        match &self.registry {
            Some(registry) => registry.get(effect_type),
            None => STANDARD_REGISTRY.get(effect_type),
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn iter(&self) -> impl Iterator<Item = &EffectRecord> {
        self.effects.iter()
    }

    pub fn active(&self) -> impl Iterator<Item = &EffectRecord> {
        self.effects.iter().filter(|e| e.is_active)
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, id: EffectId) -> Option<&EffectRecord> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&EffectRecord> {
        self.effects.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn has_effect(&self, effect_type: EffectType) -> bool {
        self.active().any(|e| e.effect_type == effect_type)
    }

    pub fn has_named(&self, name: &str) -> bool {
        self.active().any(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn of_type(&self, effect_type: EffectType) -> impl Iterator<Item = &EffectRecord> {
        self.active().filter(move |e| e.effect_type == effect_type)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Add an effect at game time `now`. Returns the id of the effect that
    /// was added, or `None` when the behavior rejected it (possibly after
    /// merging it into an existing effect).
    pub fn add_effect(
        &mut self,
        mut effect: EffectRecord,
        now: i64,
        pools: &mut Pools,
    ) -> Option<EffectId> {
        effect.created_at = now;
        if effect.expires_at.is_none() {
            effect.expires_at = effect
                .duration_rounds
                .map(|rounds| now + i64::from(rounds) * self.round_seconds);
        }

        let behavior = self.behavior(effect.effect_type);
        match behavior.on_adding(&mut effect, &mut self.effects) {
            EffectAddResult::Add => Some(self.push_and_apply(effect, behavior.as_ref(), pools)),
            EffectAddResult::Reject(reason) => {
                info!(
                    target: "threa::effects",
                    effect = %effect.name,
                    reason = reason.as_deref().unwrap_or(""),
                    "effect not added"
                );
                None
            }
            EffectAddResult::Replace(existing) => {
                if let Some(mut old) = self.take(existing) {
                    self.behavior(old.effect_type).on_remove(&mut old, pools);
                    info!(target: "threa::effects", old = %old.name, new = %effect.name, "effect replaced");
                }
                Some(self.push_and_apply(effect, behavior.as_ref(), pools))
            }
            EffectAddResult::AddWithSideEffects(requests) => {
                let id = self.push_and_apply(effect, behavior.as_ref(), pools);
                for request in requests {
                    self.add_effect(request.into_record(), now, pools);
                }
                Some(id)
            }
        }
    }

    fn push_and_apply(
        &mut self,
        effect: EffectRecord,
        behavior: &dyn EffectBehavior,
        pools: &mut Pools,
    ) -> EffectId {
        let id = effect.id;
        info!(target: "threa::effects", effect = %effect, expires_at = ?effect.expires_at, "effect added");
        self.effects.push(effect);
        if let Some(added) = self.effects.last_mut() {
            behavior.on_apply(added, pools);
        }
        id
    }

    fn take(&mut self, id: EffectId) -> Option<EffectRecord> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    /// Remove an effect through its `on_remove` hook.
    pub fn remove_effect(&mut self, id: EffectId, pools: &mut Pools) -> Option<EffectRecord> {
        let mut effect = self.take(id)?;
        self.behavior(effect.effect_type).on_remove(&mut effect, pools);
        info!(target: "threa::effects", effect = %effect.name, "effect removed");
        Some(effect)
    }

    fn remove_where<F>(&mut self, pools: &mut Pools, predicate: F) -> Vec<EffectRecord>
    where
        F: Fn(&EffectRecord) -> bool,
    {
        let ids: Vec<EffectId> = self
            .effects
            .iter()
            .filter(|e| predicate(e))
            .map(|e| e.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.remove_effect(id, pools))
            .collect()
    }

    pub fn remove_by_name(&mut self, name: &str, pools: &mut Pools) -> Vec<EffectRecord> {
        self.remove_where(pools, |e| e.name.eq_ignore_ascii_case(name))
    }

    /// Tick every active effect once, then drop those that asked to end
    /// early (`on_remove`) or whose time ran out (`on_expire`).
    pub fn end_of_round(&mut self, now: i64, pools: &mut Pools) {
        let behaviors: Vec<_> = self
            .effects
            .iter()
            .map(|e| self.behavior(e.effect_type))
            .collect();

        let mut ended_early = Vec::new();
        let mut expired = Vec::new();
        for (effect, behavior) in self.effects.iter_mut().zip(&behaviors) {
            if !effect.is_active {
                continue;
            }
            effect.elapsed_rounds += 1;
            match behavior.on_tick(effect, pools) {
                EffectTickResult::ExpireEarly(reason) => {
                    debug!(target: "threa::effects", effect = %effect.name, %reason, "effect ended early");
                    ended_early.push(effect.id);
                }
                EffectTickResult::Continue if effect.is_expired(now) => expired.push(effect.id),
                EffectTickResult::Continue => {}
            }
        }

        for id in ended_early {
            self.remove_effect(id, pools);
        }
        for id in expired {
            self.expire(id, pools);
        }
    }

    /// Expire everything whose time is up at `now` without ticking.
    /// Returns how many effects expired.
    pub fn process_time_skip(&mut self, now: i64, pools: &mut Pools) -> usize {
        let expired: Vec<EffectId> = self
            .active()
            .filter(|e| e.is_expired(now))
            .map(|e| e.id)
            .collect();
        let count = expired.len();
        for id in expired {
            self.expire(id, pools);
        }
        count
    }

    fn expire(&mut self, id: EffectId, pools: &mut Pools) {
        if let Some(mut effect) = self.take(id) {
            self.behavior(effect.effect_type).on_expire(&mut effect, pools);
            info!(target: "threa::effects", effect = %effect.name, "effect expired");
        }
    }

    // ========================================================================
    // Modifier aggregation
    // ========================================================================

    pub fn attribute_modifiers(&self, attribute: Attribute, base: i32) -> ModifierTotal {
        let modifiers = self
            .active()
            .flat_map(|e| {
                self.behavior(e.effect_type)
                    .attribute_modifiers(e, attribute, base)
            })
            .collect();
        ModifierTotal::from_modifiers(modifiers)
    }

    pub fn ability_score_modifiers(
        &self,
        skill: &str,
        attribute: &str,
        current_as: i32,
    ) -> ModifierTotal {
        let modifiers = self
            .active()
            .flat_map(|e| {
                self.behavior(e.effect_type)
                    .ability_score_modifiers(e, skill, attribute, current_as)
            })
            .collect();
        ModifierTotal::from_modifiers(modifiers)
    }

    pub fn success_value_modifiers(&self, action_type: ActionType, current_sv: i32) -> ModifierTotal {
        let modifiers = self
            .active()
            .flat_map(|e| {
                self.behavior(e.effect_type)
                    .success_value_modifiers(e, action_type, current_sv)
            })
            .collect();
        ModifierTotal::from_modifiers(modifiers)
    }

    // ========================================================================
    // Items and concentration
    // ========================================================================

    pub fn item_effects(&self, item_id: Uuid) -> impl Iterator<Item = &EffectRecord> {
        self.effects
            .iter()
            .filter(move |e| e.source_item_id == Some(item_id))
    }

    pub fn cursed_effects_from_item(&self, item_id: Uuid) -> impl Iterator<Item = &EffectRecord> {
        self.item_effects(item_id).filter(|e| e.is_cursed)
    }

    pub fn is_item_cursed(&self, item_id: Uuid) -> bool {
        self.cursed_effects_from_item(item_id).next().is_some()
    }

    pub fn can_unequip_item(&self, item_id: Uuid) -> bool {
        !self.item_effects(item_id).any(|e| e.is_blocking_unequip())
    }

    pub fn can_drop_item(&self, item_id: Uuid) -> bool {
        !self
            .item_effects(item_id)
            .any(|e| e.is_blocking_unequip() || e.is_blocking_drop())
    }

    pub fn remove_effects_from_item(&mut self, item_id: Uuid, pools: &mut Pools) -> Vec<EffectRecord> {
        self.remove_where(pools, |e| e.source_item_id == Some(item_id))
    }

    /// Item was unequipped.
    pub fn remove_equip_effects(&mut self, item_id: Uuid, pools: &mut Pools) -> Vec<EffectRecord> {
        self.remove_where(pools, |e| {
            e.source_item_id == Some(item_id) && e.item_trigger == ItemEffectTrigger::WhileEquipped
        })
    }

    /// Item left the character's possession.
    pub fn remove_possession_effects(
        &mut self,
        item_id: Uuid,
        pools: &mut Pools,
    ) -> Vec<EffectRecord> {
        self.remove_where(pools, |e| {
            e.source_item_id == Some(item_id)
                && matches!(
                    e.item_trigger,
                    ItemEffectTrigger::WhileEquipped
                        | ItemEffectTrigger::WhilePossessed
                        | ItemEffectTrigger::OnPickup
                )
        })
    }

    /// Caster lost concentration.
    pub fn remove_concentration_effects(
        &mut self,
        caster: Uuid,
        pools: &mut Pools,
    ) -> Vec<EffectRecord> {
        self.remove_where(pools, |e| e.concentration_caster == Some(caster))
    }

    // ========================================================================
    // Wounds
    // ========================================================================

    pub fn wound_record(&self, location: BodyLocation) -> Option<WoundRecord> {
        self.of_type(EffectType::Wound)
            .find(|e| e.location == Some(location))
            .and_then(wound_record)
    }

    pub fn wound_records(&self) -> Vec<WoundRecord> {
        self.of_type(EffectType::Wound)
            .filter_map(wound_record)
            .collect()
    }

    pub fn total_wound_count(&self) -> u32 {
        self.wound_records().iter().map(|r| r.total_wounds()).sum()
    }

    /// Edit the wound record at `location` in place. A record left with no
    /// wounds is removed. Returns false when the location is unwounded.
    pub fn update_wound<F>(&mut self, location: BodyLocation, pools: &mut Pools, edit: F) -> bool
    where
        F: FnOnce(&mut WoundRecord),
    {
        let Some(effect) = self
            .effects
            .iter_mut()
            .find(|e| e.effect_type == EffectType::Wound && e.location == Some(location))
        else {
            return false;
        };
        let Some(mut record) = wound_record(effect) else {
            return false;
        };
        edit(&mut record);
        effect.set_state(&record);
        if record.total_wounds() == 0 {
            let id = effect.id;
            self.remove_effect(id, pools);
        }
        true
    }
}
