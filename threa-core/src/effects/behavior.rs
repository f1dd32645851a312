//! The behavior trait and the registry that maps effect types onto it.

use super::condition::ConditionBehavior;
use super::debuff::DebuffBehavior;
use super::generic::{DefaultBehavior, GenericBehavior};
use super::poison::PoisonBehavior;
use super::wound::WoundBehavior;
use super::{EffectAddResult, EffectModifier, EffectRecord, EffectTickResult, EffectType};
use crate::actions::ActionType;
use crate::attributes::Attribute;
use crate::pools::Pools;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lifecycle hooks and modifier queries for one kind of effect.
///
/// Every method has a do-nothing default, so a behavior only overrides
/// the hooks it cares about.
pub trait EffectBehavior: Send + Sync {
    /// Called before `incoming` joins the list. `existing` holds every
    /// effect already on the character and may be modified, e.g. to merge
    /// stacks into a matching record.
    fn on_adding(
        &self,
        _incoming: &mut EffectRecord,
        _existing: &mut [EffectRecord],
    ) -> EffectAddResult {
        EffectAddResult::Add
    }

    fn on_apply(&self, _effect: &mut EffectRecord, _pools: &mut Pools) {}

    fn on_tick(&self, _effect: &mut EffectRecord, _pools: &mut Pools) -> EffectTickResult {
        EffectTickResult::Continue
    }

    fn on_expire(&self, _effect: &mut EffectRecord, _pools: &mut Pools) {}

    fn on_remove(&self, _effect: &mut EffectRecord, _pools: &mut Pools) {}

    fn attribute_modifiers(
        &self,
        _effect: &EffectRecord,
        _attribute: Attribute,
        _base: i32,
    ) -> Vec<EffectModifier> {
        Vec::new()
    }

    fn ability_score_modifiers(
        &self,
        _effect: &EffectRecord,
        _skill: &str,
        _attribute: &str,
        _current_as: i32,
    ) -> Vec<EffectModifier> {
        Vec::new()
    }

    fn success_value_modifiers(
        &self,
        _effect: &EffectRecord,
        _action_type: ActionType,
        _current_sv: i32,
    ) -> Vec<EffectModifier> {
        Vec::new()
    }
}

/// Maps [`EffectType`]s to behaviors. Unregistered types get the fallback.
#[derive(Clone)]
pub struct BehaviorRegistry {
    behaviors: HashMap<EffectType, Arc<dyn EffectBehavior>>,
    fallback: Arc<dyn EffectBehavior>,
}

impl BehaviorRegistry {
    /// Empty registry: everything resolves to [`DefaultBehavior`].
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            fallback: Arc::new(DefaultBehavior),
        }
    }

    /// The built-in table. Disease has no behavior yet and falls back.
    pub fn standard() -> Self {
        let generic: Arc<dyn EffectBehavior> = Arc::new(GenericBehavior);
        let mut registry = Self::new();
        registry.register(EffectType::Wound, Arc::new(WoundBehavior));
        registry.register(EffectType::Poison, Arc::new(PoisonBehavior));
        registry.register(EffectType::Condition, Arc::new(ConditionBehavior));
        registry.register(EffectType::Debuff, Arc::new(DebuffBehavior));
        for effect_type in [
            EffectType::Buff,
            EffectType::SpellEffect,
            EffectType::ItemEffect,
            EffectType::ObjectEffect,
            EffectType::Environmental,
        ] {
            registry.register(effect_type, generic.clone());
        }
        registry
    }

    pub fn register(&mut self, effect_type: EffectType, behavior: Arc<dyn EffectBehavior>) {
        self.behaviors.insert(effect_type, behavior);
    }

    pub fn get(&self, effect_type: EffectType) -> Arc<dyn EffectBehavior> {
        self.behaviors
            .get(&effect_type)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    pub fn is_registered(&self, effect_type: EffectType) -> bool {
        self.behaviors.contains_key(&effect_type)
    }
}

impl Default for BehaviorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.behaviors.keys().collect();
        types.sort();
        f.debug_struct("BehaviorRegistry")
            .field("registered", &types)
            .finish()
    }
}

lazy_static! {
    pub static ref STANDARD_REGISTRY: BehaviorRegistry = BehaviorRegistry::standard();
}
