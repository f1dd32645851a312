//! Data-driven behavior for buffs, spell, item, object and environmental
//! effects, plus the do-nothing fallback.

use super::behavior::EffectBehavior;
use super::{EffectModifier, EffectRecord, EffectTickResult, EffectType};
use crate::attributes::Attribute;
use crate::pools::Pools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accepts everything, does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBehavior;

impl EffectBehavior for DefaultBehavior {}

/// What a generic effect does, as plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericState {
    pub attribute_modifiers: BTreeMap<Attribute, i32>,
    /// Keyed by skill name, matched case-insensitively.
    pub skill_modifiers: BTreeMap<String, i32>,
    /// Applies to every check.
    pub as_modifier: i32,
    pub fat_damage_per_tick: i32,
    pub vit_damage_per_tick: i32,
    pub fat_healing_per_tick: i32,
    pub vit_healing_per_tick: i32,
    pub behavior_tags: Vec<String>,
}

impl GenericState {
    pub fn with_attribute_modifier(mut self, attribute: Attribute, value: i32) -> Self {
        self.attribute_modifiers.insert(attribute, value);
        self
    }

    pub fn with_skill_modifier(mut self, skill: impl Into<String>, value: i32) -> Self {
        self.skill_modifiers.insert(skill.into(), value);
        self
    }

    pub fn with_as_modifier(mut self, value: i32) -> Self {
        self.as_modifier = value;
        self
    }

    pub fn with_damage_per_tick(mut self, fatigue: i32, vitality: i32) -> Self {
        self.fat_damage_per_tick = fatigue;
        self.vit_damage_per_tick = vitality;
        self
    }

    pub fn with_healing_per_tick(mut self, fatigue: i32, vitality: i32) -> Self {
        self.fat_healing_per_tick = fatigue;
        self.vit_healing_per_tick = vitality;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.behavior_tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.behavior_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    fn skill_modifier(&self, skill: &str) -> i32 {
        self.skill_modifiers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(skill))
            .map_or(0, |(_, v)| *v)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GenericBehavior;

impl GenericBehavior {
    pub fn effect(effect_type: EffectType, name: impl Into<String>, state: &GenericState) -> EffectRecord {
        EffectRecord::new(effect_type, name).with_state(state)
    }
}

impl EffectBehavior for GenericBehavior {
    fn on_tick(&self, effect: &mut EffectRecord, pools: &mut Pools) -> EffectTickResult {
        let state: GenericState = effect.state();
        pools.fatigue.add_damage(state.fat_damage_per_tick);
        pools.vitality.add_damage(state.vit_damage_per_tick);
        pools.fatigue.add_healing(state.fat_healing_per_tick);
        pools.vitality.add_healing(state.vit_healing_per_tick);
        EffectTickResult::Continue
    }

    fn attribute_modifiers(
        &self,
        effect: &EffectRecord,
        attribute: Attribute,
        _base: i32,
    ) -> Vec<EffectModifier> {
        let state: GenericState = effect.state();
        match state.attribute_modifiers.get(&attribute) {
            Some(&value) if value != 0 => {
                vec![EffectModifier::new(effect.name.clone(), value).for_attribute(attribute)]
            }
            _ => Vec::new(),
        }
    }

    fn ability_score_modifiers(
        &self,
        effect: &EffectRecord,
        skill: &str,
        _attribute: &str,
        _current_as: i32,
    ) -> Vec<EffectModifier> {
        let state: GenericState = effect.state();
        let mut modifiers = Vec::new();
        if state.as_modifier != 0 {
            modifiers.push(EffectModifier::new(effect.name.clone(), state.as_modifier).for_skill(skill));
        }
        let skill_modifier = state.skill_modifier(skill);
        if skill_modifier != 0 {
            modifiers.push(
                EffectModifier::new(format!("{} ({skill})", effect.name), skill_modifier)
                    .for_skill(skill),
            );
        }
        modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::Pool;

    #[test]
    fn test_tick_feeds_pools() {
        let mut pools = Pools::new(Pool::fatigue(10, 10), Pool::vitality(10));
        let state = GenericState::default()
            .with_damage_per_tick(1, 0)
            .with_healing_per_tick(0, 2);
        let mut effect = GenericBehavior::effect(EffectType::Environmental, "Blizzard", &state);
        GenericBehavior.on_tick(&mut effect, &mut pools);
        assert_eq!(pools.fatigue.pending_damage, 1);
        assert_eq!(pools.vitality.pending_healing, 2);
        assert_eq!(pools.vitality.pending_damage, 0);
    }

    #[test]
    fn test_modifiers() {
        let state = GenericState::default()
            .with_attribute_modifier(Attribute::Strength, 2)
            .with_as_modifier(1)
            .with_skill_modifier("Physicality", 3);
        let effect = GenericBehavior::effect(EffectType::Buff, "Bull's Strength", &state);

        let attr = GenericBehavior.attribute_modifiers(&effect, Attribute::Strength, 10);
        assert_eq!(attr[0].value, 2);

        let mods = GenericBehavior.ability_score_modifiers(&effect, "physicality", "STR", 10);
        assert_eq!(mods.len(), 2);
        assert_eq!(mods[1].description, "Bull's Strength (physicality)");
        assert_eq!(
            GenericBehavior
                .ability_score_modifiers(&effect, "Focus", "WIL", 10)
                .len(),
            1
        );
    }

    #[test]
    fn test_tags() {
        let state = GenericState::default().with_tag("Magical");
        assert!(state.has_tag("magical"));
        assert!(!state.has_tag("mundane"));
    }
}
