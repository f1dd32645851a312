//! Debuffs: flat penalties. Debuffs always stack.

use super::behavior::EffectBehavior;
use super::{EffectModifier, EffectRecord, EffectType};
use crate::attributes::Attribute;
use crate::pools::Pools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuffState {
    pub attack_penalty: i32,
    pub defense_penalty: i32,
    /// Applies to every check.
    pub global_penalty: i32,
    /// Keyed by skill name, matched case-insensitively.
    pub skill_penalties: BTreeMap<String, i32>,
    pub attribute_penalties: BTreeMap<Attribute, i32>,
}

impl DebuffState {
    pub fn global(penalty: i32) -> Self {
        Self {
            global_penalty: penalty,
            ..Self::default()
        }
    }

    pub fn with_attack_penalty(mut self, penalty: i32) -> Self {
        self.attack_penalty = penalty;
        self
    }

    pub fn with_defense_penalty(mut self, penalty: i32) -> Self {
        self.defense_penalty = penalty;
        self
    }

    pub fn with_skill_penalty(mut self, skill: impl Into<String>, penalty: i32) -> Self {
        self.skill_penalties.insert(skill.into(), penalty);
        self
    }

    pub fn with_attribute_penalty(mut self, attribute: Attribute, penalty: i32) -> Self {
        self.attribute_penalties.insert(attribute, penalty);
        self
    }

    fn skill_penalty(&self, skill: &str) -> i32 {
        self.skill_penalties
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(skill))
            .map_or(0, |(_, p)| *p)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DebuffBehavior;

impl DebuffBehavior {
    pub fn effect(name: impl Into<String>, state: &DebuffState) -> EffectRecord {
        EffectRecord::new(EffectType::Debuff, name).with_state(state)
    }
}

impl EffectBehavior for DebuffBehavior {
    fn on_apply(&self, effect: &mut EffectRecord, _pools: &mut Pools) {
        if effect.behavior_state.is_null() {
            effect.set_state(&DebuffState::default());
        }
    }

    fn attribute_modifiers(
        &self,
        effect: &EffectRecord,
        attribute: Attribute,
        _base: i32,
    ) -> Vec<EffectModifier> {
        let state: DebuffState = effect.state();
        match state.attribute_penalties.get(&attribute) {
            Some(&penalty) if penalty != 0 => vec![EffectModifier::new(
                format!("{} ({})", effect.name, attribute.abbreviation()),
                penalty,
            )
            .for_attribute(attribute)],
            _ => Vec::new(),
        }
    }

    // Attack and defense penalties apply to every check; the hook only
    // sees the skill name, not what the check is for.
    fn ability_score_modifiers(
        &self,
        effect: &EffectRecord,
        skill: &str,
        _attribute: &str,
        _current_as: i32,
    ) -> Vec<EffectModifier> {
        let state: DebuffState = effect.state();
        let candidates = [
            (effect.name.clone(), state.global_penalty),
            (format!("{} (Attack)", effect.name), state.attack_penalty),
            (format!("{} (Defense)", effect.name), state.defense_penalty),
            (format!("{} ({skill})", effect.name), state.skill_penalty(skill)),
        ];
        candidates
            .into_iter()
            .filter(|(_, value)| *value != 0)
            .map(|(description, value)| EffectModifier::new(description, value).for_skill(skill))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectAddResult;

    #[test]
    fn test_debuffs_always_stack() {
        let state = DebuffState::global(-1);
        let mut existing = vec![DebuffBehavior::effect("Curse", &state)];
        let mut again = DebuffBehavior::effect("Curse", &state);
        assert_eq!(
            DebuffBehavior.on_adding(&mut again, &mut existing),
            EffectAddResult::Add
        );
    }

    #[test]
    fn test_penalty_breakdown() {
        let state = DebuffState::global(-1)
            .with_attack_penalty(-2)
            .with_skill_penalty("Dodge", -3);
        let effect = DebuffBehavior::effect("Hex", &state);

        let mods = DebuffBehavior.ability_score_modifiers(&effect, "dodge", "DEX", 10);
        let descriptions: Vec<_> = mods.iter().map(|m| m.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Hex", "Hex (Attack)", "Hex (dodge)"]);
        assert_eq!(mods.iter().map(|m| m.value).sum::<i32>(), -6);

        let mods = DebuffBehavior.ability_score_modifiers(&effect, "Focus", "WIL", 10);
        assert_eq!(mods.len(), 2);
    }

    #[test]
    fn test_attribute_penalty() {
        let state = DebuffState::default().with_attribute_penalty(Attribute::Strength, -2);
        let effect = DebuffBehavior::effect("Weakness", &state);
        let mods = DebuffBehavior.attribute_modifiers(&effect, Attribute::Strength, 12);
        assert_eq!(mods[0].description, "Weakness (STR)");
        assert_eq!(mods[0].target_attribute, Some(Attribute::Strength));
        assert!(DebuffBehavior
            .attribute_modifiers(&effect, Attribute::Dexterity, 12)
            .is_empty());
    }
}
