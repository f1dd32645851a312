//! Named conditions. A character has any given condition at most once.

use super::behavior::EffectBehavior;
use super::{EffectAddResult, EffectModifier, EffectRecord, EffectTickResult, EffectType};
use crate::pools::Pools;

pub const STUNNED: &str = "Stunned";
pub const BLINDED: &str = "Blinded";
pub const PRONE: &str = "Prone";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionBehavior;

impl ConditionBehavior {
    pub fn effect(name: &str) -> EffectRecord {
        EffectRecord::new(EffectType::Condition, name)
    }
}

fn is(effect: &EffectRecord, condition: &str) -> bool {
    effect.name.eq_ignore_ascii_case(condition)
}

fn mentions_any(skill: &str, words: &[&str]) -> bool {
    let skill = skill.to_ascii_lowercase();
    words.iter().any(|w| skill.contains(&w.to_ascii_lowercase()))
}

impl EffectBehavior for ConditionBehavior {
    fn on_adding(
        &self,
        incoming: &mut EffectRecord,
        existing: &mut [EffectRecord],
    ) -> EffectAddResult {
        if existing
            .iter()
            .any(|e| e.is_active && e.name.eq_ignore_ascii_case(&incoming.name))
        {
            return EffectAddResult::Reject(Some("Condition already active".to_string()));
        }
        EffectAddResult::Add
    }

    fn on_apply(&self, effect: &mut EffectRecord, pools: &mut Pools) {
        if is(effect, STUNNED) {
            pools.fatigue.value = 0;
            pools.fatigue.pending_damage = 0;
        }
    }

    fn on_tick(&self, effect: &mut EffectRecord, pools: &mut Pools) -> EffectTickResult {
        if is(effect, STUNNED) {
            // Incoming Fatigue healing breaks the stun and is left to apply.
            if pools.fatigue.pending_healing > 0 {
                return EffectTickResult::ExpireEarly(
                    "Stunned broken by FAT healing".to_string(),
                );
            }
            pools.fatigue.value = 0;
        }
        EffectTickResult::Continue
    }

    fn ability_score_modifiers(
        &self,
        effect: &EffectRecord,
        skill: &str,
        _attribute: &str,
        _current_as: i32,
    ) -> Vec<EffectModifier> {
        if is(effect, BLINDED) && mentions_any(skill, &["Perception", "Awareness", "Ranged"]) {
            return vec![EffectModifier::new(BLINDED, -4).for_skill(skill)];
        }
        if is(effect, PRONE) && mentions_any(skill, &["Dodge", "Parry"]) {
            return vec![EffectModifier::new(PRONE, -2).for_skill(skill)];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pools::Pool;

    fn pools() -> Pools {
        Pools::new(Pool::fatigue(10, 10), Pool::vitality(10))
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut existing = vec![ConditionBehavior::effect(PRONE)];
        let mut again = ConditionBehavior::effect("prone");
        assert!(matches!(
            ConditionBehavior.on_adding(&mut again, &mut existing),
            EffectAddResult::Reject(Some(_))
        ));
        let mut other = ConditionBehavior::effect(BLINDED);
        assert_eq!(
            ConditionBehavior.on_adding(&mut other, &mut existing),
            EffectAddResult::Add
        );
    }

    #[test]
    fn test_stun_pins_fatigue_until_healed() {
        let mut pools = pools();
        pools.fatigue.pending_damage = 4;
        let mut stun = ConditionBehavior::effect(STUNNED);
        ConditionBehavior.on_apply(&mut stun, &mut pools);
        assert_eq!(pools.fatigue.value, 0);
        assert_eq!(pools.fatigue.pending_damage, 0);

        pools.fatigue.value = 3;
        assert_eq!(
            ConditionBehavior.on_tick(&mut stun, &mut pools),
            EffectTickResult::Continue
        );
        assert_eq!(pools.fatigue.value, 0);

        pools.fatigue.add_healing(2);
        assert!(matches!(
            ConditionBehavior.on_tick(&mut stun, &mut pools),
            EffectTickResult::ExpireEarly(_)
        ));
        assert_eq!(pools.fatigue.pending_healing, 2);
    }

    #[test]
    fn test_skill_penalties() {
        let blind = ConditionBehavior::effect(BLINDED);
        assert_eq!(
            ConditionBehavior.ability_score_modifiers(&blind, "Awareness", "ITT", 10)[0].value,
            -4
        );
        assert!(ConditionBehavior
            .ability_score_modifiers(&blind, "Dodge", "DEX", 10)
            .is_empty());

        let prone = ConditionBehavior::effect(PRONE);
        assert_eq!(
            ConditionBehavior.ability_score_modifiers(&prone, "Dodge", "DEX", 10)[0].value,
            -2
        );
    }
}
