//! Wound effects. One effect per wounded location; its state is a
//! [`WoundRecord`].

use super::behavior::EffectBehavior;
use super::{EffectAddResult, EffectModifier, EffectRecord, EffectTickResult, EffectType};
use crate::modifiers::ModifierSource;
use crate::pools::Pools;
use crate::wounds::{BodyLocation, WoundRecord};
use tracing::{debug, info};

/// Ability Score penalty per wound, light or serious.
pub const PENALTY_PER_WOUND: i32 = -2;

#[derive(Debug, Clone, Copy, Default)]
pub struct WoundBehavior;

impl WoundBehavior {
    /// A Wound effect carrying `record`.
    pub fn effect(record: &WoundRecord) -> EffectRecord {
        EffectRecord::new(EffectType::Wound, format!("Wound: {}", record.location))
            .at_location(record.location)
            .with_state(record)
    }

    /// A single fresh serious wound at `location`.
    pub fn new_wound(location: BodyLocation, bleed_interval: i32) -> EffectRecord {
        let mut record = WoundRecord::with_bleed_interval(location, bleed_interval);
        record.take_wound();
        Self::effect(&record)
    }
}

/// The wound record stored on an effect, if it is a wound.
pub fn wound_record(effect: &EffectRecord) -> Option<WoundRecord> {
    if effect.effect_type != EffectType::Wound {
        return None;
    }
    effect.state::<Option<WoundRecord>>()
}

impl EffectBehavior for WoundBehavior {
    fn on_adding(
        &self,
        incoming: &mut EffectRecord,
        existing: &mut [EffectRecord],
    ) -> EffectAddResult {
        let Some(location) = incoming.location else {
            return EffectAddResult::Reject(Some("Wound needs a body location".to_string()));
        };
        let incoming_record = incoming
            .state::<Option<WoundRecord>>()
            .unwrap_or_else(|| WoundRecord::new(location));

        let same_location = existing
            .iter_mut()
            .find(|e| e.effect_type == EffectType::Wound && e.location == Some(location));
        if let Some(current) = same_location {
            let mut record = current
                .state::<Option<WoundRecord>>()
                .unwrap_or_else(|| WoundRecord::new(location));
            record.merge(&incoming_record);
            current.set_state(&record);
            info!(target: "threa::wounds", wound = %record, "wounds stacked");
            return EffectAddResult::Reject(Some(format!(
                "Added wounds to existing {location} wound effect"
            )));
        }

        // Normalize a fresh record: capacity, bleed countdown and flags.
        let mut record = WoundRecord::with_bleed_interval(location, incoming_record.bleed_interval);
        record.merge(&incoming_record);
        record.rounds_to_damage = match incoming_record.rounds_to_damage {
            r if r > 0 => r,
            _ => record.rounds_to_damage,
        };
        incoming.set_state(&record);
        info!(target: "threa::wounds", wound = %record, "new wound");
        EffectAddResult::Add
    }

    fn on_tick(&self, effect: &mut EffectRecord, pools: &mut Pools) -> EffectTickResult {
        let Some(mut record) = wound_record(effect) else {
            return EffectTickResult::Continue;
        };
        if let Some(bleed) = record.end_of_round() {
            pools.vitality.add_damage(bleed.vitality);
            pools.fatigue.add_damage(bleed.fatigue);
            debug!(
                target: "threa::wounds",
                location = %record.location,
                vitality = bleed.vitality,
                fatigue = bleed.fatigue,
                "wound bled"
            );
        }
        effect.set_state(&record);
        EffectTickResult::Continue
    }

    fn ability_score_modifiers(
        &self,
        effect: &EffectRecord,
        _skill: &str,
        _attribute: &str,
        _current_as: i32,
    ) -> Vec<EffectModifier> {
        let Some(record) = wound_record(effect) else {
            return Vec::new();
        };
        let total = record.total_wounds();
        if total == 0 {
            return Vec::new();
        }
        vec![EffectModifier::new(
            format!("Wound: {} ({total})", record.location),
            total as i32 * PENALTY_PER_WOUND,
        )
        .with_source(ModifierSource::Wound)]
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
    fn test_second_wound_merges_into_first() {
        let behavior = WoundBehavior;
        let mut first = WoundBehavior::new_wound(BodyLocation::LeftArm, 20);
        assert_eq!(behavior.on_adding(&mut first, &mut []), EffectAddResult::Add);

        let mut existing = vec![first];
        let mut second = WoundBehavior::new_wound(BodyLocation::LeftArm, 20);
        let result = behavior.on_adding(&mut second, &mut existing);
        assert!(matches!(result, EffectAddResult::Reject(_)));

        let record = wound_record(&existing[0]).unwrap();
        assert_eq!(record.serious_wounds, 2);
        assert!(record.is_crippled);
    }

    #[test]
    fn test_other_location_is_added() {
        let behavior = WoundBehavior;
        let mut existing = vec![WoundBehavior::new_wound(BodyLocation::Torso, 20)];
        let mut leg = WoundBehavior::new_wound(BodyLocation::LeftLeg, 20);
        assert_eq!(behavior.on_adding(&mut leg, &mut existing), EffectAddResult::Add);
    }

    #[test]
    fn test_missing_location_is_rejected() {
        let mut effect = EffectRecord::new(EffectType::Wound, "Wound");
        assert!(matches!(
            WoundBehavior.on_adding(&mut effect, &mut []),
            EffectAddResult::Reject(Some(_))
        ));
    }

    #[test]
    fn test_bleed_reaches_pools() {
        let mut pools = pools();
        let mut effect = WoundBehavior::new_wound(BodyLocation::Torso, 2);
        WoundBehavior.on_adding(&mut effect, &mut []);

        WoundBehavior.on_tick(&mut effect, &mut pools);
        assert_eq!(pools.vitality.pending_damage, 0);
        WoundBehavior.on_tick(&mut effect, &mut pools);
        assert_eq!(pools.vitality.pending_damage, 1);
        assert_eq!(pools.fatigue.pending_damage, 2);
    }

    #[test]
    fn test_penalty_counts_every_wound() {
        let mut record = WoundRecord::new(BodyLocation::Torso);
        record.take_wound();
        record.take_wound();
        record.heal_wound();
        let effect = WoundBehavior::effect(&record);
        let mods = WoundBehavior.ability_score_modifiers(&effect, "Dodge", "DEX", 10);
        assert_eq!(mods.len(), 1);
        assert_eq!(mods[0].value, -4);
        assert_eq!(mods[0].description, "Wound: Torso (2)");
        assert_eq!(mods[0].source, ModifierSource::Wound);
    }
}
