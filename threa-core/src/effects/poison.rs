//! Poisons: periodic damage and an Ability Score penalty that both fade
//! as the poison runs its course.
//!
//! Re-applying a poison of the same name stacks it (up to `max_stacks`)
//! and restarts its clock instead of adding a second effect.

use super::behavior::EffectBehavior;
use super::{EffectAddResult, EffectModifier, EffectRecord, EffectTickResult, EffectType};
use crate::pools::Pools;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PoisonDamageType {
    #[default]
    FatigueOnly,
    VitalityOnly,
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoisonState {
    pub poison_name: String,
    pub damage_type: PoisonDamageType,
    pub base_fatigue_damage: i32,
    pub base_vitality_damage: i32,
    pub tick_interval_rounds: i32,
    pub rounds_until_next_tick: i32,
    pub total_duration_rounds: i32,
    pub elapsed_rounds: i32,
    pub base_as_penalty: i32,
    pub can_create_wounds: bool,
    /// Fraction of the duration, counted from the start, during which the
    /// poison deals extra Vitality damage.
    pub wound_threshold: f64,
    pub stacks: i32,
    pub max_stacks: i32,
}

impl Default for PoisonState {
    fn default() -> Self {
        Self {
            poison_name: "Poison".to_string(),
            damage_type: PoisonDamageType::FatigueOnly,
            base_fatigue_damage: 0,
            base_vitality_damage: 0,
            tick_interval_rounds: 10,
            rounds_until_next_tick: 0,
            total_duration_rounds: 0,
            elapsed_rounds: 0,
            base_as_penalty: 0,
            can_create_wounds: false,
            wound_threshold: 0.25,
            stacks: 1,
            max_stacks: 3,
        }
    }
}

impl PoisonState {
    pub fn weak() -> Self {
        Self {
            poison_name: "Weak Poison".to_string(),
            base_fatigue_damage: 2,
            tick_interval_rounds: 20,
            rounds_until_next_tick: 20,
            total_duration_rounds: 200,
            base_as_penalty: -1,
            ..Self::default()
        }
    }

    pub fn strong() -> Self {
        Self {
            poison_name: "Strong Poison".to_string(),
            damage_type: PoisonDamageType::VitalityOnly,
            base_vitality_damage: 2,
            tick_interval_rounds: 10,
            rounds_until_next_tick: 10,
            total_duration_rounds: 100,
            base_as_penalty: -2,
            can_create_wounds: true,
            wound_threshold: 0.25,
            ..Self::default()
        }
    }

    pub fn deadly() -> Self {
        Self {
            poison_name: "Deadly Poison".to_string(),
            damage_type: PoisonDamageType::Combined,
            base_fatigue_damage: 3,
            base_vitality_damage: 2,
            tick_interval_rounds: 5,
            rounds_until_next_tick: 5,
            total_duration_rounds: 60,
            base_as_penalty: -3,
            can_create_wounds: true,
            wound_threshold: 0.5,
            ..Self::default()
        }
    }

    pub fn sleep() -> Self {
        Self {
            poison_name: "Sleep Poison".to_string(),
            base_fatigue_damage: 4,
            tick_interval_rounds: 5,
            rounds_until_next_tick: 5,
            total_duration_rounds: 100,
            base_as_penalty: -2,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, rounds: i32) -> Self {
        self.total_duration_rounds = rounds;
        self
    }

    pub fn with_tick_interval(mut self, rounds: i32) -> Self {
        self.tick_interval_rounds = rounds;
        self.rounds_until_next_tick = rounds;
        self
    }

    /// Remaining fraction of the duration, 1.0 when unbounded.
    pub fn effectiveness(&self) -> f64 {
        if self.total_duration_rounds <= 0 {
            return 1.0;
        }
        let remaining = (self.total_duration_rounds - self.elapsed_rounds).max(0);
        remaining as f64 / self.total_duration_rounds as f64
    }

    fn scaled(&self, base: i32) -> i32 {
        ((base * self.stacks) as f64 * self.effectiveness()).ceil() as i32
    }

    pub fn current_fatigue_damage(&self) -> i32 {
        self.scaled(self.base_fatigue_damage).max(0)
    }

    pub fn current_vitality_damage(&self) -> i32 {
        self.scaled(self.base_vitality_damage).max(0)
    }

    /// Always zero or negative.
    pub fn current_as_penalty(&self) -> i32 {
        -self.scaled(self.base_as_penalty.abs())
    }

    pub fn is_in_wound_phase(&self) -> bool {
        self.can_create_wounds && self.effectiveness() >= 1.0 - self.wound_threshold
    }

    fn restart(&mut self) {
        self.elapsed_rounds = 0;
        self.rounds_until_next_tick = self.tick_interval_rounds;
    }

    fn apply_damage(&self, pools: &mut Pools) {
        let fatigue = match self.damage_type {
            PoisonDamageType::FatigueOnly | PoisonDamageType::Combined => {
                self.current_fatigue_damage()
            }
            PoisonDamageType::VitalityOnly => 0,
        };
        let mut vitality = match self.damage_type {
            PoisonDamageType::VitalityOnly | PoisonDamageType::Combined => {
                self.current_vitality_damage()
            }
            PoisonDamageType::FatigueOnly => 0,
        };
        // Early on a wounding poison hits harder, enough to push Vitality
        // into overflow and so into wounds.
        if self.is_in_wound_phase() && self.current_vitality_damage() > 0 {
            vitality += 1;
        }
        pools.fatigue.add_damage(fatigue);
        pools.vitality.add_damage(vitality);
        debug!(
            target: "threa::effects",
            poison = %self.poison_name,
            stacks = self.stacks,
            fatigue,
            vitality,
            "poison tick"
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PoisonBehavior;

impl PoisonBehavior {
    /// A Poison effect lasting the poison's full duration.
    pub fn effect(state: &PoisonState) -> EffectRecord {
        let mut effect = EffectRecord::new(EffectType::Poison, state.poison_name.clone())
            .with_state(state);
        if state.total_duration_rounds > 0 {
            effect = effect.with_duration_rounds(state.total_duration_rounds);
        }
        effect
    }
}

impl EffectBehavior for PoisonBehavior {
    fn on_adding(
        &self,
        incoming: &mut EffectRecord,
        existing: &mut [EffectRecord],
    ) -> EffectAddResult {
        let mut state: PoisonState = incoming.state();
        let same_poison = existing.iter_mut().find(|e| {
            e.effect_type == EffectType::Poison
                && e.is_active
                && e.state::<PoisonState>().poison_name == state.poison_name
        });

        if let Some(current) = same_poison {
            let mut current_state: PoisonState = current.state();
            let message = if current_state.stacks < current_state.max_stacks {
                current_state.stacks += 1;
                format!("Poison stacked to {}", current_state.stacks)
            } else {
                "Poison refreshed (max stacks)".to_string()
            };
            current_state.restart();
            current.current_stacks = current_state.stacks as u32;
            current.set_state(&current_state);
            // The restarted clock also moves the wall-clock expiry.
            if incoming.expires_at.is_some() {
                current.expires_at = incoming.expires_at;
            }
            debug!(target: "threa::effects", poison = %current_state.poison_name, %message);
            return EffectAddResult::Reject(Some(message));
        }

        if state.rounds_until_next_tick == 0 {
            state.rounds_until_next_tick = state.tick_interval_rounds;
        }
        incoming.current_stacks = state.stacks as u32;
        incoming.set_state(&state);
        EffectAddResult::Add
    }

    fn on_tick(&self, effect: &mut EffectRecord, pools: &mut Pools) -> EffectTickResult {
        let mut state: PoisonState = effect.state();
        state.elapsed_rounds += 1;
        if state.elapsed_rounds >= state.total_duration_rounds {
            effect.set_state(&state);
            return EffectTickResult::ExpireEarly("Poison has run its course".to_string());
        }

        state.rounds_until_next_tick -= 1;
        if state.rounds_until_next_tick <= 0 {
            state.apply_damage(pools);
            state.rounds_until_next_tick = state.tick_interval_rounds;
        }
        effect.set_state(&state);
        EffectTickResult::Continue
    }

    fn ability_score_modifiers(
        &self,
        effect: &EffectRecord,
        _skill: &str,
        _attribute: &str,
        _current_as: i32,
    ) -> Vec<EffectModifier> {
        let state: PoisonState = effect.state();
        let penalty = state.current_as_penalty();
        if penalty >= 0 {
            return Vec::new();
        }
        vec![EffectModifier::new(
            format!("{} ({}x)", state.poison_name, state.stacks),
            penalty,
        )]
    }
}
