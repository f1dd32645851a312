//! The character aggregate.
//!
//! A [`Character`] owns every piece of per-character state: attributes,
//! the two pools, the action point ledger, skills and effects (wounds
//! included). Cross-pool and pool-to-wound interactions are all driven
//! from here, so no sub-object ever needs to reach back to its owner.
//!
//! Anything random takes a [`DiceRoller`], so a
//! [`crate::testing::DeterministicDiceRoller`] can replay any round.

use crate::action_points::{ActionPointError, ActionPoints};
use crate::actions::{ActionCost, ActionRequest, ActionResolver, ActionResult};
use crate::attributes::{Attribute, AttributeSet};
use crate::checks::AbilityScore;
use crate::config::RulesConfig;
use crate::currency::Currency;
use crate::damage::{vitality_damage, wound_count, DamageValue};
use crate::dice::DiceRoller;
use crate::effects::{EffectId, EffectList, EffectRecord, WoundBehavior};
use crate::modifiers::{AsModifier, ModifierSource};
use crate::pools::{PassOutCheck, Pool, PoolKind, PoolTick, Pools};
use crate::skills::{Skill, SkillError, SkillSet};
use crate::tables::{result_value, ResultValue};
use crate::time::{TimeSkip, SECONDS_PER_MINUTE};
use crate::wounds::{random_location, BodyLocation, WoundRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from character operations.
#[derive(Debug, Error)]
pub enum CharacterError {
    #[error("Insufficient XP: need {needed}, have {available}")]
    InsufficientXp { needed: i32, available: i32 },

    #[error("Cannot afford {cost}")]
    Unaffordable { cost: ActionCost },

    #[error("{0} is unconscious")]
    Unconscious(String),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Unknown effect: {0}")]
    UnknownEffect(EffectId),

    #[error("No wounds at {0}")]
    NotWounded(BodyLocation),

    #[error(transparent)]
    ActionPoints(#[from] ActionPointError),

    #[error(transparent)]
    Skill(#[from] SkillError),
}

/// Storage key of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u64);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened during one end-of-round step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundReport {
    pub fatigue: PoolTick,
    pub vitality: PoolTick,
    /// Wounds from Vitality overflow.
    pub wounds_taken: u32,
    /// True if the character passed out this round.
    pub passed_out: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub attributes: AttributeSet,
    pub pools: Pools,
    pub action_points: ActionPoints,
    pub skills: SkillSet,
    pub effects: EffectList,
    /// Toughness class; damage between classes scales by powers of ten.
    pub damage_class: i32,
    pub is_passed_out: bool,
    /// XP invested in skills so far.
    pub xp_total: i32,
    /// XP earned but not yet spent.
    pub xp_banked: i32,
    /// Seconds since the campaign epoch.
    pub game_time: i64,
    #[serde(default)]
    pub purse: Currency,
    #[serde(default)]
    pub config: RulesConfig,
}

impl Character {
    /// A fresh character with every standard skill at level 0.
    pub fn new(name: impl Into<String>, attributes: AttributeSet) -> Self {
        let pools = Pools::new(
            Pool::fatigue(
                attributes.get(Attribute::Endurance),
                attributes.get(Attribute::Willpower),
            ),
            Pool::vitality(attributes.get(Attribute::Strength)),
        );
        let action_points = ActionPoints::new(pools.fatigue.base_value, 0);
        Self {
            id: CharacterId::default(),
            name: name.into(),
            attributes,
            pools,
            action_points,
            skills: SkillSet::standard(),
            effects: EffectList::new(),
            damage_class: 1,
            is_passed_out: false,
            xp_total: 0,
            xp_banked: 0,
            game_time: 0,
            purse: Currency::default(),
            config: RulesConfig::default(),
        }
    }

    pub fn with_id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    pub fn with_config(mut self, config: RulesConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn set_config(&mut self, config: RulesConfig) {
        self.effects.set_round_seconds(config.round_seconds);
        self.config = config;
    }

    /// Re-derive pool bases and the AP ledger from attributes and XP.
    /// Current pool values are capped at the new bases.
    pub fn recalculate(&mut self) {
        let fatigue_base = self.attributes.get(Attribute::Endurance)
            + self.attributes.get(Attribute::Willpower)
            - 5;
        let vitality_base = self.attributes.get(Attribute::Strength) * 2 - 5;
        for (pool, base) in [
            (&mut self.pools.fatigue, fatigue_base),
            (&mut self.pools.vitality, vitality_base),
        ] {
            pool.base_value = base;
            pool.value = pool.value.min(base);
        }
        self.action_points.recalculate(fatigue_base, self.xp_total);
    }

    pub fn fatigue(&self) -> &Pool {
        &self.pools.fatigue
    }

    pub fn vitality(&self) -> &Pool {
        &self.pools.vitality
    }

    // ========================================================================
    // Wounds and damage
    // ========================================================================

    pub fn wounds(&self) -> Vec<WoundRecord> {
        self.effects.wound_records()
    }

    pub fn wound_count(&self) -> u32 {
        self.effects.total_wound_count()
    }

    /// One serious wound at `location`.
    pub fn take_wound(&mut self, location: BodyLocation) {
        let wound = WoundBehavior::new_wound(location, self.config.wound_bleed_rounds);
        self.effects.add_effect(wound, self.game_time, &mut self.pools);
    }

    /// `count` wounds at random locations.
    pub fn take_random_wounds<R: DiceRoller + ?Sized>(&mut self, count: u32, roller: &mut R) {
        for _ in 0..count {
            let location = random_location(roller);
            self.take_wound(location);
        }
    }

    pub fn heal_wound(&mut self, location: BodyLocation) -> Result<(), CharacterError> {
        if self
            .effects
            .update_wound(location, &mut self.pools, |w| w.heal_wound())
        {
            info!(target: "threa::wounds", character = %self.name, %location, "wound healed");
            Ok(())
        } else {
            Err(CharacterError::NotWounded(location))
        }
    }

    /// Route a hit into Fatigue, Vitality and wounds. Returns the number
    /// of wounds inflicted.
    pub fn take_damage<R: DiceRoller + ?Sized>(
        &mut self,
        damage: &DamageValue,
        roller: &mut R,
    ) -> u32 {
        let modified = damage.modified_damage(self.damage_class);
        self.pools.fatigue.add_damage(modified);
        self.pools.vitality.add_damage(vitality_damage(modified));
        let wounds = wound_count(modified);
        self.take_random_wounds(wounds, roller);
        info!(
            target: "threa::character",
            character = %self.name,
            raw = damage.damage,
            modified,
            wounds,
            "took damage"
        );
        wounds
    }

    // ========================================================================
    // Effects
    // ========================================================================

    pub fn add_effect(&mut self, effect: EffectRecord) -> Option<EffectId> {
        self.effects.add_effect(effect, self.game_time, &mut self.pools)
    }

    pub fn remove_effect(&mut self, id: EffectId) -> Result<EffectRecord, CharacterError> {
        self.effects
            .remove_effect(id, &mut self.pools)
            .ok_or(CharacterError::UnknownEffect(id))
    }

    // ========================================================================
    // Ability scores and checks
    // ========================================================================

    /// Attribute after effect modifiers.
    pub fn effective_attribute(&self, attribute: Attribute) -> i32 {
        let base = self.attributes.get(attribute);
        base + self.effects.attribute_modifiers(attribute, base).total
    }

    fn skill_attribute_value(&self, skill: &Skill) -> i32 {
        if skill.primary_attributes.is_empty() {
            return 0;
        }
        let sum: i32 = skill
            .primary_attributes
            .iter()
            .map(|a| self.effective_attribute(*a))
            .sum();
        sum / skill.primary_attributes.len() as i32
    }

    /// Penalties for running low on Fatigue or Vitality.
    fn low_pool_modifiers(&self, attribute_value: i32) -> Vec<AsModifier> {
        let mut modifiers = Vec::new();
        let fatigue = self.pools.fatigue.value;
        let fatigue_penalty = match fatigue {
            f if f < 1 => -attribute_value,
            f if f < 2 => -4,
            f if f < 4 => -2,
            f if f < 6 => -1,
            _ => 0,
        };
        if fatigue_penalty != 0 {
            modifiers.push(AsModifier::new(
                ModifierSource::LowFatigue,
                format!("Low Fatigue ({fatigue})"),
                fatigue_penalty,
            ));
        }
        let vitality = self.pools.vitality.value;
        let vitality_penalty = match vitality {
            v if v < 4 => -6,
            v if v < 6 => -4,
            _ => 0,
        };
        if vitality_penalty != 0 {
            modifiers.push(AsModifier::new(
                ModifierSource::LowVitality,
                format!("Low Vitality ({vitality})"),
                vitality_penalty,
            ));
        }
        modifiers
    }

    /// A request for `skill_name` with everything the character carries
    /// already applied: wounds, low-pool penalties, effect modifiers and the
    /// multiple-action penalty.
    pub fn build_action_request(&self, skill_name: &str) -> Result<ActionRequest, CharacterError> {
        let skill = self
            .skills
            .get(skill_name)
            .cloned()
            .ok_or_else(|| CharacterError::UnknownSkill(skill_name.to_string()))?;
        let attribute_value = self.skill_attribute_value(&skill);
        let attribute_label = skill.attribute_label();
        let base_as = attribute_value + skill.level() + crate::checks::STANDARD_OFFSET;

        // Wound effects are already counted through `wound_count`.
        let effect_modifiers = self
            .effects
            .ability_score_modifiers(&skill.name, &attribute_label, base_as)
            .modifiers
            .into_iter()
            .filter(|m| m.source != ModifierSource::Wound)
            .map(AsModifier::from);

        let mut request = ActionRequest::new(skill, attribute_label, attribute_value)
            .with_wounds(self.wound_count())
            .with_multiple_action(self.action_points.spent > 0);
        request
            .additional_modifiers
            .extend(self.low_pool_modifiers(attribute_value));
        request.additional_modifiers.extend(effect_modifiers);
        Ok(request)
    }

    pub fn ability_score(&self, skill_name: &str) -> Result<AbilityScore, CharacterError> {
        let request = self.build_action_request(skill_name)?;
        Ok(ActionResolver::new().calculate_ability_score(&request))
    }

    /// Raw check against `tv`, read off the Result Value table. A skill the
    /// character does not have yields the configured fallback RV.
    pub fn skill_check<R: DiceRoller + ?Sized>(
        &self,
        skill_name: &str,
        tv: i32,
        roller: &mut R,
    ) -> ResultValue {
        let ability_score = match self.ability_score(skill_name) {
            Ok(score) => score.value(),
            Err(_) => {
                warn!(
                    target: "threa::checks",
                    character = %self.name,
                    skill = skill_name,
                    "check against unknown skill"
                );
                return result_value(self.config.unknown_skill_result);
            }
        };
        let roll = roller.roll_4df_plus();
        let rv = ability_score + roll - tv;
        debug!(target: "threa::checks", skill = skill_name, ability_score, roll, tv, rv, "skill check");
        result_value(rv)
    }

    /// Resolve without paying. Effect SV modifiers are folded into the
    /// Ability Score, which shifts the SV by the same amount.
    pub fn resolve_action<R: DiceRoller + ?Sized>(
        &self,
        request: &ActionRequest,
        roller: &mut R,
    ) -> ActionResult {
        let mut result = ActionResolver::new().resolve(request, roller);
        let sv_modifiers = self
            .effects
            .success_value_modifiers(result.action_type, result.success_value());
        result
            .ability_score
            .extend(sv_modifiers.modifiers.into_iter().map(AsModifier::from));
        result
    }

    /// Check affordability, pay through the AP ledger and Fatigue, then
    /// resolve.
    pub fn perform_action<R: DiceRoller + ?Sized>(
        &mut self,
        mut request: ActionRequest,
        roller: &mut R,
    ) -> Result<ActionResult, CharacterError> {
        if self.is_passed_out {
            return Err(CharacterError::Unconscious(self.name.clone()));
        }
        for (what, amount) in [("AP boost", request.boost_ap), ("FAT boost", request.boost_fat)] {
            if amount < 0 {
                return Err(ActionPointError::NegativeAmount { what, amount }.into());
            }
        }
        let resolver = ActionResolver::new();
        // No mana pool: spells are never affordable here.
        if !resolver.can_afford(
            &request,
            self.action_points.available,
            self.pools.fatigue.value,
            0,
        ) {
            return Err(CharacterError::Unaffordable {
                cost: resolver.cost(&request),
            });
        }
        request.is_multiple_action |= self.action_points.spent > 0;
        let cost = resolver.cost(&request);
        self.action_points.pay(&cost, &mut self.pools.fatigue)?;

        let result = self.resolve_action(&request, roller);
        info!(
            target: "threa::actions",
            character = %self.name,
            skill = %result.skill_name,
            sv = result.success_value(),
            success = result.is_success(),
            "action performed"
        );
        Ok(result)
    }

    /// Trade action points for Fatigue healing.
    pub fn rest(&mut self, points: i32) -> Result<(), CharacterError> {
        self.action_points.rest(points, &mut self.pools.fatigue)?;
        info!(target: "threa::character", character = %self.name, points, "resting");
        Ok(())
    }

    // ========================================================================
    // Rounds and time
    // ========================================================================

    fn check_pass_out<R: DiceRoller + ?Sized>(&mut self, kind: PoolKind, roller: &mut R) -> bool {
        if self.is_passed_out {
            return false;
        }
        let passes_out = match self.pools.get(kind).pass_out_check() {
            PassOutCheck::None => false,
            PassOutCheck::Always => true,
            PassOutCheck::Focus(tv) => {
                let focus = self.config.focus_skill.clone();
                self.skill_check(&focus, tv, roller).is_success()
            }
        };
        if passes_out {
            self.is_passed_out = true;
            info!(
                target: "threa::character",
                character = %self.name,
                pool = %self.pools.get(kind),
                "passed out"
            );
        }
        passes_out
    }

    /// Pool ticks and overflow wounds. Only a pool that ticked is checked
    /// for passing out.
    fn settle_pools<R: DiceRoller + ?Sized>(&mut self, roller: &mut R) -> RoundReport {
        let mut report = RoundReport {
            fatigue: self.pools.end_of_round_fatigue(),
            ..RoundReport::default()
        };
        if report.fatigue.ran {
            report.passed_out |= self.check_pass_out(PoolKind::Fatigue, roller);
        }

        report.vitality = self.pools.end_of_round_vitality();
        if report.vitality.overflow > 0 {
            report.wounds_taken = report.vitality.overflow as u32;
            self.take_random_wounds(report.wounds_taken, roller);
        }
        if report.vitality.ran {
            report.passed_out |= self.check_pass_out(PoolKind::Vitality, roller);
        }
        report
    }

    /// Advance one combat round.
    pub fn end_of_round<R: DiceRoller + ?Sized>(&mut self, roller: &mut R) -> RoundReport {
        self.game_time += self.config.round_seconds;
        let report = self.settle_pools(roller);
        self.effects.end_of_round(self.game_time, &mut self.pools);
        self.action_points.end_of_round();
        report
    }

    /// Skip calendar time outside combat.
    pub fn process_time_skip<R: DiceRoller + ?Sized>(&mut self, skip: TimeSkip, roller: &mut R) {
        let seconds = skip.seconds();
        self.game_time += seconds;

        let hours = skip.whole_hours() as i32;
        if self.pools.vitality.value > 0 && hours > 0 {
            self.pools.vitality.add_healing(hours);
        }
        if self.pools.fatigue.value < self.pools.fatigue.base_value {
            let minutes = seconds / SECONDS_PER_MINUTE;
            let recovery = match self.pools.vitality.value {
                4 => minutes as i32,
                3 => (minutes / 30) as i32,
                2 => hours,
                _ => 0,
            };
            self.pools.fatigue.add_healing(recovery);
        }

        let expired = self.effects.process_time_skip(self.game_time, &mut self.pools);

        let rounds = skip.rounds(self.config.round_seconds);
        let simulated = rounds.min(self.config.time_skip_round_cap);
        for _ in 0..simulated {
            self.effects.end_of_round(self.game_time, &mut self.pools);
            self.settle_pools(roller);
            self.action_points.end_of_round();
        }
        if rounds > 0 {
            self.settle_pools(roller);
            self.action_points.end_of_round();
        }
        info!(
            target: "threa::time",
            character = %self.name,
            skip = %skip,
            expired,
            simulated,
            "time skipped"
        );
    }

    /// Clear the pass-out flag.
    pub fn wake_up(&mut self) {
        if self.is_passed_out {
            self.is_passed_out = false;
            info!(target: "threa::character", character = %self.name, "woke up");
        }
    }

    // ========================================================================
    // Experience
    // ========================================================================

    pub fn award_xp(&mut self, amount: i32) {
        self.xp_banked += amount.max(0);
    }

    /// Move banked XP into skills.
    pub fn spend_xp(&mut self, amount: i32) -> Result<(), CharacterError> {
        if amount > self.xp_banked {
            return Err(CharacterError::InsufficientXp {
                needed: amount,
                available: self.xp_banked,
            });
        }
        self.xp_banked -= amount;
        self.xp_total += amount;
        self.action_points
            .recalculate(self.pools.fatigue.base_value, self.xp_total);
        Ok(())
    }

    /// Undo [`Self::spend_xp`], e.g. when lowering a skill.
    pub fn refund_xp(&mut self, amount: i32) {
        self.xp_banked += amount;
        self.xp_total -= amount;
        self.action_points
            .recalculate(self.pools.fatigue.base_value, self.xp_total);
    }

    /// Buy the next level of a skill. Returns the XP spent.
    pub fn improve_skill(&mut self, skill_name: &str, with_teacher: bool) -> Result<i32, CharacterError> {
        let skill = self
            .skills
            .get(skill_name)
            .ok_or_else(|| CharacterError::UnknownSkill(skill_name.to_string()))?;
        let cost = skill.next_level_cost(with_teacher)?;
        let improved = skill.clone().with_level(skill.level() + 1)?;
        self.spend_xp(cost)?;
        info!(
            target: "threa::character",
            character = %self.name,
            skill = %improved.name,
            level = improved.level(),
            cost,
            "skill improved"
        );
        self.skills.insert(improved);
        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::TargetValue;
    use crate::effects::{ConditionBehavior, DebuffBehavior, DebuffState, PoisonBehavior, PoisonState};
    use crate::testing::{sample_character, DeterministicDiceRoller};

    #[test]
    fn test_derived_values() {
        let hero = sample_character("Aria");
        assert_eq!(hero.fatigue().base_value, 15);
        assert_eq!(hero.vitality().base_value, 15);
        assert_eq!(hero.action_points.max, 1);
        assert_eq!(hero.action_points.recovery, 3);
    }

    #[test]
    fn test_fatigue_cascade_and_focus_pass_out() {
        let mut hero = sample_character("Aria");
        hero.pools.fatigue.value = 1;
        hero.pools.fatigue.pending_damage = 5;
        // Fatigue: 1 + 1 recovered - 3 = -1, overflow 1 → 2 VIT damage
        let mut roller = DeterministicDiceRoller::new();
        let report = hero.end_of_round(&mut roller);

        assert_eq!(report.fatigue.overflow, 1);
        assert_eq!(hero.fatigue().value, 0);
        assert!(report.passed_out);
        assert!(hero.is_passed_out);
        assert_eq!(hero.vitality().value, 14);
        assert_eq!(hero.vitality().pending_damage, 1);
    }

    #[test]
    fn test_vitality_overflow_becomes_wounds() {
        let mut hero = sample_character("Aria");
        hero.pools.vitality.value = 1;
        hero.pools.vitality.pending_damage = 8;
        let mut roller = DeterministicDiceRoller::new();
        roller.queue_dice([1, 4, 6]);
        let report = hero.end_of_round(&mut roller);

        assert_eq!(report.vitality.overflow, 3);
        assert_eq!(report.wounds_taken, 3);
        assert_eq!(hero.wound_count(), 3);
        assert!(hero.effects.wound_record(BodyLocation::LeftArm).is_some());
        assert!(hero.is_passed_out);
    }

    #[test]
    fn test_focus_success_passes_character_out() {
        let mut hero = sample_character("Aria");
        hero.skills.get_mut("Focus").unwrap().set_level(6).unwrap();
        hero.pools.fatigue.value = 4;
        // Recovers to 5, which rolls Focus against TV 5.
        // Focus AS 10 + 6 - 5 = 11, minus 1 for low Fatigue.
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(0);
        hero.end_of_round(&mut roller);
        assert_eq!(hero.fatigue().value, 5);
        assert!(hero.is_passed_out);

        let mut hero = sample_character("Bram");
        hero.pools.fatigue.value = 4;
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(-3);
        hero.end_of_round(&mut roller);
        assert!(!hero.is_passed_out);
    }

    #[test]
    fn test_full_pool_skips_pass_out_check() {
        let mut hero = sample_character("Frail");
        // STR 6: Vitality 7/7 sits in the TV 5 band while full.
        hero.pools.vitality = Pool::vitality(6);
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(10);

        let report = hero.end_of_round(&mut roller);
        assert!(!report.vitality.ran);
        assert!(!hero.is_passed_out);

        hero.pools.vitality.add_damage(1);
        let report = hero.end_of_round(&mut roller);
        assert!(report.vitality.ran);
        assert_eq!(hero.vitality().value, 6);
        assert!(hero.is_passed_out);
    }

    #[test]
    fn test_take_damage_routes_channels() {
        let mut hero = sample_character("Aria");
        let mut roller = DeterministicDiceRoller::new();
        roller.queue_dice([2]);
        let wounds = hero.take_damage(&DamageValue::new(7, 1), &mut roller);
        assert_eq!(wounds, 1);
        assert_eq!(hero.fatigue().pending_damage, 7);
        assert_eq!(hero.vitality().pending_damage, 4);
        assert!(hero.effects.wound_record(BodyLocation::Torso).is_some());
    }

    #[test]
    fn test_request_carries_penalties() {
        let mut hero = sample_character("Aria");
        hero.take_wound(BodyLocation::LeftLeg);
        hero.pools.vitality.value = 5;
        hero.add_effect(DebuffBehavior::effect("Hex", &DebuffState::global(-1)));
        hero.add_effect(ConditionBehavior::effect("Prone"));

        let score = hero.ability_score("Dodge").unwrap();
        // 10 + 0 - 5 = 5; wound -2, low vitality -4, hex -1, prone -2
        assert_eq!(score.value(), -4);
        assert_eq!(
            score.modifiers.total_by_source(ModifierSource::Wound),
            -2,
            "wound counted once"
        );
    }

    #[test]
    fn test_perform_action_pays_and_flags_multiple_actions() {
        let mut hero = sample_character("Aria");
        hero.action_points.available = 3;
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(1);

        let request = hero
            .build_action_request("Physicality")
            .unwrap()
            .with_target(TargetValue::fixed(5, "Door"));
        let first = hero.perform_action(request, &mut roller).unwrap();
        assert_eq!(first.success_value(), 1);
        assert_eq!(hero.action_points.available, 2);
        assert_eq!(hero.fatigue().pending_damage, 1);

        let request = hero
            .build_action_request("Physicality")
            .unwrap()
            .with_target(TargetValue::fixed(5, "Door"));
        let second = hero.perform_action(request, &mut roller).unwrap();
        assert_eq!(second.success_value(), 0);
    }

    #[test]
    fn test_negative_boosts_are_refused() {
        let mut hero = sample_character("Aria");
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(0);
        let request = hero.build_action_request("Physicality").unwrap().with_boosts(-5, 0);
        assert!(matches!(
            hero.perform_action(request, &mut roller),
            Err(CharacterError::ActionPoints(ActionPointError::NegativeAmount { amount: -5, .. }))
        ));
        assert_eq!(hero.action_points.available, 1);
        assert_eq!(hero.action_points.spent, 0);
        assert_eq!(hero.fatigue().pending_damage, 0);

        assert!(matches!(
            hero.rest(-3),
            Err(CharacterError::ActionPoints(ActionPointError::NegativeAmount { .. }))
        ));
        assert_eq!(hero.action_points.locked, 0);
    }

    #[test]
    fn test_perform_action_refusals() {
        let mut hero = sample_character("Aria");
        hero.action_points.available = 0;
        let mut roller = DeterministicDiceRoller::new();
        let request = hero.build_action_request("Dodge").unwrap();
        assert!(matches!(
            hero.perform_action(request.clone(), &mut roller),
            Err(CharacterError::Unaffordable { .. })
        ));

        hero.is_passed_out = true;
        assert!(matches!(
            hero.perform_action(request, &mut roller),
            Err(CharacterError::Unconscious(_))
        ));
        assert!(matches!(
            hero.build_action_request("Basket Weaving"),
            Err(CharacterError::UnknownSkill(_))
        ));
    }

    #[test]
    fn test_skill_check_uses_target_value() {
        let hero = sample_character("Aria");
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(2);
        // Awareness AS 5, roll 2, TV 4
        assert_eq!(hero.skill_check("Awareness", 4, &mut roller).rv, 3);
        assert_eq!(hero.skill_check("Juggling", 4, &mut roller).rv, -10);
    }

    #[test]
    fn test_wounds_heal_away() {
        let mut hero = sample_character("Aria");
        hero.take_wound(BodyLocation::Head);
        hero.heal_wound(BodyLocation::Head).unwrap();
        hero.heal_wound(BodyLocation::Head).unwrap();
        assert_eq!(hero.wound_count(), 0);
        assert!(matches!(
            hero.heal_wound(BodyLocation::Head),
            Err(CharacterError::NotWounded(BodyLocation::Head))
        ));
    }

    #[test]
    fn test_time_skip_recovers_and_expires() {
        let mut hero = sample_character("Aria");
        hero.pools.fatigue.value = 3;
        hero.pools.vitality.value = 10;
        hero.add_effect(PoisonBehavior::effect(&PoisonState::weak()));
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(5);
        hero.process_time_skip(TimeSkip::new(crate::time::TimeSkipUnit::Hour, 2), &mut roller);

        assert_eq!(hero.game_time, 7_200);
        assert!(hero.effects.is_empty());
        assert!(hero.fatigue().value > 3);
        assert!(hero.vitality().value > 10);
    }

    #[test]
    fn test_xp_and_skill_improvement() {
        let mut hero = sample_character("Aria");
        assert!(matches!(
            hero.improve_skill("Dodge", false),
            Err(CharacterError::InsufficientXp { .. })
        ));
        hero.award_xp(100);
        let cost = hero.improve_skill("Dodge", false).unwrap();
        assert_eq!(hero.skills.get("Dodge").unwrap().level(), 1);
        assert_eq!(hero.xp_banked, 100 - cost);
        assert_eq!(hero.xp_total, cost);

        hero.refund_xp(cost);
        assert_eq!(hero.xp_banked, 100);
        assert_eq!(hero.xp_total, 0);
    }

    #[test]
    fn test_wake_up() {
        let mut hero = sample_character("Aria");
        hero.is_passed_out = true;
        hero.wake_up();
        assert!(!hero.is_passed_out);
    }
}
