//! Action resolution.
//!
//! An [`ActionRequest`] describes a single use of a skill: who is acting,
//! with what penalties and boosts, against what Target Value. The
//! [`ActionResolver`] turns it into an [`ActionResult`]:
//!
//! ```text
//! AS  = attribute + skill level - 5 + modifiers + boosts
//! RR  = AS + 4dF+
//! SV  = RR - TV
//! ```
//!
//! Paying for the action is the caller's job; see
//! [`crate::character::Character::perform_action`].

use crate::checks::{AbilityScore, TargetValue};
use crate::dice::DiceRoller;
use crate::modifiers::AsModifier;
use crate::skills::Skill;
use crate::tables::{quality_label, result_for, ResultInterpretation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Broad category of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ActionType {
    #[default]
    None,
    Attack,
    Defense,
    Spell,
    Social,
    Craft,
    Perception,
    Knowledge,
    Physical,
    Movement,
    Healing,
    Psionic,
    Theology,
    Stealth,
    Prep,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// What an action costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCost {
    pub ap: i32,
    pub fat: i32,
    pub mana: i32,
    pub boost_ap: i32,
    pub boost_fat: i32,
}

impl ActionCost {
    /// 1 AP and 1 FAT.
    pub fn standard() -> Self {
        Self {
            ap: 1,
            fat: 1,
            ..Self::default()
        }
    }

    /// 2 AP, no FAT.
    pub fn fatigue_free() -> Self {
        Self {
            ap: 2,
            ..Self::default()
        }
    }

    pub fn free() -> Self {
        Self::default()
    }

    pub fn spell(mana: i32) -> Self {
        Self {
            mana,
            ..Self::standard()
        }
    }

    pub fn with_ap_boost(mut self, amount: i32) -> Self {
        self.boost_ap += amount;
        self
    }

    pub fn with_fat_boost(mut self, amount: i32) -> Self {
        self.boost_fat += amount;
        self
    }

    pub fn total_ap(&self) -> i32 {
        self.ap + self.boost_ap
    }

    pub fn total_fat(&self) -> i32 {
        self.fat + self.boost_fat
    }

    /// +1 AS per boost point.
    pub fn boost_bonus(&self) -> i32 {
        self.boost_ap + self.boost_fat
    }

    pub fn is_free_action(&self) -> bool {
        self.ap == 0 && self.fat == 0
    }
}

impl fmt::Display for ActionCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.total_ap() > 0 {
            parts.push(format!("{} AP", self.total_ap()));
        }
        if self.total_fat() > 0 {
            parts.push(format!("{} FAT", self.total_fat()));
        }
        if self.mana > 0 {
            parts.push(format!("{} Mana", self.mana));
        }
        if self.boost_bonus() > 0 {
            parts.push(format!("+{} AS from boosts", self.boost_bonus()));
        }
        if parts.is_empty() {
            write!(f, "Free")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Everything needed to resolve one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub skill: Skill,
    pub attribute_name: String,
    pub attribute_value: i32,
    pub use_fatigue_free: bool,
    pub boost_ap: i32,
    pub boost_fat: i32,
    pub mana_cost: i32,
    pub is_multiple_action: bool,
    pub wound_count: u32,
    pub has_aimed: bool,
    pub additional_modifiers: Vec<AsModifier>,
    pub target_value: Option<TargetValue>,
    pub target_description: Option<String>,
    /// Replaces the 4dF+ roll when set.
    pub override_dice_roll: Option<i32>,
}

impl ActionRequest {
    pub fn new(skill: Skill, attribute_name: impl Into<String>, attribute_value: i32) -> Self {
        Self {
            skill,
            attribute_name: attribute_name.into(),
            attribute_value,
            use_fatigue_free: false,
            boost_ap: 0,
            boost_fat: 0,
            mana_cost: 0,
            is_multiple_action: false,
            wound_count: 0,
            has_aimed: false,
            additional_modifiers: Vec::new(),
            target_value: None,
            target_description: None,
            override_dice_roll: None,
        }
    }

    pub fn with_target(mut self, target: TargetValue) -> Self {
        self.target_value = Some(target);
        self
    }

    pub fn with_target_description(mut self, description: impl Into<String>) -> Self {
        self.target_description = Some(description.into());
        self
    }

    pub fn with_multiple_action(mut self, is_multiple: bool) -> Self {
        self.is_multiple_action = is_multiple;
        self
    }

    pub fn with_wounds(mut self, count: u32) -> Self {
        self.wound_count = count;
        self
    }

    pub fn with_aim(mut self) -> Self {
        self.has_aimed = true;
        self
    }

    pub fn with_boosts(mut self, ap: i32, fat: i32) -> Self {
        self.boost_ap = ap;
        self.boost_fat = fat;
        self
    }

    pub fn with_fatigue_free(mut self) -> Self {
        self.use_fatigue_free = true;
        self
    }

    pub fn with_mana_cost(mut self, mana: i32) -> Self {
        self.mana_cost = mana;
        self
    }

    pub fn with_modifier(mut self, modifier: AsModifier) -> Self {
        self.additional_modifiers.push(modifier);
        self
    }

    pub fn with_dice_roll(mut self, roll: i32) -> Self {
        self.override_dice_roll = Some(roll);
        self
    }
}

/// Outcome of a resolved action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub skill_name: String,
    pub action_type: ActionType,
    pub ability_score: AbilityScore,
    pub target_value: TargetValue,
    pub dice_roll: i32,
    pub cost: ActionCost,
    pub target_description: Option<String>,
    pub notes: Option<String>,
}

impl ActionResult {
    pub fn roll_result(&self) -> i32 {
        self.ability_score.value() + self.dice_roll
    }

    pub fn success_value(&self) -> i32 {
        self.roll_result() - self.target_value.value()
    }

    pub fn is_success(&self) -> bool {
        self.success_value() >= 0
    }

    pub fn quality(&self) -> &'static str {
        quality_label(self.success_value())
    }

    /// Interpret the SV on this skill's result table.
    pub fn interpretation(&self, skill: &Skill) -> ResultInterpretation {
        result_for(self.success_value(), skill.result_table)
    }

    pub fn summary(&self) -> String {
        let outcome = if self.is_success() { "SUCCESS" } else { "FAILURE" };
        format!(
            "{}: {} ({})\nRoll: {} + ({}) = {} vs TV {}\nSV: {}",
            self.skill_name,
            outcome,
            self.quality(),
            self.ability_score.value(),
            self.dice_roll,
            self.roll_result(),
            self.target_value.value(),
            self.success_value()
        )
    }

    pub fn detailed_breakdown(&self) -> String {
        let sign = if self.dice_roll >= 0 { "+" } else { "" };
        let mut lines = vec![
            format!("=== {} ===", self.skill_name),
            String::new(),
            "-- Ability Score --".to_string(),
            self.ability_score.breakdown(),
            String::new(),
            "-- Target Value --".to_string(),
            self.target_value.breakdown(),
            String::new(),
            "-- Roll --".to_string(),
            format!("4dF+: {sign}{}", self.dice_roll),
            format!(
                "Roll Result: {} + {} = {}",
                self.ability_score.value(),
                self.dice_roll,
                self.roll_result()
            ),
            String::new(),
            "-- Result --".to_string(),
            format!(
                "Success Value: {} - {} = {}",
                self.roll_result(),
                self.target_value.value(),
                self.success_value()
            ),
            format!(
                "Outcome: {}",
                if self.is_success() { "SUCCESS" } else { "FAILURE" }
            ),
            format!("Quality: {}", self.quality()),
            String::new(),
            "-- Cost --".to_string(),
            self.cost.to_string(),
        ];
        if let Some(notes) = self.notes.as_deref().filter(|n| !n.is_empty()) {
            lines.push(String::new());
            lines.push("-- Notes --".to_string());
            lines.push(notes.to_string());
        }
        lines.join("\n")
    }
}

/// Stateless resolver for [`ActionRequest`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionResolver;

impl ActionResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve<R: DiceRoller + ?Sized>(
        &self,
        request: &ActionRequest,
        roller: &mut R,
    ) -> ActionResult {
        let mut ability_score = self.build_ability_score(request);
        let target_value = request
            .target_value
            .clone()
            .unwrap_or_else(|| Self::default_target_value(&request.skill));
        let cost = self.cost(request);
        if cost.boost_bonus() > 0 {
            ability_score.apply_boost_bonus(cost.boost_bonus() as u32);
        }
        let dice_roll = request
            .override_dice_roll
            .unwrap_or_else(|| roller.roll_4df_plus());

        let result = ActionResult {
            skill_name: request.skill.name.clone(),
            action_type: request.skill.action_type,
            ability_score,
            target_value,
            dice_roll,
            cost,
            target_description: request.target_description.clone(),
            notes: None,
        };
        debug!(
            target: "threa::actions",
            skill = %result.skill_name,
            ability_score = result.ability_score.value(),
            roll = dice_roll,
            tv = result.target_value.value(),
            sv = result.success_value(),
            "action resolved"
        );
        result
    }

    /// Ability Score as it would be rolled, boosts included.
    pub fn calculate_ability_score(&self, request: &ActionRequest) -> AbilityScore {
        let mut ability_score = self.build_ability_score(request);
        let boost = request.boost_ap + request.boost_fat;
        if boost > 0 {
            ability_score.apply_boost_bonus(boost as u32);
        }
        ability_score
    }

    pub fn can_afford(&self, request: &ActionRequest, ap: i32, fat: i32, mana: i32) -> bool {
        let cost = self.cost(request);
        ap >= cost.total_ap() && fat >= cost.total_fat() && mana >= cost.mana
    }

    pub fn cost(&self, request: &ActionRequest) -> ActionCost {
        let base = if request.skill.is_free_action {
            ActionCost::free()
        } else if request.mana_cost > 0 {
            ActionCost::spell(request.mana_cost)
        } else if request.use_fatigue_free {
            ActionCost::fatigue_free()
        } else {
            ActionCost::standard()
        };
        ActionCost {
            boost_ap: request.boost_ap,
            boost_fat: request.boost_fat,
            ..base
        }
    }

    fn build_ability_score(&self, request: &ActionRequest) -> AbilityScore {
        let mut ability_score = AbilityScore::new(
            request.skill.name.clone(),
            request.attribute_name.clone(),
            request.attribute_value,
            request.skill.level(),
        );
        if request.is_multiple_action {
            ability_score.apply_multiple_action_penalty();
        }
        ability_score.apply_wound_penalties(request.wound_count);
        if request.has_aimed && request.skill.action_type == ActionType::Attack {
            ability_score.apply_aim_bonus();
        }
        ability_score.extend(request.additional_modifiers.iter().cloned());
        ability_score
    }

    fn default_target_value(skill: &Skill) -> TargetValue {
        match skill.default_tv {
            Some(tv) => TargetValue::fixed(tv, format!("{} (Default)", skill.name)),
            None => TargetValue::fixed(6, "Routine"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::ModifierSource;
    use crate::skills::{find_standard_skill, Skill};
    use crate::testing::DeterministicDiceRoller;

    fn skill(name: &str, level: i32) -> Skill {
        Skill::from_definition(find_standard_skill(name).unwrap())
            .unwrap()
            .with_level(level)
            .unwrap()
    }

    #[test]
    fn test_standard_action_scenario() {
        let request = ActionRequest::new(skill("Physicality", 3), "STR", 12)
            .with_wounds(1)
            .with_multiple_action(true)
            .with_target(TargetValue::fixed(6, "Lift"))
            .with_dice_roll(2);
        let mut roller = DeterministicDiceRoller::new();
        let result = ActionResolver::new().resolve(&request, &mut roller);

        assert_eq!(result.ability_score.base(), 10);
        assert_eq!(result.ability_score.value(), 7);
        assert_eq!(result.roll_result(), 9);
        assert_eq!(result.success_value(), 3);
        assert!(result.is_success());
        assert_eq!(result.quality(), "Standard Success");
    }

    #[test]
    fn test_aim_only_for_attacks() {
        let mut attack = skill("Physicality", 3);
        attack.action_type = ActionType::Attack;
        let aimed = ActionRequest::new(attack, "STR", 10).with_aim();
        assert_eq!(ActionResolver::new().calculate_ability_score(&aimed).value(), 10);

        let not_attack = ActionRequest::new(skill("Physicality", 3), "STR", 10).with_aim();
        assert_eq!(
            ActionResolver::new().calculate_ability_score(&not_attack).value(),
            8
        );
    }

    #[test]
    fn test_boosts_raise_score_and_cost() {
        let request = ActionRequest::new(skill("Awareness", 2), "ITT", 10).with_boosts(1, 2);
        let resolver = ActionResolver::new();
        let cost = resolver.cost(&request);
        assert_eq!(cost.total_ap(), 2);
        assert_eq!(cost.total_fat(), 3);
        assert_eq!(cost.to_string(), "2 AP, 3 FAT, +3 AS from boosts");

        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(0);
        let result = resolver.resolve(&request, &mut roller);
        assert_eq!(result.ability_score.value(), 10);
        assert_eq!(
            result.ability_score.modifiers.total_by_source(ModifierSource::Boost),
            3
        );
    }

    #[test]
    fn test_cost_selection() {
        let resolver = ActionResolver::new();
        let base = ActionRequest::new(skill("Focus", 1), "WIL", 10);
        assert_eq!(resolver.cost(&base), ActionCost::standard());
        assert_eq!(
            resolver.cost(&base.clone().with_fatigue_free()),
            ActionCost::fatigue_free()
        );
        assert_eq!(resolver.cost(&base.clone().with_mana_cost(3)).mana, 3);

        let mut free = skill("Focus", 1);
        free.is_free_action = true;
        let free_request = ActionRequest::new(free, "WIL", 10).with_mana_cost(3);
        assert_eq!(resolver.cost(&free_request).to_string(), "Free");
    }

    #[test]
    fn test_can_afford() {
        let resolver = ActionResolver::new();
        let request = ActionRequest::new(skill("Focus", 1), "WIL", 10).with_boosts(1, 0);
        assert!(resolver.can_afford(&request, 2, 1, 0));
        assert!(!resolver.can_afford(&request, 1, 1, 0));
        let spell = request.with_mana_cost(4);
        assert!(!resolver.can_afford(&spell, 5, 5, 3));
    }

    #[test]
    fn test_default_target_value() {
        let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(0);
        let resolver = ActionResolver::new();
        let result = resolver.resolve(&ActionRequest::new(skill("Focus", 1), "WIL", 10), &mut roller);
        assert_eq!(result.target_value.value(), 6);
        assert_eq!(result.target_value.description, "Routine");

        let mut defaulted = skill("Focus", 1);
        defaulted.default_tv = Some(9);
        let result = resolver.resolve(&ActionRequest::new(defaulted, "WIL", 10), &mut roller);
        assert_eq!(result.target_value.value(), 9);
        assert_eq!(result.target_value.description, "Focus (Default)");
    }

    #[test]
    fn test_summary_format() {
        let mut roller = DeterministicDiceRoller::new();
        let request = ActionRequest::new(skill("Dodge", 2), "DEX/ITT", 11)
            .with_target(TargetValue::fixed(10, "Arrow"))
            .with_dice_roll(-1);
        let result = ActionResolver::new().resolve(&request, &mut roller);
        assert_eq!(
            result.summary(),
            "Dodge: FAILURE (Failure)\nRoll: 8 + (-1) = 7 vs TV 10\nSV: -3"
        );
    }

    #[test]
    fn test_sv_monotonic_in_roll() {
        let mut roller = DeterministicDiceRoller::new();
        let resolver = ActionResolver::new();
        let base = ActionRequest::new(skill("Reasoning", 4), "INT", 11)
            .with_target(TargetValue::fixed(8, "Riddle"));
        let mut previous = None;
        for roll in -6..=6 {
            let sv = resolver
                .resolve(&base.clone().with_dice_roll(roll), &mut roller)
                .success_value();
            if let Some(prev) = previous {
                assert_eq!(sv, prev + 1);
            }
            previous = Some(sv);
        }
    }
}
