//! Ability Score and Target Value.
//!
//! Ability Score (AS) = attribute + skill level - 5 + modifiers.
//! Target Value (TV) = base difficulty (or opponent AS) + opponent roll + modifiers.
//! Success Value (SV) = AS + 4dF+ - TV, computed in [`crate::actions`].

use crate::modifiers::{signed, AsModifier, ModifierSource, ModifierStack};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset applied to every Ability Score.
pub const STANDARD_OFFSET: i32 = -5;

/// An actor's check value, built from attribute, skill and modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScore {
    pub skill_name: String,
    pub attribute_name: String,
    pub attribute_value: i32,
    pub skill_level: i32,
    pub modifiers: ModifierStack,
}

impl AbilityScore {
    pub fn new(
        skill_name: impl Into<String>,
        attribute_name: impl Into<String>,
        attribute_value: i32,
        skill_level: i32,
    ) -> Self {
        Self {
            skill_name: skill_name.into(),
            attribute_name: attribute_name.into(),
            attribute_value,
            skill_level,
            modifiers: ModifierStack::new(),
        }
    }

    pub fn base(&self) -> i32 {
        self.attribute_value + self.skill_level + STANDARD_OFFSET
    }

    pub fn value(&self) -> i32 {
        self.base() + self.modifiers.total()
    }

    pub fn add_modifier(&mut self, source: ModifierSource, description: impl Into<String>, value: i32) {
        self.modifiers.add(source, description, value);
    }

    pub fn apply_multiple_action_penalty(&mut self) {
        self.modifiers
            .add(ModifierSource::MultipleAction, "Multiple Action", -1);
    }

    pub fn apply_wound_penalties(&mut self, wound_count: u32) {
        if wound_count > 0 {
            self.modifiers.add(
                ModifierSource::Wound,
                format!("Wounds (×{wound_count})"),
                -2 * wound_count as i32,
            );
        }
    }

    pub fn apply_boost_bonus(&mut self, boost: u32) {
        if boost > 0 {
            self.modifiers
                .add(ModifierSource::Boost, format!("Boost (×{boost})"), boost as i32);
        }
    }

    pub fn apply_aim_bonus(&mut self) {
        self.modifiers.add(ModifierSource::Aim, "Aimed", 2);
    }

    pub fn extend(&mut self, modifiers: impl IntoIterator<Item = AsModifier>) {
        self.modifiers.extend(modifiers);
    }

    pub fn breakdown(&self) -> String {
        let mut lines = vec![
            format!("{}: {}", self.attribute_name, self.attribute_value),
            format!("{} Level: {}", self.skill_name, self.skill_level),
            format!("Base Offset: {STANDARD_OFFSET}"),
            format!("Base AS: {}", self.base()),
        ];
        if !self.modifiers.is_empty() {
            lines.push("---".to_string());
            lines.extend(self.modifiers.modifiers().iter().map(|m| m.to_string()));
            lines.push("---".to_string());
            lines.push(format!("Final AS: {}", self.value()));
        }
        lines.join("\n")
    }
}

/// How a Target Value was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetValueType {
    Fixed,
    Opposed,
    Passive,
}

impl fmt::Display for TargetValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetValueType::Fixed => "Fixed",
            TargetValueType::Opposed => "Opposed",
            TargetValueType::Passive => "Passive",
        };
        write!(f, "{name}")
    }
}

/// Standard difficulty ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Trivial,
    Easy,
    Routine,
    Moderate,
    Challenging,
    Hard,
    VeryHard,
    Extreme,
    Impossible,
}

impl DifficultyLevel {
    pub fn target_value(&self) -> i32 {
        match self {
            DifficultyLevel::Trivial => 2,
            DifficultyLevel::Easy => 4,
            DifficultyLevel::Routine => 6,
            DifficultyLevel::Moderate => 8,
            DifficultyLevel::Challenging => 10,
            DifficultyLevel::Hard => 12,
            DifficultyLevel::VeryHard => 14,
            DifficultyLevel::Extreme => 16,
            DifficultyLevel::Impossible => 18,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DifficultyLevel::Trivial => "Trivial",
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Routine => "Routine",
            DifficultyLevel::Moderate => "Moderate",
            DifficultyLevel::Challenging => "Challenging",
            DifficultyLevel::Hard => "Hard",
            DifficultyLevel::VeryHard => "Very Hard",
            DifficultyLevel::Extreme => "Extreme",
            DifficultyLevel::Impossible => "Impossible",
        }
    }
}

/// Ranged attack distance bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeBand {
    Short,
    Medium,
    Long,
    Extreme,
}

impl RangeBand {
    pub fn modifier(&self) -> i32 {
        match self {
            RangeBand::Short => 0,
            RangeBand::Medium => 2,
            RangeBand::Long => 4,
            RangeBand::Extreme => 6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RangeBand::Short => "Short",
            RangeBand::Medium => "Medium",
            RangeBand::Long => "Long",
            RangeBand::Extreme => "Extreme",
        }
    }
}

/// What an action is rolled against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetValue {
    pub kind: TargetValueType,
    pub base: i32,
    /// Opponent's 4dF+ for opposed checks, 0 otherwise.
    pub dice_roll: i32,
    pub modifiers: ModifierStack,
    pub description: String,
}

impl TargetValue {
    pub fn fixed(difficulty: i32, description: impl Into<String>) -> Self {
        Self {
            kind: TargetValueType::Fixed,
            base: difficulty,
            dice_roll: 0,
            modifiers: ModifierStack::new(),
            description: description.into(),
        }
    }

    pub fn from_difficulty(level: DifficultyLevel) -> Self {
        Self::fixed(level.target_value(), level.name())
    }

    /// Opponent's Ability Score plus their own roll.
    pub fn opposed(opponent_as: i32, opponent_roll: i32, description: impl Into<String>) -> Self {
        Self {
            kind: TargetValueType::Opposed,
            base: opponent_as,
            dice_roll: opponent_roll,
            modifiers: ModifierStack::new(),
            description: description.into(),
        }
    }

    /// A passive defender: Ability Score - 1, no roll.
    pub fn passive(opponent_as: i32, description: impl Into<String>) -> Self {
        Self {
            kind: TargetValueType::Passive,
            base: opponent_as - 1,
            dice_roll: 0,
            modifiers: ModifierStack::new(),
            description: format!("{} (Passive)", description.into()),
        }
    }

    pub fn value(&self) -> i32 {
        self.base + self.dice_roll + self.modifiers.total()
    }

    pub fn add_range_modifier(&mut self, range: RangeBand) {
        let modifier = range.modifier();
        if modifier != 0 {
            self.modifiers.add(
                ModifierSource::Environment,
                format!("{} Range", range.name()),
                modifier,
            );
        }
    }

    pub fn breakdown(&self) -> String {
        let mut lines = vec![
            format!("Type: {}", self.kind),
            format!("{}: {}", self.description, self.base),
        ];
        if self.dice_roll != 0 {
            lines.push(format!("Roll: {}", signed(self.dice_roll)));
        }
        lines.extend(self.modifiers.modifiers().iter().map(|m| m.to_string()));
        lines.push(format!("Final TV: {}", self.value()));
        lines.join("\n")
    }
}
