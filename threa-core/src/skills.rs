//! Skills and the standard skill catalog.

use crate::actions::ActionType;
use crate::attributes::{Attribute, AttributeSet};
use crate::tables::ResultTableType;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const MIN_SKILL_LEVEL: i32 = -1;
pub const MAX_SKILL_LEVEL: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillError {
    #[error("Skill level {0} is outside -1..=10")]
    LevelOutOfRange(i32),
    #[error("Skill difficulty {0} is outside 1..=14")]
    DifficultyOutOfRange(i32),
    #[error("Invalid primary attribute: {0}")]
    InvalidAttribute(String),
}

/// XP to advance one level, indexed by [start level][difficulty - 1].
const LEVEL_UP_COSTS: [[i32; 14]; 10] = [
    [1, 3, 5, 10, 10, 10, 20, 20, 30, 40, 40, 50, 60, 60],
    [3, 5, 10, 20, 30, 30, 40, 50, 50, 60, 60, 70, 80, 80],
    [5, 10, 20, 30, 40, 50, 60, 70, 70, 80, 90, 100, 100, 110],
    [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120, 130, 140],
    [20, 30, 40, 50, 60, 80, 90, 100, 120, 130, 140, 160, 170, 180],
    [30, 50, 70, 100, 120, 150, 170, 200, 220, 240, 270, 290, 320, 340],
    [40, 70, 110, 140, 180, 210, 250, 280, 320, 350, 390, 430, 460, 500],
    [80, 170, 250, 330, 410, 500, 580, 660, 740, 830, 910, 990, 1070, 1160],
    [220, 440, 650, 870, 1090, 1310, 1520, 1740, 1960, 2180, 2400, 2610, 2830, 3050],
    [370, 740, 1110, 1480, 1850, 2220, 2590, 2960, 3330, 3700, 4070, 4440, 4810, 5180],
];

/// Level bonus: level - 5.
pub fn skill_bonus(level: i32) -> Result<i32, SkillError> {
    check_level(level)?;
    Ok(level - 5)
}

/// XP to advance from `start_level` to the next level.
pub fn level_up_cost(start_level: i32, difficulty: i32) -> Result<i32, SkillError> {
    if !(MIN_SKILL_LEVEL..MAX_SKILL_LEVEL).contains(&start_level) {
        return Err(SkillError::LevelOutOfRange(start_level));
    }
    if !(1..=14).contains(&difficulty) {
        return Err(SkillError::DifficultyOutOfRange(difficulty));
    }
    if start_level < 0 {
        return Ok(0);
    }
    Ok(LEVEL_UP_COSTS[start_level as usize][(difficulty - 1) as usize])
}

/// XP to reach `target_level` from level 0.
pub fn cumulative_cost(target_level: i32, difficulty: i32) -> Result<i32, SkillError> {
    (0..target_level).map(|level| level_up_cost(level, difficulty)).sum()
}

fn check_level(level: i32) -> Result<(), SkillError> {
    if (MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&level) {
        Ok(())
    } else {
        Err(SkillError::LevelOutOfRange(level))
    }
}

/// Parse `DEX/ITT` style attribute lists.
pub fn parse_attributes(label: &str) -> Result<Vec<Attribute>, SkillError> {
    label.split('/')
        .map(|part| {
            part.parse::<Attribute>()
                .map_err(|_| SkillError::InvalidAttribute(label.to_string()))
        })
        .collect()
}

/// Read-only catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    /// One attribute or several joined by `/`.
    pub primary_attribute: String,
    /// XP cost column when learning without a teacher.
    pub untrained: i32,
    /// XP cost column with a teacher.
    pub trained: i32,
    pub action_type: ActionType,
    pub default_tv: Option<i32>,
    pub result_table: ResultTableType,
    pub is_free_action: bool,
}

impl SkillDefinition {
    fn standard(
        name: &str,
        primary_attribute: &str,
        untrained: i32,
        trained: i32,
        action_type: ActionType,
        result_table: ResultTableType,
    ) -> Self {
        Self {
            name: name.to_string(),
            primary_attribute: primary_attribute.to_string(),
            untrained,
            trained,
            action_type,
            default_tv: None,
            result_table,
            is_free_action: false,
        }
    }
}

lazy_static! {
    /// Skills every character starts with.
    pub static ref STANDARD_SKILLS: Vec<SkillDefinition> = vec![
        SkillDefinition::standard("Physicality", "STR", 3, 1, ActionType::Physical, ResultTableType::General),
        SkillDefinition::standard("Dodge", "DEX/ITT", 6, 4, ActionType::Defense, ResultTableType::Defense),
        SkillDefinition::standard("Drive", "WIL/END", 5, 3, ActionType::Physical, ResultTableType::General),
        SkillDefinition::standard("Reasoning", "INT", 5, 3, ActionType::Knowledge, ResultTableType::General),
        SkillDefinition::standard("Awareness", "ITT", 5, 2, ActionType::Perception, ResultTableType::Perception),
        SkillDefinition::standard("Focus", "WIL", 5, 2, ActionType::None, ResultTableType::General),
        SkillDefinition::standard("Bearing", "SOC", 4, 2, ActionType::Social, ResultTableType::Social),
        SkillDefinition::standard("Influence", "PHY", 4, 2, ActionType::Social, ResultTableType::Social),
        SkillDefinition::standard("Sprint", "DEX", 4, 2, ActionType::Movement, ResultTableType::Movement),
    ];
}

/// Catalog lookup by case-insensitive name.
pub fn find_standard_skill(name: &str) -> Option<&'static SkillDefinition> {
    STANDARD_SKILLS
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
}

/// A skill as a character knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    level: i32,
    pub primary_attributes: Vec<Attribute>,
    pub xp_banked: i32,
    pub untrained: i32,
    pub trained: i32,
    pub action_type: ActionType,
    pub default_tv: Option<i32>,
    pub result_table: ResultTableType,
    pub is_free_action: bool,
}

impl Skill {
    pub fn from_definition(definition: &SkillDefinition) -> Result<Self, SkillError> {
        Ok(Self {
            name: definition.name.clone(),
            level: 0,
            primary_attributes: parse_attributes(&definition.primary_attribute)?,
            xp_banked: 0,
            untrained: definition.untrained,
            trained: definition.trained,
            action_type: definition.action_type,
            default_tv: definition.default_tv,
            result_table: definition.result_table,
            is_free_action: definition.is_free_action,
        })
    }

    pub fn with_level(mut self, level: i32) -> Result<Self, SkillError> {
        self.set_level(level)?;
        Ok(self)
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn set_level(&mut self, level: i32) -> Result<(), SkillError> {
        check_level(level)?;
        self.level = level;
        Ok(())
    }

    /// XP needed for the next level.
    pub fn next_level_cost(&self, with_teacher: bool) -> Result<i32, SkillError> {
        let difficulty = if with_teacher {
            self.trained
        } else {
            self.untrained
        };
        level_up_cost(self.level, difficulty)
    }

    /// Display name of the primary attribute, e.g. `DEX/ITT`.
    pub fn attribute_label(&self) -> String {
        self.primary_attributes
            .iter()
            .map(|a| a.abbreviation())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Raw attribute value feeding this skill.
    pub fn attribute_value(&self, attributes: &AttributeSet) -> i32 {
        attributes.average(&self.primary_attributes)
    }
}

/// A character's skills keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet {
    skills: BTreeMap<String, Skill>,
}

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every standard skill at level 0.
    pub fn standard() -> Self {
        let mut set = Self::new();
        for definition in STANDARD_SKILLS.iter() {
            if let Ok(skill) = Skill::from_definition(definition) {
                set.insert(skill);
            }
        }
        set
    }

    pub fn insert(&mut self, skill: Skill) {
        self.skills.insert(skill.name.to_lowercase(), skill);
    }

    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.skills.get(&name.to_lowercase())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Skill> {
        self.skills.get_mut(&name.to_lowercase())
    }

    pub fn remove(&mut self, name: &str) -> Option<Skill> {
        self.skills.remove(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Skill> {
        self.skills.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_bounds() {
        assert_eq!(skill_bonus(0).unwrap(), -5);
        assert_eq!(skill_bonus(10).unwrap(), 5);
        assert_eq!(skill_bonus(-1).unwrap(), -6);
        assert_eq!(skill_bonus(11), Err(SkillError::LevelOutOfRange(11)));
        assert_eq!(skill_bonus(-2), Err(SkillError::LevelOutOfRange(-2)));
    }

    #[test]
    fn test_level_up_costs() {
        assert_eq!(level_up_cost(0, 1).unwrap(), 1);
        assert_eq!(level_up_cost(3, 5).unwrap(), 50);
        assert_eq!(level_up_cost(9, 14).unwrap(), 5180);
        assert_eq!(level_up_cost(-1, 7).unwrap(), 0);
        assert!(level_up_cost(10, 1).is_err());
        assert_eq!(level_up_cost(0, 15), Err(SkillError::DifficultyOutOfRange(15)));
    }

    #[test]
    fn test_cumulative_cost() {
        assert_eq!(cumulative_cost(0, 3).unwrap(), 0);
        assert_eq!(cumulative_cost(3, 3).unwrap(), 5 + 10 + 20);
    }

    #[test]
    fn test_standard_catalog() {
        let set = SkillSet::standard();
        assert_eq!(set.len(), 9);
        let dodge = set.get("dodge").unwrap();
        assert_eq!(
            dodge.primary_attributes,
            vec![Attribute::Dexterity, Attribute::Intuition]
        );
        assert_eq!(dodge.attribute_label(), "DEX/ITT");
        assert_eq!(dodge.result_table, ResultTableType::Defense);
        assert!(find_standard_skill("FOCUS").is_some());
    }

    #[test]
    fn test_set_level_rejects_out_of_range() {
        let mut skill = Skill::from_definition(find_standard_skill("Focus").unwrap()).unwrap();
        assert!(skill.set_level(11).is_err());
        assert_eq!(skill.level(), 0);
        skill.set_level(4).unwrap();
        assert_eq!(skill.next_level_cost(true).unwrap(), 30);
        assert_eq!(skill.next_level_cost(false).unwrap(), 60);
    }

    #[test]
    fn test_compound_attribute_value() {
        let mut attrs = AttributeSet::uniform(10);
        attrs.set(Attribute::Willpower, 13);
        let drive = Skill::from_definition(find_standard_skill("Drive").unwrap()).unwrap();
        assert_eq!(drive.attribute_value(&attrs), 11);
    }

    #[test]
    fn test_parse_attributes_error() {
        assert!(matches!(
            parse_attributes("DEX/XYZ"),
            Err(SkillError::InvalidAttribute(_))
        ));
    }
}
