//! Character builder for Threa character creation.
//!
//! Provides a step-by-step builder: name, species, attributes (rolled as
//! 10 + 4dF or assigned), starting XP spent on skills, and a starting purse.

use crate::attributes::{roll_attribute, Attribute, AttributeSet};
use crate::character::{Character, CharacterError, CharacterId};
use crate::config::RulesConfig;
use crate::currency::Currency;
use crate::dice::DiceRoller;
use crate::skills::{cumulative_cost, SkillError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Playable species and their attribute adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Species {
    #[default]
    Human,
    Elf,
    Dwarf,
    Halfling,
    Orc,
}

impl Species {
    pub fn all() -> &'static [Species] {
        &[
            Species::Human,
            Species::Elf,
            Species::Dwarf,
            Species::Halfling,
            Species::Orc,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Human => "Human",
            Species::Elf => "Elf",
            Species::Dwarf => "Dwarf",
            Species::Halfling => "Halfling",
            Species::Orc => "Orc",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Species::Human => "The baseline species with no attribute modifiers.",
            Species::Elf => "Intellectual and agile, but physically delicate.",
            Species::Dwarf => "Strong and resilient, but less agile.",
            Species::Halfling => "Quick and perceptive, but physically weak.",
            Species::Orc => "Powerful and enduring, but less intelligent and social.",
        }
    }

    /// Adjustment applied to an attribute at creation.
    pub fn modifier(&self, attribute: Attribute) -> i32 {
        use Attribute::*;
        match (self, attribute) {
            (Species::Elf, Intelligence) => 1,
            (Species::Elf, Strength) => -1,
            (Species::Dwarf, Strength) => 1,
            (Species::Dwarf, Dexterity) => -1,
            (Species::Halfling, Dexterity | Intuition) => 1,
            (Species::Halfling, Strength) => -2,
            (Species::Orc, Strength) => 2,
            (Species::Orc, Endurance) => 1,
            (Species::Orc, Intelligence | Social) => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Species {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::all()
            .iter()
            .copied()
            .find(|species| species.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BuilderError::UnknownSpecies(s.to_string()))
    }
}

/// Method for determining attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeMethod {
    /// 10 + 4dF per attribute.
    #[default]
    Rolled,
    /// Values chosen by the table.
    Assigned,
}

impl AttributeMethod {
    pub fn name(&self) -> &'static str {
        match self {
            AttributeMethod::Rolled => "Rolled",
            AttributeMethod::Assigned => "Assigned",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AttributeMethod::Rolled => "Roll 10 + 4dF for each of the eight attributes",
            AttributeMethod::Assigned => "Enter attribute values agreed with the GM",
        }
    }
}

/// Error from character building.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Character name is required")]
    MissingName,

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("{attribute} must be at least 1, got {value}")]
    InvalidAttribute { attribute: Attribute, value: i32 },

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error(transparent)]
    Skill(#[from] SkillError),

    #[error(transparent)]
    Character(#[from] CharacterError),
}

/// Builder for creating Threa characters.
#[derive(Debug, Clone, Default)]
pub struct CharacterBuilder {
    id: CharacterId,
    name: Option<String>,
    species: Species,
    method: AttributeMethod,
    /// Values before species modifiers, for [`AttributeMethod::Assigned`].
    assigned: Vec<(Attribute, i32)>,
    starting_xp: i32,
    skill_levels: Vec<(String, i32)>,
    purse: Currency,
    config: Option<RulesConfig>,
}

impl CharacterBuilder {
    /// Create a new character builder.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: CharacterId) -> Self {
        self.id = id;
        self
    }

    /// Set the character's name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn species(mut self, species: Species) -> Self {
        self.species = species;
        self
    }

    /// Roll attributes at build time.
    pub fn rolled(mut self) -> Self {
        self.method = AttributeMethod::Rolled;
        self.assigned.clear();
        self
    }

    /// Use fixed attribute values; unlisted attributes default to 10.
    /// Species modifiers are still applied on top.
    pub fn assigned(mut self, values: impl IntoIterator<Item = (Attribute, i32)>) -> Self {
        self.method = AttributeMethod::Assigned;
        self.assigned = values.into_iter().collect();
        self
    }

    /// XP available to spend on skills during creation.
    pub fn starting_xp(mut self, xp: i32) -> Self {
        self.starting_xp = xp.max(0);
        self
    }

    /// Train a skill to `level`, paid from starting XP at the untrained rate.
    pub fn skill(mut self, name: impl Into<String>, level: i32) -> Self {
        self.skill_levels.push((name.into(), level));
        self
    }

    pub fn purse(mut self, purse: Currency) -> Self {
        self.purse = purse;
        self
    }

    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = Some(config);
        self
    }

    fn attributes<R: DiceRoller + ?Sized>(&self, roller: &mut R) -> Result<AttributeSet, BuilderError> {
        let mut attributes = AttributeSet::default();
        for attribute in Attribute::all() {
            let modifier = self.species.modifier(attribute);
            let value = match self.method {
                AttributeMethod::Rolled => roll_attribute(roller, modifier),
                AttributeMethod::Assigned => {
                    let base = self
                        .assigned
                        .iter()
                        .rev()
                        .find(|(a, _)| *a == attribute)
                        .map(|(_, v)| *v)
                        .unwrap_or(10);
                    base + modifier
                }
            };
            if value < 1 {
                return Err(BuilderError::InvalidAttribute { attribute, value });
            }
            attributes.set(attribute, value);
        }
        Ok(attributes)
    }

    /// Build the character.
    pub fn build<R: DiceRoller + ?Sized>(self, roller: &mut R) -> Result<Character, BuilderError> {
        let name = self
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .ok_or(BuilderError::MissingName)?;
        let attributes = self.attributes(roller)?;

        let mut character = Character::new(name, attributes).with_id(self.id);
        if let Some(config) = self.config.clone() {
            character.set_config(config);
        }
        character.purse = self.purse;
        character.award_xp(self.starting_xp);

        for (skill_name, level) in &self.skill_levels {
            let skill = character
                .skills
                .get(skill_name)
                .ok_or_else(|| BuilderError::UnknownSkill(skill_name.clone()))?;
            let current = skill.level().max(0);
            let trained = skill.clone().with_level(*level)?;
            let cost = cumulative_cost(*level, skill.untrained)?
                - cumulative_cost(current, skill.untrained)?;
            character.spend_xp(cost.max(0))?;
            character.skills.insert(trained);
        }

        info!(
            target: "threa::character",
            character = %character.name,
            species = %self.species,
            method = self.method.name(),
            xp_banked = character.xp_banked,
            "character created"
        );
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::DeterministicDiceRoller;

    #[test]
    fn test_species_modifiers() {
        assert_eq!(Species::Human.modifier(Attribute::Strength), 0);
        assert_eq!(Species::Halfling.modifier(Attribute::Strength), -2);
        assert_eq!(Species::Orc.modifier(Attribute::Social), -1);
        assert_eq!("dwarf".parse::<Species>().unwrap(), Species::Dwarf);
        assert!("Gnome".parse::<Species>().is_err());
    }

    #[test]
    fn test_rolled_character() {
        let mut roller = DeterministicDiceRoller::new();
        // STR rolls first: +1 +1 0 0
        roller.queue_fudge([1, 1, 0, 0]);
        let character = CharacterBuilder::new()
            .name("Grom")
            .species(Species::Orc)
            .build(&mut roller)
            .unwrap();

        assert_eq!(character.attributes.get(Attribute::Strength), 14);
        assert_eq!(character.attributes.get(Attribute::Endurance), 11);
        assert_eq!(character.attributes.get(Attribute::Intelligence), 9);
        assert_eq!(character.vitality().base_value, 23);
        assert_eq!(character.fatigue().base_value, 16);
    }

    #[test]
    fn test_assigned_character() {
        let mut roller = DeterministicDiceRoller::new();
        let character = CharacterBuilder::new()
            .name("Lirael")
            .species(Species::Elf)
            .assigned([(Attribute::Intelligence, 12), (Attribute::Dexterity, 11)])
            .build(&mut roller)
            .unwrap();

        assert_eq!(character.attributes.get(Attribute::Intelligence), 13);
        assert_eq!(character.attributes.get(Attribute::Dexterity), 11);
        assert_eq!(character.attributes.get(Attribute::Strength), 9);
    }

    #[test]
    fn test_skills_paid_from_starting_xp() {
        let mut roller = DeterministicDiceRoller::new();
        let character = CharacterBuilder::new()
            .name("Sera")
            .starting_xp(50)
            .skill("Dodge", 2)
            .build(&mut roller)
            .unwrap();

        // Dodge is difficulty 6: 10 + 30
        assert_eq!(character.skills.get("Dodge").unwrap().level(), 2);
        assert_eq!(character.xp_total, 40);
        assert_eq!(character.xp_banked, 10);
        assert_eq!(character.action_points.max, 4);
    }

    #[test]
    fn test_build_errors() {
        let mut roller = DeterministicDiceRoller::new();
        assert!(matches!(
            CharacterBuilder::new().build(&mut roller),
            Err(BuilderError::MissingName)
        ));
        assert!(matches!(
            CharacterBuilder::new()
                .name("Poor")
                .skill("Dodge", 3)
                .build(&mut roller),
            Err(BuilderError::Character(CharacterError::InsufficientXp { .. }))
        ));
        assert!(matches!(
            CharacterBuilder::new()
                .name("Odd")
                .skill("Knitting", 1)
                .build(&mut roller),
            Err(BuilderError::UnknownSkill(_))
        ));
        assert!(matches!(
            CharacterBuilder::new()
                .name("Frail")
                .species(Species::Halfling)
                .assigned([(Attribute::Strength, 2)])
                .build(&mut roller),
            Err(BuilderError::InvalidAttribute {
                attribute: Attribute::Strength,
                value: 0
            })
        ));
    }
}
