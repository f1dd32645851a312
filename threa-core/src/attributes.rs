//! Character attributes.

use crate::dice::DiceRoller;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The eight Threa attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Dexterity,
    Endurance,
    Intelligence,
    Intuition,
    Willpower,
    Physicality,
    Social,
}

impl Attribute {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Attribute::Strength => "STR",
            Attribute::Dexterity => "DEX",
            Attribute::Endurance => "END",
            Attribute::Intelligence => "INT",
            Attribute::Intuition => "ITT",
            Attribute::Willpower => "WIL",
            Attribute::Physicality => "PHY",
            Attribute::Social => "SOC",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Dexterity => "Dexterity",
            Attribute::Endurance => "Endurance",
            Attribute::Intelligence => "Intelligence",
            Attribute::Intuition => "Intuition",
            Attribute::Willpower => "Willpower",
            Attribute::Physicality => "Physicality",
            Attribute::Social => "Social",
        }
    }

    pub fn all() -> [Attribute; 8] {
        [
            Attribute::Strength,
            Attribute::Dexterity,
            Attribute::Endurance,
            Attribute::Intelligence,
            Attribute::Intuition,
            Attribute::Willpower,
            Attribute::Physicality,
            Attribute::Social,
        ]
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Attribute::all()
            .into_iter()
            .find(|a| a.abbreviation().eq_ignore_ascii_case(s) || a.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown attribute '{s}'"))
    }
}

/// Base value fixed at creation plus the current (trained/drained) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub base: i32,
    pub current: i32,
}

impl AttributeValue {
    pub fn new(value: i32) -> Self {
        Self {
            base: value,
            current: value,
        }
    }
}

/// Creation value of an attribute: 10 + 4dF + species modifier.
pub fn roll_attribute<R: DiceRoller + ?Sized>(roller: &mut R, species_modifier: i32) -> i32 {
    10 + roller.roll_fudge_dice(4) + species_modifier
}

/// All eight attributes of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
    values: BTreeMap<Attribute, AttributeValue>,
}

impl AttributeSet {
    /// Every attribute at the same value.
    pub fn uniform(value: i32) -> Self {
        Self {
            values: Attribute::all()
                .into_iter()
                .map(|a| (a, AttributeValue::new(value)))
                .collect(),
        }
    }

    /// Roll every attribute as 10 + 4dF.
    pub fn rolled<R: DiceRoller + ?Sized>(roller: &mut R) -> Self {
        Self {
            values: Attribute::all()
                .into_iter()
                .map(|a| (a, AttributeValue::new(roll_attribute(roller, 0))))
                .collect(),
        }
    }

    /// Current value of an attribute.
    pub fn get(&self, attribute: Attribute) -> i32 {
        self.values.get(&attribute).map(|v| v.current).unwrap_or(0)
    }

    pub fn base(&self, attribute: Attribute) -> i32 {
        self.values.get(&attribute).map(|v| v.base).unwrap_or(0)
    }

    /// Set both base and current value.
    pub fn set(&mut self, attribute: Attribute, value: i32) {
        self.values.insert(attribute, AttributeValue::new(value));
    }

    /// Change only the current value (training, drain).
    pub fn set_current(&mut self, attribute: Attribute, value: i32) {
        self.values
            .entry(attribute)
            .or_insert_with(|| AttributeValue::new(value))
            .current = value;
    }

    /// Integer average over several attributes (compound skills like `DEX/ITT`).
    pub fn average(&self, attributes: &[Attribute]) -> i32 {
        if attributes.is_empty() {
            return 0;
        }
        let sum: i32 = attributes.iter().map(|a| self.get(*a)).sum();
        sum / attributes.len() as i32
    }

    /// Sum of current values.
    pub fn total(&self) -> i32 {
        self.values.values().map(|v| v.current).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, AttributeValue)> + '_ {
        self.values.iter().map(|(a, v)| (*a, *v))
    }
}

impl Default for AttributeSet {
    fn default() -> Self {
        Self::uniform(10)
    }
}
