//! Wounds by body location.
//!
//! A [`WoundRecord`] tracks one location. Records live inside Wound effects
//! (see [`crate::effects::wound`]), one effect per wounded location, so
//! wounds expire, tick and contribute penalties through the same engine
//! as every other effect.

use crate::dice::DiceRoller;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rounds between bleed ticks of an untreated wound.
pub const DEFAULT_BLEED_ROUNDS: i32 = 20;

/// Where a wound lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyLocation {
    Head,
    Torso,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl BodyLocation {
    pub fn all() -> [BodyLocation; 6] {
        [
            BodyLocation::Head,
            BodyLocation::Torso,
            BodyLocation::LeftArm,
            BodyLocation::RightArm,
            BodyLocation::LeftLeg,
            BodyLocation::RightLeg,
        ]
    }

    /// Wound capacity. The torso takes twice what any other location does.
    pub fn max_wounds(&self) -> u32 {
        match self {
            BodyLocation::Torso => 4,
            _ => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BodyLocation::Head => "Head",
            BodyLocation::Torso => "Torso",
            BodyLocation::LeftArm => "LeftArm",
            BodyLocation::RightArm => "RightArm",
            BodyLocation::LeftLeg => "LeftLeg",
            BodyLocation::RightLeg => "RightLeg",
        }
    }
}

impl fmt::Display for BodyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for BodyLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        BodyLocation::all()
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(&compact))
            .ok_or_else(|| format!("unknown body location '{s}'"))
    }
}

/// Pick a hit location on 1d12.
///
/// 1-3 Torso, 4-5 left arm, 6-7 right arm, 8-9 left leg, 10-11 right leg.
/// A 12 rolls again: a second 12 is the head, anything else starts over.
pub fn random_location<R: DiceRoller + ?Sized>(roller: &mut R) -> BodyLocation {
    loop {
        match roller.roll(1, 12) {
            12 => {
                if roller.roll(1, 12) == 12 {
                    return BodyLocation::Head;
                }
            }
            10..=11 => return BodyLocation::RightLeg,
            8..=9 => return BodyLocation::LeftLeg,
            6..=7 => return BodyLocation::RightArm,
            4..=5 => return BodyLocation::LeftArm,
            _ => return BodyLocation::Torso,
        }
    }
}

/// Damage an untreated wound pushes into the pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WoundBleed {
    pub vitality: i32,
    pub fatigue: i32,
}

/// Wounds at one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoundRecord {
    pub location: BodyLocation,
    pub light_wounds: u32,
    pub serious_wounds: u32,
    pub max_wounds: u32,
    pub is_crippled: bool,
    pub is_destroyed: bool,
    /// Countdown to the next bleed tick; 0 when not bleeding.
    pub rounds_to_damage: i32,
    #[serde(default = "default_bleed_rounds")]
    pub bleed_interval: i32,
}

fn default_bleed_rounds() -> i32 {
    DEFAULT_BLEED_ROUNDS
}

impl WoundRecord {
    pub fn new(location: BodyLocation) -> Self {
        Self::with_bleed_interval(location, DEFAULT_BLEED_ROUNDS)
    }

    pub fn with_bleed_interval(location: BodyLocation, bleed_interval: i32) -> Self {
        Self {
            location,
            light_wounds: 0,
            serious_wounds: 0,
            max_wounds: location.max_wounds(),
            is_crippled: false,
            is_destroyed: false,
            rounds_to_damage: 0,
            bleed_interval,
        }
    }

    pub fn total_wounds(&self) -> u32 {
        self.light_wounds + self.serious_wounds
    }

    /// One wound short of capacity.
    pub fn is_disabled(&self) -> bool {
        self.total_wounds() + 1 >= self.max_wounds
    }

    pub fn is_bleeding(&self) -> bool {
        self.rounds_to_damage > 0
    }

    /// Add one serious wound.
    pub fn take_wound(&mut self) {
        if self.rounds_to_damage == 0 {
            self.rounds_to_damage = self.bleed_interval;
        }
        self.serious_wounds += 1;
        if self.serious_wounds == self.max_wounds {
            self.is_crippled = true;
        }
        if self.serious_wounds >= self.max_wounds {
            self.is_destroyed = true;
        }
    }

    /// Fold another record's wounds into this one.
    pub fn merge(&mut self, other: &WoundRecord) {
        self.serious_wounds += other.serious_wounds;
        self.light_wounds += other.light_wounds;
        if self.serious_wounds >= self.max_wounds {
            self.is_crippled = true;
            self.is_destroyed = true;
        }
        if self.rounds_to_damage == 0 && self.total_wounds() > 0 {
            self.rounds_to_damage = self.bleed_interval;
        }
    }

    /// Demote a serious wound to light, or clear a light one.
    pub fn heal_wound(&mut self) {
        if self.serious_wounds > 0 {
            self.serious_wounds -= 1;
            self.light_wounds += 1;
        } else if self.light_wounds > 0 {
            self.light_wounds -= 1;
        }
        if self.serious_wounds < self.max_wounds {
            self.is_crippled = false;
            self.is_destroyed = false;
        }
        if self.total_wounds() == 0 {
            self.rounds_to_damage = 0;
        }
    }

    /// Count down the bleed timer; on expiry, return what bleeds out.
    pub fn end_of_round(&mut self) -> Option<WoundBleed> {
        if self.rounds_to_damage <= 0 {
            return None;
        }
        self.rounds_to_damage -= 1;
        if self.rounds_to_damage > 0 {
            return None;
        }
        self.rounds_to_damage = self.bleed_interval;
        Some(WoundBleed {
            vitality: self.serious_wounds as i32,
            fatigue: (self.serious_wounds * 2 + self.light_wounds) as i32,
        })
    }
}

impl fmt::Display for WoundRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} serious, {} light ({}/{})",
            self.location,
            self.serious_wounds,
            self.light_wounds,
            self.total_wounds(),
            self.max_wounds
        )?;
        if self.is_destroyed {
            write!(f, " destroyed")?;
        } else if self.is_crippled {
            write!(f, " crippled")?;
        }
        Ok(())
    }
}
