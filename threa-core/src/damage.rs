//! Damage classification.
//!
//! A weapon hit produces a [`DamageValue`]: damage SV, the attacker's
//! damage class and the rolled damage. The target scales that number by
//! class difference, then the pools and the wound tracker each read the
//! scaled figure through their own curve.

use crate::dice::{DiceExpression, DiceRoller};
use crate::tables::ResultValue;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Highest damage SV a weapon hit can reach.
pub const MAX_DAMAGE_SV: i32 = 20;

/// Dice rolled for a damage SV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageDice {
    pub notation: &'static str,
    /// Extra damage classes granted by very high SVs.
    pub class_bump: i32,
}

impl DamageDice {
    /// Display form, e.g. `1d6+1d8` or `1d6 (class+1)`.
    pub fn label(&self) -> String {
        if self.class_bump > 0 {
            format!("{} (class+{})", self.notation, self.class_bump)
        } else {
            self.notation.to_string()
        }
    }
}

/// Damage dice by SV.
pub fn damage_dice(sv: i32) -> DamageDice {
    let (notation, class_bump) = match sv {
        0 => ("1d2", 0),
        1 => ("1d3", 0),
        2 => ("1d6", 0),
        3 => ("1d8", 0),
        4 => ("1d10", 0),
        5 => ("1d12", 0),
        6 => ("1d6+1d8", 0),
        7 => ("2d8", 0),
        8 => ("2d10", 0),
        9 => ("2d12", 0),
        10 => ("3d10", 0),
        11 => ("3d12", 0),
        12..=14 => ("4d10", 0),
        15..=16 => ("1d6", 1),
        17..=18 => ("1d8", 1),
        _ => ("1d10", 1),
    };
    DamageDice {
        notation,
        class_bump,
    }
}

/// A rolled hit, ready to be scaled against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageValue {
    pub success_value: i32,
    pub damage_class: i32,
    pub damage: i32,
}

impl DamageValue {
    /// A pre-rolled amount of damage at `damage_class`.
    pub fn new(damage: i32, damage_class: i32) -> Self {
        Self {
            success_value: 0,
            damage_class,
            damage,
        }
    }

    /// Roll damage for a hit.
    ///
    /// The damage SV is the RV's RVs plus the weapon's base SV, capped at
    /// [`MAX_DAMAGE_SV`]. A negative damage SV deals nothing.
    pub fn from_result_value<R: DiceRoller + ?Sized>(
        rv: &ResultValue,
        weapon_sv: i32,
        weapon_class: i32,
        roller: &mut R,
    ) -> Self {
        let sv = (rv.rvs + weapon_sv).min(MAX_DAMAGE_SV);
        if sv < 0 {
            return Self {
                success_value: sv,
                damage_class: weapon_class,
                damage: 0,
            };
        }
        Self::roll(sv, weapon_class, roller)
    }

    /// Roll the dice for a damage SV directly.
    pub fn roll<R: DiceRoller + ?Sized>(sv: i32, damage_class: i32, roller: &mut R) -> Self {
        let dice = damage_dice(sv);
        let damage = DiceExpression::parse(dice.notation)
            .map(|expr| expr.roll_with(roller).total)
            .unwrap_or(0);
        debug!(
            target: "threa::damage",
            sv,
            dice = dice.notation,
            damage,
            "rolled damage"
        );
        Self {
            success_value: sv,
            damage_class: damage_class + dice.class_bump,
            damage,
        }
    }

    /// Damage as felt by a target of `target_class`.
    ///
    /// Each class of difference is a factor of ten.
    pub fn modified_damage(&self, target_class: i32) -> i32 {
        use std::cmp::Ordering;
        match self.damage_class.cmp(&target_class) {
            Ordering::Equal => self.damage,
            Ordering::Greater => self.damage * (self.damage_class - target_class) * 10,
            Ordering::Less => self.damage / ((target_class - self.damage_class) * 10),
        }
    }
}

/// How a damage SV splits across the three channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSplit {
    pub fatigue: i32,
    pub vitality: i32,
    pub wounds: i32,
}

/// The damage sheet.
pub fn damage_split(sv: i32) -> DamageSplit {
    let (fatigue, vitality, wounds) = match sv {
        i32::MIN..=0 => (0, 0, 0),
        1..=4 => (sv, 0, 0),
        5 => (5, 1, 0),
        6 => (6, 2, 0),
        7 => (7, 4, 1),
        8 => (8, 5, 1),
        9 => (9, 8, 1),
        10..=14 => (sv, sv, 2),
        15..=19 => (sv, sv, 3),
        _ => (sv, sv, sv / 5),
    };
    DamageSplit {
        fatigue,
        vitality,
        wounds,
    }
}

/// Vitality's share of a scaled damage figure.
///
/// Small hits barely register; from 10 up damage passes through 1:1.
pub fn vitality_damage(damage: i32) -> i32 {
    match damage {
        5 => 1,
        6 => 2,
        7 => 4,
        8 => 6,
        9 => 8,
        d if d > 9 => d,
        _ => 0,
    }
}

/// Wounds inflicted by a scaled damage figure.
pub fn wound_count(damage: i32) -> u32 {
    match damage {
        7..=9 => 1,
        10..=14 => 2,
        15..=19 => 3,
        d if d > 19 => (d / 5) as u32,
        _ => 0,
    }
}
