//! Dice for Threa checks and damage.
//!
//! Checks roll 4dF+: four fudge dice whose total explodes on +4 or -4.
//! Damage rolls polyhedral expressions such as `1d6+1d8`, produced by the
//! result tables.
//!
//! Every roll goes through the [`DiceRoller`] capability so tests can swap
//! in a scripted roller (see [`crate::testing::DeterministicDiceRoller`]).

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
    #[error("No dice specified")]
    NoDice,
}

/// Source of randomness for every rule in the engine.
pub trait DiceRoller {
    /// Sum of `count` dice, each uniform in `1..=sides`.
    fn roll(&mut self, count: u32, sides: u32) -> i32;

    /// A single fudge die: -1, 0 or +1.
    fn roll_fudge(&mut self) -> i32;

    /// Exploding 4dF+ check roll.
    fn roll_4df_plus(&mut self) -> i32 {
        exploding_4df(self)
    }

    /// Sum of `count` fudge dice, no explosion.
    fn roll_fudge_dice(&mut self, count: u32) -> i32 {
        (0..count).map(|_| self.roll_fudge()).sum()
    }
}

/// The 4dF+ algorithm over any roller's fudge dice.
///
/// A natural +4 rolls four more fudge dice and adds the number of `+`
/// faces, repeating while all four come up `+`. A natural -4 mirrors this
/// with `-` faces and subtracts.
pub fn exploding_4df<R: DiceRoller + ?Sized>(roller: &mut R) -> i32 {
    let base = roller.roll_fudge_dice(4);
    match base {
        4 => base + explosion(roller, 1),
        -4 => base - explosion(roller, -1),
        _ => base,
    }
}

fn explosion<R: DiceRoller + ?Sized>(roller: &mut R, face: i32) -> i32 {
    let mut total = 0;
    loop {
        let hits = (0..4).filter(|_| roller.roll_fudge() == face).count() as i32;
        total += hits;
        if hits < 4 {
            return total;
        }
    }
}

/// Production roller backed by a ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct RandomDiceRoller {
    rng: ChaCha8Rng,
}

impl RandomDiceRoller {
    /// Roller seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible roller: the same seed yields the same session.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDiceRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoller for RandomDiceRoller {
    fn roll(&mut self, count: u32, sides: u32) -> i32 {
        if sides == 0 {
            return 0;
        }
        (0..count)
            .map(|_| self.rng.gen_range(1..=sides) as i32)
            .sum()
    }

    fn roll_fudge(&mut self) -> i32 {
        self.rng.gen_range(-1..=1)
    }
}

/// Die types that appear in Threa expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieType {
    D2,
    D3,
    D4,
    D6,
    D8,
    D10,
    D12,
    D20,
    D100,
    /// Fudge die, faces -1/0/+1.
    Fudge,
}

impl DieType {
    pub fn sides(&self) -> u32 {
        match self {
            DieType::D2 => 2,
            DieType::D3 | DieType::Fudge => 3,
            DieType::D4 => 4,
            DieType::D6 => 6,
            DieType::D8 => 8,
            DieType::D10 => 10,
            DieType::D12 => 12,
            DieType::D20 => 20,
            DieType::D100 => 100,
        }
    }

    pub fn from_sides(sides: u32) -> Option<DieType> {
        match sides {
            2 => Some(DieType::D2),
            3 => Some(DieType::D3),
            4 => Some(DieType::D4),
            6 => Some(DieType::D6),
            8 => Some(DieType::D8),
            10 => Some(DieType::D10),
            12 => Some(DieType::D12),
            20 => Some(DieType::D20),
            100 => Some(DieType::D100),
            _ => None,
        }
    }

    fn roll_one<R: DiceRoller + ?Sized>(&self, roller: &mut R) -> i32 {
        match self {
            DieType::Fudge => roller.roll_fudge(),
            other => roller.roll(1, other.sides()),
        }
    }
}

impl fmt::Display for DieType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DieType::Fudge => write!(f, "dF"),
            other => write!(f, "d{}", other.sides()),
        }
    }
}

/// One `XdY` term of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceComponent {
    pub count: u32,
    pub die_type: DieType,
    /// -1 when the term is subtracted.
    pub sign: i32,
}

/// A parsed dice expression (e.g. `1d6+1d8`, `4dF`, `2d10-1`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    pub components: Vec<DiceComponent>,
    pub modifier: i32,
    pub original: String,
}

impl DiceExpression {
    /// Parse a dice notation string.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation = notation.trim().to_lowercase();
        if notation.is_empty() {
            return Err(DiceError::NoDice);
        }

        let mut components = Vec::new();
        let mut modifier: i32 = 0;
        let mut current = String::new();
        let mut sign: i32 = 1;

        for ch in notation.chars() {
            match ch {
                '+' | '-' => {
                    if !current.is_empty() {
                        Self::parse_term(&current, sign, &mut components, &mut modifier)?;
                        current.clear();
                    }
                    sign = if ch == '+' { 1 } else { -1 };
                }
                ' ' => continue,
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            Self::parse_term(&current, sign, &mut components, &mut modifier)?;
        }

        if components.is_empty() && modifier == 0 {
            return Err(DiceError::NoDice);
        }

        Ok(DiceExpression {
            components,
            modifier,
            original: notation,
        })
    }

    fn parse_term(
        s: &str,
        sign: i32,
        components: &mut Vec<DiceComponent>,
        modifier: &mut i32,
    ) -> Result<(), DiceError> {
        let Some(d_pos) = s.find('d') else {
            let value: i32 = s
                .parse()
                .map_err(|_| DiceError::InvalidNotation(s.to_string()))?;
            *modifier += sign * value;
            return Ok(());
        };

        let count_str = &s[..d_pos];
        let sides_str = &s[d_pos + 1..];

        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(s.to_string()))?
        };

        let die_type = if sides_str == "f" {
            DieType::Fudge
        } else {
            let sides: u32 = sides_str
                .parse()
                .map_err(|_| DiceError::InvalidNotation(s.to_string()))?;
            DieType::from_sides(sides).ok_or(DiceError::InvalidDieSize(sides))?
        };

        components.push(DiceComponent {
            count,
            die_type,
            sign,
        });
        Ok(())
    }

    /// Roll the expression through `roller`.
    pub fn roll_with<R: DiceRoller + ?Sized>(&self, roller: &mut R) -> DiceRoll {
        let mut rolls = Vec::new();
        let mut total = self.modifier;

        for component in &self.components {
            let faces: Vec<i32> = (0..component.count)
                .map(|_| component.die_type.roll_one(roller))
                .collect();
            total += component.sign * faces.iter().sum::<i32>();
            rolls.push(ComponentRoll {
                die_type: component.die_type,
                faces,
            });
        }

        DiceRoll {
            expression: self.original.clone(),
            rolls,
            modifier: self.modifier,
            total,
        }
    }

    /// Smallest possible total.
    pub fn minimum(&self) -> i32 {
        self.components
            .iter()
            .map(|c| {
                let low = if c.die_type == DieType::Fudge { -1 } else { 1 };
                let high = if c.die_type == DieType::Fudge {
                    1
                } else {
                    c.die_type.sides() as i32
                };
                let face = if c.sign > 0 { low } else { -high };
                face * c.count as i32
            })
            .sum::<i32>()
            + self.modifier
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Faces rolled for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRoll {
    pub die_type: DieType,
    pub faces: Vec<i32>,
}

/// Result of rolling a [`DiceExpression`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceRoll {
    pub expression: String,
    pub rolls: Vec<ComponentRoll>,
    pub modifier: i32,
    pub total: i32,
}

impl DiceRoll {
    /// Individual faces for display, e.g. `[3] + [5, 2]`.
    pub fn dice_display(&self) -> String {
        let parts: Vec<String> = self
            .rolls
            .iter()
            .map(|c| {
                let faces: Vec<String> = c.faces.iter().map(|f| f.to_string()).collect();
                format!("[{}]", faces.join(", "))
            })
            .collect();
        let dice = parts.join(" + ");
        match self.modifier {
            0 => dice,
            m if m > 0 => format!("{dice} + {m}"),
            m => format!("{dice} - {}", m.abs()),
        }
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.dice_display(), self.total)
    }
}

/// Parse and roll in one step.
pub fn roll_expression<R: DiceRoller + ?Sized>(
    notation: &str,
    roller: &mut R,
) -> Result<DiceRoll, DiceError> {
    Ok(DiceExpression::parse(notation)?.roll_with(roller))
}
