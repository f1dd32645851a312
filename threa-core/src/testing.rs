//! Testing utilities for the rules engine.
//!
//! This module provides tools for deterministic tests:
//! - `DeterministicDiceRoller` for scripted dice
//! - `TestHarness` for driving a character through rounds
//! - Assertion helpers for verifying character state

use crate::attributes::AttributeSet;
use crate::character::{Character, RoundReport};
use crate::dice::DiceRoller;
use crate::time::TimeSkip;
use crate::wounds::BodyLocation;
use std::collections::VecDeque;

/// A dice roller that replays scripted values.
///
/// Queued values are consumed in order. Once a queue runs dry the roller
/// falls back to its defaults: fudge dice show 0 and polyhedral dice show 1.
#[derive(Debug, Clone)]
pub struct DeterministicDiceRoller {
    /// Faces for individual polyhedral dice.
    dice: VecDeque<i32>,
    /// Faces for individual fudge dice.
    fudge: VecDeque<i32>,
    /// Whole 4dF+ results, consumed before anything else.
    checks: VecDeque<i32>,
    /// 4dF+ result used when `checks` is empty.
    fixed_check: Option<i32>,
    default_fudge: i32,
    default_die: i32,
}

impl DeterministicDiceRoller {
    pub fn new() -> Self {
        Self {
            dice: VecDeque::new(),
            fudge: VecDeque::new(),
            checks: VecDeque::new(),
            fixed_check: None,
            default_fudge: 0,
            default_die: 1,
        }
    }

    /// A roller whose every 4dF+ check comes up `value`.
    pub fn with_fixed_4df_plus(value: i32) -> Self {
        Self {
            fixed_check: Some(value),
            ..Self::new()
        }
    }

    /// Queue whole 4dF+ results.
    pub fn queue_4df_plus(&mut self, values: impl IntoIterator<Item = i32>) -> &mut Self {
        self.checks.extend(values);
        self
    }

    /// Queue single fudge faces (-1, 0 or +1).
    pub fn queue_fudge(&mut self, faces: impl IntoIterator<Item = i32>) -> &mut Self {
        self.fudge.extend(faces);
        self
    }

    /// Queue single polyhedral faces.
    pub fn queue_dice(&mut self, faces: impl IntoIterator<Item = i32>) -> &mut Self {
        self.dice.extend(faces);
        self
    }

    /// Values used once the queues are empty.
    pub fn set_defaults(&mut self, fudge: i32, die: i32) -> &mut Self {
        self.default_fudge = fudge.clamp(-1, 1);
        self.default_die = die.max(1);
        self
    }

    /// Whether every scripted value has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.dice.is_empty() && self.fudge.is_empty() && self.checks.is_empty()
    }
}

impl Default for DeterministicDiceRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoller for DeterministicDiceRoller {
    fn roll(&mut self, count: u32, sides: u32) -> i32 {
        if sides == 0 {
            return 0;
        }
        (0..count)
            .map(|_| {
                let face = self.dice.pop_front().unwrap_or(self.default_die);
                face.clamp(1, sides as i32)
            })
            .sum()
    }

    fn roll_fudge(&mut self) -> i32 {
        self.fudge.pop_front().unwrap_or(self.default_fudge)
    }

    fn roll_4df_plus(&mut self) -> i32 {
        if let Some(value) = self.checks.pop_front() {
            return value;
        }
        if let Some(value) = self.fixed_check {
            return value;
        }
        self.roll_fudge_dice(4)
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// An average character: every attribute at 10, standard skills at 0.
///
/// Fatigue and Vitality bases are both 15.
pub fn sample_character(name: &str) -> Character {
    Character::new(name, AttributeSet::uniform(10))
}

/// Test harness for running a character through scripted rounds.
pub struct TestHarness {
    /// The character under test.
    pub character: Character,
    /// Dice for everything the character rolls.
    pub dice: DeterministicDiceRoller,
    /// Reports of every round run so far.
    pub rounds: Vec<RoundReport>,
}

impl TestHarness {
    /// Create a new test harness with a sample character.
    pub fn new() -> Self {
        Self::with_character(sample_character("Test Hero"))
    }

    /// Create a test harness with a custom character.
    pub fn with_character(character: Character) -> Self {
        Self {
            character,
            dice: DeterministicDiceRoller::new(),
            rounds: Vec::new(),
        }
    }

    /// Run `count` end-of-round steps.
    pub fn run_rounds(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            let report = self.character.end_of_round(&mut self.dice);
            self.rounds.push(report);
        }
        self
    }

    /// Run rounds until no pool has anything pending, up to `limit`.
    /// Returns the number of rounds run.
    pub fn run_until_settled(&mut self, limit: usize) -> usize {
        let mut ran = 0;
        while ran < limit && !self.character.pools.is_settled() {
            self.run_rounds(1);
            ran += 1;
        }
        ran
    }

    pub fn skip(&mut self, skip: TimeSkip) -> &mut Self {
        self.character.process_time_skip(skip, &mut self.dice);
        self
    }

    /// Current and base value of Fatigue and Vitality.
    pub fn pools(&self) -> ((i32, i32), (i32, i32)) {
        let pools = &self.character.pools;
        (
            (pools.fatigue.value, pools.fatigue.base_value),
            (pools.vitality.value, pools.vitality.base_value),
        )
    }

    pub fn wounds_at(&self, location: BodyLocation) -> u32 {
        self.character
            .effects
            .wound_record(location)
            .map(|w| w.total_wounds())
            .unwrap_or(0)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert current Fatigue and Vitality values.
#[track_caller]
pub fn assert_pools(character: &Character, fatigue: i32, vitality: i32) {
    let actual = (character.pools.fatigue.value, character.pools.vitality.value);
    assert_eq!(
        actual,
        (fatigue, vitality),
        "Expected FAT {fatigue} / VIT {vitality}, got FAT {} / VIT {}",
        actual.0,
        actual.1
    );
}

/// Assert the total wound count across all locations.
#[track_caller]
pub fn assert_wounds(character: &Character, expected: u32) {
    let actual = character.wound_count();
    assert_eq!(actual, expected, "Expected {expected} wounds, got {actual}");
}

#[track_caller]
pub fn assert_conscious(character: &Character) {
    assert!(!character.is_passed_out, "Expected {} to be conscious", character.name);
}

#[track_caller]
pub fn assert_passed_out(character: &Character) {
    assert!(character.is_passed_out, "Expected {} to be passed out", character.name);
}
