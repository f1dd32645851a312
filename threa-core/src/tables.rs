//! Result Tables.
//!
//! Pure lookups from a Success Value (SV) to what it means for a given
//! kind of activity. Every table shares the same band edges
//! (failures at -2/-4/-6/-8, successes at 1/3/5/7); they differ in labels
//! and in the meaning of `effect_value`.
//!
//! Also holds the Result Value (RV) table used by raw skill checks.

use crate::damage::damage_dice;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which table to interpret an SV with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ResultTableType {
    #[default]
    General,
    CombatDamage,
    Defense,
    Social,
    Perception,
    Crafting,
    Healing,
    Movement,
    ManaRecovery,
}

impl ResultTableType {
    pub fn all() -> [ResultTableType; 9] {
        [
            ResultTableType::General,
            ResultTableType::CombatDamage,
            ResultTableType::Defense,
            ResultTableType::Social,
            ResultTableType::Perception,
            ResultTableType::Crafting,
            ResultTableType::Healing,
            ResultTableType::Movement,
            ResultTableType::ManaRecovery,
        ]
    }
}

/// The meaning of an SV on one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultInterpretation {
    pub is_success: bool,
    pub label: String,
    pub description: String,
    /// Damage SV, heal amount, quality bonus, range delta or mana, per table.
    pub effect_value: i32,
    pub damage_multiplier: i32,
}

impl ResultInterpretation {
    fn new(is_success: bool, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            is_success,
            label: label.into(),
            description: description.into(),
            effect_value: 0,
            damage_multiplier: 0,
        }
    }

    fn with_effect(mut self, value: i32) -> Self {
        self.effect_value = value;
        self
    }
}

impl fmt::Display for ResultInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.description)
    }
}

/// Interpret `sv` on `table`.
pub fn result_for(sv: i32, table: ResultTableType) -> ResultInterpretation {
    match table {
        ResultTableType::General => general(sv),
        ResultTableType::CombatDamage => combat_damage(sv),
        ResultTableType::Defense => defense(sv),
        ResultTableType::Social => social(sv),
        ResultTableType::Perception => perception(sv),
        ResultTableType::Crafting => crafting(sv),
        ResultTableType::Healing => healing(sv),
        ResultTableType::Movement => movement(sv),
        ResultTableType::ManaRecovery => mana_recovery(sv),
    }
}

/// Quality label shared by every activity type.
pub fn quality_label(sv: i32) -> &'static str {
    match sv {
        -2..=-1 => "Minor Failure",
        -4..=-3 => "Failure",
        -6..=-5 => "Bad Failure",
        -8..=-7 => "Severe Failure",
        i32::MIN..=-9 => "Critical Failure",
        0..=1 => "Marginal Success",
        2..=3 => "Standard Success",
        4..=5 => "Good Success",
        6..=7 => "Excellent Success",
        _ => "Outstanding Success",
    }
}

fn general(sv: i32) -> ResultInterpretation {
    let description = match sv {
        -2..=-1 => "Task not completed, no complications.",
        -4..=-3 => "Clear lack of success.",
        -6..=-5 => "Complications may arise.",
        -8..=-7 => "Negative consequences occur.",
        i32::MIN..=-9 => "Serious problems result.",
        0..=1 => "Barely achieved the goal.",
        2..=3 => "Competent result.",
        4..=5 => "Above average result.",
        6..=7 => "Impressive result.",
        _ => "Exceptional result.",
    };
    ResultInterpretation::new(sv >= 0, quality_label(sv), description)
}

fn combat_damage(sv: i32) -> ResultInterpretation {
    if sv < 0 {
        let (label, description) = match sv {
            -2..=-1 => ("Miss", "Attack fails to connect."),
            -4..=-3 => ("Clear Miss", "Attack misses by a wide margin."),
            -6..=-5 => ("Bad Miss", "Possible overextension or stumble."),
            -8..=-7 => ("Fumble", "May drop weapon or fall prone."),
            _ => ("Critical Fumble", "Serious mishap occurs."),
        };
        return ResultInterpretation::new(false, label, description);
    }

    let dice = damage_dice(sv);
    let mut result =
        ResultInterpretation::new(true, "Hit", format!("Deal {} damage.", dice.label()))
            .with_effect(sv);
    result.damage_multiplier = 1;
    result
}

fn defense(sv: i32) -> ResultInterpretation {
    if sv < 0 {
        // margin of failure feeds the attacker's damage
        return ResultInterpretation::new(false, "Defense Failed", "The attack hits.")
            .with_effect(-sv);
    }
    let (label, description) = match sv {
        0..=1 => ("Barely Dodged", "Attack narrowly avoided."),
        2..=3 => ("Dodged", "Attack cleanly avoided."),
        4..=5 => ("Evasion", "Graceful avoidance, possible counter opportunity."),
        _ => ("Perfect Defense", "Masterful defense, counter opportunity."),
    };
    ResultInterpretation::new(true, label, description)
}

fn social(sv: i32) -> ResultInterpretation {
    let (label, description) = match sv {
        -2..=-1 => ("Unconvinced", "Target not swayed but not hostile."),
        -4..=-3 => ("Rejected", "Target firmly disagrees."),
        -6..=-5 => ("Offended", "Target becomes less cooperative."),
        i32::MIN..=-7 => ("Hostile", "Target becomes actively opposed."),
        0..=1 => ("Slightly Influenced", "Target gives minimal cooperation."),
        2..=3 => ("Convinced", "Target agrees or cooperates."),
        4..=5 => ("Won Over", "Target is favorably disposed."),
        6..=7 => ("Impressed", "Target becomes an ally or supporter."),
        _ => ("Charmed", "Target is enthusiastically cooperative."),
    };
    ResultInterpretation::new(sv >= 0, label, description)
}

fn perception(sv: i32) -> ResultInterpretation {
    let (label, description) = match sv {
        -2..=-1 => ("Nothing Noticed", "Fail to perceive anything useful."),
        -4..=-3 => ("Missed", "Clearly miss important details."),
        i32::MIN..=-5 => ("Oblivious", "Completely unaware, may be surprised."),
        0..=1 => ("Glimpse", "Notice something is there."),
        2..=3 => ("Noticed", "Clear awareness of the target."),
        4..=5 => ("Detailed", "Notice specific details."),
        6..=7 => ("Thorough", "Complete understanding of the scene."),
        _ => ("Perfect Awareness", "Notice hidden details others would miss."),
    };
    ResultInterpretation::new(sv >= 0, label, description)
}

fn crafting(sv: i32) -> ResultInterpretation {
    let (label, description, bonus) = match sv {
        -2..=-1 => ("Flawed", "Item has minor defects, -1 quality.", 0),
        -4..=-3 => ("Poor", "Item has significant issues, -2 quality.", 0),
        -6..=-5 => ("Failed", "Item is unusable, materials may be salvaged.", 0),
        i32::MIN..=-7 => ("Ruined", "Item and materials are destroyed.", 0),
        0..=1 => ("Serviceable", "Basic item, no bonuses.", 0),
        2..=3 => ("Standard", "Good quality item.", 0),
        4..=5 => ("Fine", "Superior quality, +1 bonus.", 1),
        6..=7 => ("Excellent", "Exceptional quality, +2 bonus.", 2),
        _ => ("Masterwork", "Mastercraft quality, +3 bonus.", 3),
    };
    ResultInterpretation::new(sv >= 0, label, description).with_effect(bonus)
}

fn healing(sv: i32) -> ResultInterpretation {
    if sv < 0 {
        return match sv {
            -2..=-1 => ResultInterpretation::new(false, "No Effect", "Healing attempt fails."),
            -4..=-3 => ResultInterpretation::new(false, "Wasted", "Materials used with no benefit."),
            _ => ResultInterpretation::new(false, "Harmful", "Treatment causes 1 FAT damage.")
                .with_effect(-1),
        };
    }
    let amount = match sv {
        0..=1 => 1,
        2..=3 => 2,
        4..=5 => 4,
        6..=7 => 6,
        _ => 8,
    };
    ResultInterpretation::new(
        true,
        format!("Healed {amount}"),
        format!("Restore {amount} FAT or VIT."),
    )
    .with_effect(amount)
}

fn movement(sv: i32) -> ResultInterpretation {
    let (label, description, delta) = match sv {
        -2..=-1 => ("Slowed", "Movement impeded, achieve partial distance.", -1),
        -4..=-3 => ("Stumbled", "Lost footing, minimal movement.", -2),
        -6..=-5 => ("Stopped", "Failed to move effectively.", -3),
        -8..=-7 => ("Fell", "Fell down, no movement, must recover.", -99),
        i32::MIN..=-9 => ("Mishap", "Serious fall or collision, possible injury.", -99),
        0..=1 => ("Moved", "Achieved base movement distance.", 0),
        2..=3 => ("Quick", "Efficient movement, full distance.", 0),
        4..=5 => ("Swift", "Excellent movement, bonus distance possible.", 1),
        6..=7 => ("Burst", "Exceptional speed burst.", 1),
        _ => ("Blazing", "Maximum possible speed achieved.", 2),
    };
    ResultInterpretation::new(sv >= 0, label, description).with_effect(delta)
}

fn mana_recovery(sv: i32) -> ResultInterpretation {
    if sv < 0 {
        let (label, description, value) = match sv {
            -2..=-1 => ("No Recovery", "Failed to focus, no mana recovered.", 0),
            -4..=-3 => ("Distracted", "Concentration broken, no mana recovered.", 0),
            -6..=-5 => ("Exhausted", "Recovery attempt drains 1 FAT.", -1),
            _ => ("Backlash", "Magical backlash, lose 1 mana from pool.", -2),
        };
        return ResultInterpretation::new(false, label, description).with_effect(value);
    }
    let mana = match sv {
        0..=1 => 1,
        2..=3 => 2,
        4..=5 => 3,
        6..=7 => 4,
        _ => 5,
    };
    ResultInterpretation::new(
        true,
        format!("Recovered {mana}"),
        format!("Recover {mana} mana (1 minute per mana)."),
    )
    .with_effect(mana)
}

// ============================================================================
// Result Value table
// ============================================================================

/// Lowest and highest RV on the table; anything outside is clamped.
pub const RV_MIN: i32 = -10;
pub const RV_MAX: i32 = 18;

/// One row of the RV table. Rows are looked up, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultValue {
    pub rv: i32,
    /// Verbal rating.
    pub rvr: &'static str,
    /// Damage SV contribution.
    pub rvs: i32,
    /// Armor adjustment.
    pub rva: i32,
    /// Energy.
    pub rve: i32,
    /// Exponential.
    pub rvx: i32,
}

impl ResultValue {
    pub fn is_success(&self) -> bool {
        self.rv >= 0
    }
}

// (rvr, rvs, rva, rve, rvx) for RV -10..=18
const RV_ROWS: [(&str, i32, i32, i32, i32); 29] = [
    ("Terrible", -3, -3, -3, -3),
    ("Terrible", -3, -3, -3, -3),
    ("Horrible", -2, -2, -2, -2),
    ("Horrible", -2, -2, -2, -2),
    ("Worse", -2, -2, -2, -2),
    ("Worse", -2, -2, -1, -1),
    ("Bad", -1, -1, -1, -1),
    ("Bad", -1, -1, 0, 0),
    ("Fail", 0, 0, 0, 0),
    ("Fail", 0, 0, 0, 0),
    ("Fair", 0, 1, 1, 1),
    ("Fair", 0, 1, 1, 1),
    ("Fair", 1, 1, 2, 2),
    ("Fair", 1, 1, 2, 2),
    ("Good", 2, 2, 3, 4),
    ("Good", 2, 2, 3, 4),
    ("Good", 2, 2, 4, 8),
    ("Good", 2, 2, 5, 8),
    ("Great", 3, 3, 6, 16),
    ("Great", 3, 3, 7, 32),
    ("Great", 3, 3, 8, 64),
    ("Great", 3, 3, 9, 128),
    ("Superb", 4, 4, 10, 256),
    ("Superb", 4, 4, 12, 512),
    ("Superb", 4, 4, 14, 1024),
    ("Superb", 4, 4, 14, 1024),
    ("Superb", 4, 4, 14, 1024),
    ("Superb", 4, 4, 14, 1024),
    ("Superb", 4, 4, 14, 1024),
];

/// Look up an RV, clamping to the table edges.
pub fn result_value(rv: i32) -> ResultValue {
    let rv = rv.clamp(RV_MIN, RV_MAX);
    let (rvr, rvs, rva, rve, rvx) = RV_ROWS[(rv - RV_MIN) as usize];
    ResultValue {
        rv,
        rvr,
        rvs,
        rva,
        rve,
        rvx,
    }
}
