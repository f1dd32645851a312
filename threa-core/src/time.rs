//! Game time. Everything is counted in whole seconds since the campaign
//! epoch; a combat round is [`ROUND_SECONDS`] long.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ROUND_SECONDS: i64 = 3;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Calendar unit for skipping time outside combat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSkipUnit {
    Minute,
    /// Ten minutes.
    Turn,
    Hour,
    Day,
    Week,
}

impl TimeSkipUnit {
    pub fn seconds(&self) -> i64 {
        match self {
            TimeSkipUnit::Minute => SECONDS_PER_MINUTE,
            TimeSkipUnit::Turn => 10 * SECONDS_PER_MINUTE,
            TimeSkipUnit::Hour => SECONDS_PER_HOUR,
            TimeSkipUnit::Day => SECONDS_PER_DAY,
            TimeSkipUnit::Week => 7 * SECONDS_PER_DAY,
        }
    }

    pub fn minutes(&self) -> i64 {
        self.seconds() / SECONDS_PER_MINUTE
    }
}

impl fmt::Display for TimeSkipUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for TimeSkipUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().trim_end_matches('s') {
            "minute" | "min" => Ok(TimeSkipUnit::Minute),
            "turn" => Ok(TimeSkipUnit::Turn),
            "hour" | "hr" => Ok(TimeSkipUnit::Hour),
            "day" => Ok(TimeSkipUnit::Day),
            "week" | "wk" => Ok(TimeSkipUnit::Week),
            _ => Err(format!("unknown time unit '{s}'")),
        }
    }
}

/// `count` units of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSkip {
    pub unit: TimeSkipUnit,
    pub count: i64,
}

impl TimeSkip {
    pub fn new(unit: TimeSkipUnit, count: i64) -> Self {
        Self {
            unit,
            count: count.max(0),
        }
    }

    pub fn seconds(&self) -> i64 {
        self.unit.seconds() * self.count
    }

    pub fn minutes(&self) -> i64 {
        self.unit.minutes() * self.count
    }

    pub fn whole_hours(&self) -> i64 {
        self.seconds() / SECONDS_PER_HOUR
    }

    pub fn rounds(&self, round_seconds: i64) -> i64 {
        self.seconds() / round_seconds.max(1)
    }
}

impl fmt::Display for TimeSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.count == 1 { "" } else { "s" };
        write!(f, "{} {}{plural}", self.count, self.unit.to_string().to_lowercase())
    }
}

/// `Day 3, 14:05:09` for game-time seconds; day numbering starts at 1.
pub fn format_game_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let day = seconds / SECONDS_PER_DAY + 1;
    let rest = seconds % SECONDS_PER_DAY;
    format!(
        "Day {day}, {:02}:{:02}:{:02}",
        rest / SECONDS_PER_HOUR,
        rest % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        rest % SECONDS_PER_MINUTE
    )
}
