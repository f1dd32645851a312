//! House-rule tunables.

use crate::time::ROUND_SECONDS;
use crate::wounds::DEFAULT_BLEED_ROUNDS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rules that a table may want to tweak. Missing fields in a config file
/// keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Length of one combat round in game seconds.
    pub round_seconds: i64,

    /// Rounds between bleed ticks of an untreated wound.
    pub wound_bleed_rounds: i32,

    /// Most rounds simulated one by one during a time skip.
    pub time_skip_round_cap: i64,

    /// Result Value used when a check names a skill the character lacks.
    pub unknown_skill_result: i32,

    /// Skill rolled to stay conscious.
    pub focus_skill: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            round_seconds: ROUND_SECONDS,
            wound_bleed_rounds: DEFAULT_BLEED_ROUNDS,
            time_skip_round_cap: 100,
            unknown_skill_result: -10,
            focus_skill: "Focus".to_string(),
        }
    }
}

impl RulesConfig {
    pub fn with_round_seconds(mut self, seconds: i64) -> Self {
        self.round_seconds = seconds.max(1);
        self
    }

    pub fn with_wound_bleed_rounds(mut self, rounds: i32) -> Self {
        self.wound_bleed_rounds = rounds.max(1);
        self
    }

    pub fn with_time_skip_round_cap(mut self, cap: i64) -> Self {
        self.time_skip_round_cap = cap.max(0);
        self
    }

    pub fn with_unknown_skill_result(mut self, rv: i32) -> Self {
        self.unknown_skill_result = rv;
        self
    }

    pub fn with_focus_skill(mut self, skill: impl Into<String>) -> Self {
        self.focus_skill = skill.into();
        self
    }

    /// Read overrides from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&json)?)
    }

    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).await?;
        Ok(())
    }
}
