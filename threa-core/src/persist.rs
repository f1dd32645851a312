//! Character persistence for save/load functionality.
//!
//! A character is stored as one JSON blob per integer ID. Every save
//! replaces the whole aggregate.

use crate::character::{Character, CharacterId};
use crate::time::format_game_time;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current character save file version.
const CHARACTER_SAVE_VERSION: u32 = 1;

/// A saved character that can be reused across sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedCharacter {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the character was saved, in Unix seconds.
    pub saved_at: String,

    /// Quick-access metadata about the character.
    pub metadata: CharacterMetadata,

    /// The complete character data.
    pub character: Character,
}

/// Metadata about a saved character for quick display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterMetadata {
    pub id: CharacterId,
    pub name: String,
    /// Game clock, e.g. `Day 2, 08:00:00`.
    pub game_time: String,
    pub fatigue: String,
    pub vitality: String,
    pub wounds: u32,
    pub xp_total: i32,
    pub is_passed_out: bool,
}

impl CharacterMetadata {
    fn from_character(character: &Character) -> Self {
        Self {
            id: character.id,
            name: character.name.clone(),
            game_time: format_game_time(character.game_time),
            fatigue: character.fatigue().to_string(),
            vitality: character.vitality().to_string(),
            wounds: character.wound_count(),
            xp_total: character.xp_total,
            is_passed_out: character.is_passed_out,
        }
    }
}

impl SavedCharacter {
    /// Create a new saved character from a Character.
    pub fn new(character: Character) -> Self {
        Self {
            version: CHARACTER_SAVE_VERSION,
            saved_at: unix_now(),
            metadata: CharacterMetadata::from_character(&character),
            character,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        info!(
            target: "threa::persist",
            character = %self.metadata.name,
            id = %self.metadata.id,
            path = %path.display(),
            "character saved"
        );
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let mut saved: Self = serde_json::from_str(&content)?;

        if saved.version != CHARACTER_SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: CHARACTER_SAVE_VERSION,
                found: saved.version,
            });
        }

        // Round length lives in the config; the effect list only caches it.
        let config = saved.character.config.clone();
        saved.character.set_config(config);

        info!(
            target: "threa::persist",
            character = %saved.metadata.name,
            path = %path.display(),
            "character loaded"
        );
        Ok(saved)
    }

    /// Save `character` under its ID in `dir`.
    pub async fn save_character(
        character: &Character,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, PersistError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        let path = character_save_path(dir, character.id);
        Self::new(character.clone()).save_json(&path).await?;
        Ok(path)
    }

    /// Load the character with `id` from `dir`.
    pub async fn load_character(
        dir: impl AsRef<Path>,
        id: CharacterId,
    ) -> Result<Character, PersistError> {
        let saved = Self::load_json(character_save_path(dir, id)).await?;
        Ok(saved.character)
    }

    /// Get metadata without loading the full character.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<CharacterMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: CharacterMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != CHARACTER_SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: CHARACTER_SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a character save file.
#[derive(Debug, Clone)]
pub struct CharacterSaveInfo {
    /// Path to the save file.
    pub path: PathBuf,

    /// Character metadata.
    pub metadata: CharacterMetadata,
}

/// List all character save files in a directory, sorted by name.
///
/// A missing directory is created and yields an empty list. Files that are
/// not readable saves are skipped.
pub async fn list_character_saves(
    dir: impl AsRef<Path>,
) -> Result<Vec<CharacterSaveInfo>, PersistError> {
    let mut saves = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(saves);
    }

    let mut entries = fs::read_dir(dir_path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            match SavedCharacter::peek_metadata(&path).await {
                Ok(metadata) => saves.push(CharacterSaveInfo { path, metadata }),
                Err(e) => {
                    debug!(target: "threa::persist", path = %path.display(), error = %e, "skipping file")
                }
            }
        }
    }

    saves.sort_by(|a, b| {
        a.metadata
            .name
            .cmp(&b.metadata.name)
            .then(a.metadata.id.cmp(&b.metadata.id))
    });
    Ok(saves)
}

/// Save path for a character ID.
pub fn character_save_path(dir: impl AsRef<Path>, id: CharacterId) -> PathBuf {
    dir.as_ref().join(format!("character_{}.json", id.0))
}

fn unix_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::testing::sample_character;
    use crate::wounds::BodyLocation;
    use tempfile::TempDir;

    #[test]
    fn test_saved_character_metadata() {
        let mut character = sample_character("Thorin").with_id(CharacterId(7));
        character.take_wound(BodyLocation::Torso);
        character.pools.fatigue.value = 9;

        let saved = SavedCharacter::new(character);

        assert_eq!(saved.version, CHARACTER_SAVE_VERSION);
        assert_eq!(saved.metadata.id, CharacterId(7));
        assert_eq!(saved.metadata.name, "Thorin");
        assert_eq!(saved.metadata.wounds, 1);
        assert_eq!(saved.metadata.fatigue, "FAT 9/15");
        assert_eq!(saved.metadata.game_time, "Day 1, 00:00:00");
    }

    #[test]
    fn test_character_save_path() {
        let path = character_save_path("/saves/characters", CharacterId(42));
        assert!(path.to_string_lossy().ends_with("character_42.json"));
    }

    #[tokio::test]
    async fn test_saved_character_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("test_character.json");

        let mut character = sample_character("Save Test Hero")
            .with_config(RulesConfig::default().with_round_seconds(6));
        character.take_wound(BodyLocation::LeftArm);
        character.purse.gold = 3;

        SavedCharacter::new(character)
            .save_json(&save_path)
            .await
            .expect("Save should succeed");
        assert!(save_path.exists());

        let loaded = SavedCharacter::load_json(&save_path)
            .await
            .expect("Load should succeed");

        assert_eq!(loaded.character.name, "Save Test Hero");
        assert_eq!(loaded.character.wound_count(), 1);
        assert_eq!(loaded.character.purse.gold, 3);
        assert_eq!(loaded.character.effects.round_seconds(), 6);
    }

    #[tokio::test]
    async fn test_version_mismatch() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("old.json");

        let mut saved = SavedCharacter::new(sample_character("Old"));
        saved.version = 0;
        saved.save_json(&save_path).await.expect("Save should succeed");

        assert!(matches!(
            SavedCharacter::load_json(&save_path).await,
            Err(PersistError::VersionMismatch { expected: 1, found: 0 })
        ));
        assert!(matches!(
            SavedCharacter::peek_metadata(&save_path).await,
            Err(PersistError::VersionMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_character_saves() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let char_dir = temp_dir.path().join("characters");

        for (id, name) in [(3, "Charlie"), (1, "Alpha"), (2, "Beta")] {
            let character = sample_character(name).with_id(CharacterId(id));
            SavedCharacter::save_character(&character, &char_dir)
                .await
                .expect("Save should succeed");
        }
        std::fs::write(char_dir.join("notes.json"), "{}").expect("Write should succeed");

        let saves = list_character_saves(&char_dir)
            .await
            .expect("List should succeed");

        let names: Vec<_> = saves.iter().map(|s| s.metadata.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta", "Charlie"]);

        let beta = SavedCharacter::load_character(&char_dir, CharacterId(2))
            .await
            .expect("Load should succeed");
        assert_eq!(beta.name, "Beta");
    }

    #[tokio::test]
    async fn test_list_character_saves_empty_dir() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let char_dir = temp_dir.path().join("empty_characters");

        let saves = list_character_saves(&char_dir)
            .await
            .expect("List should succeed");

        assert!(saves.is_empty());
        assert!(char_dir.exists());
    }
}
