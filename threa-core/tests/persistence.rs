//! Saving a character mid-fight and carrying on from the file.

use threa_core::effects::poison::{PoisonBehavior, PoisonState};
use threa_core::persist::list_character_saves;
use threa_core::testing::{sample_character, DeterministicDiceRoller};
use threa_core::{BodyLocation, CharacterId, SavedCharacter};
use tempfile::TempDir;

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_loaded_character_continues_identically() {
    setup();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut hero = sample_character("Wanderer").with_id(CharacterId(11));
    let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(0);
    hero.take_wound(BodyLocation::LeftLeg);
    hero.pools.fatigue.add_damage(5);
    hero.add_effect(PoisonBehavior::effect(&PoisonState::weak().with_tick_interval(2)))
        .expect("poison added");
    hero.end_of_round(&mut roller);

    SavedCharacter::save_character(&hero, temp_dir.path())
        .await
        .expect("Save should succeed");
    let mut loaded = SavedCharacter::load_character(temp_dir.path(), CharacterId(11))
        .await
        .expect("Load should succeed");

    assert_eq!(loaded.pools, hero.pools);
    assert_eq!(loaded.wounds(), hero.wounds());
    assert_eq!(loaded.game_time, hero.game_time);

    let mut other_roller = DeterministicDiceRoller::with_fixed_4df_plus(0);
    for _ in 0..6 {
        hero.end_of_round(&mut roller);
        loaded.end_of_round(&mut other_roller);
    }
    assert_eq!(loaded.pools, hero.pools);
    assert_eq!(loaded.wounds(), hero.wounds());
    assert_eq!(loaded.action_points, hero.action_points);
    assert_eq!(
        loaded.ability_score("Awareness").unwrap().value(),
        hero.ability_score("Awareness").unwrap().value()
    );
}

#[tokio::test]
async fn test_save_replaces_previous_snapshot() {
    setup();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut hero = sample_character("Iterant").with_id(CharacterId(4));

    SavedCharacter::save_character(&hero, temp_dir.path())
        .await
        .expect("Save should succeed");
    hero.award_xp(25);
    hero.spend_xp(25).expect("enough banked XP");
    hero.take_wound(BodyLocation::Head);
    SavedCharacter::save_character(&hero, temp_dir.path())
        .await
        .expect("Save should succeed");

    let saves = list_character_saves(temp_dir.path())
        .await
        .expect("List should succeed");
    assert_eq!(saves.len(), 1);
    assert_eq!(saves[0].metadata.xp_total, 25);
    assert_eq!(saves[0].metadata.wounds, 1);
}

#[tokio::test]
async fn test_missing_character_is_an_error() {
    setup();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = SavedCharacter::load_character(temp_dir.path(), CharacterId(99)).await;
    assert!(matches!(result, Err(threa_core::PersistError::Io(_))));
}
