//! End-of-round processing across pools, wounds and action points.
//!
//! Run with: `RUST_LOG=threa=debug cargo test -p threa-core --test round_processing -- --nocapture`

use threa_core::testing::{
    assert_conscious, assert_passed_out, assert_pools, assert_wounds, sample_character,
    DeterministicDiceRoller, TestHarness,
};
use threa_core::action_points::ActionPointError;
use threa_core::{
    BodyLocation, CharacterError, DamageValue, Pool, RulesConfig, TargetValue, TimeSkip,
    TimeSkipUnit,
};

fn setup() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Pools
// =============================================================================

#[test]
fn test_fatigue_damage_drains_by_halves() {
    setup();
    let mut harness = TestHarness::new();
    harness.character.pools.fatigue.add_damage(8);
    harness.run_rounds(5);

    let values: Vec<i32> = harness.rounds.iter().map(|r| r.fatigue.damaged).collect();
    assert_eq!(values, vec![4, 2, 1, 1, 0]);
    // Passive recovery starts once Fatigue is below base.
    assert_eq!(harness.character.pools.fatigue.value, 11);
    assert_eq!(harness.character.pools.vitality.value, 15);
    assert_conscious(&harness.character);
}

#[test]
fn test_exhaustion_cascades_into_vitality() {
    setup();
    let mut harness = TestHarness::new();
    harness.character.pools.fatigue.value = 0;
    harness.character.pools.fatigue.add_damage(10);

    harness.run_rounds(1);
    let first = harness.rounds[0];
    assert_eq!(first.fatigue.overflow, 4);
    assert!(first.passed_out);
    assert_pools(&harness.character, 0, 11);
    assert_eq!(harness.character.pools.vitality.pending_damage, 4);

    harness.run_rounds(1);
    let second = harness.rounds[1];
    assert_eq!(second.fatigue.overflow, 2);
    assert!(!second.passed_out, "already unconscious");
    assert_pools(&harness.character, 0, 8);
    assert_passed_out(&harness.character);
}

#[test]
fn test_vitality_overflow_wounds_random_locations() {
    setup();
    let mut harness = TestHarness::new();
    harness.character.pools.vitality.value = 2;
    harness.character.pools.vitality.add_damage(6);
    harness.dice.queue_dice([11, 12, 12]);

    harness.run_rounds(1);

    assert_eq!(harness.rounds[0].wounds_taken, 1);
    assert_eq!(harness.wounds_at(BodyLocation::RightLeg), 1);
    assert_eq!(harness.character.pools.vitality.value, 0);
    assert_passed_out(&harness.character);

    // Second overflow point lands on the head via a double twelve.
    harness.run_rounds(1);
    assert_eq!(harness.wounds_at(BodyLocation::Head), harness.rounds[1].wounds_taken);
}

#[test]
fn test_rested_low_vitality_character_stays_awake() {
    setup();
    let mut harness = TestHarness::new();
    harness.character.pools.vitality = Pool::vitality(6);
    harness.dice = DeterministicDiceRoller::with_fixed_4df_plus(10);

    harness.run_rounds(10);

    assert!(harness.rounds.iter().all(|r| !r.vitality.ran));
    assert_pools(&harness.character, 15, 7);
    assert_conscious(&harness.character);
}

// =============================================================================
// Wounds
// =============================================================================

#[test]
fn test_untreated_wound_bleeds_on_its_interval() {
    setup();
    let character =
        sample_character("Bleeder").with_config(RulesConfig::default().with_wound_bleed_rounds(2));
    let mut harness = TestHarness::with_character(character);
    harness.character.take_wound(BodyLocation::LeftArm);

    harness.run_rounds(1);
    assert!(harness.character.pools.is_settled());

    // Bleeds at the end of round two, applied during round three.
    harness.run_rounds(1);
    assert_eq!(harness.character.pools.fatigue.pending_damage, 2);
    assert_eq!(harness.character.pools.vitality.pending_damage, 1);

    harness.run_rounds(1);
    assert_pools(&harness.character, 14, 14);
    assert_wounds(&harness.character, 1);
}

#[test]
fn test_heavy_hit_routes_into_every_channel() {
    setup();
    let mut roller = DeterministicDiceRoller::new();
    roller.queue_dice([1, 6]);
    let mut hero = sample_character("Tank");

    let wounds = hero.take_damage(&DamageValue::new(12, 1), &mut roller);

    assert_eq!(wounds, 2);
    assert_eq!(hero.pools.fatigue.pending_damage, 12);
    assert_eq!(hero.pools.vitality.pending_damage, 12);
    assert!(hero.effects.wound_record(BodyLocation::Torso).is_some());
    assert!(hero.effects.wound_record(BodyLocation::RightArm).is_some());

    // Damage from a lower class is scaled down by a factor of ten.
    let mut dragon = sample_character("Dragon");
    dragon.damage_class = 2;
    assert_eq!(dragon.take_damage(&DamageValue::new(12, 1), &mut roller), 0);
    assert_eq!(dragon.pools.fatigue.pending_damage, 1);
    assert_eq!(dragon.pools.vitality.pending_damage, 0);
}

// =============================================================================
// Action points
// =============================================================================

#[test]
fn test_action_points_cycle_through_rounds() {
    setup();
    let mut hero = sample_character("Runner");
    hero.award_xp(30);
    hero.spend_xp(30).unwrap();
    assert_eq!(hero.action_points.max, 3);

    let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(0);
    hero.end_of_round(&mut roller);
    assert_eq!(hero.action_points.available, 3);

    for _ in 0..2 {
        let request = hero
            .build_action_request("Sprint")
            .unwrap()
            .with_target(TargetValue::fixed(4, "Hallway"));
        hero.perform_action(request, &mut roller).unwrap();
    }
    assert_eq!(hero.action_points.available, 1);
    assert_eq!(hero.action_points.spent, 2);

    hero.end_of_round(&mut roller);
    assert_eq!(hero.action_points.available, 3);
    assert_eq!(hero.action_points.spent, 0);

    // Resting converts one point to healing and locks the rest.
    hero.rest(1).unwrap();
    assert_eq!(hero.action_points.locked, 2);
    assert_eq!(hero.pools.fatigue.pending_healing, 1);
    hero.end_of_round(&mut roller);
    assert_eq!(hero.action_points.available, 3);
}

#[test]
fn test_negative_costs_never_mint_action_points() {
    setup();
    let mut hero = sample_character("Cheat");
    let mut roller = DeterministicDiceRoller::with_fixed_4df_plus(0);

    let request = hero
        .build_action_request("Physicality")
        .unwrap()
        .with_boosts(-5, 0);
    assert!(matches!(
        hero.perform_action(request, &mut roller),
        Err(CharacterError::ActionPoints(ActionPointError::NegativeAmount { .. }))
    ));
    assert!(matches!(
        hero.rest(-3),
        Err(CharacterError::ActionPoints(ActionPointError::NegativeAmount { .. }))
    ));
    assert_eq!(hero.action_points.available, 1);
    assert_eq!(hero.action_points.spent, 0);
    assert_eq!(hero.action_points.locked, 0);
    assert_eq!(hero.pools.fatigue.pending_healing, 0);

    // The honest action still goes through and spends the point.
    let request = hero.build_action_request("Physicality").unwrap();
    hero.perform_action(request, &mut roller).unwrap();
    assert_eq!(hero.action_points.available, 0);
    assert_eq!(hero.action_points.spent, 1);
}

// =============================================================================
// Time skips
// =============================================================================

#[test]
fn test_long_rest_restores_pools() {
    setup();
    let mut harness = TestHarness::new();
    harness.dice = DeterministicDiceRoller::with_fixed_4df_plus(6);
    harness.character.pools.fatigue.value = 2;
    harness.character.pools.vitality.value = 6;

    harness.skip(TimeSkip::new(TimeSkipUnit::Hour, 8));

    assert_eq!(harness.character.game_time, 8 * 3_600);
    assert_pools(&harness.character, 15, 15);
    assert!(harness.character.pools.is_settled());
    // Focus succeeds against TV 7 on the first simulated round; sleep is
    // not interrupted.
    assert_passed_out(&harness.character);
    harness.character.wake_up();
    assert_conscious(&harness.character);
}

#[test]
fn test_short_skip_runs_every_round() {
    setup();
    let mut harness = TestHarness::new();
    harness.character.pools.fatigue.add_damage(4);

    // One minute is twenty rounds, well under the cap.
    harness.skip(TimeSkip::new(TimeSkipUnit::Minute, 1));

    assert_eq!(harness.character.game_time, 60);
    assert!(harness.character.pools.is_settled());
    assert_pools(&harness.character, 15, 15);
}
