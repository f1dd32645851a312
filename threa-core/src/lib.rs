//! Threa tabletop RPG rules engine.
//!
//! This crate provides:
//! - 4dF+ checks, damage dice and a pluggable [`DiceRoller`]
//! - Fatigue and Vitality pools with cascading overflow and pass-out checks
//! - Per-location wounds, action points and the AS/TV/SV resolver
//! - An effect engine with poisons, conditions, debuffs and custom behaviors
//! - Currency, time skips and JSON persistence of characters
//!
//! # Quick Start
//!
//! ```ignore
//! use threa_core::{CharacterBuilder, RandomDiceRoller, TargetValue};
//!
//! let mut dice = RandomDiceRoller::new();
//! let mut hero = CharacterBuilder::new().name("Aria").build(&mut dice)?;
//!
//! let request = hero
//!     .build_action_request("Physicality")?
//!     .with_target(TargetValue::fixed(8, "Stuck door"));
//! let result = hero.perform_action(request, &mut dice)?;
//! println!("{}", result.summary());
//!
//! hero.end_of_round(&mut dice);
//! ```

pub mod action_points;
pub mod actions;
pub mod attributes;
pub mod character;
pub mod character_builder;
pub mod checks;
pub mod config;
pub mod currency;
pub mod damage;
pub mod dice;
pub mod effects;
pub mod modifiers;
pub mod persist;
pub mod pools;
pub mod skills;
pub mod tables;
pub mod testing;
pub mod time;
pub mod wounds;

// Primary public API
pub use action_points::{ActionPointError, ActionPoints};
pub use actions::{ActionCost, ActionRequest, ActionResolver, ActionResult, ActionType};
pub use attributes::{Attribute, AttributeSet};
pub use character::{Character, CharacterError, CharacterId, RoundReport};
pub use character_builder::{AttributeMethod, BuilderError, CharacterBuilder, Species};
pub use checks::{AbilityScore, DifficultyLevel, RangeBand, TargetValue};
pub use config::RulesConfig;
pub use currency::{CoinType, Currency, CurrencyError};
pub use damage::DamageValue;
pub use dice::{DiceError, DiceExpression, DiceRoller, RandomDiceRoller};
pub use effects::{EffectBehavior, EffectId, EffectList, EffectRecord, EffectType};
pub use modifiers::{AsModifier, ModifierSource, ModifierStack};
pub use persist::{PersistError, SavedCharacter};
pub use pools::{PassOutCheck, Pool, PoolKind, Pools};
pub use skills::{Skill, SkillSet};
pub use tables::{result_value, ResultTableType, ResultValue};
pub use time::{TimeSkip, TimeSkipUnit};
pub use wounds::{BodyLocation, WoundRecord};
