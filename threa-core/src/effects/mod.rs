//! Effects: anything that sits on a character over time.
//!
//! An [`EffectRecord`] is pure data. What an effect *does* lives in an
//! [`EffectBehavior`] chosen by its [`EffectType`] through a
//! [`BehaviorRegistry`]. The [`EffectList`] owns the records and drives
//! the lifecycle hooks:
//!
//! ```text
//! add     -> on_adding (merge / reject / replace / side effects) -> on_apply
//! round   -> on_tick   (continue / expire early)
//! expiry  -> on_expire
//! removal -> on_remove
//! ```
//!
//! Behaviors that keep per-effect state store it as JSON in
//! [`EffectRecord::behavior_state`] and read it back through
//! [`EffectRecord::state`].

pub mod behavior;
pub mod condition;
pub mod debuff;
pub mod generic;
pub mod list;
pub mod poison;
pub mod wound;

pub use behavior::{BehaviorRegistry, EffectBehavior, STANDARD_REGISTRY};
pub use condition::ConditionBehavior;
pub use debuff::{DebuffBehavior, DebuffState};
pub use generic::{DefaultBehavior, GenericBehavior, GenericState};
pub use list::{EffectList, ModifierTotal};
pub use poison::{PoisonBehavior, PoisonDamageType, PoisonState};
pub use wound::WoundBehavior;

use crate::attributes::Attribute;
use crate::modifiers::{AsModifier, ModifierSource};
use crate::wounds::BodyLocation;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use uuid::Uuid;

// ============================================================================
// Identity and classification
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub Uuid);

impl EffectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EffectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectType {
    Wound,
    Condition,
    Poison,
    Disease,
    Buff,
    Debuff,
    SpellEffect,
    ItemEffect,
    ObjectEffect,
    Environmental,
}

impl EffectType {
    pub fn all() -> [EffectType; 10] {
        [
            EffectType::Wound,
            EffectType::Condition,
            EffectType::Poison,
            EffectType::Disease,
            EffectType::Buff,
            EffectType::Debuff,
            EffectType::SpellEffect,
            EffectType::ItemEffect,
            EffectType::ObjectEffect,
            EffectType::Environmental,
        ]
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// When an item-granted effect is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ItemEffectTrigger {
    #[default]
    None,
    WhileEquipped,
    WhilePossessed,
    OnPickup,
    OnUse,
}

// ============================================================================
// EffectRecord
// ============================================================================

/// One effect on one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub id: EffectId,
    pub effect_type: EffectType,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<BodyLocation>,
    /// Game-time seconds when the effect was added.
    #[serde(default)]
    pub created_at: i64,
    /// Game-time seconds at which it expires; `None` lasts until removed.
    #[serde(default)]
    pub expires_at: Option<i64>,
    /// Requested duration, turned into `expires_at` when added.
    #[serde(default)]
    pub duration_rounds: Option<i32>,
    /// Rounds ticked so far.
    #[serde(default)]
    pub elapsed_rounds: i32,
    #[serde(default = "one")]
    pub current_stacks: u32,
    #[serde(default = "active")]
    pub is_active: bool,
    /// Behavior-owned JSON.
    #[serde(default)]
    pub behavior_state: serde_json::Value,
    /// Free-form origin, e.g. the attacker or the spell.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_item_id: Option<Uuid>,
    #[serde(default)]
    pub item_trigger: ItemEffectTrigger,
    #[serde(default)]
    pub is_cursed: bool,
    /// Caster holding concentration on this effect, if any.
    #[serde(default)]
    pub concentration_caster: Option<Uuid>,
}

fn one() -> u32 {
    1
}

fn active() -> bool {
    true
}

impl EffectRecord {
    pub fn new(effect_type: EffectType, name: impl Into<String>) -> Self {
        Self {
            id: EffectId::new(),
            effect_type,
            name: name.into(),
            description: None,
            location: None,
            created_at: 0,
            expires_at: None,
            duration_rounds: None,
            elapsed_rounds: 0,
            current_stacks: 1,
            is_active: true,
            behavior_state: serde_json::Value::Null,
            source: None,
            source_item_id: None,
            item_trigger: ItemEffectTrigger::None,
            is_cursed: false,
            concentration_caster: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn at_location(mut self, location: BodyLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_duration_rounds(mut self, rounds: i32) -> Self {
        self.duration_rounds = Some(rounds);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn from_item(mut self, item_id: Uuid, trigger: ItemEffectTrigger) -> Self {
        self.source_item_id = Some(item_id);
        self.item_trigger = trigger;
        self
    }

    pub fn cursed(mut self) -> Self {
        self.is_cursed = true;
        self
    }

    pub fn with_concentration(mut self, caster: Uuid) -> Self {
        self.concentration_caster = Some(caster);
        self
    }

    pub fn with_state<T: Serialize>(mut self, state: &T) -> Self {
        self.set_state(state);
        self
    }

    /// Decode the behavior state, falling back to `T::default()` when the
    /// state is empty or does not fit `T`.
    pub fn state<T: DeserializeOwned + Default>(&self) -> T {
        if self.behavior_state.is_null() {
            return T::default();
        }
        match serde_json::from_value(self.behavior_state.clone()) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    target: "threa::effects",
                    effect = %self.name,
                    error = %e,
                    "unreadable behavior state, using defaults"
                );
                T::default()
            }
        }
    }

    pub fn set_state<T: Serialize>(&mut self, state: &T) {
        match serde_json::to_value(state) {
            Ok(value) => self.behavior_state = value,
            Err(e) => warn!(
                target: "threa::effects",
                effect = %self.name,
                error = %e,
                "failed to store behavior state"
            ),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Seconds left, or `None` for effects without an end.
    pub fn remaining_seconds(&self, now: i64) -> Option<i64> {
        self.expires_at.map(|at| (at - now).max(0))
    }

    pub fn is_from_item(&self) -> bool {
        self.source_item_id.is_some()
    }

    pub fn is_blocking_unequip(&self) -> bool {
        self.is_cursed && self.item_trigger == ItemEffectTrigger::WhileEquipped
    }

    pub fn is_blocking_drop(&self) -> bool {
        self.is_cursed
            && matches!(
                self.item_trigger,
                ItemEffectTrigger::WhilePossessed | ItemEffectTrigger::OnPickup
            )
    }
}

impl fmt::Display for EffectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.effect_type)?;
        if let Some(location) = self.location {
            write!(f, " @ {location}")?;
        }
        if self.current_stacks > 1 {
            write!(f, " x{}", self.current_stacks)?;
        }
        Ok(())
    }
}

// ============================================================================
// Hook results
// ============================================================================

/// A modifier contributed by an effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectModifier {
    pub source: ModifierSource,
    pub description: String,
    pub value: i32,
    pub target_attribute: Option<Attribute>,
    pub target_skill: Option<String>,
}

impl EffectModifier {
    pub fn new(description: impl Into<String>, value: i32) -> Self {
        Self {
            source: ModifierSource::Effect,
            description: description.into(),
            value,
            target_attribute: None,
            target_skill: None,
        }
    }

    pub fn with_source(mut self, source: ModifierSource) -> Self {
        self.source = source;
        self
    }

    pub fn for_attribute(mut self, attribute: Attribute) -> Self {
        self.target_attribute = Some(attribute);
        self
    }

    pub fn for_skill(mut self, skill: impl Into<String>) -> Self {
        self.target_skill = Some(skill.into());
        self
    }
}

impl From<EffectModifier> for AsModifier {
    fn from(m: EffectModifier) -> Self {
        AsModifier::new(m.source, m.description, m.value)
    }
}

/// A further effect to create alongside the one being added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectCreateRequest {
    pub effect_type: EffectType,
    pub name: String,
    pub location: Option<BodyLocation>,
    pub duration_rounds: Option<i32>,
    pub behavior_state: serde_json::Value,
}

impl EffectCreateRequest {
    pub fn into_record(self) -> EffectRecord {
        let mut record = EffectRecord::new(self.effect_type, self.name);
        record.location = self.location;
        record.duration_rounds = self.duration_rounds;
        record.behavior_state = self.behavior_state;
        record
    }
}

/// Verdict of [`EffectBehavior::on_adding`].
#[derive(Debug, Clone, PartialEq)]
pub enum EffectAddResult {
    Add,
    /// Not added; the behavior may already have folded it into an existing
    /// record.
    Reject(Option<String>),
    /// Remove the named effect, then add.
    Replace(EffectId),
    AddWithSideEffects(Vec<EffectCreateRequest>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectTickResult {
    Continue,
    /// Remove now, through `on_remove`.
    ExpireEarly(String),
}
