//! Named, sourced, signed modifiers and the stack that sums them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a modifier comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierSource {
    Base,
    Equipment,
    Wound,
    MultipleAction,
    Boost,
    Aim,
    Effect,
    Environment,
    LowFatigue,
    LowVitality,
    Situational,
}

/// One entry in a [`ModifierStack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsModifier {
    pub source: ModifierSource,
    pub description: String,
    pub value: i32,
}

impl AsModifier {
    pub fn new(source: ModifierSource, description: impl Into<String>, value: i32) -> Self {
        Self {
            source,
            description: description.into(),
            value,
        }
    }
}

impl fmt::Display for AsModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, signed(self.value))
    }
}

/// Format a value with an explicit sign: `+2`, `-1`, `+0`.
pub(crate) fn signed(value: i32) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// Ordered list of modifiers. Order is kept for breakdown display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierStack {
    modifiers: Vec<AsModifier>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modifiers(&self) -> &[AsModifier] {
        &self.modifiers
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    pub fn push(&mut self, modifier: AsModifier) {
        self.modifiers.push(modifier);
    }

    pub fn add(&mut self, source: ModifierSource, description: impl Into<String>, value: i32) {
        self.modifiers.push(AsModifier::new(source, description, value));
    }

    pub fn extend(&mut self, modifiers: impl IntoIterator<Item = AsModifier>) {
        self.modifiers.extend(modifiers);
    }

    pub fn total(&self) -> i32 {
        self.modifiers.iter().map(|m| m.value).sum()
    }

    pub fn total_bonuses(&self) -> i32 {
        self.modifiers.iter().filter(|m| m.value > 0).map(|m| m.value).sum()
    }

    pub fn total_penalties(&self) -> i32 {
        self.modifiers.iter().filter(|m| m.value < 0).map(|m| m.value).sum()
    }

    pub fn remove_by_source(&mut self, source: ModifierSource) {
        self.modifiers.retain(|m| m.source != source);
    }

    pub fn by_source(&self, source: ModifierSource) -> impl Iterator<Item = &AsModifier> {
        self.modifiers.iter().filter(move |m| m.source == source)
    }

    pub fn total_by_source(&self, source: ModifierSource) -> i32 {
        self.by_source(source).map(|m| m.value).sum()
    }

    pub fn clear(&mut self) {
        self.modifiers.clear();
    }

    /// One line per modifier followed by the total.
    pub fn breakdown(&self) -> String {
        if self.modifiers.is_empty() {
            return "No modifiers".to_string();
        }
        let lines: Vec<String> = self.modifiers.iter().map(|m| m.to_string()).collect();
        format!("{}\n---\nTotal: {}", lines.join("\n"), signed(self.total()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ModifierStack {
        let mut stack = ModifierStack::new();
        stack.add(ModifierSource::MultipleAction, "Multiple Action", -1);
        stack.add(ModifierSource::Wound, "Wounds (×1)", -2);
        stack.add(ModifierSource::Aim, "Aimed", 2);
        stack.add(ModifierSource::Effect, "Bless", 1);
        stack
    }

    #[test]
    fn test_totals() {
        let stack = sample();
        assert_eq!(stack.total(), 0);
        assert_eq!(stack.total_bonuses(), 3);
        assert_eq!(stack.total_penalties(), -3);
        assert_eq!(stack.total_by_source(ModifierSource::Wound), -2);
    }

    #[test]
    fn test_remove_by_source() {
        let mut stack = sample();
        stack.remove_by_source(ModifierSource::Aim);
        assert_eq!(stack.total(), -2);
        assert_eq!(stack.by_source(ModifierSource::Aim).count(), 0);
        assert_eq!(stack.modifiers().len(), 3);
    }

    #[test]
    fn test_display_format() {
        let m = AsModifier::new(ModifierSource::Aim, "Aimed", 2);
        assert_eq!(m.to_string(), "Aimed: +2");
        let m = AsModifier::new(ModifierSource::Wound, "Wounds (×2)", -4);
        assert_eq!(m.to_string(), "Wounds (×2): -4");
    }

    #[test]
    fn test_breakdown() {
        assert_eq!(ModifierStack::new().breakdown(), "No modifiers");
        let mut stack = ModifierStack::new();
        stack.add(ModifierSource::Aim, "Aimed", 2);
        assert_eq!(stack.breakdown(), "Aimed: +2\n---\nTotal: +2");
    }
}
