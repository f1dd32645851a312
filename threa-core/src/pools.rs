//! Fatigue and Vitality.
//!
//! Both pools hold a current value, a base (maximum) and two queues of
//! pending damage and healing. Queues drain gradually: every round a
//! pool applies roughly half of what is pending, so a big hit lands over
//! several rounds.
//!
//! The pools form a chain. Fatigue that goes negative doubles into
//! Vitality's pending damage; Vitality that goes negative becomes wounds.
//! [`Pools`] owns both so the first link of the chain stays local; the
//! wound link is handed back to the caller as [`PoolTick::overflow`].

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Which pool a value belongs to. The two pools round differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolKind {
    Fatigue,
    Vitality,
}

impl PoolKind {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            PoolKind::Fatigue => "FAT",
            PoolKind::Vitality => "VIT",
        }
    }

    /// Portion of pending healing applied this round.
    fn healing_step(&self, pending: i32) -> i32 {
        match self {
            PoolKind::Fatigue => (pending + 1) / 2,
            PoolKind::Vitality if pending <= 1 => pending.max(0),
            PoolKind::Vitality => pending / 2,
        }
    }

    /// Portion of pending damage applied this round.
    fn damage_step(&self, pending: i32) -> i32 {
        match self {
            PoolKind::Fatigue => (pending + 1) / 2,
            PoolKind::Vitality if pending <= 0 => 0,
            PoolKind::Vitality if pending <= 2 => 1,
            PoolKind::Vitality => pending / 2,
        }
    }

    /// Pass-out gate for a current value.
    pub fn pass_out_check(&self, value: i32) -> PassOutCheck {
        let ladder: [(i32, PassOutCheck); 4] = match self {
            PoolKind::Fatigue => [
                (1, PassOutCheck::Always),
                (2, PassOutCheck::Focus(12)),
                (4, PassOutCheck::Focus(7)),
                (6, PassOutCheck::Focus(5)),
            ],
            PoolKind::Vitality => [
                (2, PassOutCheck::Always),
                (4, PassOutCheck::Focus(12)),
                (6, PassOutCheck::Focus(7)),
                (8, PassOutCheck::Focus(5)),
            ],
        };
        ladder
            .into_iter()
            .find(|(below, _)| value < *below)
            .map(|(_, check)| check)
            .unwrap_or(PassOutCheck::None)
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// What a low pool demands of the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutCheck {
    /// Still conscious.
    None,
    /// Out cold, no roll.
    Always,
    /// Out cold when a Focus check against this TV succeeds.
    Focus(i32),
}

/// Outcome of one pool's end-of-round step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolTick {
    /// False when the pool was full and had nothing pending.
    pub ran: bool,
    pub healed: i32,
    pub damaged: i32,
    /// How far below zero the pool went before being clamped.
    pub overflow: i32,
}

/// A Fatigue or Vitality pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub kind: PoolKind,
    pub value: i32,
    pub base_value: i32,
    pub pending_damage: i32,
    pub pending_healing: i32,
}

impl Pool {
    pub fn new(kind: PoolKind, base_value: i32) -> Self {
        Self {
            kind,
            value: base_value,
            base_value,
            pending_damage: 0,
            pending_healing: 0,
        }
    }

    /// Fatigue base: END + WIL - 5.
    pub fn fatigue(endurance: i32, willpower: i32) -> Self {
        Self::new(PoolKind::Fatigue, endurance + willpower - 5)
    }

    /// Vitality base: 2 × STR - 5.
    pub fn vitality(strength: i32) -> Self {
        Self::new(PoolKind::Vitality, strength * 2 - 5)
    }

    pub fn add_damage(&mut self, amount: i32) {
        self.pending_damage += amount.max(0);
    }

    pub fn add_healing(&mut self, amount: i32) {
        self.pending_healing += amount.max(0);
    }

    /// Whether a round would change anything.
    pub fn needs_tick(&self) -> bool {
        self.value < self.base_value || self.pending_damage > 0 || self.pending_healing > 0
    }

    pub fn pass_out_check(&self) -> PassOutCheck {
        self.kind.pass_out_check(self.value)
    }

    /// Advance one round. `recovery_allowed` gates the passive +1 healing.
    pub fn tick(&mut self, recovery_allowed: bool) -> PoolTick {
        if !self.needs_tick() {
            return PoolTick::default();
        }

        if self.value < self.base_value && recovery_allowed {
            self.pending_healing += 1;
        }

        let healed = self.kind.healing_step(self.pending_healing);
        self.pending_healing -= healed;
        self.value = (self.value + healed).min(self.base_value);

        let damaged = self.kind.damage_step(self.pending_damage);
        self.pending_damage -= damaged;
        self.value -= damaged;

        let mut overflow = 0;
        if self.value < 0 {
            overflow = -self.value;
            self.value = 0;
        }

        PoolTick {
            ran: true,
            healed,
            damaged,
            overflow,
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.value, self.base_value)?;
        if self.pending_damage > 0 {
            write!(f, " (-{} pending)", self.pending_damage)?;
        }
        if self.pending_healing > 0 {
            write!(f, " (+{} pending)", self.pending_healing)?;
        }
        Ok(())
    }
}

/// Both pools of one character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pools {
    pub fatigue: Pool,
    pub vitality: Pool,
}

impl Pools {
    pub fn new(fatigue: Pool, vitality: Pool) -> Self {
        Self { fatigue, vitality }
    }

    /// Fatigue step. Recovery needs Vitality of at least 5; overflow lands
    /// doubled on Vitality.
    pub fn end_of_round_fatigue(&mut self) -> PoolTick {
        let recovery_allowed = self.vitality.value >= 5;
        let tick = self.fatigue.tick(recovery_allowed);
        if tick.overflow > 0 {
            self.vitality.add_damage(tick.overflow * 2);
            info!(
                target: "threa::pools",
                overflow = tick.overflow,
                vitality_damage = tick.overflow * 2,
                "fatigue overflow cascaded into vitality"
            );
        }
        if tick.ran {
            debug!(target: "threa::pools", pool = %self.fatigue, "fatigue ticked");
        }
        tick
    }

    /// Vitality step. Recovery needs more than half of base; the caller
    /// turns `overflow` into that many wounds.
    pub fn end_of_round_vitality(&mut self) -> PoolTick {
        let recovery_allowed = self.vitality.value > self.vitality.base_value / 2;
        let tick = self.vitality.tick(recovery_allowed);
        if tick.overflow > 0 {
            info!(
                target: "threa::pools",
                overflow = tick.overflow,
                "vitality overflow becomes wounds"
            );
        }
        if tick.ran {
            debug!(target: "threa::pools", pool = %self.vitality, "vitality ticked");
        }
        tick
    }

    pub fn get(&self, kind: PoolKind) -> &Pool {
        match kind {
            PoolKind::Fatigue => &self.fatigue,
            PoolKind::Vitality => &self.vitality,
        }
    }

    pub fn get_mut(&mut self, kind: PoolKind) -> &mut Pool {
        match kind {
            PoolKind::Fatigue => &mut self.fatigue,
            PoolKind::Vitality => &mut self.vitality,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.fatigue.pending_damage == 0
            && self.fatigue.pending_healing == 0
            && self.vitality.pending_damage == 0
            && self.vitality.pending_healing == 0
    }
}
