//! Action Point ledger.
//!
//! Points are spent on actions, locked while resting and regained at the
//! end of each round. Fatigue costs are charged to the caller's Fatigue
//! pool, which is passed in explicitly.

use crate::actions::ActionCost;
use crate::pools::Pool;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionPointError {
    #[error("Insufficient AP: need {needed}, have {available}")]
    InsufficientActionPoints { needed: i32, available: i32 },
    #[error("Action already taken this round")]
    ActionAlreadyTaken,
    #[error("Negative {what}: {amount}")]
    NegativeAmount { what: &'static str, amount: i32 },
}

/// Per-round action economy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPoints {
    pub available: i32,
    /// Held back by resting, returned next round.
    pub locked: i32,
    /// Spent this round.
    pub spent: i32,
    pub max: i32,
    /// Regained each round.
    pub recovery: i32,
}

impl ActionPoints {
    /// Ledger for a character with the given Fatigue base and XP total.
    pub fn new(fatigue_base: i32, xp_total: i32) -> Self {
        let max = Self::max_for_xp(xp_total);
        Self {
            available: max,
            locked: 0,
            spent: 0,
            max,
            recovery: Self::recovery_for_fatigue(fatigue_base),
        }
    }

    /// One point per ten XP, never below one.
    pub fn max_for_xp(xp_total: i32) -> i32 {
        (xp_total / 10).max(1)
    }

    pub fn recovery_for_fatigue(fatigue_base: i32) -> i32 {
        (fatigue_base / 4).max(0)
    }

    /// Recompute derived limits after XP or attribute changes.
    pub fn recalculate(&mut self, fatigue_base: i32, xp_total: i32) {
        self.max = Self::max_for_xp(xp_total);
        self.recovery = Self::recovery_for_fatigue(fatigue_base);
        self.available = self.available.min(self.max);
    }

    pub fn end_of_round(&mut self) {
        self.available += self.recovery + self.locked;
        self.spent = 0;
        self.locked = 0;
        if self.available > self.max {
            self.available = self.max;
        }
    }

    /// Trade `points` for Fatigue healing; everything else left is locked.
    pub fn rest(&mut self, points: i32, fatigue: &mut Pool) -> Result<(), ActionPointError> {
        non_negative("rest points", points)?;
        self.require(points)?;
        if self.spent > 0 {
            return Err(ActionPointError::ActionAlreadyTaken);
        }
        fatigue.add_healing(points);
        self.available -= points;
        self.locked += self.available;
        self.available = 0;
        debug!(target: "threa::actions", points, locked = self.locked, "rested");
        Ok(())
    }

    /// Standard action: 1 AP plus 1 + `boost` Fatigue.
    pub fn take_action_with_fatigue(
        &mut self,
        boost: i32,
        fatigue: &mut Pool,
    ) -> Result<(), ActionPointError> {
        non_negative("fatigue boost", boost)?;
        self.require(1)?;
        fatigue.pending_damage += 1 + boost;
        self.available -= 1;
        self.spent += 1;
        Ok(())
    }

    /// Fatigue-free action: 2 AP, only `boost` Fatigue.
    pub fn take_action_no_fatigue(
        &mut self,
        boost: i32,
        fatigue: &mut Pool,
    ) -> Result<(), ActionPointError> {
        non_negative("fatigue boost", boost)?;
        self.require(2)?;
        fatigue.pending_damage += boost;
        self.available -= 2;
        self.spent += 2;
        Ok(())
    }

    /// Charge an arbitrary [`ActionCost`].
    pub fn pay(&mut self, cost: &ActionCost, fatigue: &mut Pool) -> Result<(), ActionPointError> {
        non_negative("AP cost", cost.ap)?;
        non_negative("FAT cost", cost.fat)?;
        non_negative("AP boost", cost.boost_ap)?;
        non_negative("FAT boost", cost.boost_fat)?;
        let ap = cost.total_ap();
        self.require(ap)?;
        fatigue.pending_damage += cost.total_fat();
        self.available -= ap;
        self.spent += ap;
        Ok(())
    }

    pub fn can_afford(&self, points: i32) -> bool {
        self.available >= points
    }

    fn require(&self, needed: i32) -> Result<(), ActionPointError> {
        if self.available < needed {
            return Err(ActionPointError::InsufficientActionPoints {
                needed,
                available: self.available,
            });
        }
        Ok(())
    }
}

/// Amounts handed to the ledger are never negative.
fn non_negative(what: &'static str, amount: i32) -> Result<(), ActionPointError> {
    if amount < 0 {
        return Err(ActionPointError::NegativeAmount { what, amount });
    }
    Ok(())
}
