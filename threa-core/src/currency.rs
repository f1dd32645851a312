//! Coins and money changing.
//!
//! | coin     | value in copper |
//! |----------|-----------------|
//! | copper   | 1               |
//! | silver   | 20              |
//! | gold     | 400             |
//! | platinum | 8000            |

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const COPPER_PER_SILVER: i64 = 20;
pub const COPPER_PER_GOLD: i64 = 400;
pub const COPPER_PER_PLATINUM: i64 = 8_000;
pub const COINS_PER_POUND: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(i64),

    #[error("Insufficient funds: need {needed}cp, have {available}cp")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("Not enough {coin} coins: need {needed}, have {available}")]
    InsufficientCoins {
        coin: CoinType,
        needed: u32,
        available: u32,
    },

    #[error("{count} {from} does not convert evenly into {to}")]
    UnevenConversion { from: CoinType, to: CoinType, count: u32 },

    #[error("Copper cannot be broken into smaller coins")]
    CannotBreakCopper,

    #[error("Invalid currency string: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoinType {
    Copper,
    Silver,
    Gold,
    Platinum,
}

impl CoinType {
    pub fn copper_value(&self) -> i64 {
        match self {
            CoinType::Copper => 1,
            CoinType::Silver => COPPER_PER_SILVER,
            CoinType::Gold => COPPER_PER_GOLD,
            CoinType::Platinum => COPPER_PER_PLATINUM,
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            CoinType::Copper => "cp",
            CoinType::Silver => "sp",
            CoinType::Gold => "gp",
            CoinType::Platinum => "pp",
        }
    }

    /// The next coin down, for breaking.
    fn smaller(&self) -> Option<CoinType> {
        match self {
            CoinType::Copper => None,
            CoinType::Silver => Some(CoinType::Copper),
            CoinType::Gold => Some(CoinType::Silver),
            CoinType::Platinum => Some(CoinType::Gold),
        }
    }

    fn parse_denomination(s: &str) -> Option<CoinType> {
        match s {
            "cp" | "c" | "copper" => Some(CoinType::Copper),
            "sp" | "s" | "silver" => Some(CoinType::Silver),
            "gp" | "g" | "gold" => Some(CoinType::Gold),
            "pp" | "p" | "platinum" => Some(CoinType::Platinum),
            _ => None,
        }
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A purse of coins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    pub copper: u32,
    pub silver: u32,
    pub gold: u32,
    pub platinum: u32,
}

impl Currency {
    pub fn new(copper: u32, silver: u32, gold: u32, platinum: u32) -> Self {
        Self {
            copper,
            silver,
            gold,
            platinum,
        }
    }

    /// Fewest coins worth `value` copper.
    pub fn from_copper(value: i64) -> Result<Self, CurrencyError> {
        if value < 0 {
            return Err(CurrencyError::NegativeAmount(value));
        }
        let platinum = value / COPPER_PER_PLATINUM;
        let rest = value % COPPER_PER_PLATINUM;
        Ok(Self {
            platinum: platinum as u32,
            gold: (rest / COPPER_PER_GOLD) as u32,
            silver: (rest % COPPER_PER_GOLD / COPPER_PER_SILVER) as u32,
            copper: (rest % COPPER_PER_SILVER) as u32,
        })
    }

    pub fn total_copper(&self) -> i64 {
        i64::from(self.copper)
            + i64::from(self.silver) * COPPER_PER_SILVER
            + i64::from(self.gold) * COPPER_PER_GOLD
            + i64::from(self.platinum) * COPPER_PER_PLATINUM
    }

    pub fn total_coins(&self) -> u32 {
        self.copper + self.silver + self.gold + self.platinum
    }

    pub fn weight_in_pounds(&self) -> f64 {
        f64::from(self.total_coins()) / COINS_PER_POUND
    }

    pub fn is_empty(&self) -> bool {
        self.total_coins() == 0
    }

    pub fn count(&self, coin: CoinType) -> u32 {
        match coin {
            CoinType::Copper => self.copper,
            CoinType::Silver => self.silver,
            CoinType::Gold => self.gold,
            CoinType::Platinum => self.platinum,
        }
    }

    fn count_mut(&mut self, coin: CoinType) -> &mut u32 {
        match coin {
            CoinType::Copper => &mut self.copper,
            CoinType::Silver => &mut self.silver,
            CoinType::Gold => &mut self.gold,
            CoinType::Platinum => &mut self.platinum,
        }
    }

    pub fn add(&mut self, other: &Currency) {
        self.copper += other.copper;
        self.silver += other.silver;
        self.gold += other.gold;
        self.platinum += other.platinum;
    }

    pub fn add_coins(&mut self, coin: CoinType, count: u32) {
        *self.count_mut(coin) += count;
    }

    pub fn has_value(&self, copper: i64) -> bool {
        self.total_copper() >= copper
    }

    pub fn has_exact_coins(&self, coins: &Currency) -> bool {
        self.copper >= coins.copper
            && self.silver >= coins.silver
            && self.gold >= coins.gold
            && self.platinum >= coins.platinum
    }

    /// Compare purses by value.
    pub fn cmp_value(&self, other: &Currency) -> Ordering {
        self.total_copper().cmp(&other.total_copper())
    }

    /// Same value in the fewest coins.
    pub fn optimized(&self) -> Self {
        // total_copper is never negative
        Self::from_copper(self.total_copper()).unwrap_or_default()
    }

    /// Pay `cost` copper by value; the purse is re-minted into the fewest
    /// coins afterwards.
    pub fn pay(&mut self, cost: i64) -> Result<(), CurrencyError> {
        if cost < 0 {
            return Err(CurrencyError::NegativeAmount(cost));
        }
        let available = self.total_copper();
        if available < cost {
            return Err(CurrencyError::InsufficientFunds {
                needed: cost,
                available,
            });
        }
        *self = Self::from_copper(available - cost)?;
        Ok(())
    }

    /// Hand over exactly these coins.
    pub fn pay_exact(&mut self, payment: &Currency) -> Result<(), CurrencyError> {
        self.require_coins(payment)?;
        self.copper -= payment.copper;
        self.silver -= payment.silver;
        self.gold -= payment.gold;
        self.platinum -= payment.platinum;
        Ok(())
    }

    /// Change one coin into twenty of the next smaller kind.
    pub fn break_coin(&mut self, coin: CoinType) -> Result<(), CurrencyError> {
        let smaller = coin.smaller().ok_or(CurrencyError::CannotBreakCopper)?;
        self.take_coins(coin, 1)?;
        self.add_coins(smaller, 20);
        Ok(())
    }

    /// Exchange `count` coins of one kind for coins of another. Converting
    /// up must come out even.
    pub fn convert(&mut self, from: CoinType, to: CoinType, count: u32) -> Result<(), CurrencyError> {
        let value = i64::from(count) * from.copper_value();
        if value % to.copper_value() != 0 {
            return Err(CurrencyError::UnevenConversion { from, to, count });
        }
        self.take_coins(from, count)?;
        self.add_coins(to, (value / to.copper_value()) as u32);
        Ok(())
    }

    /// Move exact coins into another purse.
    pub fn transfer(&mut self, to: &mut Currency, amount: &Currency) -> Result<(), CurrencyError> {
        self.pay_exact(amount)?;
        to.add(amount);
        Ok(())
    }

    /// Move `value` copper worth, re-minting both sides as needed.
    pub fn transfer_value(&mut self, to: &mut Currency, value: i64) -> Result<(), CurrencyError> {
        self.pay(value)?;
        to.add(&Self::from_copper(value)?);
        Ok(())
    }

    fn take_coins(&mut self, coin: CoinType, count: u32) -> Result<(), CurrencyError> {
        let available = self.count(coin);
        if available < count {
            return Err(CurrencyError::InsufficientCoins {
                coin,
                needed: count,
                available,
            });
        }
        *self.count_mut(coin) -= count;
        Ok(())
    }

    fn require_coins(&self, coins: &Currency) -> Result<(), CurrencyError> {
        for coin in [
            CoinType::Copper,
            CoinType::Silver,
            CoinType::Gold,
            CoinType::Platinum,
        ] {
            if self.count(coin) < coins.count(coin) {
                return Err(CurrencyError::InsufficientCoins {
                    coin,
                    needed: coins.count(coin),
                    available: self.count(coin),
                });
            }
        }
        Ok(())
    }
}

/// Split `"2gp 5sp"`, `"3 gold, 4c"` and the like into (coin, count) pairs.
fn parse_coins(s: &str) -> Result<Vec<(CoinType, i64)>, CurrencyError> {
    let lower = s.to_lowercase();
    let mut tokens = lower
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .peekable();
    if tokens.peek().is_none() {
        return Err(CurrencyError::Parse(s.to_string()));
    }

    let mut coins = Vec::new();
    while let Some(token) = tokens.next() {
        let split = token
            .find(|c: char| !c.is_ascii_digit() && c != '-')
            .unwrap_or(token.len());
        let (number, mut denomination) = token.split_at(split);
        // "3 gold" as well as "3gold"
        if denomination.is_empty() {
            denomination = tokens.next().unwrap_or_default();
        }
        let count: i64 = number
            .parse()
            .map_err(|_| CurrencyError::Parse(s.to_string()))?;
        if count < 0 {
            return Err(CurrencyError::NegativeAmount(count));
        }
        let coin = CoinType::parse_denomination(denomination)
            .ok_or_else(|| CurrencyError::Parse(s.to_string()))?;
        coins.push((coin, count));
    }
    Ok(coins)
}

/// Copper value of a currency string such as `"2gp 5sp"`.
pub fn parse_copper(s: &str) -> Result<i64, CurrencyError> {
    Ok(parse_coins(s)?
        .into_iter()
        .map(|(coin, count)| count * coin.copper_value())
        .sum())
}

impl FromStr for Currency {
    type Err = CurrencyError;

    /// Keeps denominations as written: `"25sp"` stays 25 silver.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut purse = Currency::default();
        for (coin, count) in parse_coins(s)? {
            purse.add_coins(coin, count as u32);
        }
        Ok(purse)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        for coin in [CoinType::Platinum, CoinType::Gold, CoinType::Silver] {
            if self.count(coin) > 0 {
                parts.push(format!("{}{}", self.count(coin), coin.abbreviation()));
            }
        }
        if self.copper > 0 || parts.is_empty() {
            parts.push(format!("{}cp", self.copper));
        }
        write!(f, "{}", parts.join(" "))
    }
}
