use core::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::Dec;

/// An integer amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Amount in the smallest unit of `denom`.
    pub amount: U256,
}

impl Coin {
    /// Creates a new coin.
    pub fn new(denom: impl Into<String>, amount: U256) -> Self {
        Self { denom: denom.into(), amount }
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of coins, sorted by denomination and free of zero amounts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Deref)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// An empty coin set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// A coin set holding a single coin, empty if its amount is zero.
    pub fn single(coin: Coin) -> Self {
        let mut coins = Self::new();
        coins.push_nonzero(coin);
        coins
    }

    /// Amount of `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> U256 {
        self.0.iter().find(|coin| coin.denom == denom).map_or(U256::ZERO, |coin| coin.amount)
    }

    /// Whether every amount is zero. An empty set is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Coin::is_zero)
    }

    /// Adds a coin, merging with an existing entry of the same denomination.
    pub fn checked_add_coin(mut self, coin: Coin) -> Option<Self> {
        if coin.is_zero() {
            return Some(self);
        }
        match self.0.binary_search_by(|existing| existing.denom.cmp(&coin.denom)) {
            Ok(index) => {
                let amount = self.0[index].amount.checked_add(coin.amount)?;
                self.0[index].amount = amount;
            }
            Err(index) => self.0.insert(index, coin),
        }
        Some(self)
    }

    /// Subtracts `other`, `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let mut result = self.clone();
        for coin in &other.0 {
            let index = result.0.iter().position(|existing| existing.denom == coin.denom)?;
            let amount = result.0[index].amount.checked_sub(coin.amount)?;
            if amount.is_zero() {
                result.0.remove(index);
            } else {
                result.0[index].amount = amount;
            }
        }
        Some(result)
    }

    /// Whether, for at least one denomination of `other`, this set holds an amount greater than or
    /// equal to it.
    ///
    /// Returns `false` if `other` is empty or every amount in it is zero.
    pub fn is_any_gte(&self, other: &Self) -> bool {
        other
            .0
            .iter()
            .filter(|coin| !coin.is_zero())
            .any(|coin| self.amount_of(&coin.denom) >= coin.amount)
    }

    fn push_nonzero(&mut self, coin: Coin) {
        if !coin.is_zero() {
            self.0.push(coin);
        }
    }
}

impl FromIterator<Coin> for Coins {
    /// Collects coins, merging duplicate denominations. Overflowing sums saturate.
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        let mut coins = Self::new();
        for coin in iter {
            if coin.is_zero() {
                continue;
            }
            match coins.0.binary_search_by(|existing| existing.denom.cmp(&coin.denom)) {
                Ok(index) => {
                    coins.0[index].amount = coins.0[index].amount.saturating_add(coin.amount);
                }
                Err(index) => coins.0.insert(index, coin),
            }
        }
        coins
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Self::single(coin)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

/// A decimal amount of a single denomination, used for gas prices.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecCoin {
    /// Denomination.
    pub denom: String,
    /// Decimal amount.
    pub amount: Dec,
}

impl DecCoin {
    /// Creates a new decimal coin.
    pub fn new(denom: impl Into<String>, amount: Dec) -> Self {
        Self { denom: denom.into(), amount }
    }
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A set of decimal coins, sorted by denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Deref)]
pub struct DecCoins(Vec<DecCoin>);

impl DecCoins {
    /// An empty set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Amount of `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> Dec {
        self.0.iter().find(|coin| coin.denom == denom).map_or(Dec::ZERO, |coin| coin.amount)
    }

    /// Whether every amount is zero. An empty set is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|coin| coin.amount.is_zero())
    }
}

impl FromIterator<DecCoin> for DecCoins {
    fn from_iter<I: IntoIterator<Item = DecCoin>>(iter: I) -> Self {
        let mut coins: Vec<DecCoin> =
            iter.into_iter().filter(|coin| !coin.amount.is_zero()).collect();
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        coins.dedup_by(|a, b| a.denom == b.denom);
        Self(coins)
    }
}

impl fmt::Display for DecCoins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}
