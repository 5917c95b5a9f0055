use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{constants::EVM_DECIMALS, Coin, Coins, Dec};

/// The chain coin used to pay for EVM gas.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvmCoinInfo {
    /// Bank denomination of the coin.
    pub denom: String,
    /// Denomination of the 18-decimal representation. Equal to `denom` when `decimals == 18`.
    pub extended_denom: String,
    /// Number of decimals of `denom` in the bank module, between 1 and 18.
    pub decimals: u8,
}

impl Default for EvmCoinInfo {
    fn default() -> Self {
        Self { denom: "aevmos".into(), extended_denom: "aevmos".into(), decimals: EVM_DECIMALS }
    }
}

impl EvmCoinInfo {
    /// Creates the coin info of an 18-decimal coin.
    pub fn eighteen_decimals(denom: impl Into<String>) -> Self {
        let denom = denom.into();
        Self { extended_denom: denom.clone(), denom, decimals: EVM_DECIMALS }
    }

    /// `10^(18 - decimals)`, the factor between bank and EVM amounts.
    pub fn conversion_factor(&self) -> U256 {
        pow10(EVM_DECIMALS.saturating_sub(self.decimals))
    }

    /// Converts an 18-decimal coin of this denomination to bank decimals, truncating. Coins of
    /// other denominations are returned unchanged.
    pub fn coin_from_18_decimals(&self, coin: &Coin) -> Coin {
        if coin.denom == self.denom {
            let amount = convert_amount_from_18_decimals(coin.amount, self.decimals);
            Coin::new(coin.denom.clone(), amount)
        } else {
            coin.clone()
        }
    }

    /// Converts every coin of `coins` with [`Self::coin_from_18_decimals`].
    pub fn coins_from_18_decimals(&self, coins: &Coins) -> Coins {
        coins.iter().map(|coin| self.coin_from_18_decimals(coin)).collect()
    }
}

fn pow10(exp: u8) -> U256 {
    U256::from(10u64).pow(U256::from(exp))
}

/// Scales a bank amount with `decimals` decimals up to 18 decimals. `None` on overflow.
pub fn convert_amount_to_18_decimals(amount: U256, decimals: u8) -> Option<U256> {
    amount.checked_mul(pow10(EVM_DECIMALS.saturating_sub(decimals)))
}

/// Scales an 18-decimal amount down to `decimals` decimals, truncating the remainder.
pub fn convert_amount_from_18_decimals(amount: U256, decimals: u8) -> U256 {
    amount / pow10(EVM_DECIMALS.saturating_sub(decimals))
}

/// Scales a decimal price with `decimals` decimals up to 18 decimals. `None` on overflow.
pub fn convert_dec_to_18_decimals(value: Dec, decimals: u8) -> Option<Dec> {
    value.checked_mul_pow10(EVM_DECIMALS.saturating_sub(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_six_decimals() {
        let info =
            EvmCoinInfo { denom: "uatom".into(), extended_denom: "aatom".into(), decimals: 6 };
        assert_eq!(info.conversion_factor(), U256::from(1_000_000_000_000u64));
        let coin = Coin::new("uatom", U256::from(2_500_000_000_000u64));
        let coin = info.coin_from_18_decimals(&coin);
        assert_eq!(coin.amount, U256::from(2u64));
        let other = info.coin_from_18_decimals(&Coin::new("stake", U256::from(7u64)));
        assert_eq!(other.amount, U256::from(7u64));
    }

    #[test]
    fn test_dec_scaling() {
        let price: Dec = "0.25".parse().unwrap();
        assert_eq!(
            convert_dec_to_18_decimals(price, 6),
            Some(Dec::from_u64(250_000_000_000))
        );
        assert_eq!(convert_dec_to_18_decimals(price, 18), Some(price));
    }

    proptest! {
        #[test]
        fn proptest_decimal_round_trip_truncates(amount in any::<u128>(), decimals in 1u8..=18) {
            let amount = U256::from(amount);
            let scaled = convert_amount_to_18_decimals(amount, decimals).unwrap();
            prop_assert_eq!(convert_amount_from_18_decimals(scaled, decimals), amount);

            let down = convert_amount_from_18_decimals(amount, decimals);
            let up = convert_amount_to_18_decimals(down, decimals).unwrap();
            prop_assert!(up <= amount);
            prop_assert!(amount - up < pow10(EVM_DECIMALS - decimals));
        }
    }
}
