use alloy_primitives::U256;
use revm::interpreter::gas::calculate_initial_tx_gas;

use crate::{ante::AnteResult, AnteError, Coin, Coins, Dec, Fee, Rules, TxData};

/// Checks the fee against the validator-local minimum gas price, both with 18 decimals.
///
/// Skipped once London is active: the base fee and global minimum then price gas.
pub fn check_mempool_fee(
    fee: U256,
    mempool_min_gas_price: Dec,
    gas_limit: u64,
    is_london: bool,
) -> AnteResult<()> {
    if is_london {
        return Ok(());
    }
    let required = mempool_min_gas_price
        .checked_mul_int(U256::from(gas_limit))
        .ok_or(AnteError::Overflow("mempool required fee"))?;
    let got = Dec::from_int(fee).ok_or(AnteError::Overflow("mempool provided fee"))?;
    if got < required {
        return Err(AnteError::InsufficientMempoolFee { got, required });
    }
    Ok(())
}

/// Checks the fee against the governance minimum gas price, both with 18 decimals. A zero
/// minimum disables the check.
pub fn check_global_fee(fee: U256, global_min_gas_price: Dec, gas_limit: u64) -> AnteResult<()> {
    if global_min_gas_price.is_zero() {
        return Ok(());
    }
    let required = global_min_gas_price
        .checked_mul_int(U256::from(gas_limit))
        .ok_or(AnteError::Overflow("global required fee"))?;
    let got = Dec::from_int(fee).ok_or(AnteError::Overflow("global provided fee"))?;
    if got < required {
        return Err(AnteError::InsufficientGlobalFee { got, required });
    }
    Ok(())
}

/// Intrinsic gas of `tx` under `rules`.
pub fn intrinsic_gas(tx: &TxData<'_>, rules: &Rules) -> u64 {
    let (accounts, storage_keys) = tx.access_list_counts();
    calculate_initial_tx_gas(
        rules.spec_id(),
        tx.data(),
        tx.to().is_none(),
        accounts,
        storage_keys,
        0,
    )
    .initial_gas
}

/// Computes the fee charged for `tx`, as a coin of `denom` with 18 decimals. Empty when the fee
/// is zero.
///
/// During check-tx a gas limit below the intrinsic gas is rejected. A fee cap below the base fee
/// is always rejected.
pub fn verify_fee(
    tx: &TxData<'_>,
    denom: &str,
    base_fee: Option<U256>,
    rules: &Rules,
    is_check_tx: bool,
) -> AnteResult<Coins> {
    let gas_limit = tx.gas();
    let intrinsic_gas = intrinsic_gas(tx, rules);
    if is_check_tx && gas_limit < intrinsic_gas {
        return Err(AnteError::GasLimitTooLow { gas_limit, intrinsic_gas });
    }

    if let Some(base_fee) = base_fee {
        let fee_cap = tx.gas_fee_cap();
        if fee_cap < base_fee {
            return Err(AnteError::FeeCapBelowBaseFee { fee_cap, base_fee });
        }
    }

    let fee = tx.effective_fee(base_fee).ok_or(AnteError::CostOverflow)?;
    Ok(Coins::single(Coin::new(denom, fee)))
}

/// Checks the declared fee envelope matches the messages: the envelope coins must be exactly the
/// sum of message fees in `denom`, and the envelope gas limit the sum of message gas limits.
///
/// `fee` is `None` on re-check, where the check is skipped.
pub fn check_tx_fee(
    fee: Option<&Fee>,
    denom: &str,
    tx_fee: U256,
    tx_gas_limit: u64,
) -> AnteResult<()> {
    let Some(fee) = fee else { return Ok(()) };

    let computed = Coins::single(Coin::new(denom, tx_fee));
    if fee.amount != computed {
        return Err(AnteError::InvalidTxFee { declared: fee.amount.clone(), computed });
    }
    if fee.gas_limit != tx_gas_limit {
        return Err(AnteError::InvalidTxGasLimit {
            declared: fee.gas_limit,
            computed: tx_gas_limit,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn price(value: u64) -> Dec {
        Dec::from_u64(value)
    }

    #[rstest]
    #[case(U256::from(200u64), price(20), 10, false, true)]
    #[case(U256::from(199u64), price(20), 10, false, false)]
    #[case(U256::from(0u64), price(20), 10, true, true)]
    #[case(U256::from(0u64), price(0), 10, false, true)]
    fn test_mempool_fee(
        #[case] fee: U256,
        #[case] min_gas_price: Dec,
        #[case] gas: u64,
        #[case] is_london: bool,
        #[case] ok: bool,
    ) {
        assert_eq!(check_mempool_fee(fee, min_gas_price, gas, is_london).is_ok(), ok);
    }

    #[test]
    fn test_mempool_fee_error() {
        let err = check_mempool_fee(U256::from(100u64), price(20), 10, false).unwrap_err();
        assert_eq!(
            err,
            AnteError::InsufficientMempoolFee { got: price(100), required: price(200) }
        );
        assert!(err.is_insufficient_fee());
    }

    #[rstest]
    #[case(U256::ZERO, price(0), true)]
    #[case(U256::from(20u64), price(2), true)]
    #[case(U256::from(19u64), price(2), false)]
    fn test_global_fee(#[case] fee: U256, #[case] min_gas_price: Dec, #[case] ok: bool) {
        assert_eq!(check_global_fee(fee, min_gas_price, 10).is_ok(), ok);
    }

    #[test]
    fn test_tx_fee_envelope() {
        let fee = Fee {
            amount: Coins::single(Coin::new("aevmos", U256::from(30u64))),
            gas_limit: 42_000,
            ..Default::default()
        };
        assert!(check_tx_fee(Some(&fee), "aevmos", U256::from(30u64), 42_000).is_ok());
        assert_eq!(
            check_tx_fee(Some(&fee), "aevmos", U256::from(31u64), 42_000),
            Err(AnteError::InvalidTxFee {
                declared: fee.amount.clone(),
                computed: Coins::single(Coin::new("aevmos", U256::from(31u64)))
            })
        );
        assert_eq!(
            check_tx_fee(Some(&fee), "aevmos", U256::from(30u64), 21_000),
            Err(AnteError::InvalidTxGasLimit { declared: 42_000, computed: 21_000 })
        );
        assert!(check_tx_fee(None, "aevmos", U256::from(31u64), 1).is_ok());
    }

    #[test]
    fn test_tx_fee_envelope_extra_denom() {
        let mut fee = Fee { gas_limit: 21_000, ..Default::default() };
        fee.amount = Coins::single(Coin::new("aevmos", U256::from(30u64)))
            .checked_add_coin(Coin::new("uatom", U256::from(999u64)))
            .unwrap();
        let err = check_tx_fee(Some(&fee), "aevmos", U256::from(30u64), 21_000).unwrap_err();
        assert!(matches!(err, AnteError::InvalidTxFee { .. }), "{err:?}");
        assert!(check_tx_fee(Some(&Fee::default()), "aevmos", U256::ZERO, 0).is_ok());
    }
}
