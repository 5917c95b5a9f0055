use std::sync::Arc;

use alloy_primitives::{I256, U256};
use auto_impl::auto_impl;

use crate::{
    ante::AnteResult, constants::DEFAULT_PRIORITY_REDUCTION, convert_amount_from_18_decimals,
    AnteError, Coin, Coins, Context, EvmConfig, EvmKeeper, ExtensionOption, Tx,
};

/// Computes the fee charged to a native transaction and its mempool priority.
#[auto_impl(&, Box, Arc)]
pub trait TxFeeChecker {
    /// Returns the fee to deduct and the priority of `tx`.
    fn check_tx_fee(&self, ctx: &Context, tx: &Tx) -> AnteResult<(Coins, i64)>;
}

/// Fee checker pricing native transactions like EIP-1559 transactions.
///
/// At genesis and before London it falls back to the validator minimum gas prices. Otherwise
/// the declared fee divided by the gas limit is the fee cap, the optional
/// [`ExtensionOption::DynamicFeeTx`] gives the tip cap, and the effective gas price is
/// `min(base_fee + tip_cap, fee_cap)`.
#[derive(Debug, Clone)]
pub struct DynamicFeeChecker<EK> {
    evm_keeper: EK,
    config: Arc<EvmConfig>,
}

impl<EK> DynamicFeeChecker<EK> {
    /// Creates the fee checker.
    pub fn new(evm_keeper: EK, config: Arc<EvmConfig>) -> Self {
        Self { evm_keeper, config }
    }
}

impl<EK: EvmKeeper> DynamicFeeChecker<EK> {
    fn dynamic_fee(&self, ctx: &Context, tx: &Tx) -> AnteResult<(Coins, i64)> {
        let denom = self.config.evm_denom();
        // the keeper reports the base fee with 18 decimals, fees are in bank decimals
        let base_fee = self
            .evm_keeper
            .get_base_fee(ctx, &self.config.chain_config)
            .map(|base_fee| {
                convert_amount_from_18_decimals(base_fee, self.config.coin_info.decimals)
            })
            .unwrap_or_default();

        let tip_cap = match max_priority_price(tx) {
            Some(price) if price.is_negative() => return Err(AnteError::NegativePriorityPrice),
            Some(price) => price.into_raw(),
            None => U256::MAX,
        };

        let gas = U256::from(tx.gas());
        let fee_cap = gas_price(tx.fee().amount.amount_of(denom), gas);
        if fee_cap < base_fee {
            return Err(AnteError::GasPriceTooLow { fee_cap, base_fee, denom: denom.to_string() });
        }

        let effective_price = base_fee.saturating_add(tip_cap).min(fee_cap);
        let fee = effective_price.checked_mul(gas).ok_or(AnteError::CostOverflow)?;
        let priority = priority_of((effective_price - base_fee) / DEFAULT_PRIORITY_REDUCTION);
        Ok((Coins::single(Coin::new(denom, fee)), priority))
    }
}

impl<EK: EvmKeeper> TxFeeChecker for DynamicFeeChecker<EK> {
    fn check_tx_fee(&self, ctx: &Context, tx: &Tx) -> AnteResult<(Coins, i64)> {
        if ctx.block_height() == 0 || !self.config.chain_config.is_london(ctx.block_height()) {
            return check_tx_fee_with_min_gas_prices(ctx, tx);
        }
        self.dynamic_fee(ctx, tx)
    }
}

/// Max priority price of the first dynamic-fee extension option.
fn max_priority_price(tx: &Tx) -> Option<I256> {
    tx.body.extension_options.iter().find_map(|option| match option {
        ExtensionOption::DynamicFeeTx { max_priority_price } => Some(*max_priority_price),
        _ => None,
    })
}

/// Validator minimum gas price fee check.
///
/// During check-tx with non-zero minimum gas prices, the fee must cover
/// `ceil(min_gas_price * gas)` in at least one denomination. The priority is derived from the
/// lowest gas price across the fee denominations.
pub fn check_tx_fee_with_min_gas_prices(ctx: &Context, tx: &Tx) -> AnteResult<(Coins, i64)> {
    let fee = &tx.fee().amount;
    let gas = U256::from(tx.gas());
    let min_gas_prices = ctx.min_gas_prices();

    if ctx.is_check_tx() && !min_gas_prices.is_zero() {
        let required = min_gas_prices
            .iter()
            .map(|price| {
                let amount = price
                    .amount
                    .checked_mul_int(gas)
                    .ok_or(AnteError::Overflow("minimum fee"))?
                    .ceil();
                Ok(Coin::new(price.denom.clone(), amount))
            })
            .collect::<AnteResult<Coins>>()?;
        if !fee.is_any_gte(&required) {
            return Err(AnteError::InsufficientFees { got: fee.clone(), required });
        }
    }

    Ok((fee.clone(), min_gas_price_priority(fee, gas)))
}

/// Priority of the smallest gas price among `fees`, zero without fees.
fn min_gas_price_priority(fees: &Coins, gas: U256) -> i64 {
    fees.iter()
        .map(|fee| priority_of(gas_price(fee.amount, gas) / DEFAULT_PRIORITY_REDUCTION))
        .min()
        .unwrap_or_default()
}

/// `fee / gas`, the whole fee when no gas is declared.
fn gas_price(fee: U256, gas: U256) -> U256 {
    fee.checked_div(gas).unwrap_or(fee)
}

fn priority_of(value: U256) -> i64 {
    u64::try_from(value).ok().and_then(|value| i64::try_from(value).ok()).unwrap_or(i64::MAX)
}
