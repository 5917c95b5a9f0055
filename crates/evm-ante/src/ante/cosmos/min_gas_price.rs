use std::sync::Arc;

use alloy_primitives::U256;

use crate::{
    ante::{AnteDecorator, AnteHandler, AnteResult},
    AnteError, Coin, Coins, Context, EvmConfig, FeeMarketKeeper, Tx,
};

/// Enforces the fee market global minimum gas price on native transactions.
///
/// The required fee is `ceil(min_gas_price * gas_limit)` in the EVM denomination. Skipped when
/// the minimum is zero and when simulating.
#[derive(Debug, Clone)]
pub struct MinGasPriceDecorator<FK> {
    fee_market_keeper: FK,
    config: Arc<EvmConfig>,
}

impl<FK> MinGasPriceDecorator<FK> {
    /// Creates the decorator.
    pub fn new(fee_market_keeper: FK, config: Arc<EvmConfig>) -> Self {
        Self { fee_market_keeper, config }
    }
}

impl<FK: FeeMarketKeeper> AnteDecorator for MinGasPriceDecorator<FK> {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        let min_gas_price = self.fee_market_keeper.get_params(&ctx).min_gas_price;
        if min_gas_price.is_zero() || simulate {
            return next.handle(ctx, tx, simulate);
        }

        let fee = min_gas_price
            .checked_mul_int(U256::from(tx.gas()))
            .ok_or(AnteError::Overflow("minimum global fee"))?
            .ceil();
        let required = Coins::single(Coin::new(self.config.evm_denom(), fee));

        let provided = &tx.fee().amount;
        if provided.is_empty() {
            return Err(AnteError::FeeNotProvided { required });
        }
        if !provided.is_any_gte(&required) {
            return Err(AnteError::BelowMinGlobalFee { got: provided.clone(), required });
        }
        next.handle(ctx, tx, simulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::MemoryKeepers, AuthInfo, Dec, Fee, FeeMarketParams};
    use rstest::rstest;

    fn tx(fee: u64, gas_limit: u64) -> Tx {
        Tx {
            auth_info: AuthInfo {
                fee: Fee {
                    amount: Coins::single(Coin::new("aevmos", U256::from(fee))),
                    gas_limit,
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn decorator(min_gas_price: &str) -> MinGasPriceDecorator<MemoryKeepers> {
        let keepers = MemoryKeepers::default().with_fee_market_params(FeeMarketParams {
            min_gas_price: min_gas_price.parse::<Dec>().unwrap(),
            ..Default::default()
        });
        MinGasPriceDecorator::new(keepers, Arc::new(EvmConfig::default()))
    }

    #[rstest]
    #[case::zero_min("0", tx(0, 100), false, None)]
    #[case::simulate("10", tx(0, 100), true, None)]
    #[case::exact("10", tx(1_000, 100), false, None)]
    #[case::rounds_up("0.5", tx(51, 101), false, None)]
    #[case::below_rounded("0.5", tx(50, 101), false, Some(false))]
    #[case::below("10", tx(999, 100), false, Some(false))]
    #[case::not_provided("10", tx(0, 100), false, Some(true))]
    fn test_min_gas_price(
        #[case] min_gas_price: &str,
        #[case] tx: Tx,
        #[case] simulate: bool,
        #[case] not_provided: Option<bool>,
    ) {
        let next = |ctx: Context, _: &Tx, _: bool| -> AnteResult { Ok(ctx) };
        let result = decorator(min_gas_price).ante_handle(Context::default(), &tx, simulate, &next);
        match not_provided {
            None => assert!(result.is_ok(), "{result:?}"),
            Some(true) => assert!(matches!(result, Err(AnteError::FeeNotProvided { .. }))),
            Some(false) => assert!(matches!(result, Err(AnteError::BelowMinGlobalFee { .. }))),
        }
    }
}
