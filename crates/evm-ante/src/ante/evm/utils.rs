use alloy_primitives::U256;

use crate::{
    ante::AnteResult, convert_dec_to_18_decimals, AnteError, Context, Dec, EvmConfig, EvmKeeper,
    EvmParams, FeeMarketKeeper, Rules, Signer,
};

use super::update_cumulative_gas_wanted;

/// Per-transaction snapshot of the module state plus the running totals accumulated while the
/// [`MonoDecorator`](super::MonoDecorator) walks the messages.
///
/// The snapshot fields are read once and never change for the duration of the transaction. The
/// running totals start at zero (`min_priority` at `i64::MAX`) and only grow (shrink for
/// `min_priority`) through [`Self::record_msg`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoratorUtils {
    /// EVM module parameters.
    pub evm_params: EvmParams,
    /// Fork rules at the context height.
    pub rules: Rules,
    /// Signer for the context height.
    pub signer: Signer,
    /// Base fee of the block, `None` when the base fee does not apply.
    pub base_fee: Option<U256>,
    /// Denomination of EVM fees.
    pub evm_denom: String,
    /// Validator-local minimum gas price, with 18 decimals.
    pub mempool_min_gas_price: Dec,
    /// Global minimum gas price, with 18 decimals.
    pub global_min_gas_price: Dec,
    /// Number of Ethereum transactions already in the block.
    pub block_tx_index: u64,
    /// Sum of the message gas limits.
    pub tx_gas_limit: u64,
    /// Cumulative gas wanted.
    pub gas_wanted: u64,
    /// Minimum priority over the messages.
    pub min_priority: i64,
    /// Sum of the declared message fees.
    pub tx_fee: U256,
}

impl DecoratorUtils {
    /// Reads the snapshot for the transaction under `ctx`.
    ///
    /// Fails with [`AnteError::MissingBaseFee`] when London is active but the block has no base
    /// fee.
    pub fn new<EK: EvmKeeper, FK: FeeMarketKeeper>(
        ctx: &Context,
        config: &EvmConfig,
        evm_keeper: &EK,
        fee_market_keeper: &FK,
    ) -> AnteResult<Self> {
        let chain_config = &config.chain_config;
        let height = ctx.block_height();
        let evm_params = evm_keeper.get_params(ctx);
        let rules = chain_config.rules(height);
        let base_fee = evm_keeper.get_base_fee(ctx, chain_config);
        if rules.is_london && base_fee.is_none() {
            return Err(AnteError::MissingBaseFee);
        }

        let coin_info = &config.coin_info;
        let mempool_min_gas_price = convert_dec_to_18_decimals(
            ctx.min_gas_prices().amount_of(&coin_info.denom),
            coin_info.decimals,
        )
        .ok_or(AnteError::Overflow("mempool min gas price"))?;
        let global_min_gas_price = convert_dec_to_18_decimals(
            fee_market_keeper.get_params(ctx).min_gas_price,
            coin_info.decimals,
        )
        .ok_or(AnteError::Overflow("global min gas price"))?;

        Ok(Self {
            evm_params,
            rules,
            signer: Signer::make(chain_config, height),
            base_fee,
            evm_denom: coin_info.denom.clone(),
            mempool_min_gas_price,
            global_min_gas_price,
            block_tx_index: evm_keeper.get_tx_index_transient(ctx),
            tx_gas_limit: 0,
            gas_wanted: 0,
            min_priority: i64::MAX,
            tx_fee: U256::ZERO,
        })
    }

    /// Folds one admitted message into the running totals.
    pub fn record_msg(
        &mut self,
        ctx: &Context,
        gas: u64,
        declared_fee: U256,
        priority: i64,
        max_tx_gas_wanted: u64,
    ) -> AnteResult<()> {
        self.gas_wanted =
            update_cumulative_gas_wanted(ctx, gas, max_tx_gas_wanted, self.gas_wanted);
        self.min_priority = self.min_priority.min(priority);
        self.tx_fee = update_cumulative_tx_fee(self.tx_fee, declared_fee)?;
        self.tx_gas_limit = self
            .tx_gas_limit
            .checked_add(gas)
            .ok_or(AnteError::Overflow("cumulative tx gas limit"))?;
        Ok(())
    }
}

/// Adds the declared fee of one message to the running total.
pub fn update_cumulative_tx_fee(cumulative: U256, msg_fee: U256) -> AnteResult<U256> {
    cumulative.checked_add(msg_fee).ok_or(AnteError::Overflow("cumulative tx fee"))
}
