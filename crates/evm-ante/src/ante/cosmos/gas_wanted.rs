use std::sync::Arc;

use crate::{
    ante::{evm::check_gas_wanted, AnteDecorator, AnteHandler, AnteResult},
    Context, EvmConfig, FeeMarketKeeper, Tx,
};

/// Tracks the gas wanted of native transactions in the block's transient store, which feeds
/// the base fee computation. Rejects transactions wanting more gas than the block gas limit.
#[derive(Debug, Clone)]
pub struct GasWantedDecorator<FK> {
    fee_market_keeper: FK,
    config: Arc<EvmConfig>,
}

impl<FK> GasWantedDecorator<FK> {
    /// Creates the decorator.
    pub fn new(fee_market_keeper: FK, config: Arc<EvmConfig>) -> Self {
        Self { fee_market_keeper, config }
    }
}

impl<FK: FeeMarketKeeper> AnteDecorator for GasWantedDecorator<FK> {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        let is_london = self.config.chain_config.is_london(ctx.block_height());
        check_gas_wanted(&ctx, &self.fee_market_keeper, tx, is_london)?;
        next.handle(ctx, tx, simulate)
    }
}
