use std::sync::Arc;

use tracing::{debug, trace};

use super::*;
use crate::{
    ante::{AnteDecorator, AnteHandler, AnteResult},
    constants::type_urls::MSG_ETHEREUM_TX,
    AccountKeeper, AnteError, Context, CoreMessage, EvmConfig, EvmKeeper, FeeMarketKeeper,
    MsgEthereumTx, Tx,
};

/// Admission of Ethereum transactions in a single pass.
///
/// For each wrapped Ethereum message, in order: mempool fee (check-tx only), global fee, message
/// validation, sender recovery, balance, transfer preconditions, fee verification, fee
/// deduction, running totals, nonce, block gas limit and the `ethereum_tx` event. Then, once per
/// transaction: transient gas wanted, declared fee envelope, cumulative gas wanted against the
/// block gas limit. The first failure aborts the whole transaction.
///
/// Keeper writes (new accounts, fee deduction, nonces, transient gas wanted) are not undone on
/// failure: the caller runs the handler on a cached branch of the state and drops it on error.
#[derive(Debug, Clone)]
pub struct MonoDecorator<AK, EK, FK> {
    account_keeper: AK,
    evm_keeper: EK,
    fee_market_keeper: FK,
    config: Arc<EvmConfig>,
    max_tx_gas_wanted: u64,
}

impl<AK, EK, FK> MonoDecorator<AK, EK, FK> {
    /// Creates the decorator. A zero `max_tx_gas_wanted` disables the check-tx gas wanted cap.
    pub fn new(
        account_keeper: AK,
        evm_keeper: EK,
        fee_market_keeper: FK,
        config: Arc<EvmConfig>,
        max_tx_gas_wanted: u64,
    ) -> Self {
        Self { account_keeper, evm_keeper, fee_market_keeper, config, max_tx_gas_wanted }
    }
}

impl<AK, EK, FK> MonoDecorator<AK, EK, FK>
where
    AK: AccountKeeper,
    EK: EvmKeeper,
    FK: FeeMarketKeeper,
{
    fn check_tx(&self, ctx: Context, tx: &Tx, simulate: bool) -> AnteResult {
        let fee_info = if ctx.is_recheck_tx() {
            if tx.msgs().is_empty() {
                return Err(AnteError::EmptyTx);
            }
            None
        } else {
            Some(validate_tx(tx)?)
        };

        let mut ctx = setup_context(ctx, &self.evm_keeper)?;
        let mut utils =
            DecoratorUtils::new(&ctx, &self.config, &self.evm_keeper, &self.fee_market_keeper)?;

        for (index, msg) in tx.msgs().iter().enumerate() {
            let msg = msg.as_ethereum().ok_or_else(|| AnteError::InvalidMessageType {
                index,
                type_url: msg.type_url().to_string(),
                expected: MSG_ETHEREUM_TX,
            })?;
            self.check_msg(&mut ctx, &mut utils, tx, msg, index as u64, simulate)?;
        }

        record_transient_gas_wanted(&ctx, &self.fee_market_keeper, tx, utils.rules.is_london)?;
        check_tx_fee(fee_info.as_ref(), &utils.evm_denom, utils.tx_fee, utils.tx_gas_limit)?;
        let ctx = check_block_gas_limit(ctx, utils.gas_wanted, utils.min_priority)?;

        debug!(
            target: "evm_ante::mono",
            msgs = tx.msgs().len(),
            gas_wanted = utils.gas_wanted,
            priority = utils.min_priority,
            "Ethereum transaction admitted"
        );
        Ok(ctx)
    }

    fn check_msg(
        &self,
        ctx: &mut Context,
        utils: &mut DecoratorUtils,
        tx: &Tx,
        msg: &MsgEthereumTx,
        index: u64,
        simulate: bool,
    ) -> AnteResult<()> {
        let tx_data = msg.tx_data()?;
        let declared_fee = tx_data.fee().ok_or(AnteError::CostOverflow)?;
        let gas_limit = tx_data.gas();
        let rules = utils.rules;
        trace!(
            target: "evm_ante::mono",
            index,
            hash = %tx_data.hash(),
            gas_limit,
            "Checking message"
        );

        if ctx.is_check_tx() && !simulate {
            check_mempool_fee(
                declared_fee,
                utils.mempool_min_gas_price,
                gas_limit,
                rules.is_london,
            )?;
        }

        let fee = if tx_data.is_dynamic_fee() && utils.base_fee.is_some() {
            tx_data.effective_fee(utils.base_fee).ok_or(AnteError::CostOverflow)?
        } else {
            declared_fee
        };
        check_global_fee(fee, utils.global_min_gas_price, gas_limit)?;

        validate_msg(&utils.evm_params, rules.chain_id, &tx_data, msg.from)?;

        let from = signature_verification(
            msg,
            &tx_data,
            &utils.signer,
            utils.evm_params.allow_unprotected_txs,
        )?;

        let account = self.evm_keeper.get_account(ctx, from);
        verify_account_balance(ctx, &self.account_keeper, account.as_ref(), from, &tx_data)?;

        let core_msg = CoreMessage::new(&tx_data, from, utils.base_fee);
        can_transfer(ctx, &self.evm_keeper, &core_msg, utils.base_fee, rules.is_london)?;

        let fees =
            verify_fee(&tx_data, &utils.evm_denom, utils.base_fee, &rules, ctx.is_check_tx())?;
        consume_fees_and_emit_event(ctx, &self.evm_keeper, &fees, from)?;

        let priority = get_msg_priority(&tx_data, utils.min_priority, utils.base_fee);
        utils.record_msg(ctx, gas_limit, declared_fee, priority, self.max_tx_gas_wanted)?;

        let account = self
            .account_keeper
            .get_account(ctx, from)
            .ok_or(AnteError::UnknownAccount { address: from })?;
        increment_nonce(ctx, &self.account_keeper, account, tx_data.nonce())?;

        check_tx_gas_within_block_limit(ctx, tx, rules.is_london)?;

        emit_tx_hash_event(ctx, tx_data.hash(), utils.block_tx_index, index);
        Ok(())
    }
}

impl<AK, EK, FK> AnteDecorator for MonoDecorator<AK, EK, FK>
where
    AK: AccountKeeper,
    EK: EvmKeeper,
    FK: FeeMarketKeeper,
{
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        match self.check_tx(ctx, tx, simulate) {
            Ok(ctx) => next.handle(ctx, tx, simulate),
            Err(err) => {
                debug!(target: "evm_ante::mono", %err, "Ethereum transaction rejected");
                Err(err)
            }
        }
    }
}
