use alloy_primitives::{Address, B256};

use crate::{
    ante::AnteResult,
    constants::events::{
        ATTRIBUTE_KEY_ETHEREUM_TX_HASH, ATTRIBUTE_KEY_FEE, ATTRIBUTE_KEY_TX_INDEX,
        TYPE_ETHEREUM_TX, TYPE_TX,
    },
    AnteError, Coins, Context, Event, EvmKeeper,
};

/// Deducts `fees` from `from` and emits a `tx` event carrying the fee.
///
/// Zero fees skip the deduction but still emit the event. A failed deduction emits nothing.
pub fn consume_fees_and_emit_event<EK: EvmKeeper>(
    ctx: &mut Context,
    evm_keeper: &EK,
    fees: &Coins,
    from: Address,
) -> AnteResult<()> {
    deduct_fees(ctx, evm_keeper, fees, from)?;
    ctx.emit_event(Event::new(TYPE_TX).with_attribute(ATTRIBUTE_KEY_FEE, fees.to_string()));
    Ok(())
}

fn deduct_fees<EK: EvmKeeper>(
    ctx: &Context,
    evm_keeper: &EK,
    fees: &Coins,
    from: Address,
) -> AnteResult<()> {
    if fees.is_zero() {
        return Ok(());
    }
    evm_keeper
        .deduct_tx_costs_from_user_balance(ctx, fees, from)
        .map_err(|source| AnteError::DeductTxCosts { source })
}

/// Emits the `ethereum_tx` event indexing message `msg_index` of the transaction at position
/// `block_tx_index + msg_index` in the block, saturating at `u64::MAX`.
pub fn emit_tx_hash_event(ctx: &mut Context, hash: B256, block_tx_index: u64, msg_index: u64) {
    let tx_index = block_tx_index.saturating_add(msg_index);
    ctx.emit_event(
        Event::new(TYPE_ETHEREUM_TX)
            .with_attribute(ATTRIBUTE_KEY_ETHEREUM_TX_HASH, hash.to_string())
            .with_attribute(ATTRIBUTE_KEY_TX_INDEX, tx_index.to_string()),
    );
}
