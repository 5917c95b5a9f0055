use tracing::trace;

use crate::{ante::AnteResult, AnteError, Context, FeeMarketKeeper, GasMeter, Tx};

/// Adds the gas limit of one message to the cumulative gas wanted.
///
/// During check-tx, with a non-zero `max_tx_gas_wanted`, the contribution of a message is capped
/// at `max_tx_gas_wanted`. The sum saturates at `u64::MAX`, so the result is never below
/// `cumulative`.
pub fn update_cumulative_gas_wanted(
    ctx: &Context,
    msg_gas_wanted: u64,
    max_tx_gas_wanted: u64,
    cumulative: u64,
) -> u64 {
    let gas = if ctx.is_check_tx() && max_tx_gas_wanted != 0 {
        msg_gas_wanted.min(max_tx_gas_wanted)
    } else {
        msg_gas_wanted
    };
    cumulative.saturating_add(gas)
}

/// Block gas limit: the block gas meter limit when non zero, else the consensus maximum block
/// gas (`-1` meaning unlimited), else zero.
pub fn block_gas_limit(ctx: &Context) -> u64 {
    if let Some(limit) = ctx.block_gas_meter().map(GasMeter::limit).filter(|limit| *limit != 0) {
        return limit;
    }
    match ctx.consensus_params().block.map(|block| block.max_gas) {
        Some(-1) => u64::MAX,
        Some(max_gas) if max_gas > 0 => max_gas as u64,
        _ => 0,
    }
}

fn check_within_block_limit(ctx: &Context, gas_wanted: u64) -> AnteResult<()> {
    let block_gas_limit = block_gas_limit(ctx);
    if gas_wanted > block_gas_limit {
        return Err(AnteError::BlockGasLimitExceeded { gas_wanted, block_gas_limit });
    }
    Ok(())
}

/// Checks the declared gas of `tx` fits the block gas limit. No-op before London.
pub fn check_tx_gas_within_block_limit(ctx: &Context, tx: &Tx, is_london: bool) -> AnteResult<()> {
    if !is_london {
        return Ok(());
    }
    check_within_block_limit(ctx, tx.gas())
}

/// Records the declared gas of `tx` as transient gas wanted, when the base fee is enabled.
/// No-op before London.
pub fn record_transient_gas_wanted<FK: FeeMarketKeeper>(
    ctx: &Context,
    fee_market_keeper: &FK,
    tx: &Tx,
    is_london: bool,
) -> AnteResult<()> {
    if !is_london || !fee_market_keeper.get_base_fee_enabled(ctx) {
        return Ok(());
    }
    let total = fee_market_keeper
        .add_transient_gas_wanted(ctx, tx.gas())
        .map_err(|source| AnteError::AddTransientGasWanted { source })?;
    trace!(target: "evm_ante::gas_wanted", gas = tx.gas(), total, "Added transient gas wanted");
    Ok(())
}

/// Checks the declared gas of `tx` fits the block gas limit and records it as transient gas
/// wanted. No-op before London.
pub fn check_gas_wanted<FK: FeeMarketKeeper>(
    ctx: &Context,
    fee_market_keeper: &FK,
    tx: &Tx,
    is_london: bool,
) -> AnteResult<()> {
    check_tx_gas_within_block_limit(ctx, tx, is_london)?;
    record_transient_gas_wanted(ctx, fee_market_keeper, tx, is_london)
}

/// Checks the cumulative gas wanted fits the block gas limit. On success installs an infinite
/// gas meter reporting `gas_wanted` as its limit and sets the priority.
pub fn check_block_gas_limit(ctx: Context, gas_wanted: u64, min_priority: i64) -> AnteResult {
    check_within_block_limit(&ctx, gas_wanted)?;
    Ok(ctx.with_gas_meter(GasMeter::infinite_with_limit(gas_wanted)).with_priority(min_priority))
}
