use crate::{ante::AnteResult, Context, EvmKeeper, GasMeter, KvGasConfig};

/// Prepares the context of an Ethereum transaction: an infinite gas meter, free KV store access
/// (state access is paid through EVM gas) and a reset transient gas used counter.
pub fn setup_context<EK: EvmKeeper>(ctx: Context, evm_keeper: &EK) -> AnteResult {
    let ctx = ctx
        .with_gas_meter(GasMeter::infinite())
        .with_kv_gas_config(KvGasConfig::zero())
        .with_transient_kv_gas_config(KvGasConfig::zero());
    evm_keeper.reset_transient_gas_used(&ctx);
    Ok(ctx)
}
