use alloy_primitives::U256;

use crate::{constants::DEFAULT_PRIORITY_REDUCTION, TxData};

/// Mempool priority of `tx`: the tip price (effective gas price above the base fee, or the gas
/// price when no base fee applies) divided by [`DEFAULT_PRIORITY_REDUCTION`].
///
/// Values outside `i64` clamp to `i64::MAX`.
pub fn get_tx_priority(tx: &TxData<'_>, base_fee: Option<U256>) -> i64 {
    let effective_price = tx.effective_gas_price(base_fee);
    let base = base_fee.unwrap_or(U256::ZERO);
    // Legacy prices may sit below the base fee when no fee cap check applies.
    let (tip, negative) = if effective_price >= base {
        (effective_price - base, false)
    } else {
        (base - effective_price, true)
    };
    let reduced = tip / DEFAULT_PRIORITY_REDUCTION;

    match u64::try_from(reduced).ok().and_then(|value| i64::try_from(value).ok()) {
        Some(value) if negative => -value,
        Some(value) => value,
        None => i64::MAX,
    }
}

/// Minimum of `min_priority` and the priority of `tx`.
pub fn get_msg_priority(tx: &TxData<'_>, min_priority: i64, base_fee: Option<U256>) -> i64 {
    min_priority.min(get_tx_priority(tx, base_fee))
}
