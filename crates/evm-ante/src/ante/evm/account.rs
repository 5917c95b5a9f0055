use alloy_primitives::{Address, U256};
use revm::state::AccountInfo;

use crate::{
    ante::AnteResult, AccountKeeper, AnteError, BaseAccount, Context, CoreMessage, EvmKeeper,
    TxData,
};

/// Checks the sender can afford the maximum cost of `tx`.
///
/// A missing account is created through `account_keeper` and treated as empty. A sender with
/// deployed code is rejected.
pub fn verify_account_balance<AK: AccountKeeper>(
    ctx: &Context,
    account_keeper: &AK,
    account: Option<&AccountInfo>,
    from: Address,
    tx: &TxData<'_>,
) -> AnteResult<()> {
    let balance = match account {
        None => {
            let account = account_keeper.new_account_with_address(ctx, from);
            account_keeper.set_account(ctx, account);
            U256::ZERO
        }
        Some(account) if !account.is_empty_code_hash() => {
            return Err(AnteError::SenderNotEoa { address: from });
        }
        Some(account) => account.balance,
    };
    check_sender_balance(balance, tx)
}

/// Checks `balance` covers `gas_limit * fee_cap + value`.
pub fn check_sender_balance(balance: U256, tx: &TxData<'_>) -> AnteResult<()> {
    let cost = tx.cost().ok_or(AnteError::CostOverflow)?;
    if balance < cost {
        return Err(AnteError::InsufficientBalance { balance, cost });
    }
    Ok(())
}

/// Checks the EVM transfer preconditions of `msg`: under London its fee cap must cover the base
/// fee, and the sender must hold the transferred value.
pub fn can_transfer<EK: EvmKeeper>(
    ctx: &Context,
    evm_keeper: &EK,
    msg: &CoreMessage,
    base_fee: Option<U256>,
    is_london: bool,
) -> AnteResult<()> {
    if is_london {
        let base_fee = base_fee.ok_or(AnteError::MissingBaseFee)?;
        if msg.gas_fee_cap < base_fee {
            return Err(AnteError::MaxFeeBelowBaseFee { fee_cap: msg.gas_fee_cap, base_fee });
        }
    }

    if !msg.value.is_zero() && evm_keeper.get_balance(ctx, msg.from) < msg.value {
        return Err(AnteError::InsufficientTransferFunds { value: msg.value, from: msg.from });
    }
    Ok(())
}

/// Checks the transaction nonce equals the account sequence, then increments and stores the
/// sequence.
pub fn increment_nonce<AK: AccountKeeper>(
    ctx: &Context,
    account_keeper: &AK,
    mut account: BaseAccount,
    tx_nonce: u64,
) -> AnteResult<()> {
    if tx_nonce != account.sequence {
        return Err(AnteError::InvalidNonce { got: tx_nonce, expected: account.sequence });
    }
    account.sequence = account
        .sequence
        .checked_add(1)
        .ok_or(AnteError::NonceOverflow { address: account.address })?;
    account_keeper.set_account(ctx, account);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{dynamic_fee_tx, ethereum_msg, signer, MemoryKeepers};
    use alloy_primitives::B256;

    const ETHER: u64 = 1_000_000_000_000_000_000;

    #[test]
    fn test_verify_account_balance() {
        let sender = signer(1).address();
        let msg = ethereum_msg(&signer(1), dynamic_fee_tx());
        let tx = msg.tx_data().unwrap();
        let keepers = MemoryKeepers::default().fund(sender, 0, U256::from(ETHER));
        let ctx = Context::default();

        let account = EvmKeeper::get_account(&keepers, &ctx, sender);
        verify_account_balance(&ctx, &keepers, account.as_ref(), sender, &tx).unwrap();

        keepers.set_code_hash(sender, B256::repeat_byte(1));
        let account = EvmKeeper::get_account(&keepers, &ctx, sender);
        assert_eq!(
            verify_account_balance(&ctx, &keepers, account.as_ref(), sender, &tx),
            Err(AnteError::SenderNotEoa { address: sender })
        );
    }

    #[test]
    fn test_check_sender_balance() {
        let msg = ethereum_msg(&signer(1), dynamic_fee_tx());
        let tx = msg.tx_data().unwrap();
        let cost = tx.cost().unwrap();

        assert!(check_sender_balance(cost, &tx).is_ok());
        assert_eq!(
            check_sender_balance(cost - U256::from(1), &tx),
            Err(AnteError::InsufficientBalance { balance: cost - U256::from(1), cost })
        );
    }

    #[test]
    fn test_increment_nonce() {
        let keepers = MemoryKeepers::default();
        let ctx = Context::default();
        let account = keepers.ensure_account(Address::repeat_byte(1), 3);

        assert_eq!(
            increment_nonce(&ctx, &keepers, account.clone(), 2),
            Err(AnteError::InvalidNonce { got: 2, expected: 3 })
        );
        increment_nonce(&ctx, &keepers, account, 3).unwrap();
        assert_eq!(keepers.account(Address::repeat_byte(1)).unwrap().sequence, 4);

        let account = keepers.ensure_account(Address::repeat_byte(2), u64::MAX);
        assert_eq!(
            increment_nonce(&ctx, &keepers, account, u64::MAX),
            Err(AnteError::NonceOverflow { address: Address::repeat_byte(2) })
        );
    }
}
