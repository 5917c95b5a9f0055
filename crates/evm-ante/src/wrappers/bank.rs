use alloy_primitives::{Address, U256};
use tracing::trace;

use crate::{convert_amount_to_18_decimals, BankKeeper, Coins, Context, EvmCoinInfo, KeeperError};

/// Bank keeper seen from the EVM: balances of the EVM coin are reported with 18 decimals and
/// EVM amounts are scaled back to bank decimals before moving coins.
#[derive(Clone, Debug)]
pub struct BankWrapper<BK> {
    bank: BK,
    coin_info: EvmCoinInfo,
}

impl<BK: BankKeeper> BankWrapper<BK> {
    /// Wraps `bank` for the EVM coin `coin_info`.
    pub const fn new(bank: BK, coin_info: EvmCoinInfo) -> Self {
        Self { bank, coin_info }
    }

    /// The wrapped keeper.
    pub const fn inner(&self) -> &BK {
        &self.bank
    }

    /// Balance of the EVM coin held by `address`, with 18 decimals. Saturates on overflow.
    pub fn get_balance(&self, ctx: &Context, address: Address) -> U256 {
        let coin = self.bank.get_balance(ctx, address, &self.coin_info.denom);
        convert_amount_to_18_decimals(coin.amount, self.coin_info.decimals).unwrap_or(U256::MAX)
    }

    /// Sends 18-decimal `amount` from `sender` to the module account `module`. Amounts of the EVM
    /// coin are truncated to bank decimals; coins that become zero are not sent.
    pub fn send_coins_from_account_to_module(
        &self,
        ctx: &Context,
        sender: Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let converted = self.coin_info.coins_from_18_decimals(amount);
        trace!(
            target: "evm_ante::bank",
            %sender,
            module,
            %amount,
            %converted,
            "Sending coins to module"
        );
        if converted.is_empty() {
            return Ok(());
        }
        self.bank.send_coins_from_account_to_module(ctx, sender, module, &converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::FEE_COLLECTOR_NAME, test_utils::*, Coin};

    fn six_decimals() -> EvmCoinInfo {
        EvmCoinInfo { denom: "uatom".into(), extended_denom: "aatom".into(), decimals: 6 }
    }

    #[test]
    fn test_balance_scaled_to_18_decimals() {
        let keepers = MemoryKeepers::default();
        let address = Address::repeat_byte(1);
        keepers.set_balance(address, "uatom", U256::from(5));

        let bank = BankWrapper::new(&keepers, six_decimals());
        let balance = bank.get_balance(&Context::default(), address);
        assert_eq!(balance, U256::from(5_000_000_000_000u64));
    }

    #[test]
    fn test_send_truncates_to_bank_decimals() {
        let keepers = MemoryKeepers::default();
        let address = Address::repeat_byte(1);
        keepers.set_balance(address, "uatom", U256::from(5));
        let bank = BankWrapper::new(&keepers, six_decimals());
        let ctx = Context::default();

        let amount = Coins::single(Coin::new("uatom", U256::from(1_999_999_999_999u64)));
        bank.send_coins_from_account_to_module(&ctx, address, FEE_COLLECTOR_NAME, &amount).unwrap();
        assert_eq!(keepers.balance(address, "uatom"), U256::from(4));
        assert_eq!(keepers.balance(FEE_COLLECTOR_ADDRESS, "uatom"), U256::from(1));

        // below one bank unit: nothing moves
        let dust = Coins::single(Coin::new("uatom", U256::from(999_999_999_999u64)));
        bank.send_coins_from_account_to_module(&ctx, address, FEE_COLLECTOR_NAME, &dust).unwrap();
        assert_eq!(keepers.balance(address, "uatom"), U256::from(4));
    }

    #[test]
    fn test_send_insufficient_funds() {
        let keepers = MemoryKeepers::default();
        let address = Address::repeat_byte(1);
        let bank = BankWrapper::new(&keepers, six_decimals());

        let amount = Coins::single(Coin::new("uatom", U256::from(1_000_000_000_000u64)));
        let ctx = Context::default();
        let err = bank
            .send_coins_from_account_to_module(&ctx, address, FEE_COLLECTOR_NAME, &amount)
            .unwrap_err();
        assert!(matches!(err, KeeperError::InsufficientFunds { .. }));
    }
}
