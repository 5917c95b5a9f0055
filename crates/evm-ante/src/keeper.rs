//! Collaborator interfaces consumed by the ante handlers.
//!
//! Keepers own persistent and transient module state. Reads and writes go through `&self`; the
//! host is responsible for discarding the writes of a transaction whose ante handling fails.

use alloy_primitives::{Address, U256};
use auto_impl::auto_impl;
use revm::state::AccountInfo;

use crate::{
    BaseAccount, ChainConfig, Coin, Coins, Context, EvmParams, FeeMarketParams, KeeperError,
};

/// Native account storage.
#[auto_impl(&, Box, Arc)]
pub trait AccountKeeper {
    /// Loads the account at `address`.
    fn get_account(&self, ctx: &Context, address: Address) -> Option<BaseAccount>;

    /// Builds a fresh account for `address` with the next account number. The account is not
    /// stored until passed to [`Self::set_account`].
    fn new_account_with_address(&self, ctx: &Context, address: Address) -> BaseAccount;

    /// Stores an account.
    fn set_account(&self, ctx: &Context, account: BaseAccount);

    /// Address of the module account called `name`.
    fn get_module_address(&self, name: &str) -> Option<Address>;
}

/// Native balances, in the bank decimals of each denomination.
#[auto_impl(&, Box, Arc)]
pub trait BankKeeper {
    /// Balance of `address` in `denom`.
    fn get_balance(&self, ctx: &Context, address: Address, denom: &str) -> Coin;

    /// Moves `amount` from `sender` to the module account `module`. Either every coin moves or
    /// none does.
    fn send_coins_from_account_to_module(
        &self,
        ctx: &Context,
        sender: Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError>;
}

/// EVM module state.
#[auto_impl(&, Box, Arc)]
pub trait EvmKeeper {
    /// Current module parameters.
    fn get_params(&self, ctx: &Context) -> EvmParams;

    /// Base fee of the current block in the EVM representation, `None` when the base fee does
    /// not apply.
    fn get_base_fee(&self, ctx: &Context, chain_config: &ChainConfig) -> Option<U256>;

    /// EVM view of the account at `address`, `None` if it does not exist.
    fn get_account(&self, ctx: &Context, address: Address) -> Option<AccountInfo>;

    /// Spendable balance of `address` in the EVM representation (18 decimals).
    fn get_balance(&self, ctx: &Context, address: Address) -> U256;

    /// Deducts `fees` (18 decimals) from `from` into the fee collector. Atomic.
    fn deduct_tx_costs_from_user_balance(
        &self,
        ctx: &Context,
        fees: &Coins,
        from: Address,
    ) -> Result<(), KeeperError>;

    /// Number of Ethereum transactions already included in the current block.
    fn get_tx_index_transient(&self, ctx: &Context) -> u64;

    /// Resets the transient gas used by the current transaction.
    fn reset_transient_gas_used(&self, ctx: &Context);
}

/// Fee market module state.
#[auto_impl(&, Box, Arc)]
pub trait FeeMarketKeeper {
    /// Current module parameters.
    fn get_params(&self, ctx: &Context) -> FeeMarketParams;

    /// Adds `gas_wanted` to the block's transient gas wanted, returning the new total.
    fn add_transient_gas_wanted(&self, ctx: &Context, gas_wanted: u64)
        -> Result<u64, KeeperError>;

    /// Whether the base fee is in effect at the context height.
    fn get_base_fee_enabled(&self, ctx: &Context) -> bool {
        self.get_params(ctx).is_base_fee_enabled(ctx.block_height())
    }
}
