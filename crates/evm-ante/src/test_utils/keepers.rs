use std::{cell::RefCell, collections::HashMap, rc::Rc};

use alloy_primitives::{Address, B256, U256};
use revm::{primitives::KECCAK_EMPTY, state::AccountInfo};

use crate::{
    constants::FEE_COLLECTOR_NAME, AccountKeeper, BankKeeper, BankWrapper, BaseAccount,
    ChainConfig, Coin, Coins, Context, EvmCoinInfo, EvmKeeper, EvmParams, FeeMarketKeeper,
    FeeMarketParams, KeeperError,
};

/// Address of the fee collector module account in [`MemoryKeepers`].
pub const FEE_COLLECTOR_ADDRESS: Address = Address::repeat_byte(0xfe);

#[derive(Debug)]
struct State {
    accounts: HashMap<Address, BaseAccount>,
    balances: HashMap<(Address, String), U256>,
    code_hashes: HashMap<Address, B256>,
    module_accounts: HashMap<String, Address>,
    evm_params: EvmParams,
    fee_market_params: FeeMarketParams,
    coin_info: EvmCoinInfo,
    tx_index: u64,
    transient_gas_wanted: u64,
    transient_gas_used_resets: u64,
    next_account_number: u64,
}

impl Default for State {
    fn default() -> Self {
        Self {
            accounts: HashMap::default(),
            balances: HashMap::default(),
            code_hashes: HashMap::default(),
            module_accounts: HashMap::from([(
                FEE_COLLECTOR_NAME.to_string(),
                FEE_COLLECTOR_ADDRESS,
            )]),
            evm_params: EvmParams::default(),
            fee_market_params: FeeMarketParams::default(),
            coin_info: EvmCoinInfo::default(),
            tx_index: 0,
            transient_gas_wanted: 0,
            transient_gas_used_resets: 0,
            next_account_number: 0,
        }
    }
}

/// In-memory implementation of every keeper for testing purposes.
///
/// Clones share the same state, so a clone handed to the ante handler can be inspected
/// afterwards. Balances are stored in bank decimals of [`EvmCoinInfo`].
#[derive(Debug, Default, Clone)]
pub struct MemoryKeepers {
    state: Rc<RefCell<State>>,
}

impl MemoryKeepers {
    /// Stores an account, keeping its number and sequence.
    pub fn insert_account(&self, account: BaseAccount) {
        let mut state = self.state.borrow_mut();
        state.next_account_number = state.next_account_number.max(account.account_number + 1);
        state.accounts.insert(account.address, account);
    }

    /// Creates an account for `address` with the given sequence, if missing, and returns it.
    pub fn ensure_account(&self, address: Address, sequence: u64) -> BaseAccount {
        let existing = self.state.borrow().accounts.get(&address).cloned();
        let mut account = existing.unwrap_or_else(|| {
            BaseAccount::new(address, self.state.borrow().next_account_number)
        });
        account.sequence = sequence;
        self.insert_account(account.clone());
        account
    }

    /// Sets the balance of `address` in `denom`, in bank decimals.
    pub fn set_balance(&self, address: Address, denom: &str, amount: U256) {
        self.state.borrow_mut().balances.insert((address, denom.to_string()), amount);
    }

    /// Creates the account of `address` with sequence `nonce` and the given EVM coin balance,
    /// in bank decimals.
    pub fn fund(self, address: Address, nonce: u64, amount: U256) -> Self {
        self.ensure_account(address, nonce);
        let denom = self.state.borrow().coin_info.denom.clone();
        self.set_balance(address, &denom, amount);
        self
    }

    /// Marks `address` as holding contract code.
    pub fn set_code_hash(&self, address: Address, code_hash: B256) {
        self.state.borrow_mut().code_hashes.insert(address, code_hash);
    }

    /// Marks `address` as holding contract code.
    pub fn with_code_hash(self, address: Address, code_hash: B256) -> Self {
        self.set_code_hash(address, code_hash);
        self
    }

    /// Removes the module account `name`.
    pub fn without_module_account(self, name: &str) -> Self {
        self.state.borrow_mut().module_accounts.remove(name);
        self
    }

    /// Sets the EVM parameters.
    pub fn with_evm_params(self, params: EvmParams) -> Self {
        self.state.borrow_mut().evm_params = params;
        self
    }

    /// Sets the fee market parameters.
    pub fn with_fee_market_params(self, params: FeeMarketParams) -> Self {
        self.state.borrow_mut().fee_market_params = params;
        self
    }

    /// Sets the base fee, in 18 decimals. `None` disables the base fee.
    pub fn with_base_fee(self, base_fee: Option<U256>) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.fee_market_params.no_base_fee = base_fee.is_none();
            state.fee_market_params.base_fee = base_fee.unwrap_or_default();
        }
        self
    }

    /// Sets the EVM coin.
    pub fn with_coin_info(self, coin_info: EvmCoinInfo) -> Self {
        self.state.borrow_mut().coin_info = coin_info;
        self
    }

    /// Sets the number of Ethereum transactions already in the block.
    pub fn with_tx_index(self, tx_index: u64) -> Self {
        self.state.borrow_mut().tx_index = tx_index;
        self
    }

    /// Account stored at `address`.
    pub fn account(&self, address: Address) -> Option<BaseAccount> {
        self.state.borrow().accounts.get(&address).cloned()
    }

    /// Balance of `address` in `denom`, in bank decimals.
    pub fn balance(&self, address: Address, denom: &str) -> U256 {
        self.state
            .borrow()
            .balances
            .get(&(address, denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Gas wanted recorded in the transient store.
    pub fn transient_gas_wanted(&self) -> u64 {
        self.state.borrow().transient_gas_wanted
    }

    /// Number of times the transient gas used was reset.
    pub fn transient_gas_used_resets(&self) -> u64 {
        self.state.borrow().transient_gas_used_resets
    }
}

impl AccountKeeper for MemoryKeepers {
    fn get_account(&self, _ctx: &Context, address: Address) -> Option<BaseAccount> {
        self.account(address)
    }

    fn new_account_with_address(&self, _ctx: &Context, address: Address) -> BaseAccount {
        BaseAccount::new(address, self.state.borrow().next_account_number)
    }

    fn set_account(&self, _ctx: &Context, account: BaseAccount) {
        self.insert_account(account);
    }

    fn get_module_address(&self, name: &str) -> Option<Address> {
        self.state.borrow().module_accounts.get(name).copied()
    }
}

impl BankKeeper for MemoryKeepers {
    fn get_balance(&self, _ctx: &Context, address: Address, denom: &str) -> Coin {
        Coin::new(denom, self.balance(address, denom))
    }

    fn send_coins_from_account_to_module(
        &self,
        _ctx: &Context,
        sender: Address,
        module: &str,
        amount: &Coins,
    ) -> Result<(), KeeperError> {
        let recipient = self
            .get_module_address(module)
            .ok_or_else(|| KeeperError::UnknownModule(module.to_string()))?;

        let balance: Coins = amount
            .iter()
            .map(|coin| Coin::new(&coin.denom, self.balance(sender, &coin.denom)))
            .collect();
        if balance.checked_sub(amount).is_none() {
            return Err(KeeperError::InsufficientFunds { balance, required: amount.clone() });
        }

        for coin in amount.iter() {
            let from = self.balance(sender, &coin.denom);
            let to = self.balance(recipient, &coin.denom);
            self.set_balance(sender, &coin.denom, from - coin.amount);
            self.set_balance(recipient, &coin.denom, to.saturating_add(coin.amount));
        }
        Ok(())
    }
}

impl EvmKeeper for MemoryKeepers {
    fn get_params(&self, _ctx: &Context) -> EvmParams {
        self.state.borrow().evm_params.clone()
    }

    fn get_base_fee(&self, ctx: &Context, chain_config: &ChainConfig) -> Option<U256> {
        let state = self.state.borrow();
        if !chain_config.is_london(ctx.block_height()) || state.fee_market_params.no_base_fee {
            return None;
        }
        Some(state.fee_market_params.base_fee)
    }

    fn get_account(&self, ctx: &Context, address: Address) -> Option<AccountInfo> {
        let account = self.account(address)?;
        let code_hash =
            self.state.borrow().code_hashes.get(&address).copied().unwrap_or(KECCAK_EMPTY);
        Some(AccountInfo {
            balance: EvmKeeper::get_balance(self, ctx, address),
            nonce: account.sequence,
            code_hash,
            code: None,
        })
    }

    fn get_balance(&self, ctx: &Context, address: Address) -> U256 {
        let coin_info = self.state.borrow().coin_info.clone();
        BankWrapper::new(self, coin_info).get_balance(ctx, address)
    }

    fn deduct_tx_costs_from_user_balance(
        &self,
        ctx: &Context,
        fees: &Coins,
        from: Address,
    ) -> Result<(), KeeperError> {
        let coin_info = self.state.borrow().coin_info.clone();
        BankWrapper::new(self, coin_info).send_coins_from_account_to_module(
            ctx,
            from,
            FEE_COLLECTOR_NAME,
            fees,
        )
    }

    fn get_tx_index_transient(&self, _ctx: &Context) -> u64 {
        self.state.borrow().tx_index
    }

    fn reset_transient_gas_used(&self, _ctx: &Context) {
        self.state.borrow_mut().transient_gas_used_resets += 1;
    }
}

impl FeeMarketKeeper for MemoryKeepers {
    fn get_params(&self, _ctx: &Context) -> FeeMarketParams {
        self.state.borrow().fee_market_params.clone()
    }

    fn add_transient_gas_wanted(
        &self,
        _ctx: &Context,
        gas_wanted: u64,
    ) -> Result<u64, KeeperError> {
        let mut state = self.state.borrow_mut();
        state.transient_gas_wanted = state
            .transient_gas_wanted
            .checked_add(gas_wanted)
            .ok_or_else(|| KeeperError::Store("transient gas wanted overflow".to_string()))?;
        Ok(state.transient_gas_wanted)
    }
}
