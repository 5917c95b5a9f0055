//! Constants shared by the ante handlers.
//!
//! It groups event names and message type URLs as sub-modules.

use alloy_primitives::U256;

/// Divisor turning a tip price into a transaction priority, i.e.
/// `priority = tip_price / DEFAULT_PRIORITY_REDUCTION`. Keeps priorities within `i64`.
pub const DEFAULT_PRIORITY_REDUCTION: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);

/// Number of decimals of the EVM representation of the chain coin.
pub const EVM_DECIMALS: u8 = 18;

/// Maximum depth of nested authz `MsgExec` messages accepted by the authz limiter.
pub const MAX_NESTED_MSGS: usize = 7;

/// Name of the module account collecting transaction fees.
pub const FEE_COLLECTOR_NAME: &str = "fee_collector";

/// Upper bound (inclusive) of the `s` value of a homestead-valid signature, i.e. `secp256k1n / 2`.
pub const SECP256K1N_HALF: U256 = U256::from_be_bytes([
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
]);

/// Event types and attribute keys emitted by the ante handlers.
pub mod events {
    /// Generic transaction event type.
    pub const TYPE_TX: &str = "tx";
    /// Attribute key carrying the fee paid by a transaction.
    pub const ATTRIBUTE_KEY_FEE: &str = "fee";
    /// Attribute key carrying the account that paid the fee.
    pub const ATTRIBUTE_KEY_FEE_PAYER: &str = "fee_payer";
    /// Event type indexing Ethereum transactions.
    pub const TYPE_ETHEREUM_TX: &str = "ethereum_tx";
    /// Attribute key carrying the Ethereum transaction hash.
    pub const ATTRIBUTE_KEY_ETHEREUM_TX_HASH: &str = "ethereumTxHash";
    /// Attribute key carrying the position of the Ethereum transaction in the block.
    pub const ATTRIBUTE_KEY_TX_INDEX: &str = "txIndex";
}

/// Type URLs of the messages and extension options understood by the ante handlers.
pub mod type_urls {
    /// Ethereum transaction wrapped in a native message.
    pub const MSG_ETHEREUM_TX: &str = "/os.evm.v1.MsgEthereumTx";
    /// Extension option marking a transaction as an Ethereum transaction envelope.
    pub const EXTENSION_OPTIONS_ETHEREUM_TX: &str = "/os.evm.v1.ExtensionOptionsEthereumTx";
    /// Extension option carrying the max priority price of a native dynamic-fee transaction.
    pub const EXTENSION_OPTION_DYNAMIC_FEE_TX: &str = "/os.types.v1.ExtensionOptionDynamicFeeTx";
    /// Bank transfer.
    pub const MSG_SEND: &str = "/cosmos.bank.v1beta1.MsgSend";
    /// Authz execution of messages on behalf of a granter.
    pub const MSG_EXEC: &str = "/cosmos.authz.v1beta1.MsgExec";
    /// Authz grant.
    pub const MSG_GRANT: &str = "/cosmos.authz.v1beta1.MsgGrant";
    /// Vesting account creation.
    pub const MSG_CREATE_VESTING_ACCOUNT: &str = "/cosmos.vesting.v1beta1.MsgCreateVestingAccount";
}
