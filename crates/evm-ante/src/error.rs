use alloy_primitives::{Address, U256};

use crate::{Coins, Dec};

/// Error codes of the error registries the ante errors map onto.
pub mod codes {
    /// Codespace of the base SDK errors.
    pub const SDK_CODESPACE: &str = "sdk";
    /// Codespace of the EVM module errors.
    pub const EVM_CODESPACE: &str = "evm";

    /// Invalid sequence (nonce).
    pub const INVALID_SEQUENCE: u32 = 3;
    /// Unauthorized signer or message.
    pub const UNAUTHORIZED: u32 = 4;
    /// Insufficient funds.
    pub const INSUFFICIENT_FUNDS: u32 = 5;
    /// Unknown request.
    pub const UNKNOWN_REQUEST: u32 = 6;
    /// Unknown address.
    pub const UNKNOWN_ADDRESS: u32 = 9;
    /// Out of gas.
    pub const OUT_OF_GAS: u32 = 11;
    /// Insufficient fee.
    pub const INSUFFICIENT_FEE: u32 = 13;
    /// Invalid request.
    pub const INVALID_REQUEST: u32 = 18;
    /// Invalid signer.
    pub const INVALID_SIGNER: u32 = 24;
    /// Invalid chain id.
    pub const INVALID_CHAIN_ID: u32 = 28;
    /// Invalid type.
    pub const INVALID_TYPE: u32 = 29;
    /// Unknown extension options.
    pub const UNKNOWN_EXTENSION_OPTIONS: u32 = 31;
    /// Internal logic error.
    pub const LOGIC: u32 = 35;
    /// Not supported.
    pub const NOT_SUPPORTED: u32 = 37;
    /// Invalid gas limit.
    pub const INVALID_GAS_LIMIT: u32 = 41;

    /// Contract creation disabled by governance.
    pub const CREATE_DISABLED: u32 = 5;
    /// Contract calls disabled by governance.
    pub const CALL_DISABLED: u32 = 6;
    /// Invalid gas cap.
    pub const INVALID_GAS_CAP: u32 = 12;
    /// Invalid base fee.
    pub const INVALID_BASE_FEE: u32 = 13;
}

/// Error returned by a keeper.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeeperError {
    /// Spendable balance below the requested amount.
    #[error("spendable balance {balance} is smaller than {required}: insufficient funds")]
    InsufficientFunds {
        /// Spendable balance.
        balance: Coins,
        /// Requested amount.
        required: Coins,
    },
    /// No account at the address.
    #[error("account {0} does not exist")]
    UnknownAddress(Address),
    /// No module account with the given name.
    #[error("module account {0} does not exist")]
    UnknownModule(String),
    /// Store failure.
    #[error("store error: {0}")]
    Store(String),
}

/// Error returned by the ante handlers.
///
/// Every rejection reason is a distinct variant carrying the offending values. [`Self::code`] and
/// [`Self::codespace`] map a variant onto the error registry reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnteError {
    // --- transaction structure ---
    /// The transaction has no messages.
    #[error("invalid transaction. Transaction without messages")]
    EmptyTx,
    /// A message is not of the expected type.
    #[error("invalid message type {type_url} at index {index}, expected {expected}")]
    InvalidMessageType {
        /// Position of the message.
        index: usize,
        /// Type of the message found.
        type_url: String,
        /// Expected type.
        expected: &'static str,
    },
    /// The Ethereum envelope carries an unsupported transaction type.
    #[error("transaction type {tx_type} not supported")]
    UnsupportedTxType {
        /// EIP-2718 type byte.
        tx_type: u8,
    },
    /// The native wrapper of an Ethereum transaction violates the envelope rules.
    #[error("{0}")]
    InvalidEthereumWrapper(&'static str),
    /// An Ethereum message outside an Ethereum envelope.
    #[error("MsgEthereumTx needs to be contained within a tx with 'ExtensionOptionsEthereumTx' option")]
    EthereumMsgInNativeTx,
    /// Unknown extension option.
    #[error("rejecting tx with unsupported extension option: {type_url}")]
    UnknownExtensionOption {
        /// Type URL of the option.
        type_url: String,
    },

    // --- configuration ---
    /// London is active but the block has no base fee.
    #[error("base fee is supported but evm block context value is nil")]
    MissingBaseFee,

    // --- fee policy ---
    /// Fee below the validator-local minimum.
    #[error("insufficient fee; got: {got} required: {required}")]
    InsufficientMempoolFee {
        /// Fee provided.
        got: Dec,
        /// Fee required.
        required: Dec,
    },
    /// Fee below the global minimum of an Ethereum message.
    #[error("provided fee < minimum global fee ({got} < {required}). Please increase the priority tip (for EIP-1559 txs) or the gas prices (for access list or legacy txs)")]
    InsufficientGlobalFee {
        /// Fee provided.
        got: Dec,
        /// Fee required.
        required: Dec,
    },
    /// Fee cap below the block base fee, seen by the transfer check.
    #[error("max fee per gas less than block base fee ({fee_cap} < {base_fee})")]
    MaxFeeBelowBaseFee {
        /// Transaction fee cap.
        fee_cap: U256,
        /// Block base fee.
        base_fee: U256,
    },
    /// Fee cap below the block base fee, seen by fee verification.
    #[error("the tx gasfeecap is lower than the tx baseFee: {fee_cap} (gasfeecap), {base_fee} (basefee)")]
    FeeCapBelowBaseFee {
        /// Transaction fee cap.
        fee_cap: U256,
        /// Block base fee.
        base_fee: U256,
    },
    /// Native dynamic-fee transaction priced below the base fee.
    #[error("gas prices too low, got: {fee_cap}{denom} required: {base_fee}{denom}. Please retry using a higher gas price or a higher fee")]
    GasPriceTooLow {
        /// Implied fee cap (fee / gas).
        fee_cap: U256,
        /// Block base fee.
        base_fee: U256,
        /// Fee denomination.
        denom: String,
    },
    /// Negative max priority price in the dynamic-fee extension option.
    #[error("max priority price cannot be negative")]
    NegativePriorityPrice,
    /// Native fee below the validator-local minimum.
    #[error("insufficient fees; got: {got} required: {required}")]
    InsufficientFees {
        /// Fee provided.
        got: Coins,
        /// Fee required.
        required: Coins,
    },
    /// Native transaction without fee while a global minimum applies.
    #[error("fee not provided. Please use the --fees flag or the --gas-price flag along with the --gas flag to estimate the fee. The minimun global fee for this tx is: {required}")]
    FeeNotProvided {
        /// Fee required.
        required: Coins,
    },
    /// Native fee below the global minimum.
    #[error("provided fee < minimum global fee ({got} < {required}). Please increase the gas price.")]
    BelowMinGlobalFee {
        /// Fee provided.
        got: Coins,
        /// Fee required.
        required: Coins,
    },

    // --- message validation ---
    /// The `from` field of an Ethereum message is populated.
    #[error("invalid from address; expected nil; got: {from:?}")]
    InvalidFrom {
        /// The populated address.
        from: Address,
    },
    /// Tip cap above fee cap.
    #[error("max priority fee per gas higher than max fee per gas (tip={tip_cap} > cap={fee_cap})")]
    TipAboveFeeCap {
        /// Tip cap.
        tip_cap: U256,
        /// Fee cap.
        fee_cap: U256,
    },
    /// Chain id of a protected transaction does not match the chain.
    #[error("invalid chain id; expected {expected}, got {got}")]
    InvalidChainId {
        /// Chain id of the chain.
        expected: u64,
        /// Chain id of the transaction.
        got: u64,
    },
    /// Gas price times gas plus value overflows 256 bits.
    #[error("transaction cost overflows 256 bits")]
    CostOverflow,
    /// Contract creation disabled by governance.
    #[error("failed to create new contract")]
    CreateDisabled,
    /// Contract calls disabled by governance.
    #[error("failed to perform a call")]
    CallDisabled,
    /// Gas limit below intrinsic gas.
    #[error("gas limit too low: {gas_limit} (gas limit) < {intrinsic_gas} (intrinsic gas)")]
    GasLimitTooLow {
        /// Declared gas limit.
        gas_limit: u64,
        /// Intrinsic gas of the transaction.
        intrinsic_gas: u64,
    },
    /// Native transaction with zero gas outside genesis or simulation.
    #[error("must provide positive gas")]
    ZeroGas,

    // --- envelope consistency ---
    /// Declared envelope fee coins differ from the sum of message fees.
    #[error("invalid AuthInfo Fee Amount ({declared} != {computed})")]
    InvalidTxFee {
        /// Declared coins.
        declared: Coins,
        /// Sum of message fees as a single coin.
        computed: Coins,
    },
    /// Declared envelope gas limit differs from the sum of message gas limits.
    #[error("invalid AuthInfo Fee GasLimit ({declared} != {computed})")]
    InvalidTxGasLimit {
        /// Declared gas limit.
        declared: u64,
        /// Sum of message gas limits.
        computed: u64,
    },

    // --- authorization ---
    /// Unprotected transaction while those are disabled.
    #[error("rejected unprotected Ethereum transaction. Please EIP155 sign your transaction to protect it against replay-attacks")]
    UnprotectedTx,
    /// Sender recovery failed.
    #[error("couldn't retrieve sender address from the ethereum transaction: {0}")]
    InvalidSigner(String),
    /// Native signature does not verify.
    #[error("signature verification failed for signer {signer}")]
    SignatureVerificationFailed {
        /// Expected signer.
        signer: Address,
    },
    /// Number of native signatures differs from the number of signers.
    #[error("wrong number of signers; expected {expected}, got {got}")]
    SignerCountMismatch {
        /// Number of signers.
        expected: usize,
        /// Number of signatures or signer infos.
        got: usize,
    },
    /// Message type disabled inside authz, or nesting too deep.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The sender has deployed code.
    #[error("the sender is not EOA: address {address}")]
    SenderNotEoa {
        /// Sender address.
        address: Address,
    },

    // --- balances ---
    /// Balance below the maximum cost of the transaction.
    #[error("failed to check sender balance: sender balance < tx cost ({balance} < {cost})")]
    InsufficientBalance {
        /// Sender balance.
        balance: U256,
        /// Maximum cost (gas limit times fee cap plus value).
        cost: U256,
    },
    /// Balance below the transferred value.
    #[error("failed to transfer {value} from address {from} using the EVM block context transfer function")]
    InsufficientTransferFunds {
        /// Value transferred.
        value: U256,
        /// Sender.
        from: Address,
    },
    /// Fee deduction of an Ethereum message failed.
    #[error("failed to deduct transaction costs from user balance: {source}")]
    DeductTxCosts {
        /// Keeper failure.
        #[source]
        source: KeeperError,
    },
    /// Fee deduction of a native transaction failed.
    #[error("insufficient funds to pay for fees: {source}")]
    DeductFees {
        /// Keeper failure.
        #[source]
        source: KeeperError,
    },

    // --- sequencing ---
    /// Ethereum nonce does not match the account sequence.
    #[error("invalid nonce; got {got}, expected {expected}")]
    InvalidNonce {
        /// Transaction nonce.
        got: u64,
        /// Account sequence.
        expected: u64,
    },
    /// Native signer sequence does not match the account sequence.
    #[error("account sequence mismatch, expected {expected}, got {got}")]
    InvalidSequence {
        /// Signer info sequence.
        got: u64,
        /// Account sequence.
        expected: u64,
    },
    /// Account sequence at `u64::MAX`.
    #[error("nonce overflow for account {address}")]
    NonceOverflow {
        /// Account address.
        address: Address,
    },

    // --- resource limits ---
    /// Gas wanted above the block gas limit.
    #[error("tx gas ({gas_wanted}) exceeds block gas limit ({block_gas_limit})")]
    BlockGasLimitExceeded {
        /// Gas wanted by the transaction.
        gas_wanted: u64,
        /// Block gas limit.
        block_gas_limit: u64,
    },

    // --- accounts ---
    /// No account at the address.
    #[error("account {address} does not exist")]
    UnknownAccount {
        /// Address looked up.
        address: Address,
    },

    // --- keepers ---
    /// Recording gas wanted in the transient store failed.
    #[error("failed to add gas wanted to transient store: {source}")]
    AddTransientGasWanted {
        /// Keeper failure.
        #[source]
        source: KeeperError,
    },
    /// Other keeper failure.
    #[error(transparent)]
    Keeper(#[from] KeeperError),

    // --- arithmetic ---
    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),
}

impl AnteError {
    /// Codespace of the registry the error belongs to.
    pub fn codespace(&self) -> &'static str {
        match self {
            Self::MissingBaseFee |
            Self::CreateDisabled |
            Self::CallDisabled |
            Self::TipAboveFeeCap { .. } => codes::EVM_CODESPACE,
            _ => codes::SDK_CODESPACE,
        }
    }

    /// Error code within [`Self::codespace`]. Never zero.
    pub fn code(&self) -> u32 {
        match self {
            Self::EmptyTx |
            Self::InvalidEthereumWrapper(_) |
            Self::InvalidFrom { .. } |
            Self::CostOverflow |
            Self::InvalidTxFee { .. } |
            Self::InvalidTxGasLimit { .. } => codes::INVALID_REQUEST,
            Self::InvalidMessageType { .. } => codes::UNKNOWN_REQUEST,
            Self::UnsupportedTxType { .. } | Self::UnprotectedTx => codes::NOT_SUPPORTED,
            Self::EthereumMsgInNativeTx | Self::SenderNotEoa { .. } => codes::INVALID_TYPE,
            Self::UnknownExtensionOption { .. } => codes::UNKNOWN_EXTENSION_OPTIONS,
            Self::MissingBaseFee => codes::INVALID_BASE_FEE,
            Self::InsufficientMempoolFee { .. } |
            Self::InsufficientGlobalFee { .. } |
            Self::MaxFeeBelowBaseFee { .. } |
            Self::FeeCapBelowBaseFee { .. } |
            Self::GasPriceTooLow { .. } |
            Self::NegativePriorityPrice |
            Self::InsufficientFees { .. } |
            Self::FeeNotProvided { .. } |
            Self::BelowMinGlobalFee { .. } => codes::INSUFFICIENT_FEE,
            Self::TipAboveFeeCap { .. } => codes::INVALID_GAS_CAP,
            Self::InvalidChainId { .. } => codes::INVALID_CHAIN_ID,
            Self::CreateDisabled => codes::CREATE_DISABLED,
            Self::CallDisabled => codes::CALL_DISABLED,
            Self::ZeroGas => codes::INVALID_GAS_LIMIT,
            Self::InvalidSigner(_) => codes::INVALID_SIGNER,
            Self::SignatureVerificationFailed { .. } |
            Self::SignerCountMismatch { .. } |
            Self::Unauthorized(_) => codes::UNAUTHORIZED,
            Self::InsufficientBalance { .. } |
            Self::InsufficientTransferFunds { .. } |
            Self::DeductTxCosts { .. } |
            Self::DeductFees { .. } => codes::INSUFFICIENT_FUNDS,
            Self::InvalidNonce { .. } |
            Self::InvalidSequence { .. } |
            Self::NonceOverflow { .. } => codes::INVALID_SEQUENCE,
            Self::BlockGasLimitExceeded { .. } | Self::GasLimitTooLow { .. } => codes::OUT_OF_GAS,
            Self::UnknownAccount { .. } => codes::UNKNOWN_ADDRESS,
            Self::AddTransientGasWanted { .. } | Self::Keeper(_) | Self::Overflow(_) => {
                codes::LOGIC
            }
        }
    }

    /// Whether the error is a fee policy rejection.
    pub fn is_insufficient_fee(&self) -> bool {
        self.codespace() == codes::SDK_CODESPACE && self.code() == codes::INSUFFICIENT_FEE
    }
}
