use alloy_consensus::{Signed, TxEip1559, TxEip2930, TxEnvelope, TxLegacy};
use alloy_eips::eip2930::AccessList;
use alloy_primitives::{Address, Bytes, ChainId, TxKind, B256, U256};
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::AnteError;

/// A native message wrapping one signed Ethereum transaction.
///
/// Equality ignores the cached sender.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MsgEthereumTx {
    /// The signed EIP-2718 transaction.
    pub envelope: TxEnvelope,
    /// Sender declared by the client. Must be empty: the sender is only ever recovered from
    /// the signature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Sender recovered from the signature, filled at most once.
    #[serde(skip)]
    sender: OnceCell<Address>,
}

impl PartialEq for MsgEthereumTx {
    fn eq(&self, other: &Self) -> bool {
        self.envelope == other.envelope && self.from == other.from
    }
}

impl Eq for MsgEthereumTx {}

impl MsgEthereumTx {
    /// Wraps a signed transaction.
    pub fn new(envelope: TxEnvelope) -> Self {
        Self { envelope, from: None, sender: OnceCell::new() }
    }

    /// Sets the declared sender.
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Hash of the signed transaction.
    pub fn hash(&self) -> B256 {
        *self.envelope.tx_hash()
    }

    /// Typed view of the payload. Only legacy, EIP-2930 and EIP-1559 transactions are supported.
    pub fn tx_data(&self) -> Result<TxData<'_>, AnteError> {
        match &self.envelope {
            TxEnvelope::Legacy(tx) => Ok(TxData::Legacy(tx)),
            TxEnvelope::Eip2930(tx) => Ok(TxData::AccessList(tx)),
            TxEnvelope::Eip1559(tx) => Ok(TxData::DynamicFee(tx)),
            other => Err(AnteError::UnsupportedTxType { tx_type: u8::from(other.tx_type()) }),
        }
    }

    /// The recovered sender, if signature verification already ran on this message.
    pub fn sender(&self) -> Option<Address> {
        self.sender.get().copied()
    }

    /// Records the recovered sender. Later calls keep the first value.
    pub(crate) fn cache_sender(&self, sender: Address) -> Address {
        *self.sender.get_or_init(|| sender)
    }
}

/// Borrowed view over the payload of a supported Ethereum transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxData<'a> {
    /// Legacy transaction, EIP-155 protected or not.
    Legacy(&'a Signed<TxLegacy>),
    /// EIP-2930 access list transaction.
    AccessList(&'a Signed<TxEip2930>),
    /// EIP-1559 dynamic fee transaction.
    DynamicFee(&'a Signed<TxEip1559>),
}

impl TxData<'_> {
    /// EIP-2718 type byte.
    pub const fn tx_type(&self) -> u8 {
        match self {
            Self::Legacy(_) => 0,
            Self::AccessList(_) => 1,
            Self::DynamicFee(_) => 2,
        }
    }

    /// Whether the transaction prices gas with a fee cap and tip cap.
    pub const fn is_dynamic_fee(&self) -> bool {
        matches!(self, Self::DynamicFee(_))
    }

    /// Hash of the signed transaction.
    pub fn hash(&self) -> B256 {
        match self {
            Self::Legacy(tx) => *tx.hash(),
            Self::AccessList(tx) => *tx.hash(),
            Self::DynamicFee(tx) => *tx.hash(),
        }
    }

    /// Chain id the transaction is bound to, `None` for unprotected legacy transactions.
    pub fn chain_id(&self) -> Option<ChainId> {
        match self {
            Self::Legacy(tx) => tx.tx().chain_id,
            Self::AccessList(tx) => Some(tx.tx().chain_id),
            Self::DynamicFee(tx) => Some(tx.tx().chain_id),
        }
    }

    /// Whether the signature commits to a chain id (EIP-155 or typed transaction).
    pub fn is_protected(&self) -> bool {
        self.chain_id().is_some()
    }

    /// Sender nonce.
    pub fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.tx().nonce,
            Self::AccessList(tx) => tx.tx().nonce,
            Self::DynamicFee(tx) => tx.tx().nonce,
        }
    }

    /// Gas limit.
    pub fn gas(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.tx().gas_limit,
            Self::AccessList(tx) => tx.tx().gas_limit,
            Self::DynamicFee(tx) => tx.tx().gas_limit,
        }
    }

    /// Gas price. For dynamic fee transactions this is the fee cap.
    pub fn gas_price(&self) -> U256 {
        self.gas_fee_cap()
    }

    /// Maximum price per gas the sender pays.
    pub fn gas_fee_cap(&self) -> U256 {
        match self {
            Self::Legacy(tx) => U256::from(tx.tx().gas_price),
            Self::AccessList(tx) => U256::from(tx.tx().gas_price),
            Self::DynamicFee(tx) => U256::from(tx.tx().max_fee_per_gas),
        }
    }

    /// Maximum price per gas paid above the base fee. Equal to the gas price for non dynamic
    /// fee transactions.
    pub fn gas_tip_cap(&self) -> U256 {
        match self {
            Self::DynamicFee(tx) => U256::from(tx.tx().max_priority_fee_per_gas),
            _ => self.gas_fee_cap(),
        }
    }

    /// Transferred value.
    pub fn value(&self) -> U256 {
        match self {
            Self::Legacy(tx) => tx.tx().value,
            Self::AccessList(tx) => tx.tx().value,
            Self::DynamicFee(tx) => tx.tx().value,
        }
    }

    /// Call or create.
    pub fn kind(&self) -> TxKind {
        match self {
            Self::Legacy(tx) => tx.tx().to,
            Self::AccessList(tx) => tx.tx().to,
            Self::DynamicFee(tx) => tx.tx().to,
        }
    }

    /// Recipient, `None` for contract creation.
    pub fn to(&self) -> Option<Address> {
        self.kind().to().copied()
    }

    /// Call data or init code.
    pub fn data(&self) -> &Bytes {
        match self {
            Self::Legacy(tx) => &tx.tx().input,
            Self::AccessList(tx) => &tx.tx().input,
            Self::DynamicFee(tx) => &tx.tx().input,
        }
    }

    /// Access list, `None` for legacy transactions.
    pub fn access_list(&self) -> Option<&AccessList> {
        match self {
            Self::Legacy(_) => None,
            Self::AccessList(tx) => Some(&tx.tx().access_list),
            Self::DynamicFee(tx) => Some(&tx.tx().access_list),
        }
    }

    /// Declared fee, `gas_fee_cap * gas`. `None` on overflow.
    pub fn fee(&self) -> Option<U256> {
        self.gas_fee_cap().checked_mul(U256::from(self.gas()))
    }

    /// Maximum cost, `fee + value`. `None` on overflow.
    pub fn cost(&self) -> Option<U256> {
        self.fee()?.checked_add(self.value())
    }

    /// Price per gas actually paid: `min(tip_cap + base_fee, fee_cap)` for dynamic fee
    /// transactions when a base fee applies, the gas price otherwise.
    pub fn effective_gas_price(&self, base_fee: Option<U256>) -> U256 {
        match (self, base_fee) {
            (Self::DynamicFee(_), Some(base_fee)) => {
                self.gas_tip_cap().saturating_add(base_fee).min(self.gas_fee_cap())
            }
            _ => self.gas_price(),
        }
    }

    /// Fee actually paid, `effective_gas_price * gas`. `None` on overflow.
    pub fn effective_fee(&self, base_fee: Option<U256>) -> Option<U256> {
        self.effective_gas_price(base_fee).checked_mul(U256::from(self.gas()))
    }

    /// Cost actually paid, `effective_fee + value`. `None` on overflow.
    pub fn effective_cost(&self, base_fee: Option<U256>) -> Option<U256> {
        self.effective_fee(base_fee)?.checked_add(self.value())
    }

    /// Number of accounts and storage keys in the access list.
    pub fn access_list_counts(&self) -> (u64, u64) {
        self.access_list().map_or((0, 0), |list| {
            list.0.iter().fold((0, 0), |(accounts, keys), item| {
                (accounts + 1, keys + item.storage_keys.len() as u64)
            })
        })
    }
}

/// The fields of an Ethereum transaction the EVM transfer preconditions look at, with the
/// sender resolved and the gas price made effective.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreMessage {
    /// Recovered sender.
    pub from: Address,
    /// Recipient, `None` for contract creation.
    pub to: Option<Address>,
    /// Sender nonce.
    pub nonce: u64,
    /// Transferred value.
    pub value: U256,
    /// Gas limit.
    pub gas_limit: u64,
    /// Effective gas price.
    pub gas_price: U256,
    /// Fee cap.
    pub gas_fee_cap: U256,
    /// Tip cap.
    pub gas_tip_cap: U256,
    /// Call data or init code.
    pub data: Bytes,
    /// Access list.
    pub access_list: AccessList,
}

impl CoreMessage {
    /// Builds the core message of `tx` sent by `from` under `base_fee`.
    pub fn new(tx: &TxData<'_>, from: Address, base_fee: Option<U256>) -> Self {
        Self {
            from,
            to: tx.to(),
            nonce: tx.nonce(),
            value: tx.value(),
            gas_limit: tx.gas(),
            gas_price: tx.effective_gas_price(base_fee),
            gas_fee_cap: tx.gas_fee_cap(),
            gas_tip_cap: tx.gas_tip_cap(),
            data: tx.data().clone(),
            access_list: tx.access_list().cloned().unwrap_or_default(),
        }
    }
}
