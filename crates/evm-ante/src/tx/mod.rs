//! Transactions as seen by the ante handlers.
//!
//! A [`Tx`] is the native transaction envelope. Ethereum transactions travel inside it as
//! [`MsgEthereumTx`] messages, marked by the [`ExtensionOption::EthereumTx`] option.

mod eth;
mod native;
mod signer;

pub use eth::*;
pub use native::*;
pub use signer::*;

use alloy_primitives::{Address, Signature, I256};
use serde::{Deserialize, Serialize};

use crate::{constants::type_urls, Coins};

/// A message of a native transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Msg {
    /// Wrapped Ethereum transaction.
    Ethereum(MsgEthereumTx),
    /// Any other message.
    Native(NativeMsg),
}

impl Msg {
    /// Type URL of the message.
    pub fn type_url(&self) -> &str {
        match self {
            Self::Ethereum(_) => type_urls::MSG_ETHEREUM_TX,
            Self::Native(msg) => msg.type_url(),
        }
    }

    /// The wrapped Ethereum transaction, if any.
    pub const fn as_ethereum(&self) -> Option<&MsgEthereumTx> {
        match self {
            Self::Ethereum(msg) => Some(msg),
            Self::Native(_) => None,
        }
    }
}

impl From<MsgEthereumTx> for Msg {
    fn from(msg: MsgEthereumTx) -> Self {
        Self::Ethereum(msg)
    }
}

impl From<NativeMsg> for Msg {
    fn from(msg: NativeMsg) -> Self {
        Self::Native(msg)
    }
}

/// Extension option attached to a transaction body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionOption {
    /// Marks an Ethereum transaction envelope.
    EthereumTx,
    /// Caps the priority price of a native dynamic-fee transaction.
    DynamicFeeTx {
        /// Maximum price per gas paid above the base fee.
        max_priority_price: I256,
    },
    /// Any other option.
    Other {
        /// Type URL.
        type_url: String,
    },
}

impl ExtensionOption {
    /// Type URL of the option.
    pub fn type_url(&self) -> &str {
        match self {
            Self::EthereumTx => type_urls::EXTENSION_OPTIONS_ETHEREUM_TX,
            Self::DynamicFeeTx { .. } => type_urls::EXTENSION_OPTION_DYNAMIC_FEE_TX,
            Self::Other { type_url } => type_url,
        }
    }
}

/// Body of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxBody {
    /// Messages, executed in order.
    pub messages: Vec<Msg>,
    /// Free-form note.
    pub memo: String,
    /// Height after which the transaction is no longer valid, zero for none.
    pub timeout_height: u64,
    /// Critical extension options.
    pub extension_options: Vec<ExtensionOption>,
    /// Extension options that may be ignored.
    pub non_critical_extension_options: Vec<ExtensionOption>,
}

/// Signing information of one signer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerInfo {
    /// Sequence the signer signed with.
    pub sequence: u64,
}

/// Fee envelope of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Amount paid.
    pub amount: Coins,
    /// Gas limit.
    pub gas_limit: u64,
    /// Account paying the fee instead of the first signer.
    pub payer: Option<Address>,
    /// Account granting a fee allowance.
    pub granter: Option<Address>,
}

/// Authorization information of a transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthInfo {
    /// One entry per signer.
    pub signer_infos: Vec<SignerInfo>,
    /// Fee envelope.
    pub fee: Fee,
}

/// A native transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Body.
    pub body: TxBody,
    /// Authorization information.
    pub auth_info: AuthInfo,
    /// One signature per signer.
    pub signatures: Vec<Signature>,
}

impl Tx {
    /// Messages of the transaction.
    pub fn msgs(&self) -> &[Msg] {
        &self.body.messages
    }

    /// Fee envelope.
    pub const fn fee(&self) -> &Fee {
        &self.auth_info.fee
    }

    /// Declared gas limit.
    pub const fn gas(&self) -> u64 {
        self.auth_info.fee.gas_limit
    }

    /// Required signers in order of first appearance. Ethereum messages have no native signer.
    pub fn signers(&self) -> Vec<Address> {
        let mut signers = Vec::new();
        for msg in self.msgs() {
            if let Msg::Native(native) = msg {
                let signer = native.signer();
                if !signers.contains(&signer) {
                    signers.push(signer);
                }
            }
        }
        signers
    }

    /// Account paying the fee: the declared payer, else the first signer.
    pub fn fee_payer(&self) -> Option<Address> {
        self.auth_info.fee.payer.or_else(|| self.signers().first().copied())
    }
}
