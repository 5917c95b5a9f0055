use alloy_primitives::{keccak256, Address, B256};
use serde::{Deserialize, Serialize};

use crate::{constants::type_urls, Coins, Fee, Msg, TxBody};

/// Bank transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSend {
    /// Sender, also the signer.
    pub from_address: Address,
    /// Recipient.
    pub to_address: Address,
    /// Amount sent.
    pub amount: Coins,
}

/// Execution of messages by a grantee on behalf of their granters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExec {
    /// Grantee executing the messages, also the signer.
    pub grantee: Address,
    /// Messages to execute.
    pub msgs: Vec<Msg>,
}

/// Grant of an authorization for one message type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgGrant {
    /// Granter, also the signer.
    pub granter: Address,
    /// Grantee.
    pub grantee: Address,
    /// Type URL of the authorized message.
    pub msg_type_url: String,
}

/// Non-Ethereum message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NativeMsg {
    /// Bank transfer.
    Send(MsgSend),
    /// Authz execution.
    Exec(MsgExec),
    /// Authz grant.
    Grant(MsgGrant),
    /// Any other message, identified by its type URL and single signer.
    Other {
        /// Type URL.
        type_url: String,
        /// Signer.
        signer: Address,
    },
}

impl NativeMsg {
    /// Type URL of the message.
    pub fn type_url(&self) -> &str {
        match self {
            Self::Send(_) => type_urls::MSG_SEND,
            Self::Exec(_) => type_urls::MSG_EXEC,
            Self::Grant(_) => type_urls::MSG_GRANT,
            Self::Other { type_url, .. } => type_url,
        }
    }

    /// Account that must sign the message.
    pub const fn signer(&self) -> Address {
        match self {
            Self::Send(msg) => msg.from_address,
            Self::Exec(msg) => msg.grantee,
            Self::Grant(msg) => msg.granter,
            Self::Other { signer, .. } => *signer,
        }
    }
}

/// Document signed by each signer of a native transaction.
#[derive(Debug, Serialize)]
pub struct SignDoc<'a> {
    /// Native chain id.
    pub chain_id: &'a str,
    /// Account number of the signer.
    pub account_number: u64,
    /// Sequence of the signer.
    pub sequence: u64,
    /// Transaction body.
    pub body: &'a TxBody,
    /// Fee envelope.
    pub fee: &'a Fee,
}

impl SignDoc<'_> {
    /// Keccak-256 of the canonical JSON encoding of the document.
    pub fn signing_hash(&self) -> Result<B256, serde_json::Error> {
        Ok(keccak256(serde_json::to_vec(self)?))
    }
}
