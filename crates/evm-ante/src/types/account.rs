use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// A native account as stored by the account keeper.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseAccount {
    /// Account address.
    pub address: Address,
    /// Number assigned by the account keeper on creation.
    pub account_number: u64,
    /// Sequence, i.e. the nonce of the next transaction sent by this account.
    pub sequence: u64,
}

impl BaseAccount {
    /// Creates a fresh account with sequence zero.
    pub const fn new(address: Address, account_number: u64) -> Self {
        Self { address, account_number, sequence: 0 }
    }
}
