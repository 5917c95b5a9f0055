use alloy_hardforks::EthereumHardfork;
use alloy_primitives::{Address, ChainId};

use crate::{constants::SECP256K1N_HALF, ChainConfig, TxData};

/// Signature scheme accepted at a given height, from the least to the most permissive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignerKind {
    /// Unprotected legacy transactions, any `s` value.
    Frontier,
    /// Unprotected legacy transactions, low `s` only.
    Homestead,
    /// Legacy transactions, EIP-155 protected or not.
    Eip155,
    /// Adds EIP-2930 access list transactions.
    Berlin,
    /// Adds EIP-1559 dynamic fee transactions.
    London,
}

/// Error recovering the sender of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// The transaction type is not accepted by the signer.
    #[error("transaction type not supported: tx_type={tx_type}, signer={kind:?}")]
    TxTypeNotSupported {
        /// EIP-2718 type byte.
        tx_type: u8,
        /// Signer in use.
        kind: SignerKind,
    },
    /// The transaction is bound to another chain.
    #[error("invalid chain id for signer: have {got} want {expected}")]
    InvalidChainId {
        /// Chain id of the signer.
        expected: ChainId,
        /// Chain id of the transaction.
        got: ChainId,
    },
    /// A replay-protected transaction before EIP-155 activation.
    #[error("replay-protected transaction not supported before EIP-155")]
    ProtectedBeforeEip155,
    /// The `s` value of the signature is in the upper half of the curve order.
    #[error("invalid transaction v, r, s values")]
    HighS,
    /// Public key recovery failed.
    #[error("{0}")]
    Recovery(String),
}

/// Recovers transaction senders following the signing rules active at a given height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signer {
    chain_id: ChainId,
    kind: SignerKind,
}

impl Signer {
    /// The signer for block `height` under `config`.
    pub fn make(config: &ChainConfig, height: u64) -> Self {
        let kind = if config.is_active_at(EthereumHardfork::London, height) {
            SignerKind::London
        } else if config.is_active_at(EthereumHardfork::Berlin, height) {
            SignerKind::Berlin
        } else if config.is_active_at(EthereumHardfork::SpuriousDragon, height) {
            SignerKind::Eip155
        } else if config.is_active_at(EthereumHardfork::Homestead, height) {
            SignerKind::Homestead
        } else {
            SignerKind::Frontier
        };
        Self { chain_id: config.chain_id, kind }
    }

    /// The most permissive signer for `chain_id`.
    pub const fn latest(chain_id: ChainId) -> Self {
        Self { chain_id, kind: SignerKind::London }
    }

    /// Chain id the signer accepts.
    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Signature scheme in use.
    pub const fn kind(&self) -> SignerKind {
        self.kind
    }

    /// Whether the signer accepts transactions of type `tx_type`.
    pub const fn supports(&self, tx_type: u8) -> bool {
        match tx_type {
            0 => true,
            1 => matches!(self.kind, SignerKind::Berlin | SignerKind::London),
            2 => matches!(self.kind, SignerKind::London),
            _ => false,
        }
    }

    /// Recovers the sender of `tx`.
    pub fn sender(&self, tx: &TxData<'_>) -> Result<Address, SignerError> {
        let tx_type = tx.tx_type();
        if !self.supports(tx_type) {
            return Err(SignerError::TxTypeNotSupported { tx_type, kind: self.kind });
        }

        match tx.chain_id() {
            Some(_) if self.kind < SignerKind::Eip155 => {
                return Err(SignerError::ProtectedBeforeEip155)
            }
            Some(got) if got != self.chain_id => {
                return Err(SignerError::InvalidChainId { expected: self.chain_id, got })
            }
            _ => {}
        }

        let recovered = match tx {
            TxData::Legacy(signed) => {
                self.check_s(signed.signature().s())?;
                signed.recover_signer()
            }
            TxData::AccessList(signed) => {
                self.check_s(signed.signature().s())?;
                signed.recover_signer()
            }
            TxData::DynamicFee(signed) => {
                self.check_s(signed.signature().s())?;
                signed.recover_signer()
            }
        };
        recovered.map_err(|err| SignerError::Recovery(err.to_string()))
    }

    fn check_s(&self, s: alloy_primitives::U256) -> Result<(), SignerError> {
        if self.kind >= SignerKind::Homestead && s > SECP256K1N_HALF {
            return Err(SignerError::HighS);
        }
        Ok(())
    }
}
