use alloy_primitives::Address;
use tracing::trace;

use crate::{ante::AnteResult, AnteError, MsgEthereumTx, Signer, TxData};

/// Recovers the sender of `msg` and records it on the message.
///
/// Unprotected transactions are rejected unless `allow_unprotected_txs` is set. A sender
/// already recorded on the message is returned as is.
pub fn signature_verification(
    msg: &MsgEthereumTx,
    tx: &TxData<'_>,
    signer: &Signer,
    allow_unprotected_txs: bool,
) -> AnteResult<Address> {
    if !allow_unprotected_txs && !tx.is_protected() {
        return Err(AnteError::UnprotectedTx);
    }
    if let Some(sender) = msg.sender() {
        return Ok(sender);
    }

    let sender = signer.sender(tx).map_err(|err| AnteError::InvalidSigner(err.to_string()))?;
    trace!(target: "evm_ante::signature", hash = %tx.hash(), %sender, "Recovered sender");
    Ok(msg.cache_sender(sender))
}
