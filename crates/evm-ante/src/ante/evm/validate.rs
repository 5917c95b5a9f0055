use alloy_primitives::{Address, ChainId};

use crate::{ante::AnteResult, AnteError, EvmParams, ExtensionOption, Fee, Msg, Tx, TxData};

/// Checks the native wrapper of an Ethereum transaction and returns its declared fee envelope.
///
/// The wrapper must hold at least one message, only Ethereum messages, exactly one extension
/// option, and nothing else: no memo, timeout height, non-critical extension options, signer
/// infos, fee payer or granter, nor native signatures.
pub fn validate_tx(tx: &Tx) -> AnteResult<Fee> {
    let body = &tx.body;
    if body.messages.is_empty() {
        return Err(AnteError::EmptyTx);
    }
    for (index, msg) in body.messages.iter().enumerate() {
        if !matches!(msg, Msg::Ethereum(_)) {
            return Err(AnteError::InvalidMessageType {
                index,
                type_url: msg.type_url().to_string(),
                expected: crate::constants::type_urls::MSG_ETHEREUM_TX,
            });
        }
    }
    if !body.memo.is_empty() ||
        body.timeout_height != 0 ||
        !body.non_critical_extension_options.is_empty()
    {
        return Err(AnteError::InvalidEthereumWrapper(
            "for eth tx body Memo TimeoutHeight NonCriticalExtensionOptions should be empty",
        ));
    }
    if !matches!(body.extension_options.as_slice(), [ExtensionOption::EthereumTx]) {
        return Err(AnteError::InvalidEthereumWrapper(
            "for eth tx length of ExtensionOptions should be 1",
        ));
    }

    let auth_info = &tx.auth_info;
    if !auth_info.signer_infos.is_empty() {
        return Err(AnteError::InvalidEthereumWrapper(
            "for eth tx AuthInfo SignerInfos should be empty",
        ));
    }
    if auth_info.fee.payer.is_some() || auth_info.fee.granter.is_some() {
        return Err(AnteError::InvalidEthereumWrapper(
            "for eth tx AuthInfo Fee payer and granter should be empty",
        ));
    }
    if !tx.signatures.is_empty() {
        return Err(AnteError::InvalidEthereumWrapper("for eth tx Signatures should be empty"));
    }

    Ok(auth_info.fee.clone())
}

/// Checks one Ethereum transaction against the module parameters.
///
/// Rejects a populated `from`, a protected transaction bound to another chain, a tip cap above
/// the fee cap, a cost overflowing 256 bits, and operations disabled by governance access
/// control.
pub fn validate_msg(
    params: &EvmParams,
    chain_id: ChainId,
    tx: &TxData<'_>,
    from: Option<Address>,
) -> AnteResult<()> {
    if let Some(from) = from {
        return Err(AnteError::InvalidFrom { from });
    }
    validate_basic(chain_id, tx)?;
    check_disabled_create_call(params, tx)
}

fn validate_basic(chain_id: ChainId, tx: &TxData<'_>) -> AnteResult<()> {
    if let Some(got) = tx.chain_id() {
        if got != chain_id {
            return Err(AnteError::InvalidChainId { expected: chain_id, got });
        }
    }
    let (tip_cap, fee_cap) = (tx.gas_tip_cap(), tx.gas_fee_cap());
    if tip_cap > fee_cap {
        return Err(AnteError::TipAboveFeeCap { tip_cap, fee_cap });
    }
    tx.cost().ok_or(AnteError::CostOverflow)?;
    Ok(())
}

fn check_disabled_create_call(params: &EvmParams, tx: &TxData<'_>) -> AnteResult<()> {
    let access_control = &params.access_control;
    match tx.to() {
        None if access_control.create.is_restricted() => Err(AnteError::CreateDisabled),
        Some(_) if access_control.call.is_restricted() => Err(AnteError::CallDisabled),
        _ => Ok(()),
    }
}
