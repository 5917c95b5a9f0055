use alloy_consensus::{SignableTransaction, Signed, TxEip1559, TxEip2930, TxEnvelope, TxLegacy};
use alloy_primitives::{Address, Bytes, ChainId, Signature, TxKind, B256, U256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;

use crate::{
    AuthInfo, BaseAccount, Coin, Coins, ExtensionOption, Fee, Msg, MsgEthereumTx, SignDoc,
    SignerInfo, Tx, TxBody, DEFAULT_EVM_CHAIN_ID,
};

/// EVM chain id used by the builders.
pub const CHAIN_ID: ChainId = DEFAULT_EVM_CHAIN_ID;

/// Native chain id used by the builders.
pub const COSMOS_CHAIN_ID: &str = "evmos_9001-1";

/// Denomination of the default EVM coin.
pub const DENOM: &str = "aevmos";

/// Recipient of the default transactions.
pub const RECIPIENT: Address = Address::repeat_byte(0x42);

/// One gwei.
pub const GWEI: u128 = 1_000_000_000;

/// Deterministic test key number `index`. `index` must be non-zero.
pub fn signer(index: u8) -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(index)).unwrap()
}

/// EIP-155 legacy transfer of zero value with 21000 gas at 2 gwei.
pub fn legacy_tx() -> TxLegacy {
    TxLegacy {
        chain_id: Some(CHAIN_ID),
        nonce: 0,
        gas_price: 2 * GWEI,
        gas_limit: 21_000,
        to: TxKind::Call(RECIPIENT),
        value: U256::ZERO,
        input: Bytes::new(),
    }
}

/// EIP-2930 transfer of zero value with 21000 gas at 2 gwei.
pub fn access_list_tx() -> TxEip2930 {
    TxEip2930 {
        chain_id: CHAIN_ID,
        nonce: 0,
        gas_price: 2 * GWEI,
        gas_limit: 21_000,
        to: TxKind::Call(RECIPIENT),
        value: U256::ZERO,
        access_list: Default::default(),
        input: Bytes::new(),
    }
}

/// EIP-1559 transfer of zero value with 21000 gas, a 2 gwei fee cap and a 1 gwei tip cap.
pub fn dynamic_fee_tx() -> TxEip1559 {
    TxEip1559 {
        chain_id: CHAIN_ID,
        nonce: 0,
        gas_limit: 21_000,
        max_fee_per_gas: 2 * GWEI,
        max_priority_fee_per_gas: GWEI,
        to: TxKind::Call(RECIPIENT),
        value: U256::ZERO,
        access_list: Default::default(),
        input: Bytes::new(),
    }
}

/// Signs `tx` with `signer`.
pub fn sign<T: SignableTransaction<Signature>>(signer: &PrivateKeySigner, tx: T) -> Signed<T> {
    let signature = signer.sign_hash_sync(&tx.signature_hash()).unwrap();
    tx.into_signed(signature)
}

/// Signs `tx` with `signer` and wraps it in a message.
pub fn ethereum_msg<T>(signer: &PrivateKeySigner, tx: T) -> MsgEthereumTx
where
    T: SignableTransaction<Signature>,
    Signed<T>: Into<TxEnvelope>,
{
    MsgEthereumTx::new(sign(signer, tx).into())
}

/// Native wrapper of Ethereum messages, declaring the sum of their fees and gas limits.
pub fn ethereum_tx(msgs: Vec<MsgEthereumTx>) -> Tx {
    let (mut fee, mut gas_limit) = (U256::ZERO, 0u64);
    for msg in &msgs {
        let tx = msg.tx_data().unwrap();
        fee += tx.fee().unwrap();
        gas_limit += tx.gas();
    }
    Tx {
        body: TxBody {
            messages: msgs.into_iter().map(Msg::from).collect(),
            extension_options: vec![ExtensionOption::EthereumTx],
            ..Default::default()
        },
        auth_info: AuthInfo {
            fee: Fee {
                amount: Coins::single(Coin::new(DENOM, fee)),
                gas_limit,
                ..Default::default()
            },
            ..Default::default()
        },
        signatures: Vec::new(),
    }
}

/// Unsigned native transaction.
pub fn native_tx(messages: Vec<Msg>, fee: Coins, gas_limit: u64) -> Tx {
    Tx {
        body: TxBody { messages, ..Default::default() },
        auth_info: AuthInfo {
            fee: Fee { amount: fee, gas_limit, ..Default::default() },
            ..Default::default()
        },
        signatures: Vec::new(),
    }
}

/// Signs a native transaction, one key per signer in signer order, with the current number and
/// sequence of their accounts.
pub fn sign_native_tx(
    mut tx: Tx,
    chain_id: &str,
    signers: &[(&PrivateKeySigner, &BaseAccount)],
) -> Tx {
    tx.auth_info.signer_infos =
        signers.iter().map(|(_, account)| SignerInfo { sequence: account.sequence }).collect();
    tx.signatures = signers
        .iter()
        .map(|(key, account)| {
            let sign_doc = SignDoc {
                chain_id,
                account_number: account.account_number,
                sequence: account.sequence,
                body: &tx.body,
                fee: tx.fee(),
            };
            key.sign_hash_sync(&sign_doc.signing_hash().unwrap()).unwrap()
        })
        .collect();
    tx
}
