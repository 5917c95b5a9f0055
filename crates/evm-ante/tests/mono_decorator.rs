//! End-to-end tests of the admission of Ethereum transactions.

use std::sync::Arc;

use alloy_consensus::{TxEip1559, TxEip2930, TxLegacy};
use alloy_primitives::{Address, TxKind, B256, U256};
use evm_ante::{
    ante::evm::consume_fees_and_emit_event,
    constants::events::{ATTRIBUTE_KEY_ETHEREUM_TX_HASH, ATTRIBUTE_KEY_FEE, ATTRIBUTE_KEY_TX_INDEX},
    test_utils::*,
    AccessControl, AccessControlType, AccessType, AnteDecorator, AnteError, AnteResult,
    BlockParams, ChainConfig, Coin, Coins, ConsensusParams, Context, DecCoin, DecCoins,
    DecoratorUtils, EvmCoinInfo, EvmConfig, EvmParams, KeeperError, Msg, MonoDecorator, MsgSend,
    NativeMsg, Tx,
};
use tracing_subscriber::EnvFilter;

/// Logs to the test output, filtered by `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One ether, the balance of funded accounts.
const ETHER: u128 = 1_000_000_000_000_000_000;

type Decorator = MonoDecorator<MemoryKeepers, MemoryKeepers, MemoryKeepers>;

fn decorator(keepers: &MemoryKeepers, config: EvmConfig, max_tx_gas_wanted: u64) -> Decorator {
    MonoDecorator::new(
        keepers.clone(),
        keepers.clone(),
        keepers.clone(),
        Arc::new(config),
        max_tx_gas_wanted,
    )
}

/// Deliver-tx context at height 1 with a 30M block gas limit.
fn deliver_ctx() -> Context {
    Context::new(COSMOS_CHAIN_ID, 1).with_consensus_params(ConsensusParams {
        block: Some(BlockParams { max_gas: 30_000_000, max_bytes: 1 << 20 }),
    })
}

fn handle(decorator: &Decorator, ctx: Context, tx: &Tx, simulate: bool) -> AnteResult {
    init_tracing();
    let next = |ctx: Context, _: &Tx, _: bool| -> AnteResult { Ok(ctx) };
    decorator.ante_handle(ctx, tx, simulate, &next)
}

fn funded(keepers: MemoryKeepers, index: u8) -> (MemoryKeepers, Address) {
    let address = signer(index).address();
    (keepers.fund(address, 0, U256::from(ETHER)), address)
}

fn pre_london() -> EvmConfig {
    EvmConfig::default().with_chain_config(ChainConfig::default().with_london_block(None))
}

fn dynamic_fee_with_tip(tip: u128) -> TxEip1559 {
    TxEip1559 { max_priority_fee_per_gas: tip, ..dynamic_fee_tx() }
}

#[test]
fn test_admits_dynamic_fee_tx() {
    let (keepers, sender) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let msg = ethereum_msg(&signer(1), dynamic_fee_tx());
    let hash = msg.hash();
    let tx = ethereum_tx(vec![msg]);

    let ctx = handle(&decorator, deliver_ctx(), &tx, false).unwrap();

    // effective price min(1 gwei + 1 gwei, 2 gwei) over a 1 gwei base fee
    let fee = U256::from(2 * GWEI * 21_000);
    assert_eq!(ctx.priority(), 1_000);
    assert_eq!(ctx.gas_meter().limit(), 21_000);
    assert!(ctx.gas_meter().is_infinite());
    assert_eq!(keepers.balance(sender, DENOM), U256::from(ETHER) - fee);
    assert_eq!(keepers.balance(FEE_COLLECTOR_ADDRESS, DENOM), fee);
    assert_eq!(keepers.account(sender).unwrap().sequence, 1);
    assert_eq!(keepers.transient_gas_wanted(), 21_000);
    assert_eq!(keepers.transient_gas_used_resets(), 1);
    assert_eq!(tx.msgs()[0].as_ethereum().unwrap().sender(), Some(sender));

    let events = ctx.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].attribute(ATTRIBUTE_KEY_FEE), Some(format!("{fee}{DENOM}").as_str()));
    assert_eq!(
        events[1].attribute(ATTRIBUTE_KEY_ETHEREUM_TX_HASH),
        Some(hash.to_string().as_str())
    );
    assert_eq!(events[1].attribute(ATTRIBUTE_KEY_TX_INDEX), Some("0"));
}

#[test]
fn test_admits_legacy_and_access_list_txs() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let tx = ethereum_tx(vec![
        ethereum_msg(&signer(1), legacy_tx()),
        ethereum_msg(&signer(1), TxEip2930 { nonce: 1, ..access_list_tx() }),
    ]);

    let ctx = handle(&decorator, deliver_ctx(), &tx, false).unwrap();
    assert_eq!(ctx.gas_meter().limit(), 42_000);
    assert_eq!(ctx.priority(), 1_000);
}

#[test]
fn test_priority_is_min_across_messages() {
    let mut keepers = MemoryKeepers::default().with_tx_index(3);
    let mut msgs = Vec::new();
    for (index, tip) in [(1u8, 10u128), (2, 5), (3, 20)] {
        keepers = funded(keepers, index).0;
        msgs.push(ethereum_msg(&signer(index), dynamic_fee_with_tip(tip * 1_000_000)));
    }
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let tx = ethereum_tx(msgs);

    let ctx = handle(&decorator, deliver_ctx(), &tx, false).unwrap();
    assert_eq!(ctx.priority(), 5);
    assert_eq!(ctx.gas_meter().limit(), 63_000);

    let indexes: Vec<_> =
        ctx.events().iter().filter_map(|event| event.attribute(ATTRIBUTE_KEY_TX_INDEX)).collect();
    assert_eq!(indexes, ["3", "4", "5"]);
}

#[test]
fn test_missing_base_fee_under_london() {
    let (keepers, _) = funded(MemoryKeepers::default().with_base_fee(None), 1);
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);

    assert_eq!(
        handle(&decorator, deliver_ctx(), &tx, false).unwrap_err(),
        AnteError::MissingBaseFee
    );
    assert_eq!(
        DecoratorUtils::new(&deliver_ctx(), &EvmConfig::default(), &keepers, &keepers)
            .unwrap_err(),
        AnteError::MissingBaseFee
    );
}

#[test]
fn test_utils_snapshot_is_read_only() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let config = EvmConfig::default();
    let ctx = deliver_ctx();

    let first = DecoratorUtils::new(&ctx, &config, &keepers, &keepers).unwrap();
    let second = DecoratorUtils::new(&ctx, &config, &keepers, &keepers).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.base_fee, Some(U256::from(GWEI)));
    assert_eq!(first.min_priority, i64::MAX);
    assert!(first.rules.is_london);
}

#[test]
fn test_nonce_mismatch_keeps_sequence() {
    let sender = signer(1).address();
    let keepers = MemoryKeepers::default().fund(sender, 1, U256::from(ETHER));
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);

    assert_eq!(
        handle(&decorator, deliver_ctx(), &tx, false).unwrap_err(),
        AnteError::InvalidNonce { got: 0, expected: 1 }
    );
    assert_eq!(keepers.account(sender).unwrap().sequence, 1);
}

#[test]
fn test_mempool_fee_only_in_check_tx() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, pre_london(), 0);
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), TxLegacy { gas_price: 10, ..legacy_tx() })]);
    let min_gas_prices = DecCoins::from_iter([DecCoin::new(DENOM, 20u64.into())]);
    let check_ctx = deliver_ctx().with_is_check_tx(true).with_min_gas_prices(min_gas_prices);

    let err = handle(&decorator, check_ctx.clone(), &tx, false).unwrap_err();
    assert!(matches!(err, AnteError::InsufficientMempoolFee { .. }), "{err:?}");
    assert!(err.is_insufficient_fee());

    handle(&decorator, check_ctx, &tx, true).unwrap();
}

#[test]
fn test_mempool_fee_not_enforced_in_deliver_tx() {
    let (keepers, sender) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, pre_london(), 0);
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), TxLegacy { gas_price: 10, ..legacy_tx() })]);
    let min_gas_prices = DecCoins::from_iter([DecCoin::new(DENOM, 20u64.into())]);

    let ctx = handle(&decorator, deliver_ctx().with_min_gas_prices(min_gas_prices), &tx, false)
        .unwrap();
    // no base fee before London: the whole gas price is the tip
    assert_eq!(ctx.priority(), 0);
    assert_eq!(keepers.balance(sender, DENOM), U256::from(ETHER - 210_000));
}

#[test]
fn test_six_decimal_coin() {
    let coin_info =
        EvmCoinInfo { denom: "uatom".into(), extended_denom: "aatom".into(), decimals: 6 };
    let sender = signer(1).address();
    // 100 uatom covers the 8.4e13 fee only once scaled to 18 decimals
    let keepers = MemoryKeepers::default().with_coin_info(coin_info.clone()).fund(
        sender,
        0,
        U256::from(100u64),
    );
    let decorator = decorator(&keepers, pre_london().with_coin_info(coin_info), 0);
    let min_gas_prices = DecCoins::from_iter([DecCoin::new("uatom", "0.003".parse().unwrap())]);
    let check_ctx = deliver_ctx().with_is_check_tx(true).with_min_gas_prices(min_gas_prices);

    let legacy = |gas_price: u128| {
        let msg = ethereum_msg(&signer(1), TxLegacy { gas_price, ..legacy_tx() });
        let mut tx = ethereum_tx(vec![msg]);
        let fee = U256::from(gas_price * 21_000);
        tx.auth_info.fee.amount = Coins::single(Coin::new("uatom", fee));
        tx
    };

    // 0.003 uatom per gas is 3 gwei per gas with 18 decimals
    let err = handle(&decorator, check_ctx.clone(), &legacy(2 * GWEI), false).unwrap_err();
    assert!(matches!(err, AnteError::InsufficientMempoolFee { .. }), "{err:?}");
    assert_eq!(keepers.account(sender).unwrap().sequence, 0);

    handle(&decorator, check_ctx, &legacy(4 * GWEI), false).unwrap();
    // 8.4e13 with 18 decimals is 84 uatom
    assert_eq!(keepers.balance(sender, "uatom"), U256::from(16u64));
    assert_eq!(keepers.balance(FEE_COLLECTOR_ADDRESS, "uatom"), U256::from(84u64));
    assert_eq!(keepers.account(sender).unwrap().sequence, 1);
}

#[test]
fn test_unprotected_txs() {
    let unprotected = TxLegacy { chain_id: None, ..legacy_tx() };

    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), unprotected.clone())]);
    assert_eq!(
        handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
            .unwrap_err(),
        AnteError::UnprotectedTx
    );

    let keepers = funded(MemoryKeepers::default(), 1)
        .0
        .with_evm_params(EvmParams { allow_unprotected_txs: true, ..Default::default() });
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), unprotected)]);
    handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false).unwrap();
}

#[test]
fn test_wrong_chain_id() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let other_chain = TxEip1559 { chain_id: 1, ..dynamic_fee_tx() };
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), other_chain)]);
    assert_eq!(
        handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
            .unwrap_err(),
        AnteError::InvalidChainId { expected: CHAIN_ID, got: 1 }
    );
}

#[test]
fn test_populated_from_is_rejected() {
    let (keepers, sender) = funded(MemoryKeepers::default(), 1);
    let msg = ethereum_msg(&signer(1), dynamic_fee_tx()).with_from(sender);
    let tx = ethereum_tx(vec![msg]);
    assert_eq!(
        handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
            .unwrap_err(),
        AnteError::InvalidFrom { from: sender }
    );
}

#[test]
fn test_insufficient_balance_creates_account() {
    let keepers = MemoryKeepers::default();
    let sender = signer(1).address();
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);

    let err = handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
        .unwrap_err();
    assert!(matches!(err, AnteError::InsufficientBalance { balance, .. } if balance.is_zero()));
    assert_eq!(keepers.account(sender).unwrap().sequence, 0);
    assert!(keepers.balance(FEE_COLLECTOR_ADDRESS, DENOM).is_zero());
}

#[test]
fn test_sender_with_code_is_rejected() {
    let (keepers, sender) = funded(MemoryKeepers::default(), 1);
    let keepers = keepers.with_code_hash(sender, B256::repeat_byte(0xc0));
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);
    assert_eq!(
        handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
            .unwrap_err(),
        AnteError::SenderNotEoa { address: sender }
    );
}

#[test]
fn test_value_above_balance_is_rejected() {
    let sender = signer(1).address();
    let keepers = MemoryKeepers::default().fund(sender, 0, U256::from(ETHER));
    let tx = ethereum_tx(vec![ethereum_msg(
        &signer(1),
        TxEip1559 { value: U256::from(ETHER), ..dynamic_fee_tx() },
    )]);
    let err = handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
        .unwrap_err();
    assert!(matches!(err, AnteError::InsufficientBalance { .. }), "{err:?}");
}

#[test]
fn test_fee_cap_below_base_fee() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let keepers = keepers.with_base_fee(Some(U256::from(3 * GWEI)));
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);
    let err = handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
        .unwrap_err();
    assert_eq!(
        err,
        AnteError::MaxFeeBelowBaseFee {
            fee_cap: U256::from(2 * GWEI),
            base_fee: U256::from(3 * GWEI)
        }
    );
}

#[test]
fn test_contract_creation_disabled() {
    let params = EvmParams {
        access_control: AccessControl {
            create: AccessControlType { access_type: AccessType::Restricted, ..Default::default() },
            ..Default::default()
        },
        ..Default::default()
    };
    let (keepers, _) = funded(MemoryKeepers::default().with_evm_params(params), 1);
    let create = TxEip1559 { to: TxKind::Create, gas_limit: 100_000, ..dynamic_fee_tx() };
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), create)]);
    assert_eq!(
        handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
            .unwrap_err(),
        AnteError::CreateDisabled
    );
}

#[test]
fn test_gas_limit_below_intrinsic_gas_in_check_tx() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let tx = ethereum_tx(vec![ethereum_msg(
        &signer(1),
        TxEip1559 { gas_limit: 20_000, ..dynamic_fee_tx() },
    )]);
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    assert_eq!(
        handle(&decorator, deliver_ctx().with_is_check_tx(true), &tx, false).unwrap_err(),
        AnteError::GasLimitTooLow { gas_limit: 20_000, intrinsic_gas: 21_000 }
    );
}

#[test]
fn test_declared_envelope_must_match() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let mut tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);
    tx.auth_info.fee.gas_limit += 1;

    assert_eq!(
        handle(&decorator, deliver_ctx(), &tx, false).unwrap_err(),
        AnteError::InvalidTxGasLimit { declared: 21_001, computed: 21_000 }
    );
}

#[test]
fn test_declared_fee_with_extra_denom() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let mut tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);
    let declared = tx.auth_info.fee.amount.clone();
    tx.auth_info.fee.amount =
        declared.clone().checked_add_coin(Coin::new("uatom", U256::from(999u64))).unwrap();

    let err = handle(&decorator, deliver_ctx(), &tx, false).unwrap_err();
    assert_eq!(
        err,
        AnteError::InvalidTxFee { declared: tx.auth_info.fee.amount.clone(), computed: declared }
    );
}

#[test]
fn test_recheck_skips_envelope_checks() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let mut tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);
    tx.auth_info.fee.gas_limit += 1;
    tx.body.memo = "ignored on re-check".to_string();

    handle(&decorator, deliver_ctx().with_is_recheck_tx(true), &tx, false).unwrap();
}

#[test]
fn test_empty_tx_rejected_on_recheck() {
    let keepers = MemoryKeepers::default();
    let decorator = decorator(&keepers, EvmConfig::default(), 0);
    let tx = ethereum_tx(vec![]);

    for ctx in [deliver_ctx(), deliver_ctx().with_is_recheck_tx(true)] {
        assert_eq!(handle(&decorator, ctx, &tx, false).unwrap_err(), AnteError::EmptyTx);
    }
    assert_eq!(keepers.transient_gas_wanted(), 0);
}

#[test]
fn test_native_message_in_ethereum_tx() {
    let (keepers, sender) = funded(MemoryKeepers::default(), 1);
    let mut tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);
    let send = MsgSend { from_address: sender, to_address: RECIPIENT, amount: Coins::new() };
    tx.body.messages.push(Msg::Native(NativeMsg::Send(send)));

    let err = handle(&decorator(&keepers, EvmConfig::default(), 0), deliver_ctx(), &tx, false)
        .unwrap_err();
    assert!(matches!(err, AnteError::InvalidMessageType { index: 1, .. }), "{err:?}");
}

#[test]
fn test_block_gas_limit() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);
    let ctx = deliver_ctx().with_consensus_params(ConsensusParams {
        block: Some(BlockParams { max_gas: 20_000, max_bytes: 1 << 20 }),
    });
    assert_eq!(
        handle(&decorator(&keepers, EvmConfig::default(), 0), ctx, &tx, false).unwrap_err(),
        AnteError::BlockGasLimitExceeded { gas_wanted: 21_000, block_gas_limit: 20_000 }
    );
}

#[test]
fn test_max_tx_gas_wanted_caps_check_tx() {
    let (keepers, _) = funded(MemoryKeepers::default(), 1);
    let decorator = decorator(&keepers, EvmConfig::default(), 10_000);
    let tx = ethereum_tx(vec![ethereum_msg(&signer(1), dynamic_fee_tx())]);

    let ctx = handle(&decorator, deliver_ctx().with_is_check_tx(true), &tx, false).unwrap();
    assert_eq!(ctx.gas_meter().limit(), 10_000);
}

#[test]
fn test_fee_deduction_is_atomic() {
    let sender = Address::repeat_byte(7);
    let keepers = MemoryKeepers::default().fund(sender, 0, U256::from(100));
    let mut ctx = deliver_ctx();

    let fees = Coins::single(Coin::new(DENOM, U256::from(101)));
    let err = consume_fees_and_emit_event(&mut ctx, &keepers, &fees, sender).unwrap_err();
    assert!(matches!(
        err,
        AnteError::DeductTxCosts { source: KeeperError::InsufficientFunds { .. } }
    ));
    assert_eq!(keepers.balance(sender, DENOM), U256::from(100));
    assert!(ctx.events().is_empty());

    let fees = Coins::single(Coin::new(DENOM, U256::from(60)));
    consume_fees_and_emit_event(&mut ctx, &keepers, &fees, sender).unwrap();
    assert_eq!(keepers.balance(sender, DENOM), U256::from(40));
    assert_eq!(ctx.events().len(), 1);
    assert_eq!(ctx.events()[0].attribute(ATTRIBUTE_KEY_FEE), Some("60aevmos"));
}
