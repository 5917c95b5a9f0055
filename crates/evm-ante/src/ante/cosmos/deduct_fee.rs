use tracing::trace;

use crate::{
    ante::{AnteDecorator, AnteHandler, AnteResult},
    constants::{
        events::{ATTRIBUTE_KEY_FEE, ATTRIBUTE_KEY_FEE_PAYER, TYPE_TX},
        FEE_COLLECTOR_NAME,
    },
    AccountKeeper, AnteError, BankKeeper, Context, Event, KeeperError, Tx,
};

use super::TxFeeChecker;

/// Charges the fee of a native transaction to its fee payer and sets its priority.
///
/// The fee and priority come from the [`TxFeeChecker`], except when simulating where the
/// declared fee is charged with zero priority. The fee moves to the fee collector module account
/// and a `tx` event records it.
#[derive(Debug, Clone)]
pub struct DeductFeeDecorator<AK, BK, FC> {
    account_keeper: AK,
    bank_keeper: BK,
    fee_checker: FC,
}

impl<AK, BK, FC> DeductFeeDecorator<AK, BK, FC> {
    /// Creates the decorator.
    pub fn new(account_keeper: AK, bank_keeper: BK, fee_checker: FC) -> Self {
        Self { account_keeper, bank_keeper, fee_checker }
    }
}

impl<AK, BK, FC> AnteDecorator for DeductFeeDecorator<AK, BK, FC>
where
    AK: AccountKeeper,
    BK: BankKeeper,
    FC: TxFeeChecker,
{
    fn ante_handle(
        &self,
        mut ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        if !simulate && ctx.block_height() > 0 && tx.gas() == 0 {
            return Err(AnteError::ZeroGas);
        }

        let (fee, priority) = if simulate {
            (tx.fee().amount.clone(), 0)
        } else {
            self.fee_checker.check_tx_fee(&ctx, tx)?
        };

        if self.account_keeper.get_module_address(FEE_COLLECTOR_NAME).is_none() {
            return Err(KeeperError::UnknownModule(FEE_COLLECTOR_NAME.to_string()).into());
        }
        if tx.fee().granter.is_some() {
            return Err(AnteError::Unauthorized("fee grants are not enabled".to_string()));
        }
        let fee_payer = tx.fee_payer().ok_or(AnteError::EmptyTx)?;
        if self.account_keeper.get_account(&ctx, fee_payer).is_none() {
            return Err(AnteError::UnknownAccount { address: fee_payer });
        }

        if !fee.is_zero() {
            self.bank_keeper
                .send_coins_from_account_to_module(&ctx, fee_payer, FEE_COLLECTOR_NAME, &fee)
                .map_err(|source| AnteError::DeductFees { source })?;
            trace!(target: "evm_ante::deduct_fee", %fee_payer, %fee, "Deducted fee");
        }
        ctx.emit_event(
            Event::new(TYPE_TX)
                .with_attribute(ATTRIBUTE_KEY_FEE, fee.to_string())
                .with_attribute(ATTRIBUTE_KEY_FEE_PAYER, fee_payer.to_string()),
        );

        next.handle(ctx.with_priority(priority), tx, simulate)
    }
}
