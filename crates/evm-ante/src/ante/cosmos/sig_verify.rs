use alloy_primitives::Address;
use tracing::trace;

use crate::{
    ante::{AnteDecorator, AnteHandler, AnteResult},
    AccountKeeper, AnteError, BaseAccount, Context, SignDoc, Tx,
};

fn signer_accounts<AK: AccountKeeper>(
    ctx: &Context,
    account_keeper: &AK,
    signers: &[Address],
) -> AnteResult<Vec<BaseAccount>> {
    signers
        .iter()
        .map(|&address| {
            account_keeper.get_account(ctx, address).ok_or(AnteError::UnknownAccount { address })
        })
        .collect()
}

/// Verifies the signatures of a native transaction.
///
/// Each signer signs the keccak-256 hash of its [`SignDoc`] and declares its current account
/// sequence. Signatures are not verified when simulating; the whole check is skipped on
/// re-check-tx.
#[derive(Debug, Clone)]
pub struct SigVerificationDecorator<AK> {
    account_keeper: AK,
}

impl<AK> SigVerificationDecorator<AK> {
    /// Creates the decorator.
    pub fn new(account_keeper: AK) -> Self {
        Self { account_keeper }
    }
}

impl<AK: AccountKeeper> AnteDecorator for SigVerificationDecorator<AK> {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        if ctx.is_recheck_tx() {
            return next.handle(ctx, tx, simulate);
        }

        let signers = tx.signers();
        if tx.signatures.len() != signers.len() {
            return Err(AnteError::SignerCountMismatch {
                expected: signers.len(),
                got: tx.signatures.len(),
            });
        }
        let signer_infos = &tx.auth_info.signer_infos;
        if signer_infos.len() != signers.len() {
            return Err(AnteError::SignerCountMismatch {
                expected: signers.len(),
                got: signer_infos.len(),
            });
        }

        let accounts = signer_accounts(&ctx, &self.account_keeper, &signers)?;
        for ((account, signature), info) in accounts.iter().zip(&tx.signatures).zip(signer_infos) {
            if info.sequence != account.sequence {
                return Err(AnteError::InvalidSequence {
                    got: info.sequence,
                    expected: account.sequence,
                });
            }
            if simulate {
                continue;
            }

            let sign_doc = SignDoc {
                chain_id: ctx.chain_id(),
                account_number: account.account_number,
                sequence: account.sequence,
                body: &tx.body,
                fee: tx.fee(),
            };
            let signer = account.address;
            let recovered = sign_doc
                .signing_hash()
                .ok()
                .and_then(|hash| signature.recover_address_from_prehash(&hash).ok());
            if recovered != Some(signer) {
                return Err(AnteError::SignatureVerificationFailed { signer });
            }
            trace!(target: "evm_ante::sig_verify", %signer, "Verified signature");
        }

        next.handle(ctx, tx, simulate)
    }
}

/// Increments the sequence of every signer of a native transaction.
#[derive(Debug, Clone)]
pub struct IncrementSequenceDecorator<AK> {
    account_keeper: AK,
}

impl<AK> IncrementSequenceDecorator<AK> {
    /// Creates the decorator.
    pub fn new(account_keeper: AK) -> Self {
        Self { account_keeper }
    }
}

impl<AK: AccountKeeper> AnteDecorator for IncrementSequenceDecorator<AK> {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        for mut account in signer_accounts(&ctx, &self.account_keeper, &tx.signers())? {
            account.sequence = account
                .sequence
                .checked_add(1)
                .ok_or(AnteError::NonceOverflow { address: account.address })?;
            self.account_keeper.set_account(&ctx, account);
        }
        next.handle(ctx, tx, simulate)
    }
}
