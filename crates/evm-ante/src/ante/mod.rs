//! Ante handlers: the decorator abstraction, the decorator chains and the top-level router.

use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
    AccountKeeper, AnteError, BankKeeper, Context, EvmConfig, EvmKeeper, ExtensionOption,
    FeeMarketKeeper, Tx,
};

pub mod cosmos;
pub mod evm;

/// Result of an ante handler: the context to run the transaction with.
pub type AnteResult<T = Context> = Result<T, AnteError>;

/// Handles a transaction before execution.
pub trait AnteHandler {
    /// Validates `tx` and returns the context to execute it with.
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> AnteResult;
}

impl<F> AnteHandler for F
where
    F: Fn(Context, &Tx, bool) -> AnteResult,
{
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> AnteResult {
        self(ctx, tx, simulate)
    }
}

/// One stage of an ante chain.
///
/// A decorator either rejects the transaction or calls `next` with the (possibly updated)
/// context.
pub trait AnteDecorator {
    /// Runs the stage.
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult;
}

/// An ordered list of decorators ending with a handler that returns the context unchanged.
pub struct AnteChain<'a> {
    decorators: Vec<Box<dyn AnteDecorator + 'a>>,
}

impl<'a> AnteChain<'a> {
    /// An empty chain.
    pub fn new() -> Self {
        Self { decorators: Vec::new() }
    }

    /// Appends a decorator.
    pub fn with(mut self, decorator: impl AnteDecorator + 'a) -> Self {
        self.decorators.push(Box::new(decorator));
        self
    }

    /// Number of decorators.
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    /// Whether the chain has no decorator.
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl Default for AnteChain<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnteChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnteChain").field("decorators", &self.decorators.len()).finish()
    }
}

impl AnteHandler for AnteChain<'_> {
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> AnteResult {
        Link(&self.decorators).handle(ctx, tx, simulate)
    }
}

/// The remainder of a chain, handed to a decorator as its `next`.
struct Link<'c, 'a>(&'c [Box<dyn AnteDecorator + 'a>]);

impl AnteHandler for Link<'_, '_> {
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> AnteResult {
        match self.0.split_first() {
            Some((decorator, rest)) => decorator.ante_handle(ctx, tx, simulate, &Link(rest)),
            None => Ok(ctx),
        }
    }
}

/// Everything needed to build the top-level ante handler.
#[derive(Debug, Clone)]
pub struct HandlerOptions<AK, BK, EK, FK> {
    /// Native account storage.
    pub account_keeper: AK,
    /// Native balances.
    pub bank_keeper: BK,
    /// EVM module state.
    pub evm_keeper: EK,
    /// Fee market module state.
    pub fee_market_keeper: FK,
    /// Shared static configuration.
    pub config: Arc<EvmConfig>,
    /// Per-transaction cap on gas wanted during check-tx, `0` for no cap.
    pub max_tx_gas_wanted: u64,
    /// Message type URLs rejected inside authz messages.
    pub authz_disabled_msgs: Vec<String>,
}

impl<AK, BK, EK, FK> HandlerOptions<AK, BK, EK, FK> {
    /// Options without gas wanted cap nor authz restrictions.
    pub fn new(
        account_keeper: AK,
        bank_keeper: BK,
        evm_keeper: EK,
        fee_market_keeper: FK,
        config: impl Into<Arc<EvmConfig>>,
    ) -> Self {
        Self {
            account_keeper,
            bank_keeper,
            evm_keeper,
            fee_market_keeper,
            config: config.into(),
            max_tx_gas_wanted: 0,
            authz_disabled_msgs: Vec::new(),
        }
    }

    /// Sets the per-transaction gas wanted cap applied during check-tx.
    pub fn with_max_tx_gas_wanted(mut self, max_tx_gas_wanted: u64) -> Self {
        self.max_tx_gas_wanted = max_tx_gas_wanted;
        self
    }

    /// Sets the message type URLs rejected inside authz messages.
    pub fn with_authz_disabled_msgs(mut self, msgs: Vec<String>) -> Self {
        self.authz_disabled_msgs = msgs;
        self
    }
}

/// Routes a transaction to the Ethereum or native chain according to its first extension
/// option.
#[derive(Debug)]
pub struct AnteRouter<'a> {
    evm: AnteChain<'a>,
    native: AnteChain<'a>,
}

impl AnteHandler for AnteRouter<'_> {
    fn handle(&self, ctx: Context, tx: &Tx, simulate: bool) -> AnteResult {
        let result = match tx.body.extension_options.first() {
            Some(ExtensionOption::EthereumTx) => self.evm.handle(ctx, tx, simulate),
            Some(ExtensionOption::DynamicFeeTx { .. }) | None => {
                self.native.handle(ctx, tx, simulate)
            }
            Some(ExtensionOption::Other { type_url }) => {
                Err(AnteError::UnknownExtensionOption { type_url: type_url.clone() })
            }
        };
        if let Err(err) = &result {
            debug!(
                target: "evm_ante::router",
                %err,
                codespace = err.codespace(),
                code = err.code(),
                "Transaction rejected"
            );
        }
        result
    }
}

/// Builds the top-level ante handler: Ethereum transactions go through the
/// [`evm::MonoDecorator`], native transactions through the [`cosmos`] decorator chain.
pub fn new_ante_handler<'a, AK, BK, EK, FK>(
    options: HandlerOptions<AK, BK, EK, FK>,
) -> AnteRouter<'a>
where
    AK: AccountKeeper + Clone + 'a,
    BK: BankKeeper + Clone + 'a,
    EK: EvmKeeper + Clone + 'a,
    FK: FeeMarketKeeper + Clone + 'a,
{
    let HandlerOptions {
        account_keeper,
        bank_keeper,
        evm_keeper,
        fee_market_keeper,
        config,
        max_tx_gas_wanted,
        authz_disabled_msgs,
    } = options;

    let evm = AnteChain::new().with(evm::MonoDecorator::new(
        account_keeper.clone(),
        evm_keeper.clone(),
        fee_market_keeper.clone(),
        config.clone(),
        max_tx_gas_wanted,
    ));

    let native = AnteChain::new()
        .with(cosmos::RejectMessagesDecorator)
        .with(cosmos::AuthzLimiterDecorator::new(authz_disabled_msgs))
        .with(cosmos::MinGasPriceDecorator::new(fee_market_keeper.clone(), config.clone()))
        .with(cosmos::DeductFeeDecorator::new(
            account_keeper.clone(),
            bank_keeper,
            cosmos::DynamicFeeChecker::new(evm_keeper, config.clone()),
        ))
        .with(cosmos::SigVerificationDecorator::new(account_keeper.clone()))
        .with(cosmos::IncrementSequenceDecorator::new(account_keeper))
        .with(cosmos::GasWantedDecorator::new(fee_market_keeper, config));

    AnteRouter { evm, native }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recorder<'a> {
        name: &'static str,
        log: &'a RefCell<Vec<&'static str>>,
    }

    impl AnteDecorator for Recorder<'_> {
        fn ante_handle(
            &self,
            ctx: Context,
            tx: &Tx,
            simulate: bool,
            next: &dyn AnteHandler,
        ) -> AnteResult {
            self.log.borrow_mut().push(self.name);
            let priority = ctx.priority() + 1;
            next.handle(ctx.with_priority(priority), tx, simulate)
        }
    }

    struct Reject;

    impl AnteDecorator for Reject {
        fn ante_handle(&self, _: Context, _: &Tx, _: bool, _: &dyn AnteHandler) -> AnteResult {
            Err(AnteError::EmptyTx)
        }
    }

    #[test]
    fn test_chain_runs_in_order() {
        let log = RefCell::new(Vec::new());
        let chain = AnteChain::new()
            .with(Recorder { name: "first", log: &log })
            .with(Recorder { name: "second", log: &log });
        let ctx = chain.handle(Context::default(), &Tx::default(), false).unwrap();
        assert_eq!(ctx.priority(), 2);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_chain_stops_on_error() {
        let log = RefCell::new(Vec::new());
        let chain = AnteChain::new()
            .with(Reject)
            .with(Recorder { name: "unreachable", log: &log });
        assert_eq!(
            chain.handle(Context::default(), &Tx::default(), false).unwrap_err(),
            AnteError::EmptyTx
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_closure_handler() {
        let handler = |ctx: Context, _: &Tx, _: bool| -> AnteResult { Ok(ctx.with_priority(7)) };
        let ctx = handler.handle(Context::default(), &Tx::default(), false).unwrap();
        assert_eq!(ctx.priority(), 7);
    }
}
