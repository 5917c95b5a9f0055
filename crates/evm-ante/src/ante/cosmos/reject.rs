use crate::{
    ante::{AnteDecorator, AnteHandler, AnteResult},
    AnteError, Context, Msg, Tx,
};

/// Rejects Ethereum messages in transactions without the Ethereum extension option.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectMessagesDecorator;

impl AnteDecorator for RejectMessagesDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        if tx.msgs().iter().any(|msg| matches!(msg, Msg::Ethereum(_))) {
            return Err(AnteError::EthereumMsgInNativeTx);
        }
        next.handle(ctx, tx, simulate)
    }
}
