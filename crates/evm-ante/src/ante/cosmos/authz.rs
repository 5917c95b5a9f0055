use crate::{
    ante::{AnteDecorator, AnteHandler, AnteResult},
    constants::MAX_NESTED_MSGS,
    AnteError, Context, Msg, NativeMsg, Tx,
};

/// Rejects disabled message types executed or granted through authz.
///
/// Disabled types are allowed at the top level of a transaction: only messages nested in a
/// `MsgExec` and authorizations granted by a `MsgGrant` are checked. `MsgExec` nesting is limited
/// to [`MAX_NESTED_MSGS`] levels.
#[derive(Clone, Debug, Default)]
pub struct AuthzLimiterDecorator {
    disabled_msgs: Vec<String>,
}

impl AuthzLimiterDecorator {
    /// Creates the decorator rejecting the given message type URLs.
    pub fn new(disabled_msgs: Vec<String>) -> Self {
        Self { disabled_msgs }
    }

    fn is_disabled(&self, type_url: &str) -> bool {
        self.disabled_msgs.iter().any(|disabled| disabled == type_url)
    }

    fn check_disabled_msgs(
        &self,
        msgs: &[Msg],
        is_authz_inner: bool,
        nested_level: usize,
    ) -> Result<(), String> {
        if nested_level >= MAX_NESTED_MSGS {
            return Err(format!(
                "found more nested msgs than permitted. Limit is : {MAX_NESTED_MSGS}"
            ));
        }
        for msg in msgs {
            match msg {
                Msg::Native(NativeMsg::Exec(exec)) => {
                    self.check_disabled_msgs(&exec.msgs, true, nested_level + 1)?;
                }
                Msg::Native(NativeMsg::Grant(grant)) => {
                    if self.is_disabled(&grant.msg_type_url) {
                        return Err(format!("found disabled msg type: {}", grant.msg_type_url));
                    }
                }
                msg if is_authz_inner && self.is_disabled(msg.type_url()) => {
                    return Err(format!("found disabled msg type: {}", msg.type_url()));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl AnteDecorator for AuthzLimiterDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &Tx,
        simulate: bool,
        next: &dyn AnteHandler,
    ) -> AnteResult {
        self.check_disabled_msgs(tx.msgs(), false, 0).map_err(AnteError::Unauthorized)?;
        next.handle(ctx, tx, simulate)
    }
}
