//! Ante decorators of native (non-Ethereum) transactions.
//!
//! [`crate::new_ante_handler`] chains them in this order: [`RejectMessagesDecorator`],
//! [`AuthzLimiterDecorator`], [`MinGasPriceDecorator`], [`DeductFeeDecorator`],
//! [`SigVerificationDecorator`], [`IncrementSequenceDecorator`], [`GasWantedDecorator`].

mod authz;
mod deduct_fee;
mod fee_checker;
mod gas_wanted;
mod min_gas_price;
mod reject;
mod sig_verify;

pub use authz::*;
pub use deduct_fee::*;
pub use fee_checker::*;
pub use gas_wanted::*;
pub use min_gas_price::*;
pub use reject::*;
pub use sig_verify::*;
