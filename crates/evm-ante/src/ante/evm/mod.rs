//! Admission of Ethereum transactions.
//!
//! The checks are plain functions so they can be reused and tested on their own; the
//! [`MonoDecorator`] strings them together.

mod account;
mod consume;
mod fee;
mod gas_wanted;
mod mono;
mod priority;
mod setup;
mod signature;
mod utils;
mod validate;

pub use account::*;
pub use consume::*;
pub use fee::*;
pub use gas_wanted::*;
pub use mono::*;
pub use priority::*;
pub use setup::*;
pub use signature::*;
pub use utils::*;
pub use validate::*;
