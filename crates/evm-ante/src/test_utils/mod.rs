//! Test utilities for the ante handlers.

mod keepers;
mod tx;

pub use keepers::*;
pub use tx::*;
