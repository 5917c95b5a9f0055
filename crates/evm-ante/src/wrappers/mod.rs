//! Adapters over the keepers.

mod bank;

pub use bank::*;
