//! Value types shared by the keepers and the ante handlers.

mod account;
mod coin;
mod dec;
mod event;
mod params;

pub use account::*;
pub use coin::*;
pub use dec::*;
pub use event::*;
pub use params::*;
