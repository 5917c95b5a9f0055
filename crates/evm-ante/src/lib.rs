//! Transaction admission ("ante handling") for an EVM module running on a Cosmos-style chain.
//!
//! The entry point for Ethereum transactions is the [`MonoDecorator`], a single decorator that
//! runs every pre-execution check of the wrapped Ethereum messages in one pass. Native
//! transactions go through a chain of smaller decorators (see [`ante::cosmos`]). Both are
//! wired behind [`new_ante_handler`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod error;
pub use error::*;

mod types;
pub use types::*;

mod config;
pub use config::*;

mod context;
pub use context::*;

mod tx;
pub use tx::*;

mod keeper;
pub use keeper::*;

mod wrappers;
pub use wrappers::*;

pub mod ante;
pub use ante::{
    evm::{DecoratorUtils, MonoDecorator},
    new_ante_handler, AnteChain, AnteDecorator, AnteHandler, AnteResult, AnteRouter,
    HandlerOptions,
};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
