//! Static configuration of the EVM module, built once at start-up.

mod chain;
mod coin_info;

pub use chain::*;
pub use coin_info::*;

/// Error returned by [`EvmConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The coin decimals are outside `1..=18`.
    #[error("invalid coin decimals: decimals={decimals}, expected 1..=18")]
    InvalidDecimals {
        /// Configured decimals.
        decimals: u8,
    },
    /// An 18-decimal coin declares an extended denomination different from its denomination.
    #[error("extended denom {extended_denom} must equal denom {denom} for 18-decimal coins")]
    InvalidExtendedDenom {
        /// Bank denomination.
        denom: String,
        /// Extended denomination.
        extended_denom: String,
    },
    /// The chain id is zero.
    #[error("chain id cannot be zero")]
    ZeroChainId,
}

/// Configuration shared by every decorator: the Ethereum chain configuration and the EVM coin.
///
/// ```
/// use evm_ante::{ChainConfig, EvmCoinInfo, EvmConfig};
///
/// let config = EvmConfig::default()
///     .with_chain_config(ChainConfig::default().with_chain_id(262_144))
///     .with_coin_info(EvmCoinInfo::eighteen_decimals("atest"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvmConfig {
    /// Ethereum chain configuration.
    pub chain_config: ChainConfig,
    /// Coin used to pay for gas.
    pub coin_info: EvmCoinInfo,
}

impl EvmConfig {
    /// Sets the chain configuration.
    pub fn with_chain_config(mut self, chain_config: ChainConfig) -> Self {
        self.chain_config = chain_config;
        self
    }

    /// Sets the coin info.
    pub fn with_coin_info(mut self, coin_info: EvmCoinInfo) -> Self {
        self.coin_info = coin_info;
        self
    }

    /// Denomination used for EVM fees.
    pub fn evm_denom(&self) -> &str {
        &self.coin_info.denom
    }

    /// Checks the configuration is consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let info = &self.coin_info;
        if info.decimals == 0 || info.decimals > crate::constants::EVM_DECIMALS {
            return Err(ConfigError::InvalidDecimals { decimals: info.decimals });
        }
        if info.decimals == crate::constants::EVM_DECIMALS && info.denom != info.extended_denom {
            return Err(ConfigError::InvalidExtendedDenom {
                denom: info.denom.clone(),
                extended_denom: info.extended_denom.clone(),
            });
        }
        if self.chain_config.chain_id == 0 {
            return Err(ConfigError::ZeroChainId);
        }
        Ok(())
    }
}
