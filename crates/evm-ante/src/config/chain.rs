use alloy_hardforks::{EthereumHardfork, EthereumHardforks, ForkCondition};
use alloy_primitives::ChainId;
use revm::primitives::hardfork::SpecId;
use serde::{Deserialize, Serialize};

/// Chain id used by [`ChainConfig::default`].
pub const DEFAULT_EVM_CHAIN_ID: ChainId = 9001;

/// Ethereum chain configuration of the EVM module: the EIP-155 chain id and the block heights
/// at which each Ethereum fork activates. A `None` height means the fork never activates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// EIP-155 chain id.
    pub chain_id: ChainId,
    /// Homestead activation height.
    pub homestead_block: Option<u64>,
    /// DAO fork activation height.
    pub dao_fork_block: Option<u64>,
    /// EIP-150 (Tangerine Whistle) activation height.
    pub eip150_block: Option<u64>,
    /// EIP-155 (Spurious Dragon) activation height.
    pub eip155_block: Option<u64>,
    /// EIP-158 activation height.
    pub eip158_block: Option<u64>,
    /// Byzantium activation height.
    pub byzantium_block: Option<u64>,
    /// Constantinople activation height.
    pub constantinople_block: Option<u64>,
    /// Petersburg activation height.
    pub petersburg_block: Option<u64>,
    /// Istanbul activation height.
    pub istanbul_block: Option<u64>,
    /// Muir Glacier activation height.
    pub muir_glacier_block: Option<u64>,
    /// Berlin activation height.
    pub berlin_block: Option<u64>,
    /// London activation height.
    pub london_block: Option<u64>,
    /// Arrow Glacier activation height.
    pub arrow_glacier_block: Option<u64>,
    /// Gray Glacier activation height.
    pub gray_glacier_block: Option<u64>,
    /// Merge netsplit activation height.
    pub merge_netsplit_block: Option<u64>,
    /// Shanghai activation height.
    pub shanghai_block: Option<u64>,
    /// Cancun activation height.
    pub cancun_block: Option<u64>,
    /// Prague activation height.
    pub prague_block: Option<u64>,
}

impl Default for ChainConfig {
    /// Every fork up to Cancun active from genesis, Prague disabled.
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_EVM_CHAIN_ID,
            homestead_block: Some(0),
            dao_fork_block: Some(0),
            eip150_block: Some(0),
            eip155_block: Some(0),
            eip158_block: Some(0),
            byzantium_block: Some(0),
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            istanbul_block: Some(0),
            muir_glacier_block: Some(0),
            berlin_block: Some(0),
            london_block: Some(0),
            arrow_glacier_block: Some(0),
            gray_glacier_block: Some(0),
            merge_netsplit_block: Some(0),
            shanghai_block: Some(0),
            cancun_block: Some(0),
            prague_block: None,
        }
    }
}

impl ChainConfig {
    /// A configuration with the given chain id and no fork active (frontier rules).
    pub fn frontier(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            homestead_block: None,
            dao_fork_block: None,
            eip150_block: None,
            eip155_block: None,
            eip158_block: None,
            byzantium_block: None,
            constantinople_block: None,
            petersburg_block: None,
            istanbul_block: None,
            muir_glacier_block: None,
            berlin_block: None,
            london_block: None,
            arrow_glacier_block: None,
            gray_glacier_block: None,
            merge_netsplit_block: None,
            shanghai_block: None,
            cancun_block: None,
            prague_block: None,
        }
    }

    /// Sets the chain id.
    pub fn with_chain_id(mut self, chain_id: ChainId) -> Self {
        self.chain_id = chain_id;
        self
    }

    /// Sets the London activation height. `None` disables London and every later fork.
    pub fn with_london_block(mut self, height: Option<u64>) -> Self {
        self.london_block = height;
        if height.is_none() {
            self.arrow_glacier_block = None;
            self.gray_glacier_block = None;
            self.merge_netsplit_block = None;
            self.shanghai_block = None;
            self.cancun_block = None;
            self.prague_block = None;
        }
        self
    }

    /// Sets the Berlin activation height.
    pub fn with_berlin_block(mut self, height: Option<u64>) -> Self {
        self.berlin_block = height;
        self
    }

    /// Sets the EIP-155 activation height.
    pub fn with_eip155_block(mut self, height: Option<u64>) -> Self {
        self.eip155_block = height;
        self
    }

    /// Whether `fork` is active at block `height`.
    pub fn is_active_at(&self, fork: EthereumHardfork, height: u64) -> bool {
        self.ethereum_fork_activation(fork).active_at_block(height)
    }

    /// Whether London is active at block `height`.
    pub fn is_london(&self, height: u64) -> bool {
        self.is_active_at(EthereumHardfork::London, height)
    }

    /// Computes the fork rules in effect at block `height`.
    pub fn rules(&self, height: u64) -> Rules {
        Rules {
            chain_id: self.chain_id,
            is_homestead: self.is_active_at(EthereumHardfork::Homestead, height),
            is_eip150: self.is_active_at(EthereumHardfork::Tangerine, height),
            is_eip155: self.is_active_at(EthereumHardfork::SpuriousDragon, height),
            is_eip158: self.eip158_block.is_some_and(|block| block <= height),
            is_byzantium: self.is_active_at(EthereumHardfork::Byzantium, height),
            is_constantinople: self.is_active_at(EthereumHardfork::Constantinople, height),
            is_petersburg: self.is_active_at(EthereumHardfork::Petersburg, height),
            is_istanbul: self.is_active_at(EthereumHardfork::Istanbul, height),
            is_berlin: self.is_active_at(EthereumHardfork::Berlin, height),
            is_london: self.is_active_at(EthereumHardfork::London, height),
            is_merge: self.is_active_at(EthereumHardfork::Paris, height),
            is_shanghai: self.is_active_at(EthereumHardfork::Shanghai, height),
            is_cancun: self.is_active_at(EthereumHardfork::Cancun, height),
            is_prague: self.is_active_at(EthereumHardfork::Prague, height),
        }
    }
}

impl EthereumHardforks for ChainConfig {
    fn ethereum_fork_activation(&self, fork: EthereumHardfork) -> ForkCondition {
        let height = match fork {
            EthereumHardfork::Frontier => Some(0),
            EthereumHardfork::Homestead => self.homestead_block,
            EthereumHardfork::Dao => self.dao_fork_block,
            EthereumHardfork::Tangerine => self.eip150_block,
            EthereumHardfork::SpuriousDragon => self.eip155_block,
            EthereumHardfork::Byzantium => self.byzantium_block,
            EthereumHardfork::Constantinople => self.constantinople_block,
            EthereumHardfork::Petersburg => self.petersburg_block,
            EthereumHardfork::Istanbul => self.istanbul_block,
            EthereumHardfork::MuirGlacier => self.muir_glacier_block,
            EthereumHardfork::Berlin => self.berlin_block,
            EthereumHardfork::London => self.london_block,
            EthereumHardfork::ArrowGlacier => self.arrow_glacier_block,
            EthereumHardfork::GrayGlacier => self.gray_glacier_block,
            EthereumHardfork::Paris => self.merge_netsplit_block,
            EthereumHardfork::Shanghai => self.shanghai_block,
            EthereumHardfork::Cancun => self.cancun_block,
            EthereumHardfork::Prague => self.prague_block,
            _ => None,
        };
        height.map_or(ForkCondition::Never, ForkCondition::Block)
    }
}

/// Fork activation flags at a given block height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rules {
    /// EIP-155 chain id.
    pub chain_id: ChainId,
    /// Homestead is active.
    pub is_homestead: bool,
    /// EIP-150 is active.
    pub is_eip150: bool,
    /// EIP-155 is active.
    pub is_eip155: bool,
    /// EIP-158 is active.
    pub is_eip158: bool,
    /// Byzantium is active.
    pub is_byzantium: bool,
    /// Constantinople is active.
    pub is_constantinople: bool,
    /// Petersburg is active.
    pub is_petersburg: bool,
    /// Istanbul is active.
    pub is_istanbul: bool,
    /// Berlin is active.
    pub is_berlin: bool,
    /// London is active.
    pub is_london: bool,
    /// The merge is active.
    pub is_merge: bool,
    /// Shanghai is active.
    pub is_shanghai: bool,
    /// Cancun is active.
    pub is_cancun: bool,
    /// Prague is active.
    pub is_prague: bool,
}

impl Rules {
    /// The revm [`SpecId`] matching the most recent active fork.
    pub fn spec_id(&self) -> SpecId {
        if self.is_prague {
            SpecId::PRAGUE
        } else if self.is_cancun {
            SpecId::CANCUN
        } else if self.is_shanghai {
            SpecId::SHANGHAI
        } else if self.is_merge && self.is_london {
            SpecId::MERGE
        } else if self.is_london {
            SpecId::LONDON
        } else if self.is_berlin {
            SpecId::BERLIN
        } else if self.is_istanbul {
            SpecId::ISTANBUL
        } else if self.is_petersburg {
            SpecId::PETERSBURG
        } else if self.is_constantinople {
            SpecId::CONSTANTINOPLE
        } else if self.is_byzantium {
            SpecId::BYZANTIUM
        } else if self.is_eip158 {
            SpecId::SPURIOUS_DRAGON
        } else if self.is_eip150 {
            SpecId::TANGERINE
        } else if self.is_homestead {
            SpecId::HOMESTEAD
        } else {
            SpecId::FRONTIER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_rules() {
        let rules = ChainConfig::default().rules(1);
        assert!(rules.is_london);
        assert!(rules.is_cancun);
        assert!(!rules.is_prague);
        assert_eq!(rules.spec_id(), SpecId::CANCUN);
    }

    #[rstest]
    #[case(None, 100, false)]
    #[case(Some(10), 9, false)]
    #[case(Some(10), 10, true)]
    fn test_london_activation(
        #[case] london: Option<u64>,
        #[case] height: u64,
        #[case] expected: bool,
    ) {
        let config = ChainConfig::default().with_london_block(london);
        assert_eq!(config.is_london(height), expected);
        assert_eq!(config.rules(height).is_london, expected);
    }

    #[test]
    fn test_london_disabled_spec() {
        let config = ChainConfig::default().with_london_block(None);
        assert_eq!(config.rules(5).spec_id(), SpecId::BERLIN);
        assert_eq!(ChainConfig::frontier(1).rules(5).spec_id(), SpecId::FRONTIER);
    }

    #[test]
    fn test_serde_defaults() {
        let config: ChainConfig = serde_json::from_str(r#"{"chain_id":7}"#).unwrap();
        assert_eq!(config, ChainConfig::default().with_chain_id(7));
    }
}
