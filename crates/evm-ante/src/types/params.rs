use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::Dec;

/// Governance access policy for one kind of EVM operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// Anyone may perform the operation.
    #[default]
    Permissionless,
    /// Nobody may perform the operation.
    Restricted,
    /// Only the addresses of the access control list may perform the operation.
    Permissioned,
}

/// Access policy plus the addresses it applies to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessControlType {
    /// Policy kind.
    pub access_type: AccessType,
    /// Addresses blocked (permissionless) or allowed (permissioned).
    pub access_control_list: Vec<Address>,
}

impl AccessControlType {
    /// Whether the operation is disabled for every sender.
    pub fn is_restricted(&self) -> bool {
        self.access_type == AccessType::Restricted
    }
}

/// Governance access control over contract creation and calls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessControl {
    /// Policy for contract creation.
    pub create: AccessControlType,
    /// Policy for contract calls.
    pub call: AccessControlType,
}

/// Parameters of the EVM module, read once per transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvmParams {
    /// Additional EIPs activated on top of the fork rules.
    pub extra_eips: Vec<u64>,
    /// Whether transactions without EIP-155 replay protection are accepted.
    pub allow_unprotected_txs: bool,
    /// Governance access control.
    pub access_control: AccessControl,
    /// Static precompiles enabled on the chain.
    pub active_static_precompiles: Vec<Address>,
}

/// Parameters of the fee market module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeMarketParams {
    /// Disables the EIP-1559 base fee entirely.
    pub no_base_fee: bool,
    /// Bounds the amount the base fee can change between blocks.
    pub base_fee_change_denominator: u32,
    /// Bounds the maximum gas limit an EIP-1559 block may have.
    pub elasticity_multiplier: u32,
    /// Height at which the base fee calculation is enabled.
    pub enable_height: u64,
    /// Base fee for the current block, in the EVM representation.
    pub base_fee: U256,
    /// Global minimum gas price, in the native decimals of the chain coin.
    pub min_gas_price: Dec,
    /// Minimum fraction of the gas limit charged as gas used.
    pub min_gas_multiplier: Dec,
}

impl Default for FeeMarketParams {
    fn default() -> Self {
        Self {
            no_base_fee: false,
            base_fee_change_denominator: 8,
            elasticity_multiplier: 2,
            enable_height: 0,
            base_fee: U256::from(1_000_000_000u64),
            min_gas_price: Dec::ZERO,
            // 0.5
            min_gas_multiplier: Dec::from_raw(U256::from(500_000_000_000_000_000u64)),
        }
    }
}

impl FeeMarketParams {
    /// Whether the base fee is in effect at `height`.
    pub fn is_base_fee_enabled(&self, height: u64) -> bool {
        !self.no_base_fee && height >= self.enable_height
    }
}
