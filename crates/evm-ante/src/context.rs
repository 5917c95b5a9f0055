use crate::{DecCoins, Event};

/// Gas costs charged by a key/value store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KvGasConfig {
    /// Cost of a `has` query.
    pub has_cost: u64,
    /// Cost of a delete.
    pub delete_cost: u64,
    /// Flat cost of a read.
    pub read_cost_flat: u64,
    /// Per-byte cost of a read.
    pub read_cost_per_byte: u64,
    /// Flat cost of a write.
    pub write_cost_flat: u64,
    /// Per-byte cost of a write.
    pub write_cost_per_byte: u64,
    /// Cost of advancing an iterator.
    pub iter_next_cost_flat: u64,
}

impl KvGasConfig {
    /// Costs of the persistent store.
    pub const fn kv_default() -> Self {
        Self {
            has_cost: 1000,
            delete_cost: 1000,
            read_cost_flat: 1000,
            read_cost_per_byte: 3,
            write_cost_flat: 2000,
            write_cost_per_byte: 30,
            iter_next_cost_flat: 30,
        }
    }

    /// Costs of the transient store.
    pub const fn transient_default() -> Self {
        Self {
            has_cost: 100,
            delete_cost: 100,
            read_cost_flat: 100,
            read_cost_per_byte: 0,
            write_cost_flat: 200,
            write_cost_per_byte: 3,
            iter_next_cost_flat: 3,
        }
    }

    /// No cost at all. Ethereum transactions pay for state access through EVM gas.
    pub const fn zero() -> Self {
        Self {
            has_cost: 0,
            delete_cost: 0,
            read_cost_flat: 0,
            read_cost_per_byte: 0,
            write_cost_flat: 0,
            write_cost_per_byte: 0,
            iter_next_cost_flat: 0,
        }
    }
}

impl Default for KvGasConfig {
    fn default() -> Self {
        Self::kv_default()
    }
}

/// A gas meter. Only the limit and whether consumption is enforced matter before execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GasMeter {
    limit: u64,
    consumed: u64,
    infinite: bool,
}

impl GasMeter {
    /// A meter enforcing `limit`.
    pub const fn new(limit: u64) -> Self {
        Self { limit, consumed: 0, infinite: false }
    }

    /// A meter that never runs out and reports no limit.
    pub const fn infinite() -> Self {
        Self { limit: u64::MAX, consumed: 0, infinite: true }
    }

    /// A meter that never runs out but reports `limit` as its limit.
    pub const fn infinite_with_limit(limit: u64) -> Self {
        Self { limit, consumed: 0, infinite: true }
    }

    /// The reported limit.
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Gas consumed so far.
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Whether consumption is unbounded.
    pub const fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// Consumes gas. Returns `false` if a finite meter would go past its limit, in which case
    /// nothing is consumed.
    pub fn consume(&mut self, amount: u64) -> bool {
        let consumed = self.consumed.saturating_add(amount);
        if !self.infinite && consumed > self.limit {
            return false;
        }
        self.consumed = consumed;
        true
    }
}

impl Default for GasMeter {
    fn default() -> Self {
        Self::infinite()
    }
}

/// Consensus parameters relevant to admission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ConsensusParams {
    /// Block parameters, `None` when not yet set (e.g. at genesis).
    pub block: Option<BlockParams>,
}

/// Block consensus parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockParams {
    /// Maximum block gas. `-1` means unlimited.
    pub max_gas: i64,
    /// Maximum block size in bytes.
    pub max_bytes: i64,
}

/// Per-transaction execution context.
///
/// The context is passed by value through the decorators: each decorator may return a modified
/// copy. Emitted events are buffered in the context and only persisted by the caller when the
/// whole pipeline succeeds.
#[derive(Clone, Debug, Default)]
pub struct Context {
    chain_id: String,
    block_height: u64,
    is_check_tx: bool,
    is_recheck_tx: bool,
    min_gas_prices: DecCoins,
    consensus_params: ConsensusParams,
    block_gas_meter: Option<GasMeter>,
    gas_meter: GasMeter,
    kv_gas_config: KvGasConfig,
    transient_kv_gas_config: KvGasConfig,
    priority: i64,
    events: Vec<Event>,
}

impl Context {
    /// Creates a deliver-tx context at `block_height`.
    pub fn new(chain_id: impl Into<String>, block_height: u64) -> Self {
        Self {
            chain_id: chain_id.into(),
            block_height,
            kv_gas_config: KvGasConfig::kv_default(),
            transient_kv_gas_config: KvGasConfig::transient_default(),
            ..Default::default()
        }
    }

    /// Native chain id.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Current block height.
    pub const fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Whether the transaction is being admitted to the mempool (check-tx or re-check-tx).
    pub const fn is_check_tx(&self) -> bool {
        self.is_check_tx
    }

    /// Whether the transaction is being re-validated after a block commit.
    pub const fn is_recheck_tx(&self) -> bool {
        self.is_recheck_tx
    }

    /// Validator-local minimum gas prices.
    pub const fn min_gas_prices(&self) -> &DecCoins {
        &self.min_gas_prices
    }

    /// Consensus parameters.
    pub const fn consensus_params(&self) -> &ConsensusParams {
        &self.consensus_params
    }

    /// Block gas meter, if one is installed.
    pub const fn block_gas_meter(&self) -> Option<&GasMeter> {
        self.block_gas_meter.as_ref()
    }

    /// Transaction gas meter.
    pub const fn gas_meter(&self) -> &GasMeter {
        &self.gas_meter
    }

    /// Mutable transaction gas meter.
    pub fn gas_meter_mut(&mut self) -> &mut GasMeter {
        &mut self.gas_meter
    }

    /// KV store gas costs.
    pub const fn kv_gas_config(&self) -> &KvGasConfig {
        &self.kv_gas_config
    }

    /// Transient KV store gas costs.
    pub const fn transient_kv_gas_config(&self) -> &KvGasConfig {
        &self.transient_kv_gas_config
    }

    /// Mempool priority of the transaction.
    pub const fn priority(&self) -> i64 {
        self.priority
    }

    /// Events emitted so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Appends an event.
    pub fn emit_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Sets the block height.
    pub fn with_block_height(mut self, block_height: u64) -> Self {
        self.block_height = block_height;
        self
    }

    /// Marks the context as check-tx. Clearing it also clears re-check-tx.
    pub fn with_is_check_tx(mut self, is_check_tx: bool) -> Self {
        self.is_check_tx = is_check_tx;
        if !is_check_tx {
            self.is_recheck_tx = false;
        }
        self
    }

    /// Marks the context as re-check-tx. Setting it also sets check-tx.
    pub fn with_is_recheck_tx(mut self, is_recheck_tx: bool) -> Self {
        self.is_recheck_tx = is_recheck_tx;
        if is_recheck_tx {
            self.is_check_tx = true;
        }
        self
    }

    /// Sets the validator-local minimum gas prices.
    pub fn with_min_gas_prices(mut self, min_gas_prices: DecCoins) -> Self {
        self.min_gas_prices = min_gas_prices;
        self
    }

    /// Sets the consensus parameters.
    pub fn with_consensus_params(mut self, consensus_params: ConsensusParams) -> Self {
        self.consensus_params = consensus_params;
        self
    }

    /// Installs a block gas meter.
    pub fn with_block_gas_meter(mut self, meter: GasMeter) -> Self {
        self.block_gas_meter = Some(meter);
        self
    }

    /// Replaces the transaction gas meter.
    pub fn with_gas_meter(mut self, meter: GasMeter) -> Self {
        self.gas_meter = meter;
        self
    }

    /// Replaces the KV store gas costs.
    pub fn with_kv_gas_config(mut self, config: KvGasConfig) -> Self {
        self.kv_gas_config = config;
        self
    }

    /// Replaces the transient KV store gas costs.
    pub fn with_transient_kv_gas_config(mut self, config: KvGasConfig) -> Self {
        self.transient_kv_gas_config = config;
        self
    }

    /// Sets the mempool priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recheck_implies_check() {
        let ctx = Context::new("evmos_9001-1", 1).with_is_recheck_tx(true);
        assert!(ctx.is_check_tx());
        assert!(ctx.is_recheck_tx());
        let ctx = ctx.with_is_check_tx(false);
        assert!(!ctx.is_recheck_tx());
    }

    #[test]
    fn test_gas_meter() {
        let mut meter = GasMeter::new(10);
        assert!(meter.consume(10));
        assert!(!meter.consume(1));
        assert_eq!(meter.consumed(), 10);

        let mut meter = GasMeter::infinite_with_limit(10);
        assert!(meter.consume(100));
        assert_eq!(meter.limit(), 10);
    }
}
