//! Configuration for the node protocol.

use std::time::Duration;

/// Default time between validator-selection rounds.
pub const DEFAULT_EPOCH_INTERVAL: Duration = Duration::from_secs(100);

/// Shortest epoch interval a node schedules.
///
/// A zero interval would reschedule `selectValidator` at the same instant
/// forever.
pub const MIN_EPOCH_INTERVAL: Duration = Duration::from_secs(1);

/// Default amount minted to every participant in the genesis block.
pub const DEFAULT_GENESIS_MINT: u64 = 100;

/// Protocol parameters shared by every node of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Delay between consecutive `selectValidator` events on each node.
    ///
    /// The first round starts this long after `init`.
    pub epoch_interval: Duration,

    /// Currency minted to each participant at genesis.
    pub genesis_mint: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            epoch_interval: DEFAULT_EPOCH_INTERVAL,
            genesis_mint: DEFAULT_GENESIS_MINT,
        }
    }
}

impl ProtocolConfig {
    /// Set the epoch interval, raised to [`MIN_EPOCH_INTERVAL`] if shorter.
    pub fn with_epoch_interval(mut self, epoch_interval: Duration) -> Self {
        self.epoch_interval = epoch_interval.max(MIN_EPOCH_INTERVAL);
        self
    }

    /// Delay until the next `selectValidator`. Never below
    /// [`MIN_EPOCH_INTERVAL`], even if the field was set directly.
    pub fn epoch_delay(&self) -> Duration {
        self.epoch_interval.max(MIN_EPOCH_INTERVAL)
    }

    /// Set the genesis mint amount.
    pub fn with_genesis_mint(mut self, genesis_mint: u64) -> Self {
        self.genesis_mint = genesis_mint;
        self
    }
}
