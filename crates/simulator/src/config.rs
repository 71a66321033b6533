//! Configuration types for the simulator.

use crate::ScenarioError;
use stakesim_node::{Adversary, ProtocolConfig, MIN_EPOCH_INTERVAL};
use stakesim_simulation::SimulationConfig;
use std::time::Duration;

/// Configuration for a reference scenario run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioConfig {
    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Number of validator-selection epochs to run through.
    pub epochs: u32,

    /// Misbehavior of node 4, or `None` to run it honestly.
    pub adversary: Option<Adversary>,

    /// Delay applied to every message.
    pub message_delay: Duration,

    /// Time between validator-selection rounds.
    pub epoch_interval: Duration,

    /// Currency minted to each participant in genesis.
    pub genesis_mint: u64,

    /// Upper bound on events dispatched between two breakpoints.
    pub continue_cap: usize,
}

impl ScenarioConfig {
    /// Create a configuration running `epochs` epochs with default timing.
    pub fn new(epochs: u32) -> Self {
        let simulation = SimulationConfig::default();
        Self {
            seed: simulation.seed,
            epochs,
            adversary: None,
            message_delay: simulation.message_delay,
            epoch_interval: simulation.protocol.epoch_interval,
            genesis_mint: simulation.protocol.genesis_mint,
            continue_cap: simulation.continue_cap,
        }
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of epochs.
    pub fn with_epochs(mut self, epochs: u32) -> Self {
        self.epochs = epochs;
        self
    }

    /// Make node 4 misbehave.
    pub fn with_adversary(mut self, adversary: Adversary) -> Self {
        self.adversary = Some(adversary);
        self
    }

    pub fn with_message_delay(mut self, delay: Duration) -> Self {
        self.message_delay = delay;
        self
    }

    pub fn with_epoch_interval(mut self, interval: Duration) -> Self {
        self.epoch_interval = interval;
        self
    }

    pub fn with_genesis_mint(mut self, amount: u64) -> Self {
        self.genesis_mint = amount;
        self
    }

    pub fn with_continue_cap(mut self, cap: usize) -> Self {
        self.continue_cap = cap;
        self
    }

    /// Check that the run can make progress.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.epoch_interval < MIN_EPOCH_INTERVAL {
            return Err(ScenarioError::InvalidConfig(format!(
                "epoch interval {:?} is shorter than {:?}",
                self.epoch_interval, MIN_EPOCH_INTERVAL
            )));
        }
        if self.continue_cap == 0 {
            return Err(ScenarioError::InvalidConfig(
                "continue cap must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert to a `SimulationConfig` for the underlying simulation.
    pub fn to_simulation_config(&self) -> SimulationConfig {
        SimulationConfig::default()
            .with_seed(self.seed)
            .with_message_delay(self.message_delay)
            .with_continue_cap(self.continue_cap)
            .with_protocol(
                ProtocolConfig::default()
                    .with_epoch_interval(self.epoch_interval)
                    .with_genesis_mint(self.genesis_mint),
            )
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_simulation_defaults() {
        let config = ScenarioConfig::default();
        assert_eq!(config.epochs, 2);
        assert_eq!(config.adversary, None);
        assert_eq!(config.to_simulation_config(), SimulationConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_epoch_interval() {
        assert_eq!(ScenarioConfig::default().validate(), Ok(()));

        let config = ScenarioConfig::default().with_epoch_interval(Duration::ZERO);
        assert!(matches!(config.validate(), Err(ScenarioError::InvalidConfig(_))));
        assert!(matches!(
            ScenarioConfig::default().with_continue_cap(0).validate(),
            Err(ScenarioError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_builders_reach_protocol_config() {
        let sim = ScenarioConfig::new(1)
            .with_seed(7)
            .with_epoch_interval(Duration::from_secs(50))
            .with_genesis_mint(5)
            .to_simulation_config();
        assert_eq!(sim.seed, 7);
        assert_eq!(sim.protocol.epoch_interval, Duration::from_secs(50));
        assert_eq!(sim.protocol.genesis_mint, 5);
    }
}
