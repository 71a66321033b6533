//! Simulation configuration.

use stakesim_node::ProtocolConfig;
use std::time::Duration;

/// Default delay between sending and delivering a message.
pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_secs(1);

/// Default number of events a single `resume` call may dispatch.
pub const DEFAULT_CONTINUE_CAP: usize = 1000;

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Seed for node keys and per-node randomness.
    pub seed: u64,

    /// Delay applied to every message.
    pub message_delay: Duration,

    /// Upper bound on events dispatched by one `resume` call.
    ///
    /// Keeps a breakpoint-free schedule that reschedules itself forever
    /// from running unbounded.
    pub continue_cap: usize,

    /// Parameters passed to every node.
    pub protocol: ProtocolConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            message_delay: DEFAULT_MESSAGE_DELAY,
            continue_cap: DEFAULT_CONTINUE_CAP,
            protocol: ProtocolConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_message_delay(mut self, message_delay: Duration) -> Self {
        self.message_delay = message_delay;
        self
    }

    pub fn with_continue_cap(mut self, continue_cap: usize) -> Self {
        self.continue_cap = continue_cap;
        self
    }

    pub fn with_protocol(mut self, protocol: ProtocolConfig) -> Self {
        self.protocol = protocol;
        self
    }
}
