//! Drives the reference network through its breakpoints.

use crate::report::ScenarioReport;
use crate::scenario::{end_time, reference_network};
use crate::ScenarioConfig;
use stakesim_core::{SimLogger, TracingLogger};
use stakesim_simulation::NetworkSimulator;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Failure of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("invalid scenario: {0}")]
    InvalidConfig(String),

    #[error("scenario setup failed")]
    Setup,

    #[error("handler fault at {0:?}")]
    HandlerFault(Duration),

    /// Events keep piling up without simulation time moving.
    #[error("simulation stalled at {0:?}")]
    Stalled(Duration),
}

/// Runs the reference network.
pub struct Simulator {
    config: ScenarioConfig,
    sim: NetworkSimulator,
}

impl Simulator {
    pub fn new(config: ScenarioConfig) -> Self {
        Self::with_logger(config, Arc::new(TracingLogger))
    }

    pub fn with_logger(config: ScenarioConfig, logger: Arc<dyn SimLogger>) -> Self {
        let sim = NetworkSimulator::with_logger(config.to_simulation_config(), logger);
        Self { config, sim }
    }

    /// Build the network. Called by `run`; call it directly to step manually.
    pub fn init(&mut self) -> Result<(), ScenarioError> {
        if self.sim.init(reference_network(&self.config)) {
            Ok(())
        } else {
            Err(ScenarioError::Setup)
        }
    }

    /// Resume to the next breakpoint.
    pub fn resume(&mut self) -> Result<(), ScenarioError> {
        if self.sim.resume() {
            Ok(())
        } else {
            Err(ScenarioError::HandlerFault(self.sim.now()))
        }
    }

    /// Whether the final breakpoint is at the head of the queue or the queue
    /// is empty.
    pub fn is_finished(&self) -> bool {
        let end = end_time(&self.config);
        self.sim
            .next_event()
            .map_or(true, |e| e.is_breakpoint && e.time >= end)
    }

    /// A `resume` that stopped at the continue cap with the clock where it
    /// was and a longer queue will never reach the next breakpoint.
    fn is_stalled(&self, time: Duration, pending: usize) -> bool {
        let capped = self
            .sim
            .next_event()
            .is_some_and(|e| !e.is_breakpoint);
        capped && self.sim.now() == time && self.sim.pending_count() > pending
    }

    /// Build the network and run every configured epoch.
    pub fn run(&mut self) -> Result<ScenarioReport, ScenarioError> {
        info!(
            seed = self.config.seed,
            epochs = self.config.epochs,
            adversary = ?self.config.adversary,
            "starting scenario"
        );
        self.config.validate()?;
        self.init()?;
        while !self.is_finished() {
            let (time, pending) = (self.sim.now(), self.sim.pending_count());
            self.resume()?;
            if self.is_stalled(time, pending) {
                return Err(ScenarioError::Stalled(time));
            }
        }
        info!(time = ?self.sim.now(), "scenario finished");
        Ok(self.report())
    }

    pub fn report(&self) -> ScenarioReport {
        ScenarioReport {
            adversary: self.config.adversary,
            snapshot: self.sim.snapshot(),
            stats: self.sim.stats().clone(),
        }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// The underlying simulation.
    pub fn simulation(&self) -> &NetworkSimulator {
        &self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_core::RecordingLogger;
    use stakesim_types::{NodeId, TxId};
    use tracing_test::traced_test;

    #[test]
    fn test_honest_run_includes_both_transactions() {
        let logger = Arc::new(RecordingLogger::new());
        let mut simulator = Simulator::with_logger(ScenarioConfig::default(), logger.clone());
        let report = simulator.run().unwrap();

        assert_eq!(report.nodes_including(TxId(10)), 4);
        assert_eq!(report.nodes_including(TxId(20)), 4);
        assert!(report.agreed_head().is_some());
        assert!(logger.errors().is_empty());
        assert!(simulator.simulation().now() < Duration::from_secs(299));
    }

    #[traced_test]
    #[test]
    fn test_run_stops_at_final_breakpoint() {
        let mut simulator = Simulator::new(ScenarioConfig::new(1));
        simulator.run().unwrap();

        assert!(simulator.is_finished());
        let head = simulator.simulation().next_event().unwrap();
        assert_eq!(head.time, Duration::from_secs(199));
        assert!(head.is_breakpoint);
        assert!(logs_contain("scenario finished"));
    }

    #[test]
    fn test_zero_epoch_interval_is_refused_before_running() {
        let config = ScenarioConfig::default().with_epoch_interval(Duration::ZERO);
        let mut simulator = Simulator::new(config);

        assert!(matches!(simulator.run(), Err(ScenarioError::InvalidConfig(_))));
        assert_eq!(simulator.simulation().pending_count(), 0);
    }

    #[test]
    fn test_node_ids_are_reported_in_order() {
        let report = Simulator::new(ScenarioConfig::new(0)).run().unwrap();
        let ids: Vec<_> = report.snapshot.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4)]);
    }
}
