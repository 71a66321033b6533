//! Shared setup for the integration tests.

#![allow(dead_code)]

use stakesim_core::{Event, EventKind, RecordingLogger};
use stakesim_node::Handler;
use stakesim_simulation::{NetworkSimulator, SetupError, SimulationConfig};
use stakesim_test_helpers::fixtures;
use stakesim_types::{NodeId, Position};
use std::sync::Arc;
use std::time::Duration;

pub const SEED: u64 = 42;

pub fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

/// Simulator with a recording logger.
pub fn simulator(seed: u64) -> (NetworkSimulator, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::new());
    let config = SimulationConfig::default().with_seed(seed);
    (NetworkSimulator::with_logger(config, logger.clone()), logger)
}

/// Four nodes in a ring-like topology (1-2, 1-3, 2-4, 3-4), init at t=0,
/// a breakpoint at t=1, Tx(10) from node 1 to node 2 submitted at t=2, and
/// breakpoints one second before each of the first two epochs.
pub fn four_nodes(fourth: Handler) -> impl FnOnce(&mut NetworkSimulator) -> Result<(), SetupError> {
    move |sim: &mut NetworkSimulator| {
        let layout: [(u64, &str, (f64, f64), &[u64]); 4] = [
            (1, "good1", (0.3, 0.3), &[2, 3]),
            (2, "good2", (0.7, 0.3), &[1, 4]),
            (3, "good3", (0.3, 0.7), &[1, 4]),
            (4, "bad4", (0.7, 0.7), &[2, 3]),
        ];
        for (id, name, (x, y), peers) in layout {
            let handler = if id == 4 { fourth.clone() } else { Handler::honest() };
            sim.create_node(
                NodeId(id),
                name,
                Position::new(x, y),
                if id == 4 { "maroon" } else { "teal" },
                peers.iter().map(|p| NodeId(*p)),
                handler,
            );
        }
        for id in 1..=4 {
            sim.schedule(Event::new(Duration::ZERO, NodeId(id), EventKind::Init));
        }
        sim.schedule(Event::breakpoint(secs(1)));
        sim.schedule(Event::new(
            secs(2),
            NodeId(1),
            EventKind::SubmitTransaction(fixtures::transfer(10, 1, 2, 10)),
        ));
        sim.schedule(Event::breakpoint(secs(99)));
        sim.schedule(Event::breakpoint(secs(199)));
        Ok(())
    }
}
