//! The four-node reference network.
//!
//! ```text
//!   good1 ─── good2
//!     │         │
//!   good3 ─── bad4
//! ```
//!
//! Node 1 submits `Tx(10)` (1 → 2, 10) two seconds in and node 4 submits
//! `Tx(20)` (4 → 3, 50) halfway through the first epoch. Breakpoints sit one
//! second after start and one second before every epoch boundary.

use crate::ScenarioConfig;
use stakesim_core::{Event, EventKind};
use stakesim_node::Handler;
use stakesim_simulation::{NetworkSimulator, SetupError};
use stakesim_types::{NodeId, Position, Transaction, TxId};
use std::time::Duration;

/// Node that can be configured to misbehave.
pub const ADVERSARY_NODE: NodeId = NodeId(4);

struct NodeLayout {
    id: u64,
    name: &'static str,
    position: (f64, f64),
    peers: &'static [u64],
}

const LAYOUT: [NodeLayout; 4] = [
    NodeLayout {
        id: 1,
        name: "good1",
        position: (0.25, 0.25),
        peers: &[2, 3],
    },
    NodeLayout {
        id: 2,
        name: "good2",
        position: (0.75, 0.25),
        peers: &[1, 4],
    },
    NodeLayout {
        id: 3,
        name: "good3",
        position: (0.25, 0.75),
        peers: &[1, 4],
    },
    NodeLayout {
        id: 4,
        name: "bad4",
        position: (0.75, 0.75),
        peers: &[2, 3],
    },
];

/// Breakpoint times for `config`: one after start and one before each of
/// the first `epochs + 1` epoch boundaries.
pub fn breakpoint_times(config: &ScenarioConfig) -> Vec<Duration> {
    let second = Duration::from_secs(1);
    std::iter::once(second)
        .chain((1..=config.epochs + 1).map(|i| {
            (config.epoch_interval * i)
                .saturating_sub(second)
                .max(second)
        }))
        .collect()
}

/// When the run described by `config` ends.
pub fn end_time(config: &ScenarioConfig) -> Duration {
    breakpoint_times(config)
        .last()
        .copied()
        .unwrap_or_default()
}

/// Transactions submitted during the run, with their submitter and time.
pub fn submissions(config: &ScenarioConfig) -> Vec<(Duration, NodeId, Transaction)> {
    vec![
        (
            Duration::from_secs(2),
            NodeId(1),
            Transaction::transfer(TxId(10), NodeId(1), NodeId(2), 10),
        ),
        (
            config.epoch_interval + config.epoch_interval / 2,
            NodeId(4),
            Transaction::transfer(TxId(20), NodeId(4), NodeId(3), 50),
        ),
    ]
}

/// Setup building the reference network.
pub fn reference_network(
    config: &ScenarioConfig,
) -> impl FnOnce(&mut NetworkSimulator) -> Result<(), SetupError> {
    let adversary = config.adversary;
    let breakpoints = breakpoint_times(config);
    let submissions = submissions(config);

    move |sim: &mut NetworkSimulator| {
        for node in &LAYOUT {
            let id = NodeId(node.id);
            let (handler, color) = match adversary {
                Some(adversary) if id == ADVERSARY_NODE => (Handler::adversarial(adversary), "maroon"),
                _ => (Handler::honest(), "teal"),
            };
            sim.create_node(
                id,
                node.name,
                Position::new(node.position.0, node.position.1),
                color,
                node.peers.iter().map(|p| NodeId(*p)),
                handler,
            );
        }

        for node in &LAYOUT {
            sim.schedule(Event::new(Duration::ZERO, NodeId(node.id), EventKind::Init));
        }
        for (time, submitter, tx) in submissions {
            sim.schedule(Event::new(time, submitter, EventKind::SubmitTransaction(tx)));
        }
        for time in breakpoints {
            sim.schedule(Event::breakpoint(time));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints_bracket_epochs() {
        let times: Vec<_> = breakpoint_times(&ScenarioConfig::new(2))
            .into_iter()
            .map(|t| t.as_secs())
            .collect();
        assert_eq!(times, vec![1, 99, 199, 299]);
        assert_eq!(end_time(&ScenarioConfig::new(0)), Duration::from_secs(99));
    }

    #[test]
    fn test_second_transaction_lands_mid_epoch() {
        let subs = submissions(&ScenarioConfig::default());
        assert_eq!(subs[1].0, Duration::from_secs(150));
        assert_eq!(subs[1].2.source, Some(NodeId(4)));
    }

    #[test]
    fn test_reference_network_layout() {
        let mut sim = NetworkSimulator::new(Default::default());
        let config = ScenarioConfig::default().with_adversary(stakesim_node::Adversary::Silent);
        assert!(sim.init(reference_network(&config)));

        assert_eq!(sim.nodes().count(), 4);
        assert_eq!(sim.handler(ADVERSARY_NODE).map(|h| h.label()), Some("silent"));
        assert_eq!(sim.handler(NodeId(1)).map(|h| h.label()), Some("honest"));
        // 4 inits, 2 submissions, 4 breakpoints.
        assert_eq!(sim.pending_count(), 10);
    }
}
