//! Tests for deterministic simulation.
//!
//! The same seed and setup must produce the same node states, which is what
//! makes a paused run reproducible.

mod common;

use common::{four_nodes, simulator, SEED};
use stakesim_node::Handler;
use stakesim_simulation::NetworkSnapshot;

fn run(seed: u64, resumes: usize) -> (NetworkSnapshot, stakesim_simulation::SimulationStats) {
    let (mut sim, _) = simulator(seed);
    assert!(sim.init(four_nodes(Handler::honest())));
    for _ in 0..resumes {
        assert!(sim.resume());
    }
    (sim.snapshot(), sim.stats().clone())
}

#[test]
fn test_determinism_same_seed() {
    for resumes in 1..=4 {
        let (first, first_stats) = run(SEED, resumes);
        let (second, second_stats) = run(SEED, resumes);
        assert_eq!(first, second, "diverged after {resumes} resumes");
        assert_eq!(first_stats, second_stats);
    }
}

#[test]
fn test_reinit_reproduces_run() {
    let (mut sim, _) = simulator(SEED);
    assert!(sim.init(four_nodes(Handler::honest())));
    for _ in 0..3 {
        assert!(sim.resume());
    }
    let first = sim.snapshot();

    assert!(sim.init(four_nodes(Handler::honest())));
    assert_eq!(sim.now(), std::time::Duration::ZERO);
    for _ in 0..3 {
        assert!(sim.resume());
    }
    assert_eq!(sim.snapshot(), first);
}

#[test]
fn test_stats_are_accumulated() {
    let (_, stats) = run(SEED, 3);
    assert!(stats.events_processed > 4);
    assert!(stats.messages_sent > 0);
    assert_eq!(stats.breakpoints_consumed, 2);
    assert_eq!(stats.handler_faults, 0);
    // One selectValidator timer per node from init and from the first epoch.
    assert_eq!(stats.timers_set, 8);
}
