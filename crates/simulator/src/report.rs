//! Summary of a finished scenario run.

use serde::Serialize;
use stakesim_node::Adversary;
use stakesim_simulation::{NetworkSnapshot, SimulationStats};
use stakesim_types::{BlockId, TxId};

/// Final state of a scenario run.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub adversary: Option<Adversary>,
    pub snapshot: NetworkSnapshot,
    #[serde(skip)]
    pub stats: SimulationStats,
}

impl ScenarioReport {
    /// Number of nodes holding a block that includes `tx`.
    pub fn nodes_including(&self, tx: TxId) -> usize {
        self.snapshot
            .nodes
            .iter()
            .filter(|n| n.has_block_with(tx))
            .count()
    }

    /// Fork-choice heads of honest nodes, if they all agree.
    pub fn agreed_head(&self) -> Option<BlockId> {
        let mut heads = self
            .snapshot
            .nodes
            .iter()
            .filter(|n| n.handler == "honest")
            .map(|n| n.head);
        let first = heads.next()??;
        heads.all(|h| h == Some(first)).then_some(first)
    }

    pub fn print_summary(&self) {
        println!("\n═══════════════════════════════════════════");
        println!("          STAKESIM SCENARIO REPORT          ");
        println!("═══════════════════════════════════════════");
        println!();
        match self.adversary {
            Some(adversary) => println!("Adversary:  node 4 ({adversary})"),
            None => println!("Adversary:  none"),
        }
        println!("Sim time:   {:?}", self.snapshot.time);
        println!();
        println!("Events:");
        println!("  Processed:   {}", self.stats.events_processed);
        println!("  Breakpoints: {}", self.stats.breakpoints_consumed);
        println!("  Messages:    {}", self.stats.messages_sent);
        println!("  Timers:      {}", self.stats.timers_set);
        println!("  Faults:      {}", self.stats.handler_faults);
        println!("  Pending:     {}", self.snapshot.pending_events);
        println!();
        println!("Nodes:");
        for node in &self.snapshot.nodes {
            let head = node
                .head
                .map(|h| h.to_string())
                .unwrap_or_else(|| "-".to_string());
            let validator = node
                .validator
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {:<6} {:<15} blocks={:<3} head={:<10} mempool={:<3} validator={}",
                node.name,
                node.handler,
                node.blocks.len(),
                head,
                node.mempool.len(),
                validator
            );
        }
        println!();
        match self.agreed_head() {
            Some(head) => println!("Honest nodes agree on head {head}"),
            None => println!("Honest nodes disagree on the head"),
        }
    }
}
