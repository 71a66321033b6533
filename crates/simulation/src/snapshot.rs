//! Read-only view of the network for a presentation layer.

use serde::Serialize;
use stakesim_node::NodeRuntime;
use stakesim_types::{Block, BlockId, NodeId, Position, TxId};
use std::time::Duration;

/// State of every node at one point in simulation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSnapshot {
    pub time: Duration,
    pub pending_events: usize,
    pub nodes: Vec<NodeSnapshot>,
}

impl NetworkSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub position: Position,
    pub color: String,
    /// `honest` or the adversary label.
    pub handler: String,
    pub peers: Vec<NodeId>,
    pub initialized: bool,
    pub mempool: Vec<TxId>,
    /// Blocks ascending by id.
    pub blocks: Vec<BlockSnapshot>,
    /// Fork-choice head.
    pub head: Option<BlockId>,
    pub epoch: Option<Duration>,
    pub validator: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockSnapshot {
    pub id: BlockId,
    pub parent: Option<BlockId>,
    pub proposer: Option<NodeId>,
    pub transactions: Vec<TxId>,
}

impl From<&Block> for BlockSnapshot {
    fn from(block: &Block) -> Self {
        Self {
            id: block.id,
            parent: block.parent,
            proposer: block.proposer,
            transactions: block.transaction_ids(),
        }
    }
}

impl NodeSnapshot {
    pub(crate) fn capture(node: &NodeRuntime, handler: &str) -> Self {
        let metadata = node.metadata();
        let (mempool, blocks, head) = match (node.mempool(), node.tree()) {
            (Some(mempool), Some(tree)) => (
                mempool.ids(),
                tree.blocks().map(BlockSnapshot::from).collect(),
                Some(tree.deepest().id),
            ),
            _ => (Vec::new(), Vec::new(), None),
        };
        let round = node.round();

        Self {
            id: node.id(),
            name: metadata.name.clone(),
            position: metadata.position,
            color: metadata.color.clone(),
            handler: handler.to_string(),
            peers: node.peers().iter().copied().collect(),
            initialized: node.is_initialized(),
            mempool,
            blocks,
            head,
            epoch: round.map(|r| r.epoch()),
            validator: round.and_then(|r| r.validator()),
        }
    }

    /// Whether any block in this node's tree includes `tx`.
    pub fn has_block_with(&self, tx: TxId) -> bool {
        self.blocks.iter().any(|b| b.transactions.contains(&tx))
    }
}
