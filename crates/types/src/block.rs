//! Block type for the replicated block tree.

use crate::{BlockId, NodeId, Transaction, TxId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A proposed block.
///
/// Blocks link to their parent by id and form a tree rooted at the genesis
/// block. Child links are kept by the block tree, not by the block itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block id, one greater than the largest id the proposer had seen.
    pub id: BlockId,

    /// Parent block id (`None` only for genesis).
    pub parent: Option<BlockId>,

    /// Validator that proposed this block (`None` for genesis).
    pub proposer: Option<NodeId>,

    /// Transactions included in this block, keyed by id.
    pub transactions: BTreeMap<TxId, Transaction>,
}

impl Block {
    /// Create the genesis block holding the initial mints.
    pub fn genesis(mints: impl IntoIterator<Item = Transaction>) -> Self {
        Self {
            id: BlockId::GENESIS,
            parent: None,
            proposer: None,
            transactions: mints.into_iter().map(|tx| (tx.id, tx)).collect(),
        }
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.parent.is_none()
    }

    /// Get number of transactions in this block.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Check if this block contains a specific transaction.
    pub fn contains_transaction(&self, tx_id: &TxId) -> bool {
        self.transactions.contains_key(tx_id)
    }

    /// Ids of the included transactions, ascending.
    pub fn transaction_ids(&self) -> Vec<TxId> {
        self.transactions.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_block() {
        let genesis = Block::genesis((1..=4).map(|i| Transaction::mint(TxId(i), NodeId(i), 100)));

        assert!(genesis.is_genesis());
        assert_eq!(genesis.id, BlockId::GENESIS);
        assert_eq!(genesis.proposer, None);
        assert_eq!(genesis.transaction_count(), 4);
        assert!(genesis.contains_transaction(&TxId(3)));
        assert_eq!(
            genesis.transaction_ids(),
            vec![TxId(1), TxId(2), TxId(3), TxId(4)]
        );
    }
}
