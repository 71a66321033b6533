//! Local replica of the block tree.
//!
//! Blocks are kept in a flat arena keyed by id. Each entry records its depth
//! and the ids of its children, so fork choice never needs owning links
//! between blocks.

use crate::RejectReason;
use crate::error::Described;
use stakesim_types::{Block, BlockId, TxId};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
struct TreeEntry {
    block: Block,
    /// Number of edges from genesis.
    depth: u64,
    children: BTreeSet<BlockId>,
}

/// Tree of blocks rooted at genesis.
#[derive(Debug, Clone)]
pub struct BlockTree {
    root: BlockId,
    entries: BTreeMap<BlockId, TreeEntry>,
    /// Which block included each transaction.
    tx_index: BTreeMap<TxId, BlockId>,
}

impl BlockTree {
    /// Create a tree holding only `genesis`.
    pub fn new(genesis: Block) -> Self {
        let root = genesis.id;
        let tx_index = genesis.transactions.keys().map(|tx| (*tx, root)).collect();
        let mut entries = BTreeMap::new();
        entries.insert(
            root,
            TreeEntry {
                block: genesis,
                depth: 0,
                children: BTreeSet::new(),
            },
        );
        Self {
            root,
            entries,
            tx_index,
        }
    }

    /// Attach `block` under its parent.
    ///
    /// Fails if the block id is already present or the parent is unknown. On
    /// failure the tree is unchanged.
    pub fn insert(&mut self, block: Block) -> Result<(), RejectReason> {
        if self.entries.contains_key(&block.id) {
            return Err(RejectReason::DuplicateBlock(block.id));
        }
        let missing_parent = || RejectReason::MissingParent {
            block: block.id,
            parent: Described(block.parent),
        };
        let parent_id = block.parent.ok_or_else(missing_parent)?;
        let parent = self
            .entries
            .get_mut(&parent_id)
            .ok_or_else(missing_parent)?;

        parent.children.insert(block.id);
        let depth = parent.depth + 1;

        for tx in block.transactions.keys() {
            self.tx_index.entry(*tx).or_insert(block.id);
        }
        self.entries.insert(
            block.id,
            TreeEntry {
                block,
                depth,
                children: BTreeSet::new(),
            },
        );
        Ok(())
    }

    pub fn root(&self) -> &Block {
        // The root entry is created in `new` and never removed.
        &self.entries[&self.root].block
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.entries.get(id).map(|e| &e.block)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.entries.contains_key(id)
    }

    /// Check whether any block in the tree includes `tx`.
    pub fn contains_tx(&self, tx: &TxId) -> bool {
        self.tx_index.contains_key(tx)
    }

    /// Get the block that first included `tx`.
    pub fn block_of(&self, tx: &TxId) -> Option<BlockId> {
        self.tx_index.get(tx).copied()
    }

    pub fn depth(&self, id: &BlockId) -> Option<u64> {
        self.entries.get(id).map(|e| e.depth)
    }

    /// Child ids of `id`, ascending.
    pub fn children(&self, id: &BlockId) -> Vec<BlockId> {
        self.entries
            .get(id)
            .map(|e| e.children.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Fork choice: the deepest block.
    ///
    /// Ties go to the block reached first by a pre-order walk from genesis
    /// that visits children in ascending id order.
    pub fn deepest(&self) -> &Block {
        let mut best = self.root;
        let mut best_depth = 0;
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            let Some(entry) = self.entries.get(&id) else {
                continue;
            };
            if entry.depth > best_depth {
                best = id;
                best_depth = entry.depth;
            }
            // Reverse push so the smallest child is visited next.
            stack.extend(entry.children.iter().rev().copied());
        }

        &self.entries[&best].block
    }

    /// Largest block id present.
    pub fn max_id(&self) -> BlockId {
        self.entries.keys().next_back().copied().unwrap_or(self.root)
    }

    /// Ids from genesis down to `id`, or empty if `id` is unknown.
    pub fn chain_to(&self, id: &BlockId) -> Vec<BlockId> {
        let mut chain = Vec::new();
        let mut cursor = self.entries.get(id).map(|e| &e.block);
        while let Some(block) = cursor {
            chain.push(block.id);
            cursor = block.parent.and_then(|p| self.entries.get(&p)).map(|e| &e.block);
        }
        chain.reverse();
        chain
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All blocks, ascending by id.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.entries.values().map(|e| &e.block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_types::{NodeId, Transaction};

    fn genesis() -> Block {
        Block::genesis((1..=4).map(|i| Transaction::mint(TxId(i), NodeId(i), 100)))
    }

    fn child(id: u64, parent: u64, txs: &[u64]) -> Block {
        Block {
            id: BlockId(id),
            parent: Some(BlockId(parent)),
            proposer: Some(NodeId(1)),
            transactions: txs
                .iter()
                .map(|t| (TxId(*t), Transaction::transfer(TxId(*t), NodeId(1), NodeId(2), 1)))
                .collect(),
        }
    }

    #[test]
    fn test_new_tree_has_genesis_only() {
        let tree = BlockTree::new(genesis());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.deepest().id, BlockId::GENESIS);
        assert_eq!(tree.max_id(), BlockId::GENESIS);
        assert!(tree.contains_tx(&TxId(3)));
    }

    #[test]
    fn test_insert_requires_parent() {
        let mut tree = BlockTree::new(genesis());
        let err = tree.insert(child(3, 2, &[])).unwrap_err();
        assert!(matches!(err, RejectReason::MissingParent { .. }));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_rejects_duplicate() {
        let mut tree = BlockTree::new(genesis());
        tree.insert(child(2, 1, &[10])).unwrap();
        assert_eq!(
            tree.insert(child(2, 1, &[])),
            Err(RejectReason::DuplicateBlock(BlockId(2)))
        );
        assert_eq!(tree.block_of(&TxId(10)), Some(BlockId(2)));
    }

    #[test]
    fn test_deepest_prefers_longest_branch() {
        let mut tree = BlockTree::new(genesis());
        tree.insert(child(2, 1, &[])).unwrap();
        tree.insert(child(3, 1, &[])).unwrap();
        tree.insert(child(4, 3, &[])).unwrap();

        assert_eq!(tree.deepest().id, BlockId(4));
        assert_eq!(tree.chain_to(&BlockId(4)), vec![BlockId(1), BlockId(3), BlockId(4)]);
        assert_eq!(tree.max_id(), BlockId(4));
    }

    #[test]
    fn test_deepest_tie_goes_to_first_in_preorder() {
        let mut tree = BlockTree::new(genesis());
        // Branch under 2 is visited before the branch under 3.
        tree.insert(child(3, 1, &[])).unwrap();
        tree.insert(child(2, 1, &[])).unwrap();
        tree.insert(child(7, 3, &[])).unwrap();
        tree.insert(child(9, 2, &[])).unwrap();

        assert_eq!(tree.deepest().id, BlockId(9));
        assert_eq!(tree.children(&BlockId(1)), vec![BlockId(2), BlockId(3)]);
    }
}
