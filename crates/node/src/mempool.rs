//! Pending transactions.

use stakesim_types::{Block, Transaction, TxId};
use std::collections::BTreeMap;

/// Transactions a node knows of that are not yet in an accepted block.
#[derive(Debug, Clone, Default)]
pub struct Mempool {
    transactions: BTreeMap<TxId, Transaction>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction. Returns `false` if its id was already present, in
    /// which case the stored transaction is kept.
    pub fn insert(&mut self, tx: Transaction) -> bool {
        if self.transactions.contains_key(&tx.id) {
            return false;
        }
        self.transactions.insert(tx.id, tx);
        true
    }

    pub fn contains(&self, id: &TxId) -> bool {
        self.transactions.contains_key(id)
    }

    pub fn get(&self, id: &TxId) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    /// Remove every transaction included in `block`. Returns how many were
    /// removed.
    pub fn remove_included(&mut self, block: &Block) -> usize {
        let before = self.transactions.len();
        self.transactions
            .retain(|id, _| !block.contains_transaction(id));
        before - self.transactions.len()
    }

    /// Take every pending transaction, leaving the mempool empty.
    pub fn take_all(&mut self) -> BTreeMap<TxId, Transaction> {
        std::mem::take(&mut self.transactions)
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Pending ids, ascending.
    pub fn ids(&self) -> Vec<TxId> {
        self.transactions.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_types::{BlockId, NodeId};

    fn tx(id: u64) -> Transaction {
        Transaction::transfer(TxId(id), NodeId(1), NodeId(2), id)
    }

    #[test]
    fn test_insert_keeps_first() {
        let mut mempool = Mempool::new();
        assert!(mempool.insert(tx(10)));

        let mut altered = tx(10);
        altered.amount = 999;
        assert!(!mempool.insert(altered));
        assert_eq!(mempool.get(&TxId(10)).map(|t| t.amount), Some(10));
    }

    #[test]
    fn test_remove_included() {
        let mut mempool = Mempool::new();
        mempool.insert(tx(10));
        mempool.insert(tx(11));

        let mut block = Block::genesis([]);
        block.id = BlockId(2);
        block.parent = Some(BlockId::GENESIS);
        block.transactions.insert(TxId(10), tx(10));
        block.transactions.insert(TxId(12), tx(12));

        assert_eq!(mempool.remove_included(&block), 1);
        assert_eq!(mempool.ids(), vec![TxId(11)]);
    }

    #[test]
    fn test_take_all_empties() {
        let mut mempool = Mempool::new();
        mempool.insert(tx(2));
        mempool.insert(tx(1));

        let taken = mempool.take_all();
        assert_eq!(taken.keys().copied().collect::<Vec<_>>(), vec![TxId(1), TxId(2)]);
        assert!(mempool.is_empty());
    }
}
