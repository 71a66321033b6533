//! Transfer transactions.

use crate::{NodeId, TxId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency transfer between participants.
///
/// Immutable once created. A transaction without a source mints new
/// currency; only the genesis block contains mints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id.
    pub id: TxId,
    /// Paying participant, or `None` for minted currency.
    pub source: Option<NodeId>,
    /// Receiving participant.
    pub destination: NodeId,
    /// Amount transferred.
    pub amount: u64,
}

impl Transaction {
    /// Create a transfer from `source` to `destination`.
    pub fn transfer(id: TxId, source: NodeId, destination: NodeId, amount: u64) -> Self {
        Self {
            id,
            source: Some(source),
            destination,
            amount,
        }
    }

    /// Create a mint of `amount` to `destination`.
    pub fn mint(id: TxId, destination: NodeId, amount: u64) -> Self {
        Self {
            id,
            source: None,
            destination,
            amount,
        }
    }

    /// Whether this transaction creates new currency.
    pub fn is_mint(&self) -> bool {
        self.source.is_none()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(source) => write!(
                f,
                "{}: {} -> {} ({})",
                self.id, source, self.destination, self.amount
            ),
            None => write!(f, "{}: mint -> {} ({})", self.id, self.destination, self.amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_has_no_source() {
        let mint = Transaction::mint(TxId(1), NodeId(1), 100);
        assert!(mint.is_mint());

        let transfer = Transaction::transfer(TxId(10), NodeId(1), NodeId(2), 10);
        assert!(!transfer.is_mint());
        assert_eq!(transfer.source, Some(NodeId(1)));
    }

    #[test]
    fn test_display() {
        let transfer = Transaction::transfer(TxId(10), NodeId(1), NodeId(2), 10);
        assert_eq!(transfer.to_string(), "Tx(10): Node(1) -> Node(2) (10)");
    }
}
