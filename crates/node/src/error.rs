//! Reasons for dropping a received message.

use stakesim_messages::MessageType;
use stakesim_types::{BlockId, NodeId};
use std::time::Duration;
use thiserror::Error;

/// Why a node refused a message.
///
/// Rejections are logged as errors. The message is dropped, never stored and
/// never forwarded. They do not abort the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("{0} has no registered public key")]
    UnknownSender(NodeId),

    #[error("invalid signature on {message_type} message from {sender}")]
    InvalidSignature {
        sender: NodeId,
        message_type: MessageType,
    },

    #[error("reveal from {0} has no stored commitment")]
    MissingCommitment(NodeId),

    #[error("reveal from {0} does not open its commitment")]
    RevealMismatch(NodeId),

    #[error("{block} was proposed by {proposer}, expected validator {expected}")]
    WrongProposer {
        block: BlockId,
        proposer: Described<NodeId>,
        expected: Described<NodeId>,
    },

    #[error("parent {parent} of {block} is not in the block tree")]
    MissingParent {
        block: BlockId,
        parent: Described<BlockId>,
    },

    #[error("ack from {sender} is for epoch {epoch:?}, current epoch starts at {current:?}")]
    StaleEpoch {
        sender: NodeId,
        epoch: Duration,
        current: Duration,
    },

    #[error("{0} is already in the block tree")]
    DuplicateBlock(BlockId),
}

/// Optional id that displays as `none` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Described<T>(pub Option<T>);

impl<T: std::fmt::Display> std::fmt::Display for Described<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_proposer_message() {
        let reason = RejectReason::WrongProposer {
            block: BlockId(2),
            proposer: Described(Some(NodeId(4))),
            expected: Described(None),
        };
        assert_eq!(
            reason.to_string(),
            "Block(2) was proposed by Node(4), expected validator none"
        );
    }
}
