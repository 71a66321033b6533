//! Gossip payloads.
//!
//! Every payload is flooded to all peers on first receipt and carried inside a
//! [`SignedMessage`](crate::SignedMessage) signed by its originator.

mod ack;

pub use ack::IdAck;

use serde::{Deserialize, Serialize};
use stakesim_types::{signing, Block, Commitment, Reveal, Transaction};
use std::fmt;

/// Declared type of a signed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Transaction gossip.
    Tx,
    /// Commitment to a random value for validator selection.
    ValidatorRandomCommit,
    /// Reveal of a committed random value.
    ValidatorRandomReveal,
    /// Acknowledgement of the resolved validator.
    ValidatorIdAck,
    /// Block proposal.
    Block,
    /// A message type this build does not interpret.
    Other,
}

impl MessageType {
    /// Wire tag of this message type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Tx => "tx",
            MessageType::ValidatorRandomCommit => "validatorRandomCommit",
            MessageType::ValidatorRandomReveal => "validatorRandomReveal",
            MessageType::ValidatorIdAck => "validatorIdAck",
            MessageType::Block => "block",
            MessageType::Other => "other",
        }
    }

    /// Signing domain tag of this message type.
    pub fn domain(&self) -> &'static [u8] {
        match self {
            MessageType::Tx => signing::DOMAIN_TX,
            MessageType::ValidatorRandomCommit => signing::DOMAIN_RANDOM_COMMIT,
            MessageType::ValidatorRandomReveal => signing::DOMAIN_RANDOM_REVEAL,
            MessageType::ValidatorIdAck => signing::DOMAIN_ID_ACK,
            MessageType::Block => signing::DOMAIN_BLOCK,
            MessageType::Other => signing::DOMAIN_OTHER,
        }
    }

    /// Check if this message belongs to the validator-selection round.
    pub fn is_validator_selection(&self) -> bool {
        matches!(
            self,
            MessageType::ValidatorRandomCommit
                | MessageType::ValidatorRandomReveal
                | MessageType::ValidatorIdAck
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content of a signed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "msg", rename_all = "camelCase")]
pub enum Payload {
    /// A transaction to add to the mempool.
    #[serde(rename = "tx")]
    Transaction(Transaction),

    /// Commitment to this epoch's random value.
    #[serde(rename = "validatorRandomCommit")]
    RandomCommit(Commitment),

    /// Opening of this epoch's commitment.
    #[serde(rename = "validatorRandomReveal")]
    RandomReveal(Reveal),

    /// Acknowledgement of the epoch's resolved validator.
    #[serde(rename = "validatorIdAck")]
    IdAck(IdAck),

    /// A proposed block.
    Block(Block),

    /// Opaque payload with an uninterpreted tag. Handlers ignore it.
    Other {
        tag: String,
        body: serde_json::Value,
    },
}

impl Payload {
    /// Declared type of this payload.
    pub fn message_type(&self) -> MessageType {
        match self {
            Payload::Transaction(_) => MessageType::Tx,
            Payload::RandomCommit(_) => MessageType::ValidatorRandomCommit,
            Payload::RandomReveal(_) => MessageType::ValidatorRandomReveal,
            Payload::IdAck(_) => MessageType::ValidatorIdAck,
            Payload::Block(_) => MessageType::Block,
            Payload::Other { .. } => MessageType::Other,
        }
    }

    /// Human-readable name, using the uninterpreted tag for opaque payloads.
    pub fn type_name(&self) -> &str {
        match self {
            Payload::Other { tag, .. } => tag,
            other => other.message_type().as_str(),
        }
    }
}
