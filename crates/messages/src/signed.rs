//! Signed message envelope.

use crate::{MessageType, Payload};
use serde::{Deserialize, Serialize};
use stakesim_types::{signing, KeyPair, NodeId, PublicKey, Signature};

/// A payload signed by the node that originated it.
///
/// Gossip forwards the envelope unchanged, so `sender` always names the
/// originator and the signature stays verifiable at every hop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedMessage {
    /// Originating node.
    #[serde(rename = "src")]
    pub sender: NodeId,

    /// Message content. Its variant is the declared message type.
    #[serde(flatten)]
    pub payload: Payload,

    /// Signature over the domain-separated payload encoding.
    #[serde(rename = "sig")]
    pub signature: Signature,
}

/// Failure to produce the canonical encoding of a payload.
#[derive(Debug, thiserror::Error)]
#[error("failed to encode {message_type} payload: {source}")]
pub struct EncodeError {
    pub message_type: MessageType,
    #[source]
    pub source: serde_json::Error,
}

impl SignedMessage {
    /// Sign `payload` as `sender`.
    pub fn sign(sender: NodeId, payload: Payload, key: &KeyPair) -> Result<Self, EncodeError> {
        let message = signing_bytes(&payload)?;
        let signature = key.sign(&message);
        Ok(Self {
            sender,
            payload,
            signature,
        })
    }

    /// Declared message type.
    pub fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    /// Verify the signature against the sender's public key.
    ///
    /// A payload that cannot be encoded never verifies.
    pub fn verify(&self, public_key: &PublicKey) -> bool {
        match signing_bytes(&self.payload) {
            Ok(message) => public_key.verify(&message, &self.signature),
            Err(_) => false,
        }
    }
}

/// Build the domain-separated signing message for a payload.
pub fn signing_bytes(payload: &Payload) -> Result<Vec<u8>, EncodeError> {
    let message_type = payload.message_type();
    let body = serde_json::to_vec(payload).map_err(|source| EncodeError {
        message_type,
        source,
    })?;
    Ok(signing::signing_message(message_type.domain(), &body))
}
