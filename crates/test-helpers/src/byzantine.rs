//! Byzantine/negative test helpers.
//!
//! These functions create messages that a correct node must reject: bad
//! signatures, tampered payloads, and reveals that do not open their
//! commitment.

use crate::TestCommittee;
use stakesim_messages::{Payload, SignedMessage};
use stakesim_types::{NodeId, Reveal, Salt};

/// A message that claims to come from `claimed_sender` but is signed by
/// `actual_signer`.
pub fn make_wrong_key_message(
    committee: &TestCommittee,
    claimed_sender: u64,
    actual_signer: u64,
    payload: Payload,
) -> SignedMessage {
    let mut message = crate::fixtures::make_signed(committee, actual_signer, payload);
    message.sender = NodeId(claimed_sender);
    message
}

/// A correctly signed message whose payload is then replaced.
///
/// The signature covers the original payload only.
pub fn make_tampered_message(
    committee: &TestCommittee,
    sender: u64,
    signed: Payload,
    delivered: Payload,
) -> SignedMessage {
    let mut message = crate::fixtures::make_signed(committee, sender, signed);
    message.payload = delivered;
    message
}

/// A reveal of a different value than the one committed in `reveal`.
pub fn forge_value(reveal: Reveal) -> Reveal {
    Reveal {
        value: reveal.value.wrapping_add(1),
        ..reveal
    }
}

/// A reveal of the committed value under a different salt.
pub fn forge_salt(reveal: Reveal) -> Reveal {
    Reveal {
        salt: Salt::from_bytes([0xab; 32]),
        ..reveal
    }
}
