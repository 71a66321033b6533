//! Domain-separated signing for gossip messages.
//!
//! Every signed message type has a unique domain tag prefix, so a signature
//! over one message type can never be replayed as another.
//!
//! | Tag | Purpose |
//! |-----|---------|
//! | `tx:` | Transaction gossip |
//! | `validator_random_commit:` | Commit phase of validator selection |
//! | `validator_random_reveal:` | Reveal phase of validator selection |
//! | `validator_id_ack:` | Acknowledgement of the resolved validator |
//! | `block:` | Block proposals |
//!
//! The signing message is the domain tag followed by the canonical encoding
//! of the payload.

/// Domain tag for transaction gossip.
pub const DOMAIN_TX: &[u8] = b"tx:";

/// Domain tag for random value commitments.
pub const DOMAIN_RANDOM_COMMIT: &[u8] = b"validator_random_commit:";

/// Domain tag for random value reveals.
pub const DOMAIN_RANDOM_REVEAL: &[u8] = b"validator_random_reveal:";

/// Domain tag for validator id acknowledgements.
pub const DOMAIN_ID_ACK: &[u8] = b"validator_id_ack:";

/// Domain tag for block proposals.
pub const DOMAIN_BLOCK: &[u8] = b"block:";

/// Domain tag for message types this build does not interpret.
pub const DOMAIN_OTHER: &[u8] = b"other:";

/// Build the signing message for a payload under a domain tag.
pub fn signing_message(domain: &[u8], body: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(domain.len() + body.len());
    message.extend_from_slice(domain);
    message.extend_from_slice(body);
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_message_deterministic() {
        let msg1 = signing_message(DOMAIN_TX, b"{\"id\":10}");
        let msg2 = signing_message(DOMAIN_TX, b"{\"id\":10}");

        assert_eq!(msg1, msg2);
        assert!(msg1.starts_with(DOMAIN_TX));
    }

    #[test]
    fn test_different_domains_produce_different_messages() {
        let body = b"same body";

        let commit = signing_message(DOMAIN_RANDOM_COMMIT, body);
        let reveal = signing_message(DOMAIN_RANDOM_REVEAL, body);

        assert_ne!(commit, reveal);
    }
}
