//! Test helpers for stakesim - provides properly-signed fixtures for protocol testing.
//!
//! Keys are derived exactly as the simulator derives them, so a
//! [`TestCommittee`] built with the simulation seed signs messages that every
//! simulated node accepts.
//!
//! # Example
//!
//! ```rust
//! use stakesim_test_helpers::{fixtures, TestCommittee};
//! use stakesim_types::NodeId;
//!
//! let committee = TestCommittee::new(4, 42);
//! let msg = fixtures::make_signed_tx(&committee, 1, fixtures::transfer(10, 1, 2, 10));
//!
//! assert_eq!(msg.sender, NodeId(1));
//! assert!(msg.verify(&committee.public_key(1)));
//! ```

pub mod byzantine;
pub mod fixtures;

use stakesim_types::{KeyPair, NodeId, PublicKey};
use std::collections::BTreeMap;

/// Participants `1..=size` with deterministic key pairs.
pub struct TestCommittee {
    seed: u64,
    keypairs: BTreeMap<NodeId, KeyPair>,
}

impl std::fmt::Debug for TestCommittee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCommittee")
            .field("size", &self.keypairs.len())
            .field("seed", &self.seed)
            .finish()
    }
}

impl TestCommittee {
    /// Create a committee of `size` participants with ids `1..=size`.
    ///
    /// Uses the same derivation as the simulator, so a committee built with a
    /// run's seed holds that run's keys.
    pub fn new(size: u64, seed: u64) -> Self {
        let keypairs = (1..=size)
            .map(|id| (NodeId(id), KeyPair::for_node(seed, id)))
            .collect();
        Self { seed, keypairs }
    }

    pub fn size(&self) -> usize {
        self.keypairs.len()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the key pair of participant `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in `1..=size()`.
    pub fn keypair(&self, id: u64) -> &KeyPair {
        &self.keypairs[&NodeId(id)]
    }

    /// Get the public key of participant `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not in `1..=size()`.
    pub fn public_key(&self, id: u64) -> PublicKey {
        self.keypair(id).public_key()
    }

    /// Participant ids, ascending.
    pub fn ids(&self) -> Vec<NodeId> {
        self.keypairs.keys().copied().collect()
    }

    /// Public key of every participant, as a node's key directory holds them.
    pub fn directory(&self) -> BTreeMap<NodeId, PublicKey> {
        self.keypairs
            .iter()
            .map(|(id, kp)| (*id, kp.public_key()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_committee_creation() {
        let committee = TestCommittee::new(4, 42);

        assert_eq!(committee.size(), 4);
        assert_eq!(committee.ids().first(), Some(&NodeId(1)));
        assert_eq!(committee.ids().last(), Some(&NodeId(4)));
        assert_eq!(committee.directory().len(), 4);
    }

    #[test]
    fn test_keys_match_simulator_derivation() {
        let committee = TestCommittee::new(4, 7);
        assert_eq!(committee.public_key(3), KeyPair::for_node(7, 3).public_key());
        assert_ne!(committee.public_key(3), TestCommittee::new(4, 8).public_key(3));
    }
}
