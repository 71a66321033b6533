//! Core types for stakesim.
//!
//! Identifiers, transactions, blocks, node display metadata, and the
//! cryptographic primitives used by protocol handlers: Ed25519 signing,
//! Blake3 hashing, and hash commitments for the commit-reveal beacon.

mod block;
mod commitment;
mod crypto;
mod hash;
mod identifiers;
mod metadata;
pub mod signing;
mod transaction;

pub use block::Block;
pub use commitment::{commit, Commitment, Reveal, Salt};
pub use crypto::{KeyPair, PublicKey, Signature};
pub use hash::Hash;
pub use identifiers::{BlockId, NodeId, TxId};
pub use metadata::{NodeMetadata, Position};
pub use transaction::Transaction;
