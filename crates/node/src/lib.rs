//! Simulated proof-of-stake node.
//!
//! [`NodeRuntime`] holds one participant's state: peers, keys, mempool,
//! block tree and the current validator-selection round. A
//! [`ProtocolHandler`] drives it one event at a time:
//!
//! ```text
//! init ──► genesis, first selectValidator timer
//! submitTransaction / tx ──► mempool, gossip
//! selectValidator ──► commit ──► (all commits) reveal
//!                            ──► (all reveals) validator = Σ mod N + 1, ack
//!                            ──► (all acks, selected) propose block
//! block ──► verify proposer and parent, insert, prune mempool, gossip
//! ```

mod block_tree;
mod config;
mod error;
mod handler;
mod mempool;
mod round;
mod runtime;

pub use block_tree::BlockTree;
pub use config::{ProtocolConfig, DEFAULT_EPOCH_INTERVAL, DEFAULT_GENESIS_MINT, MIN_EPOCH_INTERVAL};
pub use error::{Described, RejectReason};
pub use handler::{Adversary, AdversarialHandler, Handler, HonestHandler, ProtocolHandler};
pub use mempool::Mempool;
pub use round::{select_validator, ValidatorSelectionRound};
pub use runtime::{ChainState, NodeRuntime};
