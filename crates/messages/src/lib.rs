//! Messages exchanged between simulated nodes.
//!
//! Messages are logical events, never bytes on a wire: the encoding below
//! only exists to give signatures a canonical input.

pub mod gossip;
mod signed;

// Re-export commonly used types
pub use gossip::{IdAck, MessageType, Payload};
pub use signed::{signing_bytes, EncodeError, SignedMessage};
