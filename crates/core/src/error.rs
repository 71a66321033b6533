//! Faults raised while dispatching an event.

use stakesim_messages::EncodeError;
use stakesim_types::NodeId;
use thiserror::Error;

/// A fault during event dispatch.
///
/// Aborts the current `step_event` or `resume` call. State already mutated by
/// the failing handler is kept.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The node received an event before its `init` event.
    #[error("{node} received {event} before init")]
    NotInitialized { node: NodeId, event: String },

    /// The event is addressed to a node that was never created.
    #[error("no node registered with id {0}")]
    UnknownNode(NodeId),

    /// An outgoing message could not be signed.
    #[error(transparent)]
    Encoding(#[from] EncodeError),
}
