//! Protocol handlers.
//!
//! A handler is the per-node state machine: it receives one event at a time,
//! mutates the node's state and records actions. Honest and adversarial
//! handlers run the same protocol; adversaries deviate at a few fixed points
//! described by [`Conduct`].

mod adversarial;
mod honest;
mod protocol;

pub use adversarial::{Adversary, AdversarialHandler};
pub use honest::HonestHandler;

use crate::{NodeRuntime, ValidatorSelectionRound};
use stakesim_core::{EventKind, HandlerError};
use stakesim_types::{NodeId, Reveal};

/// Per-node event handler.
pub trait ProtocolHandler {
    /// Process one event for `node`.
    ///
    /// Protocol violations by other nodes are logged and dropped. An `Err`
    /// means this node cannot continue and aborts the current run call.
    fn handle(&self, node: &mut NodeRuntime, event: &EventKind) -> Result<(), HandlerError>;
}

/// Where a handler may deviate from the honest protocol.
pub(crate) trait Conduct {
    /// Whether the node commits, reveals, acknowledges and gossips
    /// validator-selection messages.
    fn joins_selection(&self) -> bool {
        true
    }

    /// The reveal to publish for the node's own commitment.
    fn published_reveal(&self, own: Reveal) -> Reveal {
        own
    }

    /// Whether the node should propose now.
    fn ready_to_propose(&self, round: &ValidatorSelectionRound, me: NodeId, participants: usize) -> bool {
        round.validator() == Some(me) && round.ack_count() >= participants
    }
}

/// The handler variants a node can be created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    Honest(HonestHandler),
    Adversarial(AdversarialHandler),
}

impl Handler {
    pub fn honest() -> Self {
        Handler::Honest(HonestHandler)
    }

    pub fn adversarial(adversary: Adversary) -> Self {
        Handler::Adversarial(AdversarialHandler::new(adversary))
    }

    /// Short label for logs and snapshots.
    pub fn label(&self) -> &'static str {
        match self {
            Handler::Honest(_) => "honest",
            Handler::Adversarial(h) => h.adversary().as_str(),
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Handler::honest()
    }
}

impl ProtocolHandler for Handler {
    fn handle(&self, node: &mut NodeRuntime, event: &EventKind) -> Result<(), HandlerError> {
        match self {
            Handler::Honest(h) => h.handle(node, event),
            Handler::Adversarial(h) => h.handle(node, event),
        }
    }
}

impl From<Adversary> for Handler {
    fn from(adversary: Adversary) -> Self {
        Handler::adversarial(adversary)
    }
}
