//! Simulation events.

use stakesim_messages::SignedMessage;
use stakesim_types::{NodeId, Transaction};
use std::fmt;
use std::time::Duration;

/// What happens when an event is dispatched.
///
/// The variant is the event's type tag; variants that carry data hold the
/// event's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Set up genesis state and start the epoch timer.
    Init,

    /// A transaction submitted locally at the destination node.
    SubmitTransaction(Transaction),

    /// Epoch timer: start a validator-selection round.
    SelectValidator,

    /// Propose a block built on the local chain head.
    ProposeBlock,

    /// Delivery of a message sent by another node.
    Message(SignedMessage),

    /// Pause marker. Carries no node-level behavior.
    Break,

    /// A type tag this build does not interpret. Handlers ignore it.
    Custom(String),
}

impl EventKind {
    /// Get the type tag of this event.
    pub fn type_name(&self) -> &str {
        match self {
            EventKind::Init => "init",
            EventKind::SubmitTransaction(_) => "submitTransaction",
            EventKind::SelectValidator => "selectValidator",
            EventKind::ProposeBlock => "proposeBlock",
            EventKind::Message(_) => "msg",
            EventKind::Break => "break",
            EventKind::Custom(tag) => tag,
        }
    }

    /// Get the message payload, for message events.
    pub fn message(&self) -> Option<&SignedMessage> {
        match self {
            EventKind::Message(message) => Some(message),
            _ => None,
        }
    }
}

/// A scheduled event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Simulation time at which the destination receives the event.
    pub time: Duration,

    /// Receiving node. `None` for markers that no node handles.
    pub destination: Option<NodeId>,

    /// Type tag and payload.
    pub kind: EventKind,

    /// Whether `resume` should pause before this event.
    pub is_breakpoint: bool,
}

impl Event {
    /// Create an event for `destination`.
    pub fn new(time: Duration, destination: NodeId, kind: EventKind) -> Self {
        Self {
            time,
            destination: Some(destination),
            kind,
            is_breakpoint: false,
        }
    }

    /// Create a pure breakpoint marker.
    pub fn breakpoint(time: Duration) -> Self {
        Self {
            time,
            destination: None,
            kind: EventKind::Break,
            is_breakpoint: true,
        }
    }

    /// Flag this event as a breakpoint.
    pub fn with_breakpoint(mut self) -> Self {
        self.is_breakpoint = true;
        self
    }

    /// Check if this event has no node to deliver to.
    ///
    /// Such events are consumed without effect when dispatched.
    pub fn is_marker(&self) -> bool {
        self.destination.is_none()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[t={:?}] {}", self.time, self.kind.type_name())?;
        if let Some(destination) = self.destination {
            write!(f, " -> {}", destination)?;
        }
        if let Some(message) = self.kind.message() {
            write!(f, " ({} from {})", message.payload.type_name(), message.sender)?;
        }
        if self.is_breakpoint {
            write!(f, " [breakpoint]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_types::TxId;

    #[test]
    fn test_breakpoint_is_marker() {
        let marker = Event::breakpoint(Duration::from_secs(1));
        assert!(marker.is_breakpoint);
        assert!(marker.is_marker());
        assert_eq!(marker.kind.type_name(), "break");
    }

    #[test]
    fn test_flagged_node_event_is_not_marker() {
        let event = Event::new(Duration::ZERO, NodeId(1), EventKind::Init).with_breakpoint();
        assert!(event.is_breakpoint);
        assert!(!event.is_marker());
    }

    #[test]
    fn test_type_names() {
        let tx = Transaction::transfer(TxId(10), NodeId(1), NodeId(2), 10);
        assert_eq!(EventKind::SubmitTransaction(tx).type_name(), "submitTransaction");
        assert_eq!(EventKind::Custom("poke".into()).type_name(), "poke");
        assert!(EventKind::SelectValidator.message().is_none());
    }

    #[test]
    fn test_display() {
        let event = Event::new(Duration::from_secs(5), NodeId(2), EventKind::SelectValidator);
        assert_eq!(event.to_string(), "[t=5s] selectValidator -> Node(2)");
    }
}
