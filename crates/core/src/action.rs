//! Actions recorded by nodes for the simulator to perform.

use crate::EventKind;
use stakesim_messages::SignedMessage;
use stakesim_types::NodeId;
use std::time::Duration;

/// Side effects requested by a handler.
///
/// Handlers never touch the event queue. They record actions on their node,
/// and the simulator turns them into events once the handler returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Deliver `message` to `to` after the network message delay.
    Send { to: NodeId, message: SignedMessage },

    /// Deliver an event of `kind` to the recording node after `delay`.
    SetTimer {
        delay: Duration,
        kind: EventKind,
        is_breakpoint: bool,
    },
}

impl Action {
    /// Get a human-readable name for this action type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::Send { .. } => "Send",
            Action::SetTimer { .. } => "SetTimer",
        }
    }
}
