//! The reference protocol.

use super::{protocol, Conduct, ProtocolHandler};
use crate::NodeRuntime;
use stakesim_core::{EventKind, HandlerError};

/// Follows the protocol exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HonestHandler;

impl Conduct for HonestHandler {}

impl ProtocolHandler for HonestHandler {
    fn handle(&self, node: &mut NodeRuntime, event: &EventKind) -> Result<(), HandlerError> {
        protocol::dispatch(self, node, event)
    }
}
