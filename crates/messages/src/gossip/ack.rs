//! Validator id acknowledgement.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Acknowledges that the sender resolved the validator of an epoch.
///
/// Identifies the epoch by its start time. Acks for any other epoch than the
/// receiver's current one are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAck {
    /// Start time of the acknowledged epoch.
    pub epoch: Duration,
}

impl IdAck {
    /// Create an acknowledgement for the epoch starting at `epoch`.
    pub fn new(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// Check whether this ack belongs to the epoch starting at `epoch`.
    pub fn is_for(&self, epoch: Duration) -> bool {
        self.epoch == epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_for_matches_epoch_start() {
        let ack = IdAck::new(Duration::from_secs(100));
        assert!(ack.is_for(Duration::from_secs(100)));
        assert!(!ack.is_for(Duration::from_secs(200)));
    }
}
