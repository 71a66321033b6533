//! Commit-reveal validator selection.
//!
//! Each epoch every participant commits to a random value, reveals it once
//! it holds commitments from all N participants, and computes the validator
//! as `(sum of revealed values) mod N + 1` once it holds all N reveals. It
//! then acknowledges the result; the selected validator proposes after all N
//! acknowledgements arrive.

use crate::RejectReason;
use stakesim_messages::IdAck;
use stakesim_types::{Commitment, NodeId, Reveal};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// State of one epoch's validator selection.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSelectionRound {
    epoch: Duration,
    commitments: BTreeMap<NodeId, Commitment>,
    reveals: BTreeMap<NodeId, Reveal>,
    acks: BTreeSet<NodeId>,
    validator: Option<NodeId>,
    revealed: bool,
    proposed: bool,
}

impl ValidatorSelectionRound {
    /// Start a round for the epoch beginning at `epoch`.
    pub fn new(epoch: Duration) -> Self {
        Self {
            epoch,
            ..Default::default()
        }
    }

    /// Start time of this epoch.
    pub fn epoch(&self) -> Duration {
        self.epoch
    }

    /// Store `sender`'s commitment. Returns `false` if one is already stored.
    pub fn record_commitment(&mut self, sender: NodeId, commitment: Commitment) -> bool {
        if self.commitments.contains_key(&sender) {
            return false;
        }
        self.commitments.insert(sender, commitment);
        true
    }

    /// Store `sender`'s reveal after checking it against their commitment.
    ///
    /// Returns `Ok(false)` for a sender whose reveal is already stored.
    pub fn record_reveal(&mut self, sender: NodeId, reveal: Reveal) -> Result<bool, RejectReason> {
        if self.reveals.contains_key(&sender) {
            return Ok(false);
        }
        let commitment = self
            .commitments
            .get(&sender)
            .ok_or(RejectReason::MissingCommitment(sender))?;
        if !reveal.opens(commitment) {
            return Err(RejectReason::RevealMismatch(sender));
        }
        self.reveals.insert(sender, reveal);
        Ok(true)
    }

    /// Store an ack from `sender`.
    ///
    /// Returns `Ok(false)` for a sender already counted.
    pub fn record_ack(&mut self, sender: NodeId, ack: &IdAck) -> Result<bool, RejectReason> {
        if self.acks.contains(&sender) {
            return Ok(false);
        }
        if !ack.is_for(self.epoch) {
            return Err(RejectReason::StaleEpoch {
                sender,
                epoch: ack.epoch,
                current: self.epoch,
            });
        }
        self.acks.insert(sender);
        Ok(true)
    }

    /// Store this node's own commitment and the reveal that opens it.
    pub fn commit_own(&mut self, id: NodeId, commitment: Commitment, reveal: Reveal) {
        self.commitments.insert(id, commitment);
        self.reveals.insert(id, reveal);
    }

    /// Count this node's own ack for the current epoch.
    pub fn ack_own(&mut self, id: NodeId) {
        self.acks.insert(id);
    }

    pub fn commitment(&self, sender: &NodeId) -> Option<&Commitment> {
        self.commitments.get(sender)
    }

    pub fn reveal(&self, sender: &NodeId) -> Option<&Reveal> {
        self.reveals.get(sender)
    }

    pub fn has_ack(&self, sender: &NodeId) -> bool {
        self.acks.contains(sender)
    }

    pub fn commitment_count(&self) -> usize {
        self.commitments.len()
    }

    pub fn reveal_count(&self) -> usize {
        self.reveals.len()
    }

    pub fn ack_count(&self) -> usize {
        self.acks.len()
    }

    /// Resolve the validator from the stored reveals if all `participants`
    /// have revealed. Once resolved the result is fixed for the round.
    pub fn resolve(&mut self, participants: usize) -> Option<NodeId> {
        if self.validator.is_none() && participants > 0 && self.reveals.len() >= participants {
            self.validator = Some(select_validator(
                self.reveals.values().map(|r| r.value),
                participants,
            ));
        }
        self.validator
    }

    /// The resolved validator, if any.
    pub fn validator(&self) -> Option<NodeId> {
        self.validator
    }

    /// Mark the own reveal as broadcast. Returns `true` the first time.
    pub fn mark_revealed(&mut self) -> bool {
        !std::mem::replace(&mut self.revealed, true)
    }

    /// Mark the round's block as proposed. Returns `true` the first time.
    pub fn mark_proposed(&mut self) -> bool {
        !std::mem::replace(&mut self.proposed, true)
    }

    pub fn has_revealed(&self) -> bool {
        self.revealed
    }

    pub fn has_proposed(&self) -> bool {
        self.proposed
    }
}

/// `(sum of values) mod participants + 1`.
pub fn select_validator(values: impl IntoIterator<Item = u32>, participants: usize) -> NodeId {
    let sum: u64 = values.into_iter().map(u64::from).sum();
    NodeId(sum % participants as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use stakesim_types::{commit, Salt};

    #[test]
    fn test_select_validator_formula() {
        assert_eq!(select_validator([1, 2, 3, 4], 4), NodeId(3));
        assert_eq!(select_validator([0, 0, 0, 0], 4), NodeId(1));
        assert_eq!(select_validator([u32::MAX, u32::MAX], 2), NodeId(1));
    }

    #[test]
    fn test_reveal_requires_commitment() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (_, reveal) = commit(5, &mut rng);
        let mut round = ValidatorSelectionRound::new(Duration::from_secs(100));

        assert_eq!(
            round.record_reveal(NodeId(2), reveal),
            Err(RejectReason::MissingCommitment(NodeId(2)))
        );
        assert_eq!(round.reveal_count(), 0);
    }

    #[test]
    fn test_mismatched_reveal_not_counted() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let (commitment, reveal) = commit(5, &mut rng);
        let mut round = ValidatorSelectionRound::new(Duration::from_secs(100));
        round.record_commitment(NodeId(2), commitment);

        let forged = Reveal {
            value: 6,
            salt: Salt::from_bytes([0u8; 32]),
        };
        assert_eq!(
            round.record_reveal(NodeId(2), forged),
            Err(RejectReason::RevealMismatch(NodeId(2)))
        );
        assert_eq!(round.record_reveal(NodeId(2), reveal), Ok(true));
        assert_eq!(round.record_reveal(NodeId(2), reveal), Ok(false));
    }

    #[test]
    fn test_resolve_waits_for_all_reveals() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut round = ValidatorSelectionRound::new(Duration::from_secs(100));
        for (i, value) in [10u32, 20, 30].into_iter().enumerate() {
            let sender = NodeId(i as u64 + 1);
            let (commitment, reveal) = commit(value, &mut rng);
            round.record_commitment(sender, commitment);
            round.record_reveal(sender, reveal).unwrap();
        }

        assert_eq!(round.resolve(4), None);
        assert_eq!(round.resolve(3), Some(NodeId(1)));
    }

    #[test]
    fn test_stale_ack_rejected() {
        let mut round = ValidatorSelectionRound::new(Duration::from_secs(200));
        assert!(matches!(
            round.record_ack(NodeId(1), &IdAck::new(Duration::from_secs(100))),
            Err(RejectReason::StaleEpoch { .. })
        ));
        assert_eq!(round.record_ack(NodeId(1), &IdAck::new(Duration::from_secs(200))), Ok(true));
        assert_eq!(round.record_ack(NodeId(1), &IdAck::new(Duration::from_secs(200))), Ok(false));
        assert_eq!(round.ack_count(), 1);
    }

    #[test]
    fn test_progress_flags_fire_once() {
        let mut round = ValidatorSelectionRound::default();
        assert!(round.mark_revealed());
        assert!(!round.mark_revealed());
        assert!(round.mark_proposed());
        assert!(round.has_proposed());
        assert!(!round.mark_proposed());
    }
}
