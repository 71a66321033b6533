//! Misbehaving nodes.

use super::{protocol, Conduct, ProtocolHandler};
use crate::{NodeRuntime, ValidatorSelectionRound};
use serde::{Deserialize, Serialize};
use stakesim_core::{EventKind, HandlerError};
use stakesim_types::{NodeId, Reveal};
use std::fmt;

/// Kinds of misbehavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Adversary {
    /// Publishes a reveal whose value differs from the committed one.
    ForgedReveal,
    /// Proposes a block as soon as the validator resolves, selected or not.
    RogueProposer,
    /// Takes no part in validator selection.
    Silent,
}

impl Adversary {
    pub fn as_str(&self) -> &'static str {
        match self {
            Adversary::ForgedReveal => "forged-reveal",
            Adversary::RogueProposer => "rogue-proposer",
            Adversary::Silent => "silent",
        }
    }
}

impl fmt::Display for Adversary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs the protocol with one deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdversarialHandler {
    adversary: Adversary,
}

impl AdversarialHandler {
    pub fn new(adversary: Adversary) -> Self {
        Self { adversary }
    }

    pub fn adversary(&self) -> Adversary {
        self.adversary
    }
}

impl Conduct for AdversarialHandler {
    fn joins_selection(&self) -> bool {
        self.adversary != Adversary::Silent
    }

    fn published_reveal(&self, own: Reveal) -> Reveal {
        match self.adversary {
            Adversary::ForgedReveal => Reveal {
                value: own.value.wrapping_add(1),
                ..own
            },
            _ => own,
        }
    }

    fn ready_to_propose(&self, round: &ValidatorSelectionRound, me: NodeId, participants: usize) -> bool {
        match self.adversary {
            Adversary::RogueProposer => round.validator().is_some(),
            _ => round.validator() == Some(me) && round.ack_count() >= participants,
        }
    }
}

impl ProtocolHandler for AdversarialHandler {
    fn handle(&self, node: &mut NodeRuntime, event: &EventKind) -> Result<(), HandlerError> {
        protocol::dispatch(self, node, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use stakesim_types::commit;

    #[test]
    fn test_forged_reveal_does_not_open() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (commitment, reveal) = commit(41, &mut rng);
        let handler = AdversarialHandler::new(Adversary::ForgedReveal);

        let published = handler.published_reveal(reveal);
        assert_eq!(published.value, 42);
        assert!(!published.opens(&commitment));
    }

    #[test]
    fn test_only_silent_skips_selection() {
        assert!(!AdversarialHandler::new(Adversary::Silent).joins_selection());
        assert!(AdversarialHandler::new(Adversary::RogueProposer).joins_selection());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Adversary::RogueProposer.to_string(), "rogue-proposer");
        assert_eq!(Adversary::ForgedReveal.as_str(), "forged-reveal");
    }
}
