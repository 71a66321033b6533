//! Signed fixture builders for test data.
//!
//! These functions create properly-signed messages that pass the
//! verification every node performs on receipt.

use crate::TestCommittee;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stakesim_messages::{IdAck, Payload, SignedMessage};
use stakesim_types::{commit, Block, BlockId, Commitment, NodeId, Reveal, Transaction, TxId};
use std::time::Duration;

/// Sign `payload` as participant `sender`.
pub fn make_signed(committee: &TestCommittee, sender: u64, payload: Payload) -> SignedMessage {
    SignedMessage::sign(NodeId(sender), payload, committee.keypair(sender))
        .expect("fixture payloads always encode")
}

/// A transfer of `amount` from `from` to `to`.
pub fn transfer(id: u64, from: u64, to: u64, amount: u64) -> Transaction {
    Transaction::transfer(TxId(id), NodeId(from), NodeId(to), amount)
}

pub fn make_signed_tx(committee: &TestCommittee, sender: u64, tx: Transaction) -> SignedMessage {
    make_signed(committee, sender, Payload::Transaction(tx))
}

/// Commit to `value` with a salt drawn from a generator seeded by `salt_seed`.
pub fn make_commitment(value: u32, salt_seed: u64) -> (Commitment, Reveal) {
    let mut rng = ChaCha8Rng::seed_from_u64(salt_seed);
    commit(value, &mut rng)
}

pub fn make_signed_commit(
    committee: &TestCommittee,
    sender: u64,
    commitment: Commitment,
) -> SignedMessage {
    make_signed(committee, sender, Payload::RandomCommit(commitment))
}

pub fn make_signed_reveal(committee: &TestCommittee, sender: u64, reveal: Reveal) -> SignedMessage {
    make_signed(committee, sender, Payload::RandomReveal(reveal))
}

/// Ack for the epoch starting at `epoch`.
pub fn make_signed_ack(committee: &TestCommittee, sender: u64, epoch: Duration) -> SignedMessage {
    make_signed(committee, sender, Payload::IdAck(IdAck::new(epoch)))
}

/// A block proposed by `proposer` on top of `parent`.
pub fn block(id: u64, parent: u64, proposer: u64, txs: Vec<Transaction>) -> Block {
    Block {
        id: BlockId(id),
        parent: Some(BlockId(parent)),
        proposer: Some(NodeId(proposer)),
        transactions: txs.into_iter().map(|tx| (tx.id, tx)).collect(),
    }
}

pub fn make_signed_block(committee: &TestCommittee, sender: u64, block: Block) -> SignedMessage {
    make_signed(committee, sender, Payload::Block(block))
}

/// Genesis block minting `amount` to every committee member.
pub fn genesis(committee: &TestCommittee, amount: u64) -> Block {
    Block::genesis(
        committee
            .ids()
            .into_iter()
            .map(|id| Transaction::mint(TxId(id.0), id, amount)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_fixtures_verify() {
        let committee = TestCommittee::new(4, 42);
        let (commitment, reveal) = make_commitment(9, 1);

        for (sender, msg) in [
            (1, make_signed_commit(&committee, 1, commitment)),
            (2, make_signed_reveal(&committee, 2, reveal)),
            (3, make_signed_ack(&committee, 3, Duration::from_secs(100))),
            (4, make_signed_block(&committee, 4, block(2, 1, 4, vec![]))),
        ] {
            assert!(msg.verify(&committee.public_key(sender)));
        }
        assert!(reveal.opens(&commitment));
    }

    #[test]
    fn test_genesis_mints_each_member() {
        let committee = TestCommittee::new(3, 42);
        let genesis = genesis(&committee, 100);
        assert_eq!(genesis.transaction_ids(), vec![TxId(1), TxId(2), TxId(3)]);
    }
}
