//! Event handling shared by every handler variant.

use super::Conduct;
use crate::{NodeRuntime, RejectReason, ValidatorSelectionRound};
use rand::Rng;
use stakesim_core::{EventKind, HandlerError};
use stakesim_messages::{IdAck, Payload, SignedMessage};
use stakesim_types::{commit, Block, Commitment, Reveal, Transaction, TxId};
use tracing::{debug, trace};

pub(crate) fn dispatch<C: Conduct>(
    conduct: &C,
    node: &mut NodeRuntime,
    event: &EventKind,
) -> Result<(), HandlerError> {
    match event {
        EventKind::Init => {}
        EventKind::Break | EventKind::Custom(_) => {
            trace!(node = %node.id(), event = event.type_name(), "ignored");
            return Ok(());
        }
        _ => {
            node.state_mut(event)?;
        }
    }
    trace!(node = %node.id(), time = ?node.now(), event = event.type_name(), "handle");

    match event {
        EventKind::Init => on_init(node),
        EventKind::SubmitTransaction(tx) => on_submit_transaction(node, event, tx),
        EventKind::SelectValidator => on_select_validator(conduct, node, event),
        EventKind::ProposeBlock => {
            node.state_mut(event)?.round.mark_proposed();
            propose(node, event)
        }
        EventKind::Message(message) => on_message(conduct, node, event, message),
        EventKind::Break | EventKind::Custom(_) => Ok(()),
    }
}

fn on_init(node: &mut NodeRuntime) -> Result<(), HandlerError> {
    let amount = node.config().genesis_mint;
    let mints: Vec<_> = node
        .participants()
        .map(|p| Transaction::mint(TxId(p.0), p, amount))
        .collect();
    let count = mints.len();

    node.initialize(Block::genesis(mints));
    node.schedule_timer(node.config().epoch_delay(), EventKind::SelectValidator);
    node.log_info(format!("initialized with genesis block minting {amount} to {count} participants"));
    Ok(())
}

fn on_submit_transaction(
    node: &mut NodeRuntime,
    event: &EventKind,
    tx: &Transaction,
) -> Result<(), HandlerError> {
    node.state_mut(event)?.mempool.insert(tx.clone());
    node.log_info(format!("saved transaction {}", tx.id));
    node.broadcast_signed(Payload::Transaction(tx.clone()))?;
    Ok(())
}

fn on_select_validator<C: Conduct>(
    conduct: &C,
    node: &mut NodeRuntime,
    event: &EventKind,
) -> Result<(), HandlerError> {
    let now = node.now();
    node.state_mut(event)?.round = ValidatorSelectionRound::new(now);
    node.schedule_timer(node.config().epoch_delay(), EventKind::SelectValidator);

    if !conduct.joins_selection() {
        debug!(node = %node.id(), epoch = ?now, "skipping validator selection");
        return Ok(());
    }

    let value: u32 = node.rng().gen();
    let (commitment, reveal) = commit(value, node.rng());
    let id = node.id();
    node.state_mut(event)?.round.commit_own(id, commitment, reveal);
    node.log_info(format!("generated and committed val {value}"));
    node.broadcast_signed(Payload::RandomCommit(commitment))?;

    advance(conduct, node, event)
}

fn on_message<C: Conduct>(
    conduct: &C,
    node: &mut NodeRuntime,
    event: &EventKind,
    message: &SignedMessage,
) -> Result<(), HandlerError> {
    if let Err(reason) = node.verify(message) {
        reject(node, message, reason);
        return Ok(());
    }

    if message.message_type().is_validator_selection() && !conduct.joins_selection() {
        return Ok(());
    }

    match &message.payload {
        Payload::Transaction(tx) => on_transaction(node, event, message, tx),
        Payload::RandomCommit(commitment) => on_commit(conduct, node, event, message, commitment),
        Payload::RandomReveal(reveal) => on_reveal(conduct, node, event, message, reveal),
        Payload::IdAck(ack) => on_ack(conduct, node, event, message, ack),
        Payload::Block(block) => on_block(node, event, message, block),
        Payload::Other { tag, .. } => {
            trace!(node = %node.id(), tag = %tag, "ignoring uninterpreted message");
            Ok(())
        }
    }
}

fn on_transaction(
    node: &mut NodeRuntime,
    event: &EventKind,
    message: &SignedMessage,
    tx: &Transaction,
) -> Result<(), HandlerError> {
    let state = node.state_mut(event)?;
    if state.mempool.contains(&tx.id) || state.tree.contains_tx(&tx.id) {
        return Ok(());
    }
    state.mempool.insert(tx.clone());

    node.log_info(format!("saved transaction {}", tx.id));
    node.broadcast(message.clone());
    Ok(())
}

fn on_commit<C: Conduct>(
    conduct: &C,
    node: &mut NodeRuntime,
    event: &EventKind,
    message: &SignedMessage,
    commitment: &Commitment,
) -> Result<(), HandlerError> {
    if !node
        .state_mut(event)?
        .round
        .record_commitment(message.sender, *commitment)
    {
        return Ok(());
    }

    node.log_info(format!("received val commit from {}", message.sender));
    node.broadcast(message.clone());
    advance(conduct, node, event)
}

fn on_reveal<C: Conduct>(
    conduct: &C,
    node: &mut NodeRuntime,
    event: &EventKind,
    message: &SignedMessage,
    reveal: &Reveal,
) -> Result<(), HandlerError> {
    match node.state_mut(event)?.round.record_reveal(message.sender, *reveal) {
        Ok(true) => {}
        Ok(false) => return Ok(()),
        Err(reason) => {
            reject(node, message, reason);
            return Ok(());
        }
    }

    node.log_info(format!(
        "received val reveal from {}, val {}",
        message.sender, reveal.value
    ));
    node.broadcast(message.clone());
    advance(conduct, node, event)
}

fn on_ack<C: Conduct>(
    conduct: &C,
    node: &mut NodeRuntime,
    event: &EventKind,
    message: &SignedMessage,
    ack: &IdAck,
) -> Result<(), HandlerError> {
    let id = node.id();
    let round = &mut node.state_mut(event)?.round;
    match round.record_ack(message.sender, ack) {
        Ok(true) => {}
        Ok(false) => return Ok(()),
        Err(reason) => {
            reject(node, message, reason);
            return Ok(());
        }
    }

    if round.validator() == Some(id) {
        node.log_info(format!("received validator id ACK from {}", message.sender));
    }
    node.broadcast(message.clone());
    advance(conduct, node, event)
}

fn on_block(
    node: &mut NodeRuntime,
    event: &EventKind,
    message: &SignedMessage,
    block: &Block,
) -> Result<(), HandlerError> {
    let state = node.state_mut(event)?;
    if state.tree.contains(&block.id) {
        return Ok(());
    }

    let expected = state.round.validator();
    if expected.is_none() || block.proposer != expected {
        let reason = RejectReason::WrongProposer {
            block: block.id,
            proposer: crate::error::Described(block.proposer),
            expected: crate::error::Described(expected),
        };
        reject(node, message, reason);
        return Ok(());
    }

    if let Err(reason) = state.tree.insert(block.clone()) {
        reject(node, message, reason);
        return Ok(());
    }
    let removed = state.mempool.remove_included(block);

    debug!(node = %node.id(), block = %block.id, removed, "accepted block");
    node.log_info(format!("received block {}", block.id));
    node.broadcast(message.clone());
    Ok(())
}

/// Take every step of the selection round that the stored state allows:
/// reveal once all commitments are in, resolve and acknowledge once all
/// reveals are in, then propose if the conduct says so.
fn advance<C: Conduct>(
    conduct: &C,
    node: &mut NodeRuntime,
    event: &EventKind,
) -> Result<(), HandlerError> {
    let id = node.id();
    let participants = node.participant_count();

    let round = &mut node.state_mut(event)?.round;
    if round.commitment_count() >= participants && !round.has_revealed() {
        if let Some(own) = round.reveal(&id).copied() {
            round.mark_revealed();
            let published = conduct.published_reveal(own);
            node.log_info(format!("revealing val {}", published.value));
            node.broadcast_signed(Payload::RandomReveal(published))?;
        }
    }

    let round = &mut node.state_mut(event)?.round;
    if round.validator().is_none() {
        if let Some(validator) = round.resolve(participants) {
            let epoch = round.epoch();
            round.ack_own(id);
            node.log_info(format!("current validator {validator}"));
            node.broadcast_signed(Payload::IdAck(IdAck::new(epoch)))?;
        }
    }

    let round = &mut node.state_mut(event)?.round;
    if !round.has_proposed() && conduct.ready_to_propose(round, id, participants) {
        round.mark_proposed();
        propose(node, event)?;
    }
    Ok(())
}

fn propose(node: &mut NodeRuntime, event: &EventKind) -> Result<(), HandlerError> {
    node.log_info("proposing block");
    let id = node.id();
    let state = node.state_mut(event)?;

    let parent = state.tree.deepest().id;
    let block = Block {
        id: state.tree.max_id().next(),
        parent: Some(parent),
        proposer: Some(id),
        transactions: state.mempool.take_all(),
    };
    let block_id = block.id;
    let count = block.transaction_count();

    if let Err(reason) = state.tree.insert(block.clone()) {
        node.log_error(format!("could not extend own block tree: {reason}"));
        return Ok(());
    }

    node.log_info(format!(
        "created block {} -> {} with {count} transactions",
        parent.0, block_id.0
    ));
    node.broadcast_signed(Payload::Block(block))?;
    Ok(())
}

fn reject(node: &NodeRuntime, message: &SignedMessage, reason: RejectReason) {
    debug!(
        node = %node.id(),
        sender = %message.sender,
        kind = message.payload.type_name(),
        %reason,
        "rejected message"
    );
    node.log_error(format!(
        "rejected {} from {}: {}",
        message.payload.type_name(),
        message.sender,
        reason
    ));
}
