//! Per-node state and the operations handlers use to act on the network.

use crate::{BlockTree, Mempool, ProtocolConfig, RejectReason, ValidatorSelectionRound};
use indexmap::IndexSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use stakesim_core::{Action, EventKind, HandlerError, SimLogger};
use stakesim_messages::{Payload, SignedMessage};
use stakesim_types::{Block, KeyPair, NodeId, NodeMetadata, PublicKey};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Protocol state created by `init`.
#[derive(Debug, Clone)]
pub struct ChainState {
    pub mempool: Mempool,
    pub tree: BlockTree,
    pub round: ValidatorSelectionRound,
}

/// A simulated participant.
///
/// Handlers mutate this state and record [`Action`]s through [`send`],
/// [`broadcast`] and [`schedule_timer`]. The simulator drains the actions
/// after each dispatch and turns them into events.
///
/// [`send`]: NodeRuntime::send
/// [`broadcast`]: NodeRuntime::broadcast
/// [`schedule_timer`]: NodeRuntime::schedule_timer
pub struct NodeRuntime {
    id: NodeId,
    metadata: NodeMetadata,
    /// Neighbors in insertion order. Never contains `id`.
    peers: IndexSet<NodeId>,
    config: ProtocolConfig,

    key: KeyPair,
    /// Public key of every participant, this node included.
    directory: BTreeMap<NodeId, PublicKey>,

    rng: ChaCha8Rng,
    now: Duration,
    state: Option<ChainState>,
    outbox: Vec<Action>,
    logger: Arc<dyn SimLogger>,
}

impl std::fmt::Debug for NodeRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRuntime")
            .field("id", &self.id)
            .field("name", &self.metadata.name)
            .field("peers", &self.peers)
            .field("now", &self.now)
            .field("initialized", &self.state.is_some())
            .finish()
    }
}

impl NodeRuntime {
    /// Create a node that has not yet received `init`.
    ///
    /// Peers equal to `id` and repeated peers are dropped. The node's RNG is
    /// seeded from `run_seed` and `id`.
    pub fn new(
        id: NodeId,
        metadata: NodeMetadata,
        peers: impl IntoIterator<Item = NodeId>,
        key: KeyPair,
        config: ProtocolConfig,
        run_seed: u64,
        logger: Arc<dyn SimLogger>,
    ) -> Self {
        let peers = peers.into_iter().filter(|p| *p != id).collect();
        let rng_seed = run_seed ^ id.0.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        let mut directory = BTreeMap::new();
        directory.insert(id, key.public_key());

        Self {
            id,
            metadata,
            peers,
            config,
            key,
            directory,
            rng: ChaCha8Rng::seed_from_u64(rng_seed),
            now: Duration::ZERO,
            state: None,
            outbox: Vec::new(),
            logger,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn peers(&self) -> &IndexSet<NodeId> {
        &self.peers
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    pub fn public_key(&self) -> PublicKey {
        self.key.public_key()
    }

    /// Current simulation time as seen by this node.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Advance the node's clock. Time never moves backwards.
    pub fn set_time(&mut self, now: Duration) {
        if now > self.now {
            self.now = now;
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Key directory
    // ═══════════════════════════════════════════════════════════════════════════

    /// Publish a participant's public key to this node.
    pub fn register_key(&mut self, node: NodeId, key: PublicKey) {
        self.directory.insert(node, key);
    }

    pub fn key_of(&self, node: &NodeId) -> Option<&PublicKey> {
        self.directory.get(node)
    }

    /// Participant ids, ascending.
    pub fn participants(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.directory.keys().copied()
    }

    /// Number of participants, N in the selection arithmetic.
    pub fn participant_count(&self) -> usize {
        self.directory.len()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Protocol state
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Reset protocol state around `genesis`.
    pub fn initialize(&mut self, genesis: Block) {
        self.state = Some(ChainState {
            mempool: Mempool::new(),
            tree: BlockTree::new(genesis),
            round: ValidatorSelectionRound::default(),
        });
    }

    pub fn state(&self) -> Option<&ChainState> {
        self.state.as_ref()
    }

    /// Get the protocol state, failing for a node that has not seen `init`.
    pub fn state_mut(&mut self, event: &EventKind) -> Result<&mut ChainState, HandlerError> {
        let id = self.id;
        self.state.as_mut().ok_or_else(|| HandlerError::NotInitialized {
            node: id,
            event: event.type_name().to_string(),
        })
    }

    pub fn mempool(&self) -> Option<&Mempool> {
        self.state.as_ref().map(|s| &s.mempool)
    }

    pub fn tree(&self) -> Option<&BlockTree> {
        self.state.as_ref().map(|s| &s.tree)
    }

    pub fn round(&self) -> Option<&ValidatorSelectionRound> {
        self.state.as_ref().map(|s| &s.round)
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Messaging
    // ═══════════════════════════════════════════════════════════════════════════

    /// Sign `payload` as this node.
    pub fn sign(&self, payload: Payload) -> Result<SignedMessage, HandlerError> {
        Ok(SignedMessage::sign(self.id, payload, &self.key)?)
    }

    /// Check that `message` is signed by its claimed sender.
    pub fn verify(&self, message: &SignedMessage) -> Result<(), RejectReason> {
        let key = self
            .directory
            .get(&message.sender)
            .ok_or(RejectReason::UnknownSender(message.sender))?;
        if !message.verify(key) {
            return Err(RejectReason::InvalidSignature {
                sender: message.sender,
                message_type: message.message_type(),
            });
        }
        Ok(())
    }

    /// Queue `message` for delivery to `to`.
    pub fn send(&mut self, to: NodeId, message: SignedMessage) {
        trace!(node = %self.id, %to, kind = message.payload.type_name(), "send");
        self.outbox.push(Action::Send { to, message });
    }

    /// Queue `message` for every peer, in peer order.
    pub fn broadcast(&mut self, message: SignedMessage) {
        let peers: Vec<NodeId> = self.peers.iter().copied().collect();
        for to in peers {
            self.send(to, message.clone());
        }
    }

    /// Sign `payload` and broadcast it.
    pub fn broadcast_signed(&mut self, payload: Payload) -> Result<SignedMessage, HandlerError> {
        let message = self.sign(payload)?;
        self.broadcast(message.clone());
        Ok(message)
    }

    /// Queue an event of `kind` for this node after `delay`.
    pub fn schedule_timer(&mut self, delay: Duration, kind: EventKind) {
        self.outbox.push(Action::SetTimer {
            delay,
            kind,
            is_breakpoint: false,
        });
    }

    /// Like [`schedule_timer`](Self::schedule_timer), flagged as a breakpoint.
    pub fn schedule_breakpoint(&mut self, delay: Duration, kind: EventKind) {
        self.outbox.push(Action::SetTimer {
            delay,
            kind,
            is_breakpoint: true,
        });
    }

    /// Take the actions recorded since the last call.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.outbox)
    }

    pub fn pending_actions(&self) -> &[Action] {
        &self.outbox
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Logging
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn log_info(&self, message: impl AsRef<str>) {
        self.logger
            .info(self.now, &format!("[{}] {}", self.metadata.name, message.as_ref()));
    }

    pub fn log_error(&self, message: impl AsRef<str>) {
        self.logger
            .error(self.now, &format!("[{}] {}", self.metadata.name, message.as_ref()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_core::RecordingLogger;
    use stakesim_messages::IdAck;
    use stakesim_types::Position;

    fn node(id: u64, peers: &[u64], logger: Arc<RecordingLogger>) -> NodeRuntime {
        NodeRuntime::new(
            NodeId(id),
            NodeMetadata::new(format!("n{id}"), Position::new(0.5, 0.5), "teal"),
            peers.iter().map(|p| NodeId(*p)),
            KeyPair::for_node(0, id),
            ProtocolConfig::default(),
            0,
            logger,
        )
    }

    #[test]
    fn test_peers_drop_self_and_duplicates() {
        let n = node(1, &[3, 1, 2, 3], Arc::new(RecordingLogger::new()));
        assert_eq!(n.peers().iter().copied().collect::<Vec<_>>(), vec![NodeId(3), NodeId(2)]);
        assert_eq!(n.participant_count(), 1);
    }

    #[test]
    fn test_broadcast_sends_to_each_peer_in_order() {
        let mut n = node(1, &[3, 2], Arc::new(RecordingLogger::new()));
        n.broadcast_signed(Payload::IdAck(IdAck::new(Duration::ZERO)))
            .unwrap();

        let targets: Vec<_> = n
            .take_actions()
            .into_iter()
            .map(|a| match a {
                Action::Send { to, .. } => to,
                other => panic!("unexpected {}", other.type_name()),
            })
            .collect();
        assert_eq!(targets, vec![NodeId(3), NodeId(2)]);
        assert!(n.pending_actions().is_empty());
    }

    #[test]
    fn test_verify_uses_directory() {
        let logger = Arc::new(RecordingLogger::new());
        let mut a = node(1, &[2], logger.clone());
        let b = node(2, &[1], logger);
        let msg = b.sign(Payload::IdAck(IdAck::new(Duration::ZERO))).unwrap();

        assert_eq!(a.verify(&msg), Err(RejectReason::UnknownSender(NodeId(2))));
        a.register_key(NodeId(2), b.public_key());
        assert_eq!(a.verify(&msg), Ok(()));

        a.register_key(NodeId(2), a.public_key());
        assert!(matches!(a.verify(&msg), Err(RejectReason::InvalidSignature { .. })));
    }

    #[test]
    fn test_state_before_init_is_error() {
        let mut n = node(1, &[], Arc::new(RecordingLogger::new()));
        let err = n.state_mut(&EventKind::SelectValidator).unwrap_err();
        assert!(matches!(err, HandlerError::NotInitialized { .. }));
        assert!(!n.is_initialized());
    }

    #[test]
    fn test_logs_are_prefixed_with_name() {
        let logger = Arc::new(RecordingLogger::new());
        let mut n = node(4, &[], logger.clone());
        n.set_time(Duration::from_secs(7));
        n.set_time(Duration::from_secs(3));
        n.log_error("bad block");

        let records = logger.records();
        assert_eq!(records[0].message, "[n4] bad block");
        assert_eq!(records[0].time, Duration::from_secs(7));
    }
}
