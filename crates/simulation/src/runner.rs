//! Deterministic simulation runner.
//!
//! Events are dispatched one at a time in (time, insertion) order. Each
//! dispatch sets the clock, hands the event to the destination's handler and
//! turns the actions the handler recorded into new events.

use crate::event_queue::EventScheduler;
use crate::snapshot::{NetworkSnapshot, NodeSnapshot};
use crate::{SetupError, SimulationConfig};
use stakesim_core::{Action, Event, EventKind, HandlerError, SimLogger, TracingLogger};
use stakesim_node::{Handler, NodeRuntime, ProtocolHandler};
use stakesim_types::{KeyPair, NodeId, NodeMetadata, Position};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Code that builds a simulation: creates nodes and seeds events.
pub trait Setup {
    fn run(self, sim: &mut NetworkSimulator) -> Result<(), SetupError>;
}

impl<F> Setup for F
where
    F: FnOnce(&mut NetworkSimulator) -> Result<(), SetupError>,
{
    fn run(self, sim: &mut NetworkSimulator) -> Result<(), SetupError> {
        self(sim)
    }
}

/// Statistics collected during simulation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SimulationStats {
    /// Events delivered to a node.
    pub events_processed: u64,
    /// Breakpoint markers consumed without effect.
    pub breakpoints_consumed: u64,
    /// Messages scheduled for delivery.
    pub messages_sent: u64,
    /// Timers set.
    pub timers_set: u64,
    /// Dispatches that ended in a handler fault.
    pub handler_faults: u64,
}

struct SimNode {
    runtime: NodeRuntime,
    handler: Handler,
}

/// Discrete-event simulator for a network of protocol nodes.
///
/// Given the same configuration and setup, every run produces the same
/// sequence of events and the same node states.
pub struct NetworkSimulator {
    config: SimulationConfig,
    nodes: BTreeMap<NodeId, SimNode>,
    queue: EventScheduler,
    now: Duration,
    stats: SimulationStats,
    logger: Arc<dyn SimLogger>,
}

impl std::fmt::Debug for NetworkSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkSimulator")
            .field("now", &self.now)
            .field("nodes", &self.nodes.len())
            .field("pending", &self.queue.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl NetworkSimulator {
    /// Create a simulator that logs through `tracing`.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_logger(config, Arc::new(TracingLogger))
    }

    /// Create a simulator that logs through `logger`.
    pub fn with_logger(config: SimulationConfig, logger: Arc<dyn SimLogger>) -> Self {
        Self {
            config,
            nodes: BTreeMap::new(),
            queue: EventScheduler::new(),
            now: Duration::ZERO,
            stats: SimulationStats::default(),
            logger,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Setup
    // ═══════════════════════════════════════════════════════════════════════════

    /// Discard the current run and build a new one with `setup`.
    ///
    /// If setup fails or panics the error is logged, the run is left empty
    /// and `false` is returned. Actions recorded by nodes during setup are
    /// scheduled once setup returns.
    pub fn init(&mut self, setup: impl Setup) -> bool {
        self.reset();
        debug!(seed = self.config.seed, "initializing simulation");

        let outcome = catch_unwind(AssertUnwindSafe(|| setup.run(self)));
        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err),
            Err(payload) => Some(SetupError::Panicked(panic_message(payload))),
        };
        if let Some(err) = failure {
            self.logger
                .error(self.now, &format!("failed to initialize simulation: {err}"));
            self.reset();
            return false;
        }

        let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        for id in ids {
            self.flush_actions(id);
        }
        self.logger.info(
            self.now,
            &format!(
                "initialized {} nodes with {} pending events",
                self.nodes.len(),
                self.queue.len()
            ),
        );
        true
    }

    /// Register a node.
    ///
    /// The node's key pair is derived from the simulation seed and `id`, and
    /// its public key is published to every node. A node registered under an
    /// existing id replaces the previous one.
    pub fn create_node(
        &mut self,
        id: NodeId,
        name: impl Into<String>,
        position: Position,
        color: impl Into<String>,
        peers: impl IntoIterator<Item = NodeId>,
        handler: Handler,
    ) -> NodeId {
        let key = KeyPair::for_node(self.config.seed, id.0);
        let public_key = key.public_key();
        let mut runtime = NodeRuntime::new(
            id,
            NodeMetadata::new(name, position, color),
            peers,
            key,
            self.config.protocol.clone(),
            self.config.seed,
            self.logger.clone(),
        );
        runtime.set_time(self.now);

        for (other_id, other) in self.nodes.iter_mut() {
            if *other_id != id {
                runtime.register_key(*other_id, other.runtime.public_key());
            }
            other.runtime.register_key(id, public_key);
        }

        debug!(node = %id, handler = handler.label(), "created node");
        if self.nodes.insert(id, SimNode { runtime, handler }).is_some() {
            warn!(node = %id, "replaced existing node");
        }
        id
    }

    /// Add an event to the queue.
    pub fn schedule(&mut self, event: Event) {
        trace!(%event, "scheduled");
        self.queue.push(event);
    }

    /// Mutable access to a node, for setup code that sends messages or sets
    /// timers directly.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeRuntime> {
        self.nodes.get_mut(&id).map(|n| &mut n.runtime)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Execution
    // ═══════════════════════════════════════════════════════════════════════════

    /// Dispatch the next event.
    ///
    /// Returns `true` when the event was handled, was a breakpoint marker, or
    /// the queue was empty. Returns `false` after a handler fault.
    pub fn step_event(&mut self) -> bool {
        match self.queue.pop() {
            Some(event) => self.process(event),
            None => {
                self.logger.info(self.now, "no events left to process");
                true
            }
        }
    }

    /// Run until the queue is empty, the next event is a breakpoint, or the
    /// continue cap is reached.
    ///
    /// The event at the head of the queue is always dispatched first, even if
    /// it is a breakpoint, so calling `resume` again after a pause moves
    /// past the breakpoint. Returns `false` after a handler fault.
    pub fn resume(&mut self) -> bool {
        let cap = self.config.continue_cap.max(1);
        let mut dispatched = 0;

        loop {
            if dispatched >= cap {
                self.logger
                    .info(self.now, &format!("paused after {dispatched} events"));
                return true;
            }
            let Some(event) = self.queue.pop() else {
                self.logger.info(self.now, "no events left to process");
                return true;
            };
            if !self.process(event) {
                return false;
            }
            dispatched += 1;

            match self.queue.peek() {
                None => {
                    self.logger.info(self.now, "no events left to process");
                    return true;
                }
                Some(next) if next.is_breakpoint => {
                    let message = format!("stopped at breakpoint {next}");
                    self.logger.info(self.now, &message);
                    return true;
                }
                Some(_) => {}
            }
        }
    }

    fn process(&mut self, event: Event) -> bool {
        if event.time > self.now {
            self.now = event.time;
        }
        trace!(%event, "processing");

        if event.is_marker() {
            if event.is_breakpoint {
                self.stats.breakpoints_consumed += 1;
            }
            return true;
        }

        self.stats.events_processed += 1;
        match self.dispatch(event) {
            Ok(()) => true,
            Err(err) => {
                self.stats.handler_faults += 1;
                self.logger.error(self.now, &format!("handler fault: {err}"));
                false
            }
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), HandlerError> {
        let Some(destination) = event.destination else {
            return Ok(());
        };
        let now = self.now;
        let node = self
            .nodes
            .get_mut(&destination)
            .ok_or(HandlerError::UnknownNode(destination))?;

        node.runtime.set_time(now);
        let result = node.handler.handle(&mut node.runtime, &event.kind);

        // Actions recorded before a fault still take effect.
        self.flush_actions(destination);
        result
    }

    fn flush_actions(&mut self, from: NodeId) {
        let Some(node) = self.nodes.get_mut(&from) else {
            return;
        };
        let actions = node.runtime.take_actions();
        for action in actions {
            self.apply_action(from, action);
        }
    }

    fn apply_action(&mut self, from: NodeId, action: Action) {
        match action {
            Action::Send { to, message } => {
                self.stats.messages_sent += 1;
                let time = self.now + self.config.message_delay;
                self.queue
                    .push(Event::new(time, to, EventKind::Message(message)));
            }
            Action::SetTimer {
                delay,
                kind,
                is_breakpoint,
            } => {
                self.stats.timers_set += 1;
                let mut event = Event::new(self.now + delay, from, kind);
                event.is_breakpoint = is_breakpoint;
                self.queue.push(event);
            }
        }
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.queue.clear();
        self.now = Duration::ZERO;
        self.stats = SimulationStats::default();
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════════════

    /// Current simulation time.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRuntime> {
        self.nodes.get(&id).map(|n| &n.runtime)
    }

    pub fn handler(&self, id: NodeId) -> Option<&Handler> {
        self.nodes.get(&id).map(|n| &n.handler)
    }

    /// All nodes, ascending by id.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRuntime> {
        self.nodes.values().map(|n| &n.runtime)
    }

    /// Pending events in dispatch order.
    pub fn pending(&self) -> impl Iterator<Item = &Event> {
        self.queue.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// The event the next step would dispatch.
    pub fn next_event(&self) -> Option<&Event> {
        self.queue.peek()
    }

    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            time: self.now,
            pending_events: self.queue.len(),
            nodes: self
                .nodes
                .values()
                .map(|n| NodeSnapshot::capture(&n.runtime, n.handler.label()))
                .collect(),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stakesim_core::RecordingLogger;

    fn simulator() -> (NetworkSimulator, Arc<RecordingLogger>) {
        let logger = Arc::new(RecordingLogger::new());
        let sim = NetworkSimulator::with_logger(SimulationConfig::default(), logger.clone());
        (sim, logger)
    }

    fn add(sim: &mut NetworkSimulator, id: u64, peers: &[u64]) {
        sim.create_node(
            NodeId(id),
            format!("n{id}"),
            Position::new(0.5, 0.5),
            "teal",
            peers.iter().map(|p| NodeId(*p)),
            Handler::honest(),
        );
    }

    #[test]
    fn test_create_node_publishes_keys_everywhere() {
        let (mut sim, _) = simulator();
        assert!(sim.init(|sim: &mut NetworkSimulator| -> Result<(), SetupError> {
            add(sim, 1, &[2]);
            add(sim, 2, &[1]);
            add(sim, 3, &[1]);
            Ok(())
        }));

        for node in sim.nodes() {
            assert_eq!(node.participant_count(), 3);
        }
        let key = KeyPair::for_node(0, 2).public_key();
        assert_eq!(sim.node(NodeId(1)).unwrap().key_of(&NodeId(2)), Some(&key));
    }

    #[test]
    fn test_setup_error_leaves_empty_run() {
        let (mut sim, logger) = simulator();
        let ok = sim.init(|sim: &mut NetworkSimulator| -> Result<(), SetupError> {
            add(sim, 1, &[]);
            sim.schedule(Event::new(Duration::ZERO, NodeId(1), EventKind::Init));
            Err(SetupError::failed("bad topology"))
        });

        assert!(!ok);
        assert_eq!(sim.nodes().count(), 0);
        assert_eq!(sim.pending_count(), 0);
        assert!(logger.errors()[0].contains("bad topology"));
    }

    #[test]
    fn test_setup_panic_is_caught() {
        let (mut sim, logger) = simulator();
        let ok = sim.init(|_: &mut NetworkSimulator| -> Result<(), SetupError> {
            panic!("script exploded")
        });

        assert!(!ok);
        assert!(logger.errors()[0].contains("setup panicked: script exploded"));
    }

    #[test]
    fn test_step_on_empty_queue_is_noop() {
        let (mut sim, logger) = simulator();
        assert!(sim.step_event());
        assert_eq!(sim.now(), Duration::ZERO);
        assert!(logger.contains("no events left"));
    }

    #[test]
    fn test_event_for_unknown_node_is_fault() {
        let (mut sim, logger) = simulator();
        sim.schedule(Event::new(Duration::from_secs(1), NodeId(9), EventKind::Init));

        assert!(!sim.step_event());
        assert_eq!(sim.stats().handler_faults, 1);
        assert!(logger.errors()[0].contains("no node registered"));
    }

    #[test]
    fn test_setup_actions_are_flushed() {
        let (mut sim, _) = simulator();
        assert!(sim.init(|sim: &mut NetworkSimulator| -> Result<(), SetupError> {
            add(sim, 1, &[]);
            let node = sim
                .node_mut(NodeId(1))
                .ok_or_else(|| SetupError::failed("missing node"))?;
            node.schedule_breakpoint(Duration::from_secs(5), EventKind::Custom("poke".into()));
            Ok(())
        }));

        let next = sim.next_event().unwrap();
        assert_eq!(next.time, Duration::from_secs(5));
        assert!(next.is_breakpoint);
        assert_eq!(next.kind.type_name(), "poke");
    }

    #[test]
    fn test_clock_never_moves_backwards() {
        let (mut sim, _) = simulator();
        sim.schedule(Event::breakpoint(Duration::from_secs(10)));
        assert!(sim.step_event());
        sim.schedule(Event::breakpoint(Duration::from_secs(3)));
        assert!(sim.step_event());

        assert_eq!(sim.now(), Duration::from_secs(10));
        assert_eq!(sim.stats().breakpoints_consumed, 2);
    }
}
