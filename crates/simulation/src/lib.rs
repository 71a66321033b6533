//! Deterministic simulation runner.
//!
//! This crate provides a fully deterministic simulation environment for
//! proof-of-stake protocol nodes. Given the same seed and setup, it produces
//! identical results every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  NetworkSimulator                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     EventScheduler (BTreeMap<EventKey, Event>)     │ │
//! │  │     Ordered by: time, sequence                     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     nodes: BTreeMap<NodeId, NodeRuntime + Handler> │ │
//! │  │     Each processes events sequentially             │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Actions → schedule new events                  │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod event_queue;
mod runner;
mod snapshot;

pub use config::{SimulationConfig, DEFAULT_CONTINUE_CAP, DEFAULT_MESSAGE_DELAY};
pub use error::SetupError;
pub use event_queue::{EventKey, EventScheduler};
pub use runner::{NetworkSimulator, Setup, SimulationStats};
pub use snapshot::{BlockSnapshot, NetworkSnapshot, NodeSnapshot};
