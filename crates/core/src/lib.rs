//! Core vocabulary shared by the node runtime and the simulator.
//!
//! - [`Event`]: something a node receives at a simulation time
//! - [`Action`]: something a node asks the simulator to do
//! - [`HandlerError`]: a fault that aborts dispatch
//! - [`SimLogger`]: the two-severity, time-tagged logging interface

mod action;
mod error;
mod event;
mod log;
mod traits;

pub use action::Action;
pub use error::HandlerError;
pub use event::{Event, EventKind};
pub use log::{LogLevel, LogRecord, RecordingLogger, TracingLogger};
pub use traits::SimLogger;
