//! Core traits.

use std::time::Duration;

/// Logging interface for the presentation layer.
///
/// The simulator and the protocol handlers report everything a user should
/// see through this trait. There are exactly two severities, and every
/// message is tagged with the simulation time at which it was produced.
///
/// # Example
///
/// ```ignore
/// struct Console;
///
/// impl SimLogger for Console {
///     fn info(&self, time: Duration, message: &str) {
///         println!("[INFO] [t={time:?}] {message}");
///     }
///
///     fn error(&self, time: Duration, message: &str) {
///         eprintln!("[ERROR] [t={time:?}] {message}");
///     }
/// }
/// ```
pub trait SimLogger: Send + Sync {
    /// Report progress or protocol activity.
    fn info(&self, time: Duration, message: &str);

    /// Report a failure: rejected messages, setup errors, handler faults.
    fn error(&self, time: Duration, message: &str);
}
