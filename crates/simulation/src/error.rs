//! Setup errors.

use thiserror::Error;

/// Failure raised while building a simulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// Setup code reported a problem.
    #[error("{0}")]
    Failed(String),

    /// Setup code panicked.
    #[error("setup panicked: {0}")]
    Panicked(String),
}

impl SetupError {
    pub fn failed(message: impl Into<String>) -> Self {
        SetupError::Failed(message.into())
    }
}
