//! Error types for the store runtime

use thiserror::Error;

/// Failures of the store itself.
///
/// Request failures never show up here: slices turn them into state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store has begun shutting down and refuses new actions
    #[error("Store is shutting down")]
    ShutdownInProgress,

    /// Effects were still running when the shutdown deadline passed
    #[error("Shutdown timed out with {0} effects still running")]
    ShutdownTimeout(usize),

    /// No matching action arrived before the deadline
    #[error("Timeout waiting for action")]
    Timeout,

    /// The settled-action channel is gone
    #[error("Action broadcast channel closed")]
    ChannelClosed,
}
