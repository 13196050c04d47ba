//! # Shop Admin Runtime
//!
//! Runs slice reducers: a [`Store`] owns a slice's state, applies actions
//! through its reducer, executes the returned effects on tokio and feeds the
//! actions they produce back in.
//!
//! ```ignore
//! use shopadmin_runtime::Store;
//!
//! let store = Store::new(CategoryState::default(), CategoryReducer::new(), environment);
//!
//! let mut handle = store.send(CategoryAction::Requested(CategoryRequest::List)).await?;
//! handle.wait().await;
//!
//! let count = store.state(|s| s.categories.len()).await;
//! ```

use std::time::Duration;

mod handle;

pub mod error;
/// Prometheus metrics for observability
pub mod metrics;
pub mod store;

pub use error::StoreError;
pub use handle::EffectHandle;
pub use store::Store;

/// Store settings
///
/// ```
/// use shopadmin_runtime::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::default()
///     .with_broadcast_capacity(64)
///     .with_shutdown_timeout(Duration::from_secs(5));
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Settled actions buffered per observer before it starts lagging
    pub broadcast_capacity: usize,
    /// Timeout used by [`Store::shutdown_default`]
    pub default_shutdown_timeout: Duration,
}

impl StoreConfig {
    /// Set the broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Set the default shutdown timeout
    #[must_use]
    pub const fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.default_shutdown_timeout = timeout;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
            default_shutdown_timeout: Duration::from_secs(30),
        }
    }
}
