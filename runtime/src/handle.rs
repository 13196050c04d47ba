//! Completion tracking for running effects.
//!
//! A [`Tracker`] holds the number of effects still running in a `watch`
//! channel. Every spawned effect holds a [`TrackerGuard`] that releases its
//! slot on drop, including when the effect panics. An [`EffectHandle`] is the
//! receiving side handed to callers.

use crate::error::StoreError;
use std::time::Duration;
use tokio::sync::watch;

/// Shared count of running effects
#[derive(Clone, Debug)]
pub(crate) struct Tracker {
    running: watch::Sender<usize>,
}

impl Tracker {
    pub(crate) fn new() -> Self {
        let (running, _) = watch::channel(0);
        Self { running }
    }

    /// Take a slot for one effect; released when the guard drops
    pub(crate) fn enter(&self) -> TrackerGuard {
        self.running.send_modify(|count| *count += 1);
        TrackerGuard(self.clone())
    }

    pub(crate) fn running(&self) -> usize {
        *self.running.borrow()
    }

    pub(crate) fn handle(&self) -> EffectHandle {
        EffectHandle {
            running: self.running.subscribe(),
        }
    }

    /// Resolves once no effect holds a slot
    pub(crate) async fn idle(&self) {
        self.handle().wait().await;
    }
}

/// Releases one tracker slot on drop
pub(crate) struct TrackerGuard(Tracker);

impl Drop for TrackerGuard {
    fn drop(&mut self) {
        self.0
            .running
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// Handle on the effects started by one [`Store::send`](crate::Store::send)
///
/// The count includes effects started by the actions those effects feed
/// back, so a completed handle means the request has fully settled.
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    running: watch::Receiver<usize>,
}

impl EffectHandle {
    /// A handle with nothing to wait for
    #[must_use]
    pub fn completed() -> Self {
        let (_, running) = watch::channel(0);
        Self { running }
    }

    /// Number of effects still running
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.running.borrow()
    }

    /// Wait until every tracked effect has finished
    pub async fn wait(&mut self) {
        // A closed channel means every guard is gone
        let _ = self.running.wait_for(|count| *count == 0).await;
    }

    /// [`EffectHandle::wait`] with a deadline
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if effects are still running when
    /// `timeout` expires.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completed_handle_does_not_block() -> Result<(), StoreError> {
        let mut handle = EffectHandle::completed();
        assert_eq!(handle.pending(), 0);
        handle.wait_with_timeout(Duration::from_millis(10)).await
    }

    #[tokio::test]
    async fn handle_waits_for_every_guard() -> Result<(), StoreError> {
        let tracker = Tracker::new();
        let first = tracker.enter();
        let second = tracker.enter();
        let mut handle = tracker.handle();
        assert_eq!(handle.pending(), 2);

        drop(first);
        assert!(handle.wait_with_timeout(Duration::from_millis(20)).await.is_err());

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            drop(second);
        });
        handle.wait_with_timeout(Duration::from_secs(1)).await?;
        assert_eq!(tracker.running(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn dropped_tracker_releases_waiters() {
        let tracker = Tracker::new();
        let mut handle = tracker.handle();
        drop(tracker);
        assert!(handle.wait_with_timeout(Duration::from_millis(10)).await.is_ok());
    }
}
