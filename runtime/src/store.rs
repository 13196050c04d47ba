//! The store: owns a slice's state and runs the effects its reducer returns.

use crate::error::StoreError;
use crate::handle::{EffectHandle, Tracker};
use crate::metrics as names;
use crate::StoreConfig;
use shopadmin_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};

/// Runtime coordinator for one reducer
///
/// - State lives behind an `RwLock`; the reducer runs under the write lock,
///   so transitions are applied one at a time.
/// - Effects run as spawned tokio tasks. Actions they produce are fed back
///   through the reducer in arrival order, then broadcast to observers.
/// - Clones share state, effects and the broadcast channel. The store is
///   owned by the application root and passed around by cloning.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    closing: Arc<AtomicBool>,
    in_flight: Tracker,
    shutdown_timeout: Duration,
    settled: broadcast::Sender<A>,
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a store with [`StoreConfig::default()`]
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self::with_config(initial_state, reducer, environment, StoreConfig::default())
    }

    /// Create a store with custom configuration
    ///
    /// ```ignore
    /// let store = Store::with_config(
    ///     CategoryState::default(),
    ///     CategoryReducer::new(),
    ///     environment,
    ///     StoreConfig::default().with_broadcast_capacity(256),
    /// );
    /// ```
    #[must_use]
    pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
        let (settled, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            closing: Arc::new(AtomicBool::new(false)),
            in_flight: Tracker::new(),
            shutdown_timeout: config.default_shutdown_timeout,
            settled,
        }
    }

    /// Timeout used by [`Store::shutdown_default`]
    #[must_use]
    pub const fn default_shutdown_timeout(&self) -> Duration {
        self.shutdown_timeout
    }

    /// Number of effects running across all actions
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.in_flight.running()
    }

    /// Send an action
    ///
    /// The reducer runs before this returns; effects are started but not
    /// awaited. Use the returned handle to wait for them.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.closing.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            metrics::counter!(names::ACTIONS_REJECTED).increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        let tracker = Tracker::new();
        let handle = tracker.handle();
        self.apply(action, &tracker).await;
        Ok(handle)
    }

    /// Send an action and wait for the first broadcast action matching
    /// `predicate`
    ///
    /// Only effect-produced actions are broadcast, never `action` itself.
    /// The returned action has already been applied to state.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`] if nothing matches within `timeout`
    /// - [`StoreError::ChannelClosed`] if the broadcast channel closes
    /// - [`StoreError::ShutdownInProgress`] once shutdown has begun
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        // Subscribe first so a fast effect cannot settle unseen
        let mut settled = self.settled.subscribe();
        self.send(action).await?;

        let wait = async {
            loop {
                match settled.recv().await {
                    Ok(candidate) if predicate(&candidate) => return Ok(candidate),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action observer lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => {
                        return Err(StoreError::ChannelClosed);
                    },
                }
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    /// Observe every action produced by effects, after it has been applied
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.settled.subscribe()
    }

    /// Read state through a closure
    ///
    /// ```ignore
    /// let count = store.state(|s| s.categories.len()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        f(&*self.state.read().await)
    }

    /// Stop accepting actions and wait for running effects to finish
    ///
    /// Effects still feed their actions back while the store drains.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] with the number of effects
    /// still running when `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        self.closing.store(true, Ordering::Release);

        let started = Instant::now();
        if tokio::time::timeout(timeout, self.in_flight.idle()).await.is_err() {
            let running = self.in_flight.running();
            tracing::error!(running, "Shutdown timed out");
            metrics::counter!(names::SHUTDOWN_TIMEOUTS).increment(1);
            return Err(StoreError::ShutdownTimeout(running));
        }

        tracing::info!(elapsed_ms = started.elapsed().as_millis(), "Store drained");
        Ok(())
    }

    /// [`Store::shutdown`] with the configured default timeout
    ///
    /// # Errors
    ///
    /// See [`Store::shutdown`].
    pub async fn shutdown_default(&self) -> Result<(), StoreError> {
        self.shutdown(self.shutdown_timeout).await
    }

    /// Run the reducer under the write lock, then start its effects
    async fn apply(&self, action: A, tracker: &Tracker) {
        metrics::counter!(names::ACTIONS_TOTAL).increment(1);

        let effects = {
            let mut state = self.state.write().await;
            let started = Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!(names::REDUCER_DURATION)
                .record(started.elapsed().as_secs_f64());
            effects
        };
        tracing::trace!(effects = effects.len(), "Reducer applied action");

        for effect in effects {
            self.execute(effect, tracker);
        }
    }

    /// Apply an effect-produced action, then broadcast it
    async fn feed_back(&self, action: A, tracker: &Tracker) {
        Box::pin(self.apply(action.clone(), tracker)).await;
        // No subscribers is fine
        let _ = self.settled.send(action);
    }

    /// Start one effect; every spawned task holds a slot in both the
    /// action's tracker and the store-wide one
    fn execute(&self, effect: Effect<A>, tracker: &Tracker) {
        match effect {
            Effect::None => {},
            Effect::Future(future) => {
                metrics::counter!(names::EFFECTS_STARTED, "type" => "future").increment(1);
                let guards = (tracker.enter(), self.in_flight.enter());
                let tracker = tracker.clone();
                let store = self.clone();

                tokio::spawn(async move {
                    let _guards = guards;
                    if let Some(action) = future.await {
                        store.feed_back(action, &tracker).await;
                    }
                });
            },
            Effect::Parallel(effects) => {
                for effect in effects {
                    self.execute(effect, tracker);
                }
            },
            Effect::Sequential(effects) => {
                metrics::counter!(names::EFFECTS_STARTED, "type" => "sequential").increment(1);
                let guards = (tracker.enter(), self.in_flight.enter());
                let store = self.clone();

                tokio::spawn(async move {
                    let _guards = guards;
                    for effect in effects {
                        let step = Tracker::new();
                        store.execute(effect, &step);
                        step.idle().await;
                    }
                });
            },
        }
    }
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            closing: Arc::clone(&self.closing),
            in_flight: self.in_flight.clone(),
            shutdown_timeout: self.shutdown_timeout,
            settled: self.settled.clone(),
        }
    }
}
