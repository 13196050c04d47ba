//! Application-facing handle on the category slice.

use crate::reducer::{CategoryEnvironment, CategoryReducer};
use crate::service::CategoryService;
use crate::types::{Category, CategoryAction, CategoryId, CategoryRequest, CategoryState, NewCategory};
use shopadmin_runtime::{EffectHandle, Store, StoreConfig, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Runtime store specialized to the category slice
pub type CategoryRuntime = Store<CategoryState, CategoryAction, CategoryEnvironment, CategoryReducer>;

/// Category slice owned by the application root
///
/// Cloning is cheap and every clone shares the same state. Each trigger
/// returns an [`EffectHandle`] that completes once the request has settled
/// and its outcome has been applied.
#[derive(Clone)]
pub struct CategoryStore {
    store: CategoryRuntime,
}

impl CategoryStore {
    /// Create a store backed by `service`
    #[must_use]
    pub fn new(service: Arc<dyn CategoryService>) -> Self {
        Self::with_config(service, StoreConfig::default())
    }

    /// Create a store with custom runtime configuration
    #[must_use]
    pub fn with_config(service: Arc<dyn CategoryService>, config: StoreConfig) -> Self {
        Self {
            store: Store::with_config(
                CategoryState::default(),
                CategoryReducer::new(),
                CategoryEnvironment::new(service),
                config,
            ),
        }
    }

    /// Fetch the category list
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn list(&self) -> Result<EffectHandle, StoreError> {
        self.request(CategoryRequest::List).await
    }

    /// Create a category
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn create(&self, data: NewCategory) -> Result<EffectHandle, StoreError> {
        self.request(CategoryRequest::Create(data)).await
    }

    /// Fetch one category into `category`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn get(&self, id: impl Into<CategoryId>) -> Result<EffectHandle, StoreError> {
        self.request(CategoryRequest::GetOne(id.into())).await
    }

    /// Delete a category
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn delete(&self, id: impl Into<CategoryId>) -> Result<EffectHandle, StoreError> {
        self.request(CategoryRequest::Delete(id.into())).await
    }

    /// Update a category
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn update(&self, data: Category) -> Result<EffectHandle, StoreError> {
        self.request(CategoryRequest::Update(data)).await
    }

    /// Issue any request
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn request(&self, request: CategoryRequest) -> Result<EffectHandle, StoreError> {
        self.store.send(CategoryAction::Requested(request)).await
    }

    /// Issue a request and return the action that settled it
    ///
    /// Requests are not correlated: with several requests of the same
    /// operation in flight, the first one to settle is returned.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`] if nothing settles within `timeout`
    /// - [`StoreError::ShutdownInProgress`] once shutdown has begun
    pub async fn request_and_wait(
        &self,
        request: CategoryRequest,
        timeout: Duration,
    ) -> Result<CategoryAction, StoreError> {
        let operation = request.operation();
        self.store
            .send_and_wait_for(
                CategoryAction::Requested(request),
                move |action: &CategoryAction| action.settles(operation),
                timeout,
            )
            .await
    }

    /// Restore the initial state
    ///
    /// In-flight requests are not cancelled and still apply when they settle.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once shutdown has begun.
    pub async fn reset(&self) -> Result<(), StoreError> {
        self.store.send(CategoryAction::Reset).await.map(|_| ())
    }

    /// Clone of the current state
    pub async fn snapshot(&self) -> CategoryState {
        self.store.state(Clone::clone).await
    }

    /// Read the current state through a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&CategoryState) -> T,
    {
        self.store.state(f).await
    }

    /// Observe settled actions (`Fulfilled` / `Rejected`)
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CategoryAction> {
        self.store.subscribe_actions()
    }

    /// Number of requests still in flight
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.store.pending_effects()
    }

    /// Stop accepting requests and wait for in-flight ones to settle
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if requests are still running
    /// when `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        self.store.shutdown(timeout).await
    }

    /// Underlying runtime store
    #[must_use]
    pub const fn runtime(&self) -> &CategoryRuntime {
        &self.store
    }
}

impl std::fmt::Debug for CategoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryStore")
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}
