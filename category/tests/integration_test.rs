//! Store-level tests for the category slice
//!
//! Drives `CategoryStore` end to end against the in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use shopadmin_category::{
    Category, CategoryAction, CategoryId, CategoryRequest, CategoryResponse, CategoryState,
    CategoryStore, InMemoryCategoryService, ListEnvelope, NewCategory, Operation, ServiceError,
};
use shopadmin_core::ErrorPayload;
use shopadmin_runtime::StoreError;
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(2);

fn store_with(service: InMemoryCategoryService) -> (CategoryStore, Arc<InMemoryCategoryService>) {
    let service = Arc::new(service);
    (CategoryStore::new(Arc::clone(&service) as _), service)
}

fn seeded() -> InMemoryCategoryService {
    InMemoryCategoryService::with_categories(vec![Category::new(1, "Fruit"), Category::new(2, "Dairy")])
}

#[tokio::test]
async fn list_scenario() {
    let (store, _) = store_with(InMemoryCategoryService::with_categories(vec![Category::new(1, "Fruit")]));

    let action = store.request_and_wait(CategoryRequest::List, WAIT).await.unwrap();

    assert_eq!(
        action,
        CategoryAction::Fulfilled(CategoryResponse::Listed(ListEnvelope::new(vec![Category::new(
            1, "Fruit"
        )])))
    );
    let state = store.snapshot().await;
    assert_eq!(state.categories, vec![Category::new(1, "Fruit")]);
    assert!(state.status.is_success);
    assert!(!state.status.is_error);
    assert!(!state.status.is_loading);
}

#[tokio::test]
async fn pending_is_visible_while_the_backend_is_slow() {
    let (store, _) = store_with(seeded().with_latency(Operation::List, Duration::from_millis(100)));

    let mut handle = store.list().await.unwrap();
    let pending = store.snapshot().await;
    assert!(pending.status.is_loading);
    assert!(pending.categories.is_empty());

    handle.wait_with_timeout(WAIT).await.unwrap();
    let settled = store.snapshot().await;
    assert!(!settled.status.is_loading);
    assert_eq!(settled.count(), 2);
}

#[tokio::test]
async fn delete_scenario() {
    let (store, _) = store_with(InMemoryCategoryService::with_categories(vec![
        Category::new(1, ""),
        Category::new(2, ""),
    ]));
    store.request_and_wait(CategoryRequest::List, WAIT).await.unwrap();

    let action = store
        .request_and_wait(CategoryRequest::Delete(CategoryId::from(1)), WAIT)
        .await
        .unwrap();

    assert!(action.settles(Operation::Delete));
    let state = store.snapshot().await;
    let ids: Vec<_> = state.categories.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, vec![CategoryId::from(2)]);
    assert_eq!(serde_json::to_value(&state.categories).unwrap(), json!([{"id": 2, "name": ""}]));
}

#[tokio::test]
async fn full_crud_cycle() {
    let (store, service) = store_with(seeded());

    store.list().await.unwrap().wait_with_timeout(WAIT).await.unwrap();
    store
        .create(NewCategory::new("Bakery"))
        .await
        .unwrap()
        .wait_with_timeout(WAIT)
        .await
        .unwrap();
    store.get(3).await.unwrap().wait_with_timeout(WAIT).await.unwrap();
    store
        .update(Category::new(2, "Dairy & Eggs"))
        .await
        .unwrap()
        .wait_with_timeout(WAIT)
        .await
        .unwrap();
    store.delete(1).await.unwrap().wait_with_timeout(WAIT).await.unwrap();

    let state = store.snapshot().await;
    assert_eq!(
        state.categories,
        vec![Category::new(2, "Dairy & Eggs"), Category::new(3, "Bakery")]
    );
    assert_eq!(state.category, Some(Category::new(3, "Bakery")));
    assert!(state.status.is_success);

    assert_eq!(service.categories().await, state.categories);
    for operation in Operation::ALL {
        assert_eq!(service.calls(operation).await, 1, "{operation}");
    }
}

#[tokio::test]
async fn create_appends_even_when_the_id_is_already_listed() {
    let (store, service) = store_with(InMemoryCategoryService::new());
    store.create(NewCategory::new("Fruit")).await.unwrap().wait_with_timeout(WAIT).await.unwrap();

    // A create result whose id is already listed is appended again
    store.list().await.unwrap().wait_with_timeout(WAIT).await.unwrap();
    let action = CategoryAction::Fulfilled(CategoryResponse::Created(Category::new(1, "Fruit")));
    store.runtime().send(action).await.unwrap();

    let state = store.snapshot().await;
    assert_eq!(state.categories, vec![Category::new(1, "Fruit"), Category::new(1, "Fruit")]);
    assert_eq!(service.categories().await.len(), 1);
}

#[tokio::test]
async fn rejection_surfaces_the_backend_body() {
    let (store, _) = store_with(seeded());
    store.list().await.unwrap().wait_with_timeout(WAIT).await.unwrap();

    let action = store
        .request_and_wait(CategoryRequest::GetOne(CategoryId::from(42)), WAIT)
        .await
        .unwrap();

    let expected = ErrorPayload::Body(json!({"message": "Category 42 not found"}));
    assert_eq!(
        action,
        CategoryAction::Rejected {
            operation: Operation::GetOne,
            payload: expected.clone(),
        }
    );
    let state = store.snapshot().await;
    assert!(state.status.is_error);
    assert!(!state.status.is_success);
    assert_eq!(state.status.message, expected);
    assert_eq!(state.count(), 2);
    assert_eq!(state.category, None);
}

#[tokio::test]
async fn transport_failure_surfaces_the_message() {
    let (store, _) = store_with(seeded().with_failure(Operation::List, ServiceError::transport("Network Error")));

    store.list().await.unwrap().wait_with_timeout(WAIT).await.unwrap();

    let state = store.snapshot().await;
    assert_eq!(state.status.message, ErrorPayload::from("Network Error"));
    assert!(state.categories.is_empty());
}

#[tokio::test]
async fn no_retry_after_failure() {
    let (store, service) = store_with(seeded().with_failure(Operation::Delete, ServiceError::response(500, None)));

    store.delete(1).await.unwrap().wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(service.calls(Operation::Delete).await, 1);
    assert_eq!(
        store.state(|s| s.status.message.clone()).await,
        ErrorPayload::from("Request failed with status code 500")
    );
}

/// The later-dispatched but faster request settles first; the slower one
/// overwrites the flags when it lands.
#[tokio::test]
async fn completions_interleave_and_last_writer_wins() {
    let (store, _) = store_with(
        seeded()
            .with_latency(Operation::List, Duration::from_millis(120))
            .with_failure(Operation::GetOne, ServiceError::transport("boom")),
    );

    let mut slow = store.list().await.unwrap();
    let mut fast = store.get(1).await.unwrap();

    fast.wait_with_timeout(WAIT).await.unwrap();
    let mid = store.snapshot().await;
    assert!(mid.status.is_error);
    assert!(mid.categories.is_empty());

    slow.wait_with_timeout(WAIT).await.unwrap();
    let end = store.snapshot().await;
    assert!(end.status.is_success);
    assert!(!end.status.is_error);
    assert_eq!(end.count(), 2);
    // Stale message from the failed get is left in place
    assert_eq!(end.status.message, ErrorPayload::from("boom"));
}

#[tokio::test]
async fn reset_does_not_cancel_in_flight_requests() {
    let (store, _) = store_with(seeded().with_latency(Operation::List, Duration::from_millis(80)));

    let mut handle = store.list().await.unwrap();
    store.reset().await.unwrap();
    assert_eq!(store.snapshot().await, CategoryState::default());

    handle.wait_with_timeout(WAIT).await.unwrap();
    let state = store.snapshot().await;
    assert_eq!(state.count(), 2);
    assert!(state.status.is_success);
}

#[tokio::test]
async fn reset_after_activity_restores_initial_state() {
    let (store, _) = store_with(seeded().with_failure(Operation::Update, ServiceError::transport("x")));
    store.list().await.unwrap().wait_with_timeout(WAIT).await.unwrap();
    store.get(2).await.unwrap().wait_with_timeout(WAIT).await.unwrap();
    store.update(Category::new(2, "y")).await.unwrap().wait_with_timeout(WAIT).await.unwrap();

    store.reset().await.unwrap();

    let state = store.snapshot().await;
    assert_eq!(state, CategoryState::default());
    assert!(state.status.message.is_empty());
}

#[tokio::test]
async fn subscribers_see_settled_actions_only() {
    let (store, _) = store_with(seeded());
    let mut rx = store.subscribe();

    store.list().await.unwrap().wait_with_timeout(WAIT).await.unwrap();
    store.reset().await.unwrap();

    let observed = rx.try_recv().unwrap();
    assert!(observed.settles(Operation::List));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn clones_share_state() {
    let (store, _) = store_with(seeded());
    let other = store.clone();

    other.list().await.unwrap().wait_with_timeout(WAIT).await.unwrap();

    assert_eq!(store.state(CategoryState::count).await, 2);
}

#[tokio::test]
async fn shutdown_drains_and_then_rejects_requests() {
    let (store, _) = store_with(seeded().with_latency(Operation::List, Duration::from_millis(50)));

    let _handle = store.list().await.unwrap();
    assert_eq!(store.in_flight(), 1);

    store.shutdown(WAIT).await.unwrap();
    assert_eq!(store.in_flight(), 0);
    assert_eq!(store.state(CategoryState::count).await, 2);

    assert!(matches!(store.list().await, Err(StoreError::ShutdownInProgress)));
    assert!(matches!(store.reset().await, Err(StoreError::ShutdownInProgress)));
}
