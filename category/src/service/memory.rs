//! In-process [`CategoryService`] for demos and tests

use super::{CategoryService, ServiceError, ServiceFuture};
use crate::types::{Category, CategoryId, DeletedCategory, ListEnvelope, NewCategory, Operation};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Deterministic category backend held in memory
///
/// Ids are assigned sequentially. Failures and latency can be injected per
/// [`Operation`], and every call is counted so tests can check that exactly
/// one backend call was made.
#[derive(Debug)]
pub struct InMemoryCategoryService {
    categories: Mutex<Vec<Category>>,
    next_id: AtomicI64,
    failures: Mutex<HashMap<Operation, ServiceError>>,
    latency: Mutex<HashMap<Operation, Duration>>,
    calls: Mutex<HashMap<Operation, usize>>,
}

impl Default for InMemoryCategoryService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCategoryService {
    /// Create an empty backend
    #[must_use]
    pub fn new() -> Self {
        Self::with_categories(Vec::new())
    }

    /// Create a backend seeded with `categories`
    ///
    /// New ids continue after the largest `i64` id in the seed.
    #[must_use]
    pub fn with_categories(categories: Vec<Category>) -> Self {
        let next_id = categories
            .iter()
            .filter_map(|category| category.id.as_i64())
            .max()
            .map_or(1, |max| max.saturating_add(1));

        Self {
            categories: Mutex::new(categories),
            next_id: AtomicI64::new(next_id),
            failures: Mutex::new(HashMap::new()),
            latency: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Make every call of `operation` fail with `error`
    #[must_use]
    pub fn with_failure(mut self, operation: Operation, error: ServiceError) -> Self {
        self.failures.get_mut().insert(operation, error);
        self
    }

    /// Delay every call of `operation` by `delay`
    #[must_use]
    pub fn with_latency(mut self, operation: Operation, delay: Duration) -> Self {
        self.latency.get_mut().insert(operation, delay);
        self
    }

    /// Set or clear the injected failure of `operation`
    pub async fn set_failure(&self, operation: Operation, error: Option<ServiceError>) {
        let mut failures = self.failures.lock().await;
        match error {
            Some(error) => failures.insert(operation, error),
            None => failures.remove(&operation),
        };
    }

    /// Number of calls made for `operation`
    pub async fn calls(&self, operation: Operation) -> usize {
        self.calls.lock().await.get(&operation).copied().unwrap_or(0)
    }

    /// Current backend contents
    pub async fn categories(&self) -> Vec<Category> {
        self.categories.lock().await.clone()
    }

    /// Count the call, apply latency, then return the injected failure if any
    async fn enter(&self, operation: Operation) -> Result<(), ServiceError> {
        *self.calls.lock().await.entry(operation).or_insert(0) += 1;

        let delay = self.latency.lock().await.get(&operation).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.failures.lock().await.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn not_found(id: &CategoryId) -> ServiceError {
    ServiceError::response(404, Some(json!({ "message": format!("Category {id} not found") })))
}

impl CategoryService for InMemoryCategoryService {
    fn get_categories(&self) -> ServiceFuture<'_, ListEnvelope<Category>> {
        Box::pin(async move {
            self.enter(Operation::List).await?;
            Ok(ListEnvelope::new(self.categories.lock().await.clone()))
        })
    }

    fn create_category(&self, data: NewCategory) -> ServiceFuture<'_, Category> {
        Box::pin(async move {
            self.enter(Operation::Create).await?;
            let category = Category {
                id: CategoryId::from(self.next_id.fetch_add(1, Ordering::SeqCst)),
                name: data.name,
                extra: data.extra,
            };
            self.categories.lock().await.push(category.clone());
            Ok(category)
        })
    }

    fn get_category(&self, id: CategoryId) -> ServiceFuture<'_, Category> {
        Box::pin(async move {
            self.enter(Operation::GetOne).await?;
            self.categories
                .lock()
                .await
                .iter()
                .find(|category| category.id == id)
                .cloned()
                .ok_or_else(|| not_found(&id))
        })
    }

    fn delete_category(&self, id: CategoryId) -> ServiceFuture<'_, DeletedCategory> {
        Box::pin(async move {
            self.enter(Operation::Delete).await?;
            let mut categories = self.categories.lock().await;
            let before = categories.len();
            categories.retain(|category| category.id != id);
            if categories.len() == before {
                return Err(not_found(&id));
            }
            Ok(DeletedCategory::new(id))
        })
    }

    fn update_category(&self, data: Category) -> ServiceFuture<'_, Category> {
        Box::pin(async move {
            self.enter(Operation::Update).await?;
            let mut categories = self.categories.lock().await;
            let slot = categories
                .iter_mut()
                .find(|category| category.id == data.id)
                .ok_or_else(|| not_found(&data.id))?;
            *slot = data.clone();
            Ok(data)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[tokio::test]
    async fn assigns_sequential_ids_after_the_seed() {
        let service = InMemoryCategoryService::with_categories(vec![
            Category::new(4, "Fruit"),
            Category::new("abc", "Dairy"),
        ]);

        let created = service.create_category(NewCategory::new("Bakery")).await.unwrap();
        assert_eq!(created.id, CategoryId::from(5));
        assert_eq!(service.categories().await.len(), 3);
    }

    #[test]
    fn seed_at_the_id_ceiling_does_not_overflow() {
        let service = InMemoryCategoryService::with_categories(vec![
            Category::new(i64::MAX, "Last"),
            Category::new(CategoryId::Number(u64::MAX.into()), "Wide"),
        ]);
        assert_eq!(service.next_id.load(Ordering::SeqCst), i64::MAX);
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let service = InMemoryCategoryService::new();
        let fruit = service.create_category(NewCategory::new("Fruit")).await.unwrap();

        let fetched = service.get_category(fruit.id.clone()).await.unwrap();
        assert_eq!(fetched, fruit);

        let renamed = Category::new(fruit.id.clone(), "Fresh Fruit");
        assert_eq!(service.update_category(renamed.clone()).await.unwrap(), renamed);

        let deleted = service.delete_category(fruit.id.clone()).await.unwrap();
        assert_eq!(deleted.id, fruit.id);
        assert!(service.get_categories().await.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let service = InMemoryCategoryService::new();
        let error = service.get_category(CategoryId::from(9)).await.unwrap_err();
        assert_eq!(error.status, Some(404));
        assert_eq!(error.into_payload().text(), "Category 9 not found");
    }

    #[tokio::test]
    async fn injected_failures_and_call_counts() {
        let service = InMemoryCategoryService::new()
            .with_failure(Operation::List, ServiceError::transport("Network Error"));

        assert!(service.get_categories().await.is_err());
        assert_eq!(service.calls(Operation::List).await, 1);

        service.set_failure(Operation::List, None).await;
        assert!(service.get_categories().await.is_ok());
        assert_eq!(service.calls(Operation::List).await, 2);
        assert_eq!(service.calls(Operation::Create).await, 0);
    }
}
