//! Request dispatch: turns a [`CategoryRequest`] into the effect that runs it.

use crate::service::{CategoryService, ServiceError};
use crate::types::{CategoryAction, CategoryRequest, CategoryResponse, Operation};
use shopadmin_core::async_effect;
use shopadmin_core::effect::Effect;
use shopadmin_runtime::metrics::SliceMetrics;
use std::sync::Arc;

/// Slice label used in metrics
pub const SLICE: &str = "category";

/// Build the effect that performs `request` against `service`.
///
/// Nothing happens until the effect is executed. When it runs it makes
/// exactly one service call and yields `Fulfilled` or `Rejected`.
#[must_use]
pub fn dispatch(request: CategoryRequest, service: Arc<dyn CategoryService>) -> Effect<CategoryAction> {
    async_effect! {
        let operation = request.operation();
        tracing::debug!(operation = %operation, "Dispatching category request");
        SliceMetrics::record_request(SLICE, operation.as_str());

        let result = match request {
            CategoryRequest::List => service.get_categories().await.map(CategoryResponse::Listed),
            CategoryRequest::Create(data) => {
                service.create_category(data).await.map(CategoryResponse::Created)
            },
            CategoryRequest::GetOne(id) => service.get_category(id).await.map(CategoryResponse::Fetched),
            CategoryRequest::Delete(id) => {
                service.delete_category(id).await.map(CategoryResponse::Deleted)
            },
            CategoryRequest::Update(data) => {
                service.update_category(data).await.map(CategoryResponse::Updated)
            },
        };

        Some(settle(operation, result))
    }
}

/// Map a service result to the action that settles the request
#[must_use]
pub fn settle(operation: Operation, result: Result<CategoryResponse, ServiceError>) -> CategoryAction {
    match result {
        Ok(response) => {
            tracing::debug!(operation = %operation, "Category request fulfilled");
            SliceMetrics::record_fulfilled(SLICE, operation.as_str());
            CategoryAction::Fulfilled(response)
        },
        Err(error) => {
            tracing::warn!(
                operation = %operation,
                status = ?error.status,
                error = %error,
                "Category request rejected"
            );
            SliceMetrics::record_rejected(SLICE, operation.as_str());
            CategoryAction::Rejected {
                operation,
                payload: error.into_payload(),
            }
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::service::InMemoryCategoryService;
    use crate::types::{Category, CategoryId, DeletedCategory, ListEnvelope, NewCategory};
    use serde_json::json;
    use shopadmin_core::ErrorPayload;
    use shopadmin_testing::effects::resolve_effects;

    fn run(request: CategoryRequest, service: Arc<InMemoryCategoryService>) -> Vec<CategoryAction> {
        let effect = dispatch(request, service);
        tokio_test::block_on(resolve_effects([effect]))
    }

    #[test]
    fn list_yields_listed() {
        let service = Arc::new(InMemoryCategoryService::with_categories(vec![Category::new(
            1, "Fruit",
        )]));

        let actions = run(CategoryRequest::List, Arc::clone(&service));
        assert_eq!(
            actions,
            vec![CategoryAction::Fulfilled(CategoryResponse::Listed(
                ListEnvelope::new(vec![Category::new(1, "Fruit")])
            ))]
        );
    }

    #[test]
    fn each_request_calls_its_service_method_once() {
        let service = Arc::new(InMemoryCategoryService::with_categories(vec![Category::new(
            1, "Fruit",
        )]));

        run(CategoryRequest::Create(NewCategory::new("Dairy")), Arc::clone(&service));
        run(CategoryRequest::GetOne(CategoryId::from(1)), Arc::clone(&service));
        run(CategoryRequest::Update(Category::new(1, "Produce")), Arc::clone(&service));
        run(CategoryRequest::Delete(CategoryId::from(2)), Arc::clone(&service));

        for operation in [Operation::Create, Operation::GetOne, Operation::Update, Operation::Delete] {
            assert_eq!(tokio_test::block_on(service.calls(operation)), 1, "{operation}");
        }
        assert_eq!(tokio_test::block_on(service.calls(Operation::List)), 0);
    }

    #[test]
    fn delete_yields_the_acknowledgement() {
        let service = Arc::new(InMemoryCategoryService::with_categories(vec![Category::new(
            1, "Fruit",
        )]));

        let actions = run(CategoryRequest::Delete(CategoryId::from(1)), service);
        assert_eq!(
            actions,
            vec![CategoryAction::Fulfilled(CategoryResponse::Deleted(DeletedCategory::new(1)))]
        );
    }

    #[test]
    fn failures_become_rejections_with_normalized_payloads() {
        let service = Arc::new(
            InMemoryCategoryService::new()
                .with_failure(
                    Operation::Create,
                    ServiceError::response(422, Some(json!({"message": "Name taken"}))),
                )
                .with_failure(Operation::List, ServiceError::transport("Network Error")),
        );

        let create = run(CategoryRequest::Create(NewCategory::new("Fruit")), Arc::clone(&service));
        assert_eq!(
            create,
            vec![CategoryAction::Rejected {
                operation: Operation::Create,
                payload: ErrorPayload::Body(json!({"message": "Name taken"})),
            }]
        );

        let list = run(CategoryRequest::List, service);
        assert_eq!(
            list,
            vec![CategoryAction::Rejected {
                operation: Operation::List,
                payload: ErrorPayload::from("Network Error"),
            }]
        );
    }

    #[test]
    fn settle_maps_results() {
        let fulfilled = settle(
            Operation::GetOne,
            Ok(CategoryResponse::Fetched(Category::new(3, "Bakery"))),
        );
        assert!(fulfilled.settles(Operation::GetOne));

        let rejected = settle(Operation::Update, Err(ServiceError::transport("timeout")));
        assert_eq!(
            rejected,
            CategoryAction::Rejected {
                operation: Operation::Update,
                payload: ErrorPayload::from("timeout"),
            }
        );
    }
}
