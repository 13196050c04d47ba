//! Category backend collaborators.
//!
//! The reducer never talks to the network itself. It is handed an
//! `Arc<dyn CategoryService>` through its environment, so production code can
//! inject [`HttpCategoryService`] and tests can inject
//! [`InMemoryCategoryService`].

use crate::types::{Category, CategoryId, DeletedCategory, ListEnvelope, NewCategory};
use serde_json::Value;
use shopadmin_core::ErrorPayload;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

mod http;
mod memory;

pub use http::HttpCategoryService;
pub use memory::InMemoryCategoryService;

/// Boxed future returned by [`CategoryService`] methods
pub type ServiceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ServiceError>> + Send + 'a>>;

/// A failed backend call.
///
/// `body` is the decoded response body when the backend answered with an
/// error status; `message` always describes the failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ServiceError {
    /// HTTP status, if a response arrived
    pub status: Option<u16>,
    /// Error body sent by the backend, if any
    pub body: Option<Value>,
    /// Human-readable failure description
    pub message: String,
}

impl ServiceError {
    /// Failure before any response arrived (connection, timeout, decoding)
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// Backend answered with a non-success status
    #[must_use]
    pub fn response(status: u16, body: Option<Value>) -> Self {
        Self {
            status: Some(status),
            body,
            message: format!("Request failed with status code {status}"),
        }
    }

    /// Normalizes into the payload stored in slice state.
    ///
    /// The backend's body wins; the message is the fallback.
    #[must_use]
    pub fn into_payload(self) -> ErrorPayload {
        ErrorPayload::from_parts(self.body, self.message)
    }
}

/// Backend operations the category slice depends on.
///
/// Each call is a single attempt. Implementations must not retry.
pub trait CategoryService: Send + Sync {
    /// Fetch the full list
    fn get_categories(&self) -> ServiceFuture<'_, ListEnvelope<Category>>;

    /// Create a category and return it with its assigned id
    fn create_category(&self, data: NewCategory) -> ServiceFuture<'_, Category>;

    /// Fetch one category
    fn get_category(&self, id: CategoryId) -> ServiceFuture<'_, Category>;

    /// Delete one category
    fn delete_category(&self, id: CategoryId) -> ServiceFuture<'_, DeletedCategory>;

    /// Replace a category; `data.id` selects the record
    fn update_category(&self, data: Category) -> ServiceFuture<'_, Category>;
}
