//! Category state slice for the shop admin.
//!
//! Mirrors the backend's category collection into a long-lived
//! [`CategoryState`] driven by five operations: list, create, get-one,
//! delete and update. Every operation goes `pending -> fulfilled | rejected`
//! through [`CategoryReducer`]; failures become state (`is_error`,
//! `message`) and never escape as errors.
//!
//! The backend is injected as an `Arc<dyn CategoryService>`:
//! [`HttpCategoryService`] talks to a REST API, and
//! [`InMemoryCategoryService`] serves demos and tests.
//!
//! # Quick Start
//!
//! ```no_run
//! use shopadmin_category::{CategoryStore, InMemoryCategoryService, NewCategory};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CategoryStore::new(Arc::new(InMemoryCategoryService::new()));
//!
//! let mut handle = store.create(NewCategory::new("Fruit")).await?;
//! handle.wait_with_timeout(Duration::from_secs(5)).await?;
//!
//! let state = store.snapshot().await;
//! println!("Categories: {}", state.count());
//! println!("Success: {}", state.status.is_success);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod reducer;
pub mod service;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{CategoryApiConfig, ConfigError};
pub use reducer::{CategoryEnvironment, CategoryReducer};
pub use service::{
    CategoryService, HttpCategoryService, InMemoryCategoryService, ServiceError, ServiceFuture,
};
pub use store::{CategoryRuntime, CategoryStore};
pub use types::{
    Category, CategoryAction, CategoryId, CategoryRequest, CategoryResponse, CategoryState,
    DeletedCategory, ListEnvelope, NewCategory, Operation,
};
