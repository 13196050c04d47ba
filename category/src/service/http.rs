//! REST implementation of [`CategoryService`]

use super::{CategoryService, ServiceError, ServiceFuture};
use crate::config::{CategoryApiConfig, ConfigError};
use crate::types::{Category, CategoryId, DeletedCategory, ListEnvelope, NewCategory};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Category backend reached over HTTP
#[derive(Clone, Debug)]
pub struct HttpCategoryService {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpCategoryService {
    /// Create a client for the configured backend
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the base URL cannot carry
    /// a path, or [`ConfigError::HttpClient`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &CategoryApiConfig) -> Result<Self, ConfigError> {
        let raw = config.base_url.trim_end_matches('/');
        let base_url = Url::parse(raw)
            .map_err(|e| e.to_string())
            .and_then(|url| {
                if url.cannot_be_a_base() {
                    Err("cannot be a base URL".to_string())
                } else {
                    Ok(url)
                }
            })
            .map_err(|reason| ConfigError::InvalidValue {
                var: "CATEGORY_API_BASE_URL",
                value: config.base_url.clone(),
                reason,
            })?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Create a client from `CATEGORY_API_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the environment is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&CategoryApiConfig::from_env()?)
    }

    /// Backend base URL
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` with `segments` appended, each percent-encoded
    fn route(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base can carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn collection_url(&self) -> Url {
        self.route(&["category", ""])
    }

    fn item_url(&self, id: &CategoryId) -> Url {
        self.route(&["category", &id.to_string()])
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(method = %method, url = %url, "Sending category request");
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Category backend responded");

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ServiceError::transport(format!("Response parsing failed: {e}")))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(error_from_response(status.as_u16(), &text))
        }
    }
}

/// Build the error for a non-success response.
///
/// A JSON body is kept as parsed; anything else is kept as text and ends
/// up as a plain message payload.
fn error_from_response(status: u16, text: &str) -> ServiceError {
    let body = if text.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str::<Value>(text).unwrap_or_else(|_| Value::String(text.to_string())))
    };
    ServiceError::response(status, body)
}

impl CategoryService for HttpCategoryService {
    fn get_categories(&self) -> ServiceFuture<'_, ListEnvelope<Category>> {
        Box::pin(async move {
            let url = self.collection_url();
            self.execute(self.request(Method::GET, url)).await
        })
    }

    fn create_category(&self, data: NewCategory) -> ServiceFuture<'_, Category> {
        Box::pin(async move {
            let url = self.collection_url();
            self.execute(self.request(Method::POST, url).json(&data)).await
        })
    }

    fn get_category(&self, id: CategoryId) -> ServiceFuture<'_, Category> {
        Box::pin(async move {
            let url = self.item_url(&id);
            self.execute(self.request(Method::GET, url)).await
        })
    }

    fn delete_category(&self, id: CategoryId) -> ServiceFuture<'_, DeletedCategory> {
        Box::pin(async move {
            let url = self.item_url(&id);
            self.execute(self.request(Method::DELETE, url)).await
        })
    }

    fn update_category(&self, data: Category) -> ServiceFuture<'_, Category> {
        Box::pin(async move {
            let url = self.item_url(&data.id);
            self.execute(self.request(Method::PUT, url).json(&data)).await
        })
    }
}
