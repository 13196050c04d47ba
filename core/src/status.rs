//! Request lifecycle flags.
//!
//! Every slice mirrors the most recent request into the same four fields:
//! `is_loading`, `is_error`, `is_success` and `message`. The flags are
//! informative, not exclusive: a pending transition only raises
//! `is_loading` and leaves the outcome of the previous request visible.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failure payload surfaced by a rejected request.
///
/// A collaborator either answers with a structured error body (usually the
/// backend's JSON error document) or fails with nothing but a message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    /// Plain message (transport failures, or bodyless error responses)
    Message(String),
    /// Structured error body returned by the backend
    Body(Value),
}

impl ErrorPayload {
    /// Build a payload from an optional body and a fallback message.
    ///
    /// The body wins unless it is falsy: absent, `null`, `false`, `0` or an
    /// empty string. A string body is stored as a [`ErrorPayload::Message`]
    /// so the payload reads back the same after serialization.
    #[must_use]
    pub fn from_parts(body: Option<Value>, message: impl Into<String>) -> Self {
        match body {
            Some(Value::String(text)) if !text.is_empty() => Self::Message(text),
            Some(body) if !is_falsy(&body) => Self::Body(body),
            _ => Self::Message(message.into()),
        }
    }

    /// Human readable text for display.
    ///
    /// Structured bodies are rendered through their `message` field when
    /// they have a string one, otherwise as compact JSON.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Message(message) => message.clone(),
            Self::Body(Value::String(text)) => text.clone(),
            Self::Body(body) => body
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| body.to_string(), str::to_string),
        }
    }

    /// Returns `true` for the empty initial message
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Message(message) if message.is_empty())
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(text) => text.is_empty(),
        Value::Number(number) => number
            .as_f64()
            .is_some_and(|n| n.classify() == std::num::FpCategory::Zero),
        _ => false,
    }
}

impl Default for ErrorPayload {
    fn default() -> Self {
        Self::Message(String::new())
    }
}

impl std::fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

impl From<String> for ErrorPayload {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for ErrorPayload {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

/// Loading/error/success flags of the most recent request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestStatus {
    /// A request is in flight
    pub is_loading: bool,
    /// The last settled request failed
    pub is_error: bool,
    /// The last settled request succeeded
    pub is_success: bool,
    /// Failure payload, meaningful only while `is_error` is set
    pub message: ErrorPayload,
}

impl RequestStatus {
    /// Pending transition: raise `is_loading`, keep everything else.
    pub const fn begin(&mut self) {
        self.is_loading = true;
    }

    /// Fulfilled transition.
    ///
    /// `message` is left as is.
    pub const fn succeed(&mut self) {
        self.is_loading = false;
        self.is_error = false;
        self.is_success = true;
    }

    /// Rejected transition.
    pub fn fail(&mut self, payload: ErrorPayload) {
        self.is_loading = false;
        self.is_error = true;
        self.is_success = false;
        self.message = payload;
    }

    /// Returns `true` when no request has run since the last reset
    #[must_use]
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}
