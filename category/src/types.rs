//! Domain types for the category slice.
//!
//! The backend owns a category's identity and full shape. This module types
//! the fields the slice relies on (`id`, `name`) and carries everything else
//! through in an open map so nothing the backend sends is lost.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use shopadmin_core::ErrorPayload;
use shopadmin_core::RequestStatus;

/// Backend-assigned category identifier.
///
/// Backends emit either numeric or string ids; both are kept as sent and
/// compared by strict equality (`1` and `"1"` are different ids). Any JSON
/// number is accepted, including ids beyond `i64` and non-integers.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryId {
    /// Numeric id (SQL-style backends)
    Number(Number),
    /// String id (document stores, UUIDs)
    Text(String),
}

impl CategoryId {
    /// The id as an `i64`, if it is an integer in range
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(id) => id.as_i64(),
            Self::Text(_) => None,
        }
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        Self::Number(id.into())
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// A product category as returned by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Any other fields the backend sends, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// Creates a category with no extra fields
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Adds a pass-through field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Fields for a category that does not exist yet
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Display name
    pub name: String,
    /// Extra fields forwarded to the backend
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewCategory {
    /// Creates a new-category payload with just a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }

    /// Adds a field forwarded to the backend
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Response envelope of the list endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    /// The listed records
    pub data: Vec<T>,
}

impl<T> ListEnvelope<T> {
    /// Wraps records in an envelope
    #[must_use]
    pub const fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Response of the delete endpoint: at least the deleted id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeletedCategory {
    /// Id of the removed category
    pub id: CategoryId,
    /// Whatever else the backend echoes back
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeletedCategory {
    /// Creates a delete acknowledgement for `id`
    #[must_use]
    pub fn new(id: impl Into<CategoryId>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }
}

/// State container of the category slice
///
/// `categories` is replaced by list results and edited element-wise by
/// create/update/delete results; `category` holds the last get-one result.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryState {
    /// Category list
    pub categories: Vec<Category>,
    /// Selected category (last get-one result)
    pub category: Option<Category>,
    /// Flags of the most recent request
    pub status: RequestStatus,
}

impl CategoryState {
    /// Creates the initial state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of listed categories
    #[must_use]
    pub fn count(&self) -> usize {
        self.categories.len()
    }

    /// Returns the first listed category with `id`
    #[must_use]
    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }
}

/// The five category operations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Fetch the whole list
    List,
    /// Create one category
    Create,
    /// Fetch one category
    GetOne,
    /// Delete one category
    Delete,
    /// Update one category
    Update,
}

impl Operation {
    /// All operations, in declaration order
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Create,
        Self::GetOne,
        Self::Delete,
        Self::Update,
    ];

    /// Stable label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Create => "create",
            Self::GetOne => "get-one",
            Self::Delete => "delete",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of an operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CategoryRequest {
    /// List all categories
    List,
    /// Create a category
    Create(NewCategory),
    /// Fetch one category by id
    GetOne(CategoryId),
    /// Delete one category by id
    Delete(CategoryId),
    /// Update a category (the id selects the record)
    Update(Category),
}

impl CategoryRequest {
    /// The operation this request runs
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::List => Operation::List,
            Self::Create(_) => Operation::Create,
            Self::GetOne(_) => Operation::GetOne,
            Self::Delete(_) => Operation::Delete,
            Self::Update(_) => Operation::Update,
        }
    }
}

/// Success payload of an operation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CategoryResponse {
    /// List result
    Listed(ListEnvelope<Category>),
    /// Created category
    Created(Category),
    /// Fetched category
    Fetched(Category),
    /// Delete acknowledgement
    Deleted(DeletedCategory),
    /// Updated category
    Updated(Category),
}

impl CategoryResponse {
    /// The operation that produced this response
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Listed(_) => Operation::List,
            Self::Created(_) => Operation::Create,
            Self::Fetched(_) => Operation::GetOne,
            Self::Deleted(_) => Operation::Delete,
            Self::Updated(_) => Operation::Update,
        }
    }
}

/// Lifecycle events of the category slice
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CategoryAction {
    /// A request was issued (pending)
    Requested(CategoryRequest),
    /// A request succeeded
    Fulfilled(CategoryResponse),
    /// A request failed
    Rejected {
        /// Operation that failed
        operation: Operation,
        /// Normalized failure payload
        payload: ErrorPayload,
    },
    /// Restore the initial state
    Reset,
}

impl CategoryAction {
    /// Returns `true` if this action settles a request of `operation`
    #[must_use]
    pub fn settles(&self, operation: Operation) -> bool {
        match self {
            Self::Fulfilled(response) => response.operation() == operation,
            Self::Rejected { operation: op, .. } => *op == operation,
            Self::Requested(_) | Self::Reset => false,
        }
    }
}
