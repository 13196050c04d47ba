//! Reducer for the category slice.
//!
//! Each operation is an independent `idle -> pending -> fulfilled | rejected`
//! cycle over the shared [`CategoryState`]. Pending only raises
//! `is_loading`; completions apply in arrival order and the last one wins
//! the flags.

use crate::dispatch::dispatch;
use crate::service::CategoryService;
use crate::types::{CategoryAction, CategoryResponse, CategoryState};
use shopadmin_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Collaborators injected into the category reducer
#[derive(Clone)]
pub struct CategoryEnvironment {
    /// Backend the dispatch effects call
    pub service: Arc<dyn CategoryService>,
}

impl CategoryEnvironment {
    /// Create an environment around `service`
    #[must_use]
    pub fn new(service: Arc<dyn CategoryService>) -> Self {
        Self { service }
    }
}

impl std::fmt::Debug for CategoryEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the category slice
#[derive(Clone, Debug, Default)]
pub struct CategoryReducer;

impl CategoryReducer {
    /// Creates a new `CategoryReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn merge(state: &mut CategoryState, response: CategoryResponse) {
        match response {
            CategoryResponse::Listed(envelope) => {
                state.categories = envelope.data;
            },
            // Appends without an id check, so a repeated id is kept twice.
            CategoryResponse::Created(category) => {
                state.categories.push(category);
            },
            CategoryResponse::Fetched(category) => {
                state.category = Some(category);
            },
            CategoryResponse::Deleted(deleted) => {
                state.categories.retain(|category| category.id != deleted.id);
            },
            CategoryResponse::Updated(updated) => {
                for slot in state.categories.iter_mut().filter(|c| c.id == updated.id) {
                    slot.clone_from(&updated);
                }
            },
        }
    }
}

impl Reducer for CategoryReducer {
    type State = CategoryState;
    type Action = CategoryAction;
    type Environment = CategoryEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CategoryAction::Requested(request) => {
                state.status.begin();
                smallvec![dispatch(request, Arc::clone(&env.service))]
            },
            CategoryAction::Fulfilled(response) => {
                state.status.succeed();
                Self::merge(state, response);
                SmallVec::new()
            },
            CategoryAction::Rejected { payload, .. } => {
                state.status.fail(payload);
                SmallVec::new()
            },
            CategoryAction::Reset => {
                *state = CategoryState::default();
                SmallVec::new()
            },
        }
    }
}
