//! # Shop Admin Core
//!
//! Building blocks for the shop admin state slices.
//!
//! Every resource the admin UI manages (categories, products, ...) is a
//! *slice*: a state container, a closed enum of lifecycle actions and a
//! [`Reducer`](reducer::Reducer) that mirrors each request's progress and
//! returned data into the container. Network calls never happen inside a
//! reducer; it returns [`Effect`](effect::Effect) values that the runtime
//! executes.
//!
//! [`RequestStatus`] is the loading/error/success block every slice embeds.
//!
//! ```ignore
//! use shopadmin_core::*;
//!
//! impl Reducer for TagReducer {
//!     type State = TagState;
//!     type Action = TagAction;
//!     type Environment = TagEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TagState,
//!         action: TagAction,
//!         env: &TagEnvironment,
//!     ) -> SmallVec<[Effect<TagAction>; 4]> {
//!         match action {
//!             TagAction::Requested => {
//!                 state.status.begin();
//!                 smallvec![fetch_tags(env)]
//!             }
//!             TagAction::Loaded(tags) => {
//!                 state.status.succeed();
//!                 state.tags = tags;
//!                 SmallVec::new()
//!             }
//!             TagAction::Failed(payload) => {
//!                 state.status.fail(payload);
//!                 SmallVec::new()
//!             }
//!         }
//!     }
//! }
//! ```

pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

mod effect_macros;

pub mod effect;
pub mod reducer;
/// Request status flags and failure payloads shared by every slice
pub mod status;

pub use status::{ErrorPayload, RequestStatus};
