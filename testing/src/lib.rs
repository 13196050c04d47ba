//! # Shop Admin Testing
//!
//! Testing utilities and helpers for shop admin state slices.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - [`assertions`]: Effect assertion helpers
//! - [`effects`]: Drive effect futures to the actions they produce, without a Store
//!
//! ## Example
//!
//! ```ignore
//! use shopadmin_testing::{ReducerTest, effects::resolve_effects};
//!
//! ReducerTest::new(CategoryReducer::new())
//!     .with_env(test_environment())
//!     .given_state(CategoryState::default())
//!     .when_action(CategoryAction::Reset)
//!     .then_state(|state| assert_eq!(*state, CategoryState::default()))
//!     .run();
//! ```


pub use reducer_test::{assertions, ReducerTest};

/// Effect drivers for reducer-level tests
pub mod effects {
    use futures::future::{join_all, BoxFuture, FutureExt};
    use shopadmin_core::effect::Effect;

    /// Run every effect and collect the actions they produce.
    ///
    /// Produced actions are NOT fed back into a reducer. `Parallel` children
    /// run concurrently and their actions are returned in declaration
    /// order; `Sequential` children run one after another.
    ///
    /// # Example
    ///
    /// ```
    /// use shopadmin_core::effect::Effect;
    /// use shopadmin_testing::effects::resolve_effects;
    ///
    /// let effects = vec![
    ///     Effect::None,
    ///     Effect::Future(Box::pin(async { Some(1) })),
    ///     Effect::Future(Box::pin(async { None })),
    /// ];
    /// let actions = tokio_test::block_on(resolve_effects(effects));
    /// assert_eq!(actions, vec![1]);
    /// ```
    pub async fn resolve_effects<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(resolve(effect).await);
        }
        actions
    }

    fn resolve<A: Send + 'static>(effect: Effect<A>) -> BoxFuture<'static, Vec<A>> {
        match effect {
            Effect::None => async { Vec::new() }.boxed(),
            Effect::Future(fut) => async move { fut.await.into_iter().collect() }.boxed(),
            Effect::Parallel(effects) => async move {
                join_all(effects.into_iter().map(resolve))
                    .await
                    .into_iter()
                    .flatten()
                    .collect()
            }
            .boxed(),
            Effect::Sequential(effects) => async move {
                let mut actions = Vec::new();
                for effect in effects {
                    actions.extend(resolve(effect).await);
                }
                actions
            }
            .boxed(),
        }
    }
}
