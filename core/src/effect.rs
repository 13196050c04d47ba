//! Side-effect descriptions returned by reducers.

use std::future::Future;
use std::pin::Pin;

/// Work for the runtime to perform after a transition
///
/// An effect is a value: building one does nothing. The store executes it
/// and feeds any action it yields back through the reducer.
pub enum Effect<Action> {
    /// Nothing to do
    None,

    /// Children run concurrently
    Parallel(Vec<Effect<Action>>),

    /// Children run one after another, each to completion
    Sequential(Vec<Effect<Action>>),

    /// Async computation; `Some(action)` is fed back
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
}

impl<Action> Effect<Action> {
    /// Run `effects` concurrently
    #[must_use]
    pub const fn merge(effects: Vec<Self>) -> Self {
        Self::Parallel(effects)
    }

    /// Run `effects` in order
    #[must_use]
    pub const fn chain(effects: Vec<Self>) -> Self {
        Self::Sequential(effects)
    }

    /// `true` if executing this effect can never yield an action
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match self {
            Self::None => true,
            Self::Parallel(effects) | Self::Sequential(effects) => effects.iter().all(Self::is_noop),
            Self::Future(_) => false,
        }
    }
}

impl<Action> std::fmt::Debug for Effect<Action> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("Effect::None"),
            Self::Parallel(effects) => f.debug_tuple("Effect::Parallel").field(effects).finish(),
            Self::Sequential(effects) => f.debug_tuple("Effect::Sequential").field(effects).finish(),
            Self::Future(_) => f.write_str("Effect::Future(<future>)"),
        }
    }
}
