//! The reducer trait.

use crate::effect::Effect;
use smallvec::SmallVec;

/// State transition function of a slice
///
/// `reduce` mutates `state` in place and returns descriptions of the work
/// to do next. It must not perform I/O itself: anything that talks to the
/// outside world goes into a returned [`Effect`], built from collaborators
/// found in `env`.
///
/// Most transitions return nothing, and a request start returns one effect,
/// so effects come back inline in a `SmallVec`.
pub trait Reducer {
    /// State container
    type State;

    /// Lifecycle events
    type Action;

    /// Injected collaborators
    type Environment;

    /// Apply `action` to `state`
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]>;
}
