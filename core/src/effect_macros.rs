//! Shorthand for building effects.

/// Wrap an async block into [`Effect::Future`](crate::effect::Effect::Future)
///
/// The block is `async move` and must evaluate to `Option<Action>`.
///
/// ```rust
/// use shopadmin_core::{async_effect, effect::Effect};
///
/// enum Action {
///     Counted(usize),
/// }
///
/// let items = vec!["books", "games"];
/// let effect: Effect<Action> = async_effect! {
///     Some(Action::Counted(items.len()))
/// };
/// assert!(!effect.is_noop());
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(::std::boxed::Box::pin(async move { $($body)* }))
    };
}
