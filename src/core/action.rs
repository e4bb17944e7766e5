//! Side-effecting actions executed when a transition runs.

use super::args::NamedArgs;
use super::state::State;
use std::fmt;

type Effect<S, O> = Box<dyn Fn(&mut S, &NamedArgs) -> O + Send + Sync>;

/// Effect closure run against the current state.
///
/// Actions share the calling convention of [`Guard`](super::Guard) but take
/// the state mutably and return an arbitrary result.
///
/// # Example
///
/// ```rust
/// use statewalk::core::{Action, NamedArgs, State};
///
/// struct Counter {
///     value: i64,
/// }
///
/// impl State for Counter {
///     fn name(&self) -> &str {
///         "Counter"
///     }
/// }
///
/// let bump = Action::new(|c: &mut Counter| {
///     c.value += 1;
///     c.value
/// });
///
/// let mut counter = Counter { value: 1 };
/// assert_eq!(bump.invoke(&mut counter, &NamedArgs::new()), 2);
/// ```
pub struct Action<S: State, O> {
    effect: Effect<S, O>,
}

impl<S: State, O> Action<S, O> {
    /// Create an action from an effect over the state alone.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn(&mut S) -> O + Send + Sync + 'static,
    {
        Action {
            effect: Box::new(move |state: &mut S, _: &NamedArgs| effect(state)),
        }
    }

    /// Create an action from an effect that also reads the named arguments.
    pub fn with_args<F>(effect: F) -> Self
    where
        F: Fn(&mut S, &NamedArgs) -> O + Send + Sync + 'static,
    {
        Action {
            effect: Box::new(effect),
        }
    }

    /// Run the effect and return its result.
    pub fn invoke(&self, state: &mut S, args: &NamedArgs) -> O {
        (self.effect)(state, args)
    }
}

impl<S: State, O> fmt::Debug for Action<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}
