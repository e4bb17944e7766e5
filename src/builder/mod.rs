//! Builder API for ergonomic transition construction.
//!
//! This module provides a fluent builder, shorthand constructors and the
//! `contexts!` macro for model-definition code.

pub mod error;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::core::{Action, Guard, State};
use crate::transition::Transition;

/// Create an unguarded transition targeting a registered state by name.
///
/// # Example
///
/// ```
/// use statewalk::builder::targeted_transition;
/// use statewalk::core::State;
/// use statewalk::registry;
///
/// struct Home;
/// struct Dashboard;
///
/// impl State for Home {
///     fn name(&self) -> &str {
///         "Home"
///     }
/// }
///
/// registry::global().register_type::<Dashboard>("Dashboard");
///
/// let transition = targeted_transition::<Home, ()>("Dashboard").unwrap();
/// assert!(transition.resolve_target_type().unwrap().is::<Dashboard>());
/// ```
pub fn targeted_transition<S, O>(target: impl Into<String>) -> Result<Transition<S, O>, BuildError>
where
    S: State,
{
    TransitionBuilder::new().target(target).build()
}

/// Create a transition with one guard and one action.
///
/// # Example
///
/// ```
/// use statewalk::builder::guarded_transition;
/// use statewalk::core::{NamedArgs, State};
///
/// struct Door {
///     open: bool,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         "Door"
///     }
/// }
///
/// let open_door = guarded_transition(
///     |d: &Door| !d.open,
///     |d: &mut Door| d.open = true,
/// );
///
/// let mut door = Door { open: false };
/// assert!(open_door.is_valid_for(&door, &NamedArgs::new()));
/// open_door.run(&mut door, &NamedArgs::new()).unwrap();
/// assert!(door.open);
/// ```
pub fn guarded_transition<S, O, G, A>(guard: G, action: A) -> Transition<S, O>
where
    S: State,
    G: Fn(&S) -> bool + Send + Sync + 'static,
    A: Fn(&mut S) -> O + Send + Sync + 'static,
{
    let mut transition = Transition::new();
    transition.push_guard(Guard::new(guard));
    transition.push_action(Action::new(action));
    transition
}
