//! Guard predicates for controlling transition applicability.
//!
//! Guards are boolean functions of the current state and the named arguments
//! that determine whether a transition applies right now.

use super::args::NamedArgs;
use super::state::State;
use serde_json::Value;
use std::fmt;

type Predicate<S> = Box<dyn Fn(&S, &NamedArgs) -> bool + Send + Sync>;

/// Predicate that determines if a transition applies to a state.
///
/// # Example
///
/// ```rust
/// use statewalk::core::{Guard, NamedArgs, State};
///
/// struct Inbox {
///     unread: usize,
/// }
///
/// impl State for Inbox {
///     fn name(&self) -> &str {
///         "Inbox"
///     }
/// }
///
/// let has_mail = Guard::new(|inbox: &Inbox| inbox.unread > 0);
///
/// assert!(has_mail.check(&Inbox { unread: 2 }, &NamedArgs::new()));
/// assert!(!has_mail.check(&Inbox { unread: 0 }, &NamedArgs::new()));
/// ```
pub struct Guard<S: State> {
    predicate: Predicate<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a predicate over the state alone.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(move |state: &S, _: &NamedArgs| predicate(state)),
        }
    }

    /// Create a guard from a predicate that also reads the named arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewalk::core::{Guard, NamedArgs, State};
    ///
    /// struct Catalog {
    ///     items: Vec<String>,
    /// }
    ///
    /// impl State for Catalog {
    ///     fn name(&self) -> &str {
    ///         "Catalog"
    ///     }
    /// }
    ///
    /// let lists_item = Guard::with_args(|catalog: &Catalog, args: &NamedArgs| {
    ///     args.get_str("item")
    ///         .is_some_and(|wanted| catalog.items.iter().any(|i| i == wanted))
    /// });
    ///
    /// let catalog = Catalog { items: vec!["lamp".into()] };
    /// assert!(lists_item.check(&catalog, &NamedArgs::new().with("item", "lamp")));
    /// assert!(!lists_item.check(&catalog, &NamedArgs::new().with("item", "desk")));
    /// ```
    pub fn with_args<F>(predicate: F) -> Self
    where
        F: Fn(&S, &NamedArgs) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Create a guard from a function producing a dynamic value.
    ///
    /// Only `Value::Bool(true)` passes. Truthy-looking values such as `1`,
    /// `"yes"` or a non-empty object are treated as a failed check.
    pub fn from_value<F>(predicate: F) -> Self
    where
        F: Fn(&S, &NamedArgs) -> Value + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(move |state: &S, args: &NamedArgs| {
                matches!(predicate(state, args), Value::Bool(true))
            }),
        }
    }

    /// Check if the guard allows a transition from this state.
    pub fn check(&self, state: &S, args: &NamedArgs) -> bool {
        (self.predicate)(state, args)
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
