//! Core State trait for current-state objects.
//!
//! A current state is the live object a transition is evaluated and executed
//! against: a page object wrapping a browser handle, a screen model of a
//! device, a plain counter in tests. Unlike a state *label*, it is usually
//! mutable and not serializable, so the trait asks for very little.

/// Trait for the live objects transitions operate on.
///
/// # Example
///
/// ```rust
/// use statewalk::core::State;
///
/// struct LoginPage {
///     attempts: u32,
/// }
///
/// impl State for LoginPage {
///     fn name(&self) -> &str {
///         "LoginPage"
///     }
/// }
///
/// let page = LoginPage { attempts: 0 };
/// assert_eq!(page.name(), "LoginPage");
/// ```
pub trait State {
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

impl<T: State + ?Sized> State for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }
}
