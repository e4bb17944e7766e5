//! Macros for ergonomic context construction.

/// Build a list of contexts named after the given identifiers.
///
/// Each value must be an `Arc<T>`; the context shares it with the caller.
/// Expands to `Result<Vec<Context>, ContextError>`.
///
/// # Example
///
/// ```
/// use statewalk::context::{ContextSlots, HasContexts};
/// use statewalk::contexts;
/// use std::sync::Arc;
///
/// struct Browser;
/// struct Device;
///
/// let browser = Arc::new(Browser);
/// let mut slots = ContextSlots::new();
/// slots.attach(contexts! {
///     browser: Arc::clone(&browser),
///     device: Arc::new(Device),
/// }.unwrap());
///
/// assert!(Arc::ptr_eq(&slots.field::<Browser>("browser").unwrap(), &browser));
/// assert!(slots.field::<Device>("device").is_some());
/// ```
#[macro_export]
macro_rules! contexts {
    () => {
        ::std::result::Result::<
            ::std::vec::Vec<$crate::context::Context>,
            $crate::context::ContextError,
        >::Ok(::std::vec::Vec::new())
    };
    ($($name:ident : $object:expr),+ $(,)?) => {
        [$($crate::context::Context::shared(stringify!($name), $object)),+]
            .into_iter()
            .collect::<::std::result::Result<
                ::std::vec::Vec<$crate::context::Context>,
                $crate::context::ContextError,
            >>()
    };
}
