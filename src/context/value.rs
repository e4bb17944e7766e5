//! Named handles to external objects.

use crate::context::error::ContextError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Type-erased, shared reference to a bound object.
pub type BoundObject = Arc<dyn Any + Send + Sync>;

/// An external object (a browser session, a device handle) under a name.
///
/// A context is an immutable value. Cloning it shares the bound object; the
/// object itself may still be mutated through interior mutability by whoever
/// holds it.
///
/// # Example
///
/// ```rust
/// use statewalk::context::Context;
/// use std::sync::Arc;
///
/// struct Browser {
///     url: String,
/// }
///
/// let browser = Arc::new(Browser { url: "about:blank".into() });
/// let context = Context::shared("browser", Arc::clone(&browser)).unwrap();
///
/// assert_eq!(context.name(), "browser");
/// let bound = context.downcast::<Browser>().unwrap();
/// assert!(Arc::ptr_eq(&bound, &browser));
/// assert_eq!(bound.url, "about:blank");
/// ```
#[derive(Clone)]
pub struct Context {
    name: Arc<str>,
    object: BoundObject,
}

impl Context {
    /// Bind an owned object under `name`.
    pub fn new<T>(name: impl Into<String>, object: T) -> Result<Self, ContextError>
    where
        T: Any + Send + Sync,
    {
        Self::shared(name, Arc::new(object))
    }

    /// Bind an already shared object under `name`.
    pub fn shared<T>(name: impl Into<String>, object: Arc<T>) -> Result<Self, ContextError>
    where
        T: Any + Send + Sync,
    {
        Self::from_bound(name, object)
    }

    /// Bind a type-erased object under `name`.
    pub fn from_bound(name: impl Into<String>, object: BoundObject) -> Result<Self, ContextError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ContextError::EmptyName);
        }
        Ok(Self {
            name: name.into(),
            object,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn object(&self) -> &BoundObject {
        &self.object
    }

    /// Get the bound object as `T`, if that is its type.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.object).downcast::<T>().ok()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Device {
        serial: u32,
    }

    #[test]
    fn new_wraps_owned_object() {
        let context = Context::new("device", Device { serial: 7 }).unwrap();

        assert_eq!(context.name(), "device");
        assert_eq!(*context.downcast::<Device>().unwrap(), Device { serial: 7 });
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            Context::new("", Device { serial: 1 }).unwrap_err(),
            ContextError::EmptyName
        );
    }

    #[test]
    fn downcast_to_wrong_type_is_none() {
        let context = Context::new("device", Device { serial: 7 }).unwrap();
        assert!(context.downcast::<String>().is_none());
    }

    #[test]
    fn clones_share_the_object() {
        let context = Context::new("device", Device { serial: 3 }).unwrap();
        let copy = context.clone();

        assert!(Arc::ptr_eq(context.object(), copy.object()));
    }
}
