//! Name to target-type registry.
//!
//! Transitions refer to the state they lead to by name so that mutually
//! referencing state definitions do not have to be constructed eagerly. The
//! registry resolves those names once the types have been registered at
//! model-load time.

use crate::transition::TransitionError;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Reference to the Rust type that models a state.
///
/// # Example
///
/// ```rust
/// use statewalk::registry::TargetType;
///
/// struct CheckoutPage;
///
/// let target = TargetType::of::<CheckoutPage>("Checkout");
/// assert_eq!(target.name(), "Checkout");
/// assert!(target.is::<CheckoutPage>());
/// assert!(!target.is::<String>());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TargetType {
    name: Arc<str>,
    type_id: TypeId,
    type_name: &'static str,
}

impl TargetType {
    /// Describe `T` under the given state name.
    pub fn of<T: Any>(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified Rust type name, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetType")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Registry of target types keyed by state name.
#[derive(Default)]
pub struct TypeRegistry {
    types: RwLock<HashMap<String, TargetType>>,
    lookups: AtomicUsize,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target type under its name, returning the type it replaced.
    pub fn register(&self, target: TargetType) -> Option<TargetType> {
        debug!(name = target.name(), type_name = target.type_name(), "Registering target type");
        self.types.write().insert(target.name().to_string(), target)
    }

    /// Register `T` under `name`.
    pub fn register_type<T: Any>(&self, name: &str) -> Option<TargetType> {
        self.register(TargetType::of::<T>(name))
    }

    /// Resolve a name to its target type.
    ///
    /// Every call is counted, see [`TypeRegistry::lookup_count`].
    pub fn lookup(&self, name: &str) -> Result<TargetType, TransitionError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        trace!(name, "Looking up target type");
        self.types
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| TransitionError::UnknownType {
                name: name.to_string(),
            })
    }

    /// Check for a name without counting a lookup.
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// Number of [`TypeRegistry::lookup`] calls made so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("names", &self.names())
            .field("lookups", &self.lookup_count())
            .finish()
    }
}

/// Process-wide registry used by `Transition::set_target_name`.
static GLOBAL_REGISTRY: Lazy<Arc<TypeRegistry>> = Lazy::new(|| Arc::new(TypeRegistry::new()));

/// Get the process-wide registry.
pub fn global() -> Arc<TypeRegistry> {
    Arc::clone(&GLOBAL_REGISTRY)
}
