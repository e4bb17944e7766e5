//! Lazy resolution of a transition's target type.
//!
//! A transition knows *how* to bring its target type into scope (the loader)
//! and *how* to name it (the identifier), but runs neither until the target
//! is actually needed. Loading happens at most once per transition.

use crate::registry::{TargetType, TypeRegistry};
use crate::transition::error::TransitionError;
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type LoadFn = Box<dyn Fn() -> Result<(), TransitionError> + Send + Sync>;
type IdentifyFn = Box<dyn Fn() -> Result<TargetType, TransitionError> + Send + Sync>;

/// Load state of a transition's target type.
///
/// `Unloaded -> Loaded` is the only transition and it is irreversible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded { at: DateTime<Utc> },
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Loaded { at } => Some(*at),
            Self::Unloaded => None,
        }
    }
}

/// Closure that ensures the target type is available.
pub struct TypeLoader {
    load: LoadFn,
}

impl TypeLoader {
    /// Create a loader from a fallible closure.
    pub fn new<F>(load: F) -> Self
    where
        F: Fn() -> Result<(), TransitionError> + Send + Sync + 'static,
    {
        Self {
            load: Box::new(load),
        }
    }

    /// Create a loader from a closure that cannot fail.
    pub fn infallible<F>(load: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(move || {
            load();
            Ok(())
        })
    }

    /// Loader that registers `T` in `registry` under `name`.
    ///
    /// This is the usual way to break cycles between state definitions: the
    /// target registers itself the first time a transition needs it.
    pub fn registering<T: Any>(name: impl Into<String>, registry: Arc<TypeRegistry>) -> Self {
        let name = name.into();
        Self::infallible(move || {
            registry.register_type::<T>(&name);
        })
    }

    /// Loader for targets that are already registered.
    pub(crate) fn noop() -> Self {
        Self::new(|| Ok(()))
    }

    pub fn load(&self) -> Result<(), TransitionError> {
        (self.load)()
    }
}

impl fmt::Debug for TypeLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeLoader").finish_non_exhaustive()
    }
}

/// Closure that names the target type once it is loaded.
pub struct TypeIdentifier {
    identify: IdentifyFn,
}

impl TypeIdentifier {
    pub fn new<F>(identify: F) -> Self
    where
        F: Fn() -> Result<TargetType, TransitionError> + Send + Sync + 'static,
    {
        Self {
            identify: Box::new(identify),
        }
    }

    /// Identifier that always yields `T` under `name`.
    pub fn of_type<T: Any>(name: impl Into<Arc<str>>) -> Self {
        let target = TargetType::of::<T>(name);
        Self::new(move || Ok(target.clone()))
    }

    /// Identifier that looks `name` up in `registry` each time it is invoked.
    pub fn by_name(name: impl Into<String>, registry: Arc<TypeRegistry>) -> Self {
        let name = name.into();
        Self::new(move || registry.lookup(&name))
    }

    pub fn identify(&self) -> Result<TargetType, TransitionError> {
        (self.identify)()
    }
}

impl fmt::Debug for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeIdentifier").finish_non_exhaustive()
    }
}

/// Loader, identifier, one-shot load flag and memoized target.
///
/// The load state sits behind a mutex so the `Unloaded -> Loaded` step is a
/// single check-and-set even when the owning transition is shared between
/// threads. The loader runs while the lock is held; a loader that re-enters
/// `ensure_loaded` on the same resolver deadlocks.
pub(crate) struct TypeResolver {
    loader: Option<TypeLoader>,
    identifier: Option<TypeIdentifier>,
    state: Mutex<LoadState>,
    target: OnceCell<TargetType>,
}

impl TypeResolver {
    pub(crate) fn new() -> Self {
        Self {
            loader: None,
            identifier: None,
            state: Mutex::new(LoadState::Unloaded),
            target: OnceCell::new(),
        }
    }

    pub(crate) fn set_loader(
        &mut self,
        loader: Option<TypeLoader>,
    ) -> Result<&TypeLoader, TransitionError> {
        let loader = loader.ok_or(TransitionError::MissingBlock {
            registration: "set_type_loader",
        })?;
        if self.state.get_mut().is_loaded() {
            return Err(TransitionError::AlreadyLoaded { slot: "loader" });
        }
        Ok(&*self.loader.insert(loader))
    }

    pub(crate) fn set_identifier(
        &mut self,
        identifier: Option<TypeIdentifier>,
    ) -> Result<&TypeIdentifier, TransitionError> {
        let identifier = identifier.ok_or(TransitionError::MissingBlock {
            registration: "set_type_identifier",
        })?;
        if self.state.get_mut().is_loaded() {
            return Err(TransitionError::AlreadyLoaded { slot: "identifier" });
        }
        Ok(&*self.identifier.insert(identifier))
    }

    pub(crate) fn has_loader(&self) -> bool {
        self.loader.is_some()
    }

    pub(crate) fn has_identifier(&self) -> bool {
        self.identifier.is_some()
    }

    pub(crate) fn load_state(&self) -> LoadState {
        *self.state.lock()
    }

    /// Run the loader unless it already ran. A failed load leaves the
    /// resolver unloaded so the call can be retried.
    pub(crate) fn ensure_loaded(&self) -> Result<bool, TransitionError> {
        let mut state = self.state.lock();
        if state.is_loaded() {
            return Ok(true);
        }

        let loader = self
            .loader
            .as_ref()
            .ok_or(TransitionError::UnresolvedType { missing: "loader" })?;
        loader.load()?;

        let at = Utc::now();
        *state = LoadState::Loaded { at };
        debug!(loaded_at = %at, "Target type loaded");
        Ok(true)
    }

    pub(crate) fn resolve(&self) -> Result<TargetType, TransitionError> {
        self.ensure_loaded()?;
        self.target
            .get_or_try_init(|| {
                self.identifier
                    .as_ref()
                    .ok_or(TransitionError::UnresolvedType {
                        missing: "identifier",
                    })?
                    .identify()
            })
            .cloned()
    }
}
