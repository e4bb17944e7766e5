//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Guard, NamedArgs, State};
use crate::registry::{self, TypeRegistry};
use crate::transition::{Transition, TypeIdentifier, TypeLoader};
use serde_json::Value;
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
///
/// Registrations are replayed onto a fresh [`Transition`] in `build`, so an
/// explicit `.identifier(..)` always takes precedence over the one `.target(..)`
/// would install.
pub struct TransitionBuilder<S: State, O> {
    metadata: Vec<(String, Value)>,
    guards: Vec<Guard<S>>,
    actions: Vec<Action<S, O>>,
    loader: Option<TypeLoader>,
    identifier: Option<TypeIdentifier>,
    target: Option<(String, Option<Arc<TypeRegistry>>)>,
}

impl<S: State, O> TransitionBuilder<S, O> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            metadata: Vec::new(),
            guards: Vec::new(),
            actions: Vec::new(),
            loader: None,
            identifier: None,
            target: None,
        }
    }

    /// Add a metadata entry (optional).
    pub fn annotate(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// Add a guard (optional, repeatable).
    pub fn guard(mut self, guard: Guard<S>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Add a guard using a closure over the state.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Add a guard using a closure over the state and named arguments.
    pub fn when_args<F>(self, predicate: F) -> Self
    where
        F: Fn(&S, &NamedArgs) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::with_args(predicate))
    }

    /// Add an action (optional, repeatable).
    pub fn action(mut self, action: Action<S, O>) -> Self {
        self.actions.push(action);
        self
    }

    /// Add an action using a closure over the state.
    pub fn does<F>(self, effect: F) -> Self
    where
        F: Fn(&mut S) -> O + Send + Sync + 'static,
    {
        self.action(Action::new(effect))
    }

    /// Add an action using a closure over the state and named arguments.
    pub fn does_with_args<F>(self, effect: F) -> Self
    where
        F: Fn(&mut S, &NamedArgs) -> O + Send + Sync + 'static,
    {
        self.action(Action::with_args(effect))
    }

    /// Set the target type loader (optional).
    pub fn loader(mut self, loader: TypeLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Set the target type identifier (optional).
    pub fn identifier(mut self, identifier: TypeIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Target a state by name, resolved through the global registry.
    pub fn target(mut self, name: impl Into<String>) -> Self {
        self.target = Some((name.into(), None));
        self
    }

    /// Target a state by name, resolved through `registry`.
    pub fn target_in(mut self, name: impl Into<String>, registry: Arc<TypeRegistry>) -> Self {
        self.target = Some((name.into(), Some(registry)));
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, O>, BuildError> {
        if matches!(&self.target, Some((name, _)) if name.is_empty()) {
            return Err(BuildError::EmptyTargetName);
        }

        let mut transition = Transition::new();
        for (key, value) in self.metadata {
            transition.annotate(key, value);
        }
        for guard in self.guards {
            transition.add_guard(guard)?;
        }
        for action in self.actions {
            transition.add_action(action)?;
        }
        if let Some(loader) = self.loader {
            transition.set_type_loader(loader)?;
        }
        if let Some(identifier) = self.identifier {
            transition.set_type_identifier(identifier)?;
        }
        if let Some((name, registry)) = self.target {
            let registry = registry.unwrap_or_else(registry::global);
            transition.set_target_name_in(name, registry)?;
        }

        Ok(transition)
    }
}

impl<S: State, O> Default for TransitionBuilder<S, O> {
    fn default() -> Self {
        Self::new()
    }
}
