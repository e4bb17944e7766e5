//! The transition edge: guards, actions and a lazily resolved target.

use crate::core::{Action, Guard, Metadata, NamedArgs, State, TARGET_NAME_KEY};
use crate::registry::{self, TargetType, TypeRegistry};
use crate::transition::error::TransitionError;
use crate::transition::resolver::{LoadState, TypeIdentifier, TypeLoader, TypeResolver};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};
use uuid::Uuid;

/// An edge between two software states.
///
/// A transition decides whether it applies to a live state object
/// ([`is_valid_for`](Self::is_valid_for)), executes its actions against that
/// object ([`run`](Self::run)) and resolves the type of the state it leads to
/// only when first needed ([`resolve_target_type`](Self::resolve_target_type)).
///
/// `S` is the current-state type, `O` the result type of its actions.
///
/// # Example
///
/// ```rust
/// use statewalk::core::{Action, Guard, NamedArgs, State};
/// use statewalk::transition::Transition;
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
/// let mut transition: Transition<Counter, i64> = Transition::new();
/// transition.add_guard(Guard::new(|c: &Counter| c.value < 10)).unwrap();
/// transition.add_action(Action::new(|c: &mut Counter| {
///     c.value += 1;
///     c.value
/// })).unwrap();
///
/// let mut counter = Counter { value: 5 };
/// let args = NamedArgs::new();
/// assert!(transition.is_valid_for(&counter, &args));
/// assert_eq!(transition.run(&mut counter, &args).unwrap(), vec![6]);
/// ```
pub struct Transition<S: State, O> {
    id: Uuid,
    metadata: Metadata,
    guards: Vec<Guard<S>>,
    actions: Vec<Action<S, O>>,
    resolver: TypeResolver,
}

impl<S: State, O> Transition<S, O> {
    /// Create an empty, unguarded transition.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            metadata: Metadata::new(),
            guards: Vec::new(),
            actions: Vec::new(),
            resolver: TypeResolver::new(),
        }
    }

    /// Create a transition and hand it to `configure` before returning it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use statewalk::core::{Action, State};
    /// use statewalk::transition::Transition;
    ///
    /// struct Page;
    ///
    /// impl State for Page {
    ///     fn name(&self) -> &str {
    ///         "Page"
    ///     }
    /// }
    ///
    /// let transition = Transition::<Page, &'static str>::configure(|t| {
    ///     t.annotate("label", "open settings");
    ///     t.add_action(Action::new(|_: &mut Page| "clicked"))?;
    ///     Ok(())
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(transition.action_count(), 1);
    /// ```
    pub fn configure<F>(configure: F) -> Result<Self, TransitionError>
    where
        F: FnOnce(&mut Self) -> Result<(), TransitionError>,
    {
        let mut transition = Self::new();
        configure(&mut transition)?;
        Ok(transition)
    }

    /// Unique id assigned at construction.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Human-readable label for logs: the target name if set, else the id.
    pub fn label(&self) -> String {
        match self.target_name() {
            Some(name) => format!("-> {name}"),
            None => self.id.to_string(),
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &Value {
        self.metadata.annotate(key, value)
    }

    /// Value stored under `key`, if any.
    pub fn metadata_at(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// All annotations, including the target name.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Append a guard. Passing `None` fails with `MissingBlock`.
    pub fn add_guard(
        &mut self,
        guard: impl Into<Option<Guard<S>>>,
    ) -> Result<&Guard<S>, TransitionError> {
        let guard = guard.into().ok_or(TransitionError::MissingBlock {
            registration: "add_guard",
        })?;
        Ok(self.push_guard(guard))
    }

    /// Append an action. Passing `None` fails with `MissingBlock`.
    pub fn add_action(
        &mut self,
        action: impl Into<Option<Action<S, O>>>,
    ) -> Result<&Action<S, O>, TransitionError> {
        let action = action.into().ok_or(TransitionError::MissingBlock {
            registration: "add_action",
        })?;
        Ok(self.push_action(action))
    }

    pub(crate) fn push_guard(&mut self, guard: Guard<S>) -> &Guard<S> {
        self.guards.push(guard);
        &self.guards[self.guards.len() - 1]
    }

    pub(crate) fn push_action(&mut self, action: Action<S, O>) -> &Action<S, O> {
        self.actions.push(action);
        &self.actions[self.actions.len() - 1]
    }

    /// Number of registered guards.
    pub fn guard_count(&self) -> usize {
        self.guards.len()
    }

    /// Number of registered actions.
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Check whether the transition applies to `state`.
    ///
    /// True when there are no guards, or when any guard passes. Guards run in
    /// registration order and evaluation stops at the first that passes.
    pub fn is_valid_for(&self, state: &S, args: &NamedArgs) -> bool {
        if self.guards.is_empty() {
            trace!(transition = %self.id, state = state.name(), "Unguarded transition is valid");
            return true;
        }

        let valid = self.guards.iter().any(|guard| guard.check(state, args));
        trace!(transition = %self.id, state = state.name(), valid, "Evaluated guards");
        valid
    }

    /// Execute every action against `state`, in registration order.
    ///
    /// If a loader is registered the target type is loaded first (once).
    /// Returns each action's result, in the same order.
    ///
    /// All actions receive the same `state`, so only the last action should
    /// advance it; an earlier action observing a state already moved on by a
    /// later one is a modelling error this method does not detect.
    pub fn run(&self, state: &mut S, args: &NamedArgs) -> Result<Vec<O>, TransitionError> {
        if self.resolver.has_loader() {
            self.ensure_loaded()?;
        }

        debug!(
            transition = %self.id,
            state = state.name(),
            actions = self.actions.len(),
            "Running transition"
        );
        Ok(self
            .actions
            .iter()
            .map(|action| action.invoke(state, args))
            .collect())
    }

    /// Register the target type loader, replacing any previous one.
    pub fn set_type_loader(
        &mut self,
        loader: impl Into<Option<TypeLoader>>,
    ) -> Result<&TypeLoader, TransitionError> {
        self.resolver.set_loader(loader.into())
    }

    /// Register the target type identifier, replacing any previous one.
    pub fn set_type_identifier(
        &mut self,
        identifier: impl Into<Option<TypeIdentifier>>,
    ) -> Result<&TypeIdentifier, TransitionError> {
        self.resolver.set_identifier(identifier.into())
    }

    /// Load the target type unless already loaded. Always `Ok(true)` on success.
    pub fn ensure_loaded(&self) -> Result<bool, TransitionError> {
        self.resolver.ensure_loaded().inspect_err(|err| {
            debug!(transition = %self.id, error = %err, "Target type load failed");
        })
    }

    /// Set the target state by name, resolved through the global registry.
    pub fn set_target_name(&mut self, name: impl Into<String>) -> Result<(), TransitionError> {
        self.set_target_name_in(name, registry::global())
    }

    /// Set the target state by name, resolved through `registry`.
    ///
    /// The name is stored under [`TARGET_NAME_KEY`]. An identifier looking the
    /// name up is installed only if none is registered yet, and likewise a
    /// no-op loader, since anything in the registry is already loaded.
    pub fn set_target_name_in(
        &mut self,
        name: impl Into<String>,
        registry: Arc<TypeRegistry>,
    ) -> Result<(), TransitionError> {
        let name = name.into();

        if !self.resolver.has_identifier() {
            self.resolver
                .set_identifier(Some(TypeIdentifier::by_name(name.clone(), registry)))?;
        }
        if !self.resolver.has_loader() {
            self.resolver.set_loader(Some(TypeLoader::noop()))?;
        }
        // Recorded last so a rejected call leaves the previous name in place.
        self.metadata.annotate(TARGET_NAME_KEY, name);
        Ok(())
    }

    /// Name of the target state, if one was set.
    pub fn target_name(&self) -> Option<&str> {
        self.metadata.get(TARGET_NAME_KEY).and_then(Value::as_str)
    }

    /// Load if needed, then identify the target type. The result is cached.
    pub fn resolve_target_type(&self) -> Result<TargetType, TransitionError> {
        let target = self.resolver.resolve()?;
        trace!(transition = %self.id, target = target.name(), "Resolved target type");
        Ok(target)
    }

    /// Current load state of the target type.
    pub fn load_state(&self) -> LoadState {
        self.resolver.load_state()
    }

    /// True once the loader has run successfully.
    pub fn is_loaded(&self) -> bool {
        self.load_state().is_loaded()
    }

    /// When the target type was loaded.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.load_state().loaded_at()
    }
}

impl<S: State, O> Default for Transition<S, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, O> fmt::Debug for Transition<S, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("id", &self.id)
            .field("metadata", &self.metadata)
            .field("guards", &self.guards.len())
            .field("actions", &self.actions.len())
            .field("load_state", &self.load_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        value: i64,
    }

    impl State for Counter {
        fn name(&self) -> &str {
            "Counter"
        }
    }

    struct Widget;

    fn args() -> NamedArgs {
        NamedArgs::new()
    }

    #[test]
    fn unguarded_transition_is_always_valid() {
        let transition: Transition<Counter, ()> = Transition::new();

        assert!(transition.is_valid_for(&Counter { value: 0 }, &args()));
        assert!(transition.is_valid_for(&Counter { value: -40 }, &args()));
    }

    #[test]
    fn guard_threshold() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition
            .add_guard(Guard::new(|c: &Counter| c.value > 10))
            .unwrap();

        assert!(!transition.is_valid_for(&Counter { value: 5 }, &args()));
        assert!(transition.is_valid_for(&Counter { value: 15 }, &args()));
    }

    #[test]
    fn any_passing_guard_is_enough() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition.add_guard(Guard::new(|c: &Counter| c.value < 0)).unwrap();
        transition.add_guard(Guard::new(|c: &Counter| c.value == 7)).unwrap();

        assert!(transition.is_valid_for(&Counter { value: 7 }, &args()));
        assert!(transition.is_valid_for(&Counter { value: -1 }, &args()));
        assert!(!transition.is_valid_for(&Counter { value: 3 }, &args()));
    }

    #[test]
    fn guard_evaluation_short_circuits() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);

        let mut transition: Transition<Counter, ()> = Transition::new();
        transition.add_guard(Guard::new(|_: &Counter| true)).unwrap();
        transition
            .add_guard(Guard::new(move |_: &Counter| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }))
            .unwrap();

        assert!(transition.is_valid_for(&Counter { value: 0 }, &args()));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn guards_see_named_args() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition
            .add_guard(Guard::with_args(|c: &Counter, a: &NamedArgs| {
                a.get_i64("min").is_some_and(|min| c.value >= min)
            }))
            .unwrap();

        let counter = Counter { value: 4 };
        assert!(transition.is_valid_for(&counter, &args().with("min", 4)));
        assert!(!transition.is_valid_for(&counter, &args().with("min", 5)));
        assert!(!transition.is_valid_for(&counter, &args()));
    }

    #[test]
    fn run_increments_counter() {
        let mut transition: Transition<Counter, i64> = Transition::new();
        transition
            .add_action(Action::new(|c: &mut Counter| c.value + 1))
            .unwrap();

        let result = transition.run(&mut Counter { value: 5 }, &args()).unwrap();
        assert_eq!(result, vec![6]);
    }

    #[test]
    fn run_collects_results_in_registration_order() {
        let mut transition: Transition<Counter, String> = Transition::new();
        for label in ["first", "second", "third"] {
            transition
                .add_action(Action::new(move |_: &mut Counter| label.to_string()))
                .unwrap();
        }

        let results = transition.run(&mut Counter { value: 0 }, &args()).unwrap();
        assert_eq!(results, vec!["first", "second", "third"]);
    }

    #[test]
    fn run_without_actions_returns_empty() {
        let transition: Transition<Counter, i64> = Transition::new();
        assert!(transition.run(&mut Counter { value: 1 }, &args()).unwrap().is_empty());
    }

    #[test]
    fn run_loads_target_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);

        let mut transition: Transition<Counter, ()> = Transition::new();
        transition
            .set_type_loader(TypeLoader::infallible(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        let mut state = Counter { value: 0 };
        transition.run(&mut state, &args()).unwrap();
        transition.run(&mut state, &args()).unwrap();

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(transition.is_loaded());
        assert!(transition.loaded_at().is_some());
    }

    #[test]
    fn run_propagates_load_failure_without_running_actions() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition
            .set_type_loader(TypeLoader::new(|| {
                Err(TransitionError::LoadFailed {
                    reason: "unavailable".to_string(),
                })
            }))
            .unwrap();
        transition
            .add_action(Action::new(|c: &mut Counter| c.value = 99))
            .unwrap();

        let mut state = Counter { value: 0 };
        assert!(transition.run(&mut state, &args()).is_err());
        assert_eq!(state.value, 0);
    }

    #[test]
    fn missing_closures_are_rejected() {
        let mut transition: Transition<Counter, ()> = Transition::new();

        assert_eq!(
            transition.add_guard(None::<Guard<Counter>>).unwrap_err(),
            TransitionError::MissingBlock {
                registration: "add_guard"
            }
        );
        assert_eq!(
            transition.add_action(None::<Action<Counter, ()>>).unwrap_err(),
            TransitionError::MissingBlock {
                registration: "add_action"
            }
        );
        assert!(matches!(
            transition.set_type_loader(None::<TypeLoader>),
            Err(TransitionError::MissingBlock { .. })
        ));
        assert!(matches!(
            transition.set_type_identifier(None::<TypeIdentifier>),
            Err(TransitionError::MissingBlock { .. })
        ));
        assert_eq!(transition.guard_count(), 0);
        assert_eq!(transition.action_count(), 0);
    }

    #[test]
    fn annotate_last_write_wins() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        assert_eq!(transition.annotate("weight", 1), &json!(1));
        transition.annotate("weight", 2);

        assert_eq!(transition.metadata_at("weight"), Some(&json!(2)));
        assert!(transition.metadata_at("missing").is_none());
    }

    #[test]
    fn target_name_round_trips() {
        let registry = Arc::new(TypeRegistry::new());
        let mut transition: Transition<Counter, ()> = Transition::new();
        assert!(transition.target_name().is_none());

        transition.set_target_name_in("Widget", registry).unwrap();

        assert_eq!(transition.target_name(), Some("Widget"));
        assert_eq!(transition.metadata_at(TARGET_NAME_KEY), Some(&json!("Widget")));
        assert_eq!(transition.label(), "-> Widget");
    }

    #[test]
    fn resolve_by_name_looks_up_registry_once() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register_type::<Widget>("Widget");

        let mut transition: Transition<Counter, ()> = Transition::new();
        transition
            .set_target_name_in("Widget", Arc::clone(&registry))
            .unwrap();

        let first = transition.resolve_target_type().unwrap();
        let second = transition.resolve_target_type().unwrap();

        assert!(first.is::<Widget>());
        assert_eq!(first, second);
        assert_eq!(registry.lookup_count(), 1);
    }

    #[test]
    fn resolve_unknown_name_fails() {
        let registry = Arc::new(TypeRegistry::new());
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition.set_target_name_in("Ghost", registry).unwrap();

        assert_eq!(
            transition.resolve_target_type(),
            Err(TransitionError::UnknownType {
                name: "Ghost".to_string()
            })
        );
    }

    #[test]
    fn set_target_name_keeps_explicit_identifier() {
        let registry = Arc::new(TypeRegistry::new());
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition
            .set_type_identifier(TypeIdentifier::of_type::<Widget>("Widget"))
            .unwrap();

        transition.set_target_name_in("Elsewhere", Arc::clone(&registry)).unwrap();

        assert!(transition.resolve_target_type().unwrap().is::<Widget>());
        assert_eq!(registry.lookup_count(), 0);
    }

    #[test]
    fn loader_and_identifier_can_be_replaced_before_load() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition.set_type_loader(TypeLoader::noop()).unwrap();
        transition
            .set_type_identifier(TypeIdentifier::of_type::<Counter>("Counter"))
            .unwrap();
        transition
            .set_type_identifier(TypeIdentifier::of_type::<Widget>("Widget"))
            .unwrap();

        assert!(transition.resolve_target_type().unwrap().is::<Widget>());
    }

    #[test]
    fn registration_after_load_fails() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition.set_type_loader(TypeLoader::noop()).unwrap();
        assert!(transition.ensure_loaded().unwrap());

        assert_eq!(
            transition.set_type_loader(TypeLoader::noop()).unwrap_err(),
            TransitionError::AlreadyLoaded { slot: "loader" }
        );
        assert_eq!(
            transition
                .set_type_identifier(TypeIdentifier::of_type::<Widget>("Widget"))
                .unwrap_err(),
            TransitionError::AlreadyLoaded { slot: "identifier" }
        );
    }

    #[test]
    fn set_target_name_after_load_without_identifier_fails() {
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition.set_type_loader(TypeLoader::noop()).unwrap();
        transition.ensure_loaded().unwrap();

        let err = transition
            .set_target_name_in("Widget", Arc::new(TypeRegistry::new()))
            .unwrap_err();
        assert_eq!(err, TransitionError::AlreadyLoaded { slot: "identifier" });
        assert_eq!(transition.target_name(), None);
    }

    #[test]
    fn rejected_rename_keeps_previous_target_name() {
        let registry = Arc::new(TypeRegistry::new());
        let mut transition: Transition<Counter, ()> = Transition::new();
        transition.annotate(TARGET_NAME_KEY, "Home");
        transition.set_type_loader(TypeLoader::noop()).unwrap();
        transition.ensure_loaded().unwrap();

        assert!(transition.set_target_name_in("Widget", registry).is_err());
        assert_eq!(transition.target_name(), Some("Home"));
    }

    #[test]
    fn ensure_loaded_without_loader_is_unresolved() {
        let transition: Transition<Counter, ()> = Transition::new();
        assert_eq!(
            transition.ensure_loaded(),
            Err(TransitionError::UnresolvedType { missing: "loader" })
        );
    }

    #[test]
    fn configure_propagates_errors() {
        let result = Transition::<Counter, ()>::configure(|t| {
            t.add_guard(None::<Guard<Counter>>)?;
            Ok(())
        });

        assert!(matches!(result, Err(TransitionError::MissingBlock { .. })));
    }

    #[test]
    fn shared_transition_loads_once_across_threads() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&loads);

        let mut transition: Transition<Counter, ()> = Transition::new();
        transition
            .set_type_loader(TypeLoader::infallible(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        let transition = Arc::new(transition);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let transition = Arc::clone(&transition);
                std::thread::spawn(move || transition.ensure_loaded().unwrap())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
