//! Carriers that expose registered contexts as named fields.

use crate::context::error::ContextError;
use crate::context::value::{BoundObject, Context};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::debug;

/// Untyped registration input: names mapped to values that should be contexts.
pub type ContextInput = BTreeMap<String, Box<dyn Any + Send + Sync>>;

/// Map shapes accepted by [`HasContexts::register_any`].
const CONTEXT_MAP_SHAPES: &str =
    "HashMap or BTreeMap of String or &str keys to Context or Box<dyn Any + Send + Sync>";

trait EntryValue {
    fn as_any(&self) -> &dyn Any;
}

impl EntryValue for Context {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl EntryValue for Box<dyn Any + Send + Sync> {
    fn as_any(&self) -> &dyn Any {
        &**self
    }
}

fn collect_entries<'a, K, V>(
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
) -> Vec<(String, &'a dyn Any)>
where
    K: AsRef<str> + 'a,
    V: EntryValue + 'a,
{
    entries
        .into_iter()
        .map(|(key, value)| (<K as AsRef<str>>::as_ref(key).to_owned(), value.as_any()))
        .collect()
}

/// Flatten any accepted map shape into `(key, value)` pairs in key order.
fn map_entries(input: &dyn Any) -> Option<Vec<(String, &dyn Any)>> {
    type Boxed = Box<dyn Any + Send + Sync>;

    let mut entries = if let Some(map) = input.downcast_ref::<HashMap<String, Context>>() {
        collect_entries(map)
    } else if let Some(map) = input.downcast_ref::<HashMap<&'static str, Context>>() {
        collect_entries(map)
    } else if let Some(map) = input.downcast_ref::<BTreeMap<String, Context>>() {
        collect_entries(map)
    } else if let Some(map) = input.downcast_ref::<BTreeMap<&'static str, Context>>() {
        collect_entries(map)
    } else if let Some(map) = input.downcast_ref::<ContextInput>() {
        collect_entries(map)
    } else if let Some(map) = input.downcast_ref::<HashMap<String, Boxed>>() {
        collect_entries(map)
    } else if let Some(map) = input.downcast_ref::<HashMap<&'static str, Boxed>>() {
        collect_entries(map)
    } else if let Some(map) = input.downcast_ref::<BTreeMap<&'static str, Boxed>>() {
        collect_entries(map)
    } else {
        return None;
    };
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Some(entries)
}

/// Storage behind [`HasContexts`].
///
/// `table` is keyed by the registration key; `fields` is keyed by each
/// context's own name and is what [`HasContexts::field`] reads.
#[derive(Clone, Default)]
pub struct ContextSlots {
    table: HashMap<String, BoundObject>,
    fields: HashMap<String, BoundObject>,
}

impl ContextSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn merge(&mut self, key: String, context: &Context) {
        debug!(key = %key, name = context.name(), "Registering context");
        self.table.insert(key, Arc::clone(context.object()));
        self.fields
            .insert(context.name().to_string(), Arc::clone(context.object()));
    }

    /// Registration keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.table.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for ContextSlots {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        fields.sort_unstable();
        f.debug_struct("ContextSlots")
            .field("keys", &self.keys())
            .field("fields", &fields)
            .finish()
    }
}

/// Capability for carriers (automations, sessions) that hold named contexts.
///
/// Implementors only provide access to their [`ContextSlots`]; registration
/// and lookup come for free.
///
/// # Example
///
/// ```rust
/// use statewalk::context::{Context, ContextSlots, HasContexts};
/// use std::sync::Arc;
///
/// struct Browser;
///
/// #[derive(Default)]
/// struct Session {
///     slots: ContextSlots,
/// }
///
/// impl HasContexts for Session {
///     fn context_slots(&self) -> &ContextSlots {
///         &self.slots
///     }
///
///     fn context_slots_mut(&mut self) -> &mut ContextSlots {
///         &mut self.slots
///     }
/// }
///
/// let browser = Arc::new(Browser);
/// let mut session = Session::default();
/// session.register([("browser", Context::shared("browser", Arc::clone(&browser)).unwrap())]);
///
/// let field = session.field::<Browser>("browser").unwrap();
/// assert!(Arc::ptr_eq(&field, &browser));
/// ```
pub trait HasContexts {
    fn context_slots(&self) -> &ContextSlots;

    fn context_slots_mut(&mut self) -> &mut ContextSlots;

    /// Merge `(key, context)` pairs. Existing keys and fields are overwritten.
    fn register<K, I>(&mut self, contexts: I)
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Context)>,
    {
        let slots = self.context_slots_mut();
        for (key, context) in contexts {
            slots.merge(key.into(), &context);
        }
    }

    /// Merge contexts keyed by their own names.
    fn attach<I>(&mut self, contexts: I)
    where
        I: IntoIterator<Item = Context>,
    {
        self.register(
            contexts
                .into_iter()
                .map(|context| (context.name().to_string(), context)),
        );
    }

    /// Merge contexts from untyped input.
    ///
    /// `input` must be a `HashMap` or `BTreeMap` keyed by `String` or
    /// `&'static str`, holding either [`Context`] values or boxed values that
    /// should be contexts (as in [`ContextInput`]). Anything else is a
    /// `TypeMismatch`. If any value is not a [`Context`], `InvalidContext`
    /// lists all offending keys and nothing is merged.
    fn register_any(&mut self, input: &dyn Any) -> Result<(), ContextError> {
        let entries = map_entries(input).ok_or(ContextError::TypeMismatch {
            expected: CONTEXT_MAP_SHAPES,
        })?;

        let checks: Vec<Validation<(), NonEmptyVec<String>>> = entries
            .iter()
            .map(|(key, value)| {
                if value.is::<Context>() {
                    Validation::success(())
                } else {
                    Validation::fail(key.clone())
                }
            })
            .collect();

        match Validation::all_vec(checks) {
            Validation::Success(_) => {
                self.register(entries.into_iter().filter_map(|(key, value)| {
                    value
                        .downcast_ref::<Context>()
                        .map(|context| (key, context.clone()))
                }));
                Ok(())
            }
            Validation::Failure(keys) => Err(ContextError::InvalidContext {
                keys: keys.iter().cloned().collect(),
            }),
        }
    }

    /// Object registered under `key`, if any.
    fn lookup(&self, key: &str) -> Option<BoundObject> {
        self.context_slots().table.get(key).cloned()
    }

    /// Addressable field named `name`, type-erased.
    fn field_object(&self, name: &str) -> Option<BoundObject> {
        self.context_slots().fields.get(name).cloned()
    }

    /// Addressable field named `name`, if it holds a `T`.
    fn field<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.field_object(name)
            .and_then(|object| object.downcast::<T>().ok())
    }

    /// Rebind the addressable field `name` without touching the context table.
    fn set_field(&mut self, name: impl Into<String>, object: BoundObject) -> Option<BoundObject> {
        self.context_slots_mut().fields.insert(name.into(), object)
    }
}

impl HasContexts for ContextSlots {
    fn context_slots(&self) -> &ContextSlots {
        self
    }

    fn context_slots_mut(&mut self) -> &mut ContextSlots {
        self
    }
}
