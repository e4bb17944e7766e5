//! Declarative transition descriptors.
//!
//! Model-definition code can keep the data half of its transitions (target
//! names, labels, weights) in JSON and attach guards and actions in Rust:
//!
//! ```rust
//! use statewalk::core::State;
//! use statewalk::descriptor::TransitionDescriptor;
//! use statewalk::registry::TypeRegistry;
//! use std::sync::Arc;
//!
//! struct Login;
//! struct Inbox;
//!
//! impl State for Login {
//!     fn name(&self) -> &str {
//!         "Login"
//!     }
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register_type::<Inbox>("Inbox");
//!
//! let descriptor = TransitionDescriptor::from_json(
//!     r#"{ "target": "Inbox", "metadata": { "label": "sign in", "weight": 2 } }"#,
//! )
//! .unwrap();
//!
//! let transition = descriptor.into_transition_in::<Login, ()>(registry).unwrap();
//! assert_eq!(transition.target_name(), Some("Inbox"));
//! assert!(transition.resolve_target_type().unwrap().is::<Inbox>());
//! ```

pub mod error;

pub use error::DescriptorError;

use crate::builder::TransitionBuilder;
use crate::core::State;
use crate::registry::{self, TypeRegistry};
use crate::transition::Transition;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Serializable description of a transition's data.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionDescriptor {
    /// Name of the target state in the type registry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Metadata to annotate the transition with
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl TransitionDescriptor {
    /// Parse a single descriptor from JSON.
    pub fn from_json(json: &str) -> Result<Self, DescriptorError> {
        serde_json::from_str(json).map_err(|e| DescriptorError::Parse(e.to_string()))
    }

    /// Parse a JSON array of descriptors.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, DescriptorError> {
        serde_json::from_str(json).map_err(|e| DescriptorError::Parse(e.to_string()))
    }

    /// Write the descriptor as compact JSON.
    pub fn to_json(&self) -> Result<String, DescriptorError> {
        serde_json::to_string(self).map_err(|e| DescriptorError::Encode(e.to_string()))
    }

    /// Builder preloaded with this descriptor, resolving against `registry`.
    ///
    /// Guards and actions can be added before calling `build`.
    pub fn builder_in<S: State, O>(self, registry: Arc<TypeRegistry>) -> TransitionBuilder<S, O> {
        let mut builder = TransitionBuilder::new();
        for (key, value) in self.metadata {
            builder = builder.annotate(key, value);
        }
        if let Some(target) = self.target {
            builder = builder.target_in(target, registry);
        }
        builder
    }

    /// Build an unguarded, action-less transition resolving against `registry`.
    pub fn into_transition_in<S: State, O>(
        self,
        registry: Arc<TypeRegistry>,
    ) -> Result<Transition<S, O>, DescriptorError> {
        Ok(self.builder_in(registry).build()?)
    }

    /// Build against the global registry.
    pub fn into_transition<S: State, O>(self) -> Result<Transition<S, O>, DescriptorError> {
        self.into_transition_in(registry::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuildError;
    use crate::core::NamedArgs;
    use serde_json::json;

    struct Page {
        visits: u32,
    }

    impl State for Page {
        fn name(&self) -> &str {
            "Page"
        }
    }

    struct Results;

    #[test]
    fn parses_full_descriptor() {
        let descriptor =
            TransitionDescriptor::from_json(r#"{"target":"Results","metadata":{"weight":3}}"#)
                .unwrap();

        assert_eq!(descriptor.target.as_deref(), Some("Results"));
        assert_eq!(descriptor.metadata.get("weight"), Some(&json!(3)));
    }

    #[test]
    fn empty_object_is_a_valid_descriptor() {
        let descriptor = TransitionDescriptor::from_json("{}").unwrap();
        assert_eq!(descriptor, TransitionDescriptor::default());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = TransitionDescriptor::from_json(r#"{"targte":"Results"}"#).unwrap_err();
        assert!(matches!(err, DescriptorError::Parse(_)));
    }

    #[test]
    fn parses_descriptor_lists() {
        let list = TransitionDescriptor::list_from_json(
            r#"[{"target":"A"},{"metadata":{"label":"stay"}}]"#,
        )
        .unwrap();

        assert_eq!(list.len(), 2);
        assert!(list[1].target.is_none());
    }

    #[test]
    fn empty_target_fails_to_build() {
        let descriptor = TransitionDescriptor::from_json(r#"{"target":""}"#).unwrap();
        let result = descriptor.into_transition_in::<Page, ()>(Arc::new(TypeRegistry::new()));

        assert!(matches!(
            result,
            Err(DescriptorError::Build(BuildError::EmptyTargetName))
        ));
    }

    #[test]
    fn builder_accepts_guards_and_actions() {
        let registry = Arc::new(TypeRegistry::new());
        registry.register_type::<Results>("Results");

        let transition = TransitionDescriptor::from_json(r#"{"target":"Results"}"#)
            .unwrap()
            .builder_in(Arc::clone(&registry))
            .when(|p: &Page| p.visits == 0)
            .does(|p: &mut Page| {
                p.visits += 1;
                p.visits
            })
            .build()
            .unwrap();

        let mut page = Page { visits: 0 };
        let args = NamedArgs::new();
        assert!(transition.is_valid_for(&page, &args));
        assert_eq!(transition.run(&mut page, &args).unwrap(), vec![1]);
        assert!(transition.resolve_target_type().unwrap().is::<Results>());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let descriptor = TransitionDescriptor {
            target: Some("Results".into()),
            metadata: BTreeMap::new(),
        };
        assert_eq!(descriptor.to_json().unwrap(), r#"{"target":"Results"}"#);
    }
}
