//! Statewalk: guarded transitions and named contexts for state-graph automation
//!
//! Statewalk lets you describe a piece of software as a graph of states and
//! transitions, then drive it by asking which transitions apply to the live
//! current state and executing one. It provides the edge contract an
//! automation engine calls; it does not walk the graph itself.
//!
//! # Core Concepts
//!
//! - **Transition**: guards, actions and a lazily resolved target type
//! - **Guards**: predicates over the current state and named arguments
//! - **Actions**: effects run against the current state, in order
//! - **Registry**: name to target-type lookup, so states can reference each
//!   other by name without eager construction
//! - **Contexts**: named external objects exposed as fields on a carrier
//!
//! # Example
//!
//! ```rust
//! use statewalk::core::{NamedArgs, State};
//! use statewalk::registry::TypeRegistry;
//! use statewalk::TransitionBuilder;
//! use std::sync::Arc;
//!
//! struct SearchPage {
//!     query: String,
//! }
//!
//! struct ResultsPage;
//!
//! impl State for SearchPage {
//!     fn name(&self) -> &str {
//!         "SearchPage"
//!     }
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register_type::<ResultsPage>("ResultsPage");
//!
//! let search = TransitionBuilder::new()
//!     .when_args(|_: &SearchPage, args: &NamedArgs| args.get_str("term").is_some())
//!     .does_with_args(|page: &mut SearchPage, args: &NamedArgs| {
//!         page.query = args.get_str("term").unwrap_or_default().to_string();
//!     })
//!     .target_in("ResultsPage", registry)
//!     .build()
//!     .unwrap();
//!
//! let mut page = SearchPage { query: String::new() };
//! let args = NamedArgs::new().with("term", "rust");
//!
//! assert!(search.is_valid_for(&page, &args));
//! search.run(&mut page, &args).unwrap();
//! assert_eq!(page.query, "rust");
//! assert!(search.resolve_target_type().unwrap().is::<ResultsPage>());
//! ```

pub mod builder;
pub mod context;
pub mod core;
pub mod descriptor;
pub mod registry;
pub mod snapshot;
pub mod transition;

// Re-export commonly used types
pub use crate::builder::{BuildError, TransitionBuilder};
pub use crate::context::{Context, ContextError, HasContexts};
pub use crate::core::{Action, Guard, NamedArgs, State};
pub use crate::registry::{TargetType, TypeRegistry};
pub use crate::transition::{Transition, TransitionError};
