//! Transitions between software states.
//!
//! A [`Transition`] is the edge contract an automation engine calls:
//!
//! - **Guards** decide whether the edge applies to the current state
//! - **Actions** drive the software along the edge
//! - **Lazy target resolution** names the state type the edge leads to,
//!   loading it on first need so state definitions may reference each other
//!   without being constructed eagerly

mod edge;
mod error;
mod resolver;

pub use edge::Transition;
pub use error::TransitionError;
pub use resolver::{LoadState, TypeIdentifier, TypeLoader};
