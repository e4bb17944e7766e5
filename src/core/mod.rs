//! Core building blocks of a transition.
//!
//! This module contains the pieces a transition is composed of:
//! - The `State` trait for live current-state objects
//! - Guard predicates and effectful actions sharing one calling convention
//! - Named arguments passed to both
//! - The metadata store

mod action;
mod args;
mod guard;
mod metadata;
mod state;

pub use action::Action;
pub use args::NamedArgs;
pub use guard::Guard;
pub use metadata::{Metadata, TARGET_NAME_KEY};
pub use state::State;
